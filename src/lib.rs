#![cfg(target_arch = "wasm32")]
use effect_core::EffectEngine;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

mod constants;
mod dom;
mod events;
mod frame;
mod overlay;
mod storage;
mod surface;

use constants::{FIXED_ATTR, GLYPH_SELECTOR, OVERLAY_CANVAS_ID};
use events::{EventContext, Listeners};
use frame::{FrameLoop, LoopHandle, PerfClock};
use surface::{CssSurface, DomGeometry, SharedElements, TargetElements};

struct App {
    ctx: EventContext,
    listeners: Listeners,
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("effect-web starting");

    if let Err(e) = init() {
        log::error!("init error: {:?}", e);
    }
    Ok(())
}

/// Tear the effects down from script, same as leaving the page.
#[wasm_bindgen]
pub fn stop_effects() {
    teardown();
}

fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    if dom::effects_disabled(&window) {
        log::info!("[init] effects disabled, leaving static markup");
        return Ok(());
    }

    let config = dom::load_config(&document);
    let clock = PerfClock::new();
    let mut engine = EffectEngine::new(config);

    dom::split_glyphs(&document);
    let elements: SharedElements = Rc::new(RefCell::new(TargetElements::default()));
    {
        let mut els = elements.borrow_mut();
        for el in dom::query_all(&document, GLYPH_SELECTOR) {
            let id = engine.add_glyph(el.has_attribute(FIXED_ATTR));
            els.insert(id, el);
        }
    }

    let (w, h) = dom::viewport_size(&window);
    let cells = engine.resize(w, h, clock.now_ms());
    let panes = dom::rebuild_panes(&document, &cells);
    elements.borrow_mut().replace_panes(panes);
    log::info!(
        "[init] {} targets ({} panes) viewport={}x{}",
        engine.registry().len(),
        cells.len(),
        w,
        h
    );

    let variations = surface::supports_font_variations();
    let surface = CssSurface::new(elements.clone(), variations, engine.config());
    let geometry = DomGeometry::new(elements.clone());

    let overlay = document
        .get_element_by_id(OVERLAY_CANVAS_ID)
        .and_then(|el| el.dyn_into::<web::HtmlCanvasElement>().ok())
        .and_then(|canvas| match overlay::Overlay::new(canvas) {
            Ok(o) => {
                o.sync_backing_size();
                Some(o)
            }
            Err(e) => {
                log::warn!("[init] overlay disabled: {:?}", e);
                None
            }
        });

    let engine = Rc::new(RefCell::new(engine));
    let frame_loop = LoopHandle::new(FrameLoop::new(
        engine.clone(),
        geometry,
        surface,
        overlay,
        clock,
    ));

    let ctx = EventContext {
        window: window.clone(),
        document,
        engine,
        elements,
        clock,
        frame_loop: frame_loop.clone(),
    };
    let mut listeners = Listeners::default();
    events::wire_all(&ctx, &mut listeners);
    frame_loop.start();

    // pagehide tears everything down, so it must not live in `listeners`.
    // A page entering the back/forward cache is only hidden; visibilitychange
    // already parks the loop and resumes it on return.
    let on_pagehide = Closure::wrap(Box::new(|ev: web::Event| {
        let persisted = ev
            .dyn_ref::<web::PageTransitionEvent>()
            .map(|ev| ev.persisted())
            .unwrap_or(false);
        if persisted {
            log::debug!("[teardown] page cached, keeping effects");
            return;
        }
        teardown();
    }) as Box<dyn FnMut(web::Event)>);
    _ = window.add_event_listener_with_callback("pagehide", on_pagehide.as_ref().unchecked_ref());
    on_pagehide.forget();

    APP.with(|app| *app.borrow_mut() = Some(App { ctx, listeners }));
    Ok(())
}

fn teardown() {
    let Some(mut app) = APP.with(|app| app.borrow_mut().take()) else {
        return;
    };
    app.ctx.engine.borrow_mut().destroy();
    app.ctx.frame_loop.stop();
    app.listeners.remove_all();
    app.ctx.elements.borrow_mut().clear();
    log::info!("[teardown] effects stopped");
}
