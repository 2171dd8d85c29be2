use super::{EventContext, Listeners};
use crate::constants::RESIZE_DEBOUNCE_MS;
use crate::dom;
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Rebuild panes and drop cached geometry for the current viewport.
pub fn apply_resize(ctx: &EventContext) {
    let (w, h) = dom::viewport_size(&ctx.window);
    let now = ctx.clock.now_ms();
    let cells = ctx.engine.borrow_mut().resize(w, h, now);
    let panes = dom::rebuild_panes(&ctx.document, &cells);
    ctx.elements.borrow_mut().replace_panes(panes);
    ctx.frame_loop.resized();
}

pub fn wire(ctx: &EventContext, listeners: &mut Listeners) {
    let window_target: &web::EventTarget = ctx.window.as_ref();
    let doc_target: &web::EventTarget = ctx.document.as_ref();

    let c = ctx.clone();
    listeners.add(doc_target, "visibilitychange", move |_ev| {
        if !c.alive() {
            return;
        }
        let visible = !c.document.hidden();
        let resumed = c.engine.borrow_mut().set_visible(visible);
        if resumed {
            c.frame_loop.wake();
        }
    });

    for (event, focused) in [("focus", true), ("blur", false)] {
        let c = ctx.clone();
        listeners.add(window_target, event, move |_ev| {
            if !c.alive() {
                return;
            }
            let resumed = c.engine.borrow_mut().set_focused(focused);
            if resumed {
                c.frame_loop.wake();
            }
        });
    }

    // Debounced: a drag-resize fires dozens of events and each one rebuilds the grid
    let pending: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
    let c = ctx.clone();
    let apply = Closure::wrap(Box::new(move || {
        if c.alive() {
            apply_resize(&c);
        }
    }) as Box<dyn FnMut()>);
    // leaked: a debounce timer may still fire after teardown
    let apply_fn: js_sys::Function = apply.as_ref().unchecked_ref::<js_sys::Function>().clone();
    apply.forget();
    let c = ctx.clone();
    listeners.add(window_target, "resize", move |_ev| {
        if !c.alive() {
            return;
        }
        if let Some(id) = pending.take() {
            c.window.clear_timeout_with_handle(id);
        }
        match c
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(&apply_fn, RESIZE_DEBOUNCE_MS)
        {
            Ok(id) => pending.set(Some(id)),
            Err(e) => log::warn!("[events] resize debounce failed: {:?}", e),
        }
    });
}
