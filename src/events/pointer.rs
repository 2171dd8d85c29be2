use super::{EventContext, Listeners};
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn wire(ctx: &EventContext, listeners: &mut Listeners) {
    let target: &web::EventTarget = ctx.window.as_ref();

    let c = ctx.clone();
    listeners.add(target, "pointermove", move |ev| {
        if !c.alive() {
            return;
        }
        let Some(ev) = ev.dyn_ref::<web::PointerEvent>() else {
            return;
        };
        // touch pointers are handled by the touch adapter
        if ev.pointer_type() == "touch" {
            return;
        }
        let now = c.clock.now_ms();
        c.engine
            .borrow_mut()
            .pointer_moved(ev.client_x() as f32, ev.client_y() as f32, now);
        c.frame_loop.wake();
    });

    let c = ctx.clone();
    listeners.add(target, "pointerdown", move |ev| {
        if !c.alive() {
            return;
        }
        let is_touch = ev
            .dyn_ref::<web::PointerEvent>()
            .map(|p| p.pointer_type() == "touch")
            .unwrap_or(false);
        if is_touch {
            return;
        }
        let now = c.clock.now_ms();
        c.engine.borrow_mut().pointer_down(now);
        log::debug!("[pointer] click burst");
        c.frame_loop.wake();
    });

    let c = ctx.clone();
    let doc_target: &web::EventTarget = ctx.document.as_ref();
    listeners.add(doc_target, "mouseleave", move |_ev| {
        if c.alive() {
            c.engine.borrow_mut().pointer_left();
        }
    });
}
