use super::{EventContext, Listeners};
use wasm_bindgen::JsCast;
use web_sys as web;

fn first_touch(ev: &web::Event) -> Option<(f32, f32)> {
    let ev = ev.dyn_ref::<web::TouchEvent>()?;
    let touch = ev.touches().get(0)?;
    Some((touch.client_x() as f32, touch.client_y() as f32))
}

pub fn wire(ctx: &EventContext, listeners: &mut Listeners) {
    let target: &web::EventTarget = ctx.window.as_ref();

    let c = ctx.clone();
    listeners.add_passive(target, "touchstart", move |ev| {
        if !c.alive() {
            return;
        }
        if let Some((x, y)) = first_touch(&ev) {
            let now = c.clock.now_ms();
            c.engine.borrow_mut().touch_started(x, y, now);
            c.frame_loop.wake();
        }
    });

    let c = ctx.clone();
    listeners.add_passive(target, "touchmove", move |ev| {
        if !c.alive() {
            return;
        }
        if let Some((x, y)) = first_touch(&ev) {
            let now = c.clock.now_ms();
            c.engine.borrow_mut().touch_moved(x, y, now);
        }
    });

    for event in ["touchend", "touchcancel"] {
        let c = ctx.clone();
        listeners.add_passive(target, event, move |_ev| {
            if c.alive() {
                c.engine.borrow_mut().touch_ended();
            }
        });
    }
}
