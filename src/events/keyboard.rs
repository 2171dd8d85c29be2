use super::{EventContext, Listeners};
use wasm_bindgen::JsCast;
use web_sys as web;

/// Keys that produce no visible typing and should not feed the burst.
#[inline]
pub fn is_modifier_key(key: &str) -> bool {
    matches!(
        key,
        "Shift" | "Control" | "Alt" | "Meta" | "CapsLock" | "Fn" | "AltGraph" | "Tab" | "Escape"
    )
}

pub fn wire(ctx: &EventContext, listeners: &mut Listeners) {
    let c = ctx.clone();
    let target: &web::EventTarget = ctx.window.as_ref();
    listeners.add(target, "keydown", move |ev| {
        if !c.alive() {
            return;
        }
        let Some(ev) = ev.dyn_ref::<web::KeyboardEvent>() else {
            return;
        };
        if ev.repeat() || is_modifier_key(&ev.key()) {
            return;
        }
        let now = c.clock.now_ms();
        c.engine.borrow_mut().key_pressed(now);
        c.frame_loop.wake();
    });
}
