//! Device orientation input and its permission flow.
//!
//! Platforms that gate sensor access behind `DeviceOrientationEvent.requestPermission`
//! must call it from inside a user gesture. The decision is persisted so the
//! prompt is shown at most once.

use super::{EventContext, Listeners};
use crate::constants::{ORIENTATION_ALLOW_ID, ORIENTATION_DENY_ID, ORIENTATION_PROMPT_ID};
use crate::dom;
use crate::storage::LocalStorage;
use effect_core::{OrientationAccess, OrientationReading, PermissionFlag, PermissionStore};
use js_sys::{Function, Promise, Reflect};
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

fn permission_api() -> Option<(JsValue, Function)> {
    let ctor = Reflect::get(&js_sys::global(), &JsValue::from_str("DeviceOrientationEvent")).ok()?;
    if ctor.is_undefined() {
        return None;
    }
    let request = Reflect::get(&ctor, &JsValue::from_str("requestPermission"))
        .ok()?
        .dyn_into::<Function>()
        .ok()?;
    Some((ctor, request))
}

/// Must run synchronously inside a user gesture handler.
fn begin_request() -> anyhow::Result<Promise> {
    let (ctor, request) =
        permission_api().ok_or_else(|| anyhow::anyhow!("requestPermission unavailable"))?;
    request
        .call0(&ctor)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .dyn_into::<Promise>()
        .map_err(|e| anyhow::anyhow!("{:?}", e))
}

fn settle(ctx: &EventContext, promise: Promise) {
    let ctx = ctx.clone();
    spawn_local(async move {
        let granted = match JsFuture::from(promise).await {
            Ok(v) => v.as_string().as_deref() == Some("granted"),
            Err(e) => {
                log::warn!("[orientation] permission request failed: {:?}", e);
                false
            }
        };
        let flag = if granted {
            PermissionFlag::Granted
        } else {
            PermissionFlag::Denied
        };
        PermissionStore::new(LocalStorage).record(flag);
        log::info!("[orientation] permission {:?}", flag);
        if ctx.alive() {
            ctx.engine.borrow_mut().set_orientation_enabled(granted);
        }
    });
}

fn request_now(ctx: &EventContext) {
    match begin_request() {
        Ok(promise) => settle(ctx, promise),
        Err(e) => log::warn!("[orientation] {}", e),
    }
}

fn reading(ev: &web::Event) -> OrientationReading {
    match ev.dyn_ref::<web::DeviceOrientationEvent>() {
        Some(ev) => OrientationReading {
            alpha: ev.alpha(),
            beta: ev.beta(),
            gamma: ev.gamma(),
        },
        None => OrientationReading::default(),
    }
}

pub fn wire(ctx: &EventContext, listeners: &mut Listeners) {
    let target: &web::EventTarget = ctx.window.as_ref();
    let c = ctx.clone();
    listeners.add(target, "deviceorientation", move |ev| {
        if !c.alive() {
            return;
        }
        let now = c.clock.now_ms();
        c.engine.borrow_mut().orientation(reading(&ev), now);
    });

    let requires_gesture = permission_api().is_some();
    let flag = PermissionStore::new(LocalStorage).load();
    let access = OrientationAccess::decide(requires_gesture, flag);
    log::info!("[orientation] access {:?} (stored {:?})", access, flag);

    match access {
        OrientationAccess::Enabled => ctx.engine.borrow_mut().set_orientation_enabled(true),
        OrientationAccess::Disabled => {}
        OrientationAccess::RequestOnGesture => {
            // ask once on the first gesture; later gestures are ignored
            let asked = Rc::new(Cell::new(false));
            for event in ["pointerdown", "touchend"] {
                let c = ctx.clone();
                let asked = asked.clone();
                listeners.add(target, event, move |_ev| {
                    if asked.replace(true) || !c.alive() {
                        return;
                    }
                    request_now(&c);
                });
            }
        }
        OrientationAccess::Prompt => {
            dom::set_hidden(&ctx.document, ORIENTATION_PROMPT_ID, false);
            if let Some(allow) = ctx.document.get_element_by_id(ORIENTATION_ALLOW_ID) {
                let c = ctx.clone();
                listeners.add(allow.as_ref(), "click", move |_ev| {
                    if !c.alive() {
                        return;
                    }
                    dom::set_hidden(&c.document, ORIENTATION_PROMPT_ID, true);
                    request_now(&c);
                });
            }
            if let Some(deny) = ctx.document.get_element_by_id(ORIENTATION_DENY_ID) {
                let c = ctx.clone();
                listeners.add(deny.as_ref(), "click", move |_ev| {
                    if !c.alive() {
                        return;
                    }
                    dom::set_hidden(&c.document, ORIENTATION_PROMPT_ID, true);
                    PermissionStore::new(LocalStorage).record(PermissionFlag::Denied);
                    log::info!("[orientation] declined by user");
                });
            }
        }
    }
}
