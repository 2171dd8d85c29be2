pub mod keyboard;
pub mod lifecycle;
pub mod orientation;
pub mod pointer;
pub mod touch;

use crate::frame::{LoopHandle, PerfClock};
use crate::surface::SharedElements;
use effect_core::EffectEngine;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Everything an event handler may touch.
#[derive(Clone)]
pub struct EventContext {
    pub window: web::Window,
    pub document: web::Document,
    pub engine: Rc<RefCell<EffectEngine>>,
    pub elements: SharedElements,
    pub clock: PerfClock,
    pub frame_loop: LoopHandle,
}

impl EventContext {
    /// Engine still live; handlers bail out otherwise.
    #[inline]
    pub fn alive(&self) -> bool {
        self.engine.borrow().is_alive()
    }
}

type Handler = Closure<dyn FnMut(web::Event)>;

/// Registered listeners, kept so teardown can remove every one of them.
#[derive(Default)]
pub struct Listeners {
    entries: Vec<(web::EventTarget, &'static str, Handler)>,
}

impl Listeners {
    pub fn add(
        &mut self,
        target: &web::EventTarget,
        event: &'static str,
        handler: impl FnMut(web::Event) + 'static,
    ) {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
        match target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
            Ok(()) => self.entries.push((target.clone(), event, closure)),
            Err(e) => log::warn!("[events] could not listen for {}: {:?}", event, e),
        }
    }

    /// Same as [`Listeners::add`] but registered as passive (touch, scroll).
    pub fn add_passive(
        &mut self,
        target: &web::EventTarget,
        event: &'static str,
        handler: impl FnMut(web::Event) + 'static,
    ) {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
        let options = web::AddEventListenerOptions::new();
        options.set_passive(true);
        match target.add_event_listener_with_callback_and_add_event_listener_options(
            event,
            closure.as_ref().unchecked_ref(),
            &options,
        ) {
            Ok(()) => self.entries.push((target.clone(), event, closure)),
            Err(e) => log::warn!("[events] could not listen for {}: {:?}", event, e),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn remove_all(&mut self) {
        for (target, event, closure) in self.entries.drain(..) {
            _ = target.remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        }
    }
}

pub fn wire_all(ctx: &EventContext, listeners: &mut Listeners) {
    pointer::wire(ctx, listeners);
    keyboard::wire(ctx, listeners);
    touch::wire(ctx, listeners);
    orientation::wire(ctx, listeners);
    lifecycle::wire(ctx, listeners);
    log::info!("[events] {} listeners registered", listeners.len());
}
