use crate::overlay::Overlay;
use crate::surface::{CssSurface, DomGeometry};
use effect_core::{Clock, EffectEngine, FrameReport, SchedulerState};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Milliseconds since the front-end started.
#[derive(Clone, Copy)]
pub struct PerfClock {
    origin: Instant,
}

impl PerfClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    #[inline]
    pub fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

impl Default for PerfClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for PerfClock {
    fn now_ms(&self) -> f64 {
        PerfClock::now_ms(self)
    }
}

enum Pending {
    Idle,
    Frame(i32),
    Timeout(i32),
}

pub struct FrameLoop {
    engine: Rc<RefCell<EffectEngine>>,
    geometry: DomGeometry,
    surface: CssSurface,
    overlay: Option<Overlay>,
    clock: PerfClock,
    pending: Pending,
}

impl FrameLoop {
    pub fn new(
        engine: Rc<RefCell<EffectEngine>>,
        geometry: DomGeometry,
        surface: CssSurface,
        overlay: Option<Overlay>,
        clock: PerfClock,
    ) -> Self {
        Self {
            engine,
            geometry,
            surface,
            overlay,
            clock,
            pending: Pending::Idle,
        }
    }

    fn step(&mut self) -> FrameReport {
        let mut engine = self.engine.borrow_mut();
        let report = engine.frame(&self.clock, &mut self.geometry, &mut self.surface);
        if let (FrameReport::Computed { .. }, Some(overlay)) = (report, self.overlay.as_mut()) {
            let uniforms = engine.overlay_uniforms(self.clock.now_ms(), overlay.resolution());
            overlay.draw(&uniforms);
        }
        if let FrameReport::Computed {
            cost_ms,
            next_delay_ms,
            ..
        } = report
        {
            if next_delay_ms > 0.0 {
                log::debug!(
                    "[frame] overrun {:.1}ms, delaying next tick {:.1}ms",
                    cost_ms,
                    next_delay_ms
                );
            }
        }
        report
    }
}

/// Drives a [`FrameLoop`] from `requestAnimationFrame`, falling back to a
/// timeout when the scheduler asks for a delay.
#[derive(Clone)]
pub struct LoopHandle {
    inner: Rc<RefCell<FrameLoop>>,
    tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
}

impl LoopHandle {
    pub fn new(frame_loop: FrameLoop) -> Self {
        Self {
            inner: Rc::new(RefCell::new(frame_loop)),
            tick: Rc::new(RefCell::new(None)),
        }
    }

    pub fn start(&self) {
        let handle = self.clone();
        *self.tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            handle.on_tick();
        }) as Box<dyn FnMut()>));
        self.schedule(0.0);
    }

    fn on_tick(&self) {
        let report = {
            let mut fl = self.inner.borrow_mut();
            fl.pending = Pending::Idle;
            fl.step()
        };
        match report.reschedule() {
            Some(delay_ms) => self.schedule(delay_ms),
            None => log::debug!("[frame] loop idle ({:?})", report),
        }
    }

    fn schedule(&self, delay_ms: f32) {
        let Some(window) = web::window() else {
            return;
        };
        let tick = self.tick.borrow();
        let Some(cb) = tick.as_ref() else {
            return;
        };
        let f: &js_sys::Function = cb.as_ref().unchecked_ref();
        let pending = if delay_ms > 0.0 {
            window
                .set_timeout_with_callback_and_timeout_and_arguments_0(f, delay_ms.ceil() as i32)
                .map(Pending::Timeout)
        } else {
            window.request_animation_frame(f).map(Pending::Frame)
        };
        match pending {
            Ok(p) => self.inner.borrow_mut().pending = p,
            Err(e) => log::error!("[frame] could not schedule tick: {:?}", e),
        }
    }

    /// Restart ticking after a park, if the engine is running again.
    pub fn wake(&self) {
        if self.tick.borrow().is_none() {
            return;
        }
        let should_start = {
            let fl = self.inner.borrow();
            let engine = fl.engine.borrow();
            matches!(fl.pending, Pending::Idle)
                && engine.is_alive()
                && engine.scheduler().state() == SchedulerState::Running
        };
        if should_start {
            log::debug!("[frame] waking loop");
            self.schedule(0.0);
        }
    }

    pub fn resized(&self) {
        if let Some(overlay) = &self.inner.borrow().overlay {
            overlay.sync_backing_size();
        }
        self.wake();
    }

    /// Cancel the pending tick and release the loop closure.
    pub fn stop(&self) {
        if let Some(window) = web::window() {
            let pending = std::mem::replace(&mut self.inner.borrow_mut().pending, Pending::Idle);
            match pending {
                Pending::Frame(id) => {
                    _ = window.cancel_animation_frame(id);
                }
                Pending::Timeout(id) => window.clear_timeout_with_handle(id),
                Pending::Idle => {}
            }
        }
        self.tick.borrow_mut().take();
    }
}
