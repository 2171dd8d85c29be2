//! Input adapters.
//!
//! Each adapter owns the impulse(s) it writes; no two adapters write the
//! same impulse. Every adapter has its own [`Throttle`].

use crate::config::{ImpulseTuning, ThrottleTuning};
use crate::constants::{TILT_NEUTRAL_BETA, TILT_NEUTRAL_GAMMA, TILT_SPAN_DEG};
use crate::state::{EffectState, Impulse};

/// Minimum interval between accepted events.
#[derive(Clone, Debug)]
pub struct Throttle {
    min_interval_ms: f64,
    last_ms: Option<f64>,
}

impl Throttle {
    pub fn new(min_interval_ms: f64) -> Self {
        Self {
            min_interval_ms,
            last_ms: None,
        }
    }

    /// True (and the event is counted) when at least the interval has passed.
    pub fn ready(&mut self, now_ms: f64) -> bool {
        match self.last_ms {
            Some(last) if now_ms - last < self.min_interval_ms => false,
            _ => {
                self.last_ms = Some(now_ms);
                true
            }
        }
    }
}

/// Pointer moves and presses. Sole writer of [`Impulse::Click`].
#[derive(Clone, Debug)]
pub struct PointerAdapter {
    throttle: Throttle,
    click_amount: f32,
}

impl PointerAdapter {
    pub fn new(throttle_ms: f64, click_amount: f32) -> Self {
        Self {
            throttle: Throttle::new(throttle_ms),
            click_amount,
        }
    }

    pub fn on_move(&mut self, state: &mut EffectState, x: f32, y: f32, now_ms: f64) -> bool {
        if !self.throttle.ready(now_ms) {
            return false;
        }
        state.update_pointer(x, y, now_ms);
        true
    }

    // presses are never throttled; a dropped click would be noticeable
    pub fn on_down(&mut self, state: &mut EffectState, now_ms: f64) -> bool {
        state.register_impulse(Impulse::Click, self.click_amount, now_ms);
        true
    }

    pub fn on_leave(&mut self, state: &mut EffectState) {
        state.clear_pointer();
    }
}

/// Key presses. Sole writer of [`Impulse::Keyboard`].
#[derive(Clone, Debug)]
pub struct KeyboardAdapter {
    throttle: Throttle,
    amount: f32,
}

impl KeyboardAdapter {
    pub fn new(throttle_ms: f64, amount: f32) -> Self {
        Self {
            throttle: Throttle::new(throttle_ms),
            amount,
        }
    }

    /// Faster typing makes each burst larger.
    pub fn on_key(&mut self, state: &mut EffectState, now_ms: f64) -> bool {
        if !self.throttle.ready(now_ms) {
            return false;
        }
        let scale = 0.6 + 0.4 * state.keyboard_cadence.factor();
        state.register_impulse(Impulse::Keyboard, self.amount * scale, now_ms);
        true
    }
}

/// Touch input. Sole writer of [`Impulse::Tap`].
#[derive(Clone, Debug)]
pub struct TouchAdapter {
    throttle: Throttle,
    amount: f32,
}

impl TouchAdapter {
    pub fn new(throttle_ms: f64, amount: f32) -> Self {
        Self {
            throttle: Throttle::new(throttle_ms),
            amount,
        }
    }

    pub fn on_touch_start(&mut self, state: &mut EffectState, x: f32, y: f32, now_ms: f64) -> bool {
        state.register_impulse(Impulse::Tap, self.amount, now_ms);
        state.update_pointer(x, y, now_ms);
        true
    }

    pub fn on_touch_move(&mut self, state: &mut EffectState, x: f32, y: f32, now_ms: f64) -> bool {
        if !self.throttle.ready(now_ms) {
            return false;
        }
        state.update_pointer(x, y, now_ms);
        true
    }

    pub fn on_touch_end(&mut self, state: &mut EffectState) {
        state.clear_pointer();
    }
}

/// One `deviceorientation` sample; any field may be missing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OrientationReading {
    pub alpha: Option<f64>,
    pub beta: Option<f64>,
    pub gamma: Option<f64>,
}

/// Tilt amplitudes derived from a reading.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tilt {
    pub vertical: f32,
    pub horizontal: f32,
}

#[inline]
fn finite_or(v: Option<f64>, neutral: f32) -> f32 {
    match v {
        Some(v) if v.is_finite() => v as f32,
        _ => neutral,
    }
}

impl OrientationReading {
    /// Map to clamped tilt amplitudes; missing or invalid angles read as the
    /// neutral pose (no tilt).
    pub fn tilt(&self) -> Tilt {
        let beta = finite_or(self.beta, TILT_NEUTRAL_BETA);
        let gamma = finite_or(self.gamma, TILT_NEUTRAL_GAMMA);
        Tilt {
            vertical: ((beta - TILT_NEUTRAL_BETA).abs() / TILT_SPAN_DEG).clamp(0.0, 1.0),
            horizontal: ((gamma - TILT_NEUTRAL_GAMMA).abs() / TILT_SPAN_DEG).clamp(0.0, 1.0),
        }
    }
}

/// Device tilt. Sole writer of [`Impulse::TiltVertical`] and
/// [`Impulse::TiltHorizontal`]; ignores readings until enabled.
#[derive(Clone, Debug)]
pub struct OrientationAdapter {
    throttle: Throttle,
    enabled: bool,
}

impl OrientationAdapter {
    pub fn new(throttle_ms: f64) -> Self {
        Self {
            throttle: Throttle::new(throttle_ms),
            enabled: false,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn on_reading(&mut self, state: &mut EffectState, reading: OrientationReading, now_ms: f64) -> bool {
        if !self.enabled || !self.throttle.ready(now_ms) {
            return false;
        }
        let tilt = reading.tilt();
        state.register_impulse(Impulse::TiltVertical, tilt.vertical, now_ms);
        state.register_impulse(Impulse::TiltHorizontal, tilt.horizontal, now_ms);
        true
    }
}

/// The full set of adapters owned by an engine.
#[derive(Clone, Debug)]
pub struct InputAdapters {
    pub pointer: PointerAdapter,
    pub keyboard: KeyboardAdapter,
    pub touch: TouchAdapter,
    pub orientation: OrientationAdapter,
}

impl InputAdapters {
    pub fn new(throttle: &ThrottleTuning, impulses: &ImpulseTuning) -> Self {
        Self {
            pointer: PointerAdapter::new(throttle.pointer_ms, impulses.click_amount),
            keyboard: KeyboardAdapter::new(throttle.keyboard_ms, impulses.keyboard_amount),
            touch: TouchAdapter::new(throttle.touch_ms, impulses.tap_amount),
            orientation: OrientationAdapter::new(throttle.orientation_ms),
        }
    }
}
