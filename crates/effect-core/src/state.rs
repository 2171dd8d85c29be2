//! Decaying impulse state and pointer tracking.
//!
//! `EffectState` is written by the input adapters between frames and by its
//! own [`EffectState::tick`] at the start of each computed frame. The effect
//! calculator only reads it, after `tick` has finished.

use crate::config::Config;
use crate::constants::{AMPLITUDE_FLOOR, CADENCE_MAX_SAMPLES};
use glam::Vec2;
use rand::prelude::*;
use std::collections::VecDeque;

/// Named transient input amplitudes, each in \[0, 1\].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Impulse {
    Click,
    Keyboard,
    Tap,
    TiltVertical,
    TiltHorizontal,
}

impl Impulse {
    pub const ALL: [Impulse; 5] = [
        Impulse::Click,
        Impulse::Keyboard,
        Impulse::Tap,
        Impulse::TiltVertical,
        Impulse::TiltHorizontal,
    ];

    #[inline]
    fn slot(self) -> usize {
        self as usize
    }

    /// How a new amount combines with the current amplitude.
    pub fn combine(self) -> Combine {
        match self {
            Impulse::Click | Impulse::Keyboard | Impulse::Tap => Combine::Additive,
            Impulse::TiltVertical | Impulse::TiltHorizontal => Combine::Absolute,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Combine {
    /// `min(1, current + amount)`
    Additive,
    /// `clamp(amount, 0, 1)`
    Absolute,
}

#[derive(Clone, Debug, Default)]
pub struct PointerState {
    /// `None` until the first pointer or touch sample.
    pub position: Option<Vec2>,
    /// Instantaneous speed in px/s.
    pub velocity: f32,
    pub last_update_ms: Option<f64>,
}

/// Rolling burst rate mapped to a 0..1 factor.
#[derive(Clone, Debug)]
pub struct CadenceTracker {
    bursts: VecDeque<f64>,
    factor: f32,
}

impl Default for CadenceTracker {
    fn default() -> Self {
        Self {
            bursts: VecDeque::with_capacity(CADENCE_MAX_SAMPLES),
            factor: 0.0,
        }
    }
}

impl CadenceTracker {
    pub fn record(&mut self, now_ms: f64) {
        if self.bursts.len() == CADENCE_MAX_SAMPLES {
            self.bursts.pop_front();
        }
        self.bursts.push_back(now_ms);
    }

    pub fn factor(&self) -> f32 {
        self.factor
    }

    pub fn last_burst_ms(&self) -> Option<f64> {
        self.bursts.back().copied()
    }

    fn update(&mut self, now_ms: f64, window_ms: f64, rate_for_max: f32, idle_timeout_ms: f64, idle_decay: f32) {
        while let Some(&t) = self.bursts.front() {
            if now_ms - t > window_ms {
                self.bursts.pop_front();
            } else {
                break;
            }
        }
        let idle = match self.bursts.back() {
            Some(&last) => now_ms - last > idle_timeout_ms,
            None => true,
        };
        if idle {
            self.factor *= idle_decay;
            if self.factor < AMPLITUDE_FLOOR {
                self.factor = 0.0;
            }
        } else {
            let rate = self.bursts.len() as f32 / (window_ms as f32 / 1000.0);
            self.factor = (rate / rate_for_max).clamp(0.0, 1.0);
        }
    }
}

pub struct EffectState {
    pub pointer: PointerState,
    amplitudes: [f32; 5],
    decay: [f32; 5],
    pub keyboard_cadence: CadenceTracker,
    pub tap_cadence: CadenceTracker,
    chaos_phase: f32,
    rng: StdRng,
    max_velocity: f32,
    velocity_decay: f32,
    window_ms: f64,
    rate_for_max: f32,
    idle_timeout_ms: f64,
    idle_decay: f32,
}

impl EffectState {
    pub fn new(config: &Config) -> Self {
        let i = &config.impulses;
        let c = &config.cadence;
        Self {
            pointer: PointerState::default(),
            amplitudes: [0.0; 5],
            decay: [
                i.click.decay,
                i.keyboard.decay,
                i.tap.decay,
                i.tilt.decay,
                i.tilt.decay,
            ],
            keyboard_cadence: CadenceTracker::default(),
            tap_cadence: CadenceTracker::default(),
            chaos_phase: 0.0,
            rng: StdRng::seed_from_u64(config.seed),
            max_velocity: config.pointer.max_velocity,
            velocity_decay: config.pointer.velocity_decay,
            window_ms: c.window_ms,
            rate_for_max: c.rate_for_max,
            idle_timeout_ms: c.idle_timeout_ms,
            idle_decay: c.idle_decay,
        }
    }

    #[inline]
    pub fn amplitude(&self, impulse: Impulse) -> f32 {
        self.amplitudes[impulse.slot()]
    }

    /// Sum of every impulse amplitude.
    pub fn total_magnitude(&self) -> f32 {
        self.amplitudes.iter().sum()
    }

    /// Sum of the burst impulses (click, keyboard, tap), clamped to 1.
    pub fn burst_energy(&self) -> f32 {
        (self.amplitude(Impulse::Click)
            + self.amplitude(Impulse::Keyboard)
            + self.amplitude(Impulse::Tap))
        .min(1.0)
    }

    /// Phase offset re-drawn on every keyboard burst.
    pub fn chaos_phase(&self) -> f32 {
        self.chaos_phase
    }

    /// Combine `amount` into `impulse` per its [`Combine`] rule.
    ///
    /// Non-finite amounts are ignored. Keyboard and tap bursts are also
    /// recorded for cadence tracking.
    pub fn register_impulse(&mut self, impulse: Impulse, amount: f32, now_ms: f64) {
        if !amount.is_finite() {
            return;
        }
        let slot = &mut self.amplitudes[impulse.slot()];
        *slot = match impulse.combine() {
            Combine::Additive => (*slot + amount.max(0.0)).min(1.0),
            Combine::Absolute => amount.clamp(0.0, 1.0),
        };
        match impulse {
            Impulse::Keyboard => {
                self.keyboard_cadence.record(now_ms);
                self.chaos_phase = self.rng.gen_range(0.0..std::f32::consts::TAU);
            }
            Impulse::Tap => self.tap_cadence.record(now_ms),
            _ => {}
        }
    }

    /// Apply one frame of decay to every impulse and update cadence factors.
    pub fn tick(&mut self, now_ms: f64) {
        for (amp, decay) in self.amplitudes.iter_mut().zip(self.decay.iter()) {
            *amp *= *decay;
            if *amp < AMPLITUDE_FLOOR {
                *amp = 0.0;
            }
        }
        self.pointer.velocity *= self.velocity_decay;
        if self.pointer.velocity < AMPLITUDE_FLOOR {
            self.pointer.velocity = 0.0;
        }
        let (w, r, t, d) = (
            self.window_ms,
            self.rate_for_max,
            self.idle_timeout_ms,
            self.idle_decay,
        );
        self.keyboard_cadence.update(now_ms, w, r, t, d);
        self.tap_cadence.update(now_ms, w, r, t, d);
    }

    /// Store a new pointer sample, deriving velocity from the previous one.
    pub fn update_pointer(&mut self, x: f32, y: f32, now_ms: f64) {
        if !(x.is_finite() && y.is_finite()) {
            return;
        }
        let next = Vec2::new(x, y);
        let p = &mut self.pointer;
        p.velocity = match (p.position, p.last_update_ms) {
            (Some(prev), Some(last)) => {
                // sub-millisecond deltas would blow the speed up
                let dt_sec = ((now_ms - last).max(1.0) / 1000.0) as f32;
                (prev.distance(next) / dt_sec).min(self.max_velocity)
            }
            _ => 0.0,
        };
        p.position = Some(next);
        p.last_update_ms = Some(now_ms);
    }

    /// Forget the pointer position (pointer left the page or touch ended).
    pub fn clear_pointer(&mut self) {
        self.pointer = PointerState::default();
    }
}
