//! Pure mapping from (state, target geometry, time, quality) to weight and
//! distortion values.
//!
//! Pointer effect at the exact center of a target, default config:
//! `falloff = 1`, `eased = 1`, `weight = pointer.weight_gain = 500`, so the
//! combined weight is `weight.base + 500 = 900 = weight.max`.

use crate::config::Config;
use crate::constants::{
    BASELINE_PHASE_STEP, NEGLIGIBLE_IMPULSE, POINTER_WAVES, QUALITY_FULL_WAVES,
    QUALITY_REDUCED_WAVES,
};
use crate::registry::Geometry;
use crate::state::{EffectState, Impulse};
use smallvec::SmallVec;

/// A weight/distortion pair, either a contribution or the final applied value.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Effect {
    pub weight: f32,
    pub distortion: f32,
}

impl Effect {
    pub const ZERO: Effect = Effect {
        weight: 0.0,
        distortion: 0.0,
    };

    #[inline]
    pub fn new(weight: f32, distortion: f32) -> Self {
        Self { weight, distortion }
    }
}

/// Number of superposed sinusoids allowed at a quality level.
#[inline]
pub fn wave_terms(quality: f32) -> usize {
    if quality >= QUALITY_FULL_WAVES {
        3
    } else if quality >= QUALITY_REDUCED_WAVES {
        2
    } else {
        1
    }
}

/// Linear falloff for a distance, 1 at the center and 0 at `range`.
#[inline]
pub fn falloff(distance: f32, range: f32) -> f32 {
    (1.0 - distance / range).clamp(0.0, 1.0)
}

#[inline]
fn smoothstep(x: f32) -> f32 {
    x * x * (3.0 - 2.0 * x)
}

pub fn compute_pointer_effect(
    geometry: &Geometry,
    index: usize,
    state: &EffectState,
    time_sec: f32,
    quality: f32,
    config: &Config,
) -> Effect {
    let Some(pointer) = state.pointer.position else {
        return Effect::ZERO;
    };
    let p = &config.pointer;
    let d2 = pointer.distance_squared(geometry.center());
    // most targets are far from the pointer; skip the sqrt for them
    if !(d2 < p.range * p.range) {
        return Effect::ZERO;
    }
    let eased = smoothstep(falloff(d2.sqrt(), p.range));

    let phase_index = index as f32;
    let terms: SmallVec<[f32; 3]> = POINTER_WAVES
        .iter()
        .take(wave_terms(quality))
        .map(|(freq, phase)| (time_sec * freq + phase_index * phase).sin())
        .collect();
    let wave = terms.iter().sum::<f32>() / terms.len() as f32;

    let speed = (state.pointer.velocity / p.max_velocity).clamp(0.0, 1.0);
    Effect {
        weight: eased * p.weight_gain,
        distortion: eased
            * (p.distortion_gain * (0.75 + 0.25 * wave * quality)
                + p.velocity_distortion_gain * speed),
    }
}

pub fn compute_baseline_effect(
    index: usize,
    state: &EffectState,
    time_sec: f32,
    quality: f32,
    config: &Config,
) -> Effect {
    let base = config.weight.base;
    if state.total_magnitude() < NEGLIGIBLE_IMPULSE {
        return Effect::new(base, 0.0);
    }
    let g = &config.impulses;
    let click = state.amplitude(Impulse::Click);
    let keyboard = state.amplitude(Impulse::Keyboard);
    let tap = state.amplitude(Impulse::Tap);
    let tilt_v = state.amplitude(Impulse::TiltVertical);
    let tilt_h = state.amplitude(Impulse::TiltHorizontal);
    let key_chaos = state.keyboard_cadence.factor();
    let tap_chaos = state.tap_cadence.factor();

    let phi = index as f32 * BASELINE_PHASE_STEP;
    let terms = wave_terms(quality);
    // oscillating factor in 0..1; flattened to 1 at the lowest quality tier
    let osc = |arg: f32| if terms > 1 { 0.5 + 0.5 * arg.sin() } else { 1.0 };

    let mut weight = base
        + click * g.click.weight_gain
        + tap * g.tap.weight_gain
        + keyboard * g.keyboard.weight_gain * (0.5 + 0.5 * key_chaos);
    if tilt_v > 0.0 {
        weight += tilt_v * g.tilt.weight_gain * (phi + time_sec * 1.3).sin();
    }

    let mut distortion = click * g.click.distortion_gain * osc(time_sec * 6.0 + phi)
        + tap * g.tap.distortion_gain * (0.6 + 0.4 * tap_chaos) * osc(time_sec * 4.5 + phi)
        + keyboard
            * g.keyboard.distortion_gain
            * key_chaos
            * (0.5 + 0.5 * (phi * 3.0 + state.chaos_phase()).sin());
    if terms >= 3 && tilt_h > 0.0 {
        distortion += tilt_h * g.tilt.distortion_gain * (0.5 + 0.5 * (phi + time_sec * 0.8).cos());
    }

    Effect { weight, distortion }
}

/// Sum baseline and pointer contributions and clamp both axes to the
/// configured ranges.
pub fn combine(baseline: Effect, pointer: Effect, config: &Config) -> Effect {
    let weight = baseline.weight + pointer.weight;
    let distortion = baseline.distortion + pointer.distortion;
    if !(weight.is_finite() && distortion.is_finite()) {
        return Effect::new(config.weight.base, 0.0);
    }
    Effect {
        weight: weight.clamp(config.weight.min, config.weight.max),
        distortion: distortion.clamp(0.0, config.distortion.max),
    }
}
