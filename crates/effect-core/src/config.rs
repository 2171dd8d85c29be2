//! Engine configuration.
//!
//! [`EngineConfig`] is the loose, deserializable form (every field defaults to
//! the values in [`crate::constants`]). [`EngineConfig::validate`] checks every
//! bound once and produces an immutable [`Config`], which is the only form the
//! engine accepts.

use crate::constants::*;
use crate::error::ConfigError;
use serde::{Deserialize, Deserializer, Serialize};
use std::ops::Deref;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightRange {
    pub min: f32,
    pub max: f32,
    pub base: f32,
}

impl Default for WeightRange {
    fn default() -> Self {
        Self {
            min: WEIGHT_MIN,
            max: WEIGHT_MAX,
            base: WEIGHT_BASE,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistortionRange {
    pub max: f32,
}

impl Default for DistortionRange {
    fn default() -> Self {
        Self {
            max: DISTORTION_MAX,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointerTuning {
    pub range: f32,
    pub weight_gain: f32,
    pub distortion_gain: f32,
    pub velocity_distortion_gain: f32,
    pub max_velocity: f32,
    pub velocity_decay: f32,
}

impl Default for PointerTuning {
    fn default() -> Self {
        Self {
            range: MOUSE_RANGE,
            weight_gain: POINTER_WEIGHT_GAIN,
            distortion_gain: POINTER_DISTORTION_GAIN,
            velocity_distortion_gain: POINTER_VELOCITY_DISTORTION_GAIN,
            max_velocity: POINTER_MAX_VELOCITY,
            velocity_decay: POINTER_VELOCITY_DECAY,
        }
    }
}

/// Decay factor and gains for one impulse.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImpulseGains {
    pub decay: f32,
    pub weight_gain: f32,
    pub distortion_gain: f32,
}

// A gains block may name any subset of its fields; the rest keep the
// defaults of the impulse it belongs to.
#[derive(Deserialize)]
struct PartialGains {
    decay: Option<f32>,
    weight_gain: Option<f32>,
    distortion_gain: Option<f32>,
}

impl PartialGains {
    fn over(self, base: ImpulseGains) -> ImpulseGains {
        ImpulseGains {
            decay: self.decay.unwrap_or(base.decay),
            weight_gain: self.weight_gain.unwrap_or(base.weight_gain),
            distortion_gain: self.distortion_gain.unwrap_or(base.distortion_gain),
        }
    }
}

fn click_gains<'de, D: Deserializer<'de>>(d: D) -> Result<ImpulseGains, D::Error> {
    Ok(PartialGains::deserialize(d)?.over(ImpulseTuning::default().click))
}

fn keyboard_gains<'de, D: Deserializer<'de>>(d: D) -> Result<ImpulseGains, D::Error> {
    Ok(PartialGains::deserialize(d)?.over(ImpulseTuning::default().keyboard))
}

fn tap_gains<'de, D: Deserializer<'de>>(d: D) -> Result<ImpulseGains, D::Error> {
    Ok(PartialGains::deserialize(d)?.over(ImpulseTuning::default().tap))
}

fn tilt_gains<'de, D: Deserializer<'de>>(d: D) -> Result<ImpulseGains, D::Error> {
    Ok(PartialGains::deserialize(d)?.over(ImpulseTuning::default().tilt))
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpulseTuning {
    #[serde(deserialize_with = "click_gains")]
    pub click: ImpulseGains,
    #[serde(deserialize_with = "keyboard_gains")]
    pub keyboard: ImpulseGains,
    #[serde(deserialize_with = "tap_gains")]
    pub tap: ImpulseGains,
    /// Shared by both tilt axes; weight follows vertical tilt, distortion horizontal.
    #[serde(deserialize_with = "tilt_gains")]
    pub tilt: ImpulseGains,
    pub click_amount: f32,
    pub keyboard_amount: f32,
    pub tap_amount: f32,
}

impl Default for ImpulseTuning {
    fn default() -> Self {
        Self {
            click: ImpulseGains {
                decay: DECAY_CLICK,
                weight_gain: CLICK_WEIGHT_GAIN,
                distortion_gain: CLICK_DISTORTION_GAIN,
            },
            keyboard: ImpulseGains {
                decay: DECAY_KEYBOARD,
                weight_gain: KEYBOARD_WEIGHT_GAIN,
                distortion_gain: KEYBOARD_DISTORTION_GAIN,
            },
            tap: ImpulseGains {
                decay: DECAY_TAP,
                weight_gain: TAP_WEIGHT_GAIN,
                distortion_gain: TAP_DISTORTION_GAIN,
            },
            tilt: ImpulseGains {
                decay: DECAY_TILT,
                weight_gain: TILT_WEIGHT_GAIN,
                distortion_gain: TILT_DISTORTION_GAIN,
            },
            click_amount: CLICK_AMOUNT,
            keyboard_amount: KEYBOARD_AMOUNT,
            tap_amount: TAP_AMOUNT,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CadenceTuning {
    pub window_ms: f64,
    pub rate_for_max: f32,
    pub idle_timeout_ms: f64,
    pub idle_decay: f32,
}

impl Default for CadenceTuning {
    fn default() -> Self {
        Self {
            window_ms: CADENCE_WINDOW_MS,
            rate_for_max: CADENCE_RATE_FOR_MAX,
            idle_timeout_ms: CADENCE_IDLE_TIMEOUT_MS,
            idle_decay: CADENCE_IDLE_DECAY,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityTuning {
    pub target_fps: f32,
    pub history_len: usize,
    pub min_samples: usize,
    pub min_level: f32,
    pub degrade_margin: f32,
    pub recover_margin: f32,
    pub degrade_step: f32,
    pub recover_step: f32,
}

impl QualityTuning {
    /// Per-frame budget in milliseconds.
    #[inline]
    pub fn budget_ms(&self) -> f32 {
        1000.0 / self.target_fps
    }
}

impl Default for QualityTuning {
    fn default() -> Self {
        Self {
            target_fps: TARGET_FPS,
            history_len: QUALITY_HISTORY_LEN,
            min_samples: QUALITY_MIN_SAMPLES,
            min_level: QUALITY_MIN_LEVEL,
            degrade_margin: QUALITY_DEGRADE_MARGIN,
            recover_margin: QUALITY_RECOVER_MARGIN,
            degrade_step: QUALITY_DEGRADE_STEP,
            recover_step: QUALITY_RECOVER_STEP,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerTuning {
    pub overrun_factor: f32,
    pub idle_timeout_ms: f64,
    pub idle_frames_before_throttle: u32,
    pub idle_frame_stride: u32,
}

impl Default for SchedulerTuning {
    fn default() -> Self {
        Self {
            overrun_factor: OVERRUN_FACTOR,
            idle_timeout_ms: IDLE_TIMEOUT_MS,
            idle_frames_before_throttle: IDLE_FRAMES_BEFORE_THROTTLE,
            idle_frame_stride: IDLE_FRAME_STRIDE,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrottleTuning {
    pub pointer_ms: f64,
    pub keyboard_ms: f64,
    pub touch_ms: f64,
    pub orientation_ms: f64,
}

impl Default for ThrottleTuning {
    fn default() -> Self {
        Self {
            pointer_ms: POINTER_THROTTLE_MS,
            keyboard_ms: KEYBOARD_THROTTLE_MS,
            touch_ms: TOUCH_THROTTLE_MS,
            orientation_ms: ORIENTATION_THROTTLE_MS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridTuning {
    pub pane_size: f32,
    pub max_panes: usize,
}

impl Default for GridTuning {
    fn default() -> Self {
        Self {
            pane_size: PANE_SIZE,
            max_panes: MAX_PANES,
        }
    }
}

/// Loose configuration as read from the page or built in code.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub weight: WeightRange,
    pub distortion: DistortionRange,
    pub pointer: PointerTuning,
    pub impulses: ImpulseTuning,
    pub cadence: CadenceTuning,
    pub quality: QualityTuning,
    pub scheduler: SchedulerTuning,
    pub throttle: ThrottleTuning,
    pub grid: GridTuning,
    pub cache_duration_ms: f64,
    pub apply_epsilon: f32,
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weight: WeightRange::default(),
            distortion: DistortionRange::default(),
            pointer: PointerTuning::default(),
            impulses: ImpulseTuning::default(),
            cadence: CadenceTuning::default(),
            quality: QualityTuning::default(),
            scheduler: SchedulerTuning::default(),
            throttle: ThrottleTuning::default(),
            grid: GridTuning::default(),
            cache_duration_ms: GEOMETRY_CACHE_MS,
            apply_epsilon: APPLY_EPSILON,
            seed: DEFAULT_SEED,
        }
    }
}

impl EngineConfig {
    /// Check every bound and freeze the configuration.
    pub fn validate(self) -> Result<Config, ConfigError> {
        let w = &self.weight;
        finite("weight.min", w.min)?;
        finite("weight.max", w.max)?;
        ordered("weight.min", w.min, "weight.max", w.max)?;
        within("weight.base", w.base, w.min, w.max)?;
        positive("distortion.max", self.distortion.max)?;

        let p = &self.pointer;
        positive("pointer.range", p.range)?;
        non_negative("pointer.weight_gain", p.weight_gain)?;
        non_negative("pointer.distortion_gain", p.distortion_gain)?;
        non_negative("pointer.velocity_distortion_gain", p.velocity_distortion_gain)?;
        positive("pointer.max_velocity", p.max_velocity)?;
        unit_open("pointer.velocity_decay", p.velocity_decay)?;

        let i = &self.impulses;
        for (name, g) in [
            ("impulses.click", &i.click),
            ("impulses.keyboard", &i.keyboard),
            ("impulses.tap", &i.tap),
            ("impulses.tilt", &i.tilt),
        ] {
            unit_open(name, g.decay)?;
            non_negative(name, g.weight_gain)?;
            non_negative(name, g.distortion_gain)?;
        }
        within("impulses.click_amount", i.click_amount, 0.0, 1.0)?;
        within("impulses.keyboard_amount", i.keyboard_amount, 0.0, 1.0)?;
        within("impulses.tap_amount", i.tap_amount, 0.0, 1.0)?;

        let c = &self.cadence;
        positive("cadence.window_ms", c.window_ms as f32)?;
        positive("cadence.rate_for_max", c.rate_for_max)?;
        non_negative("cadence.idle_timeout_ms", c.idle_timeout_ms as f32)?;
        unit_open("cadence.idle_decay", c.idle_decay)?;

        let q = &self.quality;
        positive("quality.target_fps", q.target_fps)?;
        if q.history_len == 0 {
            return Err(ConfigError::NotPositive {
                field: "quality.history_len",
                value: 0.0,
            });
        }
        if q.min_samples == 0 || q.min_samples > q.history_len {
            return Err(ConfigError::OutOfRange {
                field: "quality.min_samples",
                value: q.min_samples as f64,
                min: 1.0,
                max: q.history_len as f64,
            });
        }
        if !(q.min_level > 0.0 && q.min_level <= 1.0) {
            return Err(ConfigError::OutOfRange {
                field: "quality.min_level",
                value: q.min_level as f64,
                min: 0.0,
                max: 1.0,
            });
        }
        within("quality.degrade_margin", q.degrade_margin, 0.0, 4.0)?;
        within("quality.recover_margin", q.recover_margin, 0.0, 1.0)?;
        unit_open("quality.degrade_step", q.degrade_step)?;
        within("quality.recover_step", q.recover_step, 1.0, 2.0)?;

        let s = &self.scheduler;
        within("scheduler.overrun_factor", s.overrun_factor, 1.0, 10.0)?;
        non_negative("scheduler.idle_timeout_ms", s.idle_timeout_ms as f32)?;
        if s.idle_frame_stride == 0 {
            return Err(ConfigError::NotPositive {
                field: "scheduler.idle_frame_stride",
                value: 0.0,
            });
        }

        let t = &self.throttle;
        non_negative("throttle.pointer_ms", t.pointer_ms as f32)?;
        non_negative("throttle.keyboard_ms", t.keyboard_ms as f32)?;
        non_negative("throttle.touch_ms", t.touch_ms as f32)?;
        non_negative("throttle.orientation_ms", t.orientation_ms as f32)?;

        positive("grid.pane_size", self.grid.pane_size)?;
        if self.grid.max_panes == 0 {
            return Err(ConfigError::NotPositive {
                field: "grid.max_panes",
                value: 0.0,
            });
        }

        non_negative("cache_duration_ms", self.cache_duration_ms as f32)?;
        non_negative("apply_epsilon", self.apply_epsilon)?;

        Ok(Config(self))
    }
}

/// Validated, immutable engine configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct Config(EngineConfig);

impl Default for Config {
    fn default() -> Self {
        // the built-in defaults always pass validation (tests/config_tests.rs)
        Config(EngineConfig::default())
    }
}

impl Deref for Config {
    type Target = EngineConfig;
    fn deref(&self) -> &EngineConfig {
        &self.0
    }
}

fn finite(field: &'static str, v: f32) -> Result<(), ConfigError> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotPositive {
            field,
            value: v as f64,
        })
    }
}

fn positive(field: &'static str, v: f32) -> Result<(), ConfigError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive {
            field,
            value: v as f64,
        })
    }
}

fn non_negative(field: &'static str, v: f32) -> Result<(), ConfigError> {
    within(field, v, 0.0, f32::MAX)
}

fn within(field: &'static str, v: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    if v.is_finite() && v >= min && v <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value: v as f64,
            min: min as f64,
            max: max as f64,
        })
    }
}

// Decay-style factors: strictly inside (0, 1)
fn unit_open(field: &'static str, v: f32) -> Result<(), ConfigError> {
    if v.is_finite() && v > 0.0 && v < 1.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value: v as f64,
            min: 0.0,
            max: 1.0,
        })
    }
}

fn ordered(lower: &'static str, lo: f32, upper: &'static str, hi: f32) -> Result<(), ConfigError> {
    if lo < hi {
        Ok(())
    } else {
        Err(ConfigError::Inverted {
            lower,
            lower_value: lo as f64,
            upper,
            upper_value: hi as f64,
        })
    }
}
