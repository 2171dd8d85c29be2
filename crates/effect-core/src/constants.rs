// Default tuning constants for the effect engine.
//
// `EngineConfig::default()` is assembled from these; pages can override any of
// them through the JSON config block, but validation keeps them in range.

// Variable-font weight axis ('wght')
pub const WEIGHT_MIN: f32 = 100.0;
pub const WEIGHT_MAX: f32 = 900.0;
pub const WEIGHT_BASE: f32 = 400.0; // resting weight with no input

// Custom distortion axis ('DIST')
pub const DISTORTION_MAX: f32 = 100.0;

// Pointer proximity
pub const MOUSE_RANGE: f32 = 250.0; // px; effect is zero at and beyond this distance
pub const POINTER_WEIGHT_GAIN: f32 = 500.0; // base + gain == WEIGHT_MAX at the target center
pub const POINTER_DISTORTION_GAIN: f32 = 60.0;
pub const POINTER_VELOCITY_DISTORTION_GAIN: f32 = 30.0;
pub const POINTER_MAX_VELOCITY: f32 = 4000.0; // px/s
pub const POINTER_VELOCITY_DECAY: f32 = 0.85; // per tick

// Per-tick geometric decay factors
pub const DECAY_CLICK: f32 = 0.95;
pub const DECAY_KEYBOARD: f32 = 0.92;
pub const DECAY_TAP: f32 = 0.93;
pub const DECAY_TILT: f32 = 0.97;

// Burst sizes fed by the input adapters
pub const CLICK_AMOUNT: f32 = 1.0;
pub const KEYBOARD_AMOUNT: f32 = 0.35;
pub const TAP_AMOUNT: f32 = 0.6;

// Baseline impulse gains
pub const CLICK_WEIGHT_GAIN: f32 = 200.0;
pub const CLICK_DISTORTION_GAIN: f32 = 40.0;
pub const KEYBOARD_WEIGHT_GAIN: f32 = 150.0;
pub const KEYBOARD_DISTORTION_GAIN: f32 = 55.0;
pub const TAP_WEIGHT_GAIN: f32 = 180.0;
pub const TAP_DISTORTION_GAIN: f32 = 45.0;
pub const TILT_WEIGHT_GAIN: f32 = 120.0;
pub const TILT_DISTORTION_GAIN: f32 = 35.0;

// Orientation neutral pose (degrees) and span mapped to a full tilt
pub const TILT_NEUTRAL_BETA: f32 = 45.0; // phone held at a comfortable reading angle
pub const TILT_NEUTRAL_GAMMA: f32 = 0.0;
pub const TILT_SPAN_DEG: f32 = 45.0;

// Cadence ("typing chaos") tracking
pub const CADENCE_WINDOW_MS: f64 = 1500.0;
pub const CADENCE_RATE_FOR_MAX: f32 = 8.0; // bursts per second that saturate the factor
pub const CADENCE_IDLE_TIMEOUT_MS: f64 = 800.0;
pub const CADENCE_IDLE_DECAY: f32 = 0.9; // per tick once idle
pub const CADENCE_MAX_SAMPLES: usize = 16;

// Quality adaptation
pub const TARGET_FPS: f32 = 60.0;
pub const QUALITY_HISTORY_LEN: usize = 60;
pub const QUALITY_MIN_SAMPLES: usize = 30;
pub const QUALITY_MIN_LEVEL: f32 = 0.3;
pub const QUALITY_DEGRADE_MARGIN: f32 = 0.2; // avg above budget*(1+margin) degrades
pub const QUALITY_RECOVER_MARGIN: f32 = 0.3; // avg below budget*(1-margin) recovers
pub const QUALITY_DEGRADE_STEP: f32 = 0.95;
pub const QUALITY_RECOVER_STEP: f32 = 1.02;

// Wave complexity thresholds on the quality level
pub const QUALITY_FULL_WAVES: f32 = 0.75;
pub const QUALITY_REDUCED_WAVES: f32 = 0.45;

// Scheduler
pub const OVERRUN_FACTOR: f32 = 1.5; // cost above budget*factor delays the next tick
pub const IDLE_TIMEOUT_MS: f64 = 2000.0;
pub const IDLE_FRAMES_BEFORE_THROTTLE: u32 = 30;
pub const IDLE_FRAME_STRIDE: u32 = 12; // compute 1 of every N ticks while throttled

// Input throttles (minimum ms between accepted events)
pub const POINTER_THROTTLE_MS: f64 = 16.0;
pub const KEYBOARD_THROTTLE_MS: f64 = 30.0;
pub const TOUCH_THROTTLE_MS: f64 = 16.0;
pub const ORIENTATION_THROTTLE_MS: f64 = 50.0;

// Target registry
pub const GEOMETRY_CACHE_MS: f64 = 100.0;
pub const APPLY_EPSILON: f32 = 0.05;

// Pane grid
pub const PANE_SIZE: f32 = 140.0; // px
pub const MAX_PANES: usize = 240;

// Impulse magnitudes below this skip the baseline computation
pub const NEGLIGIBLE_IMPULSE: f32 = 1e-3;
// Amplitudes below this snap to zero
pub const AMPLITUDE_FLOOR: f32 = 1e-4;

// Wave terms used by the pointer effect: (frequency rad/s, phase per target index)
pub const POINTER_WAVES: [(f32, f32); 3] = [(2.1, 0.45), (3.7, 0.9), (5.3, 1.35)];
pub const BASELINE_PHASE_STEP: f32 = 0.35; // rad per target index

pub const DEFAULT_SEED: u64 = 42;
