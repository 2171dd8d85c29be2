// Page wiring constants for the web front-end.

// Elements
pub const GLYPH_SELECTOR: &str = "[data-glyph], .glyph"; // spans driven by the engine
pub const SPLIT_SELECTOR: &str = "[data-split]"; // text split into glyph spans at startup
pub const FIXED_ATTR: &str = "data-fixed"; // glyphs excluded from per-frame effects
pub const PANE_LAYER_ID: &str = "pane-grid";
pub const PANE_CLASS: &str = "glass-pane";
pub const OVERLAY_CANVAS_ID: &str = "fx-overlay";
pub const CONFIG_SCRIPT_ID: &str = "effect-config"; // optional JSON overrides
pub const ORIENTATION_PROMPT_ID: &str = "orientation-prompt";
pub const ORIENTATION_ALLOW_ID: &str = "orientation-allow";
pub const ORIENTATION_DENY_ID: &str = "orientation-deny";

// Opt-outs
pub const DISABLE_QUERY_FLAG: &str = "effects=off";
pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

// CSS properties written by the surface
pub const FONT_VARIATION_PROPERTY: &str = "font-variation-settings";
pub const FONT_VARIATION_PROBE: &str = "'wght' 400"; // value used to feature-test variable fonts
pub const PANE_WEIGHT_PROPERTY: &str = "--pane-weight";
pub const PANE_DISTORTION_PROPERTY: &str = "--pane-distortion";

// Fallback transform for hosts without variable-font support
pub const FALLBACK_SKEW_DEG_PER_UNIT: f32 = 0.08; // skewX degrees per distortion unit
pub const FALLBACK_WEIGHT_STEP: f32 = 100.0; // static fonts only ship whole hundreds

// Resize debounce before regenerating the pane grid
pub const RESIZE_DEBOUNCE_MS: i32 = 150;

// Overlay uploads are skipped while uniforms move less than this
pub const OVERLAY_UNIFORM_EPS: f32 = 1e-3;
