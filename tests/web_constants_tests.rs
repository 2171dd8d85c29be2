// Host-side tests for the page wiring constants.
// The main crate is wasm-only, so we include the pure-Rust module directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}

use constants::*;

#[test]
fn selectors_match_marked_spans() {
    assert!(SPLIT_SELECTOR.starts_with("[data-") && SPLIT_SELECTOR.ends_with(']'));
    // split output carries `data-glyph`, which the glyph selector must match
    assert!(GLYPH_SELECTOR.split(',').any(|s| s.trim() == "[data-glyph]"));
    assert!(FIXED_ATTR.starts_with("data-"));
}

#[test]
fn element_ids_are_distinct() {
    let ids = [
        PANE_LAYER_ID,
        OVERLAY_CANVAS_ID,
        CONFIG_SCRIPT_ID,
        ORIENTATION_PROMPT_ID,
        ORIENTATION_ALLOW_ID,
        ORIENTATION_DENY_ID,
    ];
    for (i, a) in ids.iter().enumerate() {
        assert!(!a.is_empty());
        for b in &ids[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn fallback_and_timing_constants_are_sane() {
    assert!(PANE_WEIGHT_PROPERTY.starts_with("--"));
    assert!(PANE_DISTORTION_PROPERTY.starts_with("--"));
    assert!(FALLBACK_WEIGHT_STEP > 0.0);
    // full distortion stays a readable slant
    assert!(FALLBACK_SKEW_DEG_PER_UNIT * 100.0 <= 15.0);
    assert!(RESIZE_DEBOUNCE_MS > 0);
    assert!(OVERLAY_UNIFORM_EPS > 0.0);
}
