// Host-side tests for the overlay uniform block.

use effect_core::{Config, EffectState, Impulse, OverlayUniforms};

#[test]
fn block_matches_std140_size() {
    // three vec4 slots
    assert_eq!(std::mem::size_of::<OverlayUniforms>(), 48);
    assert_eq!(bytemuck::bytes_of(&OverlayUniforms::default()).len(), 48);
}

#[test]
fn time_alone_does_not_count_as_a_change() {
    let s = EffectState::new(&Config::default());
    let a = OverlayUniforms::from_state(&s, [800.0, 600.0], 1.0, 1.0, 4000.0);
    let b = OverlayUniforms::from_state(&s, [800.0, 600.0], 2.0, 1.0, 4000.0);
    assert!(!b.changed_from(&a, 1e-3));
}

#[test]
fn bursts_and_tilt_are_reported() {
    let mut s = EffectState::new(&Config::default());
    let a = OverlayUniforms::from_state(&s, [800.0, 600.0], 0.0, 1.0, 4000.0);
    s.register_impulse(Impulse::Click, 0.5, 0.0);
    s.register_impulse(Impulse::TiltHorizontal, 0.25, 0.0);
    let b = OverlayUniforms::from_state(&s, [800.0, 600.0], 0.0, 1.0, 4000.0);
    assert_eq!(b.energy, 0.5);
    assert_eq!(b.tilt, [0.25, 0.0]);
    assert!(b.changed_from(&a, 1e-3));
}
