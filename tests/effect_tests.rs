// Host-side tests for the effect calculator.

use effect_core::{
    combine, compute_baseline_effect, compute_pointer_effect, wave_terms, Config, Effect,
    EffectState, Geometry, Impulse,
};

// 20x20 box centred on (100, 100)
fn target() -> Geometry {
    Geometry::new(90.0, 90.0, 20.0, 20.0)
}

fn state_with_pointer(x: f32, y: f32) -> EffectState {
    let mut s = EffectState::new(&Config::default());
    s.update_pointer(x, y, 0.0);
    s
}

#[test]
fn pointer_at_center_reaches_max_weight() {
    let config = Config::default();
    let s = state_with_pointer(100.0, 100.0);
    let pointer = compute_pointer_effect(&target(), 0, &s, 0.0, 1.0, &config);
    assert_eq!(pointer.weight, 500.0);
    let baseline = compute_baseline_effect(0, &s, 0.0, 1.0, &config);
    let e = combine(baseline, pointer, &config);
    assert_eq!(e.weight, 900.0);
    assert!(e.distortion >= 30.0 && e.distortion <= 90.0);
}

#[test]
fn pointer_effect_is_zero_at_and_beyond_range() {
    let config = Config::default();
    let origin = Geometry::new(0.0, 0.0, 0.0, 0.0);
    for x in [250.0, 251.0, 600.0] {
        let s = state_with_pointer(x, 0.0);
        let e = compute_pointer_effect(&origin, 3, &s, 1.5, 1.0, &config);
        assert_eq!(e, Effect::ZERO, "distance {}", x);
    }
    let s = state_with_pointer(249.0, 0.0);
    assert!(compute_pointer_effect(&origin, 3, &s, 1.5, 1.0, &config).weight > 0.0);
}

#[test]
fn pointer_effect_falls_off_with_distance() {
    let config = Config::default();
    let origin = Geometry::new(0.0, 0.0, 0.0, 0.0);
    let weights: Vec<f32> = [0.0, 50.0, 100.0, 200.0]
        .iter()
        .map(|d| {
            let s = state_with_pointer(*d, 0.0);
            compute_pointer_effect(&origin, 0, &s, 0.0, 1.0, &config).weight
        })
        .collect();
    assert!(weights.windows(2).all(|w| w[0] > w[1]), "{:?}", weights);
}

#[test]
fn no_pointer_means_no_pointer_effect() {
    let config = Config::default();
    let s = EffectState::new(&config);
    assert_eq!(
        compute_pointer_effect(&target(), 0, &s, 0.0, 1.0, &config),
        Effect::ZERO
    );
}

#[test]
fn resting_baseline_is_base_weight_without_distortion() {
    let config = Config::default();
    let s = EffectState::new(&config);
    for index in [0, 7, 131] {
        for t in [0.0, 2.5, 90.0] {
            let e = compute_baseline_effect(index, &s, t, 1.0, &config);
            assert_eq!(e, Effect::new(400.0, 0.0));
        }
    }
}

#[test]
fn lowest_quality_flattens_burst_oscillation() {
    let config = Config::default();
    let mut s = EffectState::new(&config);
    s.register_impulse(Impulse::Click, 1.0, 0.0);
    // a single wave term: click distortion is the bare gain
    let e = compute_baseline_effect(5, &s, 3.3, 0.3, &config);
    assert_eq!(e.weight, 600.0);
    assert_eq!(e.distortion, 40.0);
}

#[test]
fn combined_output_stays_in_range_under_maximal_input() {
    let config = Config::default();
    let mut s = state_with_pointer(0.0, 0.0);
    s.update_pointer(100.0, 100.0, 1.0);
    for impulse in Impulse::ALL {
        s.register_impulse(impulse, 1.0, 1.0);
    }
    for index in 0..40 {
        for step in 0..50 {
            let t = step as f32 * 0.137;
            for quality in [1.0, 0.6, 0.3] {
                let b = compute_baseline_effect(index, &s, t, quality, &config);
                let p = compute_pointer_effect(&target(), index, &s, t, quality, &config);
                let e = combine(b, p, &config);
                assert!((100.0..=900.0).contains(&e.weight));
                assert!((0.0..=100.0).contains(&e.distortion));
            }
        }
    }
}

#[test]
fn combine_clamps_and_rejects_nan() {
    let config = Config::default();
    assert_eq!(
        combine(Effect::new(1000.0, 200.0), Effect::ZERO, &config),
        Effect::new(900.0, 100.0)
    );
    assert_eq!(
        combine(Effect::new(-50.0, -5.0), Effect::ZERO, &config),
        Effect::new(100.0, 0.0)
    );
    assert_eq!(
        combine(Effect::new(f32::NAN, 10.0), Effect::ZERO, &config),
        Effect::new(400.0, 0.0)
    );
}

#[test]
fn wave_terms_follow_quality_tiers() {
    assert_eq!(wave_terms(1.0), 3);
    assert_eq!(wave_terms(0.75), 3);
    assert_eq!(wave_terms(0.6), 2);
    assert_eq!(wave_terms(0.45), 2);
    assert_eq!(wave_terms(0.3), 1);
}
