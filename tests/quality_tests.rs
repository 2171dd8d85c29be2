// Host-side tests for frame-cost driven quality adaptation.

use effect_core::{QualityController, QualityTuning};

fn controller() -> QualityController {
    QualityController::new(QualityTuning::default())
}

#[test]
fn level_holds_until_enough_samples() {
    let mut q = controller();
    for _ in 0..29 {
        q.record(50.0);
    }
    assert_eq!(q.level(), 1.0);
    q.record(50.0);
    assert!((q.level() - 0.95).abs() < 1e-6);
}

#[test]
fn sustained_overload_degrades_to_the_floor() {
    let mut q = controller();
    let mut prev = q.level();
    for _ in 0..200 {
        q.record(50.0);
        assert!(q.level() <= prev);
        prev = q.level();
    }
    assert_eq!(q.level(), 0.3);
}

#[test]
fn fast_frames_recover_but_never_exceed_one() {
    let mut q = controller();
    for _ in 0..100 {
        q.record(50.0);
    }
    assert!(q.level() < 1.0);
    for _ in 0..300 {
        q.record(1.0);
        assert!(q.level() <= 1.0);
    }
    assert_eq!(q.level(), 1.0);
}

#[test]
fn costs_inside_the_margins_leave_level_alone() {
    let mut q = controller();
    // budget is 16.7 ms; 15 ms is neither slow nor fast enough to move
    for _ in 0..100 {
        q.record(15.0);
    }
    assert_eq!(q.level(), 1.0);
}

#[test]
fn history_is_a_ring_of_recent_costs() {
    let mut q = controller();
    for _ in 0..60 {
        q.record(10.0);
    }
    for _ in 0..60 {
        q.record(2.0);
    }
    assert_eq!(q.samples(), 60);
    assert!((q.average_frame_time() - 2.0).abs() < 1e-5);
}

#[test]
fn invalid_costs_are_not_recorded() {
    let mut q = controller();
    q.record(f32::NAN);
    q.record(-3.0);
    q.record(f32::INFINITY);
    assert_eq!(q.samples(), 0);
    assert_eq!(q.average_frame_time(), 0.0);
}
