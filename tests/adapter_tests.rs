// Host-side tests for input adapters and throttling.

use effect_core::{
    Config, EffectState, Impulse, KeyboardAdapter, OrientationAdapter, OrientationReading,
    PointerAdapter, Throttle, TouchAdapter,
};

fn state() -> EffectState {
    EffectState::new(&Config::default())
}

#[test]
fn throttle_accepts_at_most_one_event_per_interval() {
    let mut t = Throttle::new(16.0);
    assert!(t.ready(0.0));
    assert!(!t.ready(10.0));
    assert!(t.ready(16.0));
    assert!(!t.ready(31.0));
    assert!(t.ready(40.0));
}

#[test]
fn pointer_moves_are_throttled_but_presses_are_not() {
    let mut s = state();
    let mut pointer = PointerAdapter::new(16.0, 1.0);
    assert!(pointer.on_move(&mut s, 1.0, 1.0, 0.0));
    assert!(!pointer.on_move(&mut s, 50.0, 50.0, 5.0));
    let p = s.pointer.position.expect("position");
    assert_eq!((p.x, p.y), (1.0, 1.0));

    assert!(pointer.on_down(&mut s, 6.0));
    assert!(pointer.on_down(&mut s, 7.0));
    assert_eq!(s.amplitude(Impulse::Click), 1.0);

    pointer.on_leave(&mut s);
    assert!(s.pointer.position.is_none());
}

#[test]
fn keyboard_bursts_accumulate() {
    let mut s = state();
    let mut keys = KeyboardAdapter::new(30.0, 0.35);
    assert!(keys.on_key(&mut s, 0.0));
    assert!(keys.on_key(&mut s, 40.0));
    assert!(s.amplitude(Impulse::Keyboard) > 0.21);
    assert_eq!(s.keyboard_cadence.last_burst_ms(), Some(40.0));
}

#[test]
fn touch_start_taps_and_tracks_position() {
    let mut s = state();
    let mut touch = TouchAdapter::new(16.0, 0.6);
    assert!(touch.on_touch_start(&mut s, 30.0, 40.0, 0.0));
    assert!((s.amplitude(Impulse::Tap) - 0.6).abs() < 1e-6);
    assert!(s.pointer.position.is_some());

    assert!(touch.on_touch_move(&mut s, 35.0, 40.0, 20.0));
    assert!(!touch.on_touch_move(&mut s, 36.0, 40.0, 25.0));
    touch.on_touch_end(&mut s);
    assert!(s.pointer.position.is_none());
    // the tap keeps decaying after release
    assert!(s.amplitude(Impulse::Tap) > 0.0);
}

#[test]
fn orientation_readings_are_sanitized() {
    let neutral = OrientationReading {
        alpha: None,
        beta: None,
        gamma: None,
    }
    .tilt();
    assert_eq!((neutral.vertical, neutral.horizontal), (0.0, 0.0));

    let bad = OrientationReading {
        alpha: Some(f64::NAN),
        beta: Some(f64::INFINITY),
        gamma: Some(f64::NAN),
    }
    .tilt();
    assert_eq!((bad.vertical, bad.horizontal), (0.0, 0.0));

    let half = OrientationReading {
        alpha: Some(10.0),
        beta: Some(67.5),
        gamma: Some(22.5),
    }
    .tilt();
    assert!((half.vertical - 0.5).abs() < 1e-6);
    assert!((half.horizontal - 0.5).abs() < 1e-6);

    // flat on the table, rolled past the span
    let extreme = OrientationReading {
        alpha: None,
        beta: Some(0.0),
        gamma: Some(170.0),
    }
    .tilt();
    assert_eq!((extreme.vertical, extreme.horizontal), (1.0, 1.0));
}

#[test]
fn orientation_adapter_gates_on_enabled() {
    let mut s = state();
    let mut o = OrientationAdapter::new(50.0);
    let reading = OrientationReading {
        alpha: None,
        beta: Some(0.0),
        gamma: Some(0.0),
    };
    assert!(!o.on_reading(&mut s, reading, 0.0));
    o.set_enabled(true);
    assert!(o.is_enabled());
    assert!(o.on_reading(&mut s, reading, 10.0));
    assert_eq!(s.amplitude(Impulse::TiltVertical), 1.0);
    assert_eq!(s.amplitude(Impulse::TiltHorizontal), 0.0);
    assert!(!o.on_reading(&mut s, reading, 30.0));
}
