// Host-side tests for the frame scheduler state machine.

use effect_core::{FrameScheduler, SchedulerState, SchedulerTuning, SuspendReason, TickPlan};

const BUDGET_MS: f32 = 1000.0 / 60.0;

fn scheduler() -> FrameScheduler {
    FrameScheduler::new(SchedulerTuning::default(), BUDGET_MS)
}

#[test]
fn hidden_and_blurred_suspend_and_resume() {
    let mut s = scheduler();
    assert_eq!(s.state(), SchedulerState::Running);

    assert!(!s.set_visible(false));
    assert_eq!(s.state(), SchedulerState::Suspended(SuspendReason::Hidden));
    assert_eq!(s.begin(0.0), TickPlan::Park);

    // still blurred after becoming visible: no resume yet
    assert!(!s.set_focused(false));
    assert!(!s.set_visible(true));
    assert_eq!(s.state(), SchedulerState::Suspended(SuspendReason::Blurred));

    assert!(s.set_focused(true));
    assert_eq!(s.begin(16.0), TickPlan::Compute);
    // already running
    assert!(!s.set_focused(true));
}

#[test]
fn quiet_frames_throttle_until_input() {
    let mut s = scheduler();
    let mut now = 0.0;
    for _ in 0..30 {
        assert_eq!(s.begin(now), TickPlan::Compute);
        s.finish(1.0, 0);
        now += 16.0;
    }
    assert!(s.is_throttled());

    // one computed tick every 12
    let plans: Vec<TickPlan> = (0..12)
        .map(|i| s.begin(now + i as f64 * 16.0))
        .collect();
    assert!(plans[..11].iter().all(|p| *p == TickPlan::Skip));
    assert_eq!(plans[11], TickPlan::Compute);

    s.note_input(now + 200.0);
    assert!(!s.is_throttled());
    assert_eq!(s.begin(now + 216.0), TickPlan::Compute);
}

#[test]
fn recent_input_keeps_scheduler_awake() {
    let mut s = scheduler();
    s.note_input(0.0);
    for i in 0..60 {
        s.begin(i as f64 * 16.0);
        s.finish(1.0, 0);
    }
    // 60 frames at 16 ms stay inside the 2 s idle timeout
    assert!(!s.is_throttled());
}

#[test]
fn writes_leave_throttle() {
    let mut s = scheduler();
    for i in 0..30 {
        s.begin(i as f64 * 16.0);
        s.finish(1.0, 0);
    }
    assert!(s.is_throttled());
    s.finish(1.0, 3);
    assert!(!s.is_throttled());
}

#[test]
fn overrun_delays_the_next_tick_by_the_excess() {
    let mut s = scheduler();
    s.begin(0.0);
    let delay = s.finish(40.0, 1);
    assert!((delay - (40.0 - BUDGET_MS)).abs() < 1e-4);

    // 20 ms is over budget but under 1.5x
    s.begin(50.0);
    assert_eq!(s.finish(20.0, 1), 0.0);
}
