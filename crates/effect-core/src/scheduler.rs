//! Frame scheduler state machine.
//!
//! The host calls [`FrameScheduler::begin`] at the top of every animation
//! callback and [`FrameScheduler::finish`] after a computed frame. The host
//! owns the actual timer; the scheduler only decides whether to compute and
//! how long to wait before the next callback.

use crate::config::SchedulerTuning;
use std::cell::Cell;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SuspendReason {
    Hidden,
    Blurred,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    Running,
    Suspended(SuspendReason),
}

/// What the current tick should do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickPlan {
    /// Suspended: stop scheduling until resumed.
    Park,
    /// Idle-throttled: reschedule without computing.
    Skip,
    Compute,
}

/// Shared liveness flag checked before every tick and adapter callback.
#[derive(Clone, Debug)]
pub struct Liveness(Rc<Cell<bool>>);

impl Default for Liveness {
    fn default() -> Self {
        Self(Rc::new(Cell::new(true)))
    }
}

impl Liveness {
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.0.get()
    }

    pub fn kill(&self) {
        self.0.set(false);
    }
}

#[derive(Debug)]
pub struct FrameScheduler {
    visible: bool,
    focused: bool,
    throttled: bool,
    low_impact_frames: u32,
    skip_counter: u32,
    last_input_ms: Option<f64>,
    last_begin_ms: f64,
    budget_ms: f32,
    tuning: SchedulerTuning,
}

impl FrameScheduler {
    pub fn new(tuning: SchedulerTuning, budget_ms: f32) -> Self {
        Self {
            visible: true,
            focused: true,
            throttled: false,
            low_impact_frames: 0,
            skip_counter: 0,
            last_input_ms: None,
            last_begin_ms: 0.0,
            budget_ms,
            tuning,
        }
    }

    pub fn state(&self) -> SchedulerState {
        if !self.visible {
            SchedulerState::Suspended(SuspendReason::Hidden)
        } else if !self.focused {
            SchedulerState::Suspended(SuspendReason::Blurred)
        } else {
            SchedulerState::Running
        }
    }

    pub fn is_throttled(&self) -> bool {
        self.throttled
    }

    /// Returns true when this call resumed a suspended scheduler.
    pub fn set_visible(&mut self, visible: bool) -> bool {
        self.transition(|s| s.visible = visible)
    }

    /// Returns true when this call resumed a suspended scheduler.
    pub fn set_focused(&mut self, focused: bool) -> bool {
        self.transition(|s| s.focused = focused)
    }

    fn transition(&mut self, change: impl FnOnce(&mut Self)) -> bool {
        let before = self.state();
        change(self);
        let after = self.state();
        if before != after {
            log::info!("[scheduler] {:?} -> {:?}", before, after);
        }
        matches!(before, SchedulerState::Suspended(_)) && after == SchedulerState::Running
    }

    /// Input activity; leaves idle throttling immediately.
    pub fn note_input(&mut self, now_ms: f64) {
        self.last_input_ms = Some(now_ms);
        self.low_impact_frames = 0;
        if self.throttled {
            log::info!("[scheduler] input, leaving idle throttle");
            self.throttled = false;
            self.skip_counter = 0;
        }
    }

    pub fn begin(&mut self, now_ms: f64) -> TickPlan {
        self.last_begin_ms = now_ms;
        if self.state() != SchedulerState::Running {
            return TickPlan::Park;
        }
        if self.throttled {
            self.skip_counter += 1;
            if self.skip_counter < self.tuning.idle_frame_stride {
                return TickPlan::Skip;
            }
            self.skip_counter = 0;
        }
        TickPlan::Compute
    }

    /// Close a computed frame; returns the delay in ms before the next tick
    /// (0 means "next animation frame").
    pub fn finish(&mut self, cost_ms: f32, writes: usize) -> f32 {
        let input_idle = match self.last_input_ms {
            Some(t) => self.last_begin_ms - t > self.tuning.idle_timeout_ms,
            None => true,
        };
        if writes == 0 && input_idle {
            self.low_impact_frames = self.low_impact_frames.saturating_add(1);
            if !self.throttled && self.low_impact_frames >= self.tuning.idle_frames_before_throttle {
                log::info!(
                    "[scheduler] {} quiet frames, throttling",
                    self.low_impact_frames
                );
                self.throttled = true;
                self.skip_counter = 0;
            }
        } else {
            self.low_impact_frames = 0;
            if self.throttled && writes > 0 {
                self.throttled = false;
            }
        }

        if cost_ms > self.budget_ms * self.tuning.overrun_factor {
            cost_ms - self.budget_ms
        } else {
            0.0
        }
    }
}
