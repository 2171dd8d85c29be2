use crate::config::QualityTuning;

/// Adapts a quality level in `[min_level, 1.0]` to measured frame cost.
///
/// Costs land in a fixed-size ring; the level only moves once `min_samples`
/// have been recorded, and then by one multiplicative step per frame.
#[derive(Clone, Debug)]
pub struct QualityController {
    history: Vec<f32>,
    cursor: usize,
    filled: usize,
    level: f32,
    tuning: QualityTuning,
}

impl QualityController {
    pub fn new(tuning: QualityTuning) -> Self {
        Self {
            history: vec![0.0; tuning.history_len],
            cursor: 0,
            filled: 0,
            level: 1.0,
            tuning,
        }
    }

    #[inline]
    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn samples(&self) -> usize {
        self.filled
    }

    pub fn average_frame_time(&self) -> f32 {
        if self.filled == 0 {
            return 0.0;
        }
        self.history[..self.filled].iter().sum::<f32>() / self.filled as f32
    }

    /// Record one frame's cost in milliseconds and re-evaluate the level.
    pub fn record(&mut self, cost_ms: f32) {
        if !cost_ms.is_finite() || cost_ms < 0.0 {
            return;
        }
        let len = self.history.len();
        self.history[self.cursor] = cost_ms;
        self.cursor = (self.cursor + 1) % len;
        self.filled = (self.filled + 1).min(len);
        if self.filled < self.tuning.min_samples {
            return;
        }

        let avg = self.average_frame_time();
        let budget = self.tuning.budget_ms();
        let prev = self.level;
        if avg > budget * (1.0 + self.tuning.degrade_margin) {
            self.level = (self.level * self.tuning.degrade_step).max(self.tuning.min_level);
        } else if avg < budget * (1.0 - self.tuning.recover_margin) {
            self.level = (self.level * self.tuning.recover_step).min(1.0);
        }
        if (self.level - prev).abs() > f32::EPSILON {
            log::debug!(
                "[quality] avg={:.2}ms budget={:.2}ms level {:.3} -> {:.3}",
                avg,
                budget,
                prev,
                self.level
            );
        }
    }
}
