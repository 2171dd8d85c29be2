//! The engine instance tying state, calculator, scheduler and registry
//! together.

use crate::adapters::{InputAdapters, OrientationReading};
use crate::config::Config;
use crate::effect::{combine, compute_baseline_effect, compute_pointer_effect};
use crate::grid::{PaneCell, PaneGrid};
use crate::quality::QualityController;
use crate::registry::{Geometry, GeometrySource, RenderSurface, TargetId, TargetKind, TargetRegistry};
use crate::scheduler::{FrameScheduler, Liveness, TickPlan};
use crate::state::EffectState;
use crate::uniforms::OverlayUniforms;

/// Millisecond clock, monotonic within one engine lifetime.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameReport {
    /// Engine destroyed; never reschedule.
    Halted,
    /// Suspended; wait for a resume signal.
    Parked,
    Skipped {
        next_delay_ms: f32,
    },
    Computed {
        evaluated: usize,
        writes: usize,
        cost_ms: f32,
        next_delay_ms: f32,
    },
}

impl FrameReport {
    /// Whether the host should schedule another tick.
    pub fn reschedule(&self) -> Option<f32> {
        match *self {
            FrameReport::Halted | FrameReport::Parked => None,
            FrameReport::Skipped { next_delay_ms } | FrameReport::Computed { next_delay_ms, .. } => {
                Some(next_delay_ms)
            }
        }
    }
}

pub struct EffectEngine {
    config: Config,
    state: EffectState,
    quality: QualityController,
    scheduler: FrameScheduler,
    registry: TargetRegistry,
    adapters: InputAdapters,
    liveness: Liveness,
    origin_ms: Option<f64>,
    evaluations: u64,
    viewport: (f32, f32),
}

impl EffectEngine {
    pub fn new(config: Config) -> Self {
        let state = EffectState::new(&config);
        let quality = QualityController::new(config.quality.clone());
        let scheduler = FrameScheduler::new(config.scheduler.clone(), config.quality.budget_ms());
        let registry = TargetRegistry::new(config.cache_duration_ms, config.apply_epsilon);
        let adapters = InputAdapters::new(&config.throttle, &config.impulses);
        log::info!(
            "[engine] created: range={}px weight={}..{} distortion<= {}",
            config.pointer.range,
            config.weight.min,
            config.weight.max,
            config.distortion.max
        );
        Self {
            config,
            state,
            quality,
            scheduler,
            registry,
            adapters,
            liveness: Liveness::default(),
            origin_ms: None,
            evaluations: 0,
            viewport: (0.0, 0.0),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> &EffectState {
        &self.state
    }

    pub fn quality(&self) -> &QualityController {
        &self.quality
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    pub fn registry(&self) -> &TargetRegistry {
        &self.registry
    }

    pub fn is_alive(&self) -> bool {
        self.liveness.is_alive()
    }

    /// Effect calculator invocations so far (one per evaluated target).
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    // ---------------- targets ----------------

    pub fn add_glyph(&mut self, fixed: bool) -> TargetId {
        self.registry.register(TargetKind::Glyph, fixed)
    }

    /// Viewport changed: drop cached geometry and regenerate the pane grid.
    /// Returns the new cells paired with their ids so the host can rebuild
    /// the pane elements.
    pub fn resize(&mut self, width: f32, height: f32, now_ms: f64) -> Vec<(TargetId, PaneCell)> {
        self.viewport = (width, height);
        self.registry.invalidate_all();
        self.registry.remove_kind(TargetKind::Pane);
        let cells = PaneGrid::layout(width, height, &self.config.grid);
        log::info!(
            "[engine] resize {}x{} -> {} panes",
            width,
            height,
            cells.len()
        );
        cells
            .into_iter()
            .map(|cell| {
                let id = self
                    .registry
                    .register_with_geometry(TargetKind::Pane, cell.geometry, now_ms);
                (id, cell)
            })
            .collect()
    }

    pub fn viewport(&self) -> (f32, f32) {
        self.viewport
    }

    // ---------------- input ----------------

    pub fn pointer_moved(&mut self, x: f32, y: f32, now_ms: f64) {
        if !self.is_alive() {
            return;
        }
        if self.adapters.pointer.on_move(&mut self.state, x, y, now_ms) {
            self.scheduler.note_input(now_ms);
        }
    }

    pub fn pointer_down(&mut self, now_ms: f64) {
        if !self.is_alive() {
            return;
        }
        if self.adapters.pointer.on_down(&mut self.state, now_ms) {
            self.scheduler.note_input(now_ms);
        }
    }

    pub fn pointer_left(&mut self) {
        if self.is_alive() {
            self.adapters.pointer.on_leave(&mut self.state);
        }
    }

    pub fn key_pressed(&mut self, now_ms: f64) {
        if !self.is_alive() {
            return;
        }
        if self.adapters.keyboard.on_key(&mut self.state, now_ms) {
            self.scheduler.note_input(now_ms);
        }
    }

    pub fn touch_started(&mut self, x: f32, y: f32, now_ms: f64) {
        if !self.is_alive() {
            return;
        }
        if self.adapters.touch.on_touch_start(&mut self.state, x, y, now_ms) {
            self.scheduler.note_input(now_ms);
        }
    }

    pub fn touch_moved(&mut self, x: f32, y: f32, now_ms: f64) {
        if !self.is_alive() {
            return;
        }
        if self.adapters.touch.on_touch_move(&mut self.state, x, y, now_ms) {
            self.scheduler.note_input(now_ms);
        }
    }

    pub fn touch_ended(&mut self) {
        if self.is_alive() {
            self.adapters.touch.on_touch_end(&mut self.state);
        }
    }

    pub fn set_orientation_enabled(&mut self, enabled: bool) {
        self.adapters.orientation.set_enabled(enabled);
    }

    pub fn orientation(&mut self, reading: OrientationReading, now_ms: f64) {
        if !self.is_alive() {
            return;
        }
        if self.adapters.orientation.on_reading(&mut self.state, reading, now_ms) {
            self.scheduler.note_input(now_ms);
        }
    }

    // ---------------- host surface ----------------

    /// Returns true when the scheduler resumed and the host must restart ticks.
    pub fn set_visible(&mut self, visible: bool) -> bool {
        self.is_alive() && self.scheduler.set_visible(visible)
    }

    /// Returns true when the scheduler resumed and the host must restart ticks.
    pub fn set_focused(&mut self, focused: bool) -> bool {
        self.is_alive() && self.scheduler.set_focused(focused)
    }

    /// Stop for good. Any later tick reports [`FrameReport::Halted`].
    pub fn destroy(&mut self) {
        if self.is_alive() {
            log::info!("[engine] destroyed");
        }
        self.liveness.kill();
        self.registry.clear();
    }

    // ---------------- frame ----------------

    pub fn frame<C, G, S>(&mut self, clock: &C, source: &mut G, surface: &mut S) -> FrameReport
    where
        C: Clock + ?Sized,
        G: GeometrySource + ?Sized,
        S: RenderSurface + ?Sized,
    {
        if !self.is_alive() {
            return FrameReport::Halted;
        }
        let start = clock.now_ms();
        match self.scheduler.begin(start) {
            TickPlan::Park => return FrameReport::Parked,
            TickPlan::Skip => {
                return FrameReport::Skipped { next_delay_ms: 0.0 };
            }
            TickPlan::Compute => {}
        }

        // decay completes before any target reads the state
        self.state.tick(start);

        let origin = *self.origin_ms.get_or_insert(start);
        let time_sec = ((start - origin) / 1000.0) as f32;
        let quality = self.quality.level();

        // all layout reads happen before the first write, so a write never
        // forces a reflow for the next read
        let measured: Vec<(TargetId, usize, Geometry)> = self
            .registry
            .active_ids()
            .into_iter()
            .filter_map(|id| {
                let geometry = self.registry.geometry(id, start, source)?;
                let index = self.registry.get(id)?.index;
                Some((id, index, geometry))
            })
            .collect();

        let mut evaluated = 0usize;
        let mut writes = 0usize;
        for (id, index, geometry) in measured {
            let baseline = compute_baseline_effect(index, &self.state, time_sec, quality, &self.config);
            let pointer = compute_pointer_effect(&geometry, index, &self.state, time_sec, quality, &self.config);
            let effect = combine(baseline, pointer, &self.config);
            evaluated += 1;
            if self.registry.apply(id, effect, surface) {
                writes += 1;
            }
        }
        self.evaluations += evaluated as u64;

        let cost_ms = (clock.now_ms() - start).max(0.0) as f32;
        self.quality.record(cost_ms);
        let next_delay_ms = self.scheduler.finish(cost_ms, writes);
        FrameReport::Computed {
            evaluated,
            writes,
            cost_ms,
            next_delay_ms,
        }
    }

    pub fn overlay_uniforms(&self, now_ms: f64, resolution: [f32; 2]) -> OverlayUniforms {
        let time_sec = ((now_ms - self.origin_ms.unwrap_or(now_ms)) / 1000.0) as f32;
        OverlayUniforms::from_state(
            &self.state,
            resolution,
            time_sec,
            self.quality.level(),
            self.config.pointer.max_velocity,
        )
    }
}
