//! Target registry and renderer bridge.
//!
//! Every write to the rendering surface goes through [`TargetRegistry::apply`],
//! which drops writes that would not change the target's last applied value
//! and switches a target to the surface's fallback path when the primary
//! representation is unsupported.

use crate::effect::Effect;
use crate::error::SurfaceError;
use fnv::FnvHashMap;
use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TargetKind {
    Glyph,
    Pane,
}

/// Layout box in viewport CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Geometry {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Geometry {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width * 0.5, self.top + self.height * 0.5)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CachedGeometry {
    pub geometry: Geometry,
    pub cached_at_ms: f64,
}

#[derive(Clone, Debug)]
pub struct Target {
    pub id: TargetId,
    pub kind: TargetKind,
    /// Ordinal among targets of the same kind; drives wave phase offsets.
    pub index: usize,
    /// Fixed targets are never evaluated or written.
    pub fixed: bool,
    pub geometry: Option<CachedGeometry>,
    pub last_applied: Option<Effect>,
    /// Set once the surface reported the primary representation unsupported.
    pub fallback: bool,
}

/// Measures a target's current layout box.
pub trait GeometrySource {
    fn measure(&mut self, id: TargetId, kind: TargetKind) -> Option<Geometry>;
}

/// Sink for computed values (font variations, custom properties, uniforms).
pub trait RenderSurface {
    fn write(&mut self, id: TargetId, kind: TargetKind, effect: Effect) -> Result<(), SurfaceError>;

    /// Simpler representation used after `write` reported `Unsupported`.
    fn write_fallback(
        &mut self,
        _id: TargetId,
        _kind: TargetKind,
        _effect: Effect,
    ) -> Result<(), SurfaceError> {
        Err(SurfaceError::Unsupported)
    }
}

pub struct TargetRegistry {
    targets: Vec<Target>,
    by_id: FnvHashMap<TargetId, usize>,
    next_id: u32,
    cache_duration_ms: f64,
    epsilon: f32,
    writes: u64,
    measures: u64,
}

impl TargetRegistry {
    pub fn new(cache_duration_ms: f64, epsilon: f32) -> Self {
        Self {
            targets: Vec::new(),
            by_id: FnvHashMap::default(),
            next_id: 0,
            cache_duration_ms,
            epsilon,
            writes: 0,
            measures: 0,
        }
    }

    pub fn register(&mut self, kind: TargetKind, fixed: bool) -> TargetId {
        let id = TargetId(self.next_id);
        self.next_id += 1;
        let index = self.targets.iter().filter(|t| t.kind == kind).count();
        self.by_id.insert(id, self.targets.len());
        self.targets.push(Target {
            id,
            kind,
            index,
            fixed,
            geometry: None,
            last_applied: None,
            fallback: false,
        });
        id
    }

    /// Register a target whose layout is already known (generated panes).
    pub fn register_with_geometry(
        &mut self,
        kind: TargetKind,
        geometry: Geometry,
        now_ms: f64,
    ) -> TargetId {
        let id = self.register(kind, false);
        if let Some(t) = self.get_mut(id) {
            t.geometry = Some(CachedGeometry {
                geometry,
                cached_at_ms: now_ms,
            });
        }
        id
    }

    /// Drop every target of `kind`, returning their ids.
    pub fn remove_kind(&mut self, kind: TargetKind) -> Vec<TargetId> {
        let removed = self
            .targets
            .iter()
            .filter(|t| t.kind == kind)
            .map(|t| t.id)
            .collect();
        self.targets.retain(|t| t.kind != kind);
        self.reindex();
        removed
    }

    pub fn clear(&mut self) {
        self.targets.clear();
        self.by_id.clear();
    }

    fn reindex(&mut self) {
        self.by_id.clear();
        let mut glyphs = 0;
        let mut panes = 0;
        for (slot, t) in self.targets.iter_mut().enumerate() {
            self.by_id.insert(t.id, slot);
            let counter = match t.kind {
                TargetKind::Glyph => &mut glyphs,
                TargetKind::Pane => &mut panes,
            };
            t.index = *counter;
            *counter += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn get(&self, id: TargetId) -> Option<&Target> {
        self.by_id.get(&id).map(|&slot| &self.targets[slot])
    }

    fn get_mut(&mut self, id: TargetId) -> Option<&mut Target> {
        let slot = *self.by_id.get(&id)?;
        self.targets.get_mut(slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter()
    }

    /// Ids of targets that take part in per-frame evaluation.
    pub fn active_ids(&self) -> Vec<TargetId> {
        self.targets
            .iter()
            .filter(|t| !t.fixed)
            .map(|t| t.id)
            .collect()
    }

    /// Total surface writes (primary and fallback) performed so far.
    pub fn writes(&self) -> u64 {
        self.writes
    }

    /// Total geometry measurements performed so far.
    pub fn measures(&self) -> u64 {
        self.measures
    }

    /// Cached geometry while fresh, otherwise a new measurement.
    ///
    /// Pane geometry comes from the grid layout and never expires; only
    /// `invalidate_all` drops it. A failed measurement keeps serving the
    /// stale cache, if any.
    pub fn geometry<G: GeometrySource + ?Sized>(
        &mut self,
        id: TargetId,
        now_ms: f64,
        source: &mut G,
    ) -> Option<Geometry> {
        let cache_duration_ms = self.cache_duration_ms;
        let slot = *self.by_id.get(&id)?;
        let target = &mut self.targets[slot];
        if let Some(cached) = target.geometry {
            if target.kind == TargetKind::Pane || now_ms - cached.cached_at_ms < cache_duration_ms {
                return Some(cached.geometry);
            }
        }
        self.measures += 1;
        match source.measure(id, target.kind) {
            Some(geometry) => {
                target.geometry = Some(CachedGeometry {
                    geometry,
                    cached_at_ms: now_ms,
                });
                Some(geometry)
            }
            None => target.geometry.map(|c| c.geometry),
        }
    }

    /// Write `effect` to the surface unless it matches the last applied value
    /// within epsilon. Returns whether a write happened.
    pub fn apply<S: RenderSurface + ?Sized>(
        &mut self,
        id: TargetId,
        effect: Effect,
        surface: &mut S,
    ) -> bool {
        let epsilon = self.epsilon;
        let Some(slot) = self.by_id.get(&id).copied() else {
            return false;
        };
        let target = &mut self.targets[slot];
        if let Some(last) = target.last_applied {
            if (last.weight - effect.weight).abs() <= epsilon
                && (last.distortion - effect.distortion).abs() <= epsilon
            {
                return false;
            }
        }

        let result = if target.fallback {
            surface.write_fallback(id, target.kind, effect)
        } else {
            match surface.write(id, target.kind, effect) {
                Err(SurfaceError::Unsupported) => {
                    log::warn!("[surface] target {} unsupported, using fallback", id.0);
                    target.fallback = true;
                    surface.write_fallback(id, target.kind, effect)
                }
                other => other,
            }
        };

        match result {
            Ok(()) => {
                target.last_applied = Some(effect);
                self.writes += 1;
                true
            }
            Err(e) => {
                log::debug!("[surface] write to target {} failed: {}", id.0, e);
                false
            }
        }
    }

    /// Forget every cached geometry; the next `geometry` call remeasures.
    pub fn invalidate_all(&mut self) {
        for t in &mut self.targets {
            t.geometry = None;
        }
    }
}
