// Host-side tests for the target registry: write dedup, geometry cache and
// the fallback path.

use effect_core::{
    Effect, Geometry, GeometrySource, RenderSurface, SurfaceError, TargetId, TargetKind,
    TargetRegistry,
};

#[derive(Default)]
struct SpySurface {
    primary: Vec<(TargetId, Effect)>,
    fallback: Vec<(TargetId, Effect)>,
    primary_result: Option<SurfaceError>,
}

impl RenderSurface for SpySurface {
    fn write(&mut self, id: TargetId, _kind: TargetKind, effect: Effect) -> Result<(), SurfaceError> {
        if let Some(e) = self.primary_result.clone() {
            return Err(e);
        }
        self.primary.push((id, effect));
        Ok(())
    }

    fn write_fallback(
        &mut self,
        id: TargetId,
        _kind: TargetKind,
        effect: Effect,
    ) -> Result<(), SurfaceError> {
        self.fallback.push((id, effect));
        Ok(())
    }
}

struct SpySource {
    calls: u32,
    answer: Option<Geometry>,
}

impl GeometrySource for SpySource {
    fn measure(&mut self, _id: TargetId, _kind: TargetKind) -> Option<Geometry> {
        self.calls += 1;
        self.answer
    }
}

fn registry() -> TargetRegistry {
    TargetRegistry::new(100.0, 0.05)
}

#[test]
fn identical_values_are_written_once() {
    let mut r = registry();
    let id = r.register(TargetKind::Glyph, false);
    let mut surface = SpySurface::default();
    let e = Effect::new(600.0, 20.0);

    assert!(r.apply(id, e, &mut surface));
    assert!(!r.apply(id, e, &mut surface));
    // within epsilon
    assert!(!r.apply(id, Effect::new(600.01, 20.02), &mut surface));
    assert!(r.apply(id, Effect::new(601.0, 20.0), &mut surface));

    assert_eq!(surface.primary.len(), 2);
    assert_eq!(r.writes(), 2);
    assert_eq!(r.get(id).and_then(|t| t.last_applied), Some(Effect::new(601.0, 20.0)));
}

#[test]
fn geometry_is_cached_for_the_configured_duration() {
    let mut r = registry();
    let id = r.register(TargetKind::Glyph, false);
    let mut source = SpySource {
        calls: 0,
        answer: Some(Geometry::new(1.0, 2.0, 3.0, 4.0)),
    };

    assert!(r.geometry(id, 0.0, &mut source).is_some());
    assert!(r.geometry(id, 50.0, &mut source).is_some());
    assert!(r.geometry(id, 99.0, &mut source).is_some());
    assert_eq!(source.calls, 1);

    r.geometry(id, 150.0, &mut source);
    assert_eq!(source.calls, 2);

    r.invalidate_all();
    r.geometry(id, 151.0, &mut source);
    assert_eq!(source.calls, 3);
    assert_eq!(r.measures(), 3);
}

#[test]
fn failed_measurement_serves_stale_geometry() {
    let mut r = registry();
    let id = r.register(TargetKind::Glyph, false);
    let g = Geometry::new(10.0, 10.0, 5.0, 5.0);
    let mut source = SpySource {
        calls: 0,
        answer: Some(g),
    };
    r.geometry(id, 0.0, &mut source);
    source.answer = None;
    assert_eq!(r.geometry(id, 500.0, &mut source), Some(g));

    let unmeasured = r.register(TargetKind::Glyph, false);
    assert_eq!(r.geometry(unmeasured, 500.0, &mut source), None);
}

#[test]
fn seeded_geometry_needs_no_measurement() {
    let mut r = registry();
    let g = Geometry::new(0.0, 0.0, 140.0, 140.0);
    let id = r.register_with_geometry(TargetKind::Pane, g, 0.0);
    let mut source = SpySource {
        calls: 0,
        answer: None,
    };
    assert_eq!(r.geometry(id, 10.0, &mut source), Some(g));
    assert_eq!(source.calls, 0);
}

#[test]
fn unsupported_surface_switches_target_to_fallback() {
    let mut r = registry();
    let id = r.register(TargetKind::Glyph, false);
    let mut surface = SpySurface {
        primary_result: Some(SurfaceError::Unsupported),
        ..Default::default()
    };

    assert!(r.apply(id, Effect::new(500.0, 10.0), &mut surface));
    assert!(r.get(id).map(|t| t.fallback).unwrap_or(false));

    // later writes go straight to the fallback even if the primary recovers
    surface.primary_result = None;
    assert!(r.apply(id, Effect::new(700.0, 10.0), &mut surface));
    assert!(surface.primary.is_empty());
    assert_eq!(surface.fallback.len(), 2);
}

#[test]
fn failed_write_is_retried_next_time() {
    let mut r = registry();
    let id = r.register(TargetKind::Glyph, false);
    let mut surface = SpySurface {
        primary_result: Some(SurfaceError::Detached),
        ..Default::default()
    };
    let e = Effect::new(450.0, 5.0);

    assert!(!r.apply(id, e, &mut surface));
    assert_eq!(r.get(id).and_then(|t| t.last_applied), None);

    surface.primary_result = None;
    assert!(r.apply(id, e, &mut surface));
    assert_eq!(surface.primary.len(), 1);
}

#[test]
fn removing_a_kind_reindexes_the_rest() {
    let mut r = registry();
    let g0 = r.register(TargetKind::Glyph, false);
    r.register(TargetKind::Pane, false);
    let g1 = r.register(TargetKind::Glyph, true);
    r.register(TargetKind::Pane, false);

    let removed = r.remove_kind(TargetKind::Pane);
    assert_eq!(removed.len(), 2);
    assert_eq!(r.len(), 2);
    assert_eq!(r.get(g0).map(|t| t.index), Some(0));
    assert_eq!(r.get(g1).map(|t| t.index), Some(1));
    for id in removed {
        assert!(r.get(id).is_none());
    }
}

#[test]
fn fixed_targets_are_not_active() {
    let mut r = registry();
    let live = r.register(TargetKind::Glyph, false);
    r.register(TargetKind::Glyph, true);
    assert_eq!(r.active_ids(), vec![live]);
}

#[test]
fn pane_geometry_never_goes_stale() {
    let mut r = registry();
    let g = Geometry::new(140.0, 0.0, 140.0, 140.0);
    let id = r.register_with_geometry(TargetKind::Pane, g, 0.0);
    let mut source = SpySource {
        calls: 0,
        answer: Some(Geometry::new(0.0, 0.0, 1.0, 1.0)),
    };
    for now in [150.0, 1_000.0, 60_000.0] {
        assert_eq!(r.geometry(id, now, &mut source), Some(g));
    }
    assert_eq!(source.calls, 0);
}
