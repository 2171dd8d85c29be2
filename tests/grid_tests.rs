// Host-side tests for the glass pane grid layout.

use effect_core::{GridTuning, PaneGrid};

#[test]
fn default_tuning_tiles_a_desktop_viewport() {
    let cells = PaneGrid::layout(1400.0, 700.0, &GridTuning::default());
    assert_eq!(cells.len(), 50);
    // row-major
    assert_eq!((cells[1].row, cells[1].col), (0, 1));
    assert_eq!((cells[10].row, cells[10].col), (1, 0));
}

#[test]
fn cells_cover_the_viewport_exactly() {
    let (w, h) = (1037.0, 611.0);
    let cells = PaneGrid::layout(w, h, &GridTuning::default());
    let area: f32 = cells.iter().map(|c| c.geometry.width * c.geometry.height).sum();
    assert!((area - w * h).abs() / (w * h) < 1e-4);

    let last = cells.last().expect("cells");
    assert!((last.geometry.left + last.geometry.width - w).abs() < 1e-2);
    assert!((last.geometry.top + last.geometry.height - h).abs() < 1e-2);
}

#[test]
fn huge_viewports_respect_the_pane_cap() {
    let tuning = GridTuning::default();
    let cells = PaneGrid::layout(10_000.0, 10_000.0, &tuning);
    assert!(!cells.is_empty());
    assert!(cells.len() <= tuning.max_panes);
}

#[test]
fn degenerate_viewports_produce_no_panes() {
    let tuning = GridTuning::default();
    assert!(PaneGrid::layout(0.0, 500.0, &tuning).is_empty());
    assert!(PaneGrid::layout(500.0, -1.0, &tuning).is_empty());
    assert!(PaneGrid::layout(f32::NAN, 500.0, &tuning).is_empty());
}

#[test]
fn tiny_viewport_gets_a_single_pane() {
    let cells = PaneGrid::layout(50.0, 30.0, &GridTuning::default());
    assert_eq!(cells.len(), 1);
    assert_eq!(cells[0].geometry.width, 50.0);
}
