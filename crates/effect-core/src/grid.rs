use crate::config::GridTuning;
use crate::registry::Geometry;

/// One cell of the glass pane grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PaneCell {
    pub row: u32,
    pub col: u32,
    pub geometry: Geometry,
}

/// Tiles the viewport with roughly square panes.
pub struct PaneGrid;

impl PaneGrid {
    /// Cells covering `width` x `height` exactly, row-major. The nominal pane
    /// size grows until the cell count fits `max_panes`.
    pub fn layout(width: f32, height: f32, tuning: &GridTuning) -> Vec<PaneCell> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Vec::new();
        }
        let mut size = tuning.pane_size;
        let (cols, rows) = loop {
            let cols = (width / size).ceil().max(1.0) as u32;
            let rows = (height / size).ceil().max(1.0) as u32;
            if (cols as usize) * (rows as usize) <= tuning.max_panes || (cols == 1 && rows == 1) {
                break (cols, rows);
            }
            size *= 1.1;
        };

        let cell_w = width / cols as f32;
        let cell_h = height / rows as f32;
        let mut cells = Vec::with_capacity((cols * rows) as usize);
        for row in 0..rows {
            for col in 0..cols {
                cells.push(PaneCell {
                    row,
                    col,
                    geometry: Geometry::new(col as f32 * cell_w, row as f32 * cell_h, cell_w, cell_h),
                });
            }
        }
        cells
    }
}
