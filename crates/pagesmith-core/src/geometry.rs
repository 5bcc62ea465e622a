//! Grid snapping and alignment-guide candidates.

use crate::element::ElementId;
use kurbo::{Rect, Size};

/// Round a value to the nearest multiple of `grid_size`. Exact halves round
/// up (toward positive infinity), so `-5` on a grid of 10 snaps to `0`.
pub fn snap_to_grid(value: f64, grid_size: f64) -> f64 {
    (value / grid_size + 0.5).floor() * grid_size
}

/// Snap every component of a box to the grid.
pub fn snap_rect_to_grid(rect: Rect, grid_size: f64) -> Rect {
    let x = snap_to_grid(rect.x0, grid_size);
    let y = snap_to_grid(rect.y0, grid_size);
    let width = snap_to_grid(rect.width(), grid_size);
    let height = snap_to_grid(rect.height(), grid_size);
    Rect::new(x, y, x + width, y + height)
}

/// Candidate alignment coordinates, sorted and de-duplicated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapLines {
    /// X coordinates of vertical lines.
    pub vertical: Vec<f64>,
    /// Y coordinates of horizontal lines.
    pub horizontal: Vec<f64>,
}

impl SnapLines {
    /// Check if there are no lines at all.
    pub fn is_empty(&self) -> bool {
        self.vertical.is_empty() && self.horizontal.is_empty()
    }

    pub(crate) fn normalize(&mut self) {
        sort_dedup(&mut self.vertical);
        sort_dedup(&mut self.horizontal);
    }
}

fn sort_dedup(values: &mut Vec<f64>) {
    values.sort_by(f64::total_cmp);
    values.dedup();
}

/// Collect the lines a moving or resizing box can align to: the canvas edges
/// and center, plus the left/center/right and top/middle/bottom of every box
/// whose id is not in `exclude`.
pub fn candidate_snap_lines<I>(boxes: I, exclude: &[ElementId], canvas: Size) -> SnapLines
where
    I: IntoIterator<Item = (ElementId, Rect)>,
{
    let mut lines = SnapLines {
        vertical: vec![0.0, canvas.width / 2.0, canvas.width],
        horizontal: vec![0.0, canvas.height / 2.0, canvas.height],
    };

    for (id, rect) in boxes {
        if exclude.contains(&id) {
            continue;
        }
        lines.vertical.extend([rect.x0, (rect.x0 + rect.x1) / 2.0, rect.x1]);
        lines.horizontal.extend([rect.y0, (rect.y0 + rect.y1) / 2.0, rect.y1]);
    }

    lines.normalize();
    lines
}

/// Lines strictly closer than `threshold` to `value`.
pub fn lines_near(value: f64, lines: &[f64], threshold: f64) -> Vec<f64> {
    lines
        .iter()
        .copied()
        .filter(|line| (value - line).abs() < threshold)
        .collect()
}

/// Smallest box containing all of `rects`, or `None` for an empty input.
pub fn bounding_box<I>(rects: I) -> Option<Rect>
where
    I: IntoIterator<Item = Rect>,
{
    rects.into_iter().reduce(|acc, rect| acc.union(rect))
}

/// Open-interval overlap test used by marquee selection; touching edges do
/// not count.
pub fn rects_overlap(a: Rect, b: Rect) -> bool {
    a.x0 < b.x1 && a.x1 > b.x0 && a.y0 < b.y1 && a.y1 > b.y0
}
