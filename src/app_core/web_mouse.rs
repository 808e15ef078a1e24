//! Pixel to cell translation for the browser build.
//!
//! The DOM reports pointer positions in CSS pixels, the reducer wants
//! terminal cells. Everything here is pure so it can be tested natively.

/// Bounding box of the rendered grid element, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    fn local(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        let (dx, dy) = (x - self.left, y - self.top);
        (dx >= 0.0 && dy >= 0.0 && dx < self.width && dy < self.height).then_some((dx, dy))
    }
}

/// What is known about the grid layout at the time of the event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    pub rect: PixelRect,
    /// Measured size of one cell, when the first cell could be found.
    pub cell_size: Option<(f64, f64)>,
    /// Grid dimensions in cells, derived from the last frame's hit areas.
    pub cells: Option<(u16, u16)>,
}

impl GridGeometry {
    /// Cell under the pointer. Measured cell size wins; otherwise the
    /// position is scaled by the known grid dimensions.
    pub fn cell_at(&self, x: f64, y: f64) -> Option<(u16, u16)> {
        let (dx, dy) = self.rect.local(x, y)?;
        let bounds = self.cells.filter(|(cols, rows)| *cols > 0 && *rows > 0);

        let (col, row) = match self.cell_size {
            Some((w, h)) if w > 0.0 && h > 0.0 => ((dx / w).floor(), (dy / h).floor()),
            _ => {
                let (cols, rows) = bounds?;
                (
                    (dx / self.rect.width * f64::from(cols)).floor(),
                    (dy / self.rect.height * f64::from(rows)).floor(),
                )
            }
        };

        let (col, row) = (col as u16, row as u16);
        Some(match bounds {
            Some((cols, rows)) => (col.min(cols - 1), row.min(rows - 1)),
            None => (col, row),
        })
    }
}
