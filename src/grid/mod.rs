//! Grid layout of the element display.
//!
//! Elements are drawn row-major on a near-square grid. The presentation
//! layer reports pointer positions in normalized coordinates and this
//! module turns them into flat cell indices.

use serde::{Deserialize, Serialize};

/// Columns and rows used to display a power-of-two element count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridLayout {
    pub width: u32,
    pub height: u32,
}

impl GridLayout {
    /// Square grid for even powers of two, twice as tall as wide otherwise.
    pub fn for_elements(total_elements: u32) -> Self {
        if total_elements == 0 {
            return Self {
                width: 0,
                height: 0,
            };
        }
        let width = 1u32 << (total_elements.ilog2() / 2);
        Self {
            width,
            height: total_elements / width,
        }
    }

    pub fn cell_count(&self) -> u32 {
        self.width * self.height
    }

    /// Cell under normalized coordinates `(u, v)`, origin at the top-left.
    ///
    /// Coordinates outside `[0, 1]` are clamped onto the border cells.
    pub fn cell_at(&self, u: f32, v: f32) -> u32 {
        if self.cell_count() == 0 {
            return 0;
        }
        let column = Self::axis_index(u, self.width);
        let row = Self::axis_index(v, self.height);
        row * self.width + column
    }

    /// `(column, row)` of a flat index, clamped to the last cell.
    pub fn position(&self, cell: u32) -> (u32, u32) {
        if self.cell_count() == 0 {
            return (0, 0);
        }
        let cell = cell.min(self.cell_count() - 1);
        (cell % self.width, cell / self.width)
    }

    fn axis_index(t: f32, cells: u32) -> u32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        ((t * cells as f32) as u32).min(cells - 1)
    }
}
