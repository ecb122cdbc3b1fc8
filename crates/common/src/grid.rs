use serde::{Deserialize, Serialize};

/// Errors from grid addressing.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GridError {
    #[error("cell ({x}, {y}) is outside a {width}x{height} grid")]
    OutOfBounds { x: u32, y: u32, width: u32, height: u32 },
}

/// Dimensions of a 2D cell grid.
///
/// Cells are addressed by `(x, y)` with `x < width` and `y < height`, and
/// flattened row-major with `height` as the row stride: `index = x*height + y`.
/// A row of cells that share an `x` therefore occupies a contiguous run of
/// `height` slots — the property the parallel fill relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDims {
    pub width: u32,
    pub height: u32,
}

impl GridDims {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `(x, y)` addresses a cell of this grid.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    /// Flattened index of `(x, y)`, validated against the grid bounds.
    pub fn flatten(&self, x: u32, y: u32) -> Result<usize, GridError> {
        if !self.contains(x, y) {
            return Err(GridError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(x as usize * self.height as usize + y as usize)
    }

    /// Inverse of [`flatten`](Self::flatten). `None` for indices past the grid.
    pub fn unflatten(&self, index: usize) -> Option<(u32, u32)> {
        if index >= self.len() {
            return None;
        }
        let stride = self.height as usize;
        Some(((index / stride) as u32, (index % stride) as u32))
    }
}
