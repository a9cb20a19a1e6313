//! A dense, row-major walkability bitmap.
//!
//! Cells default to walkable. Dimensions are fixed for the lifetime of the
//! grid — there is no resize operation, by design (see `SPEC_FULL.md`
//! Non-goals).

use crate::error::{GridForgeError, Result};

/// A fixed-size `cols x rows` walkability grid.
///
/// `index = x + y * cols`. No bounds checking is performed on
/// [`Grid::is_walkable`]/[`Grid::set_walkable`] — callers outside
/// [`crate::pathfinder::Pathfinder`] are expected to pre-validate
/// coordinates themselves.
#[derive(Debug, Clone)]
pub struct Grid {
    cols: usize,
    rows: usize,
    walkable: Vec<bool>,
}

impl Grid {
    /// Create an all-walkable grid of the given dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`GridForgeError::DegenerateGrid`] if either dimension is
    /// zero.
    pub fn new(cols: usize, rows: usize) -> Result<Self> {
        if cols == 0 || rows == 0 {
            return Err(GridForgeError::DegenerateGrid { cols, rows });
        }
        Ok(Self {
            cols,
            rows,
            walkable: vec![true; cols * rows],
        })
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// `true` if `(x, y)` lies within `[0, cols) x [0, rows)`.
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.cols && (y as usize) < self.rows
    }

    /// Row-major cell index for an in-range `(x, y)`.
    pub fn cell_id(&self, x: i32, y: i32) -> usize {
        x as usize + y as usize * self.cols
    }

    /// Query walkability. No bounds checking — out-of-range coordinates
    /// are the caller's responsibility.
    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.walkable[self.cell_id(x, y)]
    }

    /// Set walkability. No bounds checking.
    pub fn set_walkable(&mut self, x: i32, y: i32, flag: bool) {
        let id = self.cell_id(x, y);
        self.walkable[id] = flag;
    }

    /// Import a flat, row-major pattern where a cell is walkable iff its
    /// entry is `> 0`.
    ///
    /// A mismatched length is a no-op (prior state is preserved) rather
    /// than a failure, per spec.
    pub fn import(&mut self, pattern: &[i32]) {
        if pattern.len() != self.cols * self.rows {
            return;
        }
        for (cell, value) in self.walkable.iter_mut().zip(pattern.iter()) {
            *cell = *value > 0;
        }
    }
}
