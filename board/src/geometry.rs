//! Grid geometry: cell sizing, pointer → cell conversion and per-status insets.
//!
//! Everything here is pure. [`GridInfo`] is a derived value recomputed
//! wholesale whenever the board dimensions or the surface size change; the
//! engine never patches individual fields.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use wire::EntityStatus;

use crate::consts::{CELL_EPSILON, FIXED_MARGIN, NORMAL_PADDING, SELECTED_PADDING_RATIO};

/// A point in surface pixel space.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One logical board slot, independent of pixel geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    #[must_use]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Derived pixel geometry for the current board and surface.
///
/// Cell sizes are zero until both `rows` and `cols` are known.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridInfo {
    pub rows: u32,
    pub cols: u32,
    pub surface_width: f64,
    pub surface_height: f64,
    pub cell_width: f64,
    pub cell_height: f64,
    pub cell_half_width: f64,
    pub cell_half_height: f64,
    /// Vertical inset of a selected entity.
    pub row_pad: f64,
    /// Horizontal inset of a selected entity.
    pub col_pad: f64,
}

impl GridInfo {
    /// Compute geometry for `rows` × `cols` cells on a `width` × `height` surface.
    #[must_use]
    pub fn new(rows: u32, cols: u32, width: f64, height: f64) -> Self {
        let usable_w = (width - FIXED_MARGIN).max(0.0);
        let usable_h = (height - FIXED_MARGIN).max(0.0);
        let (cell_width, cell_height) = if rows > 0 && cols > 0 {
            (usable_w / f64::from(cols), usable_h / f64::from(rows))
        } else {
            (0.0, 0.0)
        };
        let cell_half_width = cell_width / 2.0;
        let cell_half_height = cell_height / 2.0;
        Self {
            rows,
            cols,
            surface_width: width,
            surface_height: height,
            cell_width,
            cell_height,
            cell_half_width,
            cell_half_height,
            row_pad: cell_half_height * SELECTED_PADDING_RATIO,
            col_pad: cell_half_width * SELECTED_PADDING_RATIO,
        }
    }

    /// Provisional geometry for a surface whose board dimensions are not yet known.
    #[must_use]
    pub fn provisional(width: f64, height: f64) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Same surface, new board dimensions.
    #[must_use]
    pub fn with_dimensions(&self, rows: u32, cols: u32) -> Self {
        Self::new(rows, cols, self.surface_width, self.surface_height)
    }

    /// Same board dimensions, new surface size.
    #[must_use]
    pub fn with_surface(&self, width: f64, height: f64) -> Self {
        Self::new(self.rows, self.cols, width, height)
    }

    /// Whether the board dimensions are known and placement is possible.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.rows > 0 && self.cols > 0
    }

    /// Top-left pixel of `cell`.
    #[must_use]
    pub fn cell_origin(&self, cell: Cell) -> Point {
        Point::new(self.cell_width * f64::from(cell.x), self.cell_height * f64::from(cell.y))
    }
}

/// Size and inset of an entity drawable within its cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellBox {
    pub width: f64,
    pub height: f64,
    pub x_offset: f64,
    pub y_offset: f64,
}

/// Resolve a pointer position to the grid cell beneath it.
///
/// The returned cell may lie outside the board; callers look it up and treat
/// "no occupant" as a no-op. Returns `None` only while the grid is not ready.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn cell_of(point: Point, grid: &GridInfo) -> Option<Cell> {
    if !grid.is_ready() || grid.cell_width <= 0.0 || grid.cell_height <= 0.0 {
        return None;
    }
    let x = (point.x / grid.cell_width + CELL_EPSILON).floor();
    let y = (point.y / grid.cell_height + CELL_EPSILON).floor();
    if !x.is_finite() || !y.is_finite() {
        return None;
    }
    Some(Cell::new(x as i32, y as i32))
}

/// Size and offset of an entity drawable for `status`.
///
/// Selected entities shrink toward the cell center by half the half-cell;
/// everything else keeps a fixed border inset.
#[must_use]
pub fn size_and_offset_for(status: EntityStatus, grid: &GridInfo) -> CellBox {
    let (pad_x, pad_y) = if status == EntityStatus::Selected {
        (grid.col_pad, grid.row_pad)
    } else {
        (NORMAL_PADDING, NORMAL_PADDING)
    };
    CellBox {
        width: (grid.cell_width - 2.0 * pad_x).max(0.0),
        height: (grid.cell_height - 2.0 * pad_y).max(0.0),
        x_offset: pad_x,
        y_offset: pad_y,
    }
}
