//! Module data model: identity, placement and grid seeding.

use serde::{Deserialize, Serialize};

use crate::geometry::{PixelRect, Position};
use crate::layout::grid::GridConfig;

/// Stable module identity; never reused for the lifetime of a layout.
pub type ModuleId = u32;

/// Module placement. `x`/`y` are pixel-space top-left, `w` is a column span
/// (`1..=num_columns`) and `h` a pixel height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
    pub w: u16,
    pub h: f64,
}

impl Coord {
    pub const fn new(x: f64, y: f64, w: u16, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn position(&self) -> Position {
        Position::new(self.y, self.x)
    }

    pub fn with_position(self, position: Position) -> Self {
        Self {
            x: position.left,
            y: position.top,
            ..self
        }
    }
}

/// A positioned rectangular layout unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub id: ModuleId,
    pub coord: Coord,
}

impl Module {
    pub const fn new(id: ModuleId, coord: Coord) -> Self {
        Self { id, coord }
    }

    /// Build a module from a column index and a raw vertical offset.
    pub fn seeded(
        id: ModuleId,
        column: u16,
        offset: f64,
        w: u16,
        h: f64,
        grid: &GridConfig,
    ) -> Self {
        Self::new(
            id,
            Coord::new(
                grid.column_index_to_pixel_x(column),
                grid.pixel_y_from_offset(offset),
                w,
                h,
            ),
        )
    }

    pub fn position(&self) -> Position {
        self.coord.position()
    }

    pub fn moved_to(self, position: Position) -> Self {
        Self {
            coord: self.coord.with_position(position),
            ..self
        }
    }

    /// Rectangle the module occupies on screen, without gutter padding.
    pub fn visual_rect(&self, grid: &GridConfig) -> PixelRect {
        PixelRect::new(
            self.coord.x,
            self.coord.y,
            grid.width_in_columns_to_pixels(self.coord.w),
            self.coord.h,
        )
    }
}
