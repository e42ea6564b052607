//! Fixed-pitch column grid: conversions between grid units and pixel space.
//!
//! A grid is described by three constants fixed at startup:
//! - `column_width`: pixel pitch of one column
//! - `gutter_size`: padding kept between and around modules
//! - `num_columns`: total grid width in columns
//!
//! Module widths are expressed in columns and module heights in pixels. The
//! left edge of a module is always grid aligned (`column_width * k + gutter`)
//! while its top edge is free.
//!
//! # Example
//! ```
//! use module_grid::layout::grid::GridConfig;
//!
//! let grid = GridConfig::default();
//! assert_eq!(grid.width_in_columns_to_pixels(2), 159.0);
//! assert_eq!(grid.snap_left(200.0, 2), 179.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

pub const DEFAULT_COLUMN_WIDTH: f64 = 84.5;
pub const DEFAULT_GUTTER_SIZE: f64 = 10.0;
pub const DEFAULT_NUM_COLUMNS: u16 = 12;

/// Grid constants shared by every geometry, collision and drag computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub column_width: f64,
    pub gutter_size: f64,
    pub num_columns: u16,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            column_width: DEFAULT_COLUMN_WIDTH,
            gutter_size: DEFAULT_GUTTER_SIZE,
            num_columns: DEFAULT_NUM_COLUMNS,
        }
    }
}

impl GridConfig {
    pub fn new(column_width: f64, gutter_size: f64, num_columns: u16) -> Result<Self> {
        let config = Self {
            column_width,
            gutter_size,
            num_columns,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON object; missing keys fall back to the defaults.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.column_width.is_finite() || self.column_width <= 0.0 {
            return Err(GridError::InvalidConfig(format!(
                "column width must be positive, got {}",
                self.column_width
            )));
        }
        if !self.gutter_size.is_finite() || self.gutter_size < 0.0 {
            return Err(GridError::InvalidConfig(format!(
                "gutter size must be non-negative, got {}",
                self.gutter_size
            )));
        }
        if self.num_columns == 0 {
            return Err(GridError::InvalidConfig(
                "grid needs at least one column".to_string(),
            ));
        }
        Ok(())
    }

    /// Reject column spans that cannot sit inside the grid.
    pub fn validate_span(&self, w: u16) -> Result<()> {
        if w == 0 || w > self.num_columns {
            return Err(GridError::InvalidConfig(format!(
                "module span must be 1..={} columns, got {w}",
                self.num_columns
            )));
        }
        Ok(())
    }

    /// Visual (gutter-deflated) pixel width of a module spanning `w` columns.
    pub fn width_in_columns_to_pixels(&self, w: u16) -> f64 {
        f64::from(w) * self.column_width - self.gutter_size
    }

    /// Pixel x of the module whose left edge sits on `column_index`.
    pub fn column_index_to_pixel_x(&self, column_index: u16) -> f64 {
        self.width_in_columns_to_pixels(column_index) + 2.0 * self.gutter_size
    }

    /// Pixel y for a raw vertical offset measured from the top gutter.
    pub fn pixel_y_from_offset(&self, offset: f64) -> f64 {
        offset + self.gutter_size
    }

    /// Snap a raw left position to the nearest column, keeping a module of
    /// width `w` fully inside the grid.
    pub fn snap_left(&self, movement: f64, w: u16) -> f64 {
        let mut column_index = (movement / self.column_width).round();
        let columns = f64::from(self.num_columns);
        if column_index + f64::from(w) > columns {
            column_index = columns - f64::from(w);
        }
        self.column_width * column_index + self.gutter_size
    }

    /// Full pixel width of the container holding the grid.
    pub fn container_width(&self) -> f64 {
        f64::from(self.num_columns) * self.column_width + self.gutter_size
    }

    /// Pixel x of every column's left edge, left to right.
    pub fn column_guides(&self) -> Vec<f64> {
        (0..self.num_columns)
            .map(|column| self.column_width * f64::from(column) + self.gutter_size)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> GridConfig {
        GridConfig::default()
    }

    #[test]
    fn spans_must_fit_the_grid() {
        let grid = grid();
        assert!(grid.validate_span(1).is_ok());
        assert!(grid.validate_span(grid.num_columns).is_ok());
        assert!(matches!(grid.validate_span(0), Err(GridError::InvalidConfig(_))));
        assert!(matches!(
            grid.validate_span(grid.num_columns + 1),
            Err(GridError::InvalidConfig(_))
        ));
    }

    #[test]
    fn width_conversion_deflates_by_gutter() {
        let grid = grid();
        for w in 1..=grid.num_columns {
            assert_eq!(
                grid.width_in_columns_to_pixels(w),
                f64::from(w) * grid.column_width - grid.gutter_size
            );
        }
    }

    #[test]
    fn column_index_matches_snapped_left() {
        let grid = grid();
        assert_eq!(grid.column_index_to_pixel_x(1), 94.5);
        assert_eq!(grid.column_index_to_pixel_x(4), grid.snap_left(338.0, 3));
        assert_eq!(grid.pixel_y_from_offset(80.0), 90.0);
    }

    #[test]
    fn snap_left_rounds_to_nearest_column() {
        let grid = grid();
        assert_eq!(
            grid.snap_left(200.0, 2),
            grid.column_width * 2.0 + grid.gutter_size
        );
        assert_eq!(grid.snap_left(130.0, 2), grid.column_width * 2.0 + grid.gutter_size);
        assert_eq!(grid.snap_left(120.0, 2), grid.column_width + grid.gutter_size);
    }

    #[test]
    fn snap_left_clamps_to_right_edge() {
        let grid = grid();
        assert_eq!(
            grid.snap_left(1300.0, 3),
            grid.column_width * 9.0 + grid.gutter_size
        );
        assert_eq!(
            grid.snap_left(5000.0, 12),
            grid.gutter_size
        );
    }

    #[test]
    fn container_extents() {
        let grid = grid();
        assert_eq!(grid.container_width(), 1024.0);
        let guides = grid.column_guides();
        assert_eq!(guides.len(), 12);
        assert_eq!(guides[0], 10.0);
        assert_eq!(guides[11], 84.5 * 11.0 + 10.0);
    }

    #[test]
    fn config_from_json_uses_defaults_for_missing_keys() {
        let config = GridConfig::from_json_str(r#"{ "num_columns": 6 }"#).unwrap();
        assert_eq!(config.num_columns, 6);
        assert_eq!(config.column_width, DEFAULT_COLUMN_WIDTH);
        assert_eq!(config.gutter_size, DEFAULT_GUTTER_SIZE);
    }

    #[test]
    fn invalid_config_is_rejected() {
        assert!(matches!(
            GridConfig::new(0.0, 10.0, 12),
            Err(GridError::InvalidConfig(_))
        ));
        assert!(matches!(
            GridConfig::new(80.0, -1.0, 12),
            Err(GridError::InvalidConfig(_))
        ));
        assert!(matches!(
            GridConfig::from_json_str(r#"{ "num_columns": 0 }"#),
            Err(GridError::InvalidConfig(_))
        ));
        assert!(matches!(
            GridConfig::from_json_str("not json"),
            Err(GridError::Serde(_))
        ));
    }
}
