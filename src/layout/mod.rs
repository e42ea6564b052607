//! Layout module orchestrator.
//!
//! Downstream crates import the module data model, grid configuration and
//! collision helpers from here.

pub mod collision;
mod core;
pub mod grid;

pub use collision::{collides, collisions_with, overlapping_pairs, padded_bounds};
pub use self::core::{Coord, Module, ModuleId};
pub use grid::GridConfig;
