//! Padded bounding-box collision detection between modules.
//!
//! Every module is inflated by one gutter on its right and bottom edges, so
//! two modules collide when they are closer than a gutter apart. Intervals
//! are half-open: a module whose padded edge exactly touches another does
//! not collide with it.

use crate::geometry::PixelRect;
use crate::layout::{Module, ModuleId};
use crate::layout::grid::GridConfig;

/// Gutter-padded rectangle used for collision tests.
pub fn padded_bounds(module: &Module, grid: &GridConfig) -> PixelRect {
    PixelRect::new(
        module.coord.x,
        module.coord.y,
        grid.width_in_columns_to_pixels(module.coord.w) + grid.gutter_size,
        module.coord.h + grid.gutter_size,
    )
}

/// Raw geometric overlap test. Does not look at ids; callers exclude
/// self-comparison themselves.
pub fn collides(a: &Module, b: &Module, grid: &GridConfig) -> bool {
    padded_bounds(a, grid).overlaps(&padded_bounds(b, grid))
}

/// Modules in `modules` (other than `candidate` itself, by id) that collide
/// with `candidate`, in iteration order.
pub fn collisions_with<'a>(
    candidate: &'a Module,
    modules: &'a [Module],
    grid: &'a GridConfig,
) -> impl Iterator<Item = &'a Module> + 'a {
    modules
        .iter()
        .filter(move |other| other.id != candidate.id && collides(candidate, other, grid))
}

/// Every colliding pair in the set, each reported once in iteration order.
pub fn overlapping_pairs(modules: &[Module], grid: &GridConfig) -> Vec<(ModuleId, ModuleId)> {
    let mut pairs = Vec::new();
    for (idx, a) in modules.iter().enumerate() {
        for b in &modules[idx + 1..] {
            if a.id != b.id && collides(a, b, grid) {
                pairs.push((a.id, b.id));
            }
        }
    }
    pairs
}
