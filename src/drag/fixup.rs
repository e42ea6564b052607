//! Post-drag collision fixup.
//!
//! When a drag ends, the dropped module is pushed straight down below any
//! module it collides with. Only the vertical axis is corrected; `x` is left
//! exactly where the resolver snapped it.
//!
//! The default [`FixupStrategy::SinglePass`] scans the other modules once,
//! in store order, testing each against the drop position. Every hit
//! overwrites the dropped module's top with `hit.y + hit.h + gutter`, so the
//! last hit wins and the displaced position is never re-checked. A layout
//! with several stacked collisions can therefore still overlap afterwards;
//! those ids are reported in [`FixupReport::residual`].
//!
//! [`FixupStrategy::UntilStable`] repeats the pass from the displaced
//! position until nothing collides. Each pass moves the module strictly
//! downward onto the bottom edge of some other module, so at most
//! `others + 1` passes run.

use serde::{Deserialize, Serialize};

use crate::layout::collision::{collides, collisions_with};
use crate::layout::{Coord, GridConfig, Module, ModuleId};
use crate::registry::ModuleStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixupStrategy {
    #[default]
    SinglePass,
    UntilStable,
}

/// Outcome of one fixup run.
#[derive(Debug, Clone, PartialEq)]
pub struct FixupReport {
    pub module_id: ModuleId,
    /// Where the module was dropped.
    pub dropped: Coord,
    /// Where the module ended up after displacement.
    pub resolved: Coord,
    /// Ids the module was pushed below, in the order the pushes happened.
    pub displaced_by: Vec<ModuleId>,
    /// Scanning passes performed.
    pub passes: usize,
    /// Ids still colliding with `resolved`.
    pub residual: Vec<ModuleId>,
}

impl FixupReport {
    pub fn moved(&self) -> bool {
        self.dropped != self.resolved
    }

    pub fn is_clean(&self) -> bool {
        self.residual.is_empty()
    }
}

/// Push `dropped` below the modules it collides with, writing each
/// correction through `store`. Nothing is written when there is no
/// collision.
pub fn resolve_collisions<S>(
    store: &mut S,
    dropped: Module,
    grid: &GridConfig,
    strategy: FixupStrategy,
) -> FixupReport
where
    S: ModuleStore + ?Sized,
{
    let others: Vec<Module> = store
        .current_modules()
        .into_iter()
        .filter(|module| module.id != dropped.id)
        .collect();

    let max_passes = match strategy {
        FixupStrategy::SinglePass => 1,
        FixupStrategy::UntilStable => others.len() + 1,
    };

    let mut current = dropped;
    let mut displaced_by = Vec::new();
    let mut passes = 0;

    while passes < max_passes {
        passes += 1;
        let probe = current;
        let mut hit = false;
        for other in &others {
            if !collides(&probe, other, grid) {
                continue;
            }
            hit = true;
            current.coord.y = other.coord.y + other.coord.h + grid.gutter_size;
            store.update_module(current);
            displaced_by.push(other.id);
        }
        if !hit {
            break;
        }
    }

    let residual = collisions_with(&current, &others, grid)
        .map(|module| module.id)
        .collect();

    FixupReport {
        module_id: dropped.id,
        dropped: dropped.coord,
        resolved: current.coord,
        displaced_by,
        passes,
        residual,
    }
}
