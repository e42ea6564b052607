//! In-memory module store and the capability trait the drag code writes through.

use std::collections::HashSet;

use blake3::Hash;

use crate::error::{GridError, Result};
use crate::layout::{Coord, GridConfig, Module, ModuleId};

/// Capability handed to the drag resolver and fixup: read the live module
/// set and propose replacements. Owners apply `update_module` replace-by-id,
/// preserving the order of every other module.
pub trait ModuleStore {
    fn current_modules(&self) -> Vec<Module>;

    fn update_module(&mut self, updated: Module);

    fn module(&self, id: ModuleId) -> Option<Module> {
        self.current_modules().into_iter().find(|module| module.id == id)
    }
}

/// In-memory module store with dirty tracking.
#[derive(Debug, Default, Clone)]
pub struct ModuleSet {
    modules: Vec<Module>,
    dirty: HashSet<ModuleId>,
}

impl ModuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from caller supplied modules. Later duplicates of an id
    /// are dropped so identity stays unique.
    pub fn from_modules(modules: impl IntoIterator<Item = Module>) -> Self {
        let mut seen = HashSet::new();
        let modules = modules
            .into_iter()
            .filter(|module| seen.insert(module.id))
            .collect();
        Self {
            modules,
            dirty: HashSet::new(),
        }
    }

    /// Three-module starter layout.
    pub fn sample(grid: &GridConfig) -> Self {
        Self::from_modules([
            Module::seeded(1, 1, 80.0, 2, 200.0, grid),
            Module::seeded(2, 5, 0.0, 3, 100.0, grid),
            Module::seeded(3, 4, 310.0, 3, 200.0, grid),
        ])
    }

    /// Decode a layout without checking it against any grid. Spans outside
    /// `1..=num_columns` make `snap_left` place modules left of the gutter;
    /// use [`ModuleSet::from_json_with_grid`] for untrusted input.
    pub fn from_json(raw: &str) -> Result<Self> {
        let modules: Vec<Module> = serde_json::from_str(raw)?;
        Ok(Self::from_modules(modules))
    }

    /// Decode a layout and reject modules whose span or height does not fit
    /// `grid`.
    pub fn from_json_with_grid(raw: &str, grid: &GridConfig) -> Result<Self> {
        let modules: Vec<Module> = serde_json::from_str(raw)?;
        for module in &modules {
            grid.validate_span(module.coord.w)?;
            if !module.coord.h.is_finite() || module.coord.h <= 0.0 {
                return Err(GridError::InvalidConfig(format!(
                    "module {} height must be positive, got {}",
                    module.id, module.coord.h
                )));
            }
        }
        Ok(Self::from_modules(modules))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.modules)?)
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn get(&self, id: ModuleId) -> Option<&Module> {
        self.modules.iter().find(|module| module.id == id)
    }

    pub fn coord_of(&self, id: ModuleId) -> Result<Coord> {
        self.get(id)
            .map(|module| module.coord)
            .ok_or(GridError::UnknownModule(id))
    }

    /// Replace the module with the same id. Unknown ids are ignored.
    pub fn replace(&mut self, updated: Module) -> bool {
        match self.modules.iter_mut().find(|module| module.id == updated.id) {
            Some(slot) => {
                if *slot != updated {
                    *slot = updated;
                    self.dirty.insert(updated.id);
                }
                true
            }
            None => false,
        }
    }

    /// Drain the ids changed since the last call, in set order.
    pub fn take_dirty(&mut self) -> Vec<ModuleId> {
        let dirty = std::mem::take(&mut self.dirty);
        self.modules
            .iter()
            .map(|module| module.id)
            .filter(|id| dirty.contains(id))
            .collect()
    }

    pub fn has_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Pixel height needed to show every module plus the outer gutters.
    pub fn container_height(&self, grid: &GridConfig) -> f64 {
        let tallest = self
            .modules
            .iter()
            .map(|module| module.coord.y + module.coord.h)
            .fold(None, |acc: Option<f64>, bottom| {
                Some(acc.map_or(bottom, |current| current.max(bottom)))
            })
            .unwrap_or(0.0);
        tallest + grid.gutter_size * 2.0
    }

    /// Content hash of the layout, stable for identical ids, order and coords.
    pub fn fingerprint(&self) -> Hash {
        let mut hasher = blake3::Hasher::new();
        for module in &self.modules {
            hasher.update(&module.id.to_le_bytes());
            hasher.update(&module.coord.x.to_le_bytes());
            hasher.update(&module.coord.y.to_le_bytes());
            hasher.update(&module.coord.w.to_le_bytes());
            hasher.update(&module.coord.h.to_le_bytes());
        }
        hasher.finalize()
    }
}

impl ModuleStore for ModuleSet {
    fn current_modules(&self) -> Vec<Module> {
        self.modules.clone()
    }

    fn update_module(&mut self, updated: Module) {
        self.replace(updated);
    }

    fn module(&self, id: ModuleId) -> Option<Module> {
        self.get(id).copied()
    }
}
