mod core;

pub use self::core::{ModuleSet, ModuleStore};
