//! Drag handling: per-frame position resolution and post-drop fixup.

pub mod fixup;
pub mod resolver;

pub use fixup::{FixupReport, FixupStrategy, resolve_collisions};
pub use resolver::{DragResolver, DragSession, resolve_position};
