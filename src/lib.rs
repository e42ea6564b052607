//! Column grid layout engine with drag resolution and collision fixup.
//!
//! Modules are rectangles whose width is a column span and whose height is
//! free. While a module is dragged its live position is recomputed every
//! frame from the drag origin and the total pointer displacement, clamped to
//! the gutter and snapped to a column. When the drag ends, the module is
//! pushed straight down below whatever it landed on.
//!
//! The engine never owns the layout: every change goes through a
//! [`ModuleStore`], with [`ModuleSet`] as the in-memory implementation.

pub mod drag;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod logging;
pub mod metrics;
pub mod registry;
pub mod runtime;

pub use drag::{
    DragResolver, DragSession, FixupReport, FixupStrategy, resolve_collisions, resolve_position,
};
pub use error::{GridError, Result};
pub use geometry::{Delta, PixelRect, Position};
pub use layout::{Coord, GridConfig, Module, ModuleId, collides, collisions_with, overlapping_pairs};
pub use logging::{
    FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    MemorySink,
};
pub use metrics::{DragMetrics, MetricSnapshot};
pub use registry::{ModuleSet, ModuleStore};
pub use runtime::audit::{
    DragAudit, DragAuditEvent, DragAuditEventBuilder, DragAuditStage, NullDragAudit,
    RecordingAudit,
};
pub use runtime::driver::{CellMetrics, PointerDriver};
pub use runtime::{DragOutcome, DragRuntime, DragSignal, RuntimeConfig};
