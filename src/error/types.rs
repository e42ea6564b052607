use thiserror::Error;

use crate::layout::ModuleId;

/// Unified result type for the module grid crate.
pub type Result<T> = std::result::Result<T, GridError>;

/// Errors surfaced at the edges of the grid engine.
///
/// Geometry, collision and snapping math is total and never returns these;
/// they only come from session bookkeeping, configuration and I/O.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("module `{0}` not found")]
    UnknownModule(ModuleId),
    #[error("module `{0}` is already being dragged")]
    DragInProgress(ModuleId),
    #[error("no drag session is active")]
    NoActiveDrag,
    #[error("drag end for module `{requested}` but module `{active}` is being dragged")]
    SessionMismatch {
        active: ModuleId,
        requested: ModuleId,
    },
    #[error("invalid grid configuration: {0}")]
    InvalidConfig(String),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
