//! Drag lifecycle audit hooks.
//!
//! Records capture a stage plus structured details so callers can buffer or
//! inspect what the drag runtime did without parsing log lines.

use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use serde_json::Value;

/// Checkpoints emitted by `DragRuntime`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragAuditStage {
    /// A drag session began.
    SessionStarted,
    /// A frame tick wrote a new live position.
    PositionEmitted,
    /// A frame tick arrived with nothing to do.
    TickSkipped,
    /// The fixup pushed the dropped module below another module.
    CollisionResolved,
    /// The fixup finished with the module still overlapping something.
    ResidualOverlap,
    /// The session ended and the fixup ran.
    SessionEnded,
}

#[derive(Debug, Clone)]
pub struct DragAuditEvent {
    pub timestamp: SystemTime,
    pub stage: DragAuditStage,
    pub details: Vec<(String, Value)>,
}

impl DragAuditEvent {
    fn new(stage: DragAuditStage) -> Self {
        Self {
            timestamp: SystemTime::now(),
            stage,
            details: Vec::new(),
        }
    }

    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }
}

pub struct DragAuditEventBuilder {
    event: DragAuditEvent,
}

impl DragAuditEventBuilder {
    pub fn new(stage: DragAuditStage) -> Self {
        Self {
            event: DragAuditEvent::new(stage),
        }
    }

    pub fn detail(mut self, key: impl Into<String>, value: Value) -> Self {
        self.event.details.push((key.into(), value));
        self
    }

    pub fn finish(self) -> DragAuditEvent {
        self.event
    }
}

pub trait DragAudit: Send + Sync {
    fn record(&self, event: DragAuditEvent);
}

#[derive(Debug, Default)]
pub struct NullDragAudit;

impl DragAudit for NullDragAudit {
    fn record(&self, _event: DragAuditEvent) {}
}

/// Buffers every record; clones share the buffer.
#[derive(Debug, Clone, Default)]
pub struct RecordingAudit {
    events: Arc<Mutex<Vec<DragAuditEvent>>>,
}

impl RecordingAudit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DragAuditEvent> {
        self.events
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn stages(&self) -> Vec<DragAuditStage> {
        self.events().into_iter().map(|event| event.stage).collect()
    }
}

impl DragAudit for RecordingAudit {
    fn record(&self, event: DragAuditEvent) {
        if let Ok(mut guard) = self.events.lock() {
            guard.push(event);
        }
    }
}
