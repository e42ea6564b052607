use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;
use std::time::Duration;

#[derive(Debug, Default, Clone)]
pub struct DragMetrics {
    sessions: u64,
    ticks: u64,
    idle_ticks: u64,
    position_updates: u64,
    displacements: u64,
    residual_overlaps: u64,
}

impl DragMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_session(&mut self) {
        self.sessions = self.sessions.saturating_add(1);
    }

    /// `emitted` is false for ticks that produced no position update.
    pub fn record_tick(&mut self, emitted: bool) {
        self.ticks = self.ticks.saturating_add(1);
        if emitted {
            self.position_updates = self.position_updates.saturating_add(1);
        } else {
            self.idle_ticks = self.idle_ticks.saturating_add(1);
        }
    }

    pub fn record_fixup(&mut self, displacements: usize, residual: usize) {
        self.displacements = self.displacements.saturating_add(displacements as u64);
        self.position_updates = self.position_updates.saturating_add(displacements as u64);
        if residual > 0 {
            self.residual_overlaps = self.residual_overlaps.saturating_add(1);
        }
    }

    pub fn snapshot(&self, uptime: Duration) -> MetricSnapshot {
        MetricSnapshot {
            uptime_ms: uptime.as_millis() as u64,
            sessions: self.sessions,
            ticks: self.ticks,
            idle_ticks: self.idle_ticks,
            position_updates: self.position_updates,
            displacements: self.displacements,
            residual_overlaps: self.residual_overlaps,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub uptime_ms: u64,
    pub sessions: u64,
    pub ticks: u64,
    pub idle_ticks: u64,
    pub position_updates: u64,
    pub displacements: u64,
    pub residual_overlaps: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "drag_metrics", self.as_fields())
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("uptime_ms".to_string(), json!(self.uptime_ms));
        map.insert("sessions".to_string(), json!(self.sessions));
        map.insert("ticks".to_string(), json!(self.ticks));
        map.insert("idle_ticks".to_string(), json!(self.idle_ticks));
        map.insert("position_updates".to_string(), json!(self.position_updates));
        map.insert("displacements".to_string(), json!(self.displacements));
        map.insert("residual_overlaps".to_string(), json!(self.residual_overlaps));
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_split_idle_and_emitting_ticks() {
        let mut metrics = DragMetrics::new();
        metrics.record_session();
        metrics.record_tick(false);
        metrics.record_tick(true);
        metrics.record_tick(true);
        metrics.record_fixup(2, 1);
        metrics.record_fixup(0, 0);

        let snapshot = metrics.snapshot(Duration::from_millis(1500));
        assert_eq!(snapshot.uptime_ms, 1500);
        assert_eq!(snapshot.sessions, 1);
        assert_eq!(snapshot.ticks, 3);
        assert_eq!(snapshot.idle_ticks, 1);
        assert_eq!(snapshot.position_updates, 4);
        assert_eq!(snapshot.displacements, 2);
        assert_eq!(snapshot.residual_overlaps, 1);
    }

    #[test]
    fn snapshot_becomes_log_event() {
        let snapshot = DragMetrics::new().snapshot(Duration::ZERO);
        let event = snapshot.to_log_event("grid::drag.metrics");
        assert_eq!(event.target, "grid::drag.metrics");
        assert_eq!(event.message, "drag_metrics");
        assert_eq!(event.field("sessions"), Some(&json!(0)));
    }
}
