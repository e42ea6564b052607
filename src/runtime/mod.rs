//! Frame-driven drag runtime.
//!
//! `DragRuntime` owns a [`ModuleStore`] and reacts to the three lifecycle
//! signals a host pointer subsystem produces: drag start, one tick per
//! animation frame carrying the total displacement so far, and drag end.
//! Every position change goes through the store's `update_module`, so the
//! next tick always reads the freshly applied layout.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use serde_json::json;

use crate::drag::{DragResolver, DragSession, FixupReport, FixupStrategy};
use crate::geometry::Delta;
use crate::layout::{GridConfig, Module, ModuleId};
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};
use crate::metrics::{DragMetrics, MetricSnapshot};
use crate::registry::ModuleStore;
use crate::{GridError, Result};

pub mod audit;
pub mod driver;

use audit::{DragAudit, DragAuditEventBuilder, DragAuditStage, NullDragAudit};

/// Configuration knobs for the drag runtime.
#[derive(Clone)]
pub struct RuntimeConfig {
    /// Fixup behavior applied when a drag ends.
    pub fixup: FixupStrategy,
    /// Optional structured logger.
    pub logger: Option<Logger>,
    /// Target used for lifecycle log events.
    pub log_target: String,
    /// Shared counters; `None` disables metrics.
    pub metrics: Option<Arc<Mutex<DragMetrics>>>,
    /// Target used when emitting metrics snapshots.
    pub metrics_target: String,
    /// Audit sink for lifecycle checkpoints.
    pub audit: Arc<dyn DragAudit>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            fixup: FixupStrategy::default(),
            logger: None,
            log_target: "grid::drag".to_string(),
            metrics: None,
            metrics_target: "grid::drag.metrics".to_string(),
            audit: Arc::new(NullDragAudit),
        }
    }
}

impl RuntimeConfig {
    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(DragMetrics::new())));
        }
    }

    pub fn disable_metrics(&mut self) {
        self.metrics = None;
    }

    pub fn metrics_handle(&self) -> Option<Arc<Mutex<DragMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}

/// Drag lifecycle signals from the host's pointer subsystem.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragSignal {
    Start(ModuleId),
    /// One animation frame. `None` until the pointer has reported movement.
    Tick(Option<Delta>),
    End(ModuleId),
}

/// What a signal did.
#[derive(Debug, Clone, PartialEq)]
pub enum DragOutcome {
    Started(DragSession),
    Moved(Module),
    /// Tick with nothing to do (idle, or no movement yet).
    Skipped,
    Ended(FixupReport),
}

pub struct DragRuntime<S> {
    store: S,
    resolver: DragResolver,
    config: RuntimeConfig,
    started_at: Instant,
}

impl<S> DragRuntime<S>
where
    S: ModuleStore,
{
    pub fn new(store: S, grid: GridConfig) -> Self {
        Self::with_config(store, grid, RuntimeConfig::default())
    }

    pub fn with_config(store: S, grid: GridConfig, config: RuntimeConfig) -> Self {
        Self {
            store,
            resolver: DragResolver::new(grid),
            config,
            started_at: Instant::now(),
        }
    }

    pub fn config_mut(&mut self) -> &mut RuntimeConfig {
        &mut self.config
    }

    pub fn grid(&self) -> &GridConfig {
        self.resolver.grid()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn active_session(&self) -> Option<&DragSession> {
        self.resolver.session()
    }

    pub fn handle(&mut self, signal: DragSignal) -> Result<DragOutcome> {
        match signal {
            DragSignal::Start(id) => self.start(id).map(DragOutcome::Started),
            DragSignal::Tick(delta) => Ok(self.tick(delta)),
            DragSignal::End(id) => self.end(id).map(DragOutcome::Ended),
        }
    }

    /// Feed a recorded signal sequence, stopping at the first error.
    pub fn run_scripted<I>(&mut self, signals: I) -> Result<Vec<DragOutcome>>
    where
        I: IntoIterator<Item = DragSignal>,
    {
        signals
            .into_iter()
            .map(|signal| self.handle(signal))
            .collect()
    }

    fn start(&mut self, id: ModuleId) -> Result<DragSession> {
        let started = self.resolver.start(&self.store, id).map(|session| *session);
        let session = match started {
            Ok(session) => session,
            Err(err) => {
                self.log_rejection(&err);
                return Err(err);
            }
        };
        let initial = session.initial_position();

        self.with_metrics(|metrics| metrics.record_session());
        self.log(
            LogLevel::Info,
            "drag_started",
            [
                json_kv("module", id),
                json_kv("top", initial.top),
                json_kv("left", initial.left),
            ],
        );
        self.audit(
            DragAuditEventBuilder::new(DragAuditStage::SessionStarted)
                .detail("module", json!(id))
                .detail("top", json!(initial.top))
                .detail("left", json!(initial.left)),
        );
        Ok(session)
    }

    fn tick(&mut self, delta: Option<Delta>) -> DragOutcome {
        let emitted = self.resolver.tick(&mut self.store, delta);
        self.with_metrics(|metrics| metrics.record_tick(emitted.is_some()));

        match emitted {
            Some(module) => {
                self.log(
                    LogLevel::Debug,
                    "drag_tick",
                    [
                        json_kv("module", module.id),
                        json_kv("top", module.coord.y),
                        json_kv("left", module.coord.x),
                    ],
                );
                self.audit(
                    DragAuditEventBuilder::new(DragAuditStage::PositionEmitted)
                        .detail("module", json!(module.id))
                        .detail("top", json!(module.coord.y))
                        .detail("left", json!(module.coord.x)),
                );
                DragOutcome::Moved(module)
            }
            None => {
                self.audit(
                    DragAuditEventBuilder::new(DragAuditStage::TickSkipped)
                        .detail("dragging", json!(self.resolver.is_dragging())),
                );
                DragOutcome::Skipped
            }
        }
    }

    fn end(&mut self, id: ModuleId) -> Result<FixupReport> {
        let report = match self.resolver.end(&mut self.store, id, self.config.fixup) {
            Ok(report) => report,
            Err(err) => {
                self.log_rejection(&err);
                return Err(err);
            }
        };
        self.record_fixup(&report);
        Ok(report)
    }

    /// Treat a stopped frame loop as a drag end: run the fixup for whatever
    /// session is active. Returns `None` when idle.
    pub fn finish_active(&mut self) -> Result<Option<FixupReport>> {
        let report = self.resolver.finish(&mut self.store, self.config.fixup);
        if let Some(report) = &report {
            self.record_fixup(report);
        }
        Ok(report)
    }

    pub fn metrics_snapshot(&self) -> Option<MetricSnapshot> {
        let metrics = self.config.metrics.as_ref()?;
        let guard = metrics.lock().ok()?;
        Some(guard.snapshot(self.started_at.elapsed()))
    }

    /// Log the current metrics snapshot, if metrics and a logger are set.
    pub fn emit_metrics(&self) {
        let (Some(logger), Some(snapshot)) = (self.config.logger.as_ref(), self.metrics_snapshot())
        else {
            return;
        };
        let _ = logger.log_event(snapshot.to_log_event(&self.config.metrics_target));
    }

    fn record_fixup(&mut self, report: &FixupReport) {
        self.with_metrics(|metrics| {
            metrics.record_fixup(report.displaced_by.len(), report.residual.len())
        });

        for below in &report.displaced_by {
            self.log(
                LogLevel::Info,
                "fixup_displaced",
                [
                    json_kv("module", report.module_id),
                    json_kv("below", *below),
                ],
            );
            self.audit(
                DragAuditEventBuilder::new(DragAuditStage::CollisionResolved)
                    .detail("module", json!(report.module_id))
                    .detail("below", json!(below)),
            );
        }

        if !report.is_clean() {
            self.log(
                LogLevel::Warn,
                "fixup_residual_overlap",
                [
                    json_kv("module", report.module_id),
                    json_kv("residual", json!(report.residual)),
                ],
            );
            self.audit(
                DragAuditEventBuilder::new(DragAuditStage::ResidualOverlap)
                    .detail("module", json!(report.module_id))
                    .detail("residual", json!(report.residual)),
            );
        }

        self.log(
            LogLevel::Info,
            "drag_ended",
            [
                json_kv("module", report.module_id),
                json_kv("top", report.resolved.y),
                json_kv("left", report.resolved.x),
                json_kv("passes", report.passes),
                json_kv("moved", report.moved()),
            ],
        );
        self.audit(
            DragAuditEventBuilder::new(DragAuditStage::SessionEnded)
                .detail("module", json!(report.module_id))
                .detail("top", json!(report.resolved.y))
                .detail("left", json!(report.resolved.x)),
        );
    }

    fn log_rejection(&self, err: &GridError) {
        self.log(
            LogLevel::Warn,
            "drag_rejected",
            [json_kv("error", err.to_string())],
        );
    }

    fn log<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        if let Some(logger) = self.config.logger.as_ref() {
            if !logger.enabled(level) {
                return;
            }
            let event = event_with_fields(level, &self.config.log_target, message, fields);
            let _ = logger.log_event(event);
        }
    }

    fn audit(&self, builder: DragAuditEventBuilder) {
        self.config.audit.record(builder.finish());
    }

    fn with_metrics(&self, apply: impl FnOnce(&mut DragMetrics)) {
        if let Some(metrics) = self.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                apply(&mut *guard);
            }
        }
    }
}
