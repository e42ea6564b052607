use std::time::{Duration, Instant};

use crossterm::event::{self, Event, MouseButton, MouseEvent, MouseEventKind};

use crate::geometry::Delta;
use crate::layout::{GridConfig, Module, ModuleId};
use crate::registry::ModuleStore;
use crate::runtime::{DragOutcome, DragRuntime, DragSignal};
use crate::Result;

/// Pixel size of one terminal cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMetrics {
    pub cell_width: f64,
    pub cell_height: f64,
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self {
            cell_width: 8.0,
            cell_height: 16.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Press {
    module: ModuleId,
    x: f64,
    y: f64,
}

/// Turns crossterm mouse events into drag lifecycle signals.
///
/// Pointer events only update state; a drag tick is produced once per frame
/// by [`PointerDriver::frame`], carrying the total displacement since the
/// press. Until the pointer has moved the tick carries no displacement.
#[derive(Debug, Clone)]
pub struct PointerDriver {
    grid: GridConfig,
    cells: CellMetrics,
    press: Option<Press>,
    delta: Option<Delta>,
}

impl PointerDriver {
    pub fn new(grid: GridConfig, cells: CellMetrics) -> Self {
        Self {
            grid,
            cells,
            press: None,
            delta: None,
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.press.is_some()
    }

    pub fn cell_to_pixels(&self, column: u16, row: u16) -> (f64, f64) {
        (
            f64::from(column) * self.cells.cell_width,
            f64::from(row) * self.cells.cell_height,
        )
    }

    /// Topmost module (last in iteration order) whose visual rect contains
    /// the point.
    pub fn hit_test(&self, x: f64, y: f64, modules: &[Module]) -> Option<ModuleId> {
        modules
            .iter()
            .rev()
            .find(|module| module.visual_rect(&self.grid).contains(x, y))
            .map(|module| module.id)
    }

    pub fn translate(&mut self, event: &MouseEvent, modules: &[Module]) -> Option<DragSignal> {
        let (x, y) = self.cell_to_pixels(event.column, event.row);
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) if self.press.is_none() => {
                let module = self.hit_test(x, y, modules)?;
                self.press = Some(Press { module, x, y });
                self.delta = None;
                Some(DragSignal::Start(module))
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let press = self.press?;
                self.delta = Some(Delta::new(x - press.x, y - press.y));
                None
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let press = self.press.take()?;
                self.delta = None;
                Some(DragSignal::End(press.module))
            }
            _ => None,
        }
    }

    /// Frame tick for the active press, if any.
    pub fn frame(&self) -> Option<DragSignal> {
        self.press.map(|_| DragSignal::Tick(self.delta))
    }

    pub fn pump<S>(
        &mut self,
        runtime: &mut DragRuntime<S>,
        event: &MouseEvent,
    ) -> Result<Option<DragOutcome>>
    where
        S: ModuleStore,
    {
        let modules = runtime.store().current_modules();
        match self.translate(event, &modules) {
            Some(signal @ DragSignal::Start(_)) => match runtime.handle(signal) {
                Ok(outcome) => Ok(Some(outcome)),
                Err(err) => {
                    // the runtime owns another session; this press never began
                    self.release();
                    Err(err)
                }
            },
            Some(signal) => runtime.handle(signal).map(Some),
            None => Ok(None),
        }
    }

    fn release(&mut self) {
        self.press = None;
        self.delta = None;
    }

    pub fn pump_frame<S>(&mut self, runtime: &mut DragRuntime<S>) -> Result<Option<DragOutcome>>
    where
        S: ModuleStore,
    {
        match self.frame() {
            Some(signal) => runtime.handle(signal).map(Some),
            None => Ok(None),
        }
    }

    /// Drain terminal mouse events for one frame interval, then emit the
    /// frame tick. Non-mouse events are dropped.
    pub fn run_frame<S>(
        &mut self,
        runtime: &mut DragRuntime<S>,
        frame: Duration,
    ) -> Result<Vec<DragOutcome>>
    where
        S: ModuleStore,
    {
        let deadline = Instant::now() + frame;
        let mut outcomes = Vec::new();

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() || !event::poll(remaining)? {
                break;
            }
            if let Event::Mouse(mouse) = event::read()? {
                if let Some(outcome) = self.pump(runtime, &mouse)? {
                    outcomes.push(outcome);
                }
            }
        }

        if let Some(outcome) = self.pump_frame(runtime)? {
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }
}
