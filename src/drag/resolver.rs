//! Drag session state machine and per-frame position resolution.
//!
//! A resolver is either idle or owns exactly one [`DragSession`]. Starting a
//! drag records the module's position at that moment; every tick then
//! recomputes the live position from `initial + total displacement`, so
//! nothing accumulates across frames. Ending the drag returns to idle and
//! runs the collision fixup exactly once.

use crate::error::{GridError, Result};
use crate::geometry::{Delta, Position};
use crate::layout::{GridConfig, Module, ModuleId};
use crate::registry::ModuleStore;

use super::fixup::{FixupReport, FixupStrategy, resolve_collisions};

/// Clamp and snap `initial + delta` for a module spanning `w` columns.
///
/// The top is clamped to the gutter with no lower bound; the left is clamped
/// to the gutter and otherwise snapped to a column that keeps the module
/// inside the grid.
pub fn resolve_position(grid: &GridConfig, initial: Position, w: u16, delta: Delta) -> Position {
    let raw_top = initial.top + delta.dy;
    let raw_left = initial.left + delta.dx;

    let top = if raw_top < grid.gutter_size {
        grid.gutter_size
    } else {
        raw_top
    };
    let left = if raw_left < grid.gutter_size {
        grid.gutter_size
    } else {
        grid.snap_left(raw_left, w)
    };

    Position::new(top, left)
}

/// State owned for the lifetime of one drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    /// The module as it was when the drag started.
    pub origin: Module,
    /// Last position written to the store.
    pub current: Position,
    pub ticks: u64,
}

impl DragSession {
    fn new(origin: Module) -> Self {
        Self {
            origin,
            current: origin.position(),
            ticks: 0,
        }
    }

    pub fn module_id(&self) -> ModuleId {
        self.origin.id
    }

    pub fn initial_position(&self) -> Position {
        self.origin.position()
    }

    /// The module at its current live position.
    pub fn live_module(&self) -> Module {
        self.origin.moved_to(self.current)
    }
}

#[derive(Debug, Clone)]
pub struct DragResolver {
    grid: GridConfig,
    session: Option<DragSession>,
}

impl DragResolver {
    pub fn new(grid: GridConfig) -> Self {
        Self {
            grid,
            session: None,
        }
    }

    pub fn grid(&self) -> &GridConfig {
        &self.grid
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Idle → Dragging. Records the module's current position as the
    /// session origin.
    pub fn start<S>(&mut self, store: &S, id: ModuleId) -> Result<&DragSession>
    where
        S: ModuleStore + ?Sized,
    {
        if let Some(active) = self.session.as_ref() {
            return Err(GridError::DragInProgress(active.module_id()));
        }
        let origin = store.module(id).ok_or(GridError::UnknownModule(id))?;
        Ok(&*self.session.insert(DragSession::new(origin)))
    }

    /// Recompute the live position for this frame and write it through
    /// `store`. Returns the emitted module, or `None` when idle or when no
    /// displacement has been reported yet.
    pub fn tick<S>(&mut self, store: &mut S, delta: Option<Delta>) -> Option<Module>
    where
        S: ModuleStore + ?Sized,
    {
        let session = self.session.as_mut()?;
        let delta = delta?;

        session.current = resolve_position(
            &self.grid,
            session.initial_position(),
            session.origin.coord.w,
            delta,
        );
        session.ticks = session.ticks.saturating_add(1);

        let live = session.live_module();
        store.update_module(live);
        Some(live)
    }

    /// Dragging → Idle, followed by one fixup run against the store.
    pub fn end<S>(
        &mut self,
        store: &mut S,
        id: ModuleId,
        strategy: FixupStrategy,
    ) -> Result<FixupReport>
    where
        S: ModuleStore + ?Sized,
    {
        let session = match self.session.as_ref() {
            None => return Err(GridError::NoActiveDrag),
            Some(active) if active.module_id() != id => {
                return Err(GridError::SessionMismatch {
                    active: active.module_id(),
                    requested: id,
                });
            }
            Some(active) => *active,
        };
        self.session = None;
        Ok(resolve_collisions(
            store,
            session.live_module(),
            &self.grid,
            strategy,
        ))
    }

    /// End whatever session is active, for hosts whose frame loop stopped
    /// without a matching drag end. The fixup still runs once.
    pub fn finish<S>(&mut self, store: &mut S, strategy: FixupStrategy) -> Option<FixupReport>
    where
        S: ModuleStore + ?Sized,
    {
        let session = self.session.take()?;
        Some(resolve_collisions(
            store,
            session.live_module(),
            &self.grid,
            strategy,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::overlapping_pairs;
    use crate::registry::ModuleSet;

    fn setup() -> (DragResolver, ModuleSet) {
        let grid = GridConfig::default();
        (DragResolver::new(grid), ModuleSet::sample(&grid))
    }

    #[test]
    fn resolve_clamps_top_and_left_to_gutter() {
        let grid = GridConfig::default();
        let initial = Position::new(90.0, 94.5);
        let resolved = resolve_position(&grid, initial, 2, Delta::new(-500.0, -500.0));
        assert_eq!(resolved, Position::new(grid.gutter_size, grid.gutter_size));

        let just_inside = resolve_position(&grid, initial, 2, Delta::new(-84.5, -80.0));
        assert_eq!(just_inside, Position::new(grid.gutter_size, grid.gutter_size));
    }

    #[test]
    fn resolve_has_no_bottom_clamp() {
        let grid = GridConfig::default();
        let resolved =
            resolve_position(&grid, Position::new(90.0, 94.5), 2, Delta::new(0.0, 10_000.0));
        assert_eq!(resolved.top, 10_090.0);
        assert_eq!(resolved.left, 94.5);
    }

    #[test]
    fn resolve_snaps_and_clamps_right_edge() {
        let grid = GridConfig::default();
        let resolved =
            resolve_position(&grid, Position::new(90.0, 94.5), 3, Delta::new(2000.0, 0.0));
        assert_eq!(resolved.left, grid.column_width * 9.0 + grid.gutter_size);
    }

    #[test]
    fn ticks_are_absolute_not_accumulated() {
        let (mut resolver, mut set) = setup();
        resolver.start(&set, 1).unwrap();

        resolver.tick(&mut set, Some(Delta::new(0.0, 50.0)));
        resolver.tick(&mut set, Some(Delta::new(0.0, 50.0)));
        let live = resolver.tick(&mut set, Some(Delta::new(0.0, 60.0))).unwrap();

        assert_eq!(live.coord.y, 150.0);
        assert_eq!(set.coord_of(1).unwrap().y, 150.0);
        assert_eq!(resolver.session().unwrap().ticks, 3);
        assert_eq!(resolver.session().unwrap().initial_position(), Position::new(90.0, 94.5));
    }

    #[test]
    fn tick_without_movement_is_a_noop() {
        let (mut resolver, mut set) = setup();
        resolver.start(&set, 2).unwrap();
        assert!(resolver.tick(&mut set, None).is_none());
        assert!(!set.has_dirty());
        assert_eq!(resolver.session().unwrap().ticks, 0);
    }

    #[test]
    fn tick_while_idle_is_ignored() {
        let (mut resolver, mut set) = setup();
        assert!(resolver.tick(&mut set, Some(Delta::new(40.0, 40.0))).is_none());
        assert!(!set.has_dirty());
    }

    #[test]
    fn second_start_is_rejected() {
        let (mut resolver, set) = setup();
        resolver.start(&set, 1).unwrap();
        assert!(matches!(resolver.start(&set, 2), Err(GridError::DragInProgress(1))));
    }

    #[test]
    fn unknown_module_cannot_be_dragged() {
        let (mut resolver, set) = setup();
        assert!(matches!(resolver.start(&set, 99), Err(GridError::UnknownModule(99))));
        assert!(!resolver.is_dragging());
    }

    #[test]
    fn end_requires_matching_session() {
        let (mut resolver, mut set) = setup();
        assert!(matches!(
            resolver.end(&mut set, 1, FixupStrategy::SinglePass),
            Err(GridError::NoActiveDrag)
        ));

        resolver.start(&set, 1).unwrap();
        assert!(matches!(
            resolver.end(&mut set, 3, FixupStrategy::SinglePass),
            Err(GridError::SessionMismatch { active: 1, requested: 3 })
        ));
        assert!(resolver.is_dragging());

        let report = resolver.end(&mut set, 1, FixupStrategy::SinglePass).unwrap();
        assert!(!report.moved());
        assert!(!resolver.is_dragging());
    }

    #[test]
    fn end_without_ticks_uses_initial_position() {
        let (mut resolver, mut set) = setup();
        resolver.start(&set, 3).unwrap();
        let report = resolver.end(&mut set, 3, FixupStrategy::SinglePass).unwrap();
        assert_eq!(report.dropped, set.coord_of(3).unwrap());
        assert!(report.is_clean());
    }

    #[test]
    fn new_session_restarts_from_current_position() {
        let (mut resolver, mut set) = setup();
        resolver.start(&set, 2).unwrap();
        resolver.tick(&mut set, Some(Delta::new(0.0, 700.0)));
        resolver.end(&mut set, 2, FixupStrategy::SinglePass).unwrap();

        let session = resolver.start(&set, 2).unwrap();
        assert_eq!(session.initial_position(), Position::new(710.0, 432.5));
    }

    #[test]
    fn stopped_session_still_resolves_overlap() {
        let grid = GridConfig::default();
        let (mut resolver, mut set) = setup();
        resolver.start(&set, 1).unwrap();
        resolver.tick(&mut set, Some(Delta::new(253.5, 230.0)));
        assert_eq!(overlapping_pairs(set.modules(), &grid), vec![(1, 3)]);

        let report = resolver.finish(&mut set, FixupStrategy::SinglePass).unwrap();
        assert_eq!(report.displaced_by, vec![3]);
        assert_eq!(set.coord_of(1).unwrap().y, 530.0);
        assert!(overlapping_pairs(set.modules(), &grid).is_empty());
        assert!(!resolver.is_dragging());
        assert!(resolver.finish(&mut set, FixupStrategy::SinglePass).is_none());
    }
}
