//! Worker records and their order lifecycle.

use std::{sync::Arc, time::Duration};

use lane_defence_core::{CellCoord, CellPoint, TowerId, WorkerId, WorkerSnapshot, WorkerState};

/// Worker stored inside a lane.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Worker {
    pub(crate) id: WorkerId,
    pub(crate) position: CellPoint,
    pub(crate) state: WorkerState,
    pub(crate) target: Option<CellCoord>,
    /// Route toward `target`, inclusive of both ends.
    pub(crate) route: Option<Arc<[CellCoord]>>,
    pub(crate) next_waypoint: usize,
    pub(crate) build_started_at: Option<Duration>,
    /// Foundation registered while the worker builds.
    pub(crate) foundation: Option<TowerId>,
    pub(crate) bound_tower: Option<TowerId>,
}

impl Worker {
    pub(crate) fn new(id: WorkerId, cell: CellCoord) -> Self {
        Self {
            id,
            position: cell.to_point(),
            state: WorkerState::Idle,
            target: None,
            route: None,
            next_waypoint: 0,
            build_started_at: None,
            foundation: None,
            bound_tower: None,
        }
    }

    /// Tile the worker currently stands on.
    pub(crate) fn cell(&self) -> CellCoord {
        self.position.nearest_cell()
    }

    /// Sends the worker along `route` toward its last waypoint.
    pub(crate) fn dispatch(&mut self, route: Vec<CellCoord>, state: WorkerState) {
        self.target = route.last().copied();
        self.route = Some(Arc::from(route));
        self.next_waypoint = 0;
        self.state = state;
    }

    /// Whether the worker still travels along a route.
    pub(crate) fn is_travelling(&self) -> bool {
        matches!(self.state, WorkerState::Moving | WorkerState::Executing)
    }

    /// Drops every order and returns the worker to idle. Returns the
    /// foundation the worker was building, if any.
    pub(crate) fn stand_down(&mut self) -> Option<TowerId> {
        self.state = WorkerState::Idle;
        self.target = None;
        self.route = None;
        self.next_waypoint = 0;
        self.build_started_at = None;
        self.foundation.take()
    }

    pub(crate) fn snapshot(&self) -> WorkerSnapshot {
        WorkerSnapshot {
            id: self.id,
            position: self.position,
            state: self.state,
            target: self.target,
            build_started_at: self.build_started_at,
            bound_tower: self.bound_tower,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_targets_the_last_waypoint() {
        let mut worker = Worker::new(WorkerId::new(0), CellCoord::new(2, 2));
        worker.dispatch(
            vec![CellCoord::new(2, 2), CellCoord::new(2, 1)],
            WorkerState::Moving,
        );

        assert_eq!(worker.target, Some(CellCoord::new(2, 1)));
        assert!(worker.is_travelling());
        assert_eq!(worker.next_waypoint, 0);
    }

    #[test]
    fn stand_down_clears_orders_but_keeps_binding() {
        let mut worker = Worker::new(WorkerId::new(0), CellCoord::new(2, 2));
        worker.bound_tower = Some(TowerId::new(4));
        worker.state = WorkerState::Building;
        worker.build_started_at = Some(Duration::from_millis(10));
        worker.foundation = Some(TowerId::new(9));

        assert_eq!(worker.stand_down(), Some(TowerId::new(9)));
        let snapshot = worker.snapshot();
        assert_eq!(snapshot.state, WorkerState::Idle);
        assert_eq!(snapshot.build_started_at, None);
        assert_eq!(snapshot.bound_tower, Some(TowerId::new(4)));
    }
}
