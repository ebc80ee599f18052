//! A single lane: grid, cached route and the entities living on it.

use std::{collections::BTreeMap, sync::Arc};

use lane_defence_core::{
    CellCoord, GridSnapshot, HostileId, LaneId, LaneSnapshot, TowerId, UnitId, WorkerId,
    WorkerState,
};

use crate::{
    grid::TileGrid, hostiles::Hostile, navigation::PathStrategy, towers::TowerState,
    units::Unit, workers::Worker,
};

/// Authoritative state of one lane.
#[derive(Clone, Debug)]
pub(crate) struct Lane {
    pub(crate) id: LaneId,
    pub(crate) grid: TileGrid,
    pub(crate) spawn: CellCoord,
    pub(crate) goal: CellCoord,
    pub(crate) route: Option<Arc<[CellCoord]>>,
    pub(crate) workers: BTreeMap<WorkerId, Worker>,
    pub(crate) towers: BTreeMap<TowerId, TowerState>,
    pub(crate) hostiles: BTreeMap<HostileId, Hostile>,
    pub(crate) units: BTreeMap<UnitId, Unit>,
    revision: u64,
    grid_revision: u64,
}

impl Lane {
    /// Creates an empty square lane with spawn on the top edge and goal on
    /// the bottom edge, both centred.
    pub(crate) fn new(id: LaneId, size: u32, strategy: PathStrategy) -> Self {
        let column = size / 2;
        let mut lane = Self {
            id,
            grid: TileGrid::new(size, size),
            spawn: CellCoord::new(column, 0),
            goal: CellCoord::new(column, size.saturating_sub(1)),
            route: None,
            workers: BTreeMap::new(),
            towers: BTreeMap::new(),
            hostiles: BTreeMap::new(),
            units: BTreeMap::new(),
            revision: 0,
            grid_revision: 0,
        };
        lane.route = lane.compute_route(strategy).map(Arc::from);
        lane
    }

    pub(crate) fn revision(&self) -> u64 {
        self.revision
    }

    pub(crate) fn grid_revision(&self) -> u64 {
        self.grid_revision
    }

    /// Marks the lane as changed for snapshot publication.
    pub(crate) fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    fn touch_grid(&mut self) {
        self.grid_revision = self.grid_revision.wrapping_add(1);
        self.touch();
    }

    pub(crate) fn occupy(&mut self, cell: CellCoord, tower: TowerId) {
        self.grid.occupy(cell, tower);
        self.touch_grid();
    }

    pub(crate) fn vacate(&mut self, cell: CellCoord) {
        self.grid.vacate(cell);
        self.touch_grid();
    }

    /// Spawn-to-goal route under the current obstacles.
    fn compute_route(&self, strategy: PathStrategy) -> Option<Vec<CellCoord>> {
        strategy.find_path_with(
            self.grid.columns(),
            self.grid.rows(),
            self.spawn,
            self.goal,
            |cell| !self.grid.is_walkable(cell),
        )
    }

    /// Whether a spawn-to-goal route survives if `cell` became an obstacle.
    /// The grid itself is left untouched.
    pub(crate) fn route_survives_block(&self, strategy: PathStrategy, cell: CellCoord) -> bool {
        strategy
            .find_path_with(
                self.grid.columns(),
                self.grid.rows(),
                self.spawn,
                self.goal,
                |candidate| candidate == cell || !self.grid.is_walkable(candidate),
            )
            .is_some()
    }

    /// Route a worker standing on `from` would walk to reach `to`.
    pub(crate) fn worker_route(
        &self,
        strategy: PathStrategy,
        from: CellCoord,
        to: CellCoord,
    ) -> Option<Vec<CellCoord>> {
        strategy.find_path_with(self.grid.columns(), self.grid.rows(), from, to, |cell| {
            !self.grid.is_walkable(cell)
        })
    }

    /// Whether a tower, foundation or pending build order claims `cell`.
    pub(crate) fn is_claimed(&self, cell: CellCoord) -> bool {
        self.grid.occupant(cell).is_some()
            || self.towers.values().any(|tower| tower.cell == cell)
            || self
                .workers
                .values()
                .any(|worker| worker.state == WorkerState::Moving && worker.target == Some(cell))
    }

    /// Recomputes the cached route and re-anchors everything travelling on
    /// the lane. Returns the number of waypoints of the new route.
    pub(crate) fn repath(&mut self, strategy: PathStrategy) -> Option<usize> {
        let route: Option<Arc<[CellCoord]>> = self.compute_route(strategy).map(Arc::from);
        let waypoints = route.as_ref().map(|route| route.len());
        let workers_changed = self.reroute_workers(strategy);
        if route == self.route {
            if workers_changed {
                self.touch();
            }
            return waypoints;
        }

        if let Some(route) = route.as_deref() {
            for hostile in self.hostiles.values_mut() {
                hostile.reanchor(route);
            }
        }
        self.route = route;
        self.touch();
        waypoints
    }

    /// Sends travelling workers whose remaining route crosses an obstacle
    /// along fresh routes. Workers whose target became unreachable stop
    /// where they stand. Returns `true` when any worker changed.
    fn reroute_workers(&mut self, strategy: PathStrategy) -> bool {
        let mut updates = Vec::new();
        for worker in self.workers.values() {
            if !worker.is_travelling() {
                continue;
            }
            let blocked = worker.route.as_deref().is_some_and(|route| {
                route
                    .iter()
                    .skip(worker.next_waypoint.max(1))
                    .any(|cell| !self.grid.is_walkable(*cell))
            });
            if !blocked {
                continue;
            }
            let route = worker
                .target
                .and_then(|target| self.worker_route(strategy, worker.cell(), target));
            updates.push((worker.id, route));
        }

        let changed = !updates.is_empty();
        for (id, route) in updates {
            let Some(worker) = self.workers.get_mut(&id) else {
                continue;
            };
            match route {
                Some(route) => {
                    let state = worker.state;
                    worker.dispatch(route, state);
                }
                None => {
                    tracing::debug!(worker = id.get(), "worker lost its route and stopped");
                    let _ = worker.stand_down();
                }
            }
        }
        changed
    }

    /// Captures the lane using an already published grid snapshot.
    pub(crate) fn snapshot(&self, grid: Arc<GridSnapshot>) -> LaneSnapshot {
        LaneSnapshot {
            id: self.id,
            grid,
            spawn: self.spawn,
            goal: self.goal,
            route: self.route.clone(),
            workers: self.workers.values().map(Worker::snapshot).collect(),
            towers: self.towers.values().map(TowerState::snapshot).collect(),
            hostiles: self
                .hostiles
                .values()
                .map(|hostile| hostile.snapshot(self.id))
                .collect(),
            units: self.units.values().map(Unit::snapshot).collect(),
        }
    }
}
