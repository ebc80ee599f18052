//! Worker orders and the construction lifecycle.

use lane_defence_core::{CellCoord, Event, Rejection, WorkerId, WorkerState};

use crate::{towers::TowerState, World};

impl World {
    /// Validates and pays for a build order, then sends the worker on its way.
    pub(crate) fn order_build(
        &mut self,
        worker_id: WorkerId,
        cell: CellCoord,
        out_events: &mut Vec<Event>,
    ) -> Result<(), Rejection> {
        let strategy = self.tuning.path_strategy;
        let price = self.tuning.prices.tower;

        let lane = self
            .lanes
            .iter()
            .find(|lane| lane.workers.contains_key(&worker_id))
            .ok_or(Rejection::UnknownWorker)?;
        let worker = lane
            .workers
            .get(&worker_id)
            .ok_or(Rejection::UnknownWorker)?;
        if worker.bound_tower.is_some() {
            return Err(Rejection::WorkerBound);
        }
        if worker.state != WorkerState::Idle {
            return Err(Rejection::WorkerBusy);
        }
        if !lane.grid.contains(cell) {
            return Err(Rejection::OutOfBounds);
        }
        if lane.is_claimed(cell) {
            return Err(Rejection::Occupied);
        }
        if cell == lane.spawn || cell == lane.goal || !lane.grid.is_walkable(cell) {
            return Err(Rejection::NotBuildable);
        }
        let route = lane
            .worker_route(strategy, worker.cell(), cell)
            .ok_or(Rejection::Unreachable)?;
        if !lane.route_survives_block(strategy, cell) {
            return Err(Rejection::RouteSevered);
        }
        self.ledger.spend(price)?;

        let lane = self
            .lane_of_worker(worker_id)
            .ok_or(Rejection::UnknownWorker)?;
        if let Some(worker) = lane.workers.get_mut(&worker_id) {
            worker.dispatch(route, WorkerState::Moving);
        }
        lane.touch();
        let lane = lane.id;

        tracing::debug!(
            lane = lane.get(),
            worker = worker_id.get(),
            column = cell.column(),
            row = cell.row(),
            "build ordered"
        );
        out_events.push(Event::BuildOrdered {
            lane,
            worker: worker_id,
            cell,
        });
        if self.selection.placement_mode {
            self.selection.placement_mode = false;
            out_events.push(Event::PlacementModeChanged { active: false });
        }
        Ok(())
    }

    /// Sends an idle or walking worker to a tile without building.
    pub(crate) fn order_move(
        &mut self,
        worker_id: WorkerId,
        cell: CellCoord,
        out_events: &mut Vec<Event>,
    ) -> Result<(), Rejection> {
        let strategy = self.tuning.path_strategy;
        let lane = self
            .lane_of_worker(worker_id)
            .ok_or(Rejection::UnknownWorker)?;
        let worker = lane
            .workers
            .get(&worker_id)
            .ok_or(Rejection::UnknownWorker)?;
        if !matches!(worker.state, WorkerState::Idle | WorkerState::Executing) {
            return Err(Rejection::WorkerBusy);
        }
        if !lane.grid.contains(cell) {
            return Err(Rejection::OutOfBounds);
        }
        let route = lane
            .worker_route(strategy, worker.cell(), cell)
            .ok_or(Rejection::Unreachable)?;

        if let Some(worker) = lane.workers.get_mut(&worker_id) {
            worker.dispatch(route, WorkerState::Executing);
        }
        lane.touch();
        out_events.push(Event::MoveOrdered {
            lane: lane.id,
            worker: worker_id,
            cell,
        });
        Ok(())
    }

    /// Returns a worker to idle from any state. A foundation under
    /// construction is discarded and nothing is refunded.
    pub(crate) fn stop_worker(
        &mut self,
        worker_id: WorkerId,
        out_events: &mut Vec<Event>,
    ) -> Result<(), Rejection> {
        let lane = self
            .lane_of_worker(worker_id)
            .ok_or(Rejection::UnknownWorker)?;
        let foundation = lane
            .workers
            .get_mut(&worker_id)
            .and_then(|worker| worker.stand_down());
        if let Some(foundation) = foundation {
            let _ = lane.towers.remove(&foundation);
        }
        lane.touch();
        out_events.push(Event::WorkerStopped {
            lane: lane.id,
            worker: worker_id,
        });
        Ok(())
    }

    /// Pays for and applies one level to the worker's bound tower.
    pub(crate) fn upgrade_tower(
        &mut self,
        worker_id: WorkerId,
        out_events: &mut Vec<Event>,
    ) -> Result<(), Rejection> {
        let price = self.tuning.prices.tower_upgrade;
        let max_level = self.tuning.tower.max_level;

        let lane = self
            .lanes
            .iter()
            .find(|lane| lane.workers.contains_key(&worker_id))
            .ok_or(Rejection::UnknownWorker)?;
        let tower_id = lane
            .workers
            .get(&worker_id)
            .and_then(|worker| worker.bound_tower)
            .ok_or(Rejection::NoBoundTower)?;
        let tower = lane.towers.get(&tower_id).ok_or(Rejection::NoBoundTower)?;
        if tower.level >= max_level {
            return Err(Rejection::TowerAtMaxLevel);
        }
        self.ledger.spend(price)?;

        let tuning = self.tuning.tower;
        let lane = self
            .lane_of_worker(worker_id)
            .ok_or(Rejection::UnknownWorker)?;
        let tower = lane
            .towers
            .get_mut(&tower_id)
            .ok_or(Rejection::NoBoundTower)?;
        let level = tower.upgrade(&tuning)?;
        lane.touch();
        out_events.push(Event::TowerUpgraded {
            lane: lane.id,
            tower: tower_id,
            level,
        });
        Ok(())
    }

    /// Handles a worker reaching the last waypoint of its route.
    pub(crate) fn worker_arrived(&mut self, worker_id: WorkerId, out_events: &mut Vec<Event>) {
        let clock = self.clock;
        let tower_tuning = self.tuning.tower;
        let Some(lane) = self
            .lanes
            .iter_mut()
            .find(|lane| lane.workers.contains_key(&worker_id))
        else {
            return;
        };
        let Some(worker) = lane.workers.get_mut(&worker_id) else {
            return;
        };

        let cell = worker.target.unwrap_or_else(|| worker.cell());
        worker.position = cell.to_point();
        worker.route = None;
        worker.next_waypoint = 0;
        out_events.push(Event::WorkerArrived {
            lane: lane.id,
            worker: worker_id,
            cell,
        });

        match worker.state {
            WorkerState::Moving => {
                let tower = self.ids.tower();
                worker.state = WorkerState::Building;
                worker.build_started_at = Some(clock);
                worker.foundation = Some(tower);
                let _ = lane.towers.insert(
                    tower,
                    TowerState::foundation(tower, cell, worker_id, &tower_tuning),
                );
                out_events.push(Event::ConstructionStarted {
                    lane: lane.id,
                    worker: worker_id,
                    tower,
                    cell,
                });
            }
            WorkerState::Executing => {
                worker.state = WorkerState::Idle;
                worker.target = None;
            }
            WorkerState::Idle | WorkerState::Building => {}
        }
        lane.touch();
    }

    /// Commits or abandons a construction whose build time elapsed.
    pub(crate) fn complete_construction(
        &mut self,
        worker_id: WorkerId,
        out_events: &mut Vec<Event>,
    ) {
        let strategy = self.tuning.path_strategy;
        let build_duration = self.tuning.build_duration();
        let clock = self.clock;
        let Some(lane) = self.lane_of_worker(worker_id) else {
            tracing::warn!(worker = worker_id.get(), "completion ignored: unknown worker");
            return;
        };
        let Some(worker) = lane.workers.get(&worker_id) else {
            return;
        };
        let site = match (worker.state, worker.target, worker.foundation, worker.build_started_at) {
            (WorkerState::Building, Some(cell), Some(tower), Some(started_at))
                if clock.saturating_sub(started_at) >= build_duration =>
            {
                (cell, tower)
            }
            _ => {
                tracing::warn!(
                    worker = worker_id.get(),
                    "completion ignored: construction not finished"
                );
                return;
            }
        };
        let (cell, tower_id) = site;
        let lane_id = lane.id;

        if !lane.route_survives_block(strategy, cell) {
            let _ = lane.towers.remove(&tower_id);
            if let Some(worker) = lane.workers.get_mut(&worker_id) {
                let _ = worker.stand_down();
            }
            lane.touch();
            tracing::debug!(
                lane = lane_id.get(),
                worker = worker_id.get(),
                "construction failed: tower would seal the lane"
            );
            out_events.push(Event::ConstructionFailed {
                lane: lane_id,
                worker: worker_id,
                cell,
            });
            return;
        }

        lane.occupy(cell, tower_id);
        if let Some(tower) = lane.towers.get_mut(&tower_id) {
            tower.completed = true;
        }
        if let Some(worker) = lane.workers.get_mut(&worker_id) {
            let _ = worker.stand_down();
            worker.bound_tower = Some(tower_id);
        }
        tracing::info!(
            lane = lane_id.get(),
            tower = tower_id.get(),
            column = cell.column(),
            row = cell.row(),
            "tower built"
        );
        out_events.push(Event::TowerBuilt {
            lane: lane_id,
            worker: worker_id,
            tower: tower_id,
            cell,
        });
        let waypoints = lane.repath(strategy);
        out_events.push(Event::LaneRepathed {
            lane: lane_id,
            waypoints,
        });
    }
}
