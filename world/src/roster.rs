//! Selection, recruitment and hero progression.

use std::time::Duration;

use lane_defence_core::{Event, LaneId, Rejection, UnitKind, WorkerId, WorkerState};

use crate::{
    units::{rally_point, Unit},
    workers::Worker,
    World,
};

impl World {
    pub(crate) fn select_lane(
        &mut self,
        lane: LaneId,
        out_events: &mut Vec<Event>,
    ) -> Result<(), Rejection> {
        if self.lane(lane).is_none() {
            return Err(Rejection::UnknownLane);
        }

        self.selection.lane = lane;
        if self.selection.worker.is_some() {
            self.change_worker_selection(None, out_events);
        }
        out_events.push(Event::LaneSelected { lane });
        self.redeploy_hero(lane, out_events);
        Ok(())
    }

    pub(crate) fn select_worker(
        &mut self,
        worker: Option<WorkerId>,
        out_events: &mut Vec<Event>,
    ) -> Result<(), Rejection> {
        if let Some(worker) = worker {
            let lane = self.selection.lane;
            let known = self
                .lane(lane)
                .is_some_and(|lane| lane.workers.contains_key(&worker));
            if !known {
                return Err(Rejection::UnknownWorker);
            }
        }
        self.change_worker_selection(worker, out_events);
        Ok(())
    }

    /// Updates the selected worker, leaving placement mode when the
    /// selection changes hands.
    fn change_worker_selection(&mut self, worker: Option<WorkerId>, out_events: &mut Vec<Event>) {
        if self.selection.worker != worker && self.selection.placement_mode {
            self.selection.placement_mode = false;
            out_events.push(Event::PlacementModeChanged { active: false });
        }
        self.selection.worker = worker;
        out_events.push(Event::WorkerSelected { worker });
    }

    pub(crate) fn set_placement_mode(
        &mut self,
        active: bool,
        out_events: &mut Vec<Event>,
    ) -> Result<(), Rejection> {
        if active {
            let worker_id = self.selection.worker.ok_or(Rejection::NoWorkerSelected)?;
            let lane = self.selection.lane;
            let worker = self
                .lane(lane)
                .and_then(|lane| lane.workers.get(&worker_id))
                .ok_or(Rejection::UnknownWorker)?;
            if worker.bound_tower.is_some() {
                return Err(Rejection::WorkerBound);
            }
            if worker.state != WorkerState::Idle {
                return Err(Rejection::WorkerBusy);
            }
        }

        self.selection.placement_mode = active;
        out_events.push(Event::PlacementModeChanged { active });
        Ok(())
    }

    pub(crate) fn hire_worker(&mut self, out_events: &mut Vec<Event>) -> Result<(), Rejection> {
        let price = self.tuning.prices.worker;
        let cap = self.tuning.max_workers_per_lane;
        let lane = self.lane(self.selection.lane).ok_or(Rejection::UnknownLane)?;
        if lane.workers.len() >= cap {
            return Err(Rejection::LaneFull);
        }
        self.ledger.spend(price)?;

        let id = self.ids.worker();
        let lane = self.selected_lane_mut()?;
        let cell = lane.goal;
        let _ = lane.workers.insert(id, Worker::new(id, cell));
        lane.touch();
        let lane = lane.id;

        tracing::debug!(lane = lane.get(), worker = id.get(), "worker hired");
        out_events.push(Event::WorkerHired {
            lane,
            worker: id,
            cell,
        });
        self.change_worker_selection(Some(id), out_events);
        Ok(())
    }

    pub(crate) fn summon_unit(
        &mut self,
        kind: UnitKind,
        out_events: &mut Vec<Event>,
    ) -> Result<(), Rejection> {
        let prices = self.tuning.prices;
        let (price, damage, range, interval_ms) = match kind {
            UnitKind::Marine => (
                prices.marine,
                self.tuning.marine.damage,
                self.tuning.marine.range,
                self.tuning.marine.attack_interval_ms,
            ),
            UnitKind::Firebat => (
                prices.firebat,
                self.tuning.firebat.damage,
                self.tuning.firebat.range,
                self.tuning.firebat.attack_interval_ms,
            ),
            UnitKind::Hero => {
                if self.hero_unit.is_some() {
                    return Err(Rejection::HeroDeployed);
                }
                let interval_ms = self.tuning.hero.attack_interval_ms;
                (
                    prices.hero,
                    hero_strike(self.hero.dps(), interval_ms),
                    self.hero.range(),
                    interval_ms,
                )
            }
        };

        let cap = self.tuning.max_units_per_lane;
        let lane = self.lane(self.selection.lane).ok_or(Rejection::UnknownLane)?;
        if lane.units.len() >= cap {
            return Err(Rejection::LaneFull);
        }
        self.ledger.spend(price)?;

        let id = self.ids.unit();
        let lane = self.selected_lane_mut()?;
        let position = rally_point(lane.goal, lane.grid.columns(), lane.units.len()).to_point();
        let unit = Unit {
            id,
            kind,
            position,
            damage,
            range,
            attack_interval: Duration::from_millis(interval_ms),
            cooldown: Duration::ZERO,
        };
        let _ = lane.units.insert(id, unit);
        lane.touch();
        let lane = lane.id;

        if kind == UnitKind::Hero {
            self.hero_unit = Some((lane, id));
        }
        tracing::debug!(lane = lane.get(), unit = id.get(), ?kind, "unit summoned");
        out_events.push(Event::UnitSummoned {
            lane,
            unit: id,
            kind,
        });
        Ok(())
    }

    pub(crate) fn evolve_hero(&mut self, out_events: &mut Vec<Event>) -> Result<(), Rejection> {
        self.ledger.spend(self.tuning.prices.hero_evolution)?;
        self.hero.evolve();

        if let Some((lane, unit)) = self.hero_unit {
            let damage = hero_strike(self.hero.dps(), self.tuning.hero.attack_interval_ms);
            let range = self.hero.range();
            if let Some(lane) = self.lane_mut(lane) {
                if let Some(unit) = lane.units.get_mut(&unit) {
                    unit.damage = damage;
                    unit.range = range;
                }
                lane.touch();
            }
        }

        let level = self.hero.level();
        let rarity = self.hero.rarity();
        tracing::debug!(level, ?rarity, "hero evolved");
        out_events.push(Event::HeroEvolved { level, rarity });
        Ok(())
    }

    /// Moves the deployed hero into the provided lane.
    fn redeploy_hero(&mut self, to: LaneId, out_events: &mut Vec<Event>) {
        let Some((from, unit_id)) = self.hero_unit else {
            return;
        };
        if from == to {
            return;
        }

        let Some(mut unit) = self.lane_mut(from).and_then(|lane| {
            lane.touch();
            lane.units.remove(&unit_id)
        }) else {
            return;
        };
        let Some(lane) = self.lane_mut(to) else {
            return;
        };

        unit.position = rally_point(lane.goal, lane.grid.columns(), lane.units.len()).to_point();
        let _ = lane.units.insert(unit_id, unit);
        lane.touch();
        self.hero_unit = Some((to, unit_id));
        out_events.push(Event::HeroRedeployed {
            lane: to,
            unit: unit_id,
        });
    }
}

/// Damage of a single hero attack delivering `dps` over `interval_ms`.
fn hero_strike(dps: f32, interval_ms: u64) -> f32 {
    dps * interval_ms as f32 / 1_000.0
}
