//! Seeded autoplayer exercising the simulation's action surface.

use lane_defence_core::{CellCoord, LaneId, UnitKind, WorkerId, WorkerState};
use lane_defence_simulation::Simulation;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Ticks between two rounds of decisions.
const DECISION_INTERVAL: u32 = 10;
/// Random tiles tried before a placement round is abandoned.
const PLACEMENT_ATTEMPTS: usize = 12;
/// Gold kept aside so a hired worker can afford its first tower.
const HIRE_RESERVE: u32 = 180;
/// Gold above which the autoplayer recruits units and evolves the hero.
const RECRUIT_THRESHOLD: u32 = 400;

/// Outcome counters of the autoplayer's actions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Stats {
    pub(crate) accepted: u32,
    pub(crate) rejected: u32,
}

/// Plays the game with simple priorities and seeded randomness.
#[derive(Debug)]
pub(crate) struct Autoplayer {
    rng: ChaCha8Rng,
    stats: Stats,
}

impl Autoplayer {
    pub(crate) fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            stats: Stats::default(),
        }
    }

    pub(crate) fn stats(&self) -> Stats {
        self.stats
    }

    /// Takes one round of decisions every few ticks.
    pub(crate) fn act(&mut self, simulation: &mut Simulation, tick: u32) {
        if tick % DECISION_INTERVAL != 0 {
            return;
        }

        let snapshot = simulation.snapshot();
        if !snapshot.wave.active {
            let accepted = simulation.start_next_wave();
            self.record(accepted);
        }
        if snapshot.hostile_count() > 0 && !snapshot.skill.cooling_down {
            let accepted = simulation.trigger_skill();
            self.record(accepted);
        }
        if self.rng.gen_bool(0.1) && !snapshot.lanes.is_empty() {
            let lane = self.rng.gen_range(0..snapshot.lanes.len());
            let accepted = simulation.select_lane(LaneId::new(u32::try_from(lane).unwrap_or(0)));
            self.record(accepted);
        }

        let snapshot = simulation.snapshot();
        let Some(lane) = snapshot.lane(snapshot.selected_lane) else {
            return;
        };
        let idle = lane
            .workers
            .iter()
            .find(|worker| worker.state == WorkerState::Idle && worker.bound_tower.is_none())
            .map(|worker| worker.id);
        let upgradable = lane
            .workers
            .iter()
            .find(|worker| worker.bound_tower.is_some())
            .map(|worker| worker.id);

        match idle {
            Some(worker) => self.build(simulation, worker),
            None if snapshot.gold >= HIRE_RESERVE => {
                let accepted = simulation.buy_worker();
                self.record(accepted);
            }
            None => {}
        }

        if snapshot.gold >= RECRUIT_THRESHOLD {
            let accepted = match self.rng.gen_range(0..4) {
                0 => simulation.summon_unit(UnitKind::Marine),
                1 => simulation.summon_unit(UnitKind::Firebat),
                2 if snapshot.hero.deployed.is_none() => simulation.summon_hero(),
                2 => simulation.evolve_hero(),
                _ => match upgradable {
                    Some(worker) => {
                        simulation.select_worker(Some(worker))
                            && simulation.upgrade_worker_tower()
                    }
                    None => false,
                },
            };
            self.record(accepted);
        }
    }

    /// Enters placement mode for the worker and tries random tiles.
    fn build(&mut self, simulation: &mut Simulation, worker: WorkerId) {
        if !simulation.select_worker(Some(worker)) || !simulation.start_build_placement_mode() {
            self.record(false);
            return;
        }

        let snapshot = simulation.snapshot();
        let Some(lane) = snapshot.lane(snapshot.selected_lane) else {
            return;
        };
        let (columns, rows) = (lane.grid.columns(), lane.grid.rows());
        for _ in 0..PLACEMENT_ATTEMPTS {
            let cell = CellCoord::new(
                self.rng.gen_range(0..columns),
                self.rng.gen_range(1..rows.saturating_sub(1).max(2)),
            );
            let walkable = lane.grid.tile(cell).is_some_and(|tile| tile.walkable);
            if walkable && simulation.request_build_at(cell.column(), cell.row()) {
                self.record(true);
                return;
            }
        }
        simulation.cancel_build_placement_mode();
        self.record(false);
    }

    fn record(&mut self, accepted: bool) {
        if accepted {
            self.stats.accepted = self.stats.accepted.saturating_add(1);
        } else {
            self.stats.rejected = self.stats.rejected.saturating_add(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use lane_defence_core::WorldSnapshot;
    use lane_defence_world::Tuning;

    use super::*;

    fn play(seed: u64, ticks: u32) -> (Arc<WorldSnapshot>, Stats) {
        let mut simulation = Simulation::new(Tuning::default()).expect("default tuning is valid");
        let mut player = Autoplayer::new(seed);
        for tick in 0..ticks {
            player.act(&mut simulation, tick);
            simulation.tick(100);
        }
        (simulation.snapshot(), player.stats())
    }

    #[test]
    fn same_seed_plays_the_same_session() {
        assert_eq!(play(11, 300), play(11, 300));
    }

    #[test]
    fn autoplayer_hires_and_builds() {
        let (snapshot, stats) = play(3, 400);

        assert!(stats.accepted > 0);
        assert!(snapshot.wave.number >= 1);
        let workers: usize = snapshot.lanes.iter().map(|lane| lane.workers.len()).sum();
        assert!(workers >= 1);
        assert!(snapshot
            .lanes
            .iter()
            .flat_map(|lane| lane.towers.iter())
            .any(|tower| tower.completed));
    }
}
