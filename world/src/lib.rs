#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Lane Defence.
//!
//! The [`World`] owns every lane, the gold ledger, the wave state and the
//! hero profile. It is mutated exclusively through [`apply`], which records
//! the outcome of each command as [`Event`] values, and observed through the
//! read-only functions in [`query`].

mod combat;
mod economy;
mod grid;
mod hero;
mod hostiles;
mod lane;
mod navigation;
mod orders;
mod roster;
mod towers;
mod tuning;
mod units;
mod wave;
mod workers;

use std::time::Duration;

use lane_defence_core::{
    Action, Command, Event, HostileId, LaneId, Rejection, TowerId, UnitId, WorkerId,
};

pub use navigation::{find_path, PathStrategy};
pub use tuning::{
    HeroTuning, Prices, SkillTuning, TowerTuning, TroopTuning, Tuning, TuningError, WaveTuning,
};

use economy::Ledger;
use hero::{HeroProfile, Skill};
use lane::Lane;
use wave::Wave;

/// Player focus: the active lane, worker and placement mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
    /// Lane receiving purchases and build requests.
    pub lane: LaneId,
    /// Worker receiving orders.
    pub worker: Option<WorkerId>,
    /// Whether build placement mode is active for the selected worker.
    pub placement_mode: bool,
}

/// Monotonic identifier counters, reset together with the world.
#[derive(Clone, Copy, Debug, Default)]
struct IdAllocator {
    next_worker: u32,
    next_tower: u32,
    next_hostile: u32,
    next_unit: u32,
}

impl IdAllocator {
    fn bump(counter: &mut u32) -> u32 {
        let value = *counter;
        *counter = counter.wrapping_add(1);
        value
    }

    fn worker(&mut self) -> WorkerId {
        WorkerId::new(Self::bump(&mut self.next_worker))
    }

    fn tower(&mut self) -> TowerId {
        TowerId::new(Self::bump(&mut self.next_tower))
    }

    fn hostile(&mut self) -> HostileId {
        HostileId::new(Self::bump(&mut self.next_hostile))
    }

    fn unit(&mut self) -> UnitId {
        UnitId::new(Self::bump(&mut self.next_unit))
    }
}

/// Represents the authoritative Lane Defence world state.
#[derive(Debug)]
pub struct World {
    tuning: Tuning,
    epoch: u64,
    lanes: Vec<Lane>,
    ledger: Ledger,
    life: u32,
    wave: Wave,
    hero: HeroProfile,
    hero_unit: Option<(LaneId, UnitId)>,
    skill: Skill,
    selection: Selection,
    ids: IdAllocator,
    clock: Duration,
}

impl World {
    /// Creates a world shaped by the provided tuning.
    pub fn new(tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::fresh(tuning, 0))
    }

    fn fresh(tuning: Tuning, epoch: u64) -> Self {
        let lanes = (0..tuning.lanes)
            .map(|index| Lane::new(LaneId::new(index), tuning.grid_size, tuning.path_strategy))
            .collect();
        Self {
            epoch,
            lanes,
            ledger: Ledger::new(tuning.starting_gold),
            life: tuning.starting_life,
            wave: Wave::new(tuning.wave),
            hero: HeroProfile::new(&tuning.hero),
            hero_unit: None,
            skill: Skill::new(&tuning.skill),
            selection: Selection {
                lane: LaneId::new(0),
                worker: None,
                placement_mode: false,
            },
            ids: IdAllocator::default(),
            clock: Duration::ZERO,
            tuning,
        }
    }

    /// Reinitialises every piece of state except the tuning.
    fn reset(&mut self, out_events: &mut Vec<Event>) {
        let epoch = self.epoch.wrapping_add(1);
        *self = Self::fresh(self.tuning.clone(), epoch);
        tracing::info!(epoch, "life depleted; world reset");
        out_events.push(Event::WorldReset { epoch });
    }

    fn lane(&self, lane: LaneId) -> Option<&Lane> {
        let index = usize::try_from(lane.get()).ok()?;
        self.lanes.get(index)
    }

    fn lane_mut(&mut self, lane: LaneId) -> Option<&mut Lane> {
        let index = usize::try_from(lane.get()).ok()?;
        self.lanes.get_mut(index)
    }

    fn selected_lane_mut(&mut self) -> Result<&mut Lane, Rejection> {
        let lane = self.selection.lane;
        self.lane_mut(lane).ok_or(Rejection::UnknownLane)
    }

    fn lane_of_worker(&mut self, worker: WorkerId) -> Option<&mut Lane> {
        self.lanes
            .iter_mut()
            .find(|lane| lane.workers.contains_key(&worker))
    }

    fn hostiles_alive(&self) -> usize {
        self.lanes.iter().map(|lane| lane.hostiles.len()).sum()
    }

    /// Flips the wave to inactive once its quota is spawned and removed.
    fn settle_wave(&mut self, out_events: &mut Vec<Event>) {
        let alive = self.hostiles_alive();
        if self.wave.settle(alive) {
            let wave = self.wave.number();
            tracing::info!(wave, "wave completed");
            out_events.push(Event::WaveCompleted { wave });
        }
    }

    fn advance_clock(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.clock = self.clock.saturating_add(dt);
        for lane in &mut self.lanes {
            for tower in lane.towers.values_mut() {
                tower.cooldown = tower.cooldown.saturating_sub(dt);
            }
            for unit in lane.units.values_mut() {
                unit.cooldown = unit.cooldown.saturating_sub(dt);
            }
        }
        self.skill.advance(dt);
        out_events.push(Event::TimeAdvanced { dt });
    }

    fn start_wave(&mut self, out_events: &mut Vec<Event>) -> Result<(), Rejection> {
        if !self.wave.begin_next() {
            return Err(Rejection::WaveActive);
        }

        let wave = self.wave.number();
        let enemies_to_spawn = self.wave.enemies_to_spawn();
        tracing::info!(wave, enemies_to_spawn, "wave started");
        out_events.push(Event::WaveStarted {
            wave,
            enemies_to_spawn,
        });

        let strategy = self.tuning.path_strategy;
        for lane in &mut self.lanes {
            let waypoints = lane.repath(strategy);
            out_events.push(Event::LaneRepathed {
                lane: lane.id,
                waypoints,
            });
        }
        Ok(())
    }

    fn spawn_hostile(&mut self, lane_id: LaneId, out_events: &mut Vec<Event>) {
        if !self.wave.quota_remaining() {
            tracing::warn!(lane = lane_id.get(), "spawn ignored: wave quota exhausted");
            return;
        }

        let stats = self.wave.hostile_stats();
        let Some(lane) = self
            .lanes
            .get_mut(usize::try_from(lane_id.get()).unwrap_or(usize::MAX))
        else {
            tracing::warn!(lane = lane_id.get(), "spawn ignored: unknown lane");
            return;
        };

        let id = self.ids.hostile();
        let _ = lane
            .hostiles
            .insert(id, hostiles::Hostile::spawn(id, lane.spawn, stats));
        lane.touch();
        self.wave.record_spawn();
        out_events.push(Event::HostileSpawned {
            lane: lane_id,
            hostile: id,
        });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::fresh(Tuning::default(), 0)
    }
}

fn settle_action(out_events: &mut Vec<Event>, action: Action, outcome: Result<(), Rejection>) {
    if let Err(reason) = outcome {
        tracing::debug!(?action, %reason, "action rejected");
        out_events.push(Event::ActionRejected { action, reason });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Player actions that fail validation leave the world untouched and emit a
/// single [`Event::ActionRejected`]. Malformed system commands are ignored.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => world.advance_clock(dt, out_events),
        Command::SelectLane { lane } => {
            let outcome = world.select_lane(lane, out_events);
            settle_action(out_events, Action::SelectLane, outcome);
        }
        Command::SelectWorker { worker } => {
            let outcome = world.select_worker(worker, out_events);
            settle_action(out_events, Action::SelectWorker, outcome);
        }
        Command::SetPlacementMode { active } => {
            let outcome = world.set_placement_mode(active, out_events);
            settle_action(out_events, Action::PlacementMode, outcome);
        }
        Command::HireWorker => {
            let outcome = world.hire_worker(out_events);
            settle_action(out_events, Action::HireWorker, outcome);
        }
        Command::OrderBuild { worker, cell } => {
            let outcome = world.order_build(worker, cell, out_events);
            settle_action(out_events, Action::OrderBuild, outcome);
        }
        Command::OrderMove { worker, cell } => {
            let outcome = world.order_move(worker, cell, out_events);
            settle_action(out_events, Action::OrderMove, outcome);
        }
        Command::StopWorker { worker } => {
            let outcome = world.stop_worker(worker, out_events);
            settle_action(out_events, Action::StopWorker, outcome);
        }
        Command::UpgradeTower { worker } => {
            let outcome = world.upgrade_tower(worker, out_events);
            settle_action(out_events, Action::UpgradeTower, outcome);
        }
        Command::StartWave => {
            let outcome = world.start_wave(out_events);
            settle_action(out_events, Action::StartWave, outcome);
        }
        Command::SummonUnit { kind } => {
            let outcome = world.summon_unit(kind, out_events);
            settle_action(out_events, Action::SummonUnit, outcome);
        }
        Command::EvolveHero => {
            let outcome = world.evolve_hero(out_events);
            settle_action(out_events, Action::EvolveHero, outcome);
        }
        Command::TriggerSkill => {
            let outcome = world.trigger_skill(out_events);
            settle_action(out_events, Action::TriggerSkill, outcome);
        }
        Command::Advance {
            mover,
            position,
            next_waypoint,
        } => world.advance_mover(mover, position, next_waypoint, out_events),
        Command::ResolveCombat { strikes } => world.resolve_combat(strikes, out_events),
        Command::CompleteConstruction { worker } => {
            world.complete_construction(worker, out_events);
        }
        Command::SpawnHostile { lane } => world.spawn_hostile(lane, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::{sync::Arc, time::Duration};

    use super::{Selection, Tuning, World};
    use lane_defence_core::{
        Assailant, BuildSite, CellPoint, ConstructionView, DefenderId, DefenderSnapshot,
        DefenderView, GridSnapshot, HeroSnapshot, HostileView, LaneId, LaneSnapshot, Mover,
        MoverSnapshot, MotionView, SiegeView, SkillSnapshot, Structure, WaveSnapshot,
        WorkerState, WorldSnapshot,
    };

    /// Revision counters of one lane, bumped whenever its published state
    /// changes.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct LaneRevision {
        /// Revision of the lane as a whole.
        pub lane: u64,
        /// Revision of the lane's occupancy grid.
        pub grid: u64,
    }

    /// Counter bumped every time the world resets.
    #[must_use]
    pub fn epoch(world: &World) -> u64 {
        world.epoch
    }

    /// Tuning the world was created with.
    #[must_use]
    pub fn tuning(world: &World) -> &Tuning {
        &world.tuning
    }

    /// Remaining life.
    #[must_use]
    pub fn life(world: &World) -> u32 {
        world.life
    }

    /// Gold held by the player.
    #[must_use]
    pub fn gold(world: &World) -> u32 {
        world.ledger.gold()
    }

    /// Simulated time since the world was (re)initialised.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }

    /// Current player selection.
    #[must_use]
    pub fn selection(world: &World) -> Selection {
        world.selection
    }

    /// Identifiers of every lane in order.
    pub fn lane_ids(world: &World) -> impl Iterator<Item = LaneId> + '_ {
        world.lanes.iter().map(|lane| lane.id)
    }

    /// Revision counters of the provided lane.
    #[must_use]
    pub fn lane_revision(world: &World, lane: LaneId) -> Option<LaneRevision> {
        world.lane(lane).map(|lane| LaneRevision {
            lane: lane.revision(),
            grid: lane.grid_revision(),
        })
    }

    /// Captures the occupancy grid of the provided lane.
    #[must_use]
    pub fn grid_snapshot(world: &World, lane: LaneId) -> Option<GridSnapshot> {
        world.lane(lane).map(|lane| lane.grid.snapshot())
    }

    /// Captures the provided lane around an existing grid snapshot.
    #[must_use]
    pub fn lane_snapshot(
        world: &World,
        lane: LaneId,
        grid: Arc<GridSnapshot>,
    ) -> Option<LaneSnapshot> {
        world.lane(lane).map(|lane| lane.snapshot(grid))
    }

    /// Progress of the current wave.
    #[must_use]
    pub fn wave_snapshot(world: &World) -> WaveSnapshot {
        world.wave.snapshot()
    }

    /// Hero profile and deployment.
    #[must_use]
    pub fn hero_snapshot(world: &World) -> HeroSnapshot {
        world
            .hero
            .snapshot(world.hero_unit.map(|(lane, _)| lane))
    }

    /// Cooldown state of the burst skill.
    #[must_use]
    pub fn skill_snapshot(world: &World) -> SkillSnapshot {
        world.skill.snapshot()
    }

    /// Builds a complete snapshot without sharing any previous state.
    #[must_use]
    pub fn snapshot(world: &World) -> WorldSnapshot {
        let lanes = world
            .lanes
            .iter()
            .map(|lane| Arc::new(lane.snapshot(Arc::new(lane.grid.snapshot()))))
            .collect();
        WorldSnapshot {
            life: world.life,
            gold: world.ledger.gold(),
            lanes,
            selected_lane: world.selection.lane,
            selected_worker: world.selection.worker,
            placement_mode: world.selection.placement_mode,
            wave: wave_snapshot(world),
            hero: hero_snapshot(world),
            skill: skill_snapshot(world),
            elapsed: world.clock,
        }
    }

    /// Captures every hostile and worker that travels along a route.
    #[must_use]
    pub fn motion_view(world: &World) -> MotionView {
        let worker_speed = world.tuning.worker_speed;
        let mut snapshots = Vec::new();
        for lane in &world.lanes {
            if let Some(route) = &lane.route {
                snapshots.extend(lane.hostiles.values().map(|hostile| MoverSnapshot {
                    mover: Mover::Hostile(hostile.id),
                    position: hostile.position,
                    speed: hostile.speed,
                    next_waypoint: hostile.next_waypoint,
                    route: Arc::clone(route),
                }));
            }

            for worker in lane.workers.values() {
                if !worker.is_travelling() {
                    continue;
                }
                if let Some(route) = &worker.route {
                    snapshots.push(MoverSnapshot {
                        mover: Mover::Worker(worker.id),
                        position: worker.position,
                        speed: worker_speed,
                        next_waypoint: worker.next_waypoint,
                        route: Arc::clone(route),
                    });
                }
            }
        }
        MotionView::from_snapshots(snapshots)
    }

    /// Captures every completed tower and deployed unit.
    #[must_use]
    pub fn defender_view(world: &World) -> DefenderView {
        let mut snapshots = Vec::new();
        for lane in &world.lanes {
            snapshots.extend(
                lane.towers
                    .values()
                    .filter(|tower| tower.completed)
                    .map(|tower| DefenderSnapshot {
                        id: DefenderId::Tower(tower.id),
                        lane: lane.id,
                        position: CellPoint::from(tower.cell),
                        range: tower.range,
                        damage: tower.damage,
                        ready_in: tower.cooldown,
                    }),
            );
            snapshots.extend(lane.units.values().map(|unit| DefenderSnapshot {
                id: DefenderId::Unit(unit.id),
                lane: lane.id,
                position: unit.position,
                range: unit.range,
                damage: unit.damage,
                ready_in: unit.cooldown,
            }));
        }
        DefenderView::from_snapshots(snapshots)
    }

    /// Captures every live hostile.
    #[must_use]
    pub fn hostile_view(world: &World) -> HostileView {
        let snapshots = world
            .lanes
            .iter()
            .flat_map(|lane| {
                lane.hostiles
                    .values()
                    .map(move |hostile| hostile.snapshot(lane.id))
            })
            .collect();
        HostileView::from_snapshots(snapshots)
    }

    /// Captures hostiles stuck in sealed lanes together with the completed
    /// towers they may attack.
    #[must_use]
    pub fn siege_view(world: &World) -> SiegeView {
        let mut assailants = Vec::new();
        let mut structures = Vec::new();
        for lane in world.lanes.iter().filter(|lane| lane.route.is_none()) {
            assailants.extend(lane.hostiles.values().map(|hostile| Assailant {
                hostile: hostile.id,
                lane: lane.id,
                position: hostile.position,
                damage_per_second: hostile.siege_damage,
            }));
            structures.extend(
                lane.towers
                    .values()
                    .filter(|tower| tower.completed)
                    .map(|tower| Structure {
                        tower: tower.id,
                        lane: lane.id,
                        cell: tower.cell,
                    }),
            );
        }
        SiegeView::new(assailants, structures)
    }

    /// Captures every worker currently building.
    #[must_use]
    pub fn construction_view(world: &World) -> ConstructionView {
        let mut sites = Vec::new();
        for lane in &world.lanes {
            for worker in lane.workers.values() {
                if worker.state != WorkerState::Building {
                    continue;
                }
                if let (Some(cell), Some(started_at)) = (worker.target, worker.build_started_at) {
                    sites.push(BuildSite {
                        worker: worker.id,
                        lane: lane.id,
                        cell,
                        started_at,
                    });
                }
            }
        }
        ConstructionView::from_sites(sites)
    }
}
