#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Simulation controller that owns the world and its systems.
//!
//! [`Simulation`] is the single boundary presentation layers talk to. Player
//! intents arrive through the action methods, each of which submits one
//! command batch to the world and reports whether it was accepted.
//! [`Simulation::tick`] runs the fixed system pipeline:
//!
//! 1. `Command::Tick` advances the clock and cooldowns.
//! 2. Movement integrates hostiles and workers along their routes.
//! 3. Targeting and combat resolve every strike of the tick at once.
//! 4. Construction finishes sites whose build time elapsed.
//! 5. Spawning releases the wave's hostiles.
//!
//! After every batch a fresh [`WorldSnapshot`] is published to subscribers.

mod publisher;

use std::{sync::Arc, time::Duration};

use lane_defence_core::{
    CellCoord, Command, Engagement, Event, LaneId, UnitKind, WorkerId, WorldSnapshot,
};
use lane_defence_system_combat::Combat;
use lane_defence_system_construction::{self as construction, Construction};
use lane_defence_system_movement::Movement;
use lane_defence_system_spawning::{self as spawning, Spawning};
use lane_defence_system_targeting::Targeting;
use lane_defence_world::{self as world, query, Tuning, TuningError, World};

pub use publisher::SubscriptionId;

use publisher::Publisher;

/// Longest stretch of simulated time a single tick may cover.
pub const MAX_TICK: Duration = Duration::from_millis(100);

/// Owns the authoritative world, the systems and the snapshot publisher.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    movement: Movement,
    targeting: Targeting,
    combat: Combat,
    construction: Construction,
    spawning: Spawning,
    engagements: Vec<Engagement>,
    publisher: Publisher,
}

impl Simulation {
    /// Creates a simulation for a world shaped by the provided tuning.
    pub fn new(tuning: Tuning) -> Result<Self, TuningError> {
        let world = World::new(tuning)?;
        let construction = Construction::new(construction::Config {
            build_duration: query::tuning(&world).build_duration(),
        });
        let spawning = Spawning::new(spawning::Config::new(query::lane_ids(&world).collect()));
        let publisher = Publisher::new(&world);

        Ok(Self {
            world,
            movement: Movement::new(),
            targeting: Targeting::new(),
            combat: Combat::new(),
            construction,
            spawning,
            engagements: Vec::new(),
            publisher,
        })
    }

    /// Latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<WorldSnapshot> {
        self.publisher.current()
    }

    /// Read-only access to the world for callers that need `query` functions.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Registers a callback invoked with every published snapshot.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&Arc<WorldSnapshot>) + 'static,
    {
        self.publisher.subscribe(Box::new(callback))
    }

    /// Removes a subscription. Returns `false` when the id is unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.publisher.unsubscribe(id)
    }

    /// Focuses a lane; the deployed hero follows it.
    pub fn select_lane(&mut self, lane: LaneId) -> bool {
        self.act(Command::SelectLane { lane })
    }

    /// Selects a worker of the active lane, or clears the selection.
    pub fn select_worker(&mut self, worker: Option<WorkerId>) -> bool {
        self.act(Command::SelectWorker { worker })
    }

    /// Enters build placement mode for the selected worker.
    pub fn start_build_placement_mode(&mut self) -> bool {
        self.act(Command::SetPlacementMode { active: true })
    }

    /// Leaves build placement mode.
    pub fn cancel_build_placement_mode(&mut self) {
        let _ = self.act(Command::SetPlacementMode { active: false });
    }

    /// Orders the selected worker to build at the tile. Only accepted while
    /// placement mode is active.
    pub fn request_build_at(&mut self, column: u32, row: u32) -> bool {
        match self.construction.request(CellCoord::new(column, row)) {
            Ok(command) => self.act(command),
            Err(reason) => {
                tracing::debug!(column, row, %reason, "build request refused");
                false
            }
        }
    }

    /// Sends the selected worker to a tile without building.
    pub fn move_worker(&mut self, column: u32, row: u32) -> bool {
        let Some(worker) = query::selection(&self.world).worker else {
            return false;
        };
        self.act(Command::OrderMove {
            worker,
            cell: CellCoord::new(column, row),
        })
    }

    /// Returns the selected worker to idle, discarding any construction.
    pub fn stop_worker(&mut self) -> bool {
        let Some(worker) = query::selection(&self.world).worker else {
            return false;
        };
        self.act(Command::StopWorker { worker })
    }

    /// Buys a worker for the active lane and selects it.
    pub fn buy_worker(&mut self) -> bool {
        self.act(Command::HireWorker)
    }

    /// Upgrades the tower bound to the selected worker.
    pub fn upgrade_worker_tower(&mut self) -> bool {
        let Some(worker) = query::selection(&self.world).worker else {
            return false;
        };
        self.act(Command::UpgradeTower { worker })
    }

    /// Starts the next wave unless one is running.
    pub fn start_next_wave(&mut self) -> bool {
        self.act(Command::StartWave)
    }

    /// Recruits a unit into the active lane.
    pub fn summon_unit(&mut self, kind: UnitKind) -> bool {
        self.act(Command::SummonUnit { kind })
    }

    /// Deploys the hero into the active lane.
    pub fn summon_hero(&mut self) -> bool {
        self.summon_unit(UnitKind::Hero)
    }

    /// Evolves the hero profile.
    pub fn evolve_hero(&mut self) -> bool {
        self.act(Command::EvolveHero)
    }

    /// Fires the burst skill.
    pub fn trigger_skill(&mut self) -> bool {
        self.act(Command::TriggerSkill)
    }

    /// Advances the simulation by `delta_ms`, clamped to [`MAX_TICK`].
    pub fn tick(&mut self, delta_ms: u64) {
        let requested = Duration::from_millis(delta_ms);
        let dt = requested.min(MAX_TICK);
        if dt < requested {
            tracing::trace!(delta_ms, "tick delta clamped");
        }

        let mut log = self.execute(Command::Tick { dt });
        self.run_stages(&mut log);
        self.publisher.publish(&self.world);
    }

    /// Runs every system stage after the clock advanced. A world reset skips
    /// the remaining stages.
    fn run_stages(&mut self, log: &mut Vec<Event>) {
        let mut commands = Vec::new();

        self.movement
            .handle(log, &query::motion_view(&self.world), &mut commands);
        if self.submit(&mut commands, log) {
            return;
        }

        let defenders = query::defender_view(&self.world);
        self.targeting.handle(
            &defenders,
            &query::hostile_view(&self.world),
            &mut self.engagements,
        );
        self.combat.handle(
            log,
            &defenders,
            &self.engagements,
            &query::siege_view(&self.world),
            &mut commands,
        );
        if self.submit(&mut commands, log) {
            return;
        }

        self.construction.handle(
            log,
            &query::construction_view(&self.world),
            query::clock(&self.world),
            &mut commands,
        );
        if self.submit(&mut commands, log) {
            return;
        }

        self.spawning
            .handle(log, &query::wave_snapshot(&self.world), &mut commands);
        let _ = self.submit(&mut commands, log);
    }

    /// Applies a stage's commands in order. Stops at a world reset, since the
    /// remaining commands refer to the discarded session, and reports it.
    fn submit(&mut self, commands: &mut Vec<Command>, log: &mut Vec<Event>) -> bool {
        for command in commands.drain(..) {
            let events = self.execute(command);
            let reset = events
                .iter()
                .any(|event| matches!(event, Event::WorldReset { .. }));
            log.extend(events);
            if reset {
                return true;
            }
        }
        false
    }

    /// Applies a command and lets the stateful systems observe the outcome.
    fn execute(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        self.construction.observe(&events);
        self.spawning.observe(&events);
        events
    }

    /// Applies a player action as its own batch and publishes the result.
    fn act(&mut self, command: Command) -> bool {
        let events = self.execute(command);
        let accepted = !events
            .iter()
            .any(|event| matches!(event, Event::ActionRejected { .. }));
        self.publisher.publish(&self.world);
        accepted
    }
}
