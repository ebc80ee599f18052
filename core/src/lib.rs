#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Lane Defence engine.
//!
//! This crate defines the message surface that connects the simulation
//! controller, the authoritative world, and pure systems. The controller
//! submits [`Command`] values describing desired mutations, the world executes
//! those commands via its `apply` entry point, and then broadcasts [`Event`]
//! values for systems to react to deterministically. Systems consume event
//! streams, query immutable views, and respond exclusively with new command
//! batches. Presentation layers only ever see the published [`WorldSnapshot`].

use std::{sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};

mod snapshot;

pub use snapshot::{
    GridSnapshot, HeroSnapshot, HostileSnapshot, LaneSnapshot, SkillSnapshot, TileSnapshot,
    TowerSnapshot, UnitSnapshot, WaveSnapshot, WorkerSnapshot, WorldSnapshot,
};

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Focuses the player's attention on the provided lane.
    SelectLane {
        /// Lane that should become the active selection.
        lane: LaneId,
    },
    /// Selects a worker in the active lane, or clears the selection.
    SelectWorker {
        /// Worker to select; `None` clears the selection.
        worker: Option<WorkerId>,
    },
    /// Enters or leaves build placement mode for the selected worker.
    SetPlacementMode {
        /// Whether placement mode should be active afterwards.
        active: bool,
    },
    /// Purchases a new worker for the selected lane.
    HireWorker,
    /// Orders a worker to travel to a tile and build a tower there.
    OrderBuild {
        /// Worker receiving the order.
        worker: WorkerId,
        /// Tile that should hold the new tower.
        cell: CellCoord,
    },
    /// Orders a worker to walk to a tile without building.
    OrderMove {
        /// Worker receiving the order.
        worker: WorkerId,
        /// Destination tile.
        cell: CellCoord,
    },
    /// Cancels whatever the worker is doing and returns it to idle.
    StopWorker {
        /// Worker that should stop.
        worker: WorkerId,
    },
    /// Upgrades the tower bound to the provided worker.
    UpgradeTower {
        /// Worker whose bound tower should be upgraded.
        worker: WorkerId,
    },
    /// Starts the next wave unless one is already running.
    StartWave,
    /// Recruits a unit into the selected lane.
    SummonUnit {
        /// Kind of unit being recruited.
        kind: UnitKind,
    },
    /// Spends gold to evolve the hero profile.
    EvolveHero,
    /// Activates the global burst skill.
    TriggerSkill,
    /// Moves a mobile entity along its route.
    Advance {
        /// Entity being moved.
        mover: Mover,
        /// Position reached after integrating the tick's travel budget.
        position: CellPoint,
        /// Index of the route waypoint the entity heads toward next.
        next_waypoint: usize,
    },
    /// Applies every strike gathered during a tick as one atomic batch.
    ResolveCombat {
        /// Strikes resolved together; damage against a hostile is additive.
        strikes: Vec<Strike>,
    },
    /// Finishes the construction carried out by a worker.
    CompleteConstruction {
        /// Worker whose build timer elapsed.
        worker: WorkerId,
    },
    /// Spawns a hostile for the active wave at the lane's spawn point.
    SpawnHostile {
        /// Lane receiving the hostile.
        lane: LaneId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that life ran out and the world returned to its initial state.
    WorldReset {
        /// Epoch counter of the fresh world.
        epoch: u64,
    },
    /// Confirms the active lane selection.
    LaneSelected {
        /// Lane that became active.
        lane: LaneId,
    },
    /// Confirms the worker selection.
    WorkerSelected {
        /// Selected worker, if any.
        worker: Option<WorkerId>,
    },
    /// Announces that build placement mode was entered or left.
    PlacementModeChanged {
        /// Whether placement mode is now active.
        active: bool,
    },
    /// Confirms that a worker was purchased.
    WorkerHired {
        /// Lane the worker belongs to.
        lane: LaneId,
        /// Identifier assigned to the worker.
        worker: WorkerId,
        /// Tile the worker starts on.
        cell: CellCoord,
    },
    /// Confirms that a build order was accepted and paid for.
    BuildOrdered {
        /// Lane of the worker.
        lane: LaneId,
        /// Worker carrying out the order.
        worker: WorkerId,
        /// Tile that will hold the tower.
        cell: CellCoord,
    },
    /// Confirms that a move order was accepted.
    MoveOrdered {
        /// Lane of the worker.
        lane: LaneId,
        /// Worker carrying out the order.
        worker: WorkerId,
        /// Destination tile.
        cell: CellCoord,
    },
    /// Reports that a worker reached the end of its route.
    WorkerArrived {
        /// Lane of the worker.
        lane: LaneId,
        /// Worker that arrived.
        worker: WorkerId,
        /// Tile the worker reached.
        cell: CellCoord,
    },
    /// Reports that a worker started building a tower foundation.
    ConstructionStarted {
        /// Lane of the construction site.
        lane: LaneId,
        /// Worker doing the construction.
        worker: WorkerId,
        /// Identifier reserved for the tower.
        tower: TowerId,
        /// Tile of the construction site.
        cell: CellCoord,
    },
    /// Confirms that a tower was committed to the lane grid.
    TowerBuilt {
        /// Lane that received the tower.
        lane: LaneId,
        /// Worker now bound to the tower.
        worker: WorkerId,
        /// Identifier of the tower.
        tower: TowerId,
        /// Tile occupied by the tower.
        cell: CellCoord,
    },
    /// Reports that a finished construction would have sealed the lane.
    ConstructionFailed {
        /// Lane of the construction site.
        lane: LaneId,
        /// Worker returned to idle.
        worker: WorkerId,
        /// Tile that was reverted.
        cell: CellCoord,
    },
    /// Confirms that a worker stopped and returned to idle.
    WorkerStopped {
        /// Lane of the worker.
        lane: LaneId,
        /// Worker that stopped.
        worker: WorkerId,
    },
    /// Confirms that a tower gained a level.
    TowerUpgraded {
        /// Lane of the tower.
        lane: LaneId,
        /// Upgraded tower.
        tower: TowerId,
        /// Level reached by the tower.
        level: u32,
    },
    /// Reports that hostiles destroyed a tower.
    TowerDestroyed {
        /// Lane of the tower.
        lane: LaneId,
        /// Destroyed tower.
        tower: TowerId,
        /// Tile freed by the destruction.
        cell: CellCoord,
    },
    /// Reports that the lane's cached route was recomputed.
    LaneRepathed {
        /// Lane that was repathed.
        lane: LaneId,
        /// Number of waypoints in the new route, `None` when the lane is sealed.
        waypoints: Option<usize>,
    },
    /// Announces the start of a wave.
    WaveStarted {
        /// Number of the wave that started.
        wave: u32,
        /// Number of hostiles the wave will spawn.
        enemies_to_spawn: u32,
    },
    /// Confirms that a hostile entered a lane.
    HostileSpawned {
        /// Lane receiving the hostile.
        lane: LaneId,
        /// Identifier assigned to the hostile.
        hostile: HostileId,
    },
    /// Reports that a hostile was killed and its reward credited.
    HostileKilled {
        /// Lane of the hostile.
        lane: LaneId,
        /// Hostile that died.
        hostile: HostileId,
        /// Gold credited for the kill.
        reward: u32,
    },
    /// Reports that a hostile reached the goal and cost a life.
    HostileLeaked {
        /// Lane of the hostile.
        lane: LaneId,
        /// Hostile that reached the goal.
        hostile: HostileId,
        /// Life remaining after the leak.
        life: u32,
    },
    /// Announces that every hostile of the wave was spawned and removed.
    WaveCompleted {
        /// Number of the completed wave.
        wave: u32,
    },
    /// Confirms that a unit joined a lane.
    UnitSummoned {
        /// Lane receiving the unit.
        lane: LaneId,
        /// Identifier assigned to the unit.
        unit: UnitId,
        /// Kind of unit recruited.
        kind: UnitKind,
    },
    /// Reports that the hero followed the lane selection.
    HeroRedeployed {
        /// Lane the hero now defends.
        lane: LaneId,
        /// Identifier of the hero unit.
        unit: UnitId,
    },
    /// Confirms a hero evolution.
    HeroEvolved {
        /// Level reached by the hero.
        level: u32,
        /// Rarity tier derived from the new level.
        rarity: Rarity,
    },
    /// Confirms that the burst skill fired.
    SkillActivated {
        /// Damage dealt to every live hostile.
        damage: f32,
        /// Number of hostiles killed by the burst.
        kills: u32,
    },
    /// Reports that a player action was rejected without mutating the world.
    ActionRejected {
        /// Action that was attempted.
        action: Action,
        /// Reason for the rejection.
        reason: Rejection,
    },
}

/// Player-facing actions that can be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Lane selection.
    SelectLane,
    /// Worker selection.
    SelectWorker,
    /// Entering build placement mode.
    PlacementMode,
    /// Worker purchase.
    HireWorker,
    /// Build order.
    OrderBuild,
    /// Move order.
    OrderMove,
    /// Stop order.
    StopWorker,
    /// Tower upgrade.
    UpgradeTower,
    /// Wave start.
    StartWave,
    /// Unit or hero recruitment.
    SummonUnit,
    /// Hero evolution.
    EvolveHero,
    /// Skill activation.
    TriggerSkill,
}

/// Reasons a player action may be rejected by the world.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error,
)]
pub enum Rejection {
    /// The ledger does not hold enough gold.
    #[error("insufficient gold: {cost} required, {available} available")]
    InsufficientGold {
        /// Price of the purchase.
        cost: u32,
        /// Gold held when the purchase was attempted.
        available: u32,
    },
    /// The tile lies outside the lane grid.
    #[error("tile lies outside the lane grid")]
    OutOfBounds,
    /// The tile is blocked, or is the lane's spawn or goal.
    #[error("tile cannot hold a tower")]
    NotBuildable,
    /// A tower, foundation, or pending order already claims the tile.
    #[error("tile is already claimed")]
    Occupied,
    /// Blocking the tile would leave no route from spawn to goal.
    #[error("placement would sever the lane route")]
    RouteSevered,
    /// The worker cannot walk to the tile.
    #[error("tile is unreachable for the worker")]
    Unreachable,
    /// The worker is already bound to a tower.
    #[error("worker is already bound to a tower")]
    WorkerBound,
    /// The worker is carrying out another order.
    #[error("worker is busy")]
    WorkerBusy,
    /// No lane with the provided identifier exists.
    #[error("unknown lane")]
    UnknownLane,
    /// No worker with the provided identifier exists in the active lane.
    #[error("unknown worker")]
    UnknownWorker,
    /// The action needs a selected worker.
    #[error("no worker selected")]
    NoWorkerSelected,
    /// Build requests are only accepted in placement mode.
    #[error("build placement mode is not active")]
    PlacementInactive,
    /// The worker has not built a tower yet.
    #[error("worker has no bound tower")]
    NoBoundTower,
    /// The tower cannot gain further levels.
    #[error("tower is already at its maximum level")]
    TowerAtMaxLevel,
    /// The lane holds the maximum number of entities of that kind.
    #[error("lane is at capacity")]
    LaneFull,
    /// Only one hero may be deployed.
    #[error("hero is already deployed")]
    HeroDeployed,
    /// The skill is still cooling down.
    #[error("skill is cooling down")]
    SkillCoolingDown,
    /// A wave is already running.
    #[error("a wave is already active")]
    WaveActive,
}

/// Unique identifier assigned to a lane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LaneId(u32);

impl LaneId {
    /// Creates a new lane identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates a new identifier with the provided numeric value.
            #[must_use]
            pub const fn new(value: u32) -> Self {
                Self(value)
            }

            /// Retrieves the numeric representation of the identifier.
            #[must_use]
            pub const fn get(&self) -> u32 {
                self.0
            }
        }
    };
}

entity_id!(
    /// Unique identifier assigned to a worker.
    WorkerId
);
entity_id!(
    /// Unique identifier assigned to a tower.
    TowerId
);
entity_id!(
    /// Unique identifier assigned to a hostile.
    HostileId
);
entity_id!(
    /// Unique identifier assigned to a recruited unit.
    UnitId
);

/// Mobile entities moved by the movement integrator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Mover {
    /// A hostile walking the lane route.
    Hostile(HostileId),
    /// A worker walking its own route.
    Worker(WorkerId),
}

/// Entities able to damage hostiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DefenderId {
    /// A completed tower.
    Tower(TowerId),
    /// A recruited unit, hero included.
    Unit(UnitId),
}

/// Single damage application gathered during a combat tick.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Strike {
    /// A defender hits a hostile.
    Defender {
        /// Attacking defender; its cooldown restarts when resolved.
        attacker: DefenderId,
        /// Hostile receiving the damage.
        target: HostileId,
        /// Damage dealt.
        damage: f32,
    },
    /// A blocked hostile batters a tower.
    Siege {
        /// Attacking hostile.
        attacker: HostileId,
        /// Tower receiving the damage.
        target: TowerId,
        /// Damage dealt.
        damage: f32,
    },
}

/// Kinds of units that can be recruited into a lane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UnitKind {
    /// Long-ranged rifle infantry.
    Marine,
    /// Short-ranged heavy hitter.
    Firebat,
    /// The unique hero whose strength follows the hero profile.
    Hero,
}

/// Lifecycle states of a worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkerState {
    /// Waiting for orders.
    Idle,
    /// Walking to a paid-for construction site.
    Moving,
    /// Building a tower at the construction site.
    Building,
    /// Carrying out a plain move order.
    Executing,
}

/// Rarity tier of the hero, derived from its level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rarity {
    /// Levels below 2.
    Common,
    /// Levels 2 and 3.
    Rare,
    /// Levels 4 and 5.
    Epic,
    /// Levels 6 and 7.
    Legendary,
    /// Level 8 and beyond.
    Mythic,
}

impl Rarity {
    /// Derives the rarity tier for the provided hero level.
    #[must_use]
    pub const fn from_level(level: u32) -> Self {
        match level {
            0..=1 => Self::Common,
            2..=3 => Self::Rare,
            4..=5 => Self::Epic,
            6..=7 => Self::Legendary,
            _ => Self::Mythic,
        }
    }
}

/// Location of a single grid tile expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Continuous position of the cell.
    #[must_use]
    pub fn to_point(self) -> CellPoint {
        CellPoint::new(self.column as f32, self.row as f32)
    }
}

/// Continuous position measured in tile units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CellPoint {
    column: f32,
    row: f32,
}

impl CellPoint {
    /// Creates a new continuous position.
    #[must_use]
    pub const fn new(column: f32, row: f32) -> Self {
        Self { column, row }
    }

    /// Horizontal component measured in tiles.
    #[must_use]
    pub const fn column(&self) -> f32 {
        self.column
    }

    /// Vertical component measured in tiles.
    #[must_use]
    pub const fn row(&self) -> f32 {
        self.row
    }

    /// Euclidean distance between two positions.
    #[must_use]
    pub fn distance(self, other: CellPoint) -> f32 {
        (other.column - self.column).hypot(other.row - self.row)
    }

    /// Moves `step` tiles toward `target` without passing it.
    #[must_use]
    pub fn toward(self, target: CellPoint, step: f32) -> CellPoint {
        let distance = self.distance(target);
        if distance <= step || distance <= f32::EPSILON {
            return target;
        }

        let ratio = step / distance;
        CellPoint::new(
            self.column + (target.column - self.column) * ratio,
            self.row + (target.row - self.row) * ratio,
        )
    }

    /// Tile containing the position, clamped to non-negative coordinates.
    #[must_use]
    pub fn nearest_cell(self) -> CellCoord {
        CellCoord::new(
            self.column.round().max(0.0) as u32,
            self.row.round().max(0.0) as u32,
        )
    }
}

impl From<CellCoord> for CellPoint {
    fn from(cell: CellCoord) -> Self {
        cell.to_point()
    }
}

/// Immutable description of an entity the movement integrator advances.
#[derive(Clone, Debug, PartialEq)]
pub struct MoverSnapshot {
    /// Entity being moved.
    pub mover: Mover,
    /// Current position.
    pub position: CellPoint,
    /// Travel speed in tiles per second.
    pub speed: f32,
    /// Index of the next route waypoint.
    pub next_waypoint: usize,
    /// Waypoints the entity follows, inclusive of both ends.
    pub route: Arc<[CellCoord]>,
}

/// Read-only snapshot of every entity that moves this tick.
#[derive(Clone, Debug, Default)]
pub struct MotionView {
    snapshots: Vec<MoverSnapshot>,
}

impl MotionView {
    /// Creates a new motion view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<MoverSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.mover);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &MoverSnapshot> {
        self.snapshots.iter()
    }
}

/// Immutable description of a defender used for targeting and combat.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DefenderSnapshot {
    /// Defender identity.
    pub id: DefenderId,
    /// Lane the defender protects.
    pub lane: LaneId,
    /// Defender position.
    pub position: CellPoint,
    /// Attack range in tiles.
    pub range: f32,
    /// Damage per attack.
    pub damage: f32,
    /// Time left until the defender may attack again.
    pub ready_in: Duration,
}

/// Read-only snapshot describing all defenders able to fight.
#[derive(Clone, Debug, Default)]
pub struct DefenderView {
    snapshots: Vec<DefenderSnapshot>,
}

impl DefenderView {
    /// Creates a new defender view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<DefenderSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &DefenderSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot captured for the provided defender.
    #[must_use]
    pub fn get(&self, id: DefenderId) -> Option<&DefenderSnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }
}

/// Read-only snapshot describing all live hostiles.
#[derive(Clone, Debug, Default)]
pub struct HostileView {
    snapshots: Vec<HostileSnapshot>,
}

impl HostileView {
    /// Creates a new hostile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<HostileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &HostileSnapshot> {
        self.snapshots.iter()
    }
}

/// Target chosen for a defender by the targeting system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Engagement {
    /// Defender that acquired the target.
    pub defender: DefenderId,
    /// Hostile selected as the target.
    pub hostile: HostileId,
    /// Distance between the defender and the hostile in tiles.
    pub distance: f32,
}

/// Hostile stuck in a lane without a route.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Assailant {
    /// Hostile identity.
    pub hostile: HostileId,
    /// Lane the hostile is stuck in.
    pub lane: LaneId,
    /// Position of the hostile.
    pub position: CellPoint,
    /// Damage dealt to structures per second.
    pub damage_per_second: f32,
}

/// Completed tower that blocked hostiles may attack.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Structure {
    /// Tower identity.
    pub tower: TowerId,
    /// Lane of the tower.
    pub lane: LaneId,
    /// Tile occupied by the tower.
    pub cell: CellCoord,
}

/// Read-only snapshot of blocked hostiles and the structures they may attack.
#[derive(Clone, Debug, Default)]
pub struct SiegeView {
    assailants: Vec<Assailant>,
    structures: Vec<Structure>,
}

impl SiegeView {
    /// Creates a new siege view; both collections are sorted by identifier.
    #[must_use]
    pub fn new(mut assailants: Vec<Assailant>, mut structures: Vec<Structure>) -> Self {
        assailants.sort_by_key(|assailant| assailant.hostile);
        structures.sort_by_key(|structure| structure.tower);
        Self {
            assailants,
            structures,
        }
    }

    /// Hostiles stuck in sealed lanes.
    pub fn assailants(&self) -> impl Iterator<Item = &Assailant> {
        self.assailants.iter()
    }

    /// Structures available as siege targets.
    pub fn structures(&self) -> impl Iterator<Item = &Structure> {
        self.structures.iter()
    }
}

/// Construction site whose worker is currently building.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildSite {
    /// Worker doing the construction.
    pub worker: WorkerId,
    /// Lane of the construction site.
    pub lane: LaneId,
    /// Tile being built on.
    pub cell: CellCoord,
    /// Simulation time at which construction began.
    pub started_at: Duration,
}

/// Read-only snapshot describing all active construction sites.
#[derive(Clone, Debug, Default)]
pub struct ConstructionView {
    sites: Vec<BuildSite>,
}

impl ConstructionView {
    /// Creates a new construction view from the provided sites.
    #[must_use]
    pub fn from_sites(mut sites: Vec<BuildSite>) -> Self {
        sites.sort_by_key(|site| site.worker);
        Self { sites }
    }

    /// Iterator over the captured sites in worker order.
    pub fn iter(&self) -> impl Iterator<Item = &BuildSite> {
        self.sites.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{CellCoord, CellPoint, Rarity, Rejection};

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn toward_stops_at_target() {
        let start = CellPoint::new(0.0, 0.0);
        let target = CellPoint::new(3.0, 4.0);

        assert_eq!(start.toward(target, 10.0), target);
        let halfway = start.toward(target, 2.5);
        assert!((halfway.column() - 1.5).abs() < 1e-5);
        assert!((halfway.row() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn nearest_cell_rounds_and_clamps() {
        assert_eq!(
            CellPoint::new(2.4, 6.6).nearest_cell(),
            CellCoord::new(2, 7)
        );
        assert_eq!(
            CellPoint::new(-0.7, 0.2).nearest_cell(),
            CellCoord::new(0, 0)
        );
    }

    #[test]
    fn rarity_follows_level_thresholds() {
        assert_eq!(Rarity::from_level(1), Rarity::Common);
        assert_eq!(Rarity::from_level(3), Rarity::Rare);
        assert_eq!(Rarity::from_level(4), Rarity::Epic);
        assert_eq!(Rarity::from_level(6), Rarity::Legendary);
        assert_eq!(Rarity::from_level(8), Rarity::Mythic);
        assert_eq!(Rarity::from_level(40), Rarity::Mythic);
    }

    #[test]
    fn rejection_reports_gold_shortfall() {
        let reason = Rejection::InsufficientGold {
            cost: 100,
            available: 40,
        };
        assert_eq!(
            reason.to_string(),
            "insufficient gold: 100 required, 40 available"
        );
    }
}
