//! Immutable world snapshots published to presentation layers.
//!
//! A [`WorldSnapshot`] is a consistent point-in-time copy of the simulation.
//! Lanes and grids are reference counted so unchanged parts can be shared
//! between successive snapshots instead of being copied on every tick.

use std::{sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{
    CellCoord, CellPoint, HostileId, LaneId, Rarity, TowerId, UnitId, UnitKind, WorkerId,
    WorkerState,
};

/// Complete read model of the simulation at one instant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Remaining life.
    pub life: u32,
    /// Gold held by the player.
    pub gold: u32,
    /// Per-lane state in lane order.
    pub lanes: Vec<Arc<LaneSnapshot>>,
    /// Lane currently selected by the player.
    pub selected_lane: LaneId,
    /// Worker currently selected by the player.
    pub selected_worker: Option<WorkerId>,
    /// Whether build placement mode is active.
    pub placement_mode: bool,
    /// Wave progress.
    pub wave: WaveSnapshot,
    /// Hero profile.
    pub hero: HeroSnapshot,
    /// Burst skill cooldown.
    pub skill: SkillSnapshot,
    /// Simulated time elapsed since the world was (re)initialised.
    pub elapsed: Duration,
}

impl WorldSnapshot {
    /// Looks up the snapshot of the provided lane.
    #[must_use]
    pub fn lane(&self, lane: LaneId) -> Option<&LaneSnapshot> {
        let index = usize::try_from(lane.get()).ok()?;
        self.lanes.get(index).map(Arc::as_ref)
    }

    /// Total number of hostiles alive across every lane.
    #[must_use]
    pub fn hostile_count(&self) -> usize {
        self.lanes.iter().map(|lane| lane.hostiles.len()).sum()
    }
}

/// State of one lane.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LaneSnapshot {
    /// Lane identity.
    pub id: LaneId,
    /// Occupancy grid.
    pub grid: Arc<GridSnapshot>,
    /// Tile hostiles spawn on.
    pub spawn: CellCoord,
    /// Tile hostiles try to reach.
    pub goal: CellCoord,
    /// Cached route from spawn to goal; `None` when the lane is sealed.
    pub route: Option<Arc<[CellCoord]>>,
    /// Workers in identifier order.
    pub workers: Vec<WorkerSnapshot>,
    /// Towers and foundations in identifier order.
    pub towers: Vec<TowerSnapshot>,
    /// Hostiles in identifier order.
    pub hostiles: Vec<HostileSnapshot>,
    /// Recruited units in identifier order.
    pub units: Vec<UnitSnapshot>,
}

/// Occupancy grid of a lane stored in row-major order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSnapshot {
    columns: u32,
    rows: u32,
    tiles: Vec<TileSnapshot>,
}

impl GridSnapshot {
    /// Creates a grid snapshot from row-major tiles.
    #[must_use]
    pub fn new(columns: u32, rows: u32, tiles: Vec<TileSnapshot>) -> Self {
        Self {
            columns,
            rows,
            tiles,
        }
    }

    /// Number of columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Tile stored at the provided cell, if it lies within the grid.
    #[must_use]
    pub fn tile(&self, cell: CellCoord) -> Option<TileSnapshot> {
        if cell.column() >= self.columns || cell.row() >= self.rows {
            return None;
        }
        let width = usize::try_from(self.columns).ok()?;
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        self.tiles.get(row * width + column).copied()
    }

    /// Iterator over all tiles in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &TileSnapshot> {
        self.tiles.iter()
    }
}

/// State of one grid tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSnapshot {
    /// Whether hostiles may walk across the tile.
    pub walkable: bool,
    /// Tower standing on the tile.
    pub occupant: Option<TowerId>,
}

/// State of one worker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkerSnapshot {
    /// Worker identity.
    pub id: WorkerId,
    /// Current position.
    pub position: CellPoint,
    /// Lifecycle state.
    pub state: WorkerState,
    /// Destination of the current order.
    pub target: Option<CellCoord>,
    /// Simulation time at which construction began.
    pub build_started_at: Option<Duration>,
    /// Tower the worker built and may upgrade.
    pub bound_tower: Option<TowerId>,
}

/// State of one tower or construction foundation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerSnapshot {
    /// Tower identity.
    pub id: TowerId,
    /// Tile occupied by the tower.
    pub cell: CellCoord,
    /// Remaining hit points.
    pub hp: f32,
    /// Maximum hit points.
    pub max_hp: f32,
    /// `false` while the tower is still a foundation.
    pub completed: bool,
    /// Worker that built the tower.
    pub owner: WorkerId,
    /// Upgrade level starting at one.
    pub level: u32,
    /// Damage per attack.
    pub damage: f32,
    /// Attack range in tiles.
    pub range: f32,
}

/// State of one hostile.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HostileSnapshot {
    /// Hostile identity.
    pub id: HostileId,
    /// Lane the hostile walks.
    pub lane: LaneId,
    /// Current position.
    pub position: CellPoint,
    /// Remaining hit points.
    pub hp: f32,
    /// Maximum hit points.
    pub max_hp: f32,
    /// Travel speed in tiles per second.
    pub speed: f32,
    /// Gold credited when killed.
    pub reward: u32,
    /// Index of the next route waypoint.
    pub next_waypoint: usize,
}

/// State of one recruited unit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitSnapshot {
    /// Unit identity.
    pub id: UnitId,
    /// Kind of unit.
    pub kind: UnitKind,
    /// Deployment position.
    pub position: CellPoint,
    /// Damage per attack.
    pub damage: f32,
    /// Attack range in tiles.
    pub range: f32,
}

/// Progress of the current wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveSnapshot {
    /// Whether the wave is still running.
    pub active: bool,
    /// Number of the latest wave; zero before the first wave.
    pub number: u32,
    /// Spawn quota of the wave.
    pub enemies_to_spawn: u32,
    /// Hostiles spawned so far.
    pub enemies_spawned: u32,
    /// Delay between successive spawns.
    pub spawn_interval: Duration,
}

/// Hero profile shown to the player.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeroSnapshot {
    /// Display name.
    pub name: String,
    /// Damage per second.
    pub dps: f32,
    /// Attack range in tiles.
    pub range: f32,
    /// Evolution level starting at one.
    pub level: u32,
    /// Rarity tier derived from the level.
    pub rarity: Rarity,
    /// Lane the hero is deployed to.
    pub deployed: Option<LaneId>,
}

/// Cooldown state of the burst skill.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillSnapshot {
    /// Whether the skill is unavailable.
    pub cooling_down: bool,
    /// Milliseconds left on the cooldown.
    pub remaining_ms: u64,
    /// Full cooldown length in milliseconds.
    pub total_ms: u64,
}
