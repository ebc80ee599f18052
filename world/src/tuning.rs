//! Tunable constants that shape a Lane Defence session.

use std::time::Duration;

use serde::Deserialize;

use crate::navigation::PathStrategy;

/// Every adjustable parameter of the simulation.
///
/// Missing fields fall back to their defaults when deserialised, so partial
/// tuning files only need to name the values they change.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Number of parallel lanes.
    pub lanes: u32,
    /// Edge length of every square lane grid, in tiles.
    pub grid_size: u32,
    /// Gold held when the world is initialised.
    pub starting_gold: u32,
    /// Life held when the world is initialised.
    pub starting_life: u32,
    /// Pathfinding strategy used for lane routes and worker travel.
    pub path_strategy: PathStrategy,
    /// Gold prices of every purchase.
    pub prices: Prices,
    /// Time a worker spends building a tower, in milliseconds.
    pub build_duration_ms: u64,
    /// Worker travel speed in tiles per second.
    pub worker_speed: f32,
    /// Maximum number of workers per lane.
    pub max_workers_per_lane: usize,
    /// Maximum number of recruited units per lane, hero included.
    pub max_units_per_lane: usize,
    /// Tower statistics.
    pub tower: TowerTuning,
    /// Wave cadence and hostile statistics.
    pub wave: WaveTuning,
    /// Burst skill parameters.
    pub skill: SkillTuning,
    /// Hero profile parameters.
    pub hero: HeroTuning,
    /// Marine statistics.
    pub marine: TroopTuning,
    /// Firebat statistics.
    pub firebat: TroopTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            lanes: 6,
            grid_size: 32,
            starting_gold: 900,
            starting_life: 20,
            path_strategy: PathStrategy::BreadthFirst,
            prices: Prices::default(),
            build_duration_ms: 2_000,
            worker_speed: 4.0,
            max_workers_per_lane: 8,
            max_units_per_lane: 6,
            tower: TowerTuning::default(),
            wave: WaveTuning::default(),
            skill: SkillTuning::default(),
            hero: HeroTuning::default(),
            marine: TroopTuning {
                damage: 8.0,
                range: 4.0,
                attack_interval_ms: 500,
            },
            firebat: TroopTuning {
                damage: 18.0,
                range: 2.0,
                attack_interval_ms: 700,
            },
        }
    }
}

impl Tuning {
    /// Checks that the tuning describes a playable world.
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.lanes == 0 {
            return Err(TuningError::NoLanes);
        }
        if self.grid_size < 3 {
            return Err(TuningError::GridTooSmall {
                size: self.grid_size,
            });
        }
        if self.wave.min_interval_ms == 0 {
            return Err(TuningError::ZeroSpawnInterval);
        }
        if self.tower.max_level == 0 {
            return Err(TuningError::ZeroTowerLevel);
        }
        let speeds = [
            ("worker_speed", self.worker_speed),
            ("wave.base_speed", self.wave.base_speed),
            ("wave.max_speed", self.wave.max_speed),
        ];
        for (field, value) in speeds {
            if !value.is_finite() || value <= 0.0 {
                return Err(TuningError::InvalidSpeed { field });
            }
        }
        Ok(())
    }

    /// Time a worker spends building a tower.
    #[must_use]
    pub fn build_duration(&self) -> Duration {
        Duration::from_millis(self.build_duration_ms)
    }
}

/// Reasons a tuning is rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TuningError {
    /// The world needs at least one lane.
    #[error("at least one lane is required")]
    NoLanes,
    /// Grids must leave room between spawn and goal.
    #[error("grid size {size} is too small; at least 3 tiles are required")]
    GridTooSmall {
        /// Configured grid size.
        size: u32,
    },
    /// A zero spawn interval would spawn a whole wave in one tick.
    #[error("the minimum spawn interval must be positive")]
    ZeroSpawnInterval,
    /// Towers need at least one level.
    #[error("towers need a maximum level of at least one")]
    ZeroTowerLevel,
    /// Speeds must be positive and finite.
    #[error("`{field}` must be a positive finite speed")]
    InvalidSpeed {
        /// Name of the offending field.
        field: &'static str,
    },
}

/// Gold prices of every purchase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Prices {
    /// Hiring a worker.
    pub worker: u32,
    /// Ordering a tower.
    pub tower: u32,
    /// Upgrading a tower by one level.
    pub tower_upgrade: u32,
    /// Deploying the hero.
    pub hero: u32,
    /// Recruiting a marine.
    pub marine: u32,
    /// Recruiting a firebat.
    pub firebat: u32,
    /// Evolving the hero.
    pub hero_evolution: u32,
}

impl Default for Prices {
    fn default() -> Self {
        Self {
            worker: 80,
            tower: 100,
            tower_upgrade: 140,
            hero: 200,
            marine: 70,
            firebat: 90,
            hero_evolution: 150,
        }
    }
}

/// Tower statistics.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TowerTuning {
    /// Hit points of a level one tower.
    pub hp: f32,
    /// Damage per attack of a level one tower.
    pub damage: f32,
    /// Range of a level one tower in tiles.
    pub range: f32,
    /// Delay between attacks in milliseconds.
    pub attack_interval_ms: u64,
    /// Highest reachable level.
    pub max_level: u32,
    /// Damage gained per upgrade.
    pub upgrade_damage: f32,
    /// Range gained per upgrade.
    pub upgrade_range: f32,
    /// Maximum hit points gained per upgrade.
    pub upgrade_hp: f32,
}

impl Default for TowerTuning {
    fn default() -> Self {
        Self {
            hp: 200.0,
            damage: 10.0,
            range: 3.5,
            attack_interval_ms: 600,
            max_level: 5,
            upgrade_damage: 6.0,
            upgrade_range: 0.5,
            upgrade_hp: 50.0,
        }
    }
}

/// Wave cadence and per-wave hostile statistics.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct WaveTuning {
    /// Spawn quota independent of the wave number.
    pub base_enemies: u32,
    /// Additional hostiles per wave number.
    pub enemies_per_wave: u32,
    /// Spawn interval before wave scaling, in milliseconds.
    pub base_interval_ms: u64,
    /// Interval reduction per wave number, in milliseconds.
    pub interval_step_ms: u64,
    /// Interval floor, in milliseconds.
    pub min_interval_ms: u64,
    /// Hostile hit points independent of the wave number.
    pub base_hp: f32,
    /// Additional hostile hit points per wave number.
    pub hp_per_wave: f32,
    /// Hostile speed independent of the wave number, in tiles per second.
    pub base_speed: f32,
    /// Additional hostile speed per wave number.
    pub speed_per_wave: f32,
    /// Hostile speed ceiling.
    pub max_speed: f32,
    /// Gold reward independent of the wave number.
    pub base_reward: u32,
    /// Siege damage per second independent of the wave number.
    pub siege_damage: f32,
    /// Additional siege damage per wave number.
    pub siege_damage_per_wave: f32,
}

impl Default for WaveTuning {
    fn default() -> Self {
        Self {
            base_enemies: 6,
            enemies_per_wave: 2,
            base_interval_ms: 900,
            interval_step_ms: 40,
            min_interval_ms: 220,
            base_hp: 30.0,
            hp_per_wave: 10.0,
            base_speed: 1.2,
            speed_per_wave: 0.08,
            max_speed: 4.0,
            base_reward: 5,
            siege_damage: 8.0,
            siege_damage_per_wave: 1.0,
        }
    }
}

/// Burst skill parameters.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SkillTuning {
    /// Cooldown after activation, in milliseconds.
    pub cooldown_ms: u64,
    /// Damage independent of the hero level.
    pub base_damage: f32,
    /// Additional damage per hero level.
    pub damage_per_level: f32,
}

impl Default for SkillTuning {
    fn default() -> Self {
        Self {
            cooldown_ms: 7_000,
            base_damage: 60.0,
            damage_per_level: 15.0,
        }
    }
}

/// Hero profile parameters.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct HeroTuning {
    /// Display name.
    pub name: String,
    /// Damage per second at level one.
    pub dps: f32,
    /// Range at level one.
    pub range: f32,
    /// Delay between hero attacks, in milliseconds.
    pub attack_interval_ms: u64,
    /// Damage multiplier applied per evolution.
    pub dps_growth: f32,
    /// Range gained per evolution.
    pub range_growth: f32,
}

impl Default for HeroTuning {
    fn default() -> Self {
        Self {
            name: "Astra Ranger".to_owned(),
            dps: 40.0,
            range: 4.0,
            attack_interval_ms: 1_000,
            dps_growth: 1.2,
            range_growth: 1.0,
        }
    }
}

/// Statistics of a recruitable troop.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TroopTuning {
    /// Damage per attack.
    pub damage: f32,
    /// Range in tiles.
    pub range: f32,
    /// Delay between attacks, in milliseconds.
    pub attack_interval_ms: u64,
}

impl Default for TroopTuning {
    fn default() -> Self {
        Self {
            damage: 8.0,
            range: 4.0,
            attack_interval_ms: 500,
        }
    }
}
