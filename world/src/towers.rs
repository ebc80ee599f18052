//! Authoritative tower state management utilities.

use std::time::Duration;

use lane_defence_core::{CellCoord, Rejection, TowerId, TowerSnapshot, WorkerId};

use crate::tuning::TowerTuning;

/// Tower stored inside a lane, either as a foundation or a finished tower.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct TowerState {
    /// Identifier allocated by the world for the tower.
    pub(crate) id: TowerId,
    /// Tile occupied by the tower.
    pub(crate) cell: CellCoord,
    /// Worker that built the tower.
    pub(crate) owner: WorkerId,
    pub(crate) hp: f32,
    pub(crate) max_hp: f32,
    pub(crate) level: u32,
    pub(crate) damage: f32,
    pub(crate) range: f32,
    /// `false` while the tower is a foundation reserving its tile.
    pub(crate) completed: bool,
    pub(crate) attack_interval: Duration,
    /// Time left until the next attack.
    pub(crate) cooldown: Duration,
}

impl TowerState {
    /// Registers a level one foundation owned by `owner`.
    pub(crate) fn foundation(
        id: TowerId,
        cell: CellCoord,
        owner: WorkerId,
        tuning: &TowerTuning,
    ) -> Self {
        Self {
            id,
            cell,
            owner,
            hp: tuning.hp,
            max_hp: tuning.hp,
            level: 1,
            damage: tuning.damage,
            range: tuning.range,
            completed: false,
            attack_interval: Duration::from_millis(tuning.attack_interval_ms),
            cooldown: Duration::ZERO,
        }
    }

    /// Raises the tower by one level, healing by the hit points gained.
    pub(crate) fn upgrade(&mut self, tuning: &TowerTuning) -> Result<u32, Rejection> {
        if self.level >= tuning.max_level {
            return Err(Rejection::TowerAtMaxLevel);
        }
        self.level += 1;
        self.damage += tuning.upgrade_damage;
        self.range += tuning.upgrade_range;
        self.max_hp += tuning.upgrade_hp;
        self.hp += tuning.upgrade_hp;
        Ok(self.level)
    }

    /// Subtracts siege damage and reports whether the tower collapsed.
    pub(crate) fn absorb(&mut self, damage: f32) -> bool {
        self.hp -= damage;
        self.hp <= 0.0
    }

    pub(crate) fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            cell: self.cell,
            hp: self.hp,
            max_hp: self.max_hp,
            completed: self.completed,
            owner: self.owner,
            level: self.level,
            damage: self.damage,
            range: self.range,
        }
    }
}
