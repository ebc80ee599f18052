//! Hero progression and the burst skill.

use std::time::Duration;

use lane_defence_core::{HeroSnapshot, LaneId, Rarity, SkillSnapshot};

use crate::tuning::{HeroTuning, SkillTuning};

/// Upgradable hero profile. Evolution only ever increases damage and range.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct HeroProfile {
    name: String,
    dps: f32,
    range: f32,
    level: u32,
    dps_growth: f32,
    range_growth: f32,
}

impl HeroProfile {
    pub(crate) fn new(tuning: &HeroTuning) -> Self {
        Self {
            name: tuning.name.clone(),
            dps: tuning.dps,
            range: tuning.range,
            level: 1,
            dps_growth: tuning.dps_growth.max(1.0),
            range_growth: tuning.range_growth.max(0.0),
        }
    }

    pub(crate) fn evolve(&mut self) {
        self.dps *= self.dps_growth;
        self.range += self.range_growth;
        self.level = self.level.saturating_add(1);
    }

    pub(crate) fn dps(&self) -> f32 {
        self.dps
    }

    pub(crate) fn range(&self) -> f32 {
        self.range
    }

    pub(crate) fn level(&self) -> u32 {
        self.level
    }

    pub(crate) fn rarity(&self) -> Rarity {
        Rarity::from_level(self.level)
    }

    pub(crate) fn snapshot(&self, deployed: Option<LaneId>) -> HeroSnapshot {
        HeroSnapshot {
            name: self.name.clone(),
            dps: self.dps,
            range: self.range,
            level: self.level,
            rarity: self.rarity(),
            deployed,
        }
    }
}

/// Global burst skill with a fixed cooldown.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Skill {
    cooldown: Duration,
    remaining: Duration,
    base_damage: f32,
    damage_per_level: f32,
}

impl Skill {
    pub(crate) fn new(tuning: &SkillTuning) -> Self {
        Self {
            cooldown: Duration::from_millis(tuning.cooldown_ms),
            remaining: Duration::ZERO,
            base_damage: tuning.base_damage,
            damage_per_level: tuning.damage_per_level,
        }
    }

    pub(crate) fn is_cooling_down(&self) -> bool {
        !self.remaining.is_zero()
    }

    /// Damage dealt by an activation at the provided hero level.
    pub(crate) fn damage(&self, hero_level: u32) -> f32 {
        self.base_damage + hero_level as f32 * self.damage_per_level
    }

    pub(crate) fn start_cooldown(&mut self) {
        self.remaining = self.cooldown;
    }

    pub(crate) fn advance(&mut self, dt: Duration) {
        self.remaining = self.remaining.saturating_sub(dt);
    }

    pub(crate) fn snapshot(&self) -> SkillSnapshot {
        SkillSnapshot {
            cooling_down: self.is_cooling_down(),
            remaining_ms: u64::try_from(self.remaining.as_millis()).unwrap_or(u64::MAX),
            total_ms: u64::try_from(self.cooldown.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evolution_grows_damage_and_range() {
        let mut hero = HeroProfile::new(&HeroTuning::default());
        let dps = hero.dps();

        hero.evolve();

        assert!((hero.dps() - dps * 1.2).abs() < 1e-3);
        assert!((hero.range() - 5.0).abs() < f32::EPSILON);
        assert_eq!(hero.level(), 2);
        assert_eq!(hero.rarity(), Rarity::Rare);
    }

    #[test]
    fn rarity_reaches_mythic_after_seven_evolutions() {
        let mut hero = HeroProfile::new(&HeroTuning::default());
        let mut previous = hero.dps();
        for _ in 0..7 {
            hero.evolve();
            assert!(hero.dps() > previous);
            previous = hero.dps();
        }
        assert_eq!(hero.level(), 8);
        assert_eq!(hero.snapshot(None).rarity, Rarity::Mythic);
    }

    #[test]
    fn skill_cooldown_counts_down() {
        let mut skill = Skill::new(&SkillTuning::default());
        assert!(!skill.is_cooling_down());

        skill.start_cooldown();
        skill.advance(Duration::from_millis(6_900));
        assert!(skill.is_cooling_down());
        assert_eq!(skill.snapshot().remaining_ms, 100);

        skill.advance(Duration::from_millis(250));
        assert!(!skill.is_cooling_down());
        assert_eq!(skill.snapshot().remaining_ms, 0);
    }

    #[test]
    fn skill_damage_scales_with_level() {
        let skill = Skill::new(&SkillTuning::default());
        assert!((skill.damage(1) - 75.0).abs() < f32::EPSILON);
        assert!((skill.damage(3) - 105.0).abs() < f32::EPSILON);
    }
}
