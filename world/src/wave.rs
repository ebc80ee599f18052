//! Wave bookkeeping: quota, spawn count, cadence, and hostile scaling.

use std::time::Duration;

use lane_defence_core::WaveSnapshot;

use crate::tuning::WaveTuning;

/// Statistics rolled for every hostile of a wave.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct HostileStats {
    pub(crate) hp: f32,
    pub(crate) speed: f32,
    pub(crate) reward: u32,
    pub(crate) siege_damage: f32,
}

/// Wave state machine: inactive → active (spawning, then draining) → inactive.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Wave {
    tuning: WaveTuning,
    active: bool,
    number: u32,
    enemies_to_spawn: u32,
    enemies_spawned: u32,
    spawn_interval: Duration,
}

impl Wave {
    pub(crate) fn new(tuning: WaveTuning) -> Self {
        Self {
            tuning,
            active: false,
            number: 0,
            enemies_to_spawn: 0,
            enemies_spawned: 0,
            spawn_interval: Duration::from_millis(tuning.base_interval_ms),
        }
    }

    pub(crate) fn number(&self) -> u32 {
        self.number
    }

    pub(crate) fn enemies_to_spawn(&self) -> u32 {
        self.enemies_to_spawn
    }

    /// Starts the next wave. Returns `false` when a wave is already running.
    pub(crate) fn begin_next(&mut self) -> bool {
        if self.active {
            return false;
        }

        let number = self.number.saturating_add(1);
        let interval_ms = self
            .tuning
            .base_interval_ms
            .saturating_sub(self.tuning.interval_step_ms.saturating_mul(u64::from(number)))
            .max(self.tuning.min_interval_ms);

        self.active = true;
        self.number = number;
        self.enemies_to_spawn = self
            .tuning
            .base_enemies
            .saturating_add(number.saturating_mul(self.tuning.enemies_per_wave));
        self.enemies_spawned = 0;
        self.spawn_interval = Duration::from_millis(interval_ms);
        true
    }

    pub(crate) fn quota_remaining(&self) -> bool {
        self.active && self.enemies_spawned < self.enemies_to_spawn
    }

    pub(crate) fn record_spawn(&mut self) {
        self.enemies_spawned = self.enemies_spawned.saturating_add(1);
    }

    /// Ends the wave when the quota is exhausted and no hostile remains.
    /// Returns `true` on the transition to inactive.
    pub(crate) fn settle(&mut self, hostiles_alive: usize) -> bool {
        if self.active && self.enemies_spawned >= self.enemies_to_spawn && hostiles_alive == 0 {
            self.active = false;
            return true;
        }
        false
    }

    pub(crate) fn hostile_stats(&self) -> HostileStats {
        let number = self.number as f32;
        HostileStats {
            hp: self.tuning.base_hp + number * self.tuning.hp_per_wave,
            speed: (self.tuning.base_speed + number * self.tuning.speed_per_wave)
                .min(self.tuning.max_speed),
            reward: self.tuning.base_reward.saturating_add(self.number / 2),
            siege_damage: self.tuning.siege_damage + number * self.tuning.siege_damage_per_wave,
        }
    }

    pub(crate) fn snapshot(&self) -> WaveSnapshot {
        WaveSnapshot {
            active: self.active,
            number: self.number,
            enemies_to_spawn: self.enemies_to_spawn,
            enemies_spawned: self.enemies_spawned,
            spawn_interval: self.spawn_interval,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_next_scales_quota_and_interval() {
        let mut wave = Wave::new(WaveTuning::default());
        assert!(wave.begin_next());

        let snapshot = wave.snapshot();
        assert!(snapshot.active);
        assert_eq!(snapshot.number, 1);
        assert_eq!(snapshot.enemies_to_spawn, 8);
        assert_eq!(snapshot.spawn_interval, Duration::from_millis(860));
    }

    #[test]
    fn begin_next_is_noop_while_active() {
        let mut wave = Wave::new(WaveTuning::default());
        assert!(wave.begin_next());
        assert!(!wave.begin_next());
        assert_eq!(wave.number(), 1);
    }

    #[test]
    fn interval_never_drops_below_floor() {
        let mut wave = Wave::new(WaveTuning::default());
        for _ in 0..40 {
            assert!(wave.begin_next());
            wave.enemies_spawned = wave.enemies_to_spawn;
            assert!(wave.settle(0));
        }
        assert_eq!(wave.snapshot().spawn_interval, Duration::from_millis(220));
    }

    #[test]
    fn settle_waits_for_quota_and_survivors() {
        let mut wave = Wave::new(WaveTuning::default());
        assert!(wave.begin_next());
        assert!(!wave.settle(0), "quota not yet spawned");

        for _ in 0..wave.enemies_to_spawn() {
            wave.record_spawn();
        }
        assert!(!wave.quota_remaining());
        assert!(!wave.settle(2), "hostiles still alive");
        assert!(wave.settle(0));
        assert!(!wave.snapshot().active);
    }

    #[test]
    fn later_waves_move_faster() {
        let mut wave = Wave::new(WaveTuning::default());
        assert!(wave.begin_next());
        let first = wave.hostile_stats();
        wave.enemies_spawned = wave.enemies_to_spawn;
        assert!(wave.settle(0));
        assert!(wave.begin_next());
        let second = wave.hostile_stats();

        assert!(second.speed > first.speed);
        assert!(second.hp > first.hp);
    }
}
