#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for the wave's spawn cadence.

use std::time::Duration;

use lane_defence_core::{Command, Event, LaneId, WaveSnapshot};

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Debug)]
pub struct Config {
    lanes: Vec<LaneId>,
}

impl Config {
    /// Creates a new configuration cycling through the provided lanes.
    #[must_use]
    pub fn new(lanes: Vec<LaneId>) -> Self {
        Self { lanes }
    }
}

/// Pure system that emits spawn commands while a wave still owes hostiles.
#[derive(Debug)]
pub struct Spawning {
    lanes: Vec<LaneId>,
    accumulator: Duration,
    cursor: usize,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            lanes: config.lanes,
            accumulator: Duration::ZERO,
            cursor: 0,
        }
    }

    /// Consumes events and the wave snapshot to emit spawn commands.
    ///
    /// Elapsed time accumulates into a spawn timer that is decremented by the
    /// wave's interval per spawn, so the overflow carries into the next tick
    /// and several hostiles may spawn at once.
    pub fn handle(&mut self, events: &[Event], wave: &WaveSnapshot, out: &mut Vec<Command>) {
        self.observe(events);
        let accumulated: Duration = events
            .iter()
            .filter_map(|event| match event {
                Event::TimeAdvanced { dt } => Some(*dt),
                _ => None,
            })
            .sum();

        let mut remaining = wave.enemies_to_spawn.saturating_sub(wave.enemies_spawned);
        if !wave.active || remaining == 0 {
            self.accumulator = Duration::ZERO;
            return;
        }
        if wave.spawn_interval.is_zero() || self.lanes.is_empty() {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(accumulated);
        while self.accumulator >= wave.spawn_interval && remaining > 0 {
            self.accumulator -= wave.spawn_interval;
            remaining -= 1;
            let lane = self.next_lane();
            out.push(Command::SpawnHostile { lane });
        }
    }

    /// Restarts the spawn timer and lane rotation when a wave starts or the
    /// world resets.
    pub fn observe(&mut self, events: &[Event]) {
        let restart = events.iter().any(|event| {
            matches!(
                event,
                Event::WaveStarted { .. } | Event::WorldReset { .. }
            )
        });
        if restart {
            self.accumulator = Duration::ZERO;
            self.cursor = 0;
        }
    }

    fn next_lane(&mut self) -> LaneId {
        let lane = self.lanes[self.cursor % self.lanes.len()];
        self.cursor = (self.cursor + 1) % self.lanes.len();
        lane
    }
}
