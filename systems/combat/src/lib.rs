#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that gathers a tick's strikes into one combat resolution.
//!
//! Ready defenders strike the hostile their engagement names. Hostiles stuck
//! in a sealed lane batter the nearest completed tower of that lane for the
//! time that elapsed. Everything gathered in one tick is emitted as a single
//! [`Command::ResolveCombat`] so the world can sum damage per hostile before
//! deciding kills.

use std::time::Duration;

use lane_defence_core::{
    Assailant, Command, DefenderView, Engagement, Event, SiegeView, Strike, Structure,
};

/// Combat system that batches strikes for ready defenders and blocked hostiles.
#[derive(Debug, Default)]
pub struct Combat {
    scratch: Vec<Strike>,
}

impl Combat {
    /// Creates a new combat system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits at most one `Command::ResolveCombat` for the tick.
    pub fn handle(
        &mut self,
        events: &[Event],
        defenders: &DefenderView,
        engagements: &[Engagement],
        siege: &SiegeView,
        out: &mut Vec<Command>,
    ) {
        self.scratch.clear();

        for engagement in engagements {
            let Some(defender) = defenders.get(engagement.defender) else {
                continue;
            };
            if !defender.ready_in.is_zero() {
                continue;
            }
            self.scratch.push(Strike::Defender {
                attacker: engagement.defender,
                target: engagement.hostile,
                damage: defender.damage,
            });
        }

        let elapsed: Duration = events
            .iter()
            .filter_map(|event| match event {
                Event::TimeAdvanced { dt } => Some(*dt),
                _ => None,
            })
            .sum();
        if !elapsed.is_zero() {
            let seconds = elapsed.as_secs_f32();
            for assailant in siege.assailants() {
                if let Some(structure) = nearest_structure(siege, assailant) {
                    self.scratch.push(Strike::Siege {
                        attacker: assailant.hostile,
                        target: structure.tower,
                        damage: assailant.damage_per_second * seconds,
                    });
                }
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        out.push(Command::ResolveCombat {
            strikes: std::mem::take(&mut self.scratch),
        });
    }
}

/// Closest completed tower in the assailant's lane; ties keep the lowest
/// tower identifier.
fn nearest_structure<'a>(siege: &'a SiegeView, assailant: &Assailant) -> Option<&'a Structure> {
    let mut best: Option<(&Structure, f32)> = None;
    for structure in siege
        .structures()
        .filter(|structure| structure.lane == assailant.lane)
    {
        let distance = assailant.position.distance(structure.cell.to_point());
        match best {
            Some((_, closest)) if distance >= closest => {}
            _ => best = Some((structure, distance)),
        }
    }
    best.map(|(structure, _)| structure)
}
