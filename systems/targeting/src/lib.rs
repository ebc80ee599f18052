#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that pairs every defender with the nearest hostile in range.

use lane_defence_core::{CellPoint, DefenderView, Engagement, HostileId, HostileView, LaneId};

/// Targeting system that reuses scratch buffers to avoid repeated allocations.
#[derive(Debug, Default)]
pub struct Targeting {
    hostile_workspace: Vec<Candidate>,
}

impl Targeting {
    /// Creates a new targeting system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes engagements for the provided views.
    ///
    /// The output buffer is cleared before populating it. Defenders only
    /// consider hostiles of their own lane; the nearest hostile within range
    /// wins and ties keep the hostile with the lowest identifier.
    pub fn handle(
        &mut self,
        defenders: &DefenderView,
        hostiles: &HostileView,
        out: &mut Vec<Engagement>,
    ) {
        out.clear();

        self.prepare_hostile_workspace(hostiles);
        if self.hostile_workspace.is_empty() {
            return;
        }

        for defender in defenders.iter() {
            let best = nearest_in_range(
                &self.hostile_workspace,
                defender.lane,
                defender.position,
                defender.range,
            );
            if let Some((hostile, distance)) = best {
                out.push(Engagement {
                    defender: defender.id,
                    hostile,
                    distance,
                });
            }
        }
    }

    fn prepare_hostile_workspace(&mut self, hostiles: &HostileView) {
        self.hostile_workspace.clear();
        let (lower, _) = hostiles.iter().size_hint();
        self.hostile_workspace.reserve(lower);

        self.hostile_workspace
            .extend(hostiles.iter().filter(|hostile| hostile.hp > 0.0).map(|hostile| {
                Candidate {
                    id: hostile.id,
                    lane: hostile.lane,
                    position: hostile.position,
                }
            }));
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Candidate {
    id: HostileId,
    lane: LaneId,
    position: CellPoint,
}

fn nearest_in_range(
    candidates: &[Candidate],
    lane: LaneId,
    origin: CellPoint,
    range: f32,
) -> Option<(HostileId, f32)> {
    let mut best: Option<(HostileId, f32)> = None;
    for candidate in candidates.iter().filter(|candidate| candidate.lane == lane) {
        let distance = origin.distance(candidate.position);
        if distance > range {
            continue;
        }
        match best {
            Some((_, closest)) if distance >= closest => {}
            _ => best = Some((candidate.id, distance)),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: u32, lane: u32, column: f32, row: f32) -> Candidate {
        Candidate {
            id: HostileId::new(id),
            lane: LaneId::new(lane),
            position: CellPoint::new(column, row),
        }
    }

    #[test]
    fn equidistant_hostiles_keep_lowest_identifier() {
        let candidates = [candidate(1, 0, 2.0, 0.0), candidate(2, 0, 0.0, 2.0)];
        let best = nearest_in_range(&candidates, LaneId::new(0), CellPoint::new(0.0, 0.0), 3.0);
        assert_eq!(best, Some((HostileId::new(1), 2.0)));
    }

    #[test]
    fn range_boundary_is_inclusive() {
        let candidates = [candidate(4, 0, 3.0, 0.0)];
        let origin = CellPoint::new(0.0, 0.0);
        assert!(nearest_in_range(&candidates, LaneId::new(0), origin, 3.0).is_some());
        assert!(nearest_in_range(&candidates, LaneId::new(0), origin, 2.9).is_none());
    }

    #[test]
    fn other_lanes_are_ignored() {
        let candidates = [candidate(0, 1, 0.5, 0.0)];
        let best = nearest_in_range(&candidates, LaneId::new(0), CellPoint::new(0.0, 0.0), 5.0);
        assert_eq!(best, None);
    }
}
