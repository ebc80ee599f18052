#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system that integrates travel along routes.
//!
//! Every tick each mover receives a distance budget of `speed × dt`. The
//! budget is consumed segment by segment along the mover's route, carrying
//! whatever remains into the next segment, so fast movers may pass several
//! waypoints in a single tick but never overshoot the last one.

use std::time::Duration;

use lane_defence_core::{CellPoint, Command, Event, MotionView, MoverSnapshot};

/// Pure system that reacts to elapsed time and emits movement commands.
#[derive(Debug, Default)]
pub struct Movement;

impl Movement {
    /// Creates a new movement system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Consumes world events and the motion view to emit `Advance` commands.
    pub fn handle(&self, events: &[Event], motion: &MotionView, out: &mut Vec<Command>) {
        let dt: Duration = events
            .iter()
            .filter_map(|event| match event {
                Event::TimeAdvanced { dt } => Some(*dt),
                _ => None,
            })
            .sum();
        if dt.is_zero() {
            return;
        }

        let seconds = dt.as_secs_f32();
        for snapshot in motion.iter() {
            let budget = (snapshot.speed * seconds).max(0.0);
            let (position, next_waypoint) = integrate(snapshot, budget);
            if position == snapshot.position && next_waypoint == snapshot.next_waypoint {
                continue;
            }
            out.push(Command::Advance {
                mover: snapshot.mover,
                position,
                next_waypoint,
            });
        }
    }
}

/// Walks `budget` tiles along the snapshot's route. Returns the position
/// reached and the index of the waypoint still ahead; an index equal to the
/// route length means the final waypoint was reached.
fn integrate(snapshot: &MoverSnapshot, mut budget: f32) -> (CellPoint, usize) {
    let mut position = snapshot.position;
    let mut next_waypoint = snapshot.next_waypoint;

    while let Some(waypoint) = snapshot.route.get(next_waypoint) {
        let target = waypoint.to_point();
        let distance = position.distance(target);
        if distance > budget {
            position = position.toward(target, budget);
            break;
        }
        position = target;
        budget -= distance;
        next_waypoint += 1;
    }

    (position, next_waypoint)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use lane_defence_core::{CellCoord, HostileId, Mover};

    use super::*;

    fn straight_route(length: u32) -> Arc<[CellCoord]> {
        (0..length).map(|row| CellCoord::new(0, row)).collect()
    }

    fn snapshot(position: CellPoint, next_waypoint: usize, speed: f32) -> MoverSnapshot {
        MoverSnapshot {
            mover: Mover::Hostile(HostileId::new(0)),
            position,
            speed,
            next_waypoint,
            route: straight_route(4),
        }
    }

    #[test]
    fn budget_carries_across_waypoints() {
        let mover = snapshot(CellPoint::new(0.0, 0.0), 0, 1.0);
        let (position, next) = integrate(&mover, 1.5);
        assert_eq!(next, 2);
        assert!((position.row() - 1.5).abs() < 1e-5);
    }

    #[test]
    fn final_waypoint_is_never_overshot() {
        let mover = snapshot(CellPoint::new(0.0, 2.5), 3, 1.0);
        let (position, next) = integrate(&mover, 10.0);
        assert_eq!(next, 4);
        assert_eq!(position, CellPoint::new(0.0, 3.0));
    }

    #[test]
    fn zero_length_segments_are_consumed() {
        let mover = snapshot(CellPoint::new(0.0, 0.0), 0, 1.0);
        let (position, next) = integrate(&mover, 0.25);
        assert_eq!(next, 1);
        assert!((position.row() - 0.25).abs() < 1e-5);
    }
}
