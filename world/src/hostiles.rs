//! Hostile records walking lane routes.

use lane_defence_core::{CellCoord, CellPoint, HostileId, HostileSnapshot, LaneId};

use crate::wave::HostileStats;

/// Hostile stored inside a lane.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Hostile {
    pub(crate) id: HostileId,
    pub(crate) position: CellPoint,
    pub(crate) hp: f32,
    pub(crate) max_hp: f32,
    pub(crate) speed: f32,
    pub(crate) reward: u32,
    /// Siege damage per second against blocking structures.
    pub(crate) siege_damage: f32,
    pub(crate) next_waypoint: usize,
}

impl Hostile {
    pub(crate) fn spawn(id: HostileId, cell: CellCoord, stats: HostileStats) -> Self {
        Self {
            id,
            position: cell.to_point(),
            hp: stats.hp,
            max_hp: stats.hp,
            speed: stats.speed,
            reward: stats.reward,
            siege_damage: stats.siege_damage,
            next_waypoint: 0,
        }
    }

    /// Points the hostile at the far end of the `route` segment closest to
    /// where it stands, so it never turns back toward the spawn. Ties prefer
    /// the segment further along the route.
    pub(crate) fn reanchor(&mut self, route: &[CellCoord]) {
        let mut best: Option<(usize, f32)> = None;
        for (index, segment) in route.windows(2).enumerate() {
            let distance = distance_to_segment(self.position, segment[0], segment[1]);
            match best {
                Some((_, closest)) if distance > closest => {}
                _ => best = Some((index + 1, distance)),
            }
        }
        self.next_waypoint = best.map_or(0, |(index, _)| index);
    }

    pub(crate) fn snapshot(&self, lane: LaneId) -> HostileSnapshot {
        HostileSnapshot {
            id: self.id,
            lane,
            position: self.position,
            hp: self.hp,
            max_hp: self.max_hp,
            speed: self.speed,
            reward: self.reward,
            next_waypoint: self.next_waypoint,
        }
    }
}

/// Distance from `point` to the closest point of the segment `from..to`.
fn distance_to_segment(point: CellPoint, from: CellCoord, to: CellCoord) -> f32 {
    let (start, end) = (from.to_point(), to.to_point());
    let (dx, dy) = (end.column() - start.column(), end.row() - start.row());
    let length_squared = dx * dx + dy * dy;
    if length_squared <= f32::EPSILON {
        return point.distance(start);
    }
    let along = ((point.column() - start.column()) * dx + (point.row() - start.row()) * dy)
        / length_squared;
    let t = along.clamp(0.0, 1.0);
    point.distance(CellPoint::new(start.column() + t * dx, start.row() + t * dy))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hostile_at(column: f32, row: f32) -> Hostile {
        let mut hostile = Hostile::spawn(
            HostileId::new(0),
            CellCoord::new(0, 0),
            HostileStats {
                hp: 40.0,
                speed: 1.0,
                reward: 5,
                siege_damage: 8.0,
            },
        );
        hostile.position = CellPoint::new(column, row);
        hostile
    }

    #[test]
    fn reanchor_targets_the_end_of_the_nearest_segment() {
        let route = [
            CellCoord::new(0, 0),
            CellCoord::new(0, 1),
            CellCoord::new(1, 1),
            CellCoord::new(2, 1),
        ];
        let mut hostile = hostile_at(1.8, 1.2);
        hostile.reanchor(&route);
        assert_eq!(hostile.next_waypoint, 3);
        assert_eq!(hostile.position, CellPoint::new(1.8, 1.2));
    }

    #[test]
    fn reanchor_never_points_behind_the_hostile() {
        let route = [
            CellCoord::new(3, 0),
            CellCoord::new(4, 0),
            CellCoord::new(4, 1),
            CellCoord::new(4, 2),
            CellCoord::new(4, 3),
            CellCoord::new(4, 4),
        ];
        let mut hostile = hostile_at(3.0, 1.4);
        hostile.reanchor(&route);
        assert_eq!(hostile.next_waypoint, 3);
        assert!(route[hostile.next_waypoint].to_point().row() >= 1.4);
    }

    #[test]
    fn reanchor_ties_prefer_the_later_segment() {
        let route = [CellCoord::new(0, 0), CellCoord::new(0, 1), CellCoord::new(0, 2)];
        let mut hostile = hostile_at(0.0, 1.0);
        hostile.reanchor(&route);
        assert_eq!(hostile.next_waypoint, 2);
    }

    #[test]
    fn single_waypoint_route_anchors_at_its_start() {
        let mut hostile = hostile_at(0.4, 0.0);
        hostile.reanchor(&[CellCoord::new(0, 0)]);
        assert_eq!(hostile.next_waypoint, 0);
    }
}
