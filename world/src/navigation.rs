//! Route planning over lane grids.
//!
//! Both strategies search the 4-connected grid and return the shortest
//! hop-count route including the start and goal cells, so callers can swap
//! them freely. "No route" is reported as `None`; a found route is never
//! empty.

use lane_defence_core::{CellCoord, GridSnapshot};
use pathfinding::prelude::{astar, bfs};
use serde::Deserialize;

/// Search algorithm used to compute routes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathStrategy {
    /// Unweighted breadth-first search.
    #[default]
    BreadthFirst,
    /// Best-first search guided by the Manhattan distance to the goal.
    AStar,
}

impl PathStrategy {
    /// Computes a route through a `width` × `height` grid, treating cells for
    /// which `is_blocked` returns `true` as impassable.
    pub(crate) fn find_path_with<F>(
        self,
        width: u32,
        height: u32,
        start: CellCoord,
        goal: CellCoord,
        is_blocked: F,
    ) -> Option<Vec<CellCoord>>
    where
        F: Fn(CellCoord) -> bool,
    {
        let inside = |cell: CellCoord| cell.column() < width && cell.row() < height;
        if !inside(start) || !inside(goal) || is_blocked(goal) {
            return None;
        }

        let is_blocked = &is_blocked;
        let successors = move |cell: &CellCoord| {
            neighbors(*cell, width, height).filter(move |neighbor| !is_blocked(*neighbor))
        };

        match self {
            Self::BreadthFirst => bfs(&start, successors, |cell| *cell == goal),
            Self::AStar => astar(
                &start,
                |cell| successors(cell).map(|neighbor| (neighbor, 1_u32)),
                |cell| cell.manhattan_distance(goal),
                |cell| *cell == goal,
            )
            .map(|(route, _)| route),
        }
    }
}

/// Computes a route across a published grid snapshot.
#[must_use]
pub fn find_path(
    strategy: PathStrategy,
    grid: &GridSnapshot,
    start: CellCoord,
    goal: CellCoord,
) -> Option<Vec<CellCoord>> {
    strategy.find_path_with(grid.columns(), grid.rows(), start, goal, |cell| {
        !grid.tile(cell).is_some_and(|tile| tile.walkable)
    })
}

/// Cardinal neighbors of `cell` in north, east, south, west order.
pub(crate) fn neighbors(
    cell: CellCoord,
    width: u32,
    height: u32,
) -> impl Iterator<Item = CellCoord> {
    let mut candidates = [None; 4];
    let mut count = 0;

    if let Some(row) = cell.row().checked_sub(1) {
        candidates[count] = Some(CellCoord::new(cell.column(), row));
        count += 1;
    }

    if let Some(column) = cell.column().checked_add(1) {
        if column < width {
            candidates[count] = Some(CellCoord::new(column, cell.row()));
            count += 1;
        }
    }

    if let Some(row) = cell.row().checked_add(1) {
        if row < height {
            candidates[count] = Some(CellCoord::new(cell.column(), row));
            count += 1;
        }
    }

    if let Some(column) = cell.column().checked_sub(1) {
        candidates[count] = Some(CellCoord::new(column, cell.row()));
        count += 1;
    }

    candidates.into_iter().take(count).flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRATEGIES: [PathStrategy; 2] = [PathStrategy::BreadthFirst, PathStrategy::AStar];

    fn assert_contiguous(route: &[CellCoord]) {
        for pair in route.windows(2) {
            assert_eq!(pair[0].manhattan_distance(pair[1]), 1, "route jumped");
        }
    }

    #[test]
    fn open_grid_route_is_shortest() {
        for strategy in STRATEGIES {
            let start = CellCoord::new(0, 0);
            let goal = CellCoord::new(3, 2);
            let route = strategy
                .find_path_with(5, 5, start, goal, |_| false)
                .expect("route exists");

            assert_eq!(route.first(), Some(&start));
            assert_eq!(route.last(), Some(&goal));
            assert_eq!(route.len(), 6);
            assert_contiguous(&route);
        }
    }

    #[test]
    fn routes_detour_around_walls() {
        let wall = |cell: CellCoord| cell.row() == 1 && cell.column() < 3;
        for strategy in STRATEGIES {
            let route = strategy
                .find_path_with(4, 3, CellCoord::new(0, 0), CellCoord::new(0, 2), wall)
                .expect("route exists");

            assert_eq!(route.len(), 9);
            assert!(route.iter().all(|cell| !wall(*cell)));
            assert_contiguous(&route);
        }
    }

    #[test]
    fn sealed_goal_reports_no_route() {
        let wall = |cell: CellCoord| cell.row() == 1;
        for strategy in STRATEGIES {
            assert!(strategy
                .find_path_with(4, 3, CellCoord::new(0, 0), CellCoord::new(2, 2), wall)
                .is_none());
        }
    }

    #[test]
    fn start_equal_to_goal_is_single_waypoint() {
        for strategy in STRATEGIES {
            let cell = CellCoord::new(1, 1);
            assert_eq!(
                strategy.find_path_with(3, 3, cell, cell, |_| false),
                Some(vec![cell])
            );
        }
    }

    #[test]
    fn neighbors_are_clipped_at_edges() {
        let corner: Vec<_> = neighbors(CellCoord::new(0, 0), 3, 3).collect();
        assert_eq!(corner, vec![CellCoord::new(1, 0), CellCoord::new(0, 1)]);

        let center: Vec<_> = neighbors(CellCoord::new(1, 1), 3, 3).collect();
        assert_eq!(
            center,
            vec![
                CellCoord::new(1, 0),
                CellCoord::new(2, 1),
                CellCoord::new(1, 2),
                CellCoord::new(0, 1),
            ]
        );
    }
}
