//! Dense per-lane tile grid tracking walkability and tower occupancy.

use lane_defence_core::{CellCoord, GridSnapshot, TileSnapshot, TowerId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Tile {
    walkable: bool,
    occupant: Option<TowerId>,
}

impl Tile {
    const OPEN: Self = Self {
        walkable: true,
        occupant: None,
    };
}

/// Square occupancy grid owned by a lane.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct TileGrid {
    columns: u32,
    rows: u32,
    tiles: Vec<Tile>,
}

impl TileGrid {
    pub(crate) fn new(columns: u32, rows: u32) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            columns,
            rows,
            tiles: vec![Tile::OPEN; capacity],
        }
    }

    pub(crate) fn columns(&self) -> u32 {
        self.columns
    }

    pub(crate) fn rows(&self) -> u32 {
        self.rows
    }

    pub(crate) fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Reports whether hostiles may walk across the cell. Cells outside the
    /// grid are never walkable.
    pub(crate) fn is_walkable(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .and_then(|index| self.tiles.get(index))
            .is_some_and(|tile| tile.walkable)
    }

    pub(crate) fn occupant(&self, cell: CellCoord) -> Option<TowerId> {
        self.index(cell)
            .and_then(|index| self.tiles.get(index))
            .and_then(|tile| tile.occupant)
    }

    /// Marks the cell as blocked by the provided tower.
    pub(crate) fn occupy(&mut self, cell: CellCoord, tower: TowerId) {
        if let Some(tile) = self.tile_mut(cell) {
            tile.walkable = false;
            tile.occupant = Some(tower);
        }
    }

    /// Frees the cell so hostiles may walk across it again.
    pub(crate) fn vacate(&mut self, cell: CellCoord) {
        if let Some(tile) = self.tile_mut(cell) {
            *tile = Tile::OPEN;
        }
    }

    pub(crate) fn snapshot(&self) -> GridSnapshot {
        let tiles = self
            .tiles
            .iter()
            .map(|tile| TileSnapshot {
                walkable: tile.walkable,
                occupant: tile.occupant,
            })
            .collect();
        GridSnapshot::new(self.columns, self.rows, tiles)
    }

    fn tile_mut(&mut self, cell: CellCoord) -> Option<&mut Tile> {
        let index = self.index(cell)?;
        self.tiles.get_mut(index)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if self.contains(cell) {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn occupy_and_vacate_toggle_walkability() {
        let mut grid = TileGrid::new(4, 4);
        let cell = CellCoord::new(2, 1);

        grid.occupy(cell, TowerId::new(5));
        assert!(!grid.is_walkable(cell));
        assert_eq!(grid.occupant(cell), Some(TowerId::new(5)));

        grid.vacate(cell);
        assert!(grid.is_walkable(cell));
        assert_eq!(grid.occupant(cell), None);
    }

    #[test]
    fn cells_outside_the_grid_are_not_walkable() {
        let grid = TileGrid::new(3, 3);
        assert!(!grid.is_walkable(CellCoord::new(3, 0)));
        assert!(!grid.contains(CellCoord::new(0, 3)));
    }
}
