//! Static tile grid
//!
//! Square, row-major, immutable for the lifetime of a session.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

/// Grid cell contents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Empty,
    /// Blocks players, enemies and bullets
    Wall,
    /// Camouflaged hole: ends the session for players, kills enemies
    Trap,
}

/// Square tile grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    size: i32,
    tiles: Vec<Tile>,
}

impl Grid {
    /// All-empty grid of side `size`
    pub fn new(size: i32) -> Self {
        let size = size.max(0);
        Self {
            size,
            tiles: vec![Tile::Empty; (size * size) as usize],
        }
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn in_bounds(&self, pos: IVec2) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.size && pos.y < self.size
    }

    /// Continuous point lies inside the grid area
    pub fn contains_point(&self, p: Vec2) -> bool {
        let size = self.size as f32;
        p.x >= 0.0 && p.y >= 0.0 && p.x < size && p.y < size
    }

    fn index(&self, pos: IVec2) -> Option<usize> {
        self.in_bounds(pos)
            .then(|| (pos.y * self.size + pos.x) as usize)
    }

    pub fn get(&self, pos: IVec2) -> Option<Tile> {
        self.index(pos).map(|i| self.tiles[i])
    }

    /// Out-of-bounds writes are ignored
    pub fn set(&mut self, pos: IVec2, tile: Tile) {
        if let Some(i) = self.index(pos) {
            self.tiles[i] = tile;
        }
    }

    /// In bounds and not a wall
    pub fn is_walkable(&self, pos: IVec2) -> bool {
        matches!(self.get(pos), Some(Tile::Empty | Tile::Trap))
    }

    pub fn is_empty(&self, pos: IVec2) -> bool {
        self.get(pos) == Some(Tile::Empty)
    }

    /// Force `center` and its 8 neighbours (where in bounds) to `Empty`
    pub fn clear_around(&mut self, center: IVec2) {
        for dy in -1..=1 {
            for dx in -1..=1 {
                self.set(center + IVec2::new(dx, dy), Tile::Empty);
            }
        }
    }

    /// Iterate all tile coordinates in row-major order
    pub fn positions(&self) -> impl Iterator<Item = IVec2> + '_ {
        (0..self.size).flat_map(move |y| (0..self.size).map(move |x| IVec2::new(x, y)))
    }

    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().filter(|&&t| t == tile).count()
    }
}

/// Tile occupied by a continuous position
#[inline]
pub fn tile_of(p: Vec2) -> IVec2 {
    p.floor().as_ivec2()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_and_walls() {
        let mut grid = Grid::new(4);
        grid.set(IVec2::new(1, 2), Tile::Wall);
        grid.set(IVec2::new(2, 2), Tile::Trap);

        assert!(grid.is_walkable(IVec2::new(0, 0)));
        assert!(!grid.is_walkable(IVec2::new(1, 2)));
        assert!(grid.is_walkable(IVec2::new(2, 2)));
        assert!(!grid.is_walkable(IVec2::new(-1, 0)));
        assert!(!grid.is_walkable(IVec2::new(0, 4)));
        assert_eq!(grid.get(IVec2::new(4, 0)), None);
    }

    #[test]
    fn test_out_of_bounds_set_ignored() {
        let mut grid = Grid::new(2);
        grid.set(IVec2::new(5, 5), Tile::Wall);
        assert_eq!(grid.count(Tile::Wall), 0);
    }

    #[test]
    fn test_clear_around_edge() {
        let mut grid = Grid::new(3);
        for pos in grid.positions().collect::<Vec<_>>() {
            grid.set(pos, Tile::Wall);
        }
        grid.clear_around(IVec2::new(0, 0));
        assert_eq!(grid.count(Tile::Empty), 4);
        assert_eq!(grid.get(IVec2::new(2, 2)), Some(Tile::Wall));
    }

    #[test]
    fn test_tile_of_floors_negative() {
        assert_eq!(tile_of(Vec2::new(2.9, 0.1)), IVec2::new(2, 0));
        assert_eq!(tile_of(Vec2::new(-0.1, 1.0)), IVec2::new(-1, 1));
    }
}
