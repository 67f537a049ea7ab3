//! Tile grid for one level
//!
//! The grid is immutable while a level runs. Lookups are total: any cell
//! outside the rows/columns is a `Wall`, so callers never bounds-check.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::SPAWN_TILE;
use crate::error::{Error, Result};
use crate::world_to_tile;

/// Tile classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    /// Sunlit floor: passable, damages the player, exposes it to guards
    Light,
    /// Shaded floor: passable, heals, hides the player
    Shadow,
    /// Exit of the level
    Goal,
    /// Impassable; everything outside the map
    Wall,
}

impl Tile {
    /// Decode a level file digit
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Tile::Light),
            1 => Some(Tile::Shadow),
            2 => Some(Tile::Goal),
            3 => Some(Tile::Wall),
            _ => None,
        }
    }

    /// Can the player stand here?
    pub fn is_passable(self) -> bool {
        !matches!(self, Tile::Wall)
    }

    /// Does a ray keep marching through this tile?
    pub fn is_transparent(self) -> bool {
        matches!(self, Tile::Shadow)
    }
}

const LEVEL_1: &[&[u8]] = &[
    &[1, 1, 1, 1, 0],
    &[0, 1, 1, 1, 2],
    &[0, 0, 1, 1, 0],
];

const LEVEL_2: &[&[u8]] = &[
    &[1, 1, 1, 1, 1, 2],
    &[0, 0, 1, 1, 1, 0],
    &[0, 0, 1, 0, 0, 0],
];

const LEVEL_3: &[&[u8]] = &[
    &[1, 1, 1, 1, 1, 1, 1, 0, 0, 0],
    &[0, 0, 1, 1, 1, 1, 1, 1, 1, 0],
    &[0, 0, 1, 0, 0, 0, 1, 0, 0, 0],
    &[1, 1, 1, 0, 1, 1, 1, 1, 1, 2],
    &[1, 0, 0, 0, 1, 0, 0, 0, 1, 0],
];

const LEVEL_4: &[&[u8]] = &[
    &[1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 0],
    &[0, 0, 1, 0, 0, 0, 1, 0, 0, 1, 0, 0, 0, 1, 0],
    &[0, 1, 1, 1, 1, 1, 1, 1, 0, 1, 1, 1, 1, 1, 0],
    &[0, 1, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 1, 0],
    &[0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0],
    &[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    &[1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0],
    &[1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    &[1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 2],
];

const LEVEL_5: &[&[u8]] = &[
    &[1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    &[1, 1, 1, 1, 0, 0, 1, 0, 0, 1, 0, 0, 1, 0, 0, 1, 0, 0, 1, 0],
    &[1, 1, 1, 1, 1, 1, 1, 1, 0, 1, 1, 1, 1, 1, 0, 1, 1, 1, 1, 0],
    &[0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 1, 0],
    &[0, 1, 1, 1, 0, 1, 1, 1, 1, 1, 0, 1, 1, 1, 0, 1, 1, 1, 1, 0],
    &[0, 1, 0, 0, 0, 1, 0, 0, 0, 1, 0, 1, 0, 0, 0, 0, 0, 1, 0, 0],
    &[0, 1, 1, 1, 1, 1, 1, 1, 0, 1, 1, 1, 1, 1, 1, 1, 0, 1, 1, 1],
    &[0, 0, 0, 0, 1, 0, 0, 1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0],
    &[1, 1, 1, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0],
    &[1, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 1, 0, 0],
    &[1, 1, 1, 1, 1, 0, 1, 1, 1, 1, 0, 1, 1, 1, 1, 1, 1, 1, 0, 2],
];

/// Built-in levels, easiest first
const LEVELS: [&[&[u8]]; 5] = [LEVEL_1, LEVEL_2, LEVEL_3, LEVEL_4, LEVEL_5];

/// Number of built-in levels
pub const LEVEL_COUNT: usize = LEVELS.len();

/// Static tile matrix for one level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridMap {
    rows: Vec<Vec<Tile>>,
    width: usize,
    goal: (i32, i32),
}

impl GridMap {
    /// Load a built-in level.
    ///
    /// # Panics
    /// If `index >= LEVEL_COUNT`. Callers check for the last level before
    /// asking for the next one.
    pub fn load(index: usize) -> Self {
        Self::from_trusted(LEVELS[index])
    }

    /// Load a built-in level, `None` past the last one
    pub fn try_load(index: usize) -> Option<Self> {
        LEVELS.get(index).map(|codes| Self::from_trusted(codes))
    }

    /// Build a map from digit rows (0 light, 1 shadow, 2 goal, 3 wall).
    ///
    /// Rejects unknown codes, maps without exactly one goal, and maps whose
    /// spawn cell is not a passable non-goal tile.
    pub fn parse(codes: &[&[u8]]) -> Result<Self> {
        if codes.is_empty() || codes.iter().all(|row| row.is_empty()) {
            return Err(Error::InvalidMap {
                message: "map has no tiles".into(),
            });
        }

        let mut rows = Vec::with_capacity(codes.len());
        for (y, row) in codes.iter().enumerate() {
            let mut tiles = Vec::with_capacity(row.len());
            for (x, &code) in row.iter().enumerate() {
                let tile = Tile::from_code(code).ok_or_else(|| Error::InvalidMap {
                    message: format!("unknown tile code {code} at ({x}, {y})"),
                })?;
                tiles.push(tile);
            }
            rows.push(tiles);
        }

        let goals: Vec<(i32, i32)> = rows
            .iter()
            .enumerate()
            .flat_map(|(y, row)| {
                row.iter()
                    .enumerate()
                    .filter(|(_, t)| **t == Tile::Goal)
                    .map(move |(x, _)| (x as i32, y as i32))
            })
            .collect();
        if goals.len() != 1 {
            return Err(Error::InvalidMap {
                message: format!("expected exactly one goal, found {}", goals.len()),
            });
        }

        let map = Self::from_rows(rows, goals[0]);
        let spawn = map.tile_at(SPAWN_TILE.0, SPAWN_TILE.1);
        if !spawn.is_passable() || spawn == Tile::Goal {
            return Err(Error::InvalidMap {
                message: format!("spawn tile {SPAWN_TILE:?} is {spawn:?}"),
            });
        }
        Ok(map)
    }

    /// Built-in tables are known to hold valid codes and one goal
    fn from_trusted(codes: &[&[u8]]) -> Self {
        let mut goal = (0, 0);
        let rows = codes
            .iter()
            .enumerate()
            .map(|(y, row)| {
                row.iter()
                    .enumerate()
                    .map(|(x, &code)| {
                        let tile = Tile::from_code(code).unwrap_or(Tile::Wall);
                        if tile == Tile::Goal {
                            goal = (x as i32, y as i32);
                        }
                        tile
                    })
                    .collect()
            })
            .collect();
        Self::from_rows(rows, goal)
    }

    fn from_rows(rows: Vec<Vec<Tile>>, goal: (i32, i32)) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        Self { rows, width, goal }
    }

    /// Tile at a grid cell; `Wall` outside the map
    #[inline]
    pub fn tile_at(&self, col: i32, row: i32) -> Tile {
        if col < 0 || row < 0 {
            return Tile::Wall;
        }
        self.rows
            .get(row as usize)
            .and_then(|r| r.get(col as usize))
            .copied()
            .unwrap_or(Tile::Wall)
    }

    /// Tile under a world-space position
    #[inline]
    pub fn tile_at_world(&self, pos: Vec2, tile_size: f32) -> Tile {
        let (col, row) = world_to_tile(pos, tile_size);
        self.tile_at(col, row)
    }

    /// Columns in the widest row
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Goal cell (column, row)
    pub fn goal(&self) -> (i32, i32) {
        self.goal
    }

    /// Raw rows, for minimaps
    pub fn rows(&self) -> &[Vec<Tile>] {
        &self.rows
    }

    /// Passable non-goal cells in row-major order
    pub fn open_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, t)| matches!(t, Tile::Light | Tile::Shadow))
                .map(move |(x, _)| (x as i32, y as i32))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_is_wall() {
        let map = GridMap::load(0);
        assert_eq!(map.tile_at(-1, 0), Tile::Wall);
        assert_eq!(map.tile_at(0, -1), Tile::Wall);
        assert_eq!(map.tile_at(5, 0), Tile::Wall);
        assert_eq!(map.tile_at(0, 3), Tile::Wall);
    }

    #[test]
    fn test_level_one_layout() {
        let map = GridMap::load(0);
        assert_eq!(map.width(), 5);
        assert_eq!(map.height(), 3);
        assert_eq!(map.tile_at(2, 1), Tile::Shadow);
        assert_eq!(map.tile_at(4, 0), Tile::Light);
        assert_eq!(map.tile_at(4, 1), Tile::Goal);
        assert_eq!(map.goal(), (4, 1));
    }

    #[test]
    fn test_builtin_levels_hold_invariants() {
        for index in 0..LEVEL_COUNT {
            let map = GridMap::load(index);
            let goals = map
                .rows()
                .iter()
                .flatten()
                .filter(|t| **t == Tile::Goal)
                .count();
            assert_eq!(goals, 1, "level {index}");
            let spawn = map.tile_at(SPAWN_TILE.0, SPAWN_TILE.1);
            assert!(spawn.is_passable() && spawn != Tile::Goal, "level {index}");
        }
    }

    #[test]
    fn test_levels_grow() {
        let sizes: Vec<usize> = (0..LEVEL_COUNT)
            .map(|i| {
                let m = GridMap::load(i);
                m.width() * m.height()
            })
            .collect();
        assert!(sizes.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_try_load_past_end() {
        assert!(GridMap::try_load(LEVEL_COUNT - 1).is_some());
        assert!(GridMap::try_load(LEVEL_COUNT).is_none());
    }

    #[test]
    fn test_parse_rejects_bad_maps() {
        assert!(GridMap::parse(&[]).is_err());
        assert!(GridMap::parse(&[&[1, 1, 1], &[1, 1, 9]]).is_err());
        // no goal
        assert!(GridMap::parse(&[&[1, 1, 1], &[1, 1, 1]]).is_err());
        // two goals
        assert!(GridMap::parse(&[&[2, 1, 1], &[1, 1, 2]]).is_err());
        // spawn on a wall
        assert!(GridMap::parse(&[&[1, 1, 1, 2], &[1, 1, 3, 1]]).is_err());
    }

    #[test]
    fn test_parse_explicit_wall() {
        let map = GridMap::parse(&[&[3, 3, 3, 3], &[1, 1, 1, 2]]).unwrap();
        assert_eq!(map.tile_at(0, 0), Tile::Wall);
        assert!(!map.tile_at(0, 0).is_passable());
        assert_eq!(map.goal(), (3, 1));
    }

    #[test]
    fn test_tile_at_world() {
        let map = GridMap::load(0);
        assert_eq!(map.tile_at_world(Vec2::new(160.0, 96.0), 64.0), Tile::Shadow);
        assert_eq!(map.tile_at_world(Vec2::new(-0.1, 96.0), 64.0), Tile::Wall);
    }

    #[test]
    fn test_open_cells_exclude_goal() {
        let map = GridMap::load(0);
        assert!(map.open_cells().all(|(x, y)| map.tile_at(x, y) != Tile::Goal));
        assert_eq!(map.open_cells().count(), 14);
    }
}
