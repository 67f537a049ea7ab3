//! Simulation module
//!
//! All gameplay logic lives here. No rendering, no platform calls:
//! - Grid lookups are total (outside the map is a wall)
//! - Randomness only from the seeded RNG in `GameState`
//! - The tick is the only writer of `GameState`

pub mod grid;
pub mod guard;
pub mod raycast;
pub mod state;
pub mod tick;

pub use grid::{GridMap, LEVEL_COUNT, Tile};
pub use guard::GuardIntent;
pub use raycast::{RayCaster, RayHit, Rays};
pub use state::{
    GameState, Guard, LevelPhase, MovingLight, Particle, Player, PowerUp, PowerUpKind, Rgb,
    ScreenShake,
};
pub use tick::{TickEvent, TickInput, TickResult, tick};

/// Difficulty for a 0-based level index (1-3)
pub fn difficulty_for_level(level_index: usize) -> u8 {
    (level_index / 2 + 1).min(3) as u8
}
