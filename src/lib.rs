//! Shadowbound - a first-person maze game where the light burns
//!
//! Core modules:
//! - `sim`: Simulation (grid map, ray caster, entity state, tick, guard AI)
//! - `campaign`: Level orchestration around the simulation step
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences
//! - `highscores` / `achievements` / `persistence`: Progress records
//! - `audio`: Fire-and-forget sound cues

pub mod achievements;
pub mod audio;
pub mod campaign;
pub mod error;
pub mod highscores;
pub mod persistence;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use campaign::{Campaign, CampaignPhase, RunSummary};
pub use error::{Error, Result};
pub use highscores::Leaderboard;
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// World units per tile edge
    pub const TILE_SIZE: f32 = 64.0;
    /// Reference frame length the per-frame constants were tuned against (60 Hz)
    pub const FRAME_MS: f32 = 1000.0 / 60.0;
    /// Largest delta a single frame may feed into the simulation
    pub const MAX_FRAME_DELTA_MS: f32 = 100.0;

    /// Horizontal field of view (60 degrees)
    pub const FOV: f32 = std::f32::consts::FRAC_PI_3;
    /// Rays per cast, one per screen column strip
    pub const RAYS: usize = 260;
    /// Fixed march step
    pub const RAY_STEP: f32 = 5.0;
    /// March cap
    pub const MAX_RAY_DISTANCE: f32 = 900.0;
    /// Wall height = PROJECTION / distance
    pub const PROJECTION: f32 = 50_000.0;
    /// Brightness reaches zero at this distance
    pub const DEPTH_FALLOFF: f32 = 700.0;

    /// Maximum health for the player
    pub const MAX_HEALTH: f32 = 100.0;
    /// Spawn tile (column, row)
    pub const SPAWN_TILE: (i32, i32) = (2, 1);

    /// Default radius of the player's light mask
    pub const DEFAULT_LIGHT_RADIUS: f32 = 220.0;

    /// Maximum live particles
    pub const MAX_PARTICLES: usize = 512;
}

/// Normalized angle to [-π, π] (rounding may land exactly on π)
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    (angle + PI).rem_euclid(TAU) - PI
}

/// Unit vector for a heading
#[inline]
pub fn heading_vector(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

/// Map a world position to its (column, row) tile index
#[inline]
pub fn world_to_tile(pos: Vec2, tile_size: f32) -> (i32, i32) {
    (
        (pos.x / tile_size).floor() as i32,
        (pos.y / tile_size).floor() as i32,
    )
}

/// World-space centre of a tile
#[inline]
pub fn tile_center(col: i32, row: i32, tile_size: f32) -> Vec2 {
    Vec2::new((col as f32 + 0.5) * tile_size, (row as f32 + 0.5) * tile_size)
}
