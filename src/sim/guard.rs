//! Guard AI - binary light-gated pursuit
//!
//! A guard either stands still or walks straight at the player. It pursues
//! only while the player is on a Light tile AND inside its detection range.
//! No memory of the last sighting, no prediction, no pathfinding; guards
//! ignore the tile grid when moving.

use glam::Vec2;
use rand::Rng;

use super::grid::Tile;
use super::state::{GameState, Guard};
use crate::heading_vector;

/// What a guard does this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GuardIntent {
    Idle,
    /// Turn to this heading and advance
    Pursue { heading: f32 },
}

/// Decide between idling and pursuit
pub fn decide(guard: &Guard, player_pos: Vec2, player_tile: Tile, tile_size: f32) -> GuardIntent {
    let to_player = player_pos - guard.pos;
    let in_range = to_player.length() < guard.range * tile_size;
    if in_range && player_tile == Tile::Light {
        GuardIntent::Pursue {
            heading: to_player.y.atan2(to_player.x),
        }
    } else {
        GuardIntent::Idle
    }
}

/// Apply the decision for one tick (`frames` = delta in reference frames)
pub fn advance(guard: &mut Guard, intent: GuardIntent, frames: f32) {
    if let GuardIntent::Pursue { heading } = intent {
        guard.angle = heading;
        guard.pos += heading_vector(heading) * guard.speed * frames;
    }
}

/// Spawn `1 + difficulty` guards at random points inside the grid bounds
pub fn spawn_guards(state: &mut GameState) {
    let count = 1 + state.difficulty as usize;
    let tile_size = state.tuning.tile_size;
    let extent = Vec2::new(
        state.grid.width() as f32 * tile_size,
        state.grid.height() as f32 * tile_size,
    );
    let speed = state.tuning.guard_speed(state.difficulty);

    for _ in 0..count {
        let id = state.next_entity_id();
        let pos = Vec2::new(
            state.rng.random::<f32>() * extent.x,
            state.rng.random::<f32>() * extent.y,
        );
        let angle = state.rng.random::<f32>() * std::f32::consts::TAU;
        state.guards.push(Guard {
            id,
            pos,
            angle,
            health: state.tuning.guard_health,
            speed,
            range: state.tuning.guard_range_tiles,
            strike_cooldown_ms: 0.0,
        });
    }
    log::debug!(
        "Spawned {} guards (difficulty {}, speed {:.2})",
        count,
        state.difficulty,
        speed
    );
}
