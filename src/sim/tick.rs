//! Simulation tick
//!
//! Advances one level by a frame delta. Per-frame constants in `Tuning` are
//! scaled by `delta / FRAME_MS`; periodic effects (burns, heals, guard
//! strikes) run on millisecond accumulators so their cadence does not
//! depend on the display rate.
//!
//! Processing order:
//!   1. Effective speed
//!   2. Candidate position from intent
//!   3. Collision (whole move accepted or rejected)
//!   4. Vertical kinematics
//!   5. Buff decay
//!   6. Power-up pickups
//!   7. Guards
//!   8. Ambient lights
//!   9. Particles
//!  10. Tile effects
//!  11. Terminal checks

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;

use super::grid::Tile;
use super::guard;
use super::state::{GameState, LevelPhase, PowerUp, PowerUpKind, palette};
use crate::audio::SoundCue;
use crate::consts::FRAME_MS;
use crate::{heading_vector, normalize_angle};

/// Time between footstep cues while walking
pub const STEP_CUE_INTERVAL_MS: f32 = 400.0;

/// Reduced player input for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    pub forward: bool,
    pub backward: bool,
    /// Strafe left
    pub left: bool,
    /// Strafe right
    pub right: bool,
    pub jump: bool,
    /// Strike back at guards in contact
    pub attack: bool,
    /// Heading change in radians (mouse look, touch drag)
    pub turn: f32,
}

/// Terminal outcome of a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickEvent {
    Died,
    LevelComplete { time_secs: f32, score: u64 },
}

/// What a tick produced besides state changes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickResult {
    pub event: Option<TickEvent>,
    pub cues: Vec<SoundCue>,
}

/// Advance the level by `delta_ms`
pub fn tick(state: &mut GameState, input: &TickInput, delta_ms: f32) -> TickResult {
    let mut result = TickResult::default();
    if state.phase.is_terminal() {
        return result;
    }
    state.phase = LevelPhase::Playing;

    let delta_ms = if delta_ms.is_finite() { delta_ms.max(0.0) } else { 0.0 };
    let frames = delta_ms / FRAME_MS;
    state.elapsed_ms += delta_ms;
    state.shake.decay(delta_ms);

    move_player(state, input, frames, delta_ms, &mut result);
    update_vertical(state, input, frames);
    decay_buffs(state, delta_ms, frames);
    resolve_pickups(state, &mut result);
    update_guards(state, input, delta_ms, frames, &mut result);
    update_lights(state, frames);
    update_particles(state, frames);
    apply_tile_effects(state, delta_ms);

    if !state.player.is_alive() {
        state.phase = LevelPhase::Dead;
        state.shake.trigger(14.0, 800.0);
        state.burst(state.player.pos, 20, palette::PLAYER_DEATH);
        result.cues.push(SoundCue::Death);
        result.event = Some(TickEvent::Died);
        log::info!(
            "Player died on level {} after {:.1}s",
            state.level_index + 1,
            state.elapsed_secs()
        );
    } else if state.player_tile() == Tile::Goal {
        state.phase = LevelPhase::Completed;
        state.burst(state.player.pos, 30, palette::GOLD);
        result.cues.push(SoundCue::Goal);
        result.event = Some(TickEvent::LevelComplete {
            time_secs: state.elapsed_secs(),
            score: state.score,
        });
    }

    result
}

fn move_player(
    state: &mut GameState,
    input: &TickInput,
    frames: f32,
    delta_ms: f32,
    result: &mut TickResult,
) {
    let player = &mut state.player;
    let turn = if input.turn.is_finite() { input.turn } else { 0.0 };
    player.angle = normalize_angle(player.angle + turn);

    let speed = player.effective_speed(state.tuning.speed_boost_bonus) * frames;
    let forward = heading_vector(player.angle);
    let mut offset = Vec2::ZERO;
    if input.forward {
        offset += forward;
    }
    if input.backward {
        offset -= forward;
    }
    if input.left {
        offset += heading_vector(player.angle - FRAC_PI_2);
    }
    if input.right {
        offset += heading_vector(player.angle + FRAC_PI_2);
    }
    if offset == Vec2::ZERO {
        state.step_ms = 0.0;
        return;
    }

    let candidate = player.pos + offset * speed;
    if state
        .grid
        .tile_at_world(candidate, state.tuning.tile_size)
        .is_passable()
    {
        player.pos = candidate;
    }

    if player.on_ground {
        state.step_ms += delta_ms;
        if state.step_ms >= STEP_CUE_INTERVAL_MS {
            state.step_ms -= STEP_CUE_INTERVAL_MS;
            result.cues.push(SoundCue::Step);
        }
    }
}

fn update_vertical(state: &mut GameState, input: &TickInput, frames: f32) {
    let player = &mut state.player;
    let jumped = input.jump && player.on_ground;
    if jumped {
        player.vz = state.tuning.jump_impulse;
        player.on_ground = false;
    }
    player.vz -= state.tuning.gravity * frames;
    player.z += player.vz * frames;
    // A zero-length tick leaves z at the floor; the impulse carries to the next one
    if player.z <= 0.0 && !(jumped && player.vz > 0.0) {
        player.z = 0.0;
        player.vz = 0.0;
        player.on_ground = true;
    }
}

fn decay_buffs(state: &mut GameState, delta_ms: f32, frames: f32) {
    let tuning = &state.tuning;
    let player = &mut state.player;
    player.speed_boost_ms = (player.speed_boost_ms - delta_ms).max(0.0);

    if !tuning.light_radius {
        player.light_radius = tuning.light_radius_default;
        player.light_timer_ms = 0.0;
        return;
    }
    if player.light_timer_ms > 0.0 {
        player.light_timer_ms = (player.light_timer_ms - delta_ms).max(0.0);
    } else {
        let ease = 1.0 - (1.0 - tuning.light_ease_rate).powf(frames);
        player.light_radius += (tuning.light_radius_default - player.light_radius) * ease;
    }
}

fn resolve_pickups(state: &mut GameState, result: &mut TickResult) {
    if !state.player.on_ground || state.power_ups.is_empty() {
        return;
    }
    let player_pos = state.player.pos;
    let radius = state.tuning.contact_radius();
    let (taken, kept): (Vec<PowerUp>, Vec<PowerUp>) = std::mem::take(&mut state.power_ups)
        .into_iter()
        .partition(|pu| pu.pos.distance(player_pos) < radius);
    state.power_ups = kept;

    for pu in taken {
        apply_power_up(state, pu.kind);
        state.burst(pu.pos, 15, palette::GOLD);
        state.score += state.tuning.pickup_score;
        result.cues.push(SoundCue::PowerUp);
    }
}

fn apply_power_up(state: &mut GameState, kind: PowerUpKind) {
    let tuning = &state.tuning;
    let player = &mut state.player;
    match kind {
        PowerUpKind::Speed => player.speed_boost_ms = tuning.speed_boost_ms,
        PowerUpKind::Health => player.heal(tuning.health_pickup),
        PowerUpKind::Light => {
            if tuning.light_radius {
                player.light_radius = tuning.light_radius_boosted;
                player.light_timer_ms = tuning.light_boost_ms;
            }
        }
    }
}

fn update_guards(
    state: &mut GameState,
    input: &TickInput,
    delta_ms: f32,
    frames: f32,
    result: &mut TickResult,
) {
    let player_pos = state.player.pos;
    let player_tile = state.player_tile();
    let grounded = state.player.on_ground;
    let tile_size = state.tuning.tile_size;
    let contact = state.tuning.contact_radius();
    let strike_interval = state.tuning.guard_strike_interval_ms;
    let attack_damage = state.tuning.player_attack_damage;

    let mut strikes = 0u32;
    let mut fallen: Vec<Vec2> = Vec::new();
    for g in state.guards.iter_mut() {
        let dist = g.pos.distance(player_pos);
        let intent = guard::decide(g, player_pos, player_tile, tile_size);
        guard::advance(g, intent, frames);

        g.strike_cooldown_ms = (g.strike_cooldown_ms - delta_ms).max(0.0);
        if dist < contact && grounded && g.strike_cooldown_ms <= 0.0 {
            g.strike_cooldown_ms = strike_interval;
            strikes += 1;
            if input.attack {
                g.health -= attack_damage;
                if g.is_dead() {
                    fallen.push(g.pos);
                }
            }
        }
    }

    for _ in 0..strikes {
        let lost = state.player.damage(state.tuning.guard_strike_damage);
        state.damage_taken += lost;
        state.shake.trigger(8.0, 300.0);
        state.burst(player_pos, 10, palette::BLOOD);
        result.cues.push(SoundCue::Hit);
    }

    for pos in fallen {
        state.score += state.tuning.guard_kill_score;
        state.kills += 1;
        state.burst(pos, 25, palette::GUARD_DEATH);
        log::debug!("Guard down at ({:.0}, {:.0})", pos.x, pos.y);
    }
    state.guards.retain(|g| !g.is_dead());
}

fn update_lights(state: &mut GameState, frames: f32) {
    let (speed, min, max) = (
        state.tuning.moving_light_speed,
        state.tuning.moving_light_min,
        state.tuning.moving_light_max,
    );
    for light in &mut state.lights {
        light.pos.x += light.dir * speed * frames;
        if light.pos.x > max || light.pos.x < min {
            light.dir = -light.dir;
        }
    }
}

fn update_particles(state: &mut GameState, frames: f32) {
    let gravity = state.tuning.particle_gravity;
    let decay = state.tuning.particle_decay;
    for p in state.particles.iter_mut() {
        p.pos += p.vel * frames;
        p.vel.z -= gravity * frames;
        p.life -= decay * frames;
    }
    state.particles.retain(|p| p.life > 0.0);
}

fn apply_tile_effects(state: &mut GameState, delta_ms: f32) {
    if !state.player.on_ground || state.player.z > 0.0 {
        return;
    }
    match state.player_tile() {
        Tile::Light => {
            state.shadow_rest_ms = 0.0;
            state.light_exposure_ms += delta_ms;
            let interval = state.tuning.light_damage_interval_ms;
            let mut burns = 0;
            while state.light_exposure_ms >= interval {
                state.light_exposure_ms -= interval;
                burns += 1;
            }
            if burns > 0 {
                for _ in 0..burns {
                    let lost = state.player.damage(state.tuning.light_damage);
                    state.damage_taken += lost;
                }
                state.shake.trigger(6.0, 150.0);
                state.burst(state.player.pos, 5, palette::SUNBURN);
            }
        }
        Tile::Shadow => {
            state.light_exposure_ms = 0.0;
            state.shadow_rest_ms += delta_ms;
            let interval = state.tuning.shadow_heal_interval_ms;
            while state.shadow_rest_ms >= interval {
                state.shadow_rest_ms -= interval;
                state.player.heal(state.tuning.shadow_heal);
            }
        }
        Tile::Goal | Tile::Wall => {
            state.light_exposure_ms = 0.0;
            state.shadow_rest_ms = 0.0;
        }
    }
}
