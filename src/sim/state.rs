//! Game state and core simulation types
//!
//! Everything one level of play needs lives in `GameState`; the tick owns it
//! exclusively and the presentation reads it between ticks.

use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::{GridMap, Tile};
use crate::consts::*;
use crate::settings::Settings;
use crate::tuning::Tuning;
use crate::{tile_center, world_to_tile};

/// Lifecycle of one level attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelPhase {
    /// Freshly spawned, no tick yet
    Spawned,
    /// Active gameplay
    Playing,
    /// Health reached zero
    Dead,
    /// Player reached the goal
    Completed,
}

impl LevelPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, LevelPhase::Dead | LevelPhase::Completed)
    }
}

/// The player creature
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Height above the floor
    pub z: f32,
    /// Vertical velocity (per frame)
    pub vz: f32,
    /// Heading in radians
    pub angle: f32,
    pub health: f32,
    /// Base speed (per frame)
    pub speed: f32,
    /// Remaining speed boost
    pub speed_boost_ms: f32,
    pub light_radius: f32,
    /// Remaining enlarged-light time
    pub light_timer_ms: f32,
    pub on_ground: bool,
}

impl Player {
    pub fn spawn(tuning: &Tuning) -> Self {
        Self {
            pos: tile_center(SPAWN_TILE.0, SPAWN_TILE.1, tuning.tile_size),
            z: 0.0,
            vz: 0.0,
            angle: 0.0,
            health: MAX_HEALTH,
            speed: tuning.player_speed,
            speed_boost_ms: 0.0,
            light_radius: tuning.light_radius_default,
            light_timer_ms: 0.0,
            on_ground: true,
        }
    }

    /// Grid cell under the player
    pub fn tile(&self, tile_size: f32) -> (i32, i32) {
        world_to_tile(self.pos, tile_size)
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Speed this frame including an active boost
    pub fn effective_speed(&self, boost_bonus: f32) -> f32 {
        if self.speed_boost_ms > 0.0 {
            self.speed + boost_bonus
        } else {
            self.speed
        }
    }

    /// Apply damage, returns the amount actually removed
    pub fn damage(&mut self, amount: f32) -> f32 {
        let before = self.health;
        self.health = (self.health - amount).clamp(0.0, MAX_HEALTH);
        before - self.health
    }

    /// Heal up to `MAX_HEALTH`
    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).clamp(0.0, MAX_HEALTH);
    }
}

/// A pursuing guard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guard {
    pub id: u32,
    pub pos: Vec2,
    pub angle: f32,
    pub health: f32,
    /// Per frame
    pub speed: f32,
    /// Detection range in tiles
    pub range: f32,
    /// Time until this guard can strike again
    #[serde(default)]
    pub strike_cooldown_ms: f32,
}

impl Guard {
    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Speed,
    Health,
    Light,
}

/// A power-up lying in the maze
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub pos: Vec2,
}

/// Particle colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Burst colours
pub mod palette {
    use super::Rgb;

    pub const GOLD: Rgb = Rgb::new(255, 215, 0);
    pub const BLOOD: Rgb = Rgb::new(255, 0, 0);
    pub const GUARD_DEATH: Rgb = Rgb::new(255, 50, 50);
    pub const SUNBURN: Rgb = Rgb::new(255, 200, 0);
    pub const PLAYER_DEATH: Rgb = Rgb::new(255, 50, 0);
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec3,
    /// Per frame
    pub vel: Vec3,
    /// 1 at birth, removed at 0
    pub life: f32,
    pub color: Rgb,
}

/// Ambient light decoration sweeping along the x axis (tile units)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovingLight {
    pub pos: Vec2,
    /// +1 or -1
    pub dir: f32,
}

/// Camera shake request, decays with time
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ScreenShake {
    pub intensity: f32,
    pub remaining_ms: f32,
}

impl ScreenShake {
    /// Start a shake unless a stronger one is already running
    pub fn trigger(&mut self, intensity: f32, duration_ms: f32) {
        if intensity >= self.intensity || self.remaining_ms <= 0.0 {
            self.intensity = intensity;
            self.remaining_ms = duration_ms;
        }
    }

    pub fn decay(&mut self, delta_ms: f32) {
        if self.remaining_ms > 0.0 {
            self.remaining_ms -= delta_ms;
            if self.remaining_ms <= 0.0 {
                self.remaining_ms = 0.0;
                self.intensity = 0.0;
            }
        }
    }

    /// Current shake amplitude in pixels
    pub fn amplitude(&self) -> f32 {
        self.intensity * (self.remaining_ms / 400.0)
    }

    pub fn is_active(&self) -> bool {
        self.remaining_ms > 0.0
    }
}

/// Complete state of one level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub tuning: Tuning,
    pub grid: GridMap,
    /// 0-based level index
    pub level_index: usize,
    /// 1-3
    pub difficulty: u8,
    pub phase: LevelPhase,
    pub score: u64,
    /// Time since the level (or the retry) started
    pub elapsed_ms: f32,
    pub player: Player,
    pub guards: Vec<Guard>,
    pub power_ups: Vec<PowerUp>,
    pub particles: Vec<Particle>,
    pub lights: Vec<MovingLight>,
    pub shake: ScreenShake,
    /// Guards killed this level
    pub kills: u32,
    /// Health lost this level
    pub damage_taken: f32,
    /// Time spent on the current light tile toward the next burn
    pub light_exposure_ms: f32,
    /// Time spent on the current shadow tile toward the next heal
    pub shadow_rest_ms: f32,
    /// Time walked since the last footstep cue
    pub step_ms: f32,
    /// Live particle limit from the player's settings (0 disables bursts)
    pub particle_cap: usize,
    /// Camera shake allowed by the player's settings
    pub shake_enabled: bool,
    pub rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Fresh state for a level, guards spawned from `seed`
    pub fn new(grid: GridMap, level_index: usize, difficulty: u8, tuning: Tuning, seed: u64) -> Self {
        let player = Player::spawn(&tuning);
        let mut state = Self {
            tuning,
            grid,
            level_index,
            difficulty: difficulty.clamp(1, 3),
            phase: LevelPhase::Spawned,
            score: 0,
            elapsed_ms: 0.0,
            player,
            guards: Vec::new(),
            power_ups: Vec::new(),
            particles: Vec::new(),
            lights: vec![MovingLight {
                pos: Vec2::new(3.0, 0.0),
                dir: 1.0,
            }],
            shake: ScreenShake::default(),
            kills: 0,
            damage_taken: 0.0,
            light_exposure_ms: 0.0,
            shadow_rest_ms: 0.0,
            step_ms: 0.0,
            particle_cap: MAX_PARTICLES,
            shake_enabled: true,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        };
        super::guard::spawn_guards(&mut state);
        state
    }

    /// Put the player back at the spawn and re-roll guards; score and
    /// difficulty carry over
    pub fn respawn(&mut self) {
        self.player = Player::spawn(&self.tuning);
        self.phase = LevelPhase::Spawned;
        self.elapsed_ms = 0.0;
        self.kills = 0;
        self.damage_taken = 0.0;
        self.light_exposure_ms = 0.0;
        self.shadow_rest_ms = 0.0;
        self.step_ms = 0.0;
        self.shake = ScreenShake::default();
        self.particles.clear();
        self.power_ups.clear();
        self.guards.clear();
        super::guard::spawn_guards(self);
    }

    /// Take the particle limit and shake preference from player settings
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.particle_cap = settings.max_particles().min(MAX_PARTICLES);
        self.shake_enabled = settings.effective_screen_shake();
        if self.particles.len() > self.particle_cap {
            let excess = self.particles.len() - self.particle_cap;
            self.particles.drain(..excess);
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Place a power-up
    pub fn spawn_power_up(&mut self, kind: PowerUpKind, pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        self.power_ups.push(PowerUp { id, kind, pos });
        id
    }

    /// Emit `count` particles at a floor position
    pub fn burst(&mut self, at: Vec2, count: usize, color: Rgb) {
        if self.particle_cap == 0 {
            return;
        }
        let spread = self.tuning.particle_spread;
        for _ in 0..count {
            let vel = Vec3::new(
                (self.rng.random::<f32>() - 0.5) * spread,
                (self.rng.random::<f32>() - 0.5) * spread,
                self.rng.random::<f32>() * 3.0,
            );
            self.particles.push(Particle {
                pos: at.extend(0.0),
                vel,
                life: 1.0,
                color,
            });
        }
        if self.particles.len() > self.particle_cap {
            let excess = self.particles.len() - self.particle_cap;
            self.particles.drain(..excess);
        }
    }

    /// Tile under the player
    pub fn player_tile(&self) -> Tile {
        self.grid.tile_at_world(self.player.pos, self.tuning.tile_size)
    }

    /// Level time in seconds
    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed_ms / 1000.0
    }

    /// Random shake offset for this frame (zero when calm or disabled)
    pub fn shake_offset(&mut self) -> Vec2 {
        if !self.shake_enabled || !self.shake.is_active() {
            return Vec2::ZERO;
        }
        let s = self.shake.amplitude();
        Vec2::new(
            (self.rng.random::<f32>() - 0.5) * s,
            (self.rng.random::<f32>() - 0.5) * s,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level_one() -> GameState {
        GameState::new(GridMap::load(0), 0, 1, Tuning::default(), 7)
    }

    #[test]
    fn test_spawn_position() {
        let state = level_one();
        assert_eq!(state.player.pos, Vec2::new(160.0, 96.0));
        assert_eq!(state.player.tile(64.0), (2, 1));
        assert_eq!(state.player_tile(), Tile::Shadow);
        assert!(state.player.on_ground);
        assert_eq!(state.phase, LevelPhase::Spawned);
    }

    #[test]
    fn test_guard_count_follows_difficulty() {
        for difficulty in 1..=3u8 {
            let state = GameState::new(GridMap::load(2), 2, difficulty, Tuning::default(), 1);
            assert_eq!(state.guards.len(), 1 + difficulty as usize);
        }
    }

    #[test]
    fn test_player_health_clamped() {
        let mut player = Player::spawn(&Tuning::default());
        assert_eq!(player.damage(30.0), 30.0);
        player.heal(500.0);
        assert_eq!(player.health, MAX_HEALTH);
        assert_eq!(player.damage(250.0), 100.0);
        assert_eq!(player.health, 0.0);
        assert!(!player.is_alive());
    }

    #[test]
    fn test_effective_speed() {
        let mut player = Player::spawn(&Tuning::default());
        assert_eq!(player.effective_speed(1.0), 2.0);
        player.speed_boost_ms = 10.0;
        assert_eq!(player.effective_speed(1.0), 3.0);
    }

    #[test]
    fn test_burst_caps_particles() {
        let mut state = level_one();
        state.burst(Vec2::ZERO, MAX_PARTICLES + 40, palette::GOLD);
        assert_eq!(state.particles.len(), MAX_PARTICLES);
        assert!(state.particles.iter().all(|p| p.life == 1.0 && p.vel.z >= 0.0));
    }

    #[test]
    fn test_settings_limit_particles() {
        let mut state = level_one();
        state.burst(Vec2::ZERO, 300, palette::GOLD);
        state.apply_settings(&Settings::default());
        assert_eq!(state.particle_cap, 256);
        assert_eq!(state.particles.len(), 256);
        state.burst(Vec2::ZERO, 40, palette::BLOOD);
        assert_eq!(state.particles.len(), 256);

        let off = Settings {
            particles: false,
            ..Default::default()
        };
        state.apply_settings(&off);
        assert!(state.particles.is_empty());
        state.burst(Vec2::ZERO, 10, palette::GOLD);
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_reduced_motion_stills_camera() {
        let mut state = level_one();
        state.shake.trigger(14.0, 800.0);
        assert_ne!(state.shake_offset(), Vec2::ZERO);

        let calm = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        state.apply_settings(&calm);
        assert!(state.shake.is_active());
        assert_eq!(state.shake_offset(), Vec2::ZERO);
    }

    #[test]
    fn test_screen_shake_decays() {
        let mut shake = ScreenShake::default();
        shake.trigger(8.0, 300.0);
        assert!(shake.is_active());
        assert!((shake.amplitude() - 6.0).abs() < 1e-5);
        shake.trigger(6.0, 150.0);
        assert_eq!(shake.intensity, 8.0);
        shake.decay(300.0);
        assert!(!shake.is_active());
        assert_eq!(shake.amplitude(), 0.0);
    }

    #[test]
    fn test_respawn_keeps_score() {
        let mut state = level_one();
        state.score = 900;
        state.player.health = 0.0;
        state.phase = LevelPhase::Dead;
        state.elapsed_ms = 12_000.0;
        state.respawn();
        assert_eq!(state.score, 900);
        assert_eq!(state.player.health, MAX_HEALTH);
        assert_eq!(state.phase, LevelPhase::Spawned);
        assert_eq!(state.elapsed_ms, 0.0);
        assert_eq!(state.guards.len(), 2);
    }

    #[test]
    fn test_same_seed_same_guards() {
        let a = GameState::new(GridMap::load(3), 3, 2, Tuning::default(), 42);
        let b = GameState::new(GridMap::load(3), 3, 2, Tuning::default(), 42);
        let pa: Vec<Vec2> = a.guards.iter().map(|g| g.pos).collect();
        let pb: Vec<Vec2> = b.guards.iter().map(|g| g.pos).collect();
        assert_eq!(pa, pb);
    }
}
