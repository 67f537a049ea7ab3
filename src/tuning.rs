//! Data-driven game balance
//!
//! Every gameplay constant lives here so variants of the game (with or
//! without the light-radius mechanic, with or without the intro) are one
//! core plus a different `Tuning`, not forked code. Values marked "per
//! frame" are tuned against a 60 Hz reference frame and scaled by the
//! simulation delta.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};

/// Balance values and feature flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === World ===
    pub tile_size: f32,

    // === Ray caster ===
    pub fov: f32,
    pub rays: usize,
    pub ray_step: f32,
    pub max_ray_distance: f32,

    // === Player (per frame) ===
    pub player_speed: f32,
    pub speed_boost_bonus: f32,
    pub jump_impulse: f32,
    pub gravity: f32,

    // === Tile effects ===
    pub light_damage: f32,
    pub light_damage_interval_ms: f32,
    pub shadow_heal: f32,
    pub shadow_heal_interval_ms: f32,

    // === Guards ===
    pub guard_health: f32,
    /// Per frame, before the difficulty term
    pub guard_base_speed: f32,
    pub guard_speed_per_difficulty: f32,
    /// Detection range in tiles
    pub guard_range_tiles: f32,
    pub guard_strike_damage: f32,
    pub guard_strike_interval_ms: f32,
    pub player_attack_damage: f32,

    // === Power-ups ===
    pub speed_boost_ms: f32,
    pub health_pickup: f32,
    pub light_radius_default: f32,
    pub light_radius_boosted: f32,
    pub light_boost_ms: f32,
    /// Fraction of the gap to the default radius closed per frame
    pub light_ease_rate: f32,
    pub power_ups_per_level: usize,

    // === Score ===
    pub pickup_score: u64,
    pub guard_kill_score: u64,
    pub level_clear_score: u64,
    pub level_time_score: u64,

    // === Particles (per frame) ===
    pub particle_gravity: f32,
    pub particle_decay: f32,
    pub particle_spread: f32,

    // === Ambient lights (per frame, tile units) ===
    pub moving_light_speed: f32,
    pub moving_light_min: f32,
    pub moving_light_max: f32,

    // === Feature flags ===
    /// Light power-ups and the easing light mask
    pub light_radius: bool,
    /// Length of the intro sequence before play starts (0 disables it)
    pub intro_ms: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE,

            fov: FOV,
            rays: RAYS,
            ray_step: RAY_STEP,
            max_ray_distance: MAX_RAY_DISTANCE,

            player_speed: 2.0,
            speed_boost_bonus: 1.0,
            jump_impulse: 12.0,
            gravity: 0.6,

            light_damage: 10.0,
            light_damage_interval_ms: 1000.0,
            shadow_heal: 3.0,
            shadow_heal_interval_ms: 2000.0,

            guard_health: 50.0,
            guard_base_speed: 0.5,
            guard_speed_per_difficulty: 0.3,
            guard_range_tiles: 3.0,
            guard_strike_damage: 10.0,
            guard_strike_interval_ms: 1000.0,
            player_attack_damage: 25.0,

            speed_boost_ms: 5000.0,
            health_pickup: 30.0,
            light_radius_default: DEFAULT_LIGHT_RADIUS,
            light_radius_boosted: 400.0,
            light_boost_ms: 10_000.0,
            light_ease_rate: 0.05,
            power_ups_per_level: 2,

            pickup_score: 50,
            guard_kill_score: 200,
            level_clear_score: 500,
            level_time_score: 10,

            particle_gravity: 0.2,
            particle_decay: 0.02,
            particle_spread: 4.0,

            moving_light_speed: 0.01,
            moving_light_min: 1.2,
            moving_light_max: 4.2,

            light_radius: true,
            intro_ms: 0.0,
        }
    }
}

impl Tuning {
    /// The simpler ruleset: no light mask, slower light damage, slower healing
    pub fn classic() -> Self {
        Self {
            light_damage: 5.0,
            light_damage_interval_ms: 2000.0,
            shadow_heal: 2.0,
            shadow_heal_interval_ms: 3000.0,
            light_radius: false,
            ..Self::default()
        }
    }

    /// Parse a (possibly partial) JSON document; missing keys keep defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::MissingFile {
                path: path.to_path_buf(),
            });
        }
        let text = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&text)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        fn positive(field: &'static str, value: f32) -> Result<()> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(Error::InvalidTuning {
                    field,
                    message: format!("must be positive, got {value}"),
                })
            }
        }

        positive("tile_size", self.tile_size)?;
        positive("fov", self.fov)?;
        positive("ray_step", self.ray_step)?;
        positive("max_ray_distance", self.max_ray_distance)?;
        positive("light_damage_interval_ms", self.light_damage_interval_ms)?;
        positive("shadow_heal_interval_ms", self.shadow_heal_interval_ms)?;
        positive("guard_strike_interval_ms", self.guard_strike_interval_ms)?;
        if self.rays == 0 {
            return Err(Error::InvalidTuning {
                field: "rays",
                message: "at least one ray is required".into(),
            });
        }
        if self.max_ray_distance < self.ray_step {
            return Err(Error::InvalidTuning {
                field: "max_ray_distance",
                message: "must be at least one ray step".into(),
            });
        }
        if self.moving_light_min >= self.moving_light_max {
            return Err(Error::InvalidTuning {
                field: "moving_light_min",
                message: "must be below moving_light_max".into(),
            });
        }
        Ok(())
    }

    /// Guard speed for a difficulty level (per frame)
    pub fn guard_speed(&self, difficulty: u8) -> f32 {
        self.guard_base_speed + difficulty as f32 * self.guard_speed_per_difficulty
    }

    /// Contact radius for melee and pickups
    pub fn contact_radius(&self) -> f32 {
        self.tile_size / 2.0
    }
}
