//! Player preferences
//!
//! Persisted with the profile, separate from balance tuning.

use serde::{Deserialize, Serialize};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Rays per frame for this preset, given the tuned ray count
    pub fn ray_count(&self, base: usize) -> usize {
        match self {
            QualityPreset::Low => (base / 2).max(1),
            QualityPreset::Medium => base,
            QualityPreset::High => base * 2,
        }
    }

    /// Maximum particles drawn for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 64,
            QualityPreset::Medium => 256,
            QualityPreset::High => 512,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Screen shake on hits and burns
    pub screen_shake: bool,
    /// Particle effects
    pub particles: bool,
    /// Corner minimap
    pub show_minimap: bool,

    // === Controls ===
    /// Radians of turn per pixel of mouse movement
    pub mouse_sensitivity: f32,

    // === Audio ===
    pub sound_enabled: bool,
    pub music_enabled: bool,

    // === Accessibility ===
    /// Reduced motion (no shake)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,

            screen_shake: true,
            particles: true,
            show_minimap: true,

            mouse_sensitivity: 0.002,

            sound_enabled: true,
            music_enabled: true,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Sensitivity bounds for the settings screen
    pub const MIN_SENSITIVITY: f32 = 0.0001;
    pub const MAX_SENSITIVITY: f32 = 0.01;

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Heading change for a horizontal mouse movement
    pub fn turn_from_mouse(&self, dx: f32) -> f32 {
        dx * self.mouse_sensitivity
    }

    /// Nudge sensitivity by `delta`, kept within bounds
    pub fn adjust_sensitivity(&mut self, delta: f32) {
        self.mouse_sensitivity =
            (self.mouse_sensitivity + delta).clamp(Self::MIN_SENSITIVITY, Self::MAX_SENSITIVITY);
    }
}
