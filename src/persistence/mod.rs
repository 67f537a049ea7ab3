//! Profile persistence
//!
//! Features:
//! - Versioned JSON envelope
//! - Write to a temp file, then rename over the save
//! - Corrupt saves are moved aside and replaced by defaults

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::achievements::Achievements;
use crate::error::Result;
use crate::highscores::Leaderboard;
use crate::settings::Settings;

/// Current envelope version
pub const PROFILE_VERSION: u32 = 1;

/// Everything that outlives a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub settings: Settings,
    pub achievements: Achievements,
    pub leaderboard: Leaderboard,
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    version: u32,
    profile: Profile,
}

/// JSON file holding one profile
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the profile. A missing file gives defaults; an unreadable one is
    /// renamed to `*.corrupt` and also gives defaults.
    pub fn load(&self) -> Result<Profile> {
        if !self.path.exists() {
            log::info!("No profile at {}, starting fresh", self.path.display());
            return Ok(Profile::default());
        }

        let text = std::fs::read_to_string(&self.path)?;
        match serde_json::from_str::<Envelope>(&text) {
            Ok(envelope) => {
                if envelope.version > PROFILE_VERSION {
                    log::warn!(
                        "Profile version {} is newer than {}, loading what we understand",
                        envelope.version,
                        PROFILE_VERSION
                    );
                }
                log::info!(
                    "Loaded profile ({} leaderboard entries)",
                    envelope.profile.leaderboard.entries.len()
                );
                Ok(envelope.profile)
            }
            Err(e) => {
                let aside = self.path.with_extension("corrupt");
                log::warn!(
                    "Profile {} is corrupt ({}), moving it to {}",
                    self.path.display(),
                    e,
                    aside.display()
                );
                std::fs::rename(&self.path, &aside)?;
                Ok(Profile::default())
            }
        }
    }

    /// Save the profile atomically
    pub fn save(&self, profile: &Profile) -> Result<()> {
        let envelope = Envelope {
            version: PROFILE_VERSION,
            profile: profile.clone(),
        };
        let json = serde_json::to_string_pretty(&envelope)?;

        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        log::debug!("Profile saved to {}", self.path.display());
        Ok(())
    }
}
