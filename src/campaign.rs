//! Campaign orchestration
//!
//! Drives one run through the built-in levels. The tick only reports
//! `Died` / `LevelComplete`; this layer decides what happens next: retry in
//! place, load the next map at a higher difficulty, or end the run. It also
//! places power-ups, pays level bonuses and achievements, and hands sound
//! cues to the audio backend.

use rand::Rng;

use crate::achievements::{Achievement, LevelReport, total_reward};
use crate::audio::{AudioSink, SilentAudio, play_all};
use crate::consts::{MAX_FRAME_DELTA_MS, SPAWN_TILE};
use crate::highscores::LeaderboardEntry;
use crate::persistence::Profile;
use crate::settings::Settings;
use crate::sim::{
    GameState, GridMap, LEVEL_COUNT, PowerUpKind, RayCaster, Rays, TickEvent, TickInput,
    difficulty_for_level, tick,
};
use crate::tile_center;
use crate::tuning::Tuning;

/// Where the run stands
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CampaignPhase {
    /// Story intro before the first level
    Intro { remaining_ms: f32 },
    Playing,
    /// Level clock frozen until `toggle_pause`
    Paused,
    /// Waiting for `retry` or `restart`
    Dead,
    /// Every level cleared
    Finished,
}

/// Result of a completed run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub score: u64,
    /// Sum of level times, seconds
    pub time_secs: f32,
    pub kills: u32,
}

/// One run of the game
pub struct Campaign {
    tuning: Tuning,
    state: GameState,
    caster: RayCaster,
    phase: CampaignPhase,
    profile: Profile,
    audio: Box<dyn AudioSink>,
    seed: u64,
    attempt: u64,
    /// Guards defeated in earlier levels of this run
    run_kills: u32,
    /// Time spent in earlier levels of this run
    run_time_ms: f32,
    summary: Option<RunSummary>,
}

impl Campaign {
    pub fn new(tuning: Tuning, profile: Profile, seed: u64) -> Self {
        let mut caster = RayCaster::from_tuning(&tuning);
        caster.rays = profile.settings.quality.ray_count(tuning.rays);
        let state = level_state(&tuning, &profile.settings, 0, seed, 0, 0);
        let mut campaign = Self {
            phase: intro_phase(&tuning),
            tuning,
            state,
            caster,
            profile,
            audio: Box::new(SilentAudio),
            seed,
            attempt: 0,
            run_kills: 0,
            run_time_ms: 0.0,
            summary: None,
        };
        campaign.place_power_ups();
        log::info!("Run started with seed {}", seed);
        campaign
    }

    /// Use a real audio backend
    pub fn with_audio(mut self, mut audio: Box<dyn AudioSink>) -> Self {
        if let Err(e) = audio.set_music(self.profile.settings.music_enabled) {
            log::debug!("Ignoring music failure: {}", e);
        }
        self.audio = audio;
        self
    }

    /// Replace the player's settings and apply them to the running level
    pub fn set_settings(&mut self, settings: Settings) {
        self.caster.rays = settings.quality.ray_count(self.tuning.rays);
        self.state.apply_settings(&settings);
        if settings.music_enabled != self.profile.settings.music_enabled {
            if let Err(e) = self.audio.set_music(settings.music_enabled) {
                log::debug!("Ignoring music failure: {}", e);
            }
        }
        self.profile.settings = settings;
    }

    /// Advance one display frame
    pub fn frame(&mut self, delta_ms: f32, input: &TickInput) -> Option<TickEvent> {
        let delta_ms = if delta_ms.is_finite() {
            delta_ms.clamp(0.0, MAX_FRAME_DELTA_MS)
        } else {
            0.0
        };
        match self.phase {
            CampaignPhase::Intro { remaining_ms } => {
                let remaining_ms = remaining_ms - delta_ms;
                self.phase = if remaining_ms <= 0.0 {
                    CampaignPhase::Playing
                } else {
                    CampaignPhase::Intro { remaining_ms }
                };
                return None;
            }
            CampaignPhase::Paused | CampaignPhase::Dead | CampaignPhase::Finished => return None,
            CampaignPhase::Playing => {}
        }

        let result = tick(&mut self.state, input, delta_ms);
        play_all(
            self.audio.as_mut(),
            &result.cues,
            self.profile.settings.sound_enabled,
        );

        match result.event {
            Some(TickEvent::Died) => self.phase = CampaignPhase::Dead,
            Some(TickEvent::LevelComplete { time_secs, .. }) => self.complete_level(time_secs),
            None => {}
        }
        result.event
    }

    /// Skip the rest of the intro
    pub fn skip_intro(&mut self) {
        if matches!(self.phase, CampaignPhase::Intro { .. }) {
            self.phase = CampaignPhase::Playing;
        }
    }

    /// Pause or resume a level in progress; true while paused
    pub fn toggle_pause(&mut self) -> bool {
        self.phase = match self.phase {
            CampaignPhase::Playing => CampaignPhase::Paused,
            CampaignPhase::Paused => CampaignPhase::Playing,
            other => other,
        };
        self.phase == CampaignPhase::Paused
    }

    /// Respawn in place after dying; score and difficulty carry over
    pub fn retry(&mut self) {
        if self.phase != CampaignPhase::Dead {
            return;
        }
        self.state.respawn();
        self.place_power_ups();
        self.phase = CampaignPhase::Playing;
        log::info!("Retrying level {}", self.state.level_index + 1);
    }

    /// Start over from the first level
    pub fn restart(&mut self) {
        self.attempt += 1;
        self.state = level_state(
            &self.tuning,
            &self.profile.settings,
            0,
            self.seed,
            self.attempt,
            0,
        );
        self.place_power_ups();
        self.phase = intro_phase(&self.tuning);
        self.run_kills = 0;
        self.run_time_ms = 0.0;
        self.summary = None;
        log::info!("Run restarted");
    }

    /// Ray hits for the current frame
    pub fn view(&self) -> Rays<'_> {
        self.caster.cast(&self.state.player, &self.state.grid)
    }

    /// Record the finished run on the leaderboard, returns the rank achieved
    pub fn record_run(&mut self, name: &str, date: &str) -> Option<usize> {
        let summary = self.summary.as_ref()?;
        self.profile.leaderboard.add(LeaderboardEntry {
            name: name.to_string(),
            score: summary.score,
            time: summary.time_secs.floor() as u32,
            date: date.to_string(),
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable state, for front-end effects such as the shake offset
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn phase(&self) -> CampaignPhase {
        self.phase
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn profile_mut(&mut self) -> &mut Profile {
        &mut self.profile
    }

    pub fn summary(&self) -> Option<&RunSummary> {
        self.summary.as_ref()
    }

    /// Guards defeated this run, including the current level
    pub fn run_kills(&self) -> u32 {
        self.run_kills + self.state.kills
    }

    fn complete_level(&mut self, time_secs: f32) {
        self.run_kills += self.state.kills;
        self.run_time_ms += self.state.elapsed_ms;

        let report = LevelReport {
            time_secs,
            health: self.state.player.health,
            damage_taken: self.state.damage_taken,
            run_kills: self.run_kills,
        };
        let fresh = self.profile.achievements.evaluate_level(&report);
        let bonus = self.tuning.level_clear_score
            + self.tuning.level_time_score * time_secs.floor() as u64;
        let score = self.state.score + bonus + total_reward(&fresh);
        log::info!(
            "Level {} cleared in {:.1}s, score {}",
            self.state.level_index + 1,
            time_secs,
            score
        );

        let next = self.state.level_index + 1;
        if next >= LEVEL_COUNT {
            let mut score = score;
            if self.profile.achievements.unlock(Achievement::MasterVampire) {
                score += Achievement::MasterVampire.reward();
            }
            self.state.score = score;
            self.summary = Some(RunSummary {
                score,
                time_secs: self.run_time_ms / 1000.0,
                kills: self.run_kills,
            });
            self.phase = CampaignPhase::Finished;
            log::info!("Run finished with score {}", score);
            return;
        }

        self.state = level_state(
            &self.tuning,
            &self.profile.settings,
            next,
            self.seed,
            self.attempt,
            score,
        );
        self.place_power_ups();
    }

    /// Scatter power-ups over random open tiles, never on the spawn
    fn place_power_ups(&mut self) {
        let state = &mut self.state;
        let mut cells: Vec<(i32, i32)> = state
            .grid
            .open_cells()
            .filter(|&cell| cell != SPAWN_TILE)
            .collect();
        let kinds: &[PowerUpKind] = if state.tuning.light_radius {
            &[PowerUpKind::Speed, PowerUpKind::Health, PowerUpKind::Light]
        } else {
            &[PowerUpKind::Speed, PowerUpKind::Health]
        };

        for _ in 0..state.tuning.power_ups_per_level {
            if cells.is_empty() {
                break;
            }
            let (col, row) = cells.swap_remove(state.rng.random_range(0..cells.len()));
            let kind = kinds[state.rng.random_range(0..kinds.len())];
            let pos = tile_center(col, row, state.tuning.tile_size);
            state.spawn_power_up(kind, pos);
        }
    }
}

fn intro_phase(tuning: &Tuning) -> CampaignPhase {
    if tuning.intro_ms > 0.0 {
        CampaignPhase::Intro {
            remaining_ms: tuning.intro_ms,
        }
    } else {
        CampaignPhase::Playing
    }
}

/// Per-level seed: varies with the run seed, the level and the restart count
fn level_seed(seed: u64, level_index: usize, attempt: u64) -> u64 {
    (level_index as u64)
        .wrapping_mul(2_654_435_761)
        .wrapping_add(attempt.wrapping_mul(40_503))
        .wrapping_add(seed)
}

fn level_state(
    tuning: &Tuning,
    settings: &Settings,
    index: usize,
    seed: u64,
    attempt: u64,
    score: u64,
) -> GameState {
    let mut state = GameState::new(
        GridMap::load(index),
        index,
        difficulty_for_level(index),
        tuning.clone(),
        level_seed(seed, index, attempt),
    );
    state.score = score;
    state.apply_settings(settings);
    log::info!(
        "Level {} loaded ({}x{}, difficulty {})",
        index + 1,
        state.grid.width(),
        state.grid.height(),
        state.difficulty
    );
    state
}
