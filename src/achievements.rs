//! Achievements
//!
//! Each one unlocks once per profile and pays a one-time score reward.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Achievement {
    /// Clear a level in under 30 seconds
    Speedrunner,
    /// Clear a level with more than half health
    Survivor,
    /// Defeat three guards in one run
    GuardianSlayer,
    /// Clear a level without taking damage
    PerfectRun,
    /// Clear every level
    MasterVampire,
}

impl Achievement {
    pub const ALL: [Achievement; 5] = [
        Achievement::Speedrunner,
        Achievement::Survivor,
        Achievement::GuardianSlayer,
        Achievement::PerfectRun,
        Achievement::MasterVampire,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Achievement::Speedrunner => "Speedrunner",
            Achievement::Survivor => "Survivor",
            Achievement::GuardianSlayer => "Guardian Slayer",
            Achievement::PerfectRun => "Perfect Run",
            Achievement::MasterVampire => "Master Vampire",
        }
    }

    pub fn reward(self) -> u64 {
        match self {
            Achievement::Speedrunner => 100,
            Achievement::Survivor => 150,
            Achievement::GuardianSlayer => 200,
            Achievement::PerfectRun => 300,
            Achievement::MasterVampire => 500,
        }
    }
}

/// Facts about a cleared level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelReport {
    pub time_secs: f32,
    pub health: f32,
    pub damage_taken: f32,
    /// Guards defeated so far in the run
    pub run_kills: u32,
}

/// Unlocked set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievements {
    unlocked: BTreeSet<Achievement>,
}

impl Achievements {
    pub fn is_unlocked(&self, achievement: Achievement) -> bool {
        self.unlocked.contains(&achievement)
    }

    pub fn unlocked(&self) -> impl Iterator<Item = Achievement> + '_ {
        self.unlocked.iter().copied()
    }

    /// Unlock; true only the first time
    pub fn unlock(&mut self, achievement: Achievement) -> bool {
        let fresh = self.unlocked.insert(achievement);
        if fresh {
            log::info!("Achievement unlocked: {}", achievement.name());
        }
        fresh
    }

    /// Unlock whatever a cleared level earned; returns the new ones
    pub fn evaluate_level(&mut self, report: &LevelReport) -> Vec<Achievement> {
        let earned = [
            (Achievement::Speedrunner, report.time_secs < 30.0),
            (Achievement::Survivor, report.health > 50.0),
            (Achievement::PerfectRun, report.damage_taken <= 0.0),
            (Achievement::GuardianSlayer, report.run_kills >= 3),
        ];
        earned
            .into_iter()
            .filter(|(a, ok)| *ok && self.unlock(*a))
            .map(|(a, _)| a)
            .collect()
    }
}

/// Total reward for a list of fresh unlocks
pub fn total_reward(unlocked: &[Achievement]) -> u64 {
    unlocked.iter().map(|a| a.reward()).sum()
}
