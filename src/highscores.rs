//! High score leaderboard
//!
//! Tracks the top 10 finished runs and the fastest run time.

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u64,
    /// Run time in whole seconds
    pub time: u32,
    /// Display date supplied by the front-end
    pub date: String,
}

/// High score leaderboard, sorted by score descending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
    /// Fastest completed run, seconds
    #[serde(default)]
    pub best_time: Option<u32>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot a finished run with `score` would take, if any
    fn slot_for(&self, score: u64) -> Option<usize> {
        if score == 0 {
            return None;
        }
        let slot = self.entries.partition_point(|e| e.score >= score);
        (slot < MAX_HIGH_SCORES).then_some(slot)
    }

    /// Would a run with this score make the board?
    pub fn qualifies(&self, score: u64) -> bool {
        self.slot_for(score).is_some()
    }

    /// 1-based rank a score would take
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        self.slot_for(score).map(|slot| slot + 1)
    }

    /// Record a finished run. Returns its 1-based rank, or None when it
    /// misses the board; the best time updates either way.
    pub fn add(&mut self, entry: LeaderboardEntry) -> Option<usize> {
        self.best_time = Some(self.best_time.map_or(entry.time, |t| t.min(entry.time)));

        let slot = self.slot_for(entry.score)?;
        self.entries.insert(slot, entry);
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(slot + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(score: u64, time: u32) -> LeaderboardEntry {
        LeaderboardEntry {
            name: "Player".into(),
            score,
            time,
            date: "2026-10-17".into(),
        }
    }

    #[test]
    fn test_sorted_descending() {
        let mut board = Leaderboard::new();
        assert_eq!(board.add(entry(300, 90)), Some(1));
        assert_eq!(board.add(entry(500, 120)), Some(1));
        assert_eq!(board.add(entry(400, 60)), Some(2));
        let scores: Vec<u64> = board.entries.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![500, 400, 300]);
        assert_eq!(board.top_score(), Some(500));
        assert_eq!(board.best_time, Some(60));
    }

    #[test]
    fn test_keeps_top_ten() {
        let mut board = Leaderboard::new();
        for i in 1..=12 {
            board.add(entry(i * 100, 100));
        }
        assert_eq!(board.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(board.entries.last().map(|e| e.score), Some(300));
        assert!(!board.qualifies(300));
        assert!(board.qualifies(301));
        assert_eq!(board.potential_rank(1250), Some(1));
        assert_eq!(board.add(entry(50, 10)), None);
        // Best time still recorded for a run that missed the board
        assert_eq!(board.best_time, Some(10));
    }

    #[test]
    fn test_tie_ranks_after_earlier_run() {
        let mut board = Leaderboard::new();
        board.add(LeaderboardEntry {
            name: "First".into(),
            ..entry(400, 50)
        });
        assert_eq!(board.potential_rank(400), Some(2));
        assert_eq!(board.add(entry(400, 40)), Some(2));
        assert_eq!(board.entries[0].name, "First");
    }

    #[test]
    fn test_zero_never_qualifies() {
        let board = Leaderboard::new();
        assert!(!board.qualifies(0));
        assert_eq!(board.potential_rank(0), None);
        assert!(board.is_empty());
    }
}
