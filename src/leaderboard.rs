//! Leaderboard views
//!
//! Entries are kept sorted by score, highest first. Equal scores keep the
//! order they were written in.

use serde::{Deserialize, Serialize};

use crate::persistence::{LeaderboardStore, StoreError};

/// A finished session's result, immutable once written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u32,
}

impl LeaderboardEntry {
    pub fn new(name: String, score: u32) -> Self {
        Self { name, score }
    }
}

/// One display row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry {
    /// 1-based position on the full board
    pub rank: usize,
    pub name: String,
    pub score: u32,
}

/// All entries, sorted for display
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Sort `entries` by score descending (stable)
    pub fn from_entries(mut entries: Vec<LeaderboardEntry>) -> Self {
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        Self { entries }
    }

    /// Read everything from `store`
    pub fn load<S: LeaderboardStore + ?Sized>(store: &S) -> Result<Self, StoreError> {
        let board = Self::from_entries(store.load_all()?);
        log::info!("Loaded {} leaderboard entries", board.len());
        Ok(board)
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn ranked(&self) -> impl Iterator<Item = RankedEntry> + '_ {
        self.entries.iter().enumerate().map(|(i, e)| RankedEntry {
            rank: i + 1,
            name: e.name.clone(),
            score: e.score,
        })
    }

    /// Top `n` rows across every player
    pub fn top(&self, n: usize) -> Vec<RankedEntry> {
        self.ranked().take(n).collect()
    }

    /// Top `n` rows for `name`, keeping their global ranks
    pub fn for_player(&self, name: &str, n: usize) -> Vec<RankedEntry> {
        self.ranked().filter(|r| r.name == name).take(n).collect()
    }

    /// Best global rank held by `name`
    pub fn best_rank(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name).map(|i| i + 1)
    }
}
