//! Play statistics
//!
//! Lifetime counters persisted separately from the unlock ledger.

use serde::{Deserialize, Serialize};

/// Lifetime play statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayStats {
    /// Games started
    pub total_games: u32,
    /// Best final score
    pub best_score: i64,
    /// Bubbles popped across all games
    pub total_bubbles: u64,
    /// Highest level reached
    pub max_level: u32,
    /// Achievements found (raises Special/Rare spawn odds)
    pub secrets_found: u32,
    /// Longest combo chain
    pub highest_combo: u32,
    #[serde(skip)]
    dirty: bool,
}

impl Default for PlayStats {
    fn default() -> Self {
        Self {
            total_games: 0,
            best_score: 0,
            total_bubbles: 0,
            max_level: 1,
            secrets_found: 0,
            highest_combo: 0,
            dirty: false,
        }
    }
}

impl PlayStats {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "bubble_pop_stats";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_game_started(&mut self) {
        self.total_games += 1;
        self.dirty = true;
    }

    pub fn record_pop(&mut self) {
        self.total_bubbles += 1;
        self.dirty = true;
    }

    /// Track the longest chain. Returns true on a new record.
    pub fn record_combo(&mut self, combo: u32) -> bool {
        if combo <= self.highest_combo {
            return false;
        }
        self.highest_combo = combo;
        self.dirty = true;
        true
    }

    /// Track the highest level. Returns true on a new record.
    pub fn record_level(&mut self, level: u32) -> bool {
        if level <= self.max_level {
            return false;
        }
        self.max_level = level;
        self.dirty = true;
        true
    }

    /// Track the best final score. Returns true on a new record.
    pub fn record_final_score(&mut self, score: i64) -> bool {
        if score <= self.best_score {
            return false;
        }
        self.best_score = score;
        self.dirty = true;
        true
    }

    pub fn record_secret_found(&mut self) {
        self.secrets_found += 1;
        self.dirty = true;
    }

    /// Take and reset the unsaved-changes flag
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_only_improve() {
        let mut stats = PlayStats::new();
        assert!(stats.record_final_score(500));
        assert!(!stats.record_final_score(400));
        assert_eq!(stats.best_score, 500);

        assert!(!stats.record_level(1));
        assert!(stats.record_level(3));
        assert_eq!(stats.max_level, 3);

        assert!(stats.record_combo(4));
        assert!(!stats.record_combo(4));
    }

    #[test]
    fn test_dirty_after_mutation() {
        let mut stats = PlayStats::new();
        assert!(!stats.take_dirty());
        stats.record_pop();
        assert!(stats.take_dirty());
        assert!(!stats.take_dirty());
    }

    #[test]
    fn test_missing_fields_default() {
        let stats: PlayStats = serde_json::from_str(r#"{"total_games": 4}"#).unwrap();
        assert_eq!(stats.total_games, 4);
        assert_eq!(stats.max_level, 1);
        assert_eq!(stats.secrets_found, 0);
    }
}
