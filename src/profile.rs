//! Player profile: the unlock ledger plus lifetime statistics
//!
//! Both documents outlive individual games and are flushed to storage after
//! every call that changed them.

use crate::ledger::{AchievementDef, Ledger};
use crate::persistence::{self, KeyValueStore};
use crate::stats::PlayStats;

#[derive(Debug, Clone, Default)]
pub struct Profile {
    pub ledger: Ledger,
    pub stats: PlayStats,
}

impl Profile {
    /// Load both documents, falling back to defaults
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        Self {
            ledger: persistence::load_document(store, Ledger::STORAGE_KEY),
            stats: persistence::load_document(store, PlayStats::STORAGE_KEY),
        }
    }

    /// Save whichever documents changed since the last flush
    pub fn flush<S: KeyValueStore + ?Sized>(&mut self, store: &mut S) {
        if self.ledger.take_dirty() {
            persistence::save_document(store, Ledger::STORAGE_KEY, &self.ledger);
        }
        if self.stats.take_dirty() {
            persistence::save_document(store, PlayStats::STORAGE_KEY, &self.stats);
        }
    }

    /// Unlock an achievement and count it as a found secret.
    ///
    /// Returns true if it was new.
    pub fn unlock_achievement(&mut self, def: &AchievementDef, timestamp: f64) -> bool {
        let added = self
            .ledger
            .unlock_achievement(def.id, def.title, def.description, timestamp);
        if added {
            self.stats.record_secret_found();
        }
        added
    }

    pub fn secrets_found(&self) -> u32 {
        self.stats.secrets_found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{COMBO_5, SecretCode};
    use crate::persistence::MemoryStore;

    #[test]
    fn test_unlock_counts_secret_once() {
        let mut profile = Profile::default();
        assert!(profile.unlock_achievement(&COMBO_5, 1.0));
        assert!(!profile.unlock_achievement(&COMBO_5, 2.0));
        assert_eq!(profile.secrets_found(), 1);
        assert_eq!(profile.ledger.achievements().len(), 1);
    }

    #[test]
    fn test_flush_and_reload() {
        let mut store = MemoryStore::new();
        let mut profile = Profile::default();
        profile.ledger.unlock_code(SecretCode::Combo);
        profile.unlock_achievement(&COMBO_5, 5.0);
        profile.flush(&mut store);

        let loaded = Profile::load(&store);
        assert!(loaded.ledger.has_code(SecretCode::Combo));
        assert!(loaded.ledger.has_achievement("combo5"));
        assert_eq!(loaded.stats.secrets_found, 1);
    }

    #[test]
    fn test_flush_skips_clean_documents() {
        let mut store = MemoryStore::new();
        let mut profile = Profile::default();
        profile.flush(&mut store);
        assert!(store.is_empty());
    }
}
