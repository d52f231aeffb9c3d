//! Key-value document persistence
//!
//! Features:
//! - JSON documents stored under fixed keys (stats, ledger, settings)
//! - Missing or corrupt documents fall back to defaults
//! - Storage failures are logged, never propagated into the simulation

pub mod memory;

#[cfg(not(target_arch = "wasm32"))]
pub mod file;

#[cfg(target_arch = "wasm32")]
pub mod local;

pub use memory::MemoryStore;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;

#[cfg(target_arch = "wasm32")]
pub use local::LocalStore;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Storage backend failures
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage backend is unavailable")]
    Unavailable,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("storage backend rejected the operation: {0}")]
    Backend(String),
}

/// Opaque string key-value store
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// Load a JSON document, falling back to `T::default()` when it is missing,
/// unreadable or corrupt.
pub fn load_document<T, S>(store: &S, key: &str) -> T
where
    T: DeserializeOwned + Default,
    S: KeyValueStore + ?Sized,
{
    match store.get(key) {
        Ok(Some(json)) => match serde_json::from_str(&json) {
            Ok(doc) => {
                log::info!("Loaded {}", key);
                doc
            }
            Err(e) => {
                log::warn!("Corrupt {} document ({}), using defaults", key, e);
                T::default()
            }
        },
        Ok(None) => {
            log::info!("No {} document found, starting fresh", key);
            T::default()
        }
        Err(e) => {
            log::warn!("Failed to read {} ({}), using defaults", key, e);
            T::default()
        }
    }
}

/// Save a JSON document. Failures are logged and swallowed.
///
/// Returns true if the write succeeded.
pub fn save_document<T, S>(store: &mut S, key: &str, doc: &T) -> bool
where
    T: Serialize,
    S: KeyValueStore + ?Sized,
{
    let json = match serde_json::to_string(doc) {
        Ok(json) => json,
        Err(e) => {
            log::warn!("Failed to encode {} ({})", key, e);
            return false;
        }
    };
    match store.set(key, &json) {
        Ok(()) => {
            log::debug!("Saved {}", key);
            true
        }
        Err(e) => {
            log::warn!("Failed to save {} ({})", key, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Difficulty, Settings};

    /// A store whose every call fails
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable)
        }
        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Backend("quota exceeded".into()))
        }
    }

    #[test]
    fn test_missing_document_is_default() {
        let store = MemoryStore::new();
        let settings: Settings = load_document(&store, Settings::STORAGE_KEY);
        assert_eq!(settings.difficulty, Difficulty::Medium);
    }

    #[test]
    fn test_corrupt_document_is_default() {
        let mut store = MemoryStore::new();
        store.set(Settings::STORAGE_KEY, "{not json").unwrap();
        let settings: Settings = load_document(&store, Settings::STORAGE_KEY);
        assert!(settings.sound);
    }

    #[test]
    fn test_roundtrip() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            difficulty: Difficulty::Hard,
            music: false,
            ..Default::default()
        };
        assert!(save_document(&mut store, Settings::STORAGE_KEY, &settings));
        let back: Settings = load_document(&store, Settings::STORAGE_KEY);
        assert_eq!(back.difficulty, Difficulty::Hard);
        assert!(!back.music);
    }

    #[test]
    fn test_broken_store_is_swallowed() {
        let mut store = BrokenStore;
        let settings: Settings = load_document(&store, Settings::STORAGE_KEY);
        assert!(settings.sound);
        assert!(!save_document(&mut store, Settings::STORAGE_KEY, &settings));
    }

    #[test]
    fn test_error_messages() {
        let err = StorageError::Backend("quota exceeded".into());
        assert_eq!(
            err.to_string(),
            "storage backend rejected the operation: quota exceeded"
        );
    }
}
