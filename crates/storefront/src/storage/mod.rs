//! Local key/value storage for store state.
//!
//! # Layout
//!
//! Every store persists its state as JSON under its own key (see
//! [`crate::models::keys`]). The bytes are held by a [`KeyValueStore`]
//! backend; [`Repository`] is the typed view of a single key that stores
//! load from at startup and save to after every mutation.
//!
//! ## Backends
//!
//! - [`FileStore`] - one `<key>.json` file per key in a data directory
//! - [`MemoryStore`] - shared in-process map (tests, throwaway sessions)
//!
//! ## Envelope
//!
//! Values are wrapped as `{"state": ..., "version": N}`. A payload written
//! with a different version, or one that no longer decodes, is discarded
//! with a warning and the store starts empty.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Current envelope version for persisted state.
pub const STATE_VERSION: u32 = 0;

/// Errors from a storage backend.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Reading or writing the backing medium failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// State could not be encoded as JSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Key contains characters the backend cannot store.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}

/// A string key/value storage backend.
///
/// Writes are synchronous and last-writer-wins.
pub trait KeyValueStore: Send + Sync + fmt::Debug {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, RepositoryError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), RepositoryError>;

    /// Remove `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), RepositoryError>;
}

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    state: &'a T,
    version: u32,
}

#[derive(Deserialize)]
struct Envelope<T> {
    state: T,
    version: u32,
}

/// Typed JSON repository over a single storage key.
pub struct Repository<T> {
    store: Arc<dyn KeyValueStore>,
    key: &'static str,
    _state: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            key: self.key,
            _state: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Repository<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("key", &self.key)
            .field("store", &self.store)
            .finish()
    }
}

impl<T: Serialize + DeserializeOwned> Repository<T> {
    /// Create a repository for `key` on the given backend.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, key: &'static str) -> Self {
        Self {
            store,
            key,
            _state: PhantomData,
        }
    }

    /// Storage key this repository reads and writes.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        self.key
    }

    /// Load the persisted state.
    ///
    /// Returns `Ok(None)` when nothing is stored, or when the stored payload
    /// is from another version or fails to decode.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` only if the backend itself fails.
    pub fn load(&self) -> Result<Option<T>, RepositoryError> {
        let Some(raw) = self.store.get(self.key)? else {
            return Ok(None);
        };

        match serde_json::from_str::<Envelope<T>>(&raw) {
            Ok(envelope) if envelope.version == STATE_VERSION => Ok(Some(envelope.state)),
            Ok(envelope) => {
                tracing::warn!(
                    key = self.key,
                    found = envelope.version,
                    expected = STATE_VERSION,
                    "Discarding persisted state with unknown version"
                );
                Ok(None)
            }
            Err(e) => {
                tracing::warn!(key = self.key, error = %e, "Discarding unreadable persisted state");
                Ok(None)
            }
        }
    }

    /// Persist `state`, replacing what was stored before.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if encoding or the backend write fails.
    pub fn save(&self, state: &T) -> Result<(), RepositoryError> {
        let json = serde_json::to_string(&EnvelopeRef {
            state,
            version: STATE_VERSION,
        })?;
        self.store.set(self.key, &json)?;
        tracing::debug!(key = self.key, bytes = json.len(), "State persisted");
        Ok(())
    }

    /// Remove the persisted state.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the backend write fails.
    pub fn clear(&self) -> Result<(), RepositoryError> {
        self.store.remove(self.key)
    }
}
