//! Integration tests for Creator Market.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p creator-market-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `storefront_flows` - Cart, wishlist and checkout across the app context
//! - `session_flows` - Login, signup and logout across restarts
//!
//! Every test runs against a fresh temporary data directory, so "restarting"
//! the app means opening a second [`AppState`] on the same directory.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::Path;
use std::time::Duration;

use secrecy::SecretString;
use tempfile::TempDir;

use creator_market_storefront::{AppState, StorefrontConfig};

/// A temporary data directory plus helpers to open the app on it.
pub struct TestContext {
    dir: TempDir,
}

impl TestContext {
    /// Create an empty data directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    /// Directory holding the persisted state.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        self.dir.path()
    }

    /// Configuration pointing at the data directory, with no simulated latency.
    #[must_use]
    pub fn config(&self) -> StorefrontConfig {
        StorefrontConfig {
            data_dir: self.dir.path().to_path_buf(),
            auth_latency: Duration::ZERO,
            checkout_latency: Duration::ZERO,
            ..StorefrontConfig::default()
        }
    }

    /// Open (or reopen) the app on the data directory.
    ///
    /// # Panics
    ///
    /// Panics if persisted state cannot be read.
    #[must_use]
    pub fn open(&self) -> AppState {
        AppState::open(self.config()).expect("Failed to open app state")
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Wrap a test password.
#[must_use]
pub fn secret(raw: &str) -> SecretString {
    SecretString::from(raw.to_owned())
}
