// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Path constants and utilities for the on-device session layout.

use std::path::{Path, PathBuf};

/// Default directory for persisted session state (relative to the CWD).
pub const DATA_ROOT: &str = ".tradebot";

/// File holding the credential store keys (`accountsList`, `authToken`, ...).
pub const SESSION_FILE: &str = "session.json";

/// File holding cookie-style flags (`logged_state`).
pub const COOKIES_FILE: &str = "cookies.json";

/// Storage path utilities for the session directory.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl Default for StoragePaths {
    fn default() -> Self {
        Self::new(DATA_ROOT)
    }
}

impl StoragePaths {
    /// Create a new StoragePaths with a custom root (useful for testing).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory for all session data.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to the credential store file.
    pub fn session_file(&self) -> PathBuf {
        self.root.join(SESSION_FILE)
    }

    /// Path to the cookie jar file.
    pub fn cookies_file(&self) -> PathBuf {
        self.root.join(COOKIES_FILE)
    }
}
