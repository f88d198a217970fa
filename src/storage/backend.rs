// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! String key-value backends for persisted session state.
//!
//! A backend behaves like browser local storage: flat string keys mapped to
//! string values. Writes go through a [`WriteBatch`] which is applied as one
//! unit, so a reader never sees half of a multi-key update.
//!
//! - [`MemoryBackend`] keeps everything in process (tests, ephemeral runs).
//! - [`FileBackend`] mirrors the map into a JSON file, replacing it with a
//!   temp-file + rename on every commit.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Error type for session storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A stored value exists but does not have the expected shape.
    #[error("Corrupt value under key `{key}`: {reason}")]
    Corrupt { key: String, reason: String },
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum WriteOp {
    Set(String, String),
    Remove(String),
}

/// An ordered set of mutations committed together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.ops.push(WriteOp::Set(key.into(), value.into()));
        self
    }

    pub fn remove(mut self, key: impl Into<String>) -> Self {
        self.ops.push(WriteOp::Remove(key.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    fn apply_to(self, entries: &mut BTreeMap<String, String>) {
        for op in self.ops {
            match op {
                WriteOp::Set(key, value) => {
                    entries.insert(key, value);
                }
                WriteOp::Remove(key) => {
                    entries.remove(&key);
                }
            }
        }
    }
}

/// Key-value persistence used by the credential store and the cookie jar.
pub trait StorageBackend: Send {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Apply every operation in `batch` or none of them.
    fn commit(&mut self, batch: WriteBatch) -> StorageResult<()>;
}

// =============================================================================
// In-memory backend
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    entries: BTreeMap<String, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a backend with existing entries.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl StorageBackend for MemoryBackend {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn commit(&mut self, batch: WriteBatch) -> StorageResult<()> {
        batch.apply_to(&mut self.entries);
        Ok(())
    }
}

// =============================================================================
// File backend
// =============================================================================

/// JSON-file backed store. The whole map is loaded on open.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileBackend {
    /// Open (or lazily create) the store at `path`.
    ///
    /// A missing file is an empty store; the file is only created on the
    /// first commit.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = match File::open(&path) {
            Ok(file) => serde_json::from_reader(BufReader::new(file))?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Write to temp file first, then rename for atomicity
        let temp_path = self.path.with_extension("tmp");
        {
            let file = File::create(&temp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, entries)?;
            writer.flush()?;
        }

        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

impl StorageBackend for FileBackend {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn commit(&mut self, batch: WriteBatch) -> StorageResult<()> {
        if batch.is_empty() {
            return Ok(());
        }
        let mut next = self.entries.clone();
        batch.apply_to(&mut next);
        // Memory only changes once the file is in place.
        self.persist(&next)?;
        self.entries = next;
        Ok(())
    }
}
