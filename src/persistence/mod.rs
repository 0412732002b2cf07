//! Leaderboard persistence
//!
//! A store is an append-only table of (name, score) rows. The file store
//! keeps one JSON object per line and creates the file on first write.

use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use thiserror::Error;

use crate::leaderboard::LeaderboardEntry;

/// Storage failures
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("leaderboard storage at '{path}' unavailable: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("bad leaderboard row {line} in '{path}': {source}")]
    Parse {
        path: String,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Append-only (name, score) table
pub trait LeaderboardStore {
    /// Write one finished session's result
    fn append(&mut self, entry: &LeaderboardEntry) -> Result<(), StoreError>;

    /// Every row ever written, in write order
    fn load_all(&self) -> Result<Vec<LeaderboardEntry>, StoreError>;
}

/// In-process store, for tests and hosts without a filesystem
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    rows: Vec<LeaderboardEntry>,
}

impl LeaderboardStore for MemoryStore {
    fn append(&mut self, entry: &LeaderboardEntry) -> Result<(), StoreError> {
        self.rows.push(entry.clone());
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<LeaderboardEntry>, StoreError> {
        Ok(self.rows.clone())
    }
}

/// JSON-lines file store
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl LeaderboardStore for JsonFileStore {
    fn append(&mut self, entry: &LeaderboardEntry) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let mut line = serde_json::to_string(entry).map_err(|source| StoreError::Parse {
            path: self.path.display().to_string(),
            line: 0,
            source,
        })?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;
        file.write_all(line.as_bytes())
            .map_err(|e| self.io_error(e))?;

        log::info!(
            "Saved score {} for {} to {}",
            entry.score,
            entry.name,
            self.path.display()
        );
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<LeaderboardEntry>, StoreError> {
        let file = match fs::File::open(&self.path) {
            Ok(file) => file,
            // Nothing written yet
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        let mut rows = Vec::new();
        for (i, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| self.io_error(e))?;
            if line.trim().is_empty() {
                continue;
            }
            let entry: LeaderboardEntry = serde_json::from_str(&line).map_err(|source| StoreError::Parse {
                path: self.path.display().to_string(),
                line: i + 1,
                source,
            })?;
            rows.push(entry);
        }
        Ok(rows)
    }
}
