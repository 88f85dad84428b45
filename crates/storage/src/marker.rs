// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persisted "store is down until" marker

use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors reading or writing the down-marker
#[derive(Debug, Error)]
pub enum MarkerError {
    #[error("down-marker {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("down-marker {path} holds no timestamp: {content:?}")]
    Corrupt { path: PathBuf, content: String },
}

/// Durable storage for a single "down until" epoch timestamp (seconds)
///
/// Every process on the host shares the same marker, so a process that
/// starts while the store is known to be down inherits that knowledge.
pub trait DownMarkerStore: Send + Sync {
    /// Read the marker, `None` if it was never written or has been cleared
    fn load(&self) -> Result<Option<i64>, MarkerError>;

    /// Overwrite the marker
    fn store(&self, until: i64) -> Result<(), MarkerError>;

    /// Remove the marker; clearing an absent marker succeeds
    fn clear(&self) -> Result<(), MarkerError>;
}

/// Down-marker kept as plain text in a local file
#[derive(Debug, Clone)]
pub struct FileDownMarker {
    path: PathBuf,
}

impl FileDownMarker {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> MarkerError {
        MarkerError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl DownMarkerStore for FileDownMarker {
    fn load(&self) -> Result<Option<i64>, MarkerError> {
        let mut file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        FileExt::lock_shared(&file).map_err(|e| self.io_error(e))?;
        let mut content = String::new();
        let read = file.read_to_string(&mut content);
        let _ = FileExt::unlock(&file);
        read.map_err(|e| self.io_error(e))?;

        // An empty file is a write that never completed
        let trimmed = content.trim();
        trimmed
            .parse::<i64>()
            .map(Some)
            .map_err(|_| MarkerError::Corrupt {
                path: self.path.clone(),
                content: trimmed.to_string(),
            })
    }

    fn store(&self, until: i64) -> Result<(), MarkerError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        // Truncate only once the lock is held so readers never see a torn value
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;
        file.lock_exclusive().map_err(|e| self.io_error(e))?;

        let written = write_locked(&mut file, until);
        let _ = FileExt::unlock(&file);
        written.map_err(|e| self.io_error(e))
    }

    fn clear(&self) -> Result<(), MarkerError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

fn write_locked(file: &mut File, until: i64) -> io::Result<()> {
    file.set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    writeln!(file, "{until}")?;
    file.sync_all()
}

#[cfg(test)]
#[path = "marker_tests.rs"]
mod tests;
