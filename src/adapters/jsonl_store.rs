//! JSON-lines archive adapter.
//!
//! Implements [`ArchivePort`] with one append-only file per key:
//!
//! ```text
//! archive/
//! ├── 2024-03-08.jsonl
//! └── 2024-03-09.jsonl   ← one line per slow tick
//! ```
//!
//! Each `put` opens, appends and closes the file, so a crash loses at most
//! the record being written.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::app::ports::{ArchivePort, StoreError};
use crate::archive::ArchiveSnapshot;

pub struct JsonlArchive {
    root_dir: PathBuf,
}

impl JsonlArchive {
    /// Open (and create if needed) an archive rooted at `root_dir`.
    pub fn open(root_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root_dir = root_dir.into();
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir).map_err(|e| {
                warn!("Archive: cannot create {}: {}", root_dir.display(), e);
                StoreError::Unavailable
            })?;
        }
        Ok(Self { root_dir })
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// File holding every record for `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root_dir.join(format!("{key}.jsonl"))
    }

    /// Read back every record stored under `key`.
    pub fn load(&self, key: &str) -> Result<Vec<ArchiveSnapshot>, StoreError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(path).map_err(|_| StoreError::IoError)?;
        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(|_| StoreError::Encode))
            .collect()
    }
}

impl ArchivePort for JsonlArchive {
    fn put(&mut self, key: &str, record: &ArchiveSnapshot) -> Result<(), StoreError> {
        // Keys become file names.
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(StoreError::Encode);
        }

        let mut line = serde_json::to_string(record).map_err(|_| StoreError::Encode)?;
        line.push('\n');

        let path = self.path_for(key);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                warn!("Archive: open {} failed: {}", path.display(), e);
                StoreError::IoError
            })?;
        file.write_all(line.as_bytes()).map_err(|e| {
            warn!("Archive: write {} failed: {}", path.display(), e);
            StoreError::IoError
        })?;
        debug!("Archive: appended to {}", path.display());
        Ok(())
    }
}
