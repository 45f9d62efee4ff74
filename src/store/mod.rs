//! Local storage layer for Shunbun.
//!
//! Four repositories (channels, episodes, stored media records, transcripts)
//! persisted as pretty-printed JSON documents under one base directory:
//!
//! ```text
//! <base>/<channel_slug>/channel.json
//! <base>/<channel_slug>/<episode_slug>/episode.json
//! <base>/<channel_slug>/<episode_slug>/stored.json
//! <base>/<channel_slug>/<episode_slug>/transcript.json
//! <base>/<channel_slug>/<episode_slug>/media/
//! ```
//!
//! Relations are the directory placement itself; there is no index. Listing
//! is directory enumeration, which bounds the layer to what the filesystem
//! enumerates cheaply. The store performs no locking: exactly one writer
//! process per base directory is a deployment constraint.
//!
//! Loads distinguish "absent" (missing file or a document that fails
//! validation, both `Ok(None)`) from real I/O failures (`Err`). Aggregating
//! loads drop failed children after logging; the `*_report` variants keep
//! those failures visible.

mod channel;
mod episode;
mod stored;
mod transcript;

use crate::error::StoreError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::warn;

pub(crate) const CHANNEL_FILE: &str = "channel.json";
pub(crate) const EPISODE_FILE: &str = "episode.json";
pub(crate) const STORED_FILE: &str = "stored.json";
pub(crate) const TRANSCRIPT_FILE: &str = "transcript.json";
const MEDIA_DIR: &str = "media";

/// What happened to one item of a save batch.
#[derive(Debug)]
pub enum SaveStatus {
    /// The document was written at the given path.
    Written(PathBuf),
    /// Nothing was written; an equivalent document already exists.
    Skipped,
}

/// Per-item outcomes of a save batch.
///
/// `results` parallels the input list; one item's failure never aborts the
/// others. `saved` is the subset now durably present (written or skipped).
#[derive(Debug)]
pub struct SaveReport<T> {
    pub results: Vec<Result<SaveStatus, StoreError>>,
    pub saved: Vec<T>,
}

impl<T> SaveReport<T> {
    pub fn new() -> Self {
        Self {
            results: Vec::new(),
            saved: Vec::new(),
        }
    }

    pub fn all_ok(&self) -> bool {
        self.results.iter().all(|r| r.is_ok())
    }

    /// Number of items that resulted in an actual write.
    pub fn written(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r, Ok(SaveStatus::Written(_))))
            .count()
    }

    /// Number of items skipped as already present.
    pub fn skipped(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r, Ok(SaveStatus::Skipped)))
            .count()
    }
}

impl<T> Default for SaveReport<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// An aggregated load: the children that loaded plus the failures that were
/// dropped from the success-only view.
#[derive(Debug)]
pub struct LoadReport<T> {
    pub loaded: Vec<T>,
    pub failures: Vec<StoreError>,
}

impl<T> LoadReport<T> {
    pub fn new() -> Self {
        Self {
            loaded: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<T> Default for LoadReport<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The local store, rooted at one base directory.
#[derive(Debug, Clone)]
pub struct Store {
    base: PathBuf,
}

impl Store {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn channel_dir(&self, channel_slug: &str) -> PathBuf {
        self.base.join(channel_slug)
    }

    pub fn episode_dir(&self, channel_slug: &str, episode_slug: &str) -> PathBuf {
        self.base.join(channel_slug).join(episode_slug)
    }

    /// Directory holding an episode's recorded media files.
    pub fn media_dir(&self, channel_slug: &str, episode_slug: &str) -> PathBuf {
        self.episode_dir(channel_slug, episode_slug).join(MEDIA_DIR)
    }

    /// Read one JSON document. Missing files and documents that fail
    /// validation are both `Ok(None)`; only real I/O failures are errors.
    pub(crate) fn read_doc<T: DeserializeOwned>(
        &self,
        path: &Path,
    ) -> Result<Option<T>, StoreError> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StoreError::Io {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "document failed validation, treating as absent");
                Ok(None)
            }
        }
    }

    /// Write one JSON document, creating parent directories as needed.
    pub(crate) fn write_doc<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let json = serde_json::to_vec_pretty(value).map_err(|e| StoreError::Encode {
            path: path.to_path_buf(),
            source: e,
        })?;

        std::fs::write(path, json).map_err(|e| StoreError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Names of subdirectories of `path`. A missing directory is empty, not
    /// an error.
    pub(crate) fn subdirs(&self, path: &Path) -> Result<Vec<String>, StoreError> {
        let entries = match std::fs::read_dir(path) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StoreError::Io {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;
            let is_dir = entry
                .file_type()
                .map_err(|e| StoreError::Io {
                    path: entry.path(),
                    source: e,
                })?
                .is_dir();
            if is_dir {
                if let Ok(name) = entry.file_name().into_string() {
                    names.push(name);
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Channel;

    #[test]
    fn test_read_doc_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());
        let loaded: Option<Channel> = store.read_doc(&dir.path().join("nope.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_read_doc_invalid_document_is_none_not_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("channel.json");
        std::fs::write(&path, b"{\"slug\": 42}").unwrap();

        let store = Store::new(dir.path());
        let loaded: Option<Channel> = store.read_doc(&path).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_write_doc_creates_parents_and_pretty_prints() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());
        let channel = Channel::new("n", "http://e.example/feed");
        let path = dir.path().join("a").join("b").join("channel.json");

        store.write_doc(&path, &channel).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains('\n'), "documents are pretty-printed");
        let loaded: Option<Channel> = store.read_doc(&path).unwrap();
        assert_eq!(loaded.unwrap().slug, channel.slug);
    }

    #[test]
    fn test_subdirs_of_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());
        assert!(store.subdirs(&dir.path().join("missing")).unwrap().is_empty());
    }
}
