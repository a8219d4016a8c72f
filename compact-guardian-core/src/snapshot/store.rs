//! Snapshot persistence and the staleness sweep.

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

const FILE_PREFIX: &str = "compact-snapshot";

/// Directory of snapshot files, keyed by session id.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the snapshot for `session_id`.
    ///
    /// `compact-snapshot-<id>.md`, or `compact-snapshot.md` without an id.
    pub fn path_for(&self, session_id: &str) -> PathBuf {
        let name = if session_id.is_empty() {
            format!("{}.md", FILE_PREFIX)
        } else {
            format!("{}-{}.md", FILE_PREFIX, session_id)
        };
        self.dir.join(name)
    }

    /// Write `document`, replacing any earlier snapshot for the session.
    pub fn persist(&self, document: &str, session_id: &str) -> Result<PathBuf> {
        let path = self.path_for(session_id);

        fs::create_dir_all(&self.dir).map_err(|source| Error::Write {
            path: self.dir.clone(),
            source,
        })?;
        fs::write(&path, document).map_err(|source| Error::Write {
            path: path.clone(),
            source,
        })?;

        tracing::info!(
            path = %path.display(),
            bytes = document.len(),
            "Snapshot written"
        );
        Ok(path)
    }

    /// Remove session snapshots last modified more than `max_age` ago.
    ///
    /// Best effort: files that cannot be inspected or removed are left in
    /// place. Returns the number of files removed.
    pub fn prune_stale(&self, max_age: Duration) -> usize {
        self.prune_stale_at(max_age, SystemTime::now())
    }

    fn prune_stale_at(&self, max_age: Duration, now: SystemTime) -> usize {
        // The directory part is literal, only the file name is a pattern
        let dir = glob::Pattern::escape(&self.dir.to_string_lossy());
        let pattern = Path::new(&dir).join(format!("{}-*.md", FILE_PREFIX));

        let entries = match glob::glob(&pattern.to_string_lossy()) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!(error = %e, "Invalid snapshot pattern, skipping sweep");
                return 0;
            }
        };

        let mut removed = 0;
        for path in entries.flatten() {
            let is_stale = fs::metadata(&path)
                .and_then(|m| m.modified())
                .ok()
                .and_then(|modified| now.duration_since(modified).ok())
                .is_some_and(|age| age > max_age);
            if !is_stale {
                continue;
            }

            match fs::remove_file(&path) {
                Ok(()) => {
                    tracing::debug!(path = %path.display(), "Removed stale snapshot");
                    removed += 1;
                }
                Err(e) => {
                    tracing::debug!(
                        path = %path.display(),
                        error = %e,
                        "Failed to remove stale snapshot"
                    );
                }
            }
        }

        removed
    }
}
