//! Hook input received on stdin.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::io::Read;
use std::path::PathBuf;

/// JSON object the hook runner writes to stdin before compaction.
///
/// Every field is optional on the wire; unknown fields are ignored.
#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct HookInput {
    pub session_id: String,
    pub transcript_path: Option<PathBuf>,
    /// Working directory, shown in the snapshot header only
    pub cwd: String,
    /// e.g. "PreCompact"
    pub hook_event_name: Option<String>,
    /// "manual" or "auto"
    pub trigger: Option<String>,
}

impl HookInput {
    /// Parse one JSON object from `reader`.
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        serde_json::from_reader(reader)
            .map_err(|e| Error::InvalidInput(format!("failed to parse stdin JSON: {}", e)))
    }

    /// Transcript path, treating an empty string as absent.
    pub fn transcript(&self) -> Option<&PathBuf> {
        self.transcript_path
            .as_ref()
            .filter(|path| !path.as_os_str().is_empty())
    }
}
