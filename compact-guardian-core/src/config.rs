//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/compact-guardian/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/compact-guardian/` (~/.config/compact-guardian/)
//! - State/Logs: `$XDG_STATE_HOME/compact-guardian/` (~/.local/state/compact-guardian/)
//!
//! Snapshots themselves are written next to the assistant's own data
//! (`~/.claude` unless `snapshot.dir` overrides it).

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Returns a best-effort home directory path.
pub(crate) fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
///
/// Built once at process start and handed to every stage by reference.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    /// Size caps for reading and rendering
    #[serde(default)]
    pub limits: Limits,

    /// Genuineness filters and tool summary keys
    #[serde(default)]
    pub filters: FilterConfig,

    /// Where snapshots live and when they go stale
    #[serde(default)]
    pub snapshot: SnapshotConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Size caps applied while reading the transcript and rendering the snapshot.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Limits {
    /// Only the last `tail_bytes` of a transcript are read
    pub tail_bytes: u64,
    /// Most recent user messages to render
    pub max_user_messages: usize,
    /// Most recent tool summaries to render
    pub max_tool_calls: usize,
    /// Deduplicated checklist lines to render
    pub max_checklist_items: usize,
    /// Characters kept per user message
    pub max_user_msg_len: usize,
    /// Characters kept of the last assistant response
    pub max_ai_text_len: usize,
    /// Hard cap on the rendered document, in bytes
    pub max_output_len: usize,
    /// Characters kept of the salient tool argument
    pub max_tool_arg_len: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            tail_bytes: 2 * 1024 * 1024,
            max_user_messages: 5,
            max_tool_calls: 20,
            max_checklist_items: 20,
            max_user_msg_len: 1500,
            max_ai_text_len: 1000,
            max_output_len: 12000,
            max_tool_arg_len: 80,
        }
    }
}

/// Smallest usable `max_output_len`: the truncation marker plus some text.
pub const MIN_OUTPUT_LEN: usize = 64;

impl Limits {
    /// Reject limits the renderer cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.max_output_len < MIN_OUTPUT_LEN {
            return Err(Error::Config(format!(
                "limits.max_output_len must be at least {} bytes, got {}",
                MIN_OUTPUT_LEN, self.max_output_len
            )));
        }
        Ok(())
    }
}

/// Substring and prefix rules that separate typed user input from injected content.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct FilterConfig {
    /// Markers of system-injected content carried in user records
    pub system_markers: Vec<String>,
    /// User text starting with any of these is not genuine input
    pub skip_prefixes: Vec<String>,
    /// Tool arguments consulted, in order, when summarizing a tool call
    pub tool_summary_keys: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            system_markers: to_strings(DEFAULT_SYSTEM_MARKERS),
            skip_prefixes: to_strings(DEFAULT_SKIP_PREFIXES),
            tool_summary_keys: to_strings(DEFAULT_TOOL_SUMMARY_KEYS),
        }
    }
}

/// Markers the assistant runtime wraps around non-human content.
pub const DEFAULT_SYSTEM_MARKERS: &[&str] = &[
    "<local-command-caveat>",
    "<command-name>",
    "<local-command-stdout>",
    "<system-reminder>",
    "<user-prompt-submit-hook>",
];

pub const DEFAULT_SKIP_PREFIXES: &[&str] = &[
    "[Request interrupted",
    "This session is being continued from",
];

/// Priority order for the argument shown next to a tool name.
pub const DEFAULT_TOOL_SUMMARY_KEYS: &[&str] = &[
    "file_path",
    "command",
    "pattern",
    "description",
    "query",
    "url",
    "subject",
    "notebook_path",
];

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Snapshot storage configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SnapshotConfig {
    /// Override for the snapshot directory (default `~/.claude`)
    pub dir: Option<PathBuf>,

    /// Snapshots older than this many seconds are swept
    #[serde(default = "default_stale_seconds")]
    pub stale_seconds: u64,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            dir: None,
            stale_seconds: default_stale_seconds(),
        }
    }
}

impl SnapshotConfig {
    /// Directory snapshots are written to.
    pub fn resolved_dir(&self) -> PathBuf {
        self.dir
            .clone()
            .unwrap_or_else(|| home_dir().join(".claude"))
    }

    pub fn stale_after(&self) -> Duration {
        Duration::from_secs(self.stale_seconds)
    }
}

fn default_stale_seconds() -> u64 {
    600
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::debug!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        config.limits.validate()?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/compact-guardian/config.toml` (~/.config/compact-guardian/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("compact-guardian").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/compact-guardian/` (~/.local/state/compact-guardian/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("compact-guardian")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/compact-guardian/compact-guardian.log`
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("compact-guardian.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.limits.max_user_messages, 5);
        assert_eq!(config.limits.max_tool_calls, 20);
        assert_eq!(config.limits.max_output_len, 12000);
        assert_eq!(config.limits.tail_bytes, 2 * 1024 * 1024);
        assert_eq!(config.snapshot.stale_seconds, 600);
        assert!(config.snapshot.dir.is_none());
        assert_eq!(config.filters.tool_summary_keys[0], "file_path");
        assert_eq!(config.filters.system_markers.len(), 5);
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[limits]
max_user_messages = 3
max_output_len = 4000

[snapshot]
dir = "/tmp/snapshots"
stale_seconds = 60

[logging]
level = "debug"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.limits.max_user_messages, 3);
        assert_eq!(config.limits.max_output_len, 4000);
        // Unspecified limits keep their defaults
        assert_eq!(config.limits.max_tool_calls, 20);
        assert_eq!(
            config.snapshot.resolved_dir(),
            PathBuf::from("/tmp/snapshots")
        );
        assert_eq!(config.snapshot.stale_after(), Duration::from_secs(60));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.filters, FilterConfig::default());
    }

    #[test]
    fn test_parse_filters_override() {
        let toml = r#"
[filters]
system_markers = ["<injected>"]
tool_summary_keys = ["path"]
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.filters.system_markers, vec!["<injected>"]);
        assert_eq!(config.filters.tool_summary_keys, vec!["path"]);
        assert_eq!(
            config.filters.skip_prefixes,
            to_strings(DEFAULT_SKIP_PREFIXES)
        );
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = Config::load_from(Path::new("/nonexistent/compact-guardian.toml"))
            .expect_err("missing file should fail");
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_load_from_rejects_tiny_output_cap() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[limits]\nmax_output_len = 10\n").unwrap();

        let err = Config::load_from(&path).expect_err("cap below minimum");
        assert!(matches!(err, Error::Config(msg) if msg.contains("max_output_len")));
    }

    #[test]
    fn test_load_from_valid_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[limits]\nmax_output_len = 64\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.limits.max_output_len, MIN_OUTPUT_LEN);
    }

    #[test]
    fn test_log_path() {
        assert!(Config::log_path().ends_with("compact-guardian.log"));
    }
}
