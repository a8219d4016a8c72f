//! # compact-guardian-core
//!
//! Core library for compact-guardian - a pre-compaction context snapshot hook.
//!
//! Before an assistant session is compacted, the hook reads the session's
//! JSONL transcript and saves a bounded Markdown digest of recent state, so
//! the compacted summary can be checked for dropped work.
//!
//! This library provides:
//! - Tail reading and classification of transcript records
//! - Extraction of checklist lines and tool summaries from assistant output
//! - Rendering of the size-bounded snapshot document
//! - Snapshot storage with a staleness sweep
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Example
//!
//! ```rust,no_run
//! use compact_guardian_core::{pipeline, Config, HookInput};
//!
//! let config = Config::load().expect("failed to load config");
//! let input = HookInput::from_reader(std::io::stdin()).expect("bad hook input");
//! let outcome = pipeline::run(&input, &config).expect("snapshot failed");
//! println!("{:?}", outcome);
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use error::{Error, Result};
pub use hook::HookInput;
pub use pipeline::Outcome;
pub use snapshot::{SnapshotMeta, SnapshotStore};
pub use transcript::Transcript;

// Public modules
pub mod config;
pub mod error;
pub mod format;
pub mod hook;
pub mod logging;
pub mod pipeline;
pub mod snapshot;
pub mod transcript;
