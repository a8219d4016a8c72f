//! Transcript reading and extraction
//!
//! Turns a session's JSONL transcript into the inputs of a snapshot:
//!
//! 1. [`tail`] yields the non-empty lines of the transcript's tail
//! 2. [`classify`] decides whether each line is genuine user input, an
//!    assistant record, or noise
//! 3. [`signals`] pulls text, checklist lines and tool summaries out of
//!    assistant records
//! 4. [`aggregate`] drives the above in one forward pass
//!
//! Individual lines never fail the pass; they are classified as
//! [`SkipReason`]s and counted.

pub mod aggregate;
pub mod classify;
pub mod record;
pub mod signals;
pub mod tail;

pub use aggregate::{ScanStats, Transcript};
pub use classify::{classify_line, Classification, SkipReason};
pub use signals::{summarize_tool, AssistantSignals};
