//! Record classification and user-input genuineness filters.
//!
//! User records are overloaded: besides what a person typed they carry tool
//! results, hook output and system reminders. Only typed input is kept.

use crate::config::{FilterConfig, Limits};
use crate::transcript::record::{ContentBlock, LogRecord, MessageContent};
use crate::transcript::signals::{extract_assistant, AssistantSignals};
use std::fmt;

/// Outcome of classifying one transcript line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Genuine, cleaned user input
    User(String),
    /// Signals from an assistant record
    Assistant(AssistantSignals),
    /// Line contributes nothing
    Skipped(SkipReason),
}

/// Why a line was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SkipReason {
    /// Not valid JSON, or not shaped like a record
    Malformed,
    /// Neither a user nor an assistant record
    OtherKind,
    /// User record carrying tool output
    ToolResult,
    /// No text left after filtering
    Empty,
    /// "[Request interrupted ..." notices
    Interrupted,
    /// Continuation preamble injected after a previous compaction
    ContinuationPreamble,
    /// Contains a system marker
    SystemInjected,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::Malformed => "malformed",
            SkipReason::OtherKind => "other_kind",
            SkipReason::ToolResult => "tool_result",
            SkipReason::Empty => "empty",
            SkipReason::Interrupted => "interrupted",
            SkipReason::ContinuationPreamble => "continuation_preamble",
            SkipReason::SystemInjected => "system_injected",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify one raw transcript line.
pub fn classify_line(line: &str, filters: &FilterConfig, limits: &Limits) -> Classification {
    match LogRecord::parse(line) {
        Ok(LogRecord::User(envelope)) => match genuine_user_text(envelope.content(), filters) {
            Ok(text) => Classification::User(text),
            Err(reason) => Classification::Skipped(reason),
        },
        Ok(LogRecord::Assistant(envelope)) => {
            Classification::Assistant(extract_assistant(envelope.content(), filters, limits))
        }
        Ok(LogRecord::Other) => Classification::Skipped(SkipReason::OtherKind),
        Err(_) => Classification::Skipped(SkipReason::Malformed),
    }
}

/// Text a person actually typed, or the reason the content is not that.
pub fn genuine_user_text(
    content: Option<&MessageContent>,
    filters: &FilterConfig,
) -> Result<String, SkipReason> {
    let text = match content {
        Some(MessageContent::PlainText(text)) => text.trim().to_string(),
        Some(blocks @ MessageContent::Blocks(_)) => joined_text_blocks(blocks, filters)?,
        Some(MessageContent::Unrecognized(_)) | None => String::new(),
    };

    if text.is_empty() {
        return Err(SkipReason::Empty);
    }
    if let Some(prefix) = filters
        .skip_prefixes
        .iter()
        .find(|prefix| text.starts_with(prefix.as_str()))
    {
        return Err(prefix_reason(prefix));
    }
    if has_system_marker(&text, filters) {
        return Err(SkipReason::SystemInjected);
    }

    Ok(text)
}

/// Non-empty, marker-free text blocks joined by newlines.
fn joined_text_blocks(
    content: &MessageContent,
    filters: &FilterConfig,
) -> Result<String, SkipReason> {
    if content
        .blocks()
        .any(|block| matches!(block, ContentBlock::ToolResult))
    {
        return Err(SkipReason::ToolResult);
    }

    Ok(content
        .blocks()
        .filter_map(|block| match block {
            ContentBlock::Text { text } => Some(text.trim()),
            _ => None,
        })
        .filter(|text| !text.is_empty() && !has_system_marker(text, filters))
        .collect::<Vec<_>>()
        .join("\n"))
}

fn has_system_marker(text: &str, filters: &FilterConfig) -> bool {
    filters
        .system_markers
        .iter()
        .any(|marker| text.contains(marker.as_str()))
}

fn prefix_reason(prefix: &str) -> SkipReason {
    if prefix.starts_with("[Request interrupted") {
        SkipReason::Interrupted
    } else if prefix.starts_with("This session is being continued") {
        SkipReason::ContinuationPreamble
    } else {
        SkipReason::SystemInjected
    }
}
