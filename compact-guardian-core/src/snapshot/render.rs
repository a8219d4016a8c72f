//! Markdown rendering of a pre-compaction snapshot.

use crate::config::{Limits, MIN_OUTPUT_LEN};
use crate::format::{ellipsize, floor_bytes, take_chars};
use crate::transcript::signals::checklist_identity;
use crate::transcript::Transcript;
use chrono::NaiveDateTime;
use std::collections::HashMap;

/// Appended when the document had to be cut to fit `max_output_len`.
pub const TRUNCATION_MARKER: &str = "\n\n*[snapshot truncated]*";

/// Room reserved at the end of a truncated document for the marker.
const TRUNCATION_RESERVE: usize = 40;

/// Session details shown in the snapshot header.
#[derive(Debug, Clone)]
pub struct SnapshotMeta {
    /// Opaque session id; may be empty
    pub session_id: String,
    /// Working directory, display only
    pub cwd: String,
    /// Local time the snapshot was rendered
    pub generated_at: NaiveDateTime,
}

impl SnapshotMeta {
    /// First eight characters of the session id, or "unknown".
    pub fn short_session_id(&self) -> &str {
        if self.session_id.is_empty() {
            "unknown"
        } else {
            take_chars(&self.session_id, 8)
        }
    }
}

/// Render the snapshot document.
///
/// Returns `None` when the transcript has no genuine user message, in which
/// case nothing should be persisted. A `max_output_len` below
/// [`MIN_OUTPUT_LEN`] is raised to it.
pub fn render(transcript: &Transcript, meta: &SnapshotMeta, limits: &Limits) -> Option<String> {
    if transcript.user_messages.is_empty() {
        return None;
    }

    let recent_msgs = last_n(&transcript.user_messages, limits.max_user_messages);
    let recent_tools = last_n(&transcript.tool_summaries, limits.max_tool_calls);
    let checklist = dedup_checklist(&transcript.checklist_lines, limits.max_checklist_items);

    let mut lines: Vec<String> = vec![
        "# Pre-Compaction Context Snapshot".into(),
        String::new(),
        "> **IMPORTANT**: Cross-check the compact summary against data below.".into(),
        "> If the summary claims a task is done but no matching actions appear here, treat it as NOT done.".into(),
        "> Resume work from where this snapshot shows.".into(),
        String::new(),
        format!(
            "> {} | Session: {} | CWD: {}",
            meta.generated_at.format("%Y-%m-%d %H:%M:%S"),
            meta.short_session_id(),
            meta.cwd
        ),
        String::new(),
        "## Recent User Instructions".into(),
        String::new(),
    ];

    for (i, text) in recent_msgs.iter().enumerate() {
        let n = i + 1;
        let label = if n < recent_msgs.len() {
            format!("**[{}]**", n)
        } else {
            format!("**[{}] (latest)**", n)
        };
        lines.push(label);
        lines.push(ellipsize(text, limits.max_user_msg_len).into_owned());
        lines.push(String::new());
    }

    let last_text = transcript.last_assistant_text.as_deref();
    if last_text.is_some() || !checklist.is_empty() {
        lines.push("## AI Progress".into());
        lines.push(String::new());
        if !checklist.is_empty() {
            lines.extend(checklist.iter().map(|line| line.to_string()));
            lines.push(String::new());
        }
        if let Some(text) = last_text {
            lines.push("**Last response:**".into());
            lines.push(ellipsize(text, limits.max_ai_text_len).into_owned());
            lines.push(String::new());
        }
    }

    if !recent_tools.is_empty() {
        lines.push("## Recent Actions".into());
        lines.push(String::new());
        lines.extend(recent_tools.iter().map(|tool| format!("- {}", tool)));
        lines.push(String::new());
    }

    Some(cap_output(lines.join("\n"), limits.max_output_len))
}

/// Latest state of each checklist item, in first-seen order, capped to the
/// last `max` items.
pub fn dedup_checklist(lines: &[String], max: usize) -> Vec<&str> {
    let mut items: Vec<&str> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for line in lines {
        let key = checklist_identity(line);
        match positions.get(key) {
            Some(&pos) => items[pos] = line.as_str(),
            None => {
                positions.insert(key, items.len());
                items.push(line.as_str());
            }
        }
    }

    let start = items.len().saturating_sub(max);
    items.split_off(start)
}

fn last_n<T>(items: &[T], n: usize) -> &[T] {
    &items[items.len().saturating_sub(n)..]
}

fn cap_output(output: String, max_len: usize) -> String {
    let max_len = max_len.max(MIN_OUTPUT_LEN);
    if output.len() <= max_len {
        return output;
    }
    let kept = floor_bytes(&output, max_len.saturating_sub(TRUNCATION_RESERVE));
    format!("{}{}", kept, TRUNCATION_MARKER)
}
