//! Progress signals pulled out of assistant records.
//!
//! Three things are extracted from each assistant record: its visible text,
//! checklist-style lines inside that text, and a one-line summary per tool
//! invocation.

use crate::config::{FilterConfig, Limits};
use crate::format::take_chars;
use crate::transcript::record::{ContentBlock, MessageContent};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// `- [ ] item`, `* [x] item`, `3. [X] item`, or a leading TODO/FIXME/HACK.
static CHECKLIST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[\-\*]\s*\[[ x]\]|^\d+\.\s*\[[ x]\]|^(TODO|FIXME|HACK)\b")
        .expect("checklist pattern is valid")
});

/// Leading bullet/number plus checkbox, stripped to get an item's identity.
static CHECKBOX_PREFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\-\*\d.]+\s*\[[ xX]\]\s*").expect("checkbox prefix pattern is valid")
});

/// Everything one assistant record contributes to the snapshot.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AssistantSignals {
    /// Non-empty text blocks joined by newlines; `None` when there are none
    pub text: Option<String>,
    /// Checklist lines from `text`, trimmed, in order
    pub checklist: Vec<String>,
    /// One summary per tool invocation, in order
    pub tools: Vec<String>,
}

/// Extract signals from an assistant record's content.
///
/// Only block-list content contributes; plain strings and unknown shapes
/// yield empty signals.
pub fn extract_assistant(
    content: Option<&MessageContent>,
    filters: &FilterConfig,
    limits: &Limits,
) -> AssistantSignals {
    let Some(content) = content else {
        return AssistantSignals::default();
    };

    let mut text_parts = Vec::new();
    let mut tools = Vec::new();

    for block in content.blocks() {
        match block {
            ContentBlock::Text { text } => {
                let text = text.trim();
                if !text.is_empty() {
                    text_parts.push(text);
                }
            }
            ContentBlock::ToolUse { name, input } => {
                tools.push(summarize_tool(
                    name,
                    input,
                    &filters.tool_summary_keys,
                    limits.max_tool_arg_len,
                ));
            }
            ContentBlock::ToolResult | ContentBlock::Unknown => {}
        }
    }

    let text = (!text_parts.is_empty()).then(|| text_parts.join("\n"));
    let checklist = text.as_deref().map(checklist_lines).unwrap_or_default();

    AssistantSignals {
        text,
        checklist,
        tools,
    }
}

/// Lines of `text` that look like checklist items or TODO markers.
pub fn checklist_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| CHECKLIST_RE.is_match(line))
        .map(str::to_string)
        .collect()
}

/// Identity of a checklist line for deduplication: the item text without
/// its bullet and checkbox, so `- [ ] x` and `- [x] x` collide.
pub fn checklist_identity(line: &str) -> &str {
    let key = match CHECKBOX_PREFIX_RE.find(line) {
        Some(m) => line[m.end()..].trim(),
        None => line.trim(),
    };
    if key.is_empty() {
        line
    } else {
        key
    }
}

/// One-line summary of a tool invocation.
///
/// The first key in `keys` holding a non-empty string wins; otherwise a
/// truthy `status` argument is shown; otherwise just the tool name.
pub fn summarize_tool(name: &str, input: &Value, keys: &[String], max_arg_len: usize) -> String {
    let Some(args) = input.as_object() else {
        return name.to_string();
    };

    let salient = keys.iter().find_map(|key| match args.get(key) {
        Some(Value::String(val)) if !val.is_empty() => Some(val.as_str()),
        _ => None,
    });
    if let Some(val) = salient {
        return format!("{}: {}", name, take_chars(val, max_arg_len));
    }

    match args.get("status") {
        Some(Value::String(status)) if !status.is_empty() => format!("{}: {}", name, status),
        Some(status) if is_truthy(status) => format!("{}: {}", name, status),
        _ => name.to_string(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
