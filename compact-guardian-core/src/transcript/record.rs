//! Raw JSONL record types (serde deserialization)
//!
//! Only the fields the snapshot needs are modelled. Every other field in a
//! transcript line is ignored, and shapes that do not fit land in an
//! explicit unknown arm instead of failing the whole line.

use serde::de::IgnoredAny;
use serde::Deserialize;

/// A single line from a transcript, discriminated by its `type` field.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum LogRecord {
    #[serde(rename = "user")]
    User(Envelope),
    #[serde(rename = "assistant")]
    Assistant(Envelope),
    /// `summary`, `system`, `file-history-snapshot`, ...
    #[serde(other)]
    Other,
}

impl LogRecord {
    /// Parse one transcript line.
    pub fn parse(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line)
    }
}

/// Shared shape of user and assistant records.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Envelope {
    pub message: Option<RawMessage>,
}

impl Envelope {
    /// The message content, if the record carries any.
    pub fn content(&self) -> Option<&MessageContent> {
        self.message.as_ref().and_then(|m| m.content.as_ref())
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct RawMessage {
    pub content: Option<MessageContent>,
}

/// `message.content` is either plain text or an ordered list of blocks.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    PlainText(String),
    Blocks(Vec<BlockSlot>),
    /// Numbers, objects, ... carry nothing usable
    Unrecognized(IgnoredAny),
}

impl MessageContent {
    /// Well-formed blocks, in order. Empty for non-list content.
    pub fn blocks(&self) -> impl Iterator<Item = &ContentBlock> {
        let slots: &[BlockSlot] = match self {
            MessageContent::Blocks(slots) => slots,
            _ => &[],
        };
        slots.iter().filter_map(|slot| match slot {
            BlockSlot::Block(block) => Some(block),
            BlockSlot::Malformed(_) => None,
        })
    }
}

/// One entry of a block list. Entries that are not objects, or whose
/// fields do not fit their tag, are kept as `Malformed` and ignored.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum BlockSlot {
    Block(ContentBlock),
    Malformed(IgnoredAny),
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlock {
    #[serde(rename = "text")]
    Text {
        #[serde(default)]
        text: String,
    },
    #[serde(rename = "tool_use")]
    ToolUse {
        #[serde(default)]
        name: String,
        #[serde(default)]
        input: serde_json::Value,
    },
    /// Tool output fed back to the model; its fields never matter here
    #[serde(rename = "tool_result")]
    ToolResult,
    // Catch-all for unknown block types (thinking, image, ...)
    #[serde(other)]
    Unknown,
}
