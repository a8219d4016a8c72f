//! Single-pass aggregation of a transcript into snapshot inputs.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::transcript::classify::{classify_line, Classification, SkipReason};
use crate::transcript::tail;
use std::collections::BTreeMap;
use std::io;
use std::path::Path;

/// Everything the snapshot renderer needs, in log order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Transcript {
    /// Genuine user messages, oldest first
    pub user_messages: Vec<String>,
    /// Text of the last assistant record that had any
    pub last_assistant_text: Option<String>,
    /// Checklist lines from every assistant record, not yet deduplicated
    pub checklist_lines: Vec<String>,
    /// Tool summaries from every assistant record
    pub tool_summaries: Vec<String>,
    /// Counters for the pass
    pub stats: ScanStats,
}

/// Line counters collected while scanning.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanStats {
    pub lines: usize,
    pub user_records: usize,
    pub assistant_records: usize,
    pub skipped: BTreeMap<SkipReason, usize>,
}

impl ScanStats {
    pub fn skipped_total(&self) -> usize {
        self.skipped.values().sum()
    }

    /// `reason=count` pairs, e.g. `malformed=1 tool_result=3`.
    pub fn skipped_summary(&self) -> String {
        self.skipped
            .iter()
            .map(|(reason, count)| format!("{}={}", reason, count))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Transcript {
    /// Scan the tail of the transcript at `path`.
    ///
    /// A missing transcript yields an empty result. Any other I/O failure
    /// aborts the pass with [`Error::Scan`].
    pub fn scan(path: &Path, config: &Config) -> Result<Self> {
        let scan_err = |source: io::Error| Error::Scan {
            path: path.to_path_buf(),
            source,
        };

        let lines = match tail::open(path, config.limits.tail_bytes) {
            Ok(lines) => lines,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Transcript missing, nothing to scan");
                return Ok(Self::default());
            }
            Err(e) => return Err(scan_err(e)),
        };

        let mut transcript = Self::default();
        for line in lines {
            transcript.push_line(&line.map_err(scan_err)?, config);
        }

        tracing::debug!(
            path = %path.display(),
            lines = transcript.stats.lines,
            user = transcript.stats.user_records,
            assistant = transcript.stats.assistant_records,
            skipped = %transcript.stats.skipped_summary(),
            "Transcript scanned"
        );

        Ok(transcript)
    }

    #[cfg(test)]
    fn from_lines<I, S>(lines: I, config: &Config) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut transcript = Self::default();
        for line in lines {
            transcript.push_line(line.as_ref(), config);
        }
        transcript
    }

    /// Fold one raw line into the accumulators.
    fn push_line(&mut self, line: &str, config: &Config) {
        self.stats.lines += 1;

        match classify_line(line, &config.filters, &config.limits) {
            Classification::User(text) => {
                self.stats.user_records += 1;
                self.user_messages.push(text);
            }
            Classification::Assistant(signals) => {
                self.stats.assistant_records += 1;
                if signals.text.is_some() {
                    self.last_assistant_text = signals.text;
                }
                self.checklist_lines.extend(signals.checklist);
                self.tool_summaries.extend(signals.tools);
            }
            Classification::Skipped(reason) => {
                *self.stats.skipped.entry(reason).or_insert(0) += 1;
            }
        }
    }

    /// True when no genuine user input was found.
    pub fn is_empty(&self) -> bool {
        self.user_messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const USER_FIX: &str = r#"{"type":"user","message":{"content":"Fix the login bug"}}"#;
    const ASSISTANT_PLAN: &str = r#"{"type":"assistant","message":{"content":[{"type":"text","text":"- [ ] reproduce bug"},{"type":"tool_use","name":"Read","input":{"file_path":"/src/auth.rs"}}]}}"#;
    const ASSISTANT_TOOL_ONLY: &str = r#"{"type":"assistant","message":{"content":[{"type":"tool_use","name":"Bash","input":{"command":"cargo test"}}]}}"#;
    const TOOL_RESULT: &str = r#"{"type":"user","message":{"content":[{"type":"tool_result","tool_use_id":"t1","content":"ok"}]}}"#;

    #[test]
    fn test_from_lines_accumulates_in_order() {
        let config = Config::default();
        let transcript = Transcript::from_lines(
            [
                USER_FIX,
                ASSISTANT_PLAN,
                TOOL_RESULT,
                ASSISTANT_TOOL_ONLY,
                "garbage",
                r#"{"type":"user","message":{"content":"Also check logout"}}"#,
            ],
            &config,
        );

        assert_eq!(
            transcript.user_messages,
            vec!["Fix the login bug", "Also check logout"]
        );
        // Tool-only record does not clear the last text
        assert_eq!(
            transcript.last_assistant_text.as_deref(),
            Some("- [ ] reproduce bug")
        );
        assert_eq!(transcript.checklist_lines, vec!["- [ ] reproduce bug"]);
        assert_eq!(
            transcript.tool_summaries,
            vec!["Read: /src/auth.rs", "Bash: cargo test"]
        );
        assert_eq!(transcript.stats.lines, 6);
        assert_eq!(transcript.stats.user_records, 2);
        assert_eq!(transcript.stats.assistant_records, 2);
        assert_eq!(transcript.stats.skipped[&SkipReason::ToolResult], 1);
        assert_eq!(transcript.stats.skipped[&SkipReason::Malformed], 1);
        assert_eq!(transcript.stats.skipped_total(), 2);
        assert_eq!(
            transcript.stats.skipped_summary(),
            "malformed=1 tool_result=1"
        );
    }

    #[test]
    fn test_last_assistant_text_is_overwritten() {
        let config = Config::default();
        let transcript = Transcript::from_lines(
            [
                r#"{"type":"assistant","message":{"content":[{"type":"text","text":"first"}]}}"#,
                r#"{"type":"assistant","message":{"content":[{"type":"text","text":"second"}]}}"#,
            ],
            &config,
        );
        assert_eq!(transcript.last_assistant_text.as_deref(), Some("second"));
        assert!(transcript.is_empty());
    }

    #[test]
    fn test_scan_missing_file_is_empty() {
        logging::init_test();
        let transcript = Transcript::scan(
            Path::new("/nonexistent/session.jsonl"),
            &Config::default(),
        )
        .expect("missing transcript should not fail");
        assert_eq!(transcript, Transcript::default());
    }

    #[test]
    fn test_scan_empty_file() {
        let file = NamedTempFile::new().unwrap();
        let transcript = Transcript::scan(file.path(), &Config::default()).unwrap();
        assert!(transcript.is_empty());
        assert_eq!(transcript.stats.lines, 0);
    }

    #[test]
    fn test_scan_reads_file() {
        logging::init_test();
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", USER_FIX).unwrap();
        writeln!(file).unwrap();
        writeln!(file, "{}", ASSISTANT_PLAN).unwrap();
        file.flush().unwrap();

        let transcript = Transcript::scan(file.path(), &Config::default()).unwrap();
        assert_eq!(transcript.user_messages, vec!["Fix the login bug"]);
        assert_eq!(transcript.checklist_lines, vec!["- [ ] reproduce bug"]);
        // Blank line is never yielded by the reader
        assert_eq!(transcript.stats.lines, 2);
    }

    #[test]
    fn test_scan_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = Transcript::scan(dir.path(), &Config::default())
            .expect_err("a directory is not a transcript");
        assert!(matches!(err, Error::Scan { .. }));
    }
}
