//! End-to-end snapshot pass: scan, render, persist, sweep.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::hook::HookInput;
use crate::snapshot::{render, SnapshotMeta, SnapshotStore};
use crate::transcript::Transcript;
use chrono::{Local, NaiveDateTime};
use std::path::PathBuf;

/// What a successful pass did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Snapshot written; `pruned` stale snapshots removed afterwards
    Saved { path: PathBuf, pruned: usize },
    /// No genuine user message in the transcript, nothing written
    NothingToSave,
}

/// Run the pass with the current local time in the header.
pub fn run(input: &HookInput, config: &Config) -> Result<Outcome> {
    run_at(input, config, Local::now().naive_local())
}

/// Run the pass with an explicit header timestamp.
pub fn run_at(input: &HookInput, config: &Config, generated_at: NaiveDateTime) -> Result<Outcome> {
    let transcript_path = input
        .transcript()
        .filter(|path| path.is_file())
        .ok_or_else(|| {
            Error::TranscriptNotFound(input.transcript_path.clone().unwrap_or_default())
        })?;

    tracing::info!(
        session_id = %input.session_id,
        transcript = %transcript_path.display(),
        event = input.hook_event_name.as_deref().unwrap_or("unknown"),
        trigger = input.trigger.as_deref().unwrap_or("unknown"),
        "Saving pre-compaction snapshot"
    );

    let transcript = Transcript::scan(transcript_path, config)?;

    let meta = SnapshotMeta {
        session_id: input.session_id.clone(),
        cwd: input.cwd.clone(),
        generated_at,
    };
    let Some(document) = render(&transcript, &meta, &config.limits) else {
        tracing::info!(
            lines = transcript.stats.lines,
            "No genuine user messages, skipping snapshot"
        );
        return Ok(Outcome::NothingToSave);
    };

    let store = SnapshotStore::new(config.snapshot.resolved_dir());
    let path = store.persist(&document, &input.session_id)?;
    let pruned = store.prune_stale(config.snapshot.stale_after());

    Ok(Outcome::Saved { path, pruned })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SnapshotConfig;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    fn config_in(dir: &std::path::Path) -> Config {
        Config {
            snapshot: SnapshotConfig {
                dir: Some(dir.to_path_buf()),
                ..SnapshotConfig::default()
            },
            ..Config::default()
        }
    }

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 18)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_missing_transcript_path() {
        let temp = TempDir::new().unwrap();
        let err = run_at(&HookInput::default(), &config_in(temp.path()), timestamp())
            .expect_err("no transcript path");
        assert!(matches!(err, Error::TranscriptNotFound(_)));
    }

    #[test]
    fn test_nonexistent_transcript_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("out");
        let input = HookInput {
            session_id: "s1".into(),
            transcript_path: Some(temp.path().join("missing.jsonl")),
            ..HookInput::default()
        };
        let err = run_at(&input, &config_in(&out), timestamp()).expect_err("missing transcript");
        assert!(matches!(err, Error::TranscriptNotFound(_)));
        assert!(!out.exists());
    }

    #[test]
    fn test_no_user_messages_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let transcript = temp.path().join("t.jsonl");
        fs::write(
            &transcript,
            r#"{"type":"assistant","message":{"content":[{"type":"text","text":"hi"}]}}"#,
        )
        .unwrap();
        let out = temp.path().join("out");
        let input = HookInput {
            session_id: "s1".into(),
            transcript_path: Some(transcript),
            ..HookInput::default()
        };

        let outcome = run_at(&input, &config_in(&out), timestamp()).unwrap();
        assert_eq!(outcome, Outcome::NothingToSave);
        assert!(!out.exists());
    }

    #[test]
    fn test_saves_snapshot() {
        let temp = TempDir::new().unwrap();
        let transcript = temp.path().join("t.jsonl");
        fs::write(
            &transcript,
            "{\"type\":\"user\",\"message\":{\"content\":\"Fix the login bug\"}}\n",
        )
        .unwrap();
        let out = temp.path().join("out");
        let input = HookInput {
            session_id: "abc123de".into(),
            transcript_path: Some(transcript),
            cwd: "/work".into(),
            ..HookInput::default()
        };

        let outcome = run_at(&input, &config_in(&out), timestamp()).unwrap();
        let expected_path = out.join("compact-snapshot-abc123de.md");
        assert_eq!(
            outcome,
            Outcome::Saved {
                path: expected_path.clone(),
                pruned: 0
            }
        );
        let doc = fs::read_to_string(expected_path).unwrap();
        assert!(doc.contains("> 2026-10-18 12:00:00 | Session: abc123de | CWD: /work"));
        assert!(doc.contains("**[1] (latest)**\nFix the login bug"));
    }

    #[test]
    fn test_write_failure_skips_sweep() {
        let temp = TempDir::new().unwrap();
        let transcript = temp.path().join("t.jsonl");
        fs::write(
            &transcript,
            "{\"type\":\"user\",\"message\":{\"content\":\"Fix the login bug\"}}\n",
        )
        .unwrap();
        let out = temp.path().join("out");
        fs::create_dir_all(&out).unwrap();
        let old = out.join("compact-snapshot-old.md");
        fs::write(&old, "old").unwrap();
        // A directory where the session's snapshot file should go
        fs::create_dir(out.join("compact-snapshot-s1.md")).unwrap();

        let config = Config {
            snapshot: SnapshotConfig {
                dir: Some(out.clone()),
                stale_seconds: 0,
            },
            ..Config::default()
        };
        std::thread::sleep(std::time::Duration::from_millis(20));
        let input = HookInput {
            session_id: "s1".into(),
            transcript_path: Some(transcript),
            ..HookInput::default()
        };

        let err = run_at(&input, &config, timestamp()).expect_err("write should fail");
        assert!(matches!(err, Error::Write { .. }));
        assert!(old.exists(), "sweep must not run after a failed write");
    }
}
