//! compact-save - PreCompact hook that snapshots recent session context
//!
//! Reads the hook JSON from stdin, digests the session transcript, and writes
//! `~/.claude/compact-snapshot-<session_id>.md` for use after compaction.
//!
//! Uses XDG Base Directory specification for its own files:
//! - Logs: $XDG_STATE_HOME/compact-guardian/compact-guardian.log
//! - Config: $XDG_CONFIG_HOME/compact-guardian/config.toml
//!
//! The hook must never block compaction: every failure is reported on stderr
//! and the process still exits successfully.

use anyhow::{Context, Result};
use clap::Parser;
use compact_guardian_core::{logging, pipeline, Config, HookInput, Outcome};
use std::io;

#[derive(Parser)]
#[command(name = "compact-save")]
#[command(about = "Save a pre-compaction context snapshot (hook JSON on stdin)")]
#[command(version)]
struct Args {}

fn main() {
    match Args::try_parse() {
        Ok(_) => {}
        // --help / --version
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => report(&format!("ignoring command line: {}", e.kind())),
    }

    let config = Config::load().unwrap_or_else(|e| {
        report(&format!("{}, using defaults", e));
        Config::default()
    });

    let _log_guard = match logging::init(&config.logging) {
        Ok(guard) => Some(guard),
        Err(e) => {
            report(&format!("logging disabled: {}", e));
            None
        }
    };

    match run(&config) {
        Ok(Outcome::Saved { path, pruned }) => {
            tracing::info!(path = %path.display(), pruned, "Snapshot saved");
        }
        Ok(Outcome::NothingToSave) => {}
        Err(e) => {
            let message = format!("{:#}", e);
            tracing::warn!(error = %message, "Snapshot failed");
            report(&message);
        }
    }
}

fn run(config: &Config) -> Result<Outcome> {
    let input = HookInput::from_reader(io::stdin().lock()).context("failed to read hook input")?;
    let outcome = pipeline::run(&input, config)?;
    Ok(outcome)
}

fn report(message: &str) {
    eprintln!("compact-save: {}", message);
}
