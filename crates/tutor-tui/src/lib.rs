//! Full-screen TUI for practice sessions.

pub mod common;
pub mod effects;
pub mod events;
pub mod features;
pub mod overlays;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, Write, stderr};
use std::sync::Arc;

use anyhow::Result;
pub use features::{input, panels, statusline, transcript};
pub use runtime::TuiRuntime;
use tutor_core::config::Config;
use tutor_core::questions::QuestionSource;

/// Runs an interactive practice session until the student quits.
pub async fn run_session(
    config: &Config,
    source: Arc<dyn QuestionSource>,
    skip_gate: bool,
) -> Result<()> {
    if !stderr().is_terminal() {
        anyhow::bail!(
            "The practice session requires a terminal.\n\
             Use `tutor questions list` to inspect the problem pool non-interactively."
        );
    }

    let mut err = stderr();
    writeln!(err, "Tutor")?;
    writeln!(err, "Questions: {}", source.describe())?;
    writeln!(err, "Round length: {}s", config.round_duration_secs)?;
    err.flush()?;

    let mut runtime = TuiRuntime::new(config.clone(), source, skip_gate)?;
    let rounds = runtime.run()?;

    writeln!(stderr(), "Goodbye! Rounds played: {rounds}")?;
    Ok(())
}
