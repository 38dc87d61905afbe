//! Interactive practice session.

use anyhow::Result;
use tutor_core::config::Config;
use tutor_core::questions;

pub async fn run(config: &Config, skip_gate: bool) -> Result<()> {
    let source = questions::source_for(config);
    tutor_tui::run_session(config, source, skip_gate).await
}
