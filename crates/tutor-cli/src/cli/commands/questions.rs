//! Question pool inspection.

use anyhow::{Context, Result};
use tutor_core::config::Config;
use tutor_core::questions;

/// Prints the problems for the configured category, one per line.
pub fn list(config: &Config) -> Result<()> {
    let source = questions::source_for(config);
    let problems = source
        .fetch(&config.category)
        .with_context(|| format!("fetch '{}' from {}", config.category, source.describe()))?;

    if problems.is_empty() {
        println!("No questions found for '{}'.", config.category);
        return Ok(());
    }

    println!(
        "{} question(s) in '{}' ({}):",
        problems.len(),
        config.category,
        source.describe()
    );
    for (index, problem) in problems.iter().enumerate() {
        println!("{:>3}. {problem}", index + 1);
    }
    Ok(())
}
