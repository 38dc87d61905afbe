//! CLI entry and dispatch.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::runtime::Runtime;
use tutor_core::config::{self, Config};
use tutor_core::logging;

mod commands;

#[derive(Parser)]
#[command(name = "tutor")]
#[command(version)]
#[command(about = "Timed problem-solving practice with simulated study partners")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    source: SourceArgs,

    /// Override the round length in seconds
    #[arg(long, value_name = "SECS")]
    duration: Option<u32>,

    /// Skip the CAPTCHA and consent screens
    #[arg(long)]
    skip_gate: bool,
}

/// Question source override shared by the session and `questions list`.
#[derive(clap::Args, Debug, Clone, Default)]
struct SourceArgs {
    /// Load problems from a JSON file instead of the built-in set
    #[arg(long, value_name = "FILE", global = true)]
    questions: Option<PathBuf>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Inspect the problem pool
    Questions {
        #[command(subcommand)]
        command: QuestionCommands,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum QuestionCommands {
    /// Lists the problems for the configured category
    List,
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // one tokio runtime for everything
    let rt = Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let Cli {
        command,
        source,
        duration,
        skip_gate,
    } = cli;

    match command {
        None => {
            let config = load_config(&source, duration)?;
            let _log_guard = logging::init(&config::paths::logs_dir(), &config.log_level)
                .context("init logging")?;
            tracing::info!(
                round_duration_secs = config.round_duration_secs,
                category = %config.category,
                "starting session"
            );
            commands::session::run(&config, skip_gate).await
        }
        Some(Commands::Questions { command }) => match command {
            QuestionCommands::List => {
                let config = load_config(&source, None)?;
                commands::questions::list(&config)
            }
        },
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        },
    }
}

/// Loads the config file and applies command-line overrides.
fn load_config(source: &SourceArgs, duration: Option<u32>) -> Result<Config> {
    let mut config = Config::load().context("load config")?;

    if let Some(path) = &source.questions {
        config.questions_file = Some(path.to_string_lossy().into_owned());
    }
    if let Some(secs) = duration {
        config.round_duration_secs = secs;
    }
    config.validate().context("invalid command-line override")?;
    Ok(config)
}
