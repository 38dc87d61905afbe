//! Configuration management for the tutor.
//!
//! Loads configuration from ${TUTOR_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::session::SessionConfig;

/// Returns the default config template with comments.
///
/// This is embedded from default_config.toml at compile time.
pub fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for tutor configuration and log directories.
    //!
    //! TUTOR_HOME resolution order:
    //! 1. TUTOR_HOME environment variable (if set)
    //! 2. ~/.config/tutor (default)
    //! 3. ./.tutor when no home directory can be determined

    use std::env;
    use std::path::PathBuf;

    /// Returns the tutor home directory.
    pub fn tutor_home() -> PathBuf {
        if let Ok(home) = env::var("TUTOR_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".tutor"),
            |h| h.join(".config").join("tutor"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        tutor_home().join("config.toml")
    }

    /// Returns the directory the log file is written to.
    pub fn logs_dir() -> PathBuf {
        tutor_home().join("logs")
    }
}

/// Entry gate (CAPTCHA + consent) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Show the gate before the first round.
    pub enabled: bool,
    /// Number of characters in the CAPTCHA code.
    pub captcha_length: usize,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            captcha_length: Config::DEFAULT_CAPTCHA_LENGTH,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Length of one round in seconds.
    pub round_duration_secs: u32,

    /// Countdown ticks between unprompted agent questions.
    pub agent_prompt_interval_secs: u32,

    /// Countdown ticks between a final answer and the first agent answer.
    pub reveal_start_delay_secs: u32,

    /// Typewriter delay per character, in milliseconds (0 reveals instantly).
    pub reveal_char_delay_ms: u64,

    /// Problem category requested from the question source.
    pub category: String,

    /// Optional JSON file overriding the built-in problems.
    pub questions_file: Option<String>,

    /// Default log filter when RUST_LOG is not set.
    pub log_level: String,

    /// Entry gate configuration.
    #[serde(default)]
    pub gate: GateConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            round_duration_secs: Self::DEFAULT_ROUND_DURATION_SECS,
            agent_prompt_interval_secs: Self::DEFAULT_AGENT_PROMPT_INTERVAL_SECS,
            reveal_start_delay_secs: Self::DEFAULT_REVEAL_START_DELAY_SECS,
            reveal_char_delay_ms: Self::DEFAULT_REVEAL_CHAR_DELAY_MS,
            category: Self::DEFAULT_CATEGORY.to_string(),
            questions_file: None,
            log_level: Self::DEFAULT_LOG_LEVEL.to_string(),
            gate: GateConfig::default(),
        }
    }
}

impl Config {
    pub const DEFAULT_ROUND_DURATION_SECS: u32 = 120;
    const DEFAULT_AGENT_PROMPT_INTERVAL_SECS: u32 = 30;
    const DEFAULT_REVEAL_START_DELAY_SECS: u32 = 1;
    const DEFAULT_REVEAL_CHAR_DELAY_MS: u64 = 30;
    pub const DEFAULT_CATEGORY: &str = "combinatorics";
    const DEFAULT_LOG_LEVEL: &str = "info";
    const DEFAULT_CAPTCHA_LENGTH: usize = 6;
    const MAX_CAPTCHA_LENGTH: usize = 32;

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config: Config = if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))?
        } else {
            Config::default()
        };
        config
            .validate()
            .with_context(|| format!("Invalid config in {}", path.display()))?;
        Ok(config)
    }

    /// Writes the commented default template to `path`.
    ///
    /// Refuses to overwrite an existing file.
    pub fn init_at(path: &Path) -> Result<()> {
        if path.exists() {
            bail!("Config file already exists at {}", path.display());
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(path, default_config_template())
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }

    /// Rejects values the session cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.round_duration_secs == 0 {
            bail!("round_duration_secs must be greater than zero");
        }
        if self.agent_prompt_interval_secs == 0 {
            bail!("agent_prompt_interval_secs must be greater than zero");
        }
        if self.category.trim().is_empty() {
            bail!("category must not be empty");
        }
        if self.gate.captcha_length == 0 || self.gate.captcha_length > Self::MAX_CAPTCHA_LENGTH {
            bail!(
                "gate.captcha_length must be between 1 and {}",
                Self::MAX_CAPTCHA_LENGTH
            );
        }
        Ok(())
    }

    /// Returns the questions file path, if one is configured.
    pub fn questions_path(&self) -> Option<PathBuf> {
        self.questions_file
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
    }

    pub fn reveal_char_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_char_delay_ms)
    }

    /// Timing knobs consumed by the session controller.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            round_duration_secs: self.round_duration_secs,
            agent_prompt_interval_secs: self.agent_prompt_interval_secs,
            reveal_start_delay_secs: self.reveal_start_delay_secs,
        }
    }
}
