use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::generator::lines::DEFAULT_SOURCE;
use crate::session::trainer::Policy;
use crate::ui::theme::Theme;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_source_file")]
    pub source_file: PathBuf,
    #[serde(default)]
    pub in_order: bool,
    #[serde(default)]
    pub repeat_until_correct: bool,
    #[serde(default)]
    pub endless: bool,
    #[serde(default = "default_drain_timeout_ms")]
    pub drain_timeout_ms: u64,
    #[serde(default)]
    pub theme: Theme,
}

fn default_source_file() -> PathBuf {
    PathBuf::from(DEFAULT_SOURCE)
}
fn default_drain_timeout_ms() -> u64 {
    1000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_file: default_source_file(),
            in_order: false,
            repeat_until_correct: false,
            endless: false,
            drain_timeout_ms: default_drain_timeout_ms(),
            theme: Theme::default(),
        }
    }
}

impl Config {
    /// Loads the user config, or defaults when there is none.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("invalid config in {}", path.display()))?;
        Ok(config)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("stricttypist")
            .join("config.toml")
    }

    pub fn drain_timeout(&self) -> Duration {
        Duration::from_millis(self.drain_timeout_ms)
    }

    pub fn policy(&self) -> Policy {
        Policy {
            repeat_until_correct: self.repeat_until_correct,
            endless: self.endless,
        }
    }
}
