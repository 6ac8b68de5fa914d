use anyhow::Context;
use bookforge_persistence::{
    AutosaveConfig, DEFAULT_AUTOSAVE_DELAY, DEFAULT_ERROR_DISPLAY, DEFAULT_POLL_INTERVAL,
    DEFAULT_SAVED_DISPLAY,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_NAME: &str = "bookforge.config.json";

/// BookForge configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookforgeConfig {
    /// Quiet period after the last edit before autosaving
    #[serde(default = "default_autosave_delay_ms")]
    pub autosave_delay_ms: u64,

    /// How long "saved" stays visible
    #[serde(default = "default_saved_display_ms")]
    pub saved_display_ms: u64,

    /// How long "error" stays visible
    #[serde(default = "default_error_display_ms")]
    pub error_display_ms: u64,

    /// Tick of the background autosave driver
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Directory holding one JSON file per project
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_autosave_delay_ms() -> u64 {
    DEFAULT_AUTOSAVE_DELAY.as_millis() as u64
}

fn default_saved_display_ms() -> u64 {
    DEFAULT_SAVED_DISPLAY.as_millis() as u64
}

fn default_error_display_ms() -> u64 {
    DEFAULT_ERROR_DISPLAY.as_millis() as u64
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL.as_millis() as u64
}

fn default_data_dir() -> String {
    ".bookforge".to_string()
}

impl BookforgeConfig {
    /// Load `bookforge.config.json` from a directory, or defaults if absent
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            Self::read(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load an explicitly named config file; it must exist
    pub fn read(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read config {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(config)
    }

    pub fn data_dir(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.data_dir)
    }

    pub fn autosave(&self) -> AutosaveConfig {
        AutosaveConfig {
            autosave_delay: Duration::from_millis(self.autosave_delay_ms),
            saved_display: Duration::from_millis(self.saved_display_ms),
            error_display: Duration::from_millis(self.error_display_ms),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        }
    }
}

impl Default for BookforgeConfig {
    fn default() -> Self {
        Self {
            autosave_delay_ms: default_autosave_delay_ms(),
            saved_display_ms: default_saved_display_ms(),
            error_display_ms: default_error_display_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            data_dir: default_data_dir(),
        }
    }
}
