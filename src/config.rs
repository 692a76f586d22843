use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::constants::{
    APP_DIR_NAME, CONTROLS_TIMEOUT_SECS, DRAG_GRACE_MS, SEEK_INDICATOR_TIMEOUT_MS,
    SEEK_STEP_SECS, TIME_OBSERVER_INTERVAL_MS,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub player: PlayerConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Seconds before the controls auto-hide
    #[serde(default = "default_controls_timeout")]
    pub controls_timeout_secs: u64,

    /// Double-tap jump in seconds
    #[serde(default = "default_seek_step")]
    pub seek_step_secs: f64,

    #[serde(default = "default_seek_indicator_timeout")]
    pub seek_indicator_timeout_ms: u64,

    #[serde(default = "default_drag_grace")]
    pub drag_grace_ms: u64,

    #[serde(default = "default_time_observer_interval")]
    pub time_observer_interval_ms: u64,

    /// Rewind and keep playing when the media ends
    #[serde(default = "default_true")]
    pub loop_on_end: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Where bundled assets are copied before playback
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_directory: Option<PathBuf>,

    /// Directory holding the bundled assets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assets_directory: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences_file: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            info!("No config file found, using defaults");
            let config = Config::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading config from {:?}", path);
        let contents = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;
        info!("Config loaded successfully");
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents).context("Failed to write config file")?;

        debug!("Config saved to {:?}", path);
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Failed to get config directory")?;
        Ok(config_dir.join(APP_DIR_NAME).join("config.toml"))
    }
}

impl PlayerConfig {
    pub fn controls_timeout(&self) -> Duration {
        Duration::from_secs(self.controls_timeout_secs)
    }

    pub fn seek_indicator_timeout(&self) -> Duration {
        Duration::from_millis(self.seek_indicator_timeout_ms)
    }

    pub fn drag_grace(&self) -> Duration {
        Duration::from_millis(self.drag_grace_ms)
    }

    pub fn time_observer_interval(&self) -> Duration {
        Duration::from_millis(self.time_observer_interval_ms)
    }
}

impl StorageConfig {
    pub fn cache_directory(&self) -> Result<PathBuf> {
        match &self.cache_directory {
            Some(dir) => Ok(dir.clone()),
            None => {
                let cache_dir = dirs::cache_dir().context("Failed to get cache directory")?;
                Ok(cache_dir.join(APP_DIR_NAME))
            }
        }
    }

    pub fn assets_directory(&self) -> PathBuf {
        self.assets_directory
            .clone()
            .unwrap_or_else(|| PathBuf::from("assets"))
    }

    pub fn preferences_file(&self) -> Result<PathBuf> {
        match &self.preferences_file {
            Some(path) => Ok(path.clone()),
            None => {
                let config_dir = dirs::config_dir().context("Failed to get config directory")?;
                Ok(config_dir.join(APP_DIR_NAME).join("preferences.json"))
            }
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            controls_timeout_secs: default_controls_timeout(),
            seek_step_secs: default_seek_step(),
            seek_indicator_timeout_ms: default_seek_indicator_timeout(),
            drag_grace_ms: default_drag_grace(),
            time_observer_interval_ms: default_time_observer_interval(),
            loop_on_end: default_true(),
        }
    }
}

// Default value functions
fn default_controls_timeout() -> u64 { CONTROLS_TIMEOUT_SECS }
fn default_seek_step() -> f64 { SEEK_STEP_SECS }
fn default_seek_indicator_timeout() -> u64 { SEEK_INDICATOR_TIMEOUT_MS }
fn default_drag_grace() -> u64 { DRAG_GRACE_MS }
fn default_time_observer_interval() -> u64 { TIME_OBSERVER_INTERVAL_MS }
fn default_true() -> bool { true }
