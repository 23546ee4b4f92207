//! evrec configuration file handling

use anyhow::{Context, Result};
use evrec_platform::WindowConfig;
use evrec_recorder::{ReplayConfig, SessionConfig, DEFAULT_LOG_FILE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when none is given
pub const CONFIG_FILE: &str = "evrec.toml";

/// Top-level evrec configuration (evrec.toml)
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub window: WindowSection,
    #[serde(default)]
    pub log: LogSection,
    #[serde(default)]
    pub replay: ReplaySection,
    #[serde(default)]
    pub screenshot: ScreenshotSection,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct WindowSection {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_true")]
    pub resizable: bool,
}

fn default_title() -> String {
    "evrec".to_string()
}

fn default_width() -> u32 {
    800
}

fn default_height() -> u32 {
    600
}

fn default_true() -> bool {
    true
}

impl Default for WindowSection {
    fn default() -> Self {
        Self {
            title: default_title(),
            width: default_width(),
            height: default_height(),
            resizable: true,
        }
    }
}

/// Event log location
#[derive(Debug, Deserialize, Serialize)]
pub struct LogSection {
    #[serde(default = "default_log_file")]
    pub file: PathBuf,
}

fn default_log_file() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_FILE)
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            file: default_log_file(),
        }
    }
}

/// Playback tuning
#[derive(Debug, Deserialize, Serialize)]
pub struct ReplaySection {
    #[serde(default = "default_speed")]
    pub speed: f64,
    /// Apply built-in window reactions before the application sees an event
    #[serde(default = "default_true")]
    pub default_reactions: bool,
}

fn default_speed() -> f64 {
    1.0
}

impl Default for ReplaySection {
    fn default() -> Self {
        Self {
            speed: default_speed(),
            default_reactions: true,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ScreenshotSection {
    #[serde(default = "default_screenshot_dir")]
    pub directory: PathBuf,
}

fn default_screenshot_dir() -> PathBuf {
    PathBuf::from("screenshots")
}

impl Default for ScreenshotSection {
    fn default() -> Self {
        Self {
            directory: default_screenshot_dir(),
        }
    }
}

impl AppConfig {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `evrec.toml` in the working
    /// directory is used if present, otherwise defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file {} not found", path.display());
                }
                path.to_path_buf()
            }
            None => {
                let path = PathBuf::from(CONFIG_FILE);
                if !path.exists() {
                    tracing::debug!("No {} found, using defaults", CONFIG_FILE);
                    return Ok(Self::default());
                }
                path
            }
        };

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

/// Command-line values that take precedence over the config file
#[derive(Debug, Default)]
pub struct Overrides {
    pub log_file: Option<PathBuf>,
    pub speed: Option<f64>,
    pub no_default_reactions: bool,
}

/// Resolved settings for one invocation, built once and passed by reference.
#[derive(Clone, Debug)]
pub struct Settings {
    pub window: WindowConfig,
    pub log_file: PathBuf,
    pub replay: ReplayConfig,
    pub screenshot_dir: PathBuf,
}

impl Settings {
    /// Merge the config file with command-line overrides
    pub fn resolve(config: AppConfig, overrides: Overrides) -> Self {
        let replay = ReplayConfig::default()
            .with_speed(overrides.speed.unwrap_or(config.replay.speed))
            .with_default_reactions(
                config.replay.default_reactions && !overrides.no_default_reactions,
            );

        Self {
            window: WindowConfig {
                title: config.window.title,
                width: config.window.width,
                height: config.window.height,
                resizable: config.window.resizable,
            },
            log_file: overrides.log_file.unwrap_or(config.log.file),
            replay,
            screenshot_dir: config.screenshot.directory,
        }
    }

    /// Session settings for the render dispatcher
    pub fn session(&self) -> SessionConfig {
        SessionConfig::default()
            .with_log_path(&self.log_file)
            .with_replay(self.replay.clone())
    }

    /// Create the log file's parent directory if it does not exist
    pub fn ensure_log_dir(&self) -> Result<()> {
        match self.log_file.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display())),
            _ => Ok(()),
        }
    }

    /// Create the screenshot directory if it does not exist
    pub fn ensure_screenshot_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.screenshot_dir)
            .with_context(|| format!("Failed to create {}", self.screenshot_dir.display()))
    }
}
