use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::panel::DEFAULT_SCALING;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub pipe: PipeConfig,
    pub window: WindowConfig,
    pub appearance: AppearanceConfig,
}

impl Config {
    /// Load configuration from `path`, or from the default location.
    ///
    /// An explicit path must exist. A missing default file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (config_path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match Self::config_path() {
                Ok(p) => (p, false),
                Err(_) => return Ok(Config::default()),
            },
        };

        if !config_path.exists() {
            if required {
                bail!("Config file not found: {}", config_path.display());
            }
            return Ok(Config::default());
        }

        let contents = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        Self::from_toml(&contents)
            .with_context(|| format!("Invalid config file {}", config_path.display()))
    }

    /// Parse and validate a TOML document
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to `path`
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Get config file path
    pub fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")?;
        Ok(PathBuf::from(home).join(".config/remote-panel/config.toml"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.window.scaling == 0 {
            bail!("window.scaling must be at least 1");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipeConfig {
    /// Pipe used when none is given on the command line
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Panel-to-window downscale divisor
    pub scaling: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Remote Control".to_string(),
            scaling: DEFAULT_SCALING,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppearanceConfig {
    /// Panel artwork, scaled to the window
    pub background: PathBuf,
    /// TTF font for button labels when the artwork is unavailable
    pub font: Option<PathBuf>,
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            background: PathBuf::from("rc_background.png"),
            font: None,
        }
    }
}
