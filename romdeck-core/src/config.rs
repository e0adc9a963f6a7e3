//! src/config.rs
//! ============================================================================
//! # Config: Application Configuration Loader and Saver
//!
//! Loads and saves the browser settings as TOML from the platform config path
//! resolved by the [`directories`](https://docs.rs/directories) crate.
//!
//! ## Features
//! - XDG-compliant config discovery and writing (Linux, macOS, Windows)
//! - Defaults written out on first start
//! - Partial files are accepted; missing keys fall back to defaults
//!
//! ## Example
//! ```rust,ignore
//! let config = Config::load().await?;
//! config.save().await?;
//! ```

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use tokio::fs as TokioFs;

use crate::{
    error::AppError, logging::LoggerConfig, model::view_state::Layout,
    view::renderer::DEFAULT_EMPTY_MESSAGE,
};

/// Keyboard preset for the terminal host.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Keymap {
    /// Arrows, Enter/X for A, Esc/Z for B.
    #[default]
    Standard,

    /// Standard plus h/j/k/l.
    Vim,
}

/// Where ROMs live and how the library presents them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LibraryConfig {
    /// Directory scanned for ROMs.
    pub games_dir: PathBuf,

    /// Prefix joined with the filename to form the launch path.
    pub launch_prefix: String,

    /// Case-sensitive filename suffix of supported ROMs.
    pub rom_suffix: String,

    pub icon_asset: String,

    pub font_asset: String,

    /// Shown when no ROM was found.
    pub empty_message: String,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            games_dir: PathBuf::from("games"),
            launch_prefix: "games/".to_string(),
            rom_suffix: ".gb".to_string(),
            icon_asset: "images/browser-icon".to_string(),
            font_asset: "fonts/Asheville-Sans-14-Bold".to_string(),
            empty_message: DEFAULT_EMPTY_MESSAGE.to_string(),
        }
    }
}

/// Main configuration struct for the application.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub keymap: Keymap,

    /// Time between update ticks.
    #[serde(with = "humantime_serde")]
    pub frame_interval: Duration,

    pub library: LibraryConfig,

    pub layout: Layout,

    pub logging: LoggerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            keymap: Keymap::Standard,
            frame_interval: Duration::from_millis(33), // ~30 fps
            library: LibraryConfig::default(),
            layout: Layout::default(),
            logging: LoggerConfig::default(),
        }
    }
}

impl Config {
    /// Loads config from the platform config dir, creating it with defaults
    /// when absent.
    ///
    /// The config is expected at `$XDG_CONFIG_HOME/romdeck/config.toml`
    /// (Linux), or equivalent on Windows/macOS.
    pub async fn load() -> Result<Self, AppError> {
        let path = Self::config_path()?;
        Self::load_from(&path).await
    }

    /// Saves config to the platform config dir.
    pub async fn save(&self) -> Result<(), AppError> {
        let path = Self::config_path()?;
        self.save_to(&path).await
    }

    pub async fn load_from(path: &Path) -> Result<Self, AppError> {
        if TokioFs::try_exists(path).await.unwrap_or(false) {
            info!("Loading config from {}", path.display());
            let text = TokioFs::read_to_string(path)
                .await
                .map_err(|source| AppError::ConfigIo {
                    path: path.to_path_buf(),
                    source,
                })?;
            let cfg: Self = toml::from_str(&text)?;

            Ok(cfg)
        } else {
            info!(
                "No config file found at {}, using default configuration. Creating it now.",
                path.display()
            );

            let default_config = Self::default();
            default_config.save_to(path).await?;

            Ok(default_config)
        }
    }

    pub async fn save_to(&self, path: &Path) -> Result<(), AppError> {
        info!("Saving config to {}", path.display());

        let io_err = |source| AppError::ConfigIo {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            TokioFs::create_dir_all(parent).await.map_err(io_err)?;
        }

        let toml_str = toml::to_string_pretty(self)?;
        TokioFs::write(path, toml_str).await.map_err(io_err)?;

        Ok(())
    }

    /// Returns the canonical config file path using `directories::ProjectDirs`.
    pub fn config_path() -> Result<PathBuf, AppError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn config_dir() -> Result<PathBuf, AppError> {
        let proj_dirs = ProjectDirs::from("org", "romdeck", "romdeck")
            .ok_or_else(|| AppError::Other("Could not determine config directory.".into()))?;
        Ok(proj_dirs.config_dir().to_path_buf())
    }
}
