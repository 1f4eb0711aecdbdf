//! Configuration handling for ARK settings
//!
//! Server paths are stored in `config.toml` under the platform config
//! directory (`~/.config/ark-settings/config.toml` on Linux). Every path has a
//! default derived from `ark_root`, so an absent file describes a standard
//! installation.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ini_file::replace_atomically;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

const DEFAULT_ARK_ROOT: &str = "/home/arkserver/arkserver";

/// Directory holding the server's own INI files, relative to `ark_root`
const SERVER_CONFIG_DIR: &str = "ShooterGame/Saved/Config/LinuxServer";

/// Which server INI file a command edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum IniTarget {
    /// GameUserSettings.ini
    #[default]
    GameUserSettings,
    /// Game.ini
    Game,
}

/// Paths of one server installation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Root of the server installation
    pub ark_root: PathBuf,

    /// Override for GameUserSettings.ini
    pub game_user_settings: Option<PathBuf>,

    /// Override for Game.ini
    pub game_ini: Option<PathBuf>,

    /// Override for the manager's settings.conf
    pub settings_conf: Option<PathBuf>,

    /// Where settings backups go (defaults to next to the settings file)
    pub backup_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ark_root: PathBuf::from(DEFAULT_ARK_ROOT),
            game_user_settings: None,
            game_ini: None,
            settings_conf: None,
            backup_dir: None,
        }
    }
}

impl Config {
    /// Returns the default location of `config.toml`
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "ark-settings", "ark-settings")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Loads from `path`, or from the default location when `None`.
    ///
    /// A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Saves the configuration atomically, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        replace_atomically(path, |writer| writer.write_all(content.as_bytes()))
            .with_context(|| format!("Failed to write config: {}", path.display()))
    }

    fn server_config_dir(&self) -> PathBuf {
        self.ark_root.join(SERVER_CONFIG_DIR)
    }

    pub fn game_user_settings_path(&self) -> PathBuf {
        self.game_user_settings
            .clone()
            .unwrap_or_else(|| self.server_config_dir().join("GameUserSettings.ini"))
    }

    pub fn game_ini_path(&self) -> PathBuf {
        self.game_ini
            .clone()
            .unwrap_or_else(|| self.server_config_dir().join("Game.ini"))
    }

    pub fn settings_conf_path(&self) -> PathBuf {
        self.settings_conf
            .clone()
            .unwrap_or_else(|| self.ark_root.join("config").join("settings.conf"))
    }

    /// Returns the INI file for a target
    pub fn ini_path(&self, target: IniTarget) -> PathBuf {
        match target {
            IniTarget::GameUserSettings => self.game_user_settings_path(),
            IniTarget::Game => self.game_ini_path(),
        }
    }
}
