//! # Storage Layer
//!
//! Disk access for the server's configuration files.
//!
//! ## Files
//!
//! | Data | Format | Default location |
//! |------|--------|------------------|
//! | Server settings | INI | `<ark_root>/ShooterGame/Saved/Config/LinuxServer/GameUserSettings.ini` |
//! | Game rules | INI | `<ark_root>/ShooterGame/Saved/Config/LinuxServer/Game.ini` |
//! | Manager settings | `key=value` | `<ark_root>/config/settings.conf` |
//! | Tool config | TOML | `~/.config/ark-settings/config.toml` |
//!
//! ## Write Safety
//!
//! - INI edits rewrite only the lines they change; everything else is
//!   written back byte for byte
//! - INI, `settings.conf` and `config.toml` saves are atomic (temp file +
//!   rename); backups are plain copies to a new timestamped name
//! - There is no locking: the server rewrites its INI files on shutdown, so
//!   edits should be made while it is stopped
//!
//! ## Key Types
//!
//! - [`IniEditor`] - Load/edit/flush session over one INI file
//! - [`IniFile`] - Load and atomically save an [`IniDocument`](crate::domain::IniDocument)
//! - [`SettingsManager`] - Common settings, validation and backups
//! - [`SimpleConf`] - Section-less `key=value` files
//! - [`Config`] - Installation paths

mod ini_file;
mod editor;
mod simple_conf;
mod config;
mod settings;

pub use ini_file::{IniError, IniFile};
pub use editor::IniEditor;
pub use simple_conf::SimpleConf;
pub use config::{Config, ConfigError, IniTarget};
pub use settings::{SettingsError, SettingsManager};
