//! Settings manager for `GameUserSettings.ini`
//!
//! Every call reloads the file first, since the server rewrites it on its
//! own schedule.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;
use thiserror::Error;
use tracing::{debug, info};

use super::ini_file::{IniError, IniFile};
use crate::domain::catalog::{self, SettingValue, ValidationReport};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Cannot set {key}: section [{section}] not found")]
    SectionNotFound { section: String, key: String },

    #[error("Invalid value for {0}: values must be a single line")]
    InvalidValue(String),

    #[error("Unknown setting '{0}' (not in the common settings list)")]
    UnknownKey(String),

    #[error("Settings file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Failed to back up settings to {}", .path.display())]
    Backup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Ini(#[from] IniError),
}

pub struct SettingsManager {
    file: IniFile,
    backup_dir: Option<PathBuf>,
}

impl SettingsManager {
    pub fn new(path: impl Into<PathBuf>, backup_dir: Option<PathBuf>) -> Self {
        Self {
            file: IniFile::new(path),
            backup_dir,
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Reads one value
    pub fn get_setting(&self, section: &str, key: &str) -> Result<Option<String>, SettingsError> {
        let doc = self.file.load()?;
        Ok(doc.get(section, key).map(str::to_owned))
    }

    /// Sets one value and saves the file. The section must already exist.
    pub fn set_setting(&self, section: &str, key: &str, value: &str) -> Result<(), SettingsError> {
        let mut doc = self.file.load()?;

        if !doc.set(section, key, value) {
            if doc.contains_section(section) {
                return Err(SettingsError::InvalidValue(key.to_string()));
            }
            return Err(SettingsError::SectionNotFound {
                section: section.to_string(),
                key: key.to_string(),
            });
        }

        self.file.save(&doc)?;
        info!(section, key, "setting updated");
        Ok(())
    }

    /// Sets a catalog setting by its friendly key
    pub fn set_common(&self, key: &str, value: &str) -> Result<&'static str, SettingsError> {
        let section =
            catalog::section_for(key).ok_or_else(|| SettingsError::UnknownKey(key.to_string()))?;
        self.set_setting(section, key, value)?;
        Ok(section)
    }

    /// Current values of every catalog setting
    pub fn common_settings(&self) -> Result<Vec<SettingValue>, SettingsError> {
        let doc = self.file.load()?;
        Ok(catalog::common_settings(&doc))
    }

    pub fn validate(&self) -> Result<ValidationReport, SettingsError> {
        let doc = self.file.load()?;
        Ok(catalog::validate(&doc))
    }

    /// Copies the settings file to `<name>.backup_<YYYYmmdd_HHMMSS>`
    pub fn backup(&self) -> Result<PathBuf, SettingsError> {
        let original = self.file.path();
        if !original.is_file() {
            return Err(SettingsError::MissingFile(original.to_path_buf()));
        }

        let file_name = original
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "settings.ini".to_string());
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let backup_name = format!("{}.backup_{}", file_name, timestamp);

        let dir = match &self.backup_dir {
            Some(dir) => dir.clone(),
            None => original.parent().map(Path::to_path_buf).unwrap_or_default(),
        };
        let target = dir.join(backup_name);

        let result = fs::create_dir_all(&dir).and_then(|_| fs::copy(original, &target));
        if let Err(source) = result {
            return Err(SettingsError::Backup {
                path: target,
                source,
            });
        }

        debug!(backup = %target.display(), "settings backed up");
        Ok(target)
    }
}
