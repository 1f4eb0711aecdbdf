//! Catalog of commonly edited server settings
//!
//! Maps friendly key names to the `GameUserSettings.ini` section they live
//! in, and checks the values the server is most sensitive to.

use serde::Serialize;

use super::IniDocument;

pub const SERVER_SETTINGS: &str = "ServerSettings";
pub const SESSION_SETTINGS: &str = "SessionSettings";

/// A well-known setting and where it lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub section: &'static str,
    pub key: &'static str,
    pub description: &'static str,
}

/// Settings offered for quick editing, in display order
pub const COMMON_SETTINGS: &[CatalogEntry] = &[
    CatalogEntry {
        section: SERVER_SETTINGS,
        key: "ServerPassword",
        description: "Password required to join the server",
    },
    CatalogEntry {
        section: SERVER_SETTINGS,
        key: "ServerAdminPassword",
        description: "Admin password",
    },
    CatalogEntry {
        section: SERVER_SETTINGS,
        key: "MaxPlayers",
        description: "Maximum number of players",
    },
    CatalogEntry {
        section: SERVER_SETTINGS,
        key: "DifficultyOffset",
        description: "Difficulty (0.0 to 1.0)",
    },
    CatalogEntry {
        section: SERVER_SETTINGS,
        key: "XPMultiplier",
        description: "Experience multiplier",
    },
    CatalogEntry {
        section: SERVER_SETTINGS,
        key: "TamingSpeedMultiplier",
        description: "Taming speed",
    },
    CatalogEntry {
        section: SERVER_SETTINGS,
        key: "HarvestAmountMultiplier",
        description: "Harvest amount multiplier",
    },
    CatalogEntry {
        section: SERVER_SETTINGS,
        key: "RCONPort",
        description: "RCON port",
    },
    CatalogEntry {
        section: SESSION_SETTINGS,
        key: "SessionName",
        description: "Server name shown in the server browser",
    },
];

const WEAK_ADMIN_PASSWORDS: &[&str] = &["admin", "password", "123456"];

const MULTIPLIERS: &[&str] = &[
    "XPMultiplier",
    "TamingSpeedMultiplier",
    "HarvestAmountMultiplier",
];

/// Looks up a friendly key in the catalog
pub fn lookup(key: &str) -> Option<&'static CatalogEntry> {
    COMMON_SETTINGS.iter().find(|entry| entry.key == key)
}

/// Returns the section a friendly key belongs to
pub fn section_for(key: &str) -> Option<&'static str> {
    lookup(key).map(|entry| entry.section)
}

/// Current value of a catalog setting
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SettingValue {
    pub section: String,
    pub key: String,
    pub value: Option<String>,
    pub description: String,
}

/// Reads every catalog entry from the document
pub fn common_settings(doc: &IniDocument) -> Vec<SettingValue> {
    COMMON_SETTINGS
        .iter()
        .map(|entry| SettingValue {
            section: entry.section.to_string(),
            key: entry.key.to_string(),
            value: doc.get(entry.section, entry.key).map(str::to_owned),
            description: entry.description.to_string(),
        })
        .collect()
}

/// Result of [`validate`]
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ValidationReport {
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl ValidationReport {
    /// Warnings are advisory; only errors make a configuration invalid
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Checks the admin password, RCON port and rate multipliers
pub fn validate(doc: &IniDocument) -> ValidationReport {
    let mut report = ValidationReport::default();

    match doc.get(SERVER_SETTINGS, "ServerAdminPassword") {
        None | Some("") => report.warnings.push("Admin password is not set".to_string()),
        Some(pass) if WEAK_ADMIN_PASSWORDS.contains(&pass) => {
            report.warnings.push("Weak admin password detected".to_string())
        }
        Some(_) => {}
    }

    // Empty values count as unset
    if let Some(port) = doc.get(SERVER_SETTINGS, "RCONPort").filter(|v| !v.is_empty()) {
        match port.parse::<i64>() {
            Ok(p) if !(1024..=65535).contains(&p) => report.errors.push(format!(
                "Invalid RCON port: {} (must be between 1024 and 65535)",
                p
            )),
            Ok(_) => {}
            Err(_) => report
                .errors
                .push(format!("Invalid RCON port: {} (must be numeric)", port)),
        }
    }

    for name in MULTIPLIERS {
        let Some(value) = doc.get(SERVER_SETTINGS, name).filter(|v| !v.is_empty()) else {
            continue;
        };
        match value.parse::<f64>() {
            Ok(v) if v <= 0.0 => report
                .warnings
                .push(format!("{} is zero or negative", name)),
            Ok(_) => {}
            Err(_) => report.errors.push(format!("Invalid {}: {}", name, value)),
        }
    }

    report
}
