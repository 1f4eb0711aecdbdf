//! Settings CLI commands

use anyhow::{bail, Result};
use clap::Subcommand;

use super::output::Output;
use crate::domain::catalog;
use crate::storage::SettingsManager;

#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Show the commonly edited settings and their values
    Show,

    /// Print one common setting
    Get {
        /// Setting name (e.g. MaxPlayers)
        key: String,
    },

    /// Change one common setting; its section is looked up automatically
    ///
    /// Examples:
    ///   ark-settings settings set MaxPlayers 70
    ///   ark-settings settings set SessionName "My Server"
    Set {
        /// Setting name (e.g. MaxPlayers)
        key: String,

        /// New value
        value: String,
    },

    /// Check passwords, ports and multipliers
    Validate,

    /// Copy the settings file to a timestamped backup
    Backup,
}

pub fn run(cmd: SettingsCommands, output: &Output, manager: &SettingsManager) -> Result<()> {
    output.verbose_ctx("settings", &format!("Using {}", manager.path().display()));

    match cmd {
        SettingsCommands::Show => show(output, manager),
        SettingsCommands::Get { key } => get(output, manager, &key),
        SettingsCommands::Set { key, value } => set(output, manager, &key, &value),
        SettingsCommands::Validate => validate(output, manager),
        SettingsCommands::Backup => backup(output, manager),
    }
}

fn show(output: &Output, manager: &SettingsManager) -> Result<()> {
    let settings = manager.common_settings()?;

    if output.is_json() {
        output.data(&settings);
        return Ok(());
    }

    println!("{}", "=".repeat(60));
    println!("  ARK SERVER SETTINGS");
    println!("{}", "=".repeat(60));

    let mut current_section = "";
    for setting in &settings {
        if setting.section != current_section {
            println!();
            println!("[{}]", setting.section);
            current_section = &setting.section;
        }
        println!();
        println!("  {}", setting.key);
        println!("    Value: {}", setting.value.as_deref().unwrap_or("(not set)"));
        println!("    Description: {}", setting.description);
    }

    println!();
    println!("{}", "=".repeat(60));
    Ok(())
}

fn get(output: &Output, manager: &SettingsManager, key: &str) -> Result<()> {
    let Some(section) = catalog::section_for(key) else {
        bail!(
            "Unknown setting '{}'. Use 'get <section> <key>' for other settings.",
            key
        );
    };

    let value = manager.get_setting(section, key)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "section": section,
            "key": key,
            "value": value,
        }));
    } else {
        println!("{}", value.as_deref().unwrap_or("(not set)"));
    }

    Ok(())
}

fn set(output: &Output, manager: &SettingsManager, key: &str, value: &str) -> Result<()> {
    let section = manager.set_common(key, value)?;

    output.success(&format!("Updated {} = {} in [{}]", key, value, section));
    output.warning("Restart the server to apply the change");
    Ok(())
}

fn validate(output: &Output, manager: &SettingsManager) -> Result<()> {
    let report = manager.validate()?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "valid": report.is_valid(),
            "warnings": report.warnings,
            "errors": report.errors,
        }));
    } else {
        for warning in &report.warnings {
            println!("warning: {}", warning);
        }
        for error in &report.errors {
            println!("error: {}", error);
        }
        if report.warnings.is_empty() && report.errors.is_empty() {
            println!("No problems found");
        }
    }

    if !report.is_valid() {
        bail!("Validation failed with {} error(s)", report.errors.len());
    }

    Ok(())
}

fn backup(output: &Output, manager: &SettingsManager) -> Result<()> {
    let path = manager.backup()?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "backup_path": path.display().to_string(),
        }));
    } else {
        output.success(&format!("Backup created: {}", path.display()));
    }

    Ok(())
}
