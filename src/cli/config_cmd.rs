//! Commands for the tool's own config.toml

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Subcommand;

use super::output::Output;
use crate::storage::Config;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the resolved file locations
    Show,

    /// Write a config file with the default paths
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn run(
    cmd: ConfigCommands,
    output: &Output,
    config: &Config,
    config_path: Option<PathBuf>,
) -> Result<()> {
    match cmd {
        ConfigCommands::Show => show(output, config, config_path),
        ConfigCommands::Init { force } => init(output, config_path, force),
    }
}

fn resolve(config_path: Option<PathBuf>) -> Result<PathBuf> {
    config_path
        .or_else(Config::default_path)
        .context("Could not determine config directory")
}

fn show(output: &Output, config: &Config, config_path: Option<PathBuf>) -> Result<()> {
    let source = config_path.or_else(Config::default_path);
    let source = source.as_ref().map(|p| p.display().to_string());

    let game_user_settings = config.game_user_settings_path();
    let game_ini = config.game_ini_path();
    let settings_conf = config.settings_conf_path();
    let backup_dir = config.backup_dir.as_ref().map(|p| p.display().to_string());

    if output.is_json() {
        output.data(&serde_json::json!({
            "config_file": source,
            "ark_root": config.ark_root.display().to_string(),
            "game_user_settings": game_user_settings.display().to_string(),
            "game_ini": game_ini.display().to_string(),
            "settings_conf": settings_conf.display().to_string(),
            "backup_dir": backup_dir,
        }));
    } else {
        let ark_root = config.ark_root.display().to_string();
        let gus = game_user_settings.display().to_string();
        let game = game_ini.display().to_string();
        let conf = settings_conf.display().to_string();

        output.row(&["config_file", source.as_deref().unwrap_or("(none)")]);
        output.row(&["ark_root", &ark_root]);
        output.row(&["game_user_settings", &gus]);
        output.row(&["game_ini", &game]);
        output.row(&["settings_conf", &conf]);
        output.row(&["backup_dir", backup_dir.as_deref().unwrap_or("(next to settings file)")]);
    }

    Ok(())
}

fn init(output: &Output, config_path: Option<PathBuf>, force: bool) -> Result<()> {
    let path = resolve(config_path)?;

    if path.exists() && !force {
        bail!(
            "Config already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    Config::default().save(&path)?;
    output.success(&format!("Wrote default config to {}", path.display()));
    Ok(())
}
