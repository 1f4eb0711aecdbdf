//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::output::{Output, OutputFormat};
use super::{conf_cmd, config_cmd, ini_cmd, settings_cmd};
use crate::storage::{Config, IniTarget, SettingsManager};

#[derive(Parser)]
#[command(name = "ark-settings")]
#[command(author, version, about = "Line-preserving editor for ARK server configuration")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long, global = true, env = "ARK_SETTINGS_CONFIG")]
    pub config: Option<PathBuf>,

    /// INI file to edit, overriding the configured location
    #[arg(long, global = true)]
    pub file: Option<PathBuf>,

    /// Which server INI file to edit
    #[arg(long, short = 't', global = true, value_enum, default_value_t = IniTarget::GameUserSettings)]
    pub target: IniTarget,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the first value of a key
    Get {
        section: String,
        key: String,

        /// Printed instead of failing when the key is not set
        #[arg(long)]
        default: Option<String>,
    },

    /// Print every value of a repeated key, one per line
    GetAll { section: String, key: String },

    /// Set a key in an existing section
    ///
    /// Only the line holding the key is rewritten; a new key is added at the
    /// end of the section. Fails if the section does not exist.
    Set {
        section: String,
        key: String,
        value: String,
    },

    /// Set a key only if it has no value yet, creating the section if needed
    Ensure {
        section: String,
        key: String,
        default: String,
    },

    /// Append a new section at the end of the file
    AddSection { name: String },

    /// List section names
    Sections,

    /// Commonly edited server settings
    #[command(subcommand)]
    Settings(settings_cmd::SettingsCommands),

    /// The manager's settings.conf
    #[command(subcommand)]
    Conf(conf_cmd::ConfCommands),

    /// This tool's configuration
    #[command(subcommand)]
    Config(config_cmd::ConfigCommands),
}

/// Installs the tracing subscriber; `RUST_LOG` wins over `--verbose`
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Ignore the error if a subscriber is already installed
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let output = Output::new(cli.format, cli.verbose);

    output.verbose("ARK settings starting");

    let config = Config::load(cli.config.as_deref())?;
    let ini_path = cli
        .file
        .clone()
        .unwrap_or_else(|| config.ini_path(cli.target));

    match cli.command {
        Commands::Get { section, key, default } => {
            ini_cmd::get(&output, &ini_path, &section, &key, default.as_deref())?
        }
        Commands::GetAll { section, key } => ini_cmd::get_all(&output, &ini_path, &section, &key)?,
        Commands::Set { section, key, value } => {
            ini_cmd::set(&output, &ini_path, &section, &key, &value)?
        }
        Commands::Ensure { section, key, default } => {
            ini_cmd::ensure(&output, &ini_path, &section, &key, &default)?
        }
        Commands::AddSection { name } => ini_cmd::add_section(&output, &ini_path, &name)?,
        Commands::Sections => ini_cmd::sections(&output, &ini_path)?,

        Commands::Settings(cmd) => {
            let path = cli
                .file
                .clone()
                .unwrap_or_else(|| config.game_user_settings_path());
            let manager = SettingsManager::new(path, config.backup_dir.clone());
            settings_cmd::run(cmd, &output, &manager)?
        }
        Commands::Conf(cmd) => conf_cmd::run(cmd, &output, &config.settings_conf_path())?,
        Commands::Config(cmd) => config_cmd::run(cmd, &output, &config, cli.config.clone())?,
    }

    Ok(())
}
