//! Commands for the manager's own settings.conf

use std::path::Path;

use anyhow::{Context, Result};
use clap::Subcommand;

use super::output::Output;
use crate::storage::SimpleConf;

const HEADER: &str = "ARK manager settings";

#[derive(Subcommand)]
pub enum ConfCommands {
    /// List all entries
    Show,

    /// Set an entry (the file is rewritten without comments)
    Set {
        key: String,
        value: String,
    },
}

pub fn run(cmd: ConfCommands, output: &Output, path: &Path) -> Result<()> {
    output.verbose_ctx("conf", &format!("Using {}", path.display()));

    match cmd {
        ConfCommands::Show => show(output, path),
        ConfCommands::Set { key, value } => set(output, path, &key, &value),
    }
}

fn show(output: &Output, path: &Path) -> Result<()> {
    let conf = SimpleConf::load(path)
        .with_context(|| format!("Failed to load {}", path.display()))?;

    if output.is_json() {
        let map: serde_json::Map<String, serde_json::Value> = conf
            .entries()
            .map(|(k, v)| (k.to_string(), serde_json::Value::from(v)))
            .collect();
        output.data(&map);
    } else {
        for (key, value) in conf.entries() {
            output.row(&[key, value]);
        }
    }

    Ok(())
}

fn set(output: &Output, path: &Path, key: &str, value: &str) -> Result<()> {
    let mut conf = SimpleConf::load(path)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    conf.set(key, value);
    conf.save(path, Some(HEADER))
        .with_context(|| format!("Failed to save {}", path.display()))?;

    output.success(&format!("Set {}={}", key, value));
    Ok(())
}
