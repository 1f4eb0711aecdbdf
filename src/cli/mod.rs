//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Command Groups
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | INI | Raw section/key access | `get`, `get-all`, `set`, `ensure`, `add-section`, `sections` |
//! | Settings | Common server settings | `settings show`, `settings set`, `settings validate`, `settings backup` |
//! | Conf | Manager settings.conf | `conf show`, `conf set` |
//! | Config | Tool configuration | `config show`, `config init` |
//!
//! ## Choosing the File
//!
//! INI commands edit `GameUserSettings.ini` by default. Use `--target game`
//! for `Game.ini`, or `--file PATH` for any other file.
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output; `RUST_LOG` controls the
//! library's log events:
//! ```bash
//! ark-settings --verbose set ServerSettings MaxPlayers 70
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod ini_cmd;
mod settings_cmd;
mod conf_cmd;
mod config_cmd;

pub use app::{Cli, Commands, run};
pub use output::{Output, OutputFormat};
