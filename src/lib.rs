//! ARK Settings - line-preserving editor for ARK server configuration
//!
//! The server rewrites `GameUserSettings.ini` and `Game.ini` itself and does
//! not tolerate reformatting, so edits made here change only the lines they
//! target: comments, blank lines, unknown directives and key order all
//! survive a load/edit/save cycle.

pub mod domain;
pub mod storage;
pub mod cli;

pub use domain::IniDocument;
pub use storage::{Config, IniEditor, IniError, IniFile};
