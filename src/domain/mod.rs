//! Domain models for ARK settings
//!
//! Contains the line-preserving INI model and the settings catalog, without
//! any I/O concerns.

mod document;
pub mod catalog;

pub use document::IniDocument;
pub use catalog::{CatalogEntry, SettingValue, ValidationReport};
