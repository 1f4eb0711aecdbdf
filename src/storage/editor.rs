//! Editing session over one INI file
//!
//! [`IniEditor`] binds an [`IniDocument`] to its backing [`IniFile`]:
//! `load` replaces the in-memory document with a fresh scan of the file,
//! the accessors edit it, and `flush` writes it back atomically. The file is
//! assumed to be owned exclusively for the duration of a session; a writer
//! that touches it between `load` and `flush` loses its changes.

use std::path::{Path, PathBuf};

use super::ini_file::{IniError, IniFile};
use crate::domain::IniDocument;

pub struct IniEditor {
    file: IniFile,
    doc: IniDocument,
}

impl IniEditor {
    /// Creates an editor with an empty document; call [`load`](Self::load)
    /// to read the file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: IniFile::new(path),
            doc: IniDocument::new(),
        }
    }

    /// Creates an editor and loads the file
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, IniError> {
        let mut editor = Self::new(path);
        editor.load()?;
        Ok(editor)
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Discards the in-memory document and rescans the file
    pub fn load(&mut self) -> Result<(), IniError> {
        self.doc = self.file.load()?;
        Ok(())
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.doc.get(section, key)
    }

    pub fn get_or<'a>(&'a self, section: &str, key: &str, default: &'a str) -> &'a str {
        self.doc.get_or(section, key, default)
    }

    pub fn get_all(&self, section: &str, key: &str) -> Vec<&str> {
        self.doc.get_all(section, key)
    }

    pub fn set(&mut self, section: &str, key: &str, value: &str) -> bool {
        self.doc.set(section, key, value)
    }

    pub fn ensure(&mut self, section: &str, key: &str, default: &str) {
        self.doc.ensure(section, key, default)
    }

    pub fn add_section(&mut self, name: &str) -> bool {
        self.doc.add_section(name)
    }

    /// Writes the whole document back to the file
    pub fn flush(&mut self) -> Result<(), IniError> {
        self.file.save(&self.doc)?;
        self.doc.mark_saved();
        Ok(())
    }

    pub fn document(&self) -> &IniDocument {
        &self.doc
    }

    pub fn is_modified(&self) -> bool {
        self.doc.is_modified()
    }
}
