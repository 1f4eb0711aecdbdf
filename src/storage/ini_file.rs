//! Disk access for INI documents
//!
//! Loading treats a missing file as an empty document. Saving writes to a
//! temp file in the destination directory and renames it over the target, so
//! a failed write never leaves a half-written config behind.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

use crate::domain::IniDocument;

#[derive(Debug, Error)]
pub enum IniError {
    #[error("Failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Backing file of an [`IniDocument`]
#[derive(Debug, Clone)]
pub struct IniFile {
    path: PathBuf,
}

impl IniFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and indexes the file. A missing file yields an empty document.
    pub fn load(&self) -> Result<IniDocument, IniError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => {
                debug!(path = %self.path.display(), bytes = text.len(), "loaded ini file");
                Ok(IniDocument::parse(&text))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "ini file not found, starting empty");
                Ok(IniDocument::new())
            }
            Err(source) => Err(IniError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Replaces the file with the document's lines
    pub fn save(&self, doc: &IniDocument) -> Result<(), IniError> {
        replace_atomically(&self.path, |writer| doc.write_to(writer)).map_err(|source| {
            IniError::Write {
                path: self.path.clone(),
                source,
            }
        })?;

        debug!(path = %self.path.display(), lines = doc.line_count(), "saved ini file");
        Ok(())
    }
}

/// Writes `path` through a sibling temp file and an atomic rename.
///
/// The temp file is removed on every failure path. An existing file's
/// permissions carry over to the replacement.
pub(crate) fn replace_atomically<F>(path: &Path, write: F) -> io::Result<()>
where
    F: FnOnce(&mut BufWriter<&mut NamedTempFile>) -> io::Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut temp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(&mut temp);
        write(&mut writer)?;
        writer.flush()?;
    }
    temp.as_file().sync_all()?;

    if let Ok(meta) = fs::metadata(path) {
        fs::set_permissions(temp.path(), meta.permissions())?;
    }

    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
