//! Section-less `key=value` files
//!
//! Used for the manager's own `settings.conf`. Unlike the INI editor this is
//! a plain read-modify-rewrite format: comments are dropped on save and
//! values are unquoted on read.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

use super::ini_file::{replace_atomically, IniError};

/// Ordered `key=value` pairs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SimpleConf {
    entries: Vec<(String, String)>,
}

impl SimpleConf {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `key=value` lines. Blank lines, `#` comments and lines without
    /// `=` are skipped; a repeated key keeps its first position and its
    /// last value.
    pub fn parse(text: &str) -> Self {
        let mut conf = Self::new();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let value = value.trim().trim_matches('"').trim_matches('\'');
                conf.set(key.trim(), value);
            }
        }

        conf
    }

    /// Reads a file; a missing file is an empty config
    pub fn load(path: &Path) -> Result<Self, IniError> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(Self::parse(&text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::new()),
            Err(source) => Err(IniError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Replaces the value of `key`, appending it if absent
    pub fn set(&mut self, key: &str, value: &str) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value.to_string(),
            None => self.entries.push((key.to_string(), value.to_string())),
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders the file, quoting values that contain a space
    pub fn write_to<W: Write>(&self, mut writer: W, header: Option<&str>) -> io::Result<()> {
        if let Some(header) = header {
            writeln!(writer, "# {}", header)?;
            writeln!(writer)?;
        }

        for (key, value) in &self.entries {
            if value.contains(' ') {
                writeln!(writer, "{}=\"{}\"", key, value)?;
            } else {
                writeln!(writer, "{}={}", key, value)?;
            }
        }

        writer.flush()
    }

    /// Atomically replaces `path` with the rendered config
    pub fn save(&self, path: &Path, header: Option<&str>) -> Result<(), IniError> {
        replace_atomically(path, |writer| self.write_to(writer, header)).map_err(|source| {
            IniError::Write {
                path: path.to_path_buf(),
                source,
            }
        })
    }
}
