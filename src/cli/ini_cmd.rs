//! Raw INI commands: get, get-all, set, ensure, add-section, sections

use std::path::Path;

use anyhow::{bail, Context, Result};

use super::output::Output;
use crate::storage::IniEditor;

fn open(output: &Output, path: &Path) -> Result<IniEditor> {
    output.verbose_ctx("ini", &format!("Loading {}", path.display()));
    let editor = IniEditor::open(path)
        .with_context(|| format!("Failed to load INI file: {}", path.display()))?;
    output.verbose_ctx(
        "ini",
        &format!(
            "{} lines, {} sections",
            editor.document().line_count(),
            editor.document().sections().count()
        ),
    );
    Ok(editor)
}

fn flush(output: &Output, editor: &mut IniEditor) -> Result<()> {
    output.verbose_ctx("ini", &format!("Writing {}", editor.path().display()));
    editor
        .flush()
        .with_context(|| format!("Failed to save INI file: {}", editor.path().display()))
}

pub fn get(
    output: &Output,
    path: &Path,
    section: &str,
    key: &str,
    default: Option<&str>,
) -> Result<()> {
    let editor = open(output, path)?;

    let value = match (editor.get(section, key), default) {
        (Some(value), _) => value,
        (None, Some(default)) => default,
        (None, None) => bail!("{} is not set in [{}]", key, section),
    };

    if output.is_json() {
        output.data(&serde_json::json!({
            "section": section,
            "key": key,
            "value": value,
        }));
    } else {
        println!("{}", value);
    }

    Ok(())
}

pub fn get_all(output: &Output, path: &Path, section: &str, key: &str) -> Result<()> {
    let editor = open(output, path)?;
    let values = editor.get_all(section, key);

    if output.is_json() {
        output.data(&serde_json::json!({
            "section": section,
            "key": key,
            "values": values,
        }));
    } else {
        for value in values {
            println!("{}", value);
        }
    }

    Ok(())
}

pub fn set(output: &Output, path: &Path, section: &str, key: &str, value: &str) -> Result<()> {
    let mut editor = open(output, path)?;

    if !editor.set(section, key, value) {
        if editor.document().contains_section(section) {
            bail!("Refusing to write '{}': keys must be plain names and values a single line", key);
        }
        bail!(
            "Section [{}] not found in {}. Create it with 'add-section' first.",
            section,
            path.display()
        );
    }

    flush(output, &mut editor)?;
    output.success(&format!("Set {}={} in [{}]", key, value, section));
    Ok(())
}

pub fn ensure(output: &Output, path: &Path, section: &str, key: &str, default: &str) -> Result<()> {
    let mut editor = open(output, path)?;
    editor.ensure(section, key, default);

    if editor.get(section, key).is_none() {
        bail!(
            "Refusing to write [{}] {}: section names, keys and values must be a single plain line",
            section,
            key
        );
    }

    if editor.is_modified() {
        flush(output, &mut editor)?;
        output.success(&format!("Set {}={} in [{}]", key, default, section));
    } else {
        output.success(&format!("{} already set in [{}]", key, section));
    }

    Ok(())
}

pub fn add_section(output: &Output, path: &Path, name: &str) -> Result<()> {
    let mut editor = open(output, path)?;

    if editor.document().contains_section(name) {
        bail!("Section [{}] already exists in {}", name, path.display());
    }
    if !editor.add_section(name) {
        bail!("Invalid section name '{}'", name.escape_debug());
    }

    flush(output, &mut editor)?;
    output.success(&format!("Added section [{}]", name));
    Ok(())
}

pub fn sections(output: &Output, path: &Path) -> Result<()> {
    let editor = open(output, path)?;
    let names: Vec<&str> = editor.document().sections().collect();

    if output.is_json() {
        output.data(&names);
    } else {
        for name in names {
            output.row(&[name]);
        }
    }

    Ok(())
}
