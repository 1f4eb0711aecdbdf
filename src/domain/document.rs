//! Line-preserving INI document
//!
//! An [`IniDocument`] keeps the file as an ordered list of raw lines, each
//! with its own terminator, plus an index from section name to the line
//! positions that belong to it. Reads go through the index; writes touch
//! only the line they replace or insert, so every other byte of the file
//! survives a load/edit/save cycle unchanged.
//!
//! ```text
//! 0  ; written by the server      <- before any header, never visited
//! 1  [ServerSettings]             <- header (ServerSettings.header = 1)
//! 2  MaxPlayers=10                <- ServerSettings.lines = [2, 3]
//! 3
//! 4  [SessionSettings]            <- header (SessionSettings.header = 4)
//! 5  SessionName=My Server        <- SessionSettings.lines = [5]
//! ```
//!
//! A header that appears twice extends the same section, so a section's
//! positions may span disjoint ranges of the file.

use std::collections::HashMap;
use std::io::{self, Write};

use tracing::{debug, warn};

/// Index entry for one section name
#[derive(Debug, Clone)]
struct Section {
    name: String,
    /// Position of the most recent `[name]` header line
    header: usize,
    /// Body line positions in ascending order, header lines excluded
    lines: Vec<usize>,
}

/// An INI file held as raw lines plus a section index
#[derive(Debug, Clone, Default)]
pub struct IniDocument {
    lines: Vec<String>,
    sections: Vec<Section>,
    by_name: HashMap<String, usize>,
    modified: bool,
}

impl IniDocument {
    /// Creates an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Splits `text` into lines and builds the section index
    pub fn parse(text: &str) -> Self {
        let mut doc = Self {
            lines: text.split_inclusive('\n').map(str::to_owned).collect(),
            ..Self::default()
        };
        doc.rebuild_index();
        doc
    }

    /// Full front-to-back rescan of the line store
    fn rebuild_index(&mut self) {
        self.sections.clear();
        self.by_name.clear();

        let mut current: Option<usize> = None;

        for (pos, line) in self.lines.iter().enumerate() {
            if let Some(name) = header_name(line) {
                let slot = match self.by_name.get(name) {
                    Some(&slot) => {
                        self.sections[slot].header = pos;
                        slot
                    }
                    None => {
                        let slot = self.sections.len();
                        self.sections.push(Section {
                            name: name.to_string(),
                            header: pos,
                            lines: Vec::new(),
                        });
                        self.by_name.insert(name.to_string(), slot);
                        slot
                    }
                };
                current = Some(slot);
            } else if let Some(slot) = current {
                self.sections[slot].lines.push(pos);
            }
        }

        debug!(
            lines = self.lines.len(),
            sections = self.sections.len(),
            "indexed ini document"
        );
    }

    /// Returns the first value of `key` in `section`
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        let slot = *self.by_name.get(section)?;
        self.sections[slot]
            .lines
            .iter()
            .find_map(|&pos| match_value(&self.lines[pos], key))
    }

    /// Like [`get`](Self::get), falling back to `default`
    pub fn get_or<'a>(&'a self, section: &str, key: &str, default: &'a str) -> &'a str {
        self.get(section, key).unwrap_or(default)
    }

    /// Returns every value of a repeated `key` in file order
    pub fn get_all(&self, section: &str, key: &str) -> Vec<&str> {
        let Some(&slot) = self.by_name.get(section) else {
            return Vec::new();
        };
        self.sections[slot]
            .lines
            .iter()
            .filter_map(|&pos| match_value(&self.lines[pos], key))
            .collect()
    }

    /// Sets `key=value` inside an existing section.
    ///
    /// The first line already holding `key` is rewritten in place and nothing
    /// else changes. Later duplicates of the key are left as they are. When
    /// the key is absent a new line is inserted after the last non-blank line
    /// of the section's most recent occurrence (or after its header).
    ///
    /// Returns `false` without touching the document if `section` is
    /// unknown, if `key` could not be read back by [`get`](Self::get), or if
    /// `value` spans more than one line.
    pub fn set(&mut self, section: &str, key: &str, value: &str) -> bool {
        let Some(&slot) = self.by_name.get(section) else {
            warn!(section, key, "refusing to set key in unknown section");
            return false;
        };
        if !is_writable_entry(key, value) {
            warn!(section, key, "refusing to write malformed key or multi-line value");
            return false;
        }

        let existing = self.sections[slot]
            .lines
            .iter()
            .copied()
            .find(|&pos| match_value(&self.lines[pos], key).is_some());

        if let Some(pos) = existing {
            let terminator = line_terminator(&self.lines[pos]);
            self.lines[pos] = format!("{key}={value}{terminator}");
            self.modified = true;
            debug!(section, key, line = pos, "replaced key in place");
            return true;
        }

        let at = self.insertion_point(slot);
        self.insert_line(at, &format!("{key}={value}"), slot);
        debug!(section, key, line = at, "inserted new key");
        true
    }

    /// Appends a `[name]` header at the end of the document.
    ///
    /// Returns `false` if a section with that name already exists, or if
    /// `[name]` would not read back as a header for the same name.
    pub fn add_section(&mut self, name: &str) -> bool {
        if self.by_name.contains_key(name) {
            return false;
        }
        if !is_valid_section_name(name) {
            warn!(section = name, "refusing to add malformed section header");
            return false;
        }

        let newline = self.newline_style();
        if let Some(last) = self.lines.last_mut() {
            if !last.ends_with('\n') {
                last.push_str(newline);
            }
        }

        if !self.lines.is_empty() {
            let pos = self.lines.len();
            let owner = self.owner_of(pos - 1);
            self.lines.push(newline.to_string());
            if let Some(slot) = owner {
                self.sections[slot].lines.push(pos);
            }
        }

        let header = self.lines.len();
        self.lines.push(format!("[{name}]{newline}"));
        self.by_name.insert(name.to_string(), self.sections.len());
        self.sections.push(Section {
            name: name.to_string(),
            header,
            lines: Vec::new(),
        });
        self.modified = true;

        debug!(section = name, line = header, "added section");
        true
    }

    /// Creates the section if needed, then sets `key` only if it has no value.
    ///
    /// Does nothing when the section name, key or default would be refused
    /// by [`add_section`](Self::add_section) or [`set`](Self::set).
    pub fn ensure(&mut self, section: &str, key: &str, default: &str) {
        if !is_writable_entry(key, default) {
            return;
        }
        if !self.contains_section(section) && !self.add_section(section) {
            return;
        }
        if self.get(section, key).is_none() {
            self.set(section, key, default);
        }
    }

    /// Returns true if a `[section]` header was seen or added
    pub fn contains_section(&self, section: &str) -> bool {
        self.by_name.contains_key(section)
    }

    /// Section names in order of first appearance
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.name.as_str())
    }

    /// Raw lines, terminators included
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of physical lines
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns true if any edit was applied since parsing or the last save
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Clears the modified flag after the document was persisted
    pub fn mark_saved(&mut self) {
        self.modified = false;
    }

    /// Reassembles the file content
    pub fn to_text(&self) -> String {
        self.lines.concat()
    }

    /// Writes every line verbatim, in order
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for line in &self.lines {
            writer.write_all(line.as_bytes())?;
        }
        writer.flush()
    }

    /// Position right after the last non-blank line of the section's most
    /// recent occurrence, or right after its header
    fn insertion_point(&self, slot: usize) -> usize {
        let section = &self.sections[slot];
        let anchor = section
            .lines
            .iter()
            .rev()
            .copied()
            .take_while(|&pos| pos > section.header)
            .find(|&pos| !self.lines[pos].trim().is_empty())
            .unwrap_or(section.header);
        anchor + 1
    }

    /// Inserts a line at `at`, assigns it to `owner` and shifts every
    /// stored position at or after `at`. All insertions go through here.
    fn insert_line(&mut self, at: usize, text: &str, owner: usize) {
        let newline = self.newline_style();

        if let Some(prev) = at.checked_sub(1).and_then(|p| self.lines.get_mut(p)) {
            if !prev.ends_with('\n') {
                prev.push_str(newline);
            }
        }

        self.lines.insert(at, format!("{text}{newline}"));
        self.shift_positions(at);

        let body = &mut self.sections[owner].lines;
        let idx = body.partition_point(|&pos| pos < at);
        body.insert(idx, at);

        self.modified = true;
    }

    fn shift_positions(&mut self, from: usize) {
        for section in &mut self.sections {
            if section.header >= from {
                section.header += 1;
            }
            for pos in section.lines.iter_mut().filter(|pos| **pos >= from) {
                *pos += 1;
            }
        }
    }

    /// Section owning the line at `pos`, as a rescan would classify it
    fn owner_of(&self, pos: usize) -> Option<usize> {
        self.sections
            .iter()
            .position(|s| s.header == pos || s.lines.binary_search(&pos).is_ok())
    }

    /// `\r\n` if the first terminated line uses it, `\n` otherwise
    fn newline_style(&self) -> &'static str {
        match self.lines.iter().find(|line| line.ends_with('\n')) {
            Some(line) if line.ends_with("\r\n") => "\r\n",
            _ => "\n",
        }
    }
}

/// Extracts `name` from a `[name]` line
fn header_name(line: &str) -> Option<&str> {
    let name = line.trim().strip_prefix('[')?.strip_suffix(']')?;
    (!name.is_empty()).then_some(name)
}

/// Value of `key` if the line is an eligible `key=value` line
fn match_value<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
        return None;
    }
    trimmed.strip_prefix(key)?.strip_prefix('=')
}

fn is_single_line(text: &str) -> bool {
    !text.contains(|c| c == '\n' || c == '\r')
}

/// Keys `match_value` can find: non-empty, untrimmed, not comment-like
fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key.trim() == key
        && !key.starts_with(|c| c == '#' || c == ';')
        && is_single_line(key)
}

/// `key=value` lines that rescan as that same key and value
fn is_writable_entry(key: &str, value: &str) -> bool {
    is_valid_key(key) && is_single_line(value) && header_name(&format!("{key}={value}")).is_none()
}

/// Names that `header_name` gives back unchanged from `[name]`
fn is_valid_section_name(name: &str) -> bool {
    is_single_line(name) && header_name(&format!("[{name}]")) == Some(name)
}

fn line_terminator(line: &str) -> &'static str {
    if line.ends_with("\r\n") {
        "\r\n"
    } else if line.ends_with('\n') {
        "\n"
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EXAMPLE: &str = "[Server]\nMaxPlayers=10\n\n[Extra]\nFoo=bar\n";

    #[test]
    fn parse_empty() {
        let doc = IniDocument::parse("");
        assert!(doc.is_empty());
        assert_eq!(doc.sections().count(), 0);
        assert_eq!(doc.to_text(), "");
    }

    #[test]
    fn round_trip_is_identity() {
        let text = "; header comment\r\n[A]\r\n  key = spaced\r\nK=v\r\n\r\n[B]\nweird line\nlast=1";
        let doc = IniDocument::parse(text);
        assert_eq!(doc.to_text(), text);
        assert!(!doc.is_modified());
    }

    #[test]
    fn lines_before_first_header_are_ignored() {
        let doc = IniDocument::parse("Key=outside\n[A]\nOther=1\n");
        assert_eq!(doc.get("A", "Key"), None);
        assert_eq!(doc.get("A", "Other"), Some("1"));
    }

    #[test]
    fn header_requires_full_brackets() {
        let doc = IniDocument::parse("[A]\n[B] trailing\n[]\n  [C]  \nx=1\n");
        let names: Vec<_> = doc.sections().collect();
        assert_eq!(names, vec!["A", "C"]);
        assert_eq!(doc.get("C", "x"), Some("1"));
    }

    #[test]
    fn get_skips_comments_and_blanks() {
        let doc = IniDocument::parse("[A]\n# Key=hash\n; Key=semi\n\nKey=real\n");
        assert_eq!(doc.get("A", "Key"), Some("real"));
    }

    #[test]
    fn get_is_literal_and_case_sensitive() {
        let doc = IniDocument::parse("[A]\nkey=lower\nKeyName=long\nKey = spaced\nKey=\"quoted\"\n");
        assert_eq!(doc.get("A", "Key"), Some("\"quoted\""));
        assert_eq!(doc.get("A", "key"), Some("lower"));
        assert_eq!(doc.get("A", "Missing"), None);
        assert_eq!(doc.get_or("A", "Missing", "not set"), "not set");
        assert_eq!(doc.get_or("Nope", "Key", "not set"), "not set");
    }

    #[test]
    fn get_returns_value_without_terminator() {
        let doc = IniDocument::parse("[A]\r\nKey=v\r\n");
        assert_eq!(doc.get("A", "Key"), Some("v"));
    }

    #[test]
    fn duplicate_keys() {
        let mut doc = IniDocument::parse("[S]\nK=1\nK=2\n");
        assert_eq!(doc.get("S", "K"), Some("1"));
        assert_eq!(doc.get_all("S", "K"), vec!["1", "2"]);

        assert!(doc.set("S", "K", "9"));
        assert_eq!(doc.to_text(), "[S]\nK=9\nK=2\n");
        assert_eq!(doc.get_all("S", "K"), vec!["9", "2"]);
    }

    #[test]
    fn get_all_missing() {
        let doc = IniDocument::parse(EXAMPLE);
        assert!(doc.get_all("Server", "Nothing").is_empty());
        assert!(doc.get_all("Nowhere", "MaxPlayers").is_empty());
    }

    #[test]
    fn duplicate_headers_accumulate() {
        let doc = IniDocument::parse("[A]\nx=1\n[B]\ny=2\n[A]\nx=3\nz=4\n");
        assert_eq!(doc.sections().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(doc.get_all("A", "x"), vec!["1", "3"]);
        assert_eq!(doc.get("A", "z"), Some("4"));
    }

    #[test]
    fn set_existing_key_in_place() {
        let mut doc = IniDocument::parse(EXAMPLE);
        assert!(doc.set("Server", "MaxPlayers", "20"));
        assert_eq!(doc.to_text(), "[Server]\nMaxPlayers=20\n\n[Extra]\nFoo=bar\n");
        assert!(doc.is_modified());
    }

    #[test]
    fn set_new_key_then_later_section_still_works() {
        let mut doc = IniDocument::parse(EXAMPLE);
        assert!(doc.set("Server", "MaxPlayers", "20"));
        assert!(doc.set("Server", "NewKey", "x"));
        assert_eq!(
            doc.to_text(),
            "[Server]\nMaxPlayers=20\nNewKey=x\n\n[Extra]\nFoo=bar\n"
        );

        assert_eq!(doc.get("Extra", "Foo"), Some("bar"));
        assert!(doc.set("Extra", "Foo", "baz"));
        assert!(doc.set("Extra", "Added", "1"));
        assert_eq!(
            doc.to_text(),
            "[Server]\nMaxPlayers=20\nNewKey=x\n\n[Extra]\nFoo=baz\nAdded=1\n"
        );
    }

    #[test]
    fn set_into_empty_section_lands_after_header() {
        let mut doc = IniDocument::parse("[A]\n[B]\nk=1\n");
        assert!(doc.set("A", "x", "y"));
        assert_eq!(doc.to_text(), "[A]\nx=y\n[B]\nk=1\n");
        assert_eq!(doc.get("A", "x"), Some("y"));
        assert_eq!(doc.get("B", "k"), Some("1"));
    }

    #[test]
    fn set_lands_in_last_occurrence_of_repeated_section() {
        let mut doc = IniDocument::parse("[A]\nx=1\n\n[B]\ny=2\n\n[A]\nz=3\n\n[C]\nw=4\n");
        assert!(doc.set("A", "new", "v"));
        assert_eq!(
            doc.to_text(),
            "[A]\nx=1\n\n[B]\ny=2\n\n[A]\nz=3\nnew=v\n\n[C]\nw=4\n"
        );
        assert_eq!(doc.get("C", "w"), Some("4"));
        assert_eq!(doc.get("B", "y"), Some("2"));
    }

    #[test]
    fn set_missing_section_fails_closed() {
        let mut doc = IniDocument::parse(EXAMPLE);
        assert!(!doc.set("NoSuchSection", "K", "V"));
        assert_eq!(doc.to_text(), EXAMPLE);
        assert!(!doc.is_modified());
    }

    #[test]
    fn set_preserves_crlf() {
        let mut doc = IniDocument::parse("[A]\r\nk=1\r\n");
        assert!(doc.set("A", "k", "2"));
        assert!(doc.set("A", "n", "3"));
        assert_eq!(doc.to_text(), "[A]\r\nk=2\r\nn=3\r\n");
    }

    #[test]
    fn set_after_unterminated_last_line() {
        let mut doc = IniDocument::parse("[A]\nk=1");
        assert!(doc.set("A", "n", "2"));
        assert_eq!(doc.to_text(), "[A]\nk=1\nn=2\n");

        let mut doc = IniDocument::parse("[A]\nk=1");
        assert!(doc.set("A", "k", "5"));
        assert_eq!(doc.to_text(), "[A]\nk=5");
    }

    #[test]
    fn add_section_appends_with_separator() {
        let mut doc = IniDocument::parse(EXAMPLE);
        assert!(doc.add_section("New"));
        assert!(!doc.add_section("New"));
        assert!(!doc.add_section("Server"));
        assert_eq!(doc.to_text(), format!("{EXAMPLE}\n[New]\n"));

        assert!(doc.set("New", "a", "1"));
        assert!(doc.set("Extra", "b", "2"));
        assert_eq!(
            doc.to_text(),
            "[Server]\nMaxPlayers=10\n\n[Extra]\nFoo=bar\nb=2\n\n[New]\na=1\n"
        );
    }

    #[test]
    fn add_section_to_empty_document() {
        let mut doc = IniDocument::new();
        assert!(doc.add_section("A"));
        assert!(doc.set("A", "k", "v"));
        assert_eq!(doc.to_text(), "[A]\nk=v\n");
    }

    #[test]
    fn add_section_matches_rescan() {
        let mut doc = IniDocument::parse("[A]\nk=1");
        doc.add_section("B");
        doc.set("B", "x", "y");
        doc.set("A", "z", "2");

        let rescanned = IniDocument::parse(&doc.to_text());
        for section in ["A", "B"] {
            for key in ["k", "x", "z"] {
                assert_eq!(doc.get(section, key), rescanned.get(section, key));
            }
        }
    }

    #[test]
    fn ensure_is_idempotent() {
        let mut doc = IniDocument::parse(EXAMPLE);
        doc.ensure("Server", "Pass", "d1");
        doc.ensure("Server", "Pass", "d2");
        assert_eq!(doc.get("Server", "Pass"), Some("d1"));

        doc.ensure("Server", "MaxPlayers", "99");
        assert_eq!(doc.get("Server", "MaxPlayers"), Some("10"));
    }

    #[test]
    fn ensure_creates_missing_section() {
        let mut doc = IniDocument::parse(EXAMPLE);
        doc.ensure("Fresh", "K", "v");
        assert_eq!(doc.get("Fresh", "K"), Some("v"));
        assert_eq!(doc.to_text(), format!("{EXAMPLE}\n[Fresh]\nK=v\n"));
    }

    #[test]
    fn ensure_keeps_empty_value() {
        let mut doc = IniDocument::parse("[A]\nK=\n");
        doc.ensure("A", "K", "default");
        assert_eq!(doc.get("A", "K"), Some(""));
        assert!(!doc.is_modified());
    }

    #[test]
    fn set_refuses_multi_line_input() {
        let text = "[A]\nk=1\n\n[B]\ny=2\n";
        let mut doc = IniDocument::parse(text);

        assert!(!doc.set("A", "k", "1\n[B]\ny=evil"));
        assert!(!doc.set("A", "k", "1\r[B]"));
        assert!(!doc.set("A", "k\ny", "1"));
        assert_eq!(doc.to_text(), text);
        assert!(!doc.is_modified());

        let rescanned = IniDocument::parse(&doc.to_text());
        assert_eq!(rescanned.get("B", "y"), Some("2"));
    }

    #[test]
    fn set_refuses_unreadable_keys() {
        let mut doc = IniDocument::parse("[A]\nk=1\n");
        for key in ["#x", ";x", " x", "x ", ""] {
            assert!(!doc.set("A", key, "v"), "key {:?} was accepted", key);
            doc.ensure("A", key, "v");
        }
        assert!(!doc.set("A", "[B", "x]"));
        assert_eq!(doc.to_text(), "[A]\nk=1\n");
        assert!(!doc.is_modified());
    }

    #[test]
    fn add_section_refuses_names_that_do_not_reparse() {
        let mut doc = IniDocument::parse("[Server]\nMaxPlayers=10\n");
        for name in ["", " Padded", "Padded ", "Two\nLines", "Cr\r"] {
            assert!(!doc.add_section(name), "name {:?} was accepted", name);
        }

        doc.ensure("", "RCONPort", "27020");
        assert_eq!(doc.to_text(), "[Server]\nMaxPlayers=10\n");
        assert_eq!(doc.get("Server", "RCONPort"), None);

        assert!(doc.add_section("a]b"));
        assert!(doc.set("a]b", "k", "v"));
        assert_eq!(IniDocument::parse(&doc.to_text()).get("a]b", "k"), Some("v"));
    }

    #[test]
    fn mark_saved_resets_modified() {
        let mut doc = IniDocument::parse(EXAMPLE);
        doc.set("Server", "MaxPlayers", "1");
        doc.mark_saved();
        assert!(!doc.is_modified());
    }

    #[test]
    fn write_to_matches_text() {
        let doc = IniDocument::parse(EXAMPLE);
        let mut buf = Vec::new();
        doc.write_to(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), EXAMPLE);
    }

    fn ini_line() -> impl Strategy<Value = String> {
        prop_oneof![
            "[A-C]{1,2}".prop_map(|s| format!("[{s}]")),
            "[A-Za-z]{1,4}=[ -~]{0,6}",
            "[;#][ -~]{0,8}",
            Just(String::new()),
            "[ -~]{0,10}",
        ]
    }

    fn ini_text() -> impl Strategy<Value = String> {
        (
            prop::collection::vec((ini_line(), prop_oneof![Just("\n"), Just("\r\n")]), 0..20),
            any::<bool>(),
        )
            .prop_map(|(lines, terminated)| {
                let mut text: String = lines.iter().map(|(l, nl)| format!("{l}{nl}")).collect();
                if !terminated && text.ends_with('\n') {
                    text.pop();
                    if text.ends_with('\r') {
                        text.pop();
                    }
                }
                text
            })
    }

    proptest! {
        #[test]
        fn prop_round_trip(text in ini_text()) {
            prop_assert_eq!(IniDocument::parse(&text).to_text(), text);
        }

        #[test]
        fn prop_set_then_get(text in ini_text(), key in "[A-Za-z]{1,4}", value in "[a-z0-9]{0,6}") {
            let mut doc = IniDocument::parse(&text);
            let sections: Vec<String> = doc.sections().map(str::to_owned).collect();
            for section in &sections {
                prop_assert!(doc.set(section, &key, &value));
                prop_assert_eq!(doc.get(section, &key), Some(value.as_str()));
            }

            // In-memory index must agree with a fresh scan of the output
            let rescanned = IniDocument::parse(&doc.to_text());
            for section in &sections {
                prop_assert_eq!(doc.get_all(section, &key), rescanned.get_all(section, &key));
            }
        }
    }
}
