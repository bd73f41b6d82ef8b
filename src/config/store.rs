//! INI-backed key/value store
//!
//! Keys are addressed as `key` for the `General` section or `section/key`
//! for everything else. The store never injects defaults; callers pass their
//! own fallback to [`IniStore::value_or`].

use super::{SettingsError, SettingsResult};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Section holding keys that appear before any `[section]` header
pub const GENERAL_SECTION: &str = "General";

#[derive(Debug, Clone, PartialEq, Eq)]
struct Section {
    name: String,
    entries: Vec<(String, String)>,
}

impl Section {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            entries: Vec::new(),
        }
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Key/value store bound to one INI file
#[derive(Debug)]
pub struct IniStore {
    path: PathBuf,
    sections: Vec<Section>,
    modified: bool,
}

impl IniStore {
    /// Load the store from an existing file
    pub fn load(path: &Path) -> SettingsResult<Self> {
        let bytes = std::fs::read(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Loaded settings from: {}", path.display());
        Ok(Self::from_text(path, &String::from_utf8_lossy(&bytes)))
    }

    /// Build a store from INI text, bound to `path` for later writes
    pub fn from_text(path: &Path, contents: &str) -> Self {
        Self {
            path: path.to_path_buf(),
            sections: parse(contents, path),
            modified: false,
        }
    }

    /// File this store reads from and writes to
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether there are changes not yet written back
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        let (section, key) = split_key(key);
        self.section(section).and_then(|s| s.get(key))
    }

    pub fn value_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        let (section, key) = split_key(key);
        let index = match self.sections.iter().position(|s| s.name == section) {
            Some(index) => index,
            None => {
                self.sections.push(Section::new(section));
                self.sections.len() - 1
            }
        };
        let entries = &mut self.sections[index].entries;
        match entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) if *existing == value => return,
            Some((_, existing)) => *existing = value,
            None => entries.push((key.to_string(), value)),
        }
        self.modified = true;
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let (section, key) = split_key(key);
        let section = self.sections.iter_mut().find(|s| s.name == section)?;
        let position = section.entries.iter().position(|(k, _)| k == key)?;
        self.modified = true;
        Some(section.entries.remove(position).1)
    }

    /// Named sections other than `General`, in file order
    pub fn child_groups(&self) -> Vec<&str> {
        self.sections
            .iter()
            .filter(|s| s.name != GENERAL_SECTION && !s.entries.is_empty())
            .map(|s| s.name.as_str())
            .collect()
    }

    /// Keys of one section; an empty name means `General`
    pub fn child_keys(&self, section: &str) -> Vec<&str> {
        let section = if section.is_empty() {
            GENERAL_SECTION
        } else {
            section
        };
        self.section(section)
            .map(|s| s.entries.iter().map(|(k, _)| k.as_str()).collect())
            .unwrap_or_default()
    }

    /// Every key in `section/key` form (`General` keys unprefixed)
    pub fn all_keys(&self) -> Vec<String> {
        self.sections
            .iter()
            .flat_map(|s| {
                s.entries.iter().map(move |(k, _)| {
                    if s.name == GENERAL_SECTION {
                        k.clone()
                    } else {
                        format!("{}/{}", s.name, k)
                    }
                })
            })
            .collect()
    }

    /// Section name to key/value map, for dumping
    pub fn as_map(&self) -> BTreeMap<String, BTreeMap<String, String>> {
        self.sections
            .iter()
            .filter(|s| !s.entries.is_empty())
            .map(|s| (s.name.clone(), s.entries.iter().cloned().collect()))
            .collect()
    }

    /// Write pending changes back to the file
    pub fn sync(&mut self) -> SettingsResult<()> {
        if !self.modified {
            return Ok(());
        }
        write_atomic(&self.path, &render(&self.sections)).map_err(|source| {
            SettingsError::Write {
                path: self.path.clone(),
                source,
            }
        })?;
        self.modified = false;
        tracing::debug!("Saved settings to: {}", self.path.display());
        Ok(())
    }

    fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }
}

impl Drop for IniStore {
    fn drop(&mut self) {
        if let Err(e) = self.sync() {
            tracing::warn!("Discarding unsaved settings: {}", e);
        }
    }
}

fn split_key(key: &str) -> (&str, &str) {
    match key.split_once('/') {
        Some((section, key)) if !section.is_empty() => (section, key),
        Some((_, key)) => (GENERAL_SECTION, key),
        None => (GENERAL_SECTION, key),
    }
}

fn parse(contents: &str, path: &Path) -> Vec<Section> {
    let mut sections = vec![Section::new(GENERAL_SECTION)];
    let mut current = 0;

    for (number, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }

        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            let name = decode_key(name.trim());
            current = match sections.iter().position(|s| s.name == name) {
                Some(index) => index,
                None => {
                    sections.push(Section::new(&name));
                    sections.len() - 1
                }
            };
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            tracing::warn!(
                "Skipping malformed line {} in {}: {}",
                number + 1,
                path.display(),
                line
            );
            continue;
        };

        let key = decode_key(key.trim());
        let value = unquote(value.trim());
        let entries = &mut sections[current].entries;
        match entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => entries.push((key, value)),
        }
    }

    sections
}

/// Characters written as `%XX` in keys and section names
const KEY_SPECIALS: &[char] = &['%', '=', '[', ']', ';', '#', '"', '\n', '\r'];

fn encode_key(key: &str) -> String {
    let last = key.chars().count().saturating_sub(1);
    let mut out = String::with_capacity(key.len());
    for (i, c) in key.chars().enumerate() {
        let edge_space = c.is_ascii_whitespace() && (i == 0 || i == last);
        if KEY_SPECIALS.contains(&c) || edge_space {
            out.push_str(&format!("%{:02X}", c as u8));
        } else {
            out.push(c);
        }
    }
    out
}

fn decode_key(key: &str) -> String {
    let bytes = key.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let decoded = key
                .get(i + 1..i + 3)
                .and_then(|hex| u8::from_str_radix(hex, 16).ok());
            if let Some(byte) = decoded {
                out.push(byte);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn unquote(value: &str) -> String {
    let Some(inner) = value.strip_prefix('"').and_then(|v| v.strip_suffix('"')) else {
        return value.to_string();
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            // Unknown escapes are kept verbatim
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn needs_quotes(value: &str) -> bool {
    value != value.trim() || value.contains([';', '#', '"', '\\', '\n', '\r'])
}

fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn render(sections: &[Section]) -> String {
    let mut out = String::new();
    for section in sections.iter().filter(|s| !s.entries.is_empty()) {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&format!("[{}]\n", encode_key(&section.name)));
        for (key, value) in &section.entries {
            let key = encode_key(key);
            if needs_quotes(value) {
                out.push_str(&format!("{}={}\n", key, quote(value)));
            } else {
                out.push_str(&format!("{}={}\n", key, value));
            }
        }
    }
    out
}

fn write_atomic(path: &Path, contents: &str) -> std::io::Result<()> {
    // Write through symlinks so linked dotfiles stay links
    let target = if path.is_symlink() {
        std::fs::canonicalize(path)?
    } else {
        path.to_path_buf()
    };
    let dir = target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(contents.as_bytes())?;
    file.persist(&target).map_err(|e| e.error)?;
    Ok(())
}
