//! Theme loading
//!
//! A theme is a directory `themes/<name>` in any search root. Both parts are
//! optional:
//! - `style.qss`: stylesheet text, with relative `url()` references rewritten
//!   to absolute paths under the theme directory
//! - `wallpaper.cfg`: INI manifest mapping 1-based screen numbers (or `any`)
//!   to background images

use super::paths::{EntryKind, SearchRoots};
use super::store::IniStore;
use super::SettingsResult;
use regex::{Captures, Regex};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Directory under each search root holding themes
pub const THEMES_DIR: &str = "themes";
/// Stylesheet file inside a theme directory
pub const STYLESHEET_FILE: &str = "style.qss";
/// Background manifest inside a theme directory
pub const WALLPAPER_FILE: &str = "wallpaper.cfg";

const WALLPAPER_SECTION: &str = "wallpaper";

static URL_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)url\(\s*(?:"([^"]*)"|'([^']*)'|([^"')][^)]*)?)\s*\)"#)
        .expect("url() pattern is valid")
});

/// Screen a background is configured for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Screen {
    /// Fallback used when no screen-specific entry exists
    Default,
    /// 1-based screen number as written in theme manifests
    Specific(NonZeroU32),
}

impl Screen {
    /// 1-based screen number; `0` has no screen
    pub fn number(n: u32) -> Option<Self> {
        NonZeroU32::new(n).map(Screen::Specific)
    }

    /// Convert a Qt screen index (0-based, -1 for the default screen)
    pub fn from_qt_index(index: i32) -> Self {
        u32::try_from(index)
            .ok()
            .and_then(|i| i.checked_add(1))
            .and_then(Screen::number)
            .unwrap_or(Screen::Default)
    }

    /// Parse a manifest key
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        if key.eq_ignore_ascii_case("any") || key.eq_ignore_ascii_case("default") || key == "-1" {
            return Some(Screen::Default);
        }
        key.parse::<u32>().ok().and_then(Screen::number)
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Screen::Default => write!(f, "any"),
            Screen::Specific(n) => write!(f, "{}", n),
        }
    }
}

/// Loaded theme data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    name: String,
    root: PathBuf,
    qss: String,
    backgrounds: HashMap<Screen, PathBuf>,
}

impl Theme {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute theme directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Stylesheet text with absolute resource references, empty if the theme has none
    pub fn qss(&self) -> &str {
        &self.qss
    }

    /// Background for `screen`, falling back to the default entry
    pub fn background_for(&self, screen: Screen) -> Option<&Path> {
        self.backgrounds
            .get(&screen)
            .or_else(|| self.backgrounds.get(&Screen::Default))
            .map(PathBuf::as_path)
    }

    /// All configured backgrounds, default entry first then by screen number
    pub fn backgrounds(&self) -> Vec<(Screen, &Path)> {
        let mut entries: Vec<_> = self
            .backgrounds
            .iter()
            .map(|(screen, path)| (*screen, path.as_path()))
            .collect();
        entries.sort_by_key(|(screen, _)| *screen);
        entries
    }
}

/// Theme loader
pub struct ThemeLoader;

impl ThemeLoader {
    /// Load a theme by name using the default search roots
    pub fn load(name: &str) -> SettingsResult<Theme> {
        Self::load_with(name, &SearchRoots::from_env())
    }

    /// Load a theme by name
    ///
    /// The user directory is searched before the system-wide ones. A theme
    /// directory that exists always loads, whatever it contains.
    pub fn load_with(name: &str, roots: &SearchRoots) -> SettingsResult<Theme> {
        let root = roots.find(&theme_dir_name(name), EntryKind::Dir)?;
        Ok(Self::load_from_dir(name, &root))
    }

    /// Load a theme from a known directory
    pub fn load_from_dir(name: &str, dir: &Path) -> Theme {
        let root = std::path::absolute(dir).unwrap_or_else(|_| dir.to_path_buf());
        tracing::debug!("Loading theme {} from: {}", name, root.display());

        let qss = read_stylesheet(&root.join(STYLESHEET_FILE))
            .map(|text| rewrite_urls(&text, &root))
            .unwrap_or_default();
        let backgrounds = read_backgrounds(&root.join(WALLPAPER_FILE), &root);

        tracing::debug!(
            "Theme {}: {} bytes of stylesheet, {} background(s)",
            name,
            qss.len(),
            backgrounds.len()
        );

        Theme {
            name: name.to_string(),
            root,
            qss,
            backgrounds,
        }
    }

    /// Names of all themes across the search roots
    pub fn list_themes(roots: &SearchRoots) -> Vec<String> {
        let mut themes = BTreeSet::new();
        for root in roots.iter() {
            let Ok(entries) = std::fs::read_dir(root.join(THEMES_DIR)) else {
                continue;
            };
            for entry in entries.flatten() {
                if !entry.path().is_dir() {
                    continue;
                }
                if let Some(name) = entry.file_name().to_str() {
                    themes.insert(name.to_string());
                }
            }
        }
        themes.into_iter().collect()
    }
}

/// Relative path of a theme directory inside a search root
pub fn theme_dir_name(name: &str) -> String {
    format!("{}/{}", THEMES_DIR, name)
}

/// Rewrite relative `url()` references in `qss` to absolute paths under `base`
///
/// Absolute paths, Qt resources (`:/...`) and URLs with a scheme are kept.
pub fn rewrite_urls(qss: &str, base: &Path) -> String {
    URL_REF
        .replace_all(qss, |caps: &Captures| {
            let (quote, target) = match (caps.get(1), caps.get(2), caps.get(3)) {
                (Some(m), _, _) => ("\"", m.as_str()),
                (_, Some(m), _) => ("'", m.as_str()),
                (_, _, m) => ("", m.map_or("", |m| m.as_str())),
            };
            let target = target.trim();
            if target.is_empty() || !is_relative_ref(target) {
                return caps[0].to_string();
            }
            let target = target.strip_prefix("./").unwrap_or(target);
            format!("url({}{}{})", quote, base.join(target).display(), quote)
        })
        .into_owned()
}

fn is_relative_ref(target: &str) -> bool {
    if target.starts_with('/') || target.starts_with(':') {
        return false;
    }
    match target.split_once(':') {
        Some((scheme, _)) => {
            let mut chars = scheme.chars();
            !(chars.next().is_some_and(|c| c.is_ascii_alphabetic())
                && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')))
        }
        None => true,
    }
}

fn read_stylesheet(path: &Path) -> Option<String> {
    if !path.is_file() {
        return None;
    }
    match std::fs::read(path) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) => {
            tracing::warn!("Failed to read stylesheet {}: {}", path.display(), e);
            None
        }
    }
}

fn read_backgrounds(manifest: &Path, root: &Path) -> HashMap<Screen, PathBuf> {
    let mut backgrounds = HashMap::new();
    if !manifest.is_file() {
        return backgrounds;
    }
    let store = match IniStore::load(manifest) {
        Ok(store) => store,
        Err(e) => {
            tracing::warn!("Ignoring background manifest: {}", e);
            return backgrounds;
        }
    };

    // Keys in [wallpaper] override the same keys in General
    for section in ["", WALLPAPER_SECTION] {
        for key in store.child_keys(section) {
            let Some(screen) = Screen::from_key(key) else {
                tracing::warn!("Ignoring background for unknown screen {:?}", key);
                continue;
            };
            let full_key = if section.is_empty() {
                key.to_string()
            } else {
                format!("{}/{}", section, key)
            };
            if let Some(image) = store.get(&full_key).filter(|v| !v.is_empty()) {
                backgrounds.insert(screen, root.join(image));
            }
        }
    }
    backgrounds
}
