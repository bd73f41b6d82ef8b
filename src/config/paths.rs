//! Search root resolution
//!
//! A file or directory name is looked up in a fixed order:
//! - user config directory (RAZOR_CONFIG_DIR or ~/.razor)
//! - the share directory baked in at build time (RAZOR_SHARE_DIR)
//! - /usr/local/share/razor
//! - /usr/share/razor
//!
//! The first root holding an entry of the requested kind wins. Roots are never
//! merged.

use super::{SettingsError, SettingsResult};
use std::path::{Path, PathBuf};

/// Directory name of the user config directory under $HOME
pub const USER_DIR_NAME: &str = ".razor";

/// Share directory chosen at build time
pub const SHARE_DIR: &str = match option_env!("RAZOR_SHARE_DIR") {
    Some(dir) => dir,
    None => "/usr/local/share/razor",
};

const PREFIX_DIRS: [&str; 2] = ["/usr/local/share/razor", "/usr/share/razor"];

/// Get the user configuration directory
///
/// Checks RAZOR_CONFIG_DIR first, then falls back to ~/.razor
pub fn user_config_dir() -> PathBuf {
    std::env::var("RAZOR_CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            use directories::BaseDirs;
            BaseDirs::new()
                .map(|dirs| dirs.home_dir().join(USER_DIR_NAME))
                .unwrap_or_else(|| PathBuf::from(".").join(USER_DIR_NAME))
        })
}

/// System-wide roots in priority order
pub fn system_dirs() -> Vec<PathBuf> {
    std::iter::once(SHARE_DIR)
        .chain(PREFIX_DIRS)
        .map(PathBuf::from)
        .collect()
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.is_dir() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Which filesystem entries count as a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    Any,
}

impl EntryKind {
    fn matches(self, path: &Path) -> bool {
        match self {
            EntryKind::File => path.is_file(),
            EntryKind::Dir => path.is_dir(),
            EntryKind::Any => path.exists(),
        }
    }
}

/// Ordered list of directories searched for settings and themes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRoots {
    user_dir: PathBuf,
    system: Vec<PathBuf>,
}

impl SearchRoots {
    /// Build roots from an explicit user directory and system directories.
    /// Repeated directories keep their first position.
    pub fn new(user_dir: impl Into<PathBuf>, system: impl IntoIterator<Item = PathBuf>) -> Self {
        let user_dir = user_dir.into();
        let mut unique: Vec<PathBuf> = Vec::new();
        for dir in system {
            if dir != user_dir && !unique.contains(&dir) {
                unique.push(dir);
            }
        }
        Self {
            user_dir,
            system: unique,
        }
    }

    /// Roots for the running user and this installation
    pub fn from_env() -> Self {
        Self::new(user_config_dir(), system_dirs())
    }

    /// Same system roots, different user directory
    pub fn with_user_dir(&self, user_dir: impl Into<PathBuf>) -> Self {
        Self::new(user_dir, self.system.clone())
    }

    pub fn user_dir(&self) -> &Path {
        &self.user_dir
    }

    pub fn system_roots(&self) -> &[PathBuf] {
        &self.system
    }

    /// All roots, highest priority first
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        std::iter::once(self.user_dir.as_path()).chain(self.system.iter().map(PathBuf::as_path))
    }

    /// Every location `name` would be looked up at, in priority order
    pub fn candidates(&self, name: &str) -> Vec<PathBuf> {
        self.iter().map(|root| root.join(name)).collect()
    }

    /// Find the first root holding `name`
    pub fn resolve(&self, name: &str, kind: EntryKind) -> Option<PathBuf> {
        first_match(self.iter(), name, kind)
    }

    /// Like [`resolve`](Self::resolve) but skips the user directory
    pub fn resolve_system(&self, name: &str, kind: EntryKind) -> Option<PathBuf> {
        first_match(self.system.iter().map(PathBuf::as_path), name, kind)
    }

    /// Like [`resolve`](Self::resolve), reporting the searched locations on failure
    pub fn find(&self, name: &str, kind: EntryKind) -> SettingsResult<PathBuf> {
        self.resolve(name, kind).ok_or_else(|| SettingsError::NotFound {
            name: name.to_string(),
            searched: self.candidates(name),
        })
    }
}

fn first_match<'a>(
    roots: impl Iterator<Item = &'a Path>,
    name: &str,
    kind: EntryKind,
) -> Option<PathBuf> {
    for root in roots {
        let candidate = root.join(name);
        if kind.matches(&candidate) {
            tracing::debug!("Resolved {} to {}", name, candidate.display());
            return Some(candidate);
        }
    }
    tracing::debug!("{} ({:?}) not found in any search root", name, kind);
    None
}
