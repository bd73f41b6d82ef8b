//! Settings and theme resolution for Razor modules
//!
//! Every module keeps its own INI file in the user config directory. The file is
//! seeded from a system-wide template the first time the module is opened.
//! Themes are looked up the same way: the user directory wins over the
//! installation prefixes.

pub mod module;
pub mod paths;
pub mod store;
pub mod theme_loader;

pub use module::ModuleSettings;
pub use paths::{EntryKind, SearchRoots};
pub use store::IniStore;
pub use theme_loader::{Screen, Theme, ThemeLoader};

use std::path::PathBuf;

/// Settings errors
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("{name} not found in any search root")]
    NotFound {
        name: String,
        searched: Vec<PathBuf>,
    },

    #[error("Failed to create {}: {source}", path.display())]
    CreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to copy {} to {}: {source}", from.display(), to.display())]
    CopyFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for settings operations
pub type SettingsResult<T> = Result<T, SettingsError>;
