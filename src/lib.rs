//! Razor settings library
//!
//! Resolves per-module settings files and themes across the user config
//! directory and the system-wide installation prefixes.

pub mod config;

// Re-export commonly used types for convenience
pub use config::{
    EntryKind, IniStore, ModuleSettings, Screen, SearchRoots, SettingsError, SettingsResult,
    Theme, ThemeLoader,
};
