//! Per-module settings
//!
//! `ModuleSettings::open("panel")` guarantees `<user dir>/panel.conf` exists
//! before binding a store to it. A missing file is seeded once from the
//! system-wide template, or created empty when there is none. Later changes
//! to the template are not picked up.

use super::paths::{self, EntryKind, SearchRoots};
use super::store::IniStore;
use super::{SettingsError, SettingsResult};
use std::path::{Path, PathBuf};

/// Extension of module settings files
pub const SETTINGS_EXT: &str = "conf";

/// Settings of one module, backed by its file in the user config directory
#[derive(Debug)]
pub struct ModuleSettings {
    module: String,
    store: IniStore,
}

impl ModuleSettings {
    /// Open settings for `module` using the default search roots
    pub fn open(module: &str) -> SettingsResult<Self> {
        Self::open_with(module, &SearchRoots::from_env())
    }

    /// Open settings for `module` using custom search roots
    pub fn open_with(module: &str, roots: &SearchRoots) -> SettingsResult<Self> {
        ensure_config_dir(roots.user_dir())?;

        let file_name = settings_file_name(module);
        let local = roots.user_dir().join(&file_name);
        if !local.exists() {
            seed_local_file(&local, roots.resolve_system(&file_name, EntryKind::File))?;
        }

        let store = IniStore::load(&local)?;
        Ok(Self {
            module: module.to_string(),
            store,
        })
    }

    /// Module name this handle was opened with
    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }

    pub fn store(&self) -> &IniStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut IniStore {
        &mut self.store
    }
}

/// File name used for a module's settings
pub fn settings_file_name(module: &str) -> String {
    format!("{}.{}", module, SETTINGS_EXT)
}

/// Local settings path for `module` under `user_dir`
pub fn local_settings_path(user_dir: &Path, module: &str) -> PathBuf {
    user_dir.join(settings_file_name(module))
}

/// Make sure the user config directory exists
pub fn ensure_config_dir(dir: &Path) -> SettingsResult<()> {
    paths::ensure_dir(dir).map_err(|source| SettingsError::CreateFailed {
        path: dir.to_path_buf(),
        source,
    })
}

fn seed_local_file(local: &Path, template: Option<PathBuf>) -> SettingsResult<()> {
    if let Some(template) = template {
        match copy_template(&template, local) {
            Ok(()) => {
                tracing::info!(
                    "Copied settings template {} to {}",
                    template.display(),
                    local.display()
                );
                return Ok(());
            }
            Err(e) => tracing::warn!("{}, starting with empty settings", e),
        }
    } else {
        tracing::debug!("No settings template for {}", local.display());
    }

    std::fs::File::create(local).map_err(|source| SettingsError::CreateFailed {
        path: local.to_path_buf(),
        source,
    })?;
    tracing::info!("Created empty settings file: {}", local.display());
    Ok(())
}

fn copy_template(template: &Path, local: &Path) -> SettingsResult<()> {
    std::fs::copy(template, local)
        .map(|_| ())
        .map_err(|source| SettingsError::CopyFailed {
            from: template.to_path_buf(),
            to: local.to_path_buf(),
            source,
        })
}
