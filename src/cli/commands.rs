//! CLI command handlers

use anyhow::{Context, Result};
use clap::Subcommand;
use serde::Serialize;
use std::collections::BTreeMap;

use razor_settings::config::module::local_settings_path;
use razor_settings::{EntryKind, ModuleSettings, Screen, SearchRoots, ThemeLoader};

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print where a file or directory resolves to
    Path {
        /// File or directory name relative to a search root (e.g., "panel.conf")
        name: String,
        /// Look for a directory instead of a file
        #[arg(long)]
        dir: bool,
    },
    /// List the search roots in priority order
    Roots,
    /// Module settings management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
    /// Theme inspection
    Theme {
        #[command(subcommand)]
        subcommand: ThemeSubcommand,
    },
    /// Show version information
    Version,
}

/// Module settings subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Get a settings value, or all settings when no key is given
    Get {
        /// Module name (e.g., "panel")
        module: String,
        /// Settings key (e.g., "position" or "plugins/names")
        key: Option<String>,
    },
    /// Set a settings value
    Set {
        /// Module name
        module: String,
        /// Settings key
        key: String,
        /// Settings value
        value: String,
    },
    /// Remove a settings value
    Unset {
        /// Module name
        module: String,
        /// Settings key
        key: String,
    },
    /// List all settings of a module
    List {
        /// Module name
        module: String,
    },
    /// Show the settings file path of a module
    Path {
        /// Module name
        module: String,
    },
}

/// Theme subcommands
#[derive(Subcommand, Debug)]
pub enum ThemeSubcommand {
    /// List available themes
    List,
    /// Show what a theme provides
    Show {
        /// Theme name
        name: String,
        /// Print the rewritten stylesheet
        #[arg(long)]
        qss: bool,
    },
    /// Print the background image for a screen
    Background {
        /// Theme name
        name: String,
        /// Qt screen index, -1 for the default screen
        #[arg(long, default_value_t = -1, allow_hyphen_values = true)]
        screen: i32,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ThemeSummary {
    name: String,
    root: String,
    stylesheet_bytes: usize,
    backgrounds: BTreeMap<String, String>,
}

/// Dispatch a top-level command
pub fn handle_command(cmd: Command) -> Result<()> {
    let roots = SearchRoots::from_env();
    match cmd {
        Command::Path { name, dir } => {
            let kind = if dir { EntryKind::Dir } else { EntryKind::File };
            match roots.resolve(&name, kind) {
                Some(path) => println!("{}", path.display()),
                None => {
                    eprintln!("✗ {} not found. Checked locations:", name);
                    for candidate in roots.candidates(&name) {
                        eprintln!("  - {}", candidate.display());
                    }
                    std::process::exit(1);
                }
            }
        }
        Command::Roots => {
            for root in roots.iter() {
                println!("{}", root.display());
            }
        }
        Command::Config { subcommand } => handle_config_command(subcommand, &roots)?,
        Command::Theme { subcommand } => handle_theme_command(subcommand, &roots)?,
        Command::Version => super::display_version(),
    }

    Ok(())
}

fn open_module(module: &str, roots: &SearchRoots) -> Result<ModuleSettings> {
    ModuleSettings::open_with(module, roots)
        .with_context(|| format!("Failed to open settings for module: {}", module))
}

fn handle_config_command(cmd: ConfigSubcommand, roots: &SearchRoots) -> Result<()> {
    match cmd {
        ConfigSubcommand::Get { module, key } => {
            let settings = open_module(&module, roots)?;
            if let Some(key) = key {
                let value = settings
                    .store()
                    .get(&key)
                    .with_context(|| format!("{} has no value for {}", module, key))?;
                println!("{}", value);
            } else {
                print_settings(&settings)?;
            }
        }
        ConfigSubcommand::Set { module, key, value } => {
            let mut settings = open_module(&module, roots)?;
            settings.store_mut().set(&key, value);
            settings
                .store_mut()
                .sync()
                .context("Failed to save settings")?;
            println!("Settings saved to {}", settings.path().display());
        }
        ConfigSubcommand::Unset { module, key } => {
            let mut settings = open_module(&module, roots)?;
            if settings.store_mut().remove(&key).is_none() {
                println!("{} has no value for {}", module, key);
                return Ok(());
            }
            settings
                .store_mut()
                .sync()
                .context("Failed to save settings")?;
            println!("Removed {} from {}", key, settings.path().display());
        }
        ConfigSubcommand::List { module } => {
            let settings = open_module(&module, roots)?;
            print_settings(&settings)?;
        }
        ConfigSubcommand::Path { module } => {
            println!("{}", local_settings_path(roots.user_dir(), &module).display());
        }
    }

    Ok(())
}

fn print_settings(settings: &ModuleSettings) -> Result<()> {
    let yaml = serde_yaml::to_string(&settings.store().as_map())
        .context("Failed to serialize settings")?;
    print!("{}", yaml);
    Ok(())
}

fn handle_theme_command(cmd: ThemeSubcommand, roots: &SearchRoots) -> Result<()> {
    match cmd {
        ThemeSubcommand::List => {
            let themes = ThemeLoader::list_themes(roots);
            println!("Available themes:");
            for theme in themes {
                println!("  - {}", theme);
            }
        }
        ThemeSubcommand::Show { name, qss } => {
            let theme = ThemeLoader::load_with(&name, roots)
                .with_context(|| format!("Failed to load theme: {}", name))?;
            if qss {
                print!("{}", theme.qss());
                return Ok(());
            }
            let summary = ThemeSummary {
                name: theme.name().to_string(),
                root: theme.root().display().to_string(),
                stylesheet_bytes: theme.qss().len(),
                backgrounds: theme
                    .backgrounds()
                    .into_iter()
                    .map(|(screen, path)| (screen.to_string(), path.display().to_string()))
                    .collect(),
            };
            let yaml =
                serde_yaml::to_string(&summary).context("Failed to serialize theme summary")?;
            print!("{}", yaml);
        }
        ThemeSubcommand::Background { name, screen } => {
            let theme = ThemeLoader::load_with(&name, roots)
                .with_context(|| format!("Failed to load theme: {}", name))?;
            match theme.background_for(Screen::from_qt_index(screen)) {
                Some(path) => println!("{}", path.display()),
                None => {
                    eprintln!("✗ Theme {} has no background for screen {}", name, screen);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
