//! Tests for theme loading and background selection

use razor_settings::config::theme_loader::{rewrite_urls, STYLESHEET_FILE, WALLPAPER_FILE};
use razor_settings::{Screen, SearchRoots, SettingsError, ThemeLoader};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn setup() -> (TempDir, SearchRoots) {
    let tmp = TempDir::new().unwrap();
    let roots = SearchRoots::new(
        tmp.path().join("home/.razor"),
        vec![tmp.path().join("usr/share/razor")],
    );
    (tmp, roots)
}

fn theme_dir(root: &Path, name: &str) -> PathBuf {
    let dir = root.join("themes").join(name);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn screen(n: u32) -> Screen {
    Screen::number(n).unwrap()
}

#[test]
fn test_background_fallback_order() {
    let (_tmp, roots) = setup();
    let dir = theme_dir(&roots.system_roots()[0], "ambiance");
    std::fs::write(
        dir.join(WALLPAPER_FILE),
        "1=first.png\n2=second.png\nany=fallback.png\n",
    )
    .unwrap();

    let theme = ThemeLoader::load_with("ambiance", &roots).unwrap();
    assert_eq!(theme.background_for(screen(2)), Some(dir.join("second.png").as_path()));
    assert_eq!(theme.background_for(screen(1)), Some(dir.join("first.png").as_path()));
    assert_eq!(theme.background_for(screen(5)), Some(dir.join("fallback.png").as_path()));
    assert_eq!(
        theme.background_for(Screen::Default),
        Some(dir.join("fallback.png").as_path())
    );
}

#[test]
fn test_background_without_default_is_none() {
    let (_tmp, roots) = setup();
    let dir = theme_dir(&roots.system_roots()[0], "dual");
    std::fs::write(dir.join(WALLPAPER_FILE), "1=left.png\n").unwrap();

    let theme = ThemeLoader::load_with("dual", &roots).unwrap();
    assert_eq!(theme.background_for(screen(1)), Some(dir.join("left.png").as_path()));
    assert_eq!(theme.background_for(screen(2)), None);
    assert_eq!(theme.background_for(Screen::Default), None);
}

#[test]
fn test_qt_index_maps_to_manifest_numbering() {
    let (_tmp, roots) = setup();
    let dir = theme_dir(&roots.system_roots()[0], "dual");
    std::fs::write(dir.join(WALLPAPER_FILE), "1=left.png\n2=right.png\n-1=any.png\n").unwrap();

    let theme = ThemeLoader::load_with("dual", &roots).unwrap();
    assert_eq!(
        theme.background_for(Screen::from_qt_index(0)),
        Some(dir.join("left.png").as_path())
    );
    assert_eq!(
        theme.background_for(Screen::from_qt_index(1)),
        Some(dir.join("right.png").as_path())
    );
    assert_eq!(
        theme.background_for(Screen::from_qt_index(-1)),
        Some(dir.join("any.png").as_path())
    );
}

#[test]
fn test_stylesheet_has_no_relative_references() {
    let (_tmp, roots) = setup();
    let dir = theme_dir(&roots.system_roots()[0], "ambiance");
    std::fs::write(
        dir.join(STYLESHEET_FILE),
        "#Panel { background-image: url(images/panel.png); }\n\
         QToolButton { qproperty-icon: url( 'icons/menu.svg' ); }\n",
    )
    .unwrap();

    let theme = ThemeLoader::load_with("ambiance", &roots).unwrap();
    let prefix = theme.root().display().to_string();
    assert!(theme.root().is_absolute());
    assert_eq!(theme.qss().matches("url(").count(), 2);
    for reference in theme.qss().split("url(").skip(1) {
        let target = reference.trim_start_matches(['\'', '"']);
        assert!(
            target.starts_with(&prefix),
            "reference not rewritten: {}",
            reference
        );
    }
}

#[test]
fn test_empty_theme_loads() {
    let (_tmp, roots) = setup();
    theme_dir(&roots.system_roots()[0], "bare");

    let theme = ThemeLoader::load_with("bare", &roots).unwrap();
    assert_eq!(theme.qss(), "");
    assert_eq!(theme.background_for(Screen::Default), None);
    assert_eq!(theme.background_for(screen(1)), None);
    assert!(theme.backgrounds().is_empty());
}

#[test]
fn test_user_theme_shadows_system_theme() {
    let (_tmp, roots) = setup();
    let system = theme_dir(&roots.system_roots()[0], "ambiance");
    std::fs::write(system.join(STYLESHEET_FILE), "QWidget { color: red; }").unwrap();
    let user = theme_dir(roots.user_dir(), "ambiance");

    let theme = ThemeLoader::load_with("ambiance", &roots).unwrap();
    assert_eq!(theme.root(), user.as_path());
    // No merging with the system copy
    assert_eq!(theme.qss(), "");
}

#[test]
fn test_missing_theme_is_not_found() {
    let (_tmp, roots) = setup();
    let err = ThemeLoader::load_with("nope", &roots).unwrap_err();
    assert!(matches!(err, SettingsError::NotFound { .. }));
}

#[test]
fn test_list_themes_across_roots() {
    let (_tmp, roots) = setup();
    theme_dir(roots.user_dir(), "mine");
    theme_dir(roots.user_dir(), "ambiance");
    theme_dir(&roots.system_roots()[0], "ambiance");
    theme_dir(&roots.system_roots()[0], "light");
    std::fs::write(roots.user_dir().join("themes/notes.txt"), "").unwrap();

    assert_eq!(
        ThemeLoader::list_themes(&roots),
        vec!["ambiance", "light", "mine"]
    );
}

#[test]
fn test_rewrite_is_independent_of_filesystem() {
    let out = rewrite_urls("a { image: url(x.png); }", Path::new("/nowhere/theme"));
    assert_eq!(out, "a { image: url(/nowhere/theme/x.png); }");
}
