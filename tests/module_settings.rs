//! Tests for opening module settings

use razor_settings::{ModuleSettings, SearchRoots};
use tempfile::TempDir;

const PANEL_TEMPLATE: &str = "; system panel defaults\n\
position=bottom\n\
\n\
[plugins]\n\
names=mainmenu, quicklaunch, clock\n";

fn setup() -> (TempDir, SearchRoots) {
    let tmp = TempDir::new().unwrap();
    let share = tmp.path().join("usr/share/razor");
    std::fs::create_dir_all(&share).unwrap();
    let roots = SearchRoots::new(tmp.path().join("home/.razor"), vec![share]);
    (tmp, roots)
}

#[test]
fn test_open_without_any_file_creates_empty_store() {
    let (_tmp, roots) = setup();

    let mut settings = ModuleSettings::open_with("panel", &roots).unwrap();
    let local = roots.user_dir().join("panel.conf");
    assert!(local.is_file());
    assert_eq!(std::fs::read_to_string(&local).unwrap(), "");
    assert!(settings.store().all_keys().is_empty());

    settings.store_mut().set("position", "top");
    settings.store_mut().sync().unwrap();
    assert!(std::fs::read_to_string(&local).unwrap().contains("position=top"));
}

#[test]
fn test_open_copies_system_template_verbatim() {
    let (_tmp, roots) = setup();
    let template = roots.system_roots()[0].join("panel.conf");
    std::fs::write(&template, PANEL_TEMPLATE).unwrap();

    let settings = ModuleSettings::open_with("panel", &roots).unwrap();
    let local = roots.user_dir().join("panel.conf");
    assert_eq!(
        std::fs::read(&local).unwrap(),
        std::fs::read(&template).unwrap()
    );
    assert_eq!(settings.store().get("position"), Some("bottom"));
    assert_eq!(
        settings.store().get("plugins/names"),
        Some("mainmenu, quicklaunch, clock")
    );
}

#[test]
fn test_second_open_keeps_local_changes() {
    let (_tmp, roots) = setup();
    let template = roots.system_roots()[0].join("panel.conf");
    std::fs::write(&template, PANEL_TEMPLATE).unwrap();

    {
        let mut settings = ModuleSettings::open_with("panel", &roots).unwrap();
        settings.store_mut().set("position", "left");
    }

    // Template changes after the first open are not migrated
    std::fs::write(&template, "position=right\n").unwrap();

    let settings = ModuleSettings::open_with("panel", &roots).unwrap();
    assert_eq!(settings.store().get("position"), Some("left"));
    assert_eq!(
        settings.store().get("plugins/names"),
        Some("mainmenu, quicklaunch, clock")
    );
}

#[test]
fn test_existing_local_file_is_used_as_is() {
    let (_tmp, roots) = setup();
    std::fs::create_dir_all(roots.user_dir()).unwrap();
    std::fs::write(roots.user_dir().join("desktop.conf"), "wallpaper=/home/u/a.png\n").unwrap();
    std::fs::write(
        roots.system_roots()[0].join("desktop.conf"),
        "wallpaper=/usr/share/b.png\n",
    )
    .unwrap();

    let settings = ModuleSettings::open_with("desktop", &roots).unwrap();
    assert_eq!(settings.store().get("wallpaper"), Some("/home/u/a.png"));
}

#[test]
fn test_modules_are_independent() {
    let (_tmp, roots) = setup();
    let mut panel = ModuleSettings::open_with("panel", &roots).unwrap();
    let runner = ModuleSettings::open_with("runner", &roots).unwrap();

    panel.store_mut().set("height", "28");
    panel.store_mut().sync().unwrap();

    assert_eq!(panel.module(), "panel");
    assert_eq!(runner.module(), "runner");
    assert_ne!(panel.path(), runner.path());
    assert_eq!(runner.store().get("height"), None);
}

#[test]
fn test_open_with_latin1_template_stays_usable() {
    let (_tmp, roots) = setup();
    std::fs::write(
        roots.system_roots()[0].join("panel.conf"),
        b"title=Caf\xe9\nposition=bottom\n",
    )
    .unwrap();

    for _ in 0..2 {
        let settings = ModuleSettings::open_with("panel", &roots).unwrap();
        assert_eq!(settings.store().get("position"), Some("bottom"));
        assert!(settings.store().contains("title"));
    }
}
