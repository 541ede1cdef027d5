//! Selections made in the UI survive a restart

mod common;

use common::*;
use crossterm::event::KeyCode;
use std::sync::Arc;

use terrui::config::Config;
use terrui::tui::{Context, PageController, ScreenId};

#[tokio::test]
async fn test_selection_is_persisted_and_restored() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("terrui").join("config.toml");

    let config = Config::load_from(&path).expect("load config");
    assert!(path.exists());

    let api = Arc::new(FakeTfe::default());
    let mut controller = PageController::new(Context::new(config, api.clone()));
    controller.start(None);
    settle(&mut controller).await;
    press(&mut controller, key(KeyCode::Enter));
    settle(&mut controller).await;
    press(&mut controller, key(KeyCode::Enter));
    assert_eq!(controller.active(), Some(ScreenId::Workspace));

    let saved = Config::load_from(&path).expect("reload config");
    assert_eq!(saved.organization, "acme");
    assert_eq!(saved.workspace, "networking");
    assert!(saved.workspace_show_vars);

    let restarted = Context::new(saved, api);
    assert_eq!(restarted.startup_screen(), ScreenId::Workspace);
    assert_eq!(restarted.nav.run_id, "");
}

#[tokio::test]
async fn test_clearing_the_organization_is_persisted() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "organization = \"acme\"\nworkspace = \"networking\"\n").expect("write config");

    let config = Config::load_from(&path).expect("load config");
    let mut controller = PageController::new(Context::new(config, Arc::new(FakeTfe::default())));
    controller.start(None);
    assert_eq!(controller.active(), Some(ScreenId::Workspace));
    settle(&mut controller).await;

    press(&mut controller, ctrl('o'));

    let saved = Config::load_from(&path).expect("reload config");
    assert_eq!(saved.organization, "");
    assert_eq!(saved.workspace, "");
}

#[tokio::test]
async fn test_hidden_variables_shrink_focus_cycle() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "organization = \"acme\"\nworkspace = \"networking\"\nworkspace_show_vars = false\n",
    )
    .expect("write config");

    let config = Config::load_from(&path).expect("load config");
    let mut controller = PageController::new(Context::new(config, Arc::new(FakeTfe::default())));
    controller.start(None);
    settle(&mut controller).await;

    for _ in 0..3 {
        press(&mut controller, key(KeyCode::Tab));
    }
    assert!(workspace_screen(&controller).focus().is_some());
    press(&mut controller, key(KeyCode::Tab));
    assert!(workspace_screen(&controller).focus().is_none());
    assert!(!controller.keys().has_overlay("runs"));
}
