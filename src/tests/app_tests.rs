use kswitcher_core::{ChordModifier, VirtualKey};

use super::{
    config_io_tests::{TempAppData, lock_env},
    support::{FakeHost, FakePlatform, WINDOW_A},
};
use crate::{
    app::AppState,
    config::{self, Config},
    input::KeyEvent,
};

fn app(cfg: Config) -> (std::rc::Rc<FakeHost>, FakePlatform, AppState<FakePlatform>) {
    let host = FakeHost::new();
    let platform = FakePlatform::focused(WINDOW_A);
    let mut state = AppState::new(cfg, platform.clone(), host.clone());
    state.start();
    (host, platform, state)
}

#[test]
fn start_follows_the_config() {
    let (host, _platform, state) = app(Config::default());
    assert!(state.correction().is_active());
    assert!(state.shortcut().is_enabled());
    assert_eq!(host.registry().len(), 2);

    let (host, _platform, state) = app(Config {
        text_correction_enabled: false,
        layout_switch_enabled: false,
        ..Config::default()
    });
    assert!(!state.correction().is_active());
    assert!(state.shortcut().is_active());
    assert!(!state.shortcut().is_enabled());
    assert_eq!(host.registry().len(), 1);
}

#[test]
fn toggles_change_the_running_features_and_persist() {
    let _g = lock_env();
    let _appdata = TempAppData::new("app-toggle");
    let (host, platform, mut state) = app(Config::default());

    assert!(!state.toggle_text_correction());
    assert!(!state.correction().is_active());
    assert_eq!(host.registry().len(), 1);
    assert!(!config::load().unwrap().text_correction_enabled);

    assert!(!state.toggle_layout_switch());
    host.key(KeyEvent::down(VirtualKey::LMENU));
    assert!(!host.key(KeyEvent::down(VirtualKey::LSHIFT)));
    assert_eq!(platform.layout_requests(), 0);
    assert!(!config::load().unwrap().layout_switch_enabled);

    assert!(state.toggle_text_correction());
    assert!(state.toggle_layout_switch());
    let saved = config::load().unwrap();
    assert!(saved.text_correction_enabled);
    assert!(saved.layout_switch_enabled);
}

#[test]
fn failed_start_keeps_the_setting() {
    let (host, _platform, mut state) = app(Config {
        text_correction_enabled: false,
        ..Config::default()
    });
    host.refuse_subscriptions();

    assert!(!state.toggle_text_correction());
    assert!(!state.config().text_correction_enabled);
}

#[test]
fn shutdown_drops_every_subscription() {
    let (host, _platform, mut state) = app(Config::default());

    state.shutdown();
    assert!(host.registry().is_empty());
}

#[test]
fn labels_name_the_configured_keys() {
    let (_host, _platform, state) = app(Config::default());
    assert_eq!(
        state.tooltip(),
        "kSwitcher - Alt+Shift to switch, Pause to correct text"
    );

    let menu = state.menu_state(true);
    assert_eq!(menu.text_correction_label, "Text Correction (Pause key)");
    assert_eq!(menu.layout_switch_label, "Layout Switch (Alt+Shift)");
    assert!(menu.text_correction && menu.layout_switch && menu.autostart);

    let (_host, _platform, state) = app(Config {
        correction_key: VirtualKey(0x7B),
        chord_first: ChordModifier::Control,
        chord_second: ChordModifier::Shift,
        ..Config::default()
    });
    let menu = state.menu_state(false);
    assert_eq!(menu.text_correction_label, "Text Correction (F12 key)");
    assert_eq!(menu.layout_switch_label, "Layout Switch (Ctrl+Shift)");
    assert!(!menu.autostart);
}
