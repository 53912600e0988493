use std::{
    fs,
    path::PathBuf,
    sync::{Mutex, MutexGuard, OnceLock},
    time::{SystemTime, UNIX_EPOCH},
};

use kswitcher_core::{ChordModifier, VirtualKey};

use crate::config::{self, Config};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

pub(super) fn lock_env() -> MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("kswitcher-tests-{prefix}-{ts}"))
}

/// Points `APPDATA` at a fresh directory for the guard's lifetime.
pub(super) struct TempAppData {
    old: Option<std::ffi::OsString>,
    pub dir: PathBuf,
}

impl TempAppData {
    pub fn new(prefix: &str) -> Self {
        let old = std::env::var_os("APPDATA");
        let dir = unique_temp_dir(prefix);
        fs::create_dir_all(&dir).unwrap();
        unsafe { std::env::set_var("APPDATA", &dir) };
        Self { old, dir }
    }

    pub fn config_file(&self) -> PathBuf {
        self.dir.join("kSwitcher").join("config.toml")
    }
}

impl Drop for TempAppData {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe { std::env::set_var("APPDATA", v) },
            None => unsafe { std::env::remove_var("APPDATA") },
        }
        let _ = fs::remove_dir_all(&self.dir);
    }
}

#[test]
fn config_path_lives_under_appdata() {
    let _g = lock_env();
    let appdata = TempAppData::new("path");

    assert_eq!(config::config_path().unwrap(), appdata.config_file());
}

#[test]
fn config_save_and_load_roundtrip_via_appdata() {
    let _g = lock_env();
    let _appdata = TempAppData::new("roundtrip");

    let cfg = Config {
        text_correction_enabled: false,
        correction_key: VirtualKey::SCROLL,
        replay_delay_ms: 80,
        chord_first: ChordModifier::Control,
        chord_second: ChordModifier::Shift,
        ..Config::default()
    };

    config::save(&cfg).unwrap();
    assert_eq!(config::load().unwrap(), cfg);
}

#[test]
fn missing_file_loads_defaults() {
    let _g = lock_env();
    let appdata = TempAppData::new("missing");

    assert_eq!(config::load().unwrap(), Config::default());
    assert!(appdata.config_file().exists());
}

#[test]
fn missing_fields_take_defaults() {
    let _g = lock_env();
    let appdata = TempAppData::new("partial");

    let path = appdata.config_file();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "layout_switch_enabled = false\nchord_first = \"win\"\n").unwrap();

    let loaded = config::load().unwrap();
    assert!(!loaded.layout_switch_enabled);
    assert_eq!(loaded.chord_first, ChordModifier::Win);
    assert_eq!(loaded.correction_key, VirtualKey::PAUSE);
    assert_eq!(loaded.replay_delay_ms, 50);
}

#[test]
fn invalid_file_is_rejected_on_load() {
    let _g = lock_env();
    let appdata = TempAppData::new("invalid-file");

    let path = appdata.config_file();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "correction_key = 65\n").unwrap();

    assert!(config::load().is_err());
}

#[test]
fn config_save_rejects_invalid_config() {
    let _g = lock_env();
    let appdata = TempAppData::new("invalid-save");

    let cfg = Config {
        chord_first: ChordModifier::Alt,
        chord_second: ChordModifier::Alt,
        ..Config::default()
    };

    let err = config::save(&cfg).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
    assert!(err.to_string().contains("chord"));
    assert!(!appdata.config_file().exists());
}

#[test]
fn missing_appdata_is_not_found() {
    let _g = lock_env();
    let old = std::env::var_os("APPDATA");
    unsafe { std::env::remove_var("APPDATA") };

    let err = config::load().unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::NotFound);

    if let Some(v) = old {
        unsafe { std::env::set_var("APPDATA", v) };
    }
}
