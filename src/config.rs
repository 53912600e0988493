mod config_validator;
pub mod constants;
pub mod raw_config;

use std::{
    io,
    path::{Path, PathBuf},
    time::Duration,
};

use kswitcher_core::{ChordModifier, VirtualKey};
pub use raw_config::RawConfig;
use serde::{Deserialize, Deserializer, Serialize};

use crate::input::CorrectionSettings;

const APP_DIR: &str = "kSwitcher";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Config {
    pub text_correction_enabled: bool,
    pub layout_switch_enabled: bool,
    pub correction_key: VirtualKey,
    pub replay_delay_ms: u32,
    pub chord_first: ChordModifier,
    pub chord_second: ChordModifier,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            text_correction_enabled: true,
            layout_switch_enabled: true,
            correction_key: VirtualKey::PAUSE,
            replay_delay_ms: constants::DEFAULT_REPLAY_DELAY_MS,
            chord_first: ChordModifier::Alt,
            chord_second: ChordModifier::Shift,
        }
    }
}

pub fn config_path() -> io::Result<PathBuf> {
    let appdata = std::env::var_os("APPDATA")
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "APPDATA is not set"))?;

    Ok(PathBuf::from(appdata).join(APP_DIR).join(CONFIG_FILE))
}

fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    let Some(dir) = path.parent() else {
        return Ok(());
    };
    std::fs::create_dir_all(dir)
}

fn confy_err(e: confy::ConfyError) -> io::Error {
    io::Error::other(e)
}

pub fn load() -> io::Result<Config> {
    let path = config_path()?;
    ensure_parent_dir(&path)?;

    confy::load_path(&path).map_err(confy_err)
}

pub fn save(cfg: &Config) -> io::Result<()> {
    cfg.validate()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let path = config_path()?;
    ensure_parent_dir(&path)?;
    confy::store_path(path, cfg).map_err(confy_err)
}

impl TryFrom<RawConfig> for Config {
    type Error = String;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        let cfg = Self {
            text_correction_enabled: raw.text_correction_enabled,
            layout_switch_enabled: raw.layout_switch_enabled,
            correction_key: VirtualKey(raw.correction_key),
            replay_delay_ms: raw.replay_delay_ms,
            chord_first: raw.chord_first,
            chord_second: raw.chord_second,
        };
        cfg.validate()?;
        Ok(cfg)
    }
}

impl<'de> Deserialize<'de> for Config {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawConfig::deserialize(deserializer)?;
        Self::try_from(raw).map_err(serde::de::Error::custom)
    }
}

impl Config {
    pub fn correction_settings(&self) -> CorrectionSettings {
        CorrectionSettings {
            trigger: self.correction_key,
            settle: Duration::from_millis(u64::from(self.replay_delay_ms)),
        }
    }

    pub fn chord(&self) -> (ChordModifier, ChordModifier) {
        (self.chord_first, self.chord_second)
    }
}
