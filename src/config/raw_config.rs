use kswitcher_core::{ChordModifier, VirtualKey};
use serde::Deserialize;

use super::constants::DEFAULT_REPLAY_DELAY_MS;

/// On-disk shape of [`super::Config`]. Missing fields take their defaults;
/// validation happens in `TryFrom<RawConfig> for Config`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    pub text_correction_enabled: bool,
    pub layout_switch_enabled: bool,
    pub correction_key: u16,
    pub replay_delay_ms: u32,
    pub chord_first: ChordModifier,
    pub chord_second: ChordModifier,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            text_correction_enabled: true,
            layout_switch_enabled: true,
            correction_key: VirtualKey::PAUSE.code(),
            replay_delay_ms: DEFAULT_REPLAY_DELAY_MS,
            chord_first: ChordModifier::Alt,
            chord_second: ChordModifier::Shift,
        }
    }
}
