use kswitcher_core::VirtualKey;

use super::{buffer::KeystrokeRecord, event::SyntheticKey};

/// One backspace tap per character to delete.
pub fn erase_sequence(chars: usize) -> Vec<SyntheticKey> {
    (0..chars)
        .flat_map(|_| [SyntheticKey::down(VirtualKey::BACK), SyntheticKey::up(VirtualKey::BACK)])
        .collect()
}

/// The taps that retype `record`, wrapped in Shift when it was typed shifted.
///
/// Caps Lock is not reproduced: the target layout's live Caps Lock state
/// applies to the replayed keys.
pub fn replay_sequence(record: &KeystrokeRecord) -> Vec<SyntheticKey> {
    let mut keys = Vec::with_capacity(4);

    if record.shift {
        keys.push(SyntheticKey::down(VirtualKey::SHIFT));
    }
    keys.push(SyntheticKey::down(record.key));
    keys.push(SyntheticKey::up(record.key));
    if record.shift {
        keys.push(SyntheticKey::up(VirtualKey::SHIFT));
    }

    keys
}
