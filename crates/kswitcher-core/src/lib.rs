pub mod keys;

pub use keys::{ChordModifier, KeyClass, VirtualKey};
