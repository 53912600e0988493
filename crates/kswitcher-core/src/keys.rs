// File: src/keys.rs

/// A Win32 virtual-key code.
///
/// The value is the logical key, not the character it produces: the same
/// `VirtualKey` types different text depending on the active layout, which
/// is what makes retyping under another layout meaningful.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct VirtualKey(pub u16);

impl VirtualKey {
    pub const BACK: Self = Self(0x08);
    pub const TAB: Self = Self(0x09);
    pub const RETURN: Self = Self(0x0D);
    pub const SHIFT: Self = Self(0x10);
    pub const CONTROL: Self = Self(0x11);
    pub const MENU: Self = Self(0x12);
    pub const PAUSE: Self = Self(0x13);
    pub const CAPITAL: Self = Self(0x14);
    pub const ESCAPE: Self = Self(0x1B);
    pub const SPACE: Self = Self(0x20);
    pub const PRIOR: Self = Self(0x21);
    pub const NEXT: Self = Self(0x22);
    pub const END: Self = Self(0x23);
    pub const HOME: Self = Self(0x24);
    pub const LEFT: Self = Self(0x25);
    pub const UP: Self = Self(0x26);
    pub const RIGHT: Self = Self(0x27);
    pub const DOWN: Self = Self(0x28);
    pub const LWIN: Self = Self(0x5B);
    pub const RWIN: Self = Self(0x5C);
    pub const NUMPAD0: Self = Self(0x60);
    pub const NUMPAD9: Self = Self(0x69);
    pub const F1: Self = Self(0x70);
    pub const F24: Self = Self(0x87);
    pub const SCROLL: Self = Self(0x91);
    pub const LSHIFT: Self = Self(0xA0);
    pub const RSHIFT: Self = Self(0xA1);
    pub const LCONTROL: Self = Self(0xA2);
    pub const RCONTROL: Self = Self(0xA3);
    pub const LMENU: Self = Self(0xA4);
    pub const RMENU: Self = Self(0xA5);
    /// `;:` on US layouts. First of the contiguous OEM punctuation range.
    pub const OEM_1: Self = Self(0xBA);
    /// `` `~ `` on US layouts. Last of the first OEM punctuation range.
    pub const OEM_3: Self = Self(0xC0);
    /// `[{` on US layouts. First of the second OEM punctuation range.
    pub const OEM_4: Self = Self(0xDB);
    pub const OEM_8: Self = Self(0xDF);

    /// Returns the key for an ASCII letter or digit, as laid out on the
    /// keyboard (letters map to their uppercase code).
    #[must_use]
    pub const fn from_ascii(ch: u8) -> Option<Self> {
        match ch {
            b'a'..=b'z' => Some(Self((ch - b'a' + b'A') as u16)),
            b'A'..=b'Z' | b'0'..=b'9' => Some(Self(ch as u16)),
            b' ' => Some(Self::SPACE),
            _ => None,
        }
    }

    #[must_use]
    pub const fn code(self) -> u16 {
        self.0
    }

    const fn in_range(self, lo: u16, hi: u16) -> bool {
        self.0 >= lo && self.0 <= hi
    }

    /// Keys that produce a printable character on a typical layout.
    #[must_use]
    pub const fn is_character(self) -> bool {
        self.in_range(b'A' as u16, b'Z' as u16)
            || self.in_range(b'0' as u16, b'9' as u16)
            || self.in_range(Self::NUMPAD0.0, Self::NUMPAD9.0)
            || self.in_range(Self::OEM_1.0, Self::OEM_3.0)
            || self.in_range(Self::OEM_4.0, Self::OEM_8.0)
            || self.0 == Self::SPACE.0
    }

    /// Keys after which the caret is no longer at the end of the tracked text.
    #[must_use]
    pub const fn is_navigation(self) -> bool {
        matches!(
            self,
            Self::LEFT
                | Self::RIGHT
                | Self::UP
                | Self::DOWN
                | Self::HOME
                | Self::END
                | Self::PRIOR
                | Self::NEXT
                | Self::RETURN
                | Self::TAB
                | Self::ESCAPE
        )
    }

    #[must_use]
    pub const fn is_modifier(self) -> bool {
        matches!(
            self,
            Self::SHIFT
                | Self::LSHIFT
                | Self::RSHIFT
                | Self::CONTROL
                | Self::LCONTROL
                | Self::RCONTROL
                | Self::MENU
                | Self::LMENU
                | Self::RMENU
                | Self::LWIN
                | Self::RWIN
        )
    }

    #[must_use]
    pub const fn class(self) -> KeyClass {
        if self.is_navigation() {
            KeyClass::Navigation
        } else if self.0 == Self::BACK.0 {
            KeyClass::Backspace
        } else if self.is_character() {
            KeyClass::Character
        } else {
            KeyClass::Other
        }
    }
}

impl From<u16> for VirtualKey {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

/// How a key-down affects the text tracked since the last reset.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum KeyClass {
    /// Arrows, Home/End, PageUp/PageDown, Enter, Tab, Escape.
    Navigation,
    Backspace,
    /// Letters, digits, numpad digits, OEM punctuation and space.
    Character,
    Other,
}

/// One of the modifier keys that can take part in the layout-switch chord.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ChordModifier {
    Alt,
    Shift,
    Control,
    Win,
}

impl ChordModifier {
    /// True for the generic, left and right virtual keys of this modifier.
    #[must_use]
    pub const fn matches(self, key: VirtualKey) -> bool {
        match self {
            Self::Alt => matches!(key, VirtualKey::MENU | VirtualKey::LMENU | VirtualKey::RMENU),
            Self::Shift => matches!(
                key,
                VirtualKey::SHIFT | VirtualKey::LSHIFT | VirtualKey::RSHIFT
            ),
            Self::Control => matches!(
                key,
                VirtualKey::CONTROL | VirtualKey::LCONTROL | VirtualKey::RCONTROL
            ),
            Self::Win => matches!(key, VirtualKey::LWIN | VirtualKey::RWIN),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Alt => "Alt",
            Self::Shift => "Shift",
            Self::Control => "Ctrl",
            Self::Win => "Win",
        }
    }
}
