use kswitcher_core::VirtualKey;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum KeyTransition {
    Down,
    Up,
}

/// Modifier state sampled by the OS boundary when the event was delivered.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ModifierState {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    /// Caps Lock toggle state, not whether the key is held.
    pub caps_lock: bool,
}

impl ModifierState {
    /// Ctrl or Alt held: the keystroke is a shortcut, not text.
    pub fn is_shortcut(self) -> bool {
        self.ctrl || self.alt
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct KeyEvent {
    pub key: VirtualKey,
    pub transition: KeyTransition,
    pub modifiers: ModifierState,
    /// Set by the OS for events produced through the synthetic input path.
    pub injected: bool,
}

impl KeyEvent {
    pub fn down(key: VirtualKey) -> Self {
        Self {
            key,
            transition: KeyTransition::Down,
            modifiers: ModifierState::default(),
            injected: false,
        }
    }

    pub fn up(key: VirtualKey) -> Self {
        Self {
            transition: KeyTransition::Up,
            ..Self::down(key)
        }
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: ModifierState) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[must_use]
    pub fn injected(mut self) -> Self {
        self.injected = true;
        self
    }

    pub fn is_down(&self) -> bool {
        self.transition == KeyTransition::Down
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MouseEvent {
    ButtonDown { button: MouseButton, injected: bool },
    /// Moves, wheel, button releases.
    Other,
}

/// What the hook tells the OS to do with the event it was given.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum HookDecision {
    #[default]
    Pass,
    Swallow,
}

impl HookDecision {
    pub fn should_swallow(self) -> bool {
        matches!(self, Self::Swallow)
    }
}

/// One synthetic key transition handed to the injection primitive.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SyntheticKey {
    pub key: VirtualKey,
    pub transition: KeyTransition,
}

impl SyntheticKey {
    pub const fn down(key: VirtualKey) -> Self {
        Self {
            key,
            transition: KeyTransition::Down,
        }
    }

    pub const fn up(key: VirtualKey) -> Self {
        Self {
            key,
            transition: KeyTransition::Up,
        }
    }
}

/// Opaque handle of a top-level window (an `HWND` on Windows).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct WindowId(pub isize);
