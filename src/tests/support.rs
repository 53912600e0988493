use std::{
    cell::{Cell, RefCell},
    rc::Rc,
    time::Duration,
};

use kswitcher_core::VirtualKey;

use crate::input::{
    HookError, HookHost, InputPlatform, KeyEvent, KeyTransition, ModifierState, MouseButton,
    MouseEvent, ObserverRegistry, PlatformError, SharedObserver, Subscription, SyntheticKey,
    WindowId,
};

pub const WINDOW_A: WindowId = WindowId(0xA);
pub const WINDOW_B: WindowId = WindowId(0xB);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Send(Vec<SyntheticKey>),
    Layout(WindowId),
    Settle(Duration),
}

#[derive(Debug, Default)]
struct FakeState {
    calls: Vec<Call>,
    foreground: Option<WindowId>,
    sends: usize,
    fail_send_number: Option<usize>,
    fail_layout: bool,
    panic_on_layout: bool,
    loopback: Option<Rc<ObserverRegistry>>,
}

/// Records every OS call and optionally feeds injected keys back into a
/// registry, like the real synthetic input path does.
#[derive(Clone, Debug, Default)]
pub struct FakePlatform(Rc<RefCell<FakeState>>);

impl FakePlatform {
    pub fn focused(window: WindowId) -> Self {
        let platform = Self::default();
        platform.set_foreground(Some(window));
        platform
    }

    pub fn set_foreground(&self, window: Option<WindowId>) {
        self.0.borrow_mut().foreground = window;
    }

    /// Fails the `n`th `send_keys` call, counting from 1.
    pub fn fail_send(&self, n: usize) {
        self.0.borrow_mut().fail_send_number = Some(n);
    }

    pub fn fail_layout(&self) {
        self.0.borrow_mut().fail_layout = true;
    }

    pub fn panic_on_layout(&self) {
        self.0.borrow_mut().panic_on_layout = true;
    }

    /// Re-delivers injected keys to `registry` without the injected flag.
    pub fn loop_back_into(&self, registry: Rc<ObserverRegistry>) {
        self.0.borrow_mut().loopback = Some(registry);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.0.borrow_mut().calls.clear();
    }

    pub fn layout_requests(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Layout(_)))
            .count()
    }

    pub fn sent_keys(&self) -> Vec<SyntheticKey> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Send(keys) => Some(keys),
                _ => None,
            })
            .flatten()
            .collect()
    }

    /// Keys tapped down, in order, ignoring Shift and key-ups.
    pub fn replayed_down_keys(&self) -> Vec<VirtualKey> {
        self.sent_keys()
            .into_iter()
            .filter(|k| {
                k.transition == KeyTransition::Down
                    && k.key != VirtualKey::BACK
                    && k.key != VirtualKey::SHIFT
            })
            .map(|k| k.key)
            .collect()
    }

    pub fn backspaces(&self) -> usize {
        self.sent_keys()
            .iter()
            .filter(|k| k.key == VirtualKey::BACK && k.transition == KeyTransition::Down)
            .count()
    }
}

impl InputPlatform for FakePlatform {
    fn foreground_window(&self) -> Option<WindowId> {
        self.0.borrow().foreground
    }

    fn send_keys(&mut self, keys: &[SyntheticKey]) -> Result<(), PlatformError> {
        let (fail, loopback) = {
            let mut state = self.0.borrow_mut();
            state.sends += 1;
            let fail = state.fail_send_number == Some(state.sends);
            if !fail {
                state.calls.push(Call::Send(keys.to_vec()));
            }
            (fail, state.loopback.clone())
        };

        if fail {
            return Err(PlatformError::PartialInput {
                sent: 0,
                requested: keys.len(),
            });
        }

        if let Some(registry) = loopback {
            for key in keys {
                let event = KeyEvent {
                    key: key.key,
                    transition: key.transition,
                    modifiers: ModifierState::default(),
                    injected: false,
                };
                registry.dispatch_key(&event);
            }
        }

        Ok(())
    }

    fn request_layout_change(&mut self, window: WindowId) -> Result<(), PlatformError> {
        let (fail, panic) = {
            let state = self.0.borrow();
            (state.fail_layout, state.panic_on_layout)
        };

        if panic {
            panic!("layout request exploded");
        }

        if fail {
            return Err(PlatformError::LayoutRequest("post rejected".to_owned()));
        }

        self.0.borrow_mut().calls.push(Call::Layout(window));
        Ok(())
    }

    fn settle(&mut self, delay: Duration) {
        self.0.borrow_mut().calls.push(Call::Settle(delay));
    }
}

/// In-process [`HookHost`] over a shared registry.
#[derive(Debug, Default)]
pub struct FakeHost {
    registry: Rc<ObserverRegistry>,
    refuse: Cell<bool>,
}

impl FakeHost {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn registry(&self) -> Rc<ObserverRegistry> {
        Rc::clone(&self.registry)
    }

    pub fn refuse_subscriptions(&self) {
        self.refuse.set(true);
    }

    pub fn key(&self, event: KeyEvent) -> bool {
        self.registry.dispatch_key(&event).should_swallow()
    }

    /// Down then up. Returns whether the down was swallowed.
    pub fn tap(&self, key: VirtualKey) -> bool {
        let swallowed = self.key(KeyEvent::down(key));
        self.key(KeyEvent::up(key));
        swallowed
    }

    pub fn click(&self) {
        self.registry.dispatch_mouse(&MouseEvent::ButtonDown {
            button: MouseButton::Left,
            injected: false,
        });
    }

    /// Types ASCII letters, digits and spaces; uppercase letters are typed with Shift.
    pub fn type_text(&self, text: &str) {
        for ch in text.bytes() {
            let key = VirtualKey::from_ascii(ch)
                .unwrap_or_else(|| panic!("no key for {:?}", ch as char));
            let modifiers = ModifierState {
                shift: ch.is_ascii_uppercase(),
                ..ModifierState::default()
            };
            self.key(KeyEvent::down(key).with_modifiers(modifiers));
            self.key(KeyEvent::up(key).with_modifiers(modifiers));
        }
    }
}

impl HookHost for FakeHost {
    fn subscribe(&self, observer: SharedObserver) -> Result<Subscription, HookError> {
        if self.refuse.get() {
            return Err(HookError::Install {
                stream: "keyboard",
                reason: "access denied".to_owned(),
            });
        }

        let id = self.registry.register(observer);
        let registry = Rc::clone(&self.registry);
        Ok(Subscription::new(id, move |id| {
            registry.unregister(id);
        }))
    }
}

pub fn keys(text: &str) -> Vec<VirtualKey> {
    text.bytes().filter_map(VirtualKey::from_ascii).collect()
}
