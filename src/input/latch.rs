//! Two-modifier chord that asks the focused window for the next layout.
//!
//! The latch tracks whether each of the two keys is held. Firing spends the
//! chord: autorepeat of a held key cannot fire again until one of the two
//! keys has been released and pressed anew.

use std::{cell::Ref, rc::Rc};

use kswitcher_core::ChordModifier;

use super::{
    event::{HookDecision, KeyEvent, KeyTransition},
    observer::{HookError, HookHost, KeyObserver, ObserverHandle},
    os::InputPlatform,
};

#[derive(Debug)]
pub struct ShortcutLatch<P> {
    platform: P,
    first: ChordModifier,
    second: ChordModifier,
    enabled: bool,
    first_down: bool,
    second_down: bool,
    armed: bool,
    fired: u64,
}

impl<P: InputPlatform> ShortcutLatch<P> {
    pub fn new(platform: P, first: ChordModifier, second: ChordModifier) -> Self {
        Self {
            platform,
            first,
            second,
            enabled: true,
            first_down: false,
            second_down: false,
            armed: true,
            fired: 0,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Held state of the chord keys as `(first, second)`.
    pub fn latched(&self) -> (bool, bool) {
        (self.first_down, self.second_down)
    }

    /// False between a firing and the next release of a chord key.
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Number of layout changes requested so far.
    pub fn fired(&self) -> u64 {
        self.fired
    }

    fn fire(&mut self) {
        self.armed = false;
        self.fired += 1;

        let Some(window) = self.platform.foreground_window() else {
            tracing::debug!(msg = "chord_no_foreground");
            return;
        };

        if let Err(e) = self.platform.request_layout_change(window) {
            tracing::warn!(msg = "chord_layout_request_failed", error = %e);
        } else {
            tracing::debug!(msg = "chord_layout_requested");
        }
    }
}

impl<P: InputPlatform> KeyObserver for ShortcutLatch<P> {
    fn on_key(&mut self, event: &KeyEvent) -> HookDecision {
        if event.injected {
            return HookDecision::Pass;
        }

        let is_down = event.transition == KeyTransition::Down;
        if self.first.matches(event.key) {
            self.first_down = is_down;
        } else if self.second.matches(event.key) {
            self.second_down = is_down;
        } else {
            return HookDecision::Pass;
        }

        if !is_down {
            self.armed = true;
            return HookDecision::Pass;
        }

        if self.enabled && self.armed && self.first_down && self.second_down {
            self.fire();
            return HookDecision::Swallow;
        }

        HookDecision::Pass
    }
}

/// The layout-switch shortcut as seen by the shell.
#[derive(Debug)]
pub struct LayoutShortcut<P> {
    handle: ObserverHandle<ShortcutLatch<P>>,
}

impl<P: InputPlatform + 'static> LayoutShortcut<P> {
    pub fn new(
        platform: P,
        first: ChordModifier,
        second: ChordModifier,
        host: Rc<dyn HookHost>,
    ) -> Self {
        Self {
            handle: ObserverHandle::new(ShortcutLatch::new(platform, first, second), host),
        }
    }

    pub fn start(&mut self) -> Result<(), HookError> {
        self.handle.start()
    }

    pub fn stop(&mut self) {
        self.handle.stop();
    }

    pub fn is_active(&self) -> bool {
        self.handle.is_active()
    }

    pub fn enable(&mut self) {
        self.set_enabled(true);
    }

    pub fn disable(&mut self) {
        self.set_enabled(false);
    }

    fn set_enabled(&mut self, enabled: bool) {
        if let Some(mut latch) = self.handle.try_observer_mut() {
            latch.set_enabled(enabled);
            tracing::info!(msg = "layout_shortcut_toggled", enabled);
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.handle.observer().is_enabled()
    }

    pub fn latch(&self) -> Ref<'_, ShortcutLatch<P>> {
        self.handle.observer()
    }
}
