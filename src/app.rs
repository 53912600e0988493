//! Shell state: the two keyboard features and the settings that drive them.
//!
//! Menu toggles change the running features and persist the new setting.
//! The Windows shell stores one `AppState` in its hidden window.

use std::rc::Rc;

use kswitcher_core::VirtualKey;

use crate::{
    config::{self, Config},
    input::{HookHost, InputInterceptor, InputPlatform, LayoutShortcut},
};

/// Everything the tray menu needs to render itself.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MenuState {
    pub text_correction: bool,
    pub text_correction_label: String,
    pub layout_switch: bool,
    pub layout_switch_label: String,
    pub autostart: bool,
}

#[derive(Debug)]
pub struct AppState<P> {
    config: Config,
    correction: InputInterceptor<P>,
    shortcut: LayoutShortcut<P>,
}

fn key_label(key: VirtualKey) -> String {
    match key {
        VirtualKey::PAUSE => "Pause".to_owned(),
        VirtualKey::SCROLL => "Scroll Lock".to_owned(),
        VirtualKey::CAPITAL => "Caps Lock".to_owned(),
        k if (VirtualKey::F1.code()..=VirtualKey::F24.code()).contains(&k.code()) => {
            format!("F{}", k.code() - VirtualKey::F1.code() + 1)
        }
        k => format!("0x{:02X}", k.code()),
    }
}

impl<P: InputPlatform + Clone + 'static> AppState<P> {
    pub fn new(config: Config, platform: P, host: Rc<dyn HookHost>) -> Self {
        let (first, second) = config.chord();
        Self {
            correction: InputInterceptor::new(
                platform.clone(),
                config.correction_settings(),
                Rc::clone(&host),
            ),
            shortcut: LayoutShortcut::new(platform, first, second, host),
            config,
        }
    }

    /// Brings both features up as the config describes. The latch stays
    /// subscribed while disabled so it never misses a modifier release.
    pub fn start(&mut self) {
        if self.config.text_correction_enabled
            && let Err(e) = self.correction.start()
        {
            tracing::warn!(msg = "text_correction_start_failed", error = %e);
        }

        if self.config.layout_switch_enabled {
            self.shortcut.enable();
        } else {
            self.shortcut.disable();
        }

        if let Err(e) = self.shortcut.start() {
            tracing::warn!(msg = "layout_shortcut_start_failed", error = %e);
        }
    }

    pub fn shutdown(&mut self) {
        self.correction.stop();
        self.shortcut.stop();
        tracing::info!(msg = "shell_stopped");
    }

    /// Returns whether text correction is running afterwards.
    pub fn toggle_text_correction(&mut self) -> bool {
        let enable = !self.correction.is_active();

        if enable {
            if let Err(e) = self.correction.start() {
                tracing::warn!(msg = "text_correction_start_failed", error = %e);
                return false;
            }
        } else {
            self.correction.stop();
        }

        self.config.text_correction_enabled = enable;
        self.persist();
        enable
    }

    /// Returns whether the layout-switch chord is enabled afterwards.
    pub fn toggle_layout_switch(&mut self) -> bool {
        let enable = !self.shortcut.is_enabled();

        if enable {
            self.shortcut.enable();
        } else {
            self.shortcut.disable();
        }

        self.config.layout_switch_enabled = enable;
        self.persist();
        enable
    }

    fn persist(&self) {
        if let Err(e) = config::save(&self.config) {
            tracing::warn!(msg = "config_save_failed", error = %e);
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn correction(&self) -> &InputInterceptor<P> {
        &self.correction
    }

    pub fn shortcut(&self) -> &LayoutShortcut<P> {
        &self.shortcut
    }

    fn chord_label(&self) -> String {
        let (first, second) = self.config.chord();
        format!("{}+{}", first.as_str(), second.as_str())
    }

    pub fn tooltip(&self) -> String {
        format!(
            "kSwitcher - {} to switch, {} to correct text",
            self.chord_label(),
            key_label(self.config.correction_key)
        )
    }

    pub fn menu_state(&self, autostart: bool) -> MenuState {
        MenuState {
            text_correction: self.correction.is_active(),
            text_correction_label: format!(
                "Text Correction ({} key)",
                key_label(self.config.correction_key)
            ),
            layout_switch: self.shortcut.is_enabled(),
            layout_switch_label: format!("Layout Switch ({})", self.chord_label()),
            autostart,
        }
    }
}
