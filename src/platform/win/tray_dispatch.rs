use std::{
    sync::{Mutex, OnceLock},
    time::{Duration, Instant},
};

use windows::Win32::{
    Foundation::{HWND, LPARAM, LRESULT},
    UI::WindowsAndMessaging::{WM_CONTEXTMENU, WM_LBUTTONUP, WM_RBUTTONUP},
};

use super::{
    autostart,
    state::{with_state_mut, with_state_mut_do},
    tray::{TrayMenuAction, show_tray_context_menu},
};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum TrayEvent {
    LeftClick,
    RightClick,
    Unknown,
}

fn tray_event_from_lparam(raw: u32) -> TrayEvent {
    match raw & 0xFFFF {
        WM_LBUTTONUP => TrayEvent::LeftClick,
        WM_RBUTTONUP | WM_CONTEXTMENU => TrayEvent::RightClick,
        _ => TrayEvent::Unknown,
    }
}

/// Shell sends both `WM_RBUTTONUP` and `WM_CONTEXTMENU` for one right click.
fn should_open_tray_menu(event: TrayEvent) -> bool {
    if event == TrayEvent::Unknown {
        return false;
    }

    static LAST_OPEN_AT: OnceLock<Mutex<Option<Instant>>> = OnceLock::new();

    let now = Instant::now();
    let Ok(mut last) = LAST_OPEN_AT.get_or_init(|| Mutex::new(None)).lock() else {
        tracing::warn!(msg = "tray_menu_dedup_lock_poisoned");
        return true;
    };

    if let Some(prev) = *last
        && now.duration_since(prev) < Duration::from_millis(250)
    {
        tracing::debug!(msg = "tray_menu_dedup_suppressed", event = ?event);
        return false;
    }

    *last = Some(now);
    true
}

fn toggle_autostart() {
    let desired = match autostart::is_enabled() {
        Ok(enabled) => !enabled,
        Err(e) => {
            tracing::warn!(msg = "autostart_state_read_failed", error = %e);
            return;
        }
    };

    match autostart::apply_startup_shortcut(desired) {
        Ok(()) => tracing::info!(msg = "autostart_toggled", enabled = desired),
        Err(e) => tracing::warn!(msg = "autostart_update_failed", error = %e),
    }
}

pub fn handle_tray_message(hwnd: HWND, lparam: LPARAM) -> LRESULT {
    let event = tray_event_from_lparam(lparam.0 as u32);
    if !should_open_tray_menu(event) {
        return LRESULT(0);
    }

    let autostart = autostart::is_enabled().unwrap_or_else(|e| {
        tracing::warn!(msg = "autostart_state_read_failed", error = %e);
        false
    });

    let Some(menu) = with_state_mut(hwnd, |state| state.menu_state(autostart)) else {
        return LRESULT(0);
    };

    let action = match show_tray_context_menu(hwnd, &menu) {
        Ok(action) => action,
        Err(e) => {
            tracing::warn!(msg = "tray_menu_failed", error = %e);
            return LRESULT(0);
        }
    };

    tracing::debug!(msg = "tray_menu_action", action = ?action);

    match action {
        TrayMenuAction::None => {}
        TrayMenuAction::ToggleTextCorrection => {
            with_state_mut_do(hwnd, |state| {
                state.toggle_text_correction();
            });
        }
        TrayMenuAction::ToggleLayoutSwitch => {
            with_state_mut_do(hwnd, |state| {
                state.toggle_layout_switch();
            });
        }
        TrayMenuAction::ToggleAutostart => toggle_autostart(),
        TrayMenuAction::Exit => super::request_exit(hwnd),
    }

    LRESULT(0)
}
