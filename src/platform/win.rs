//! The hidden window, its tray icon and the message loop.
//!
//! The window lives for the whole process. Its user data holds the shell
//! state, which owns both keyboard features; destroying the window drops
//! their subscriptions and with them the OS hooks.

mod autostart;
mod hooks;
mod input;
mod keys;
mod state;
mod tray;
mod tray_dispatch;
mod window;

use std::{rc::Rc, sync::OnceLock};

use windows::{
    Win32::{
        Foundation::{HWND, LPARAM, LRESULT, WPARAM},
        System::LibraryLoader::GetModuleHandleW,
        UI::WindowsAndMessaging::{
            DefWindowProcW, DestroyWindow, GWLP_USERDATA, PostQuitMessage, RegisterWindowMessageW,
            SetWindowLongPtrW, WM_CREATE, WM_DESTROY, WM_NCDESTROY,
        },
    },
    core::{PCWSTR, Result, w},
};

pub use self::{hooks::WinHookHost, input::WinInput};
use self::{
    state::with_state_mut_do,
    tray::{WM_APP_TRAY, ensure_icon, remove_icon},
    window::{create_hidden_window, message_loop, register_main_class},
};
use crate::{app::AppState, config};

pub(crate) type ShellState = AppState<WinInput>;

/// Broadcast by Explorer when the taskbar is recreated; the tray icon must be re-added.
fn taskbar_created_message_id() -> u32 {
    static ID: OnceLock<u32> = OnceLock::new();
    *ID.get_or_init(|| unsafe { RegisterWindowMessageW(w!("TaskbarCreated")) })
}

fn load_config_or_default() -> config::Config {
    config::load().unwrap_or_else(|e| {
        tracing::warn!(msg = "config_load_failed_using_defaults", error = %e);
        config::Config::default()
    })
}

fn show_tray_icon(hwnd: HWND) {
    let mut tooltip = String::new();
    with_state_mut_do(hwnd, |state| tooltip = state.tooltip());

    if let Err(e) = ensure_icon(hwnd, &tooltip) {
        tracing::warn!(msg = "tray_ensure_icon_failed", error = %e);
    }
}

fn on_create(hwnd: HWND) -> LRESULT {
    let cfg = load_config_or_default();
    let mut state = Box::new(ShellState::new(cfg, WinInput, Rc::new(WinHookHost)));
    state.start();

    unsafe {
        SetWindowLongPtrW(hwnd, GWLP_USERDATA, Box::into_raw(state) as isize);
    }

    show_tray_icon(hwnd);
    tracing::info!(msg = "shell_started");
    LRESULT(0)
}

fn on_destroy(hwnd: HWND) -> LRESULT {
    with_state_mut_do(hwnd, |state| state.shutdown());
    remove_icon(hwnd);
    unsafe { PostQuitMessage(0) };
    LRESULT(0)
}

unsafe fn on_ncdestroy(hwnd: HWND) -> LRESULT {
    let p = unsafe { SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0) } as *mut ShellState;
    if !p.is_null() {
        drop(unsafe { Box::from_raw(p) });
    }
    LRESULT(0)
}

pub(crate) fn request_exit(hwnd: HWND) {
    // Remove the icon first so Shell stops sending callbacks.
    remove_icon(hwnd);
    if let Err(e) = unsafe { DestroyWindow(hwnd) } {
        tracing::warn!(msg = "destroy_window_failed", error = %e);
        unsafe { PostQuitMessage(0) };
    }
}

/// Creates the hidden window and runs the message loop until exit.
///
/// The global hooks are installed on this thread, so it must keep pumping
/// messages for as long as they are active.
pub fn run() -> Result<()> {
    let class_name = w!("kSwitcherHiddenWindow");
    let hinstance = unsafe { GetModuleHandleW(PCWSTR::null()) }?.into();

    register_main_class(class_name, hinstance)?;
    let _hwnd = create_hidden_window(class_name, hinstance)?;

    message_loop()
}

pub extern "system" fn wndproc(hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    if msg == taskbar_created_message_id() {
        show_tray_icon(hwnd);
        return LRESULT(0);
    }

    match msg {
        WM_CREATE => on_create(hwnd),
        WM_APP_TRAY => tray_dispatch::handle_tray_message(hwnd, lparam),
        WM_DESTROY => on_destroy(hwnd),
        WM_NCDESTROY => unsafe { on_ncdestroy(hwnd) },
        _ => unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
    }
}
