use windows::{
    Win32::{
        Foundation::{HWND, POINT},
        UI::{
            Shell::{
                NIF_ICON, NIF_MESSAGE, NIF_SHOWTIP, NIF_TIP, NIM_ADD, NIM_DELETE, NIM_MODIFY,
                NIM_SETVERSION, NOTIFY_ICON_MESSAGE, NOTIFYICON_VERSION_4, NOTIFYICONDATAW,
                Shell_NotifyIconW,
            },
            WindowsAndMessaging::{
                AppendMenuW, CreatePopupMenu, DestroyMenu, GetCursorPos, HICON, HMENU,
                IDI_APPLICATION, LoadIconW, MF_CHECKED, MF_SEPARATOR, MF_STRING, MF_UNCHECKED,
                SetForegroundWindow, TPM_BOTTOMALIGN, TPM_NOANIMATION, TPM_RETURNCMD,
                TPM_RIGHTALIGN, TPM_RIGHTBUTTON, TrackPopupMenu, WM_APP,
            },
        },
    },
    core::{PCWSTR, Result},
};

use crate::app::MenuState;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TrayMenuAction {
    None,
    ToggleTextCorrection,
    ToggleLayoutSwitch,
    ToggleAutostart,
    Exit,
}

pub const WM_APP_TRAY: u32 = WM_APP + 3;
const TRAY_UID: u32 = 1;
const ID_TEXT_CORRECTION: u32 = 1001;
const ID_LAYOUT_SWITCH: u32 = 1002;
const ID_AUTOSTART: u32 = 1003;
const ID_EXIT: u32 = 1004;

fn fill_wide(dst: &mut [u16], s: &str) {
    if let Some((last, body)) = dst.split_last_mut() {
        for (d, ch) in body
            .iter_mut()
            .zip(s.encode_utf16().chain(std::iter::repeat(0)))
        {
            *d = ch;
        }
        *last = 0;
    }
}

fn shell_notify(action: NOTIFY_ICON_MESSAGE, nid: &NOTIFYICONDATAW, what: &str) -> Result<()> {
    unsafe {
        if Shell_NotifyIconW(action, nid).as_bool() {
            Ok(())
        } else {
            Err(windows::core::Error::new(
                windows::core::HRESULT(0x8000_4005_u32.cast_signed()),
                format!("Shell_NotifyIconW returned FALSE: {what}"),
            ))
        }
    }
}

fn base_tray_nid(hwnd: HWND) -> Result<NOTIFYICONDATAW> {
    Ok(NOTIFYICONDATAW {
        cbSize: u32::try_from(core::mem::size_of::<NOTIFYICONDATAW>())?,
        hWnd: hwnd,
        uID: TRAY_UID,
        ..Default::default()
    })
}

fn stock_icon() -> Result<HICON> {
    unsafe { LoadIconW(None, IDI_APPLICATION) }
}

/// Adds the notification-area icon, or refreshes it when it already exists.
pub fn ensure_icon(hwnd: HWND, tooltip: &str) -> Result<()> {
    let mut nid = base_tray_nid(hwnd)?;
    nid.uCallbackMessage = WM_APP_TRAY;
    nid.uFlags = NIF_MESSAGE | NIF_ICON | NIF_TIP | NIF_SHOWTIP;
    nid.hIcon = stock_icon()?;
    fill_wide(&mut nid.szTip, tooltip);

    if !unsafe { Shell_NotifyIconW(NIM_ADD, &raw const nid).as_bool() } {
        shell_notify(NIM_MODIFY, &nid, "ensure_icon: NIM_MODIFY after NIM_ADD failure")?;
    }

    nid.Anonymous.uVersion = NOTIFYICON_VERSION_4;
    shell_notify(NIM_SETVERSION, &nid, "ensure_icon: NIM_SETVERSION")
}

pub fn remove_icon(hwnd: HWND) {
    let Ok(nid) = base_tray_nid(hwnd) else {
        return;
    };
    let _ = unsafe { Shell_NotifyIconW(NIM_DELETE, &raw const nid) };
}

unsafe fn show_popup_menu_at_cursor(hwnd: HWND, hmenu: HMENU) -> u32 {
    let mut pt = POINT { x: 0, y: 0 };
    let _ = unsafe { GetCursorPos(&raw mut pt) };

    // Without this the menu does not close when the user clicks elsewhere.
    let _ = unsafe { SetForegroundWindow(hwnd) };

    let result = unsafe {
        TrackPopupMenu(
            hmenu,
            TPM_RETURNCMD | TPM_BOTTOMALIGN | TPM_RIGHTALIGN | TPM_NOANIMATION | TPM_RIGHTBUTTON,
            pt.x,
            pt.y,
            Some(0),
            hwnd,
            None,
        )
    };
    result.0 as u32
}

fn append_item(hmenu: HMENU, id: u32, text: &str, checked: Option<bool>) -> Result<()> {
    let wide: Vec<u16> = text.encode_utf16().chain(std::iter::once(0)).collect();
    let check = match checked {
        Some(true) => MF_CHECKED,
        Some(false) | None => MF_UNCHECKED,
    };

    unsafe {
        AppendMenuW(
            hmenu,
            MF_STRING | check,
            id as usize,
            PCWSTR(wide.as_ptr()),
        )
    }
}

fn build_tray_menu(menu: &MenuState) -> Result<HMENU> {
    let hmenu = unsafe { CreatePopupMenu() }?;

    let filled = (|| {
        append_item(
            hmenu,
            ID_TEXT_CORRECTION,
            &menu.text_correction_label,
            Some(menu.text_correction),
        )?;
        append_item(
            hmenu,
            ID_LAYOUT_SWITCH,
            &menu.layout_switch_label,
            Some(menu.layout_switch),
        )?;
        append_item(hmenu, ID_AUTOSTART, "Start with Windows", Some(menu.autostart))?;
        unsafe { AppendMenuW(hmenu, MF_SEPARATOR, 0, PCWSTR::null()) }?;
        append_item(hmenu, ID_EXIT, "Exit", None)
    })();

    if let Err(e) = filled {
        let _ = unsafe { DestroyMenu(hmenu) };
        return Err(e);
    }

    Ok(hmenu)
}

fn action_for_cmd(cmd: u32) -> TrayMenuAction {
    match cmd {
        ID_TEXT_CORRECTION => TrayMenuAction::ToggleTextCorrection,
        ID_LAYOUT_SWITCH => TrayMenuAction::ToggleLayoutSwitch,
        ID_AUTOSTART => TrayMenuAction::ToggleAutostart,
        ID_EXIT => TrayMenuAction::Exit,
        _ => TrayMenuAction::None,
    }
}

pub fn show_tray_context_menu(hwnd: HWND, menu: &MenuState) -> Result<TrayMenuAction> {
    let hmenu = build_tray_menu(menu)?;
    let cmd = unsafe { show_popup_menu_at_cursor(hwnd, hmenu) };
    let _ = unsafe { DestroyMenu(hmenu) };
    Ok(action_for_cmd(cmd))
}
