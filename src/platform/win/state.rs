use windows::Win32::{
    Foundation::HWND,
    UI::WindowsAndMessaging::{GWLP_USERDATA, GetWindowLongPtrW},
};

use super::ShellState;

pub(crate) fn with_state_mut<R>(hwnd: HWND, f: impl FnOnce(&mut ShellState) -> R) -> Option<R> {
    unsafe {
        let p = GetWindowLongPtrW(hwnd, GWLP_USERDATA) as *mut ShellState;
        (!p.is_null()).then(|| f(&mut *p))
    }
}

pub(crate) fn with_state_mut_do(hwnd: HWND, f: impl FnOnce(&mut ShellState)) {
    let _ = with_state_mut(hwnd, f);
}
