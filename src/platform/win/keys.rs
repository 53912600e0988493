use kswitcher_core::VirtualKey;
use windows::Win32::UI::{
    Input::KeyboardAndMouse::{
        GetAsyncKeyState, GetKeyState, VIRTUAL_KEY, VK_CAPITAL, VK_CONTROL, VK_MENU, VK_SHIFT,
    },
    WindowsAndMessaging::{
        KBDLLHOOKSTRUCT, LLKHF_ALTDOWN, LLKHF_INJECTED, LLMHF_INJECTED, MSLLHOOKSTRUCT,
        WM_KEYDOWN, WM_KEYUP, WM_LBUTTONDOWN, WM_MBUTTONDOWN, WM_RBUTTONDOWN, WM_SYSKEYDOWN,
        WM_SYSKEYUP,
    },
};

use crate::input::{KeyEvent, KeyTransition, ModifierState, MouseButton, MouseEvent};

pub fn transition_for_msg(msg: u32) -> Option<KeyTransition> {
    match msg {
        WM_KEYDOWN | WM_SYSKEYDOWN => Some(KeyTransition::Down),
        WM_KEYUP | WM_SYSKEYUP => Some(KeyTransition::Up),
        _ => None,
    }
}

fn is_pressed(vk: VIRTUAL_KEY) -> bool {
    let state = unsafe { GetAsyncKeyState(i32::from(vk.0)) }.cast_unsigned();
    (state & 0x8000) != 0
}

fn caps_lock_on() -> bool {
    let state = unsafe { GetKeyState(i32::from(VK_CAPITAL.0)) }.cast_unsigned();
    (state & 0x0001) != 0
}

/// Samples the modifier keys as they were before the event being hooked.
pub fn modifiers_now(kb: &KBDLLHOOKSTRUCT) -> ModifierState {
    ModifierState {
        shift: is_pressed(VK_SHIFT),
        ctrl: is_pressed(VK_CONTROL),
        alt: kb.flags.contains(LLKHF_ALTDOWN) || is_pressed(VK_MENU),
        caps_lock: caps_lock_on(),
    }
}

pub fn key_event(msg: u32, kb: &KBDLLHOOKSTRUCT) -> Option<KeyEvent> {
    let transition = transition_for_msg(msg)?;
    let key = VirtualKey(u16::try_from(kb.vkCode).ok()?);

    Some(KeyEvent {
        key,
        transition,
        modifiers: modifiers_now(kb),
        injected: kb.flags.contains(LLKHF_INJECTED),
    })
}

pub fn mouse_event(msg: u32, ms: &MSLLHOOKSTRUCT) -> MouseEvent {
    let button = match msg {
        WM_LBUTTONDOWN => MouseButton::Left,
        WM_RBUTTONDOWN => MouseButton::Right,
        WM_MBUTTONDOWN => MouseButton::Middle,
        _ => return MouseEvent::Other,
    };

    MouseEvent::ButtonDown {
        button,
        injected: (ms.flags & LLMHF_INJECTED) != 0,
    }
}
