use std::time::Duration;

use windows::Win32::{
    Foundation::{HWND, LPARAM, WPARAM},
    UI::{
        Input::KeyboardAndMouse::{
            INPUT, INPUT_0, INPUT_KEYBOARD, KEYBD_EVENT_FLAGS, KEYBDINPUT, KEYEVENTF_KEYUP,
            SendInput, VIRTUAL_KEY,
        },
        WindowsAndMessaging::{GetForegroundWindow, PostMessageW, WM_INPUTLANGCHANGEREQUEST},
    },
};

use crate::input::{InputPlatform, KeyTransition, PlatformError, SyntheticKey, WindowId};

/// `wParam` of `WM_INPUTLANGCHANGEREQUEST`: switch to the next installed layout.
const INPUTLANGCHANGE_FORWARD: usize = 0x0002;

fn input_struct_size_i32() -> Option<i32> {
    i32::try_from(std::mem::size_of::<INPUT>()).ok()
}

fn key_input(key: &SyntheticKey) -> INPUT {
    let flags = match key.transition {
        KeyTransition::Down => KEYBD_EVENT_FLAGS(0),
        KeyTransition::Up => KEYEVENTF_KEYUP,
    };

    INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: VIRTUAL_KEY(key.key.code()),
                wScan: 0,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    }
}

/// [`InputPlatform`] over `SendInput` and `WM_INPUTLANGCHANGEREQUEST`.
#[derive(Copy, Clone, Debug, Default)]
pub struct WinInput;

impl InputPlatform for WinInput {
    fn foreground_window(&self) -> Option<WindowId> {
        let hwnd = unsafe { GetForegroundWindow() };
        (!hwnd.0.is_null()).then(|| WindowId(hwnd.0 as isize))
    }

    fn send_keys(&mut self, keys: &[SyntheticKey]) -> Result<(), PlatformError> {
        if keys.is_empty() {
            return Ok(());
        }

        let inputs: Vec<INPUT> = keys.iter().map(key_input).collect();
        let Some(input_size) = input_struct_size_i32() else {
            return Err(PlatformError::PartialInput {
                sent: 0,
                requested: inputs.len(),
            });
        };

        let sent = unsafe { SendInput(&inputs, input_size) } as usize;
        if sent == inputs.len() {
            Ok(())
        } else {
            Err(PlatformError::PartialInput {
                sent,
                requested: inputs.len(),
            })
        }
    }

    fn request_layout_change(&mut self, window: WindowId) -> Result<(), PlatformError> {
        unsafe {
            PostMessageW(
                Some(HWND(window.0 as *mut _)),
                WM_INPUTLANGCHANGEREQUEST,
                WPARAM(INPUTLANGCHANGE_FORWARD),
                LPARAM(0),
            )
        }
        .map_err(|e| PlatformError::LayoutRequest(e.to_string()))
    }

    fn settle(&mut self, delay: Duration) {
        std::thread::sleep(delay);
    }
}
