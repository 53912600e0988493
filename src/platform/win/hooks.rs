//! The process-wide low-level keyboard and mouse hooks.
//!
//! Windows calls the hook procedures on the thread that installed them, so
//! the subscriber registry is thread-local to the UI thread. Hooks are only
//! installed while somebody listens.

use std::sync::atomic::{AtomicIsize, Ordering};

use windows::Win32::{
    Foundation::{LPARAM, LRESULT, WPARAM},
    UI::WindowsAndMessaging::{
        CallNextHookEx, HC_ACTION, HHOOK, KBDLLHOOKSTRUCT, MSLLHOOKSTRUCT, SetWindowsHookExW,
        UnhookWindowsHookEx, WH_KEYBOARD_LL, WH_MOUSE_LL, WINDOWS_HOOK_ID,
    },
};

use super::keys::{key_event, mouse_event};
use crate::input::{
    HookDecision, HookError, HookHost, MouseEvent, ObserverRegistry, SharedObserver,
    Subscription, SubscriptionId,
};

type HookProc = unsafe extern "system" fn(i32, WPARAM, LPARAM) -> LRESULT;

static KEYBOARD_HOOK: AtomicIsize = AtomicIsize::new(0);
static MOUSE_HOOK: AtomicIsize = AtomicIsize::new(0);

thread_local! {
    static REGISTRY: ObserverRegistry = ObserverRegistry::new();
}

fn hook_handle(slot: &AtomicIsize) -> Option<HHOOK> {
    let h = slot.load(Ordering::Relaxed);
    (h != 0).then_some(HHOOK(h as *mut _))
}

extern "system" fn keyboard_proc(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    let hook = hook_handle(&KEYBOARD_HOOK);
    if code != HC_ACTION.cast_signed() {
        return unsafe { CallNextHookEx(hook, code, wparam, lparam) };
    }

    let Ok(msg) = u32::try_from(wparam.0) else {
        return unsafe { CallNextHookEx(hook, code, wparam, lparam) };
    };

    let kb = unsafe { &*(lparam.0 as *const KBDLLHOOKSTRUCT) };
    let decision = key_event(msg, kb).map_or(HookDecision::Pass, |event| {
        REGISTRY
            .try_with(|registry| registry.dispatch_key(&event))
            .unwrap_or_default()
    });

    if decision.should_swallow() {
        return LRESULT(1);
    }

    unsafe { CallNextHookEx(hook, code, wparam, lparam) }
}

extern "system" fn mouse_proc(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    let hook = hook_handle(&MOUSE_HOOK);
    if code != HC_ACTION.cast_signed() {
        return unsafe { CallNextHookEx(hook, code, wparam, lparam) };
    }

    if let Ok(msg) = u32::try_from(wparam.0) {
        let ms = unsafe { &*(lparam.0 as *const MSLLHOOKSTRUCT) };
        let event = mouse_event(msg, ms);
        if event != MouseEvent::Other {
            let _ = REGISTRY.try_with(|registry| registry.dispatch_mouse(&event));
        }
    }

    unsafe { CallNextHookEx(hook, code, wparam, lparam) }
}

fn sync_hook(
    slot: &AtomicIsize,
    id: WINDOWS_HOOK_ID,
    proc: HookProc,
    wanted: bool,
    stream: &'static str,
) -> Result<(), HookError> {
    let installed = slot.load(Ordering::Relaxed) != 0;

    if wanted && !installed {
        let h = unsafe { SetWindowsHookExW(id, Some(proc), None, 0) }.map_err(|e| {
            HookError::Install {
                stream,
                reason: e.to_string(),
            }
        })?;
        slot.store(h.0 as isize, Ordering::Relaxed);
        tracing::info!(msg = "hook_installed", stream);
    } else if !wanted && installed {
        let h = slot.swap(0, Ordering::Relaxed);
        if let Err(e) = unsafe { UnhookWindowsHookEx(HHOOK(h as *mut _)) } {
            tracing::warn!(msg = "hook_remove_failed", stream, error = %e);
        } else {
            tracing::info!(msg = "hook_removed", stream);
        }
    }

    Ok(())
}

/// Brings the installed hooks in line with the current subscribers.
fn sync_hooks() -> Result<(), HookError> {
    let (keyboard, mouse) = REGISTRY
        .try_with(|registry| (!registry.is_empty(), registry.wants_mouse()))
        .unwrap_or((false, false));

    sync_hook(&KEYBOARD_HOOK, WH_KEYBOARD_LL, keyboard_proc, keyboard, "keyboard")?;
    sync_hook(&MOUSE_HOOK, WH_MOUSE_LL, mouse_proc, mouse, "mouse")
}

fn release(id: SubscriptionId) {
    let _ = REGISTRY.try_with(|registry| registry.unregister(id));
    if let Err(e) = sync_hooks() {
        tracing::warn!(msg = "hook_sync_failed", error = %e);
    }
}

/// [`HookHost`] backed by `WH_KEYBOARD_LL` and `WH_MOUSE_LL`.
///
/// Must be used from the thread that runs the message loop.
#[derive(Copy, Clone, Debug, Default)]
pub struct WinHookHost;

impl HookHost for WinHookHost {
    fn subscribe(&self, observer: SharedObserver) -> Result<Subscription, HookError> {
        let id = REGISTRY
            .try_with(|registry| registry.register(observer))
            .map_err(|_| HookError::Install {
                stream: "keyboard",
                reason: "hook thread is shutting down".to_owned(),
            })?;

        if let Err(e) = sync_hooks() {
            release(id);
            return Err(e);
        }

        Ok(Subscription::new(id, release))
    }
}
