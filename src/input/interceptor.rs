//! The text-correction engine.
//!
//! The engine remembers the character keys typed since the caret last
//! moved, and on the trigger key deletes that many characters, asks the
//! focused window for the next layout and types the same keys again.
//! It never reads on-screen text; everything it knows it observed itself.
//! Injected keystrokes are not tracked, so text typed through another
//! program's synthetic input (an on-screen keyboard, say) is never corrected.

use std::{cell::Ref, rc::Rc, time::Duration};

use kswitcher_core::{KeyClass, VirtualKey};

use super::{
    buffer::{CorrectionHistory, KeystrokeBuffer, KeystrokeRecord},
    event::{HookDecision, KeyEvent, MouseEvent, WindowId},
    observer::{HookError, HookHost, KeyObserver, ObserverHandle},
    os::InputPlatform,
    replay,
};
use crate::domain::outcome::{CorrectionOutcome, Failure, SkipReason};

/// Pause between the layout request and the replay. Shorter pauses let the
/// first replayed keys land in the old layout.
pub const DEFAULT_SETTLE: Duration = Duration::from_millis(50);

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct CorrectionSettings {
    pub trigger: VirtualKey,
    pub settle: Duration,
}

impl Default for CorrectionSettings {
    fn default() -> Self {
        Self {
            trigger: VirtualKey::PAUSE,
            settle: DEFAULT_SETTLE,
        }
    }
}

/// Sets the reentrancy flag for its lifetime, including while unwinding.
struct ReentryGuard<'a>(&'a mut bool);

impl<'a> ReentryGuard<'a> {
    fn enter(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for ReentryGuard<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

#[derive(Debug)]
pub struct CorrectionEngine<P> {
    platform: P,
    settings: CorrectionSettings,
    buffer: KeystrokeBuffer,
    history: CorrectionHistory,
    focus: Option<WindowId>,
    correcting: bool,
}

impl<P: InputPlatform> CorrectionEngine<P> {
    pub fn new(platform: P, settings: CorrectionSettings) -> Self {
        Self {
            platform,
            settings,
            buffer: KeystrokeBuffer::new(),
            history: CorrectionHistory::default(),
            focus: None,
            correcting: false,
        }
    }

    pub fn buffer(&self) -> &KeystrokeBuffer {
        &self.buffer
    }

    pub fn history(&self) -> &CorrectionHistory {
        &self.history
    }

    pub fn is_correcting(&self) -> bool {
        self.correcting
    }

    /// Drops the live buffer and the correction history.
    pub fn invalidate(&mut self) {
        self.buffer.clear();
        self.history.clear();
    }

    pub fn reset(&mut self) {
        self.invalidate();
        self.focus = None;
    }

    fn track_focus(&mut self) {
        let current = self.platform.foreground_window();
        if current == self.focus {
            return;
        }

        if !self.buffer.is_empty() || !self.history.is_empty() {
            tracing::debug!(msg = "focus_changed_buffer_dropped", dropped = self.buffer.len());
        }
        self.invalidate();
        self.focus = current;
    }

    fn record(&mut self, event: &KeyEvent) {
        match event.key.class() {
            KeyClass::Navigation => self.buffer.clear(),
            KeyClass::Backspace => {
                let _ = self.buffer.pop();
            }
            // Ctrl/Alt chords are shortcuts; whatever they did to the text is unknown.
            KeyClass::Character if event.modifiers.is_shortcut() => self.buffer.clear(),
            KeyClass::Character => {
                if self.buffer.ends_with_space() && event.key != VirtualKey::SPACE {
                    self.buffer.clear();
                }
                self.history.clear();
                self.buffer.push(KeystrokeRecord {
                    key: event.key,
                    shift: event.modifiers.shift,
                    caps_lock: event.modifiers.caps_lock,
                });
            }
            KeyClass::Other => {}
        }
    }

    /// Runs the delete / switch / replay protocol.
    ///
    /// Freshly typed text is preferred. With nothing typed since the last
    /// correction, the previously corrected text is corrected again and the
    /// counter advances.
    pub fn correct(&mut self) -> CorrectionOutcome {
        if self.correcting {
            return CorrectionOutcome::Skipped(SkipReason::Reentry);
        }

        // Both sources are emptied before anything is injected, so an
        // unwinding protocol leaves no records for erased text behind.
        let (records, count) = if !self.buffer.is_empty() {
            self.history.clear();
            (self.buffer.take(), 1)
        } else if !self.history.is_empty() {
            let (records, count) = self.history.take();
            (records, count.saturating_add(1))
        } else {
            return CorrectionOutcome::Skipped(SkipReason::NothingToCorrect);
        };

        let _guard = ReentryGuard::enter(&mut self.correcting);
        match run_protocol(&mut self.platform, &records, self.settings.settle) {
            Ok(()) => {
                let replayed = records.len();
                self.history.store(records, count);
                CorrectionOutcome::Applied { count, replayed }
            }
            Err(failure) => CorrectionOutcome::Failed(failure),
        }
    }
}

fn run_protocol<P: InputPlatform>(
    platform: &mut P,
    records: &[KeystrokeRecord],
    settle: Duration,
) -> Result<(), Failure> {
    platform
        .send_keys(&replay::erase_sequence(records.len()))
        .map_err(|e| {
            tracing::warn!(msg = "erase_failed", error = %e);
            Failure::InputError
        })?;

    // A failed layout request still replays, which restores the erased text.
    let mut layout = Ok(());
    match platform.foreground_window() {
        Some(window) => {
            if let Err(e) = platform.request_layout_change(window) {
                tracing::warn!(msg = "layout_request_failed", error = %e);
                layout = Err(Failure::LayoutError);
            }
        }
        None => tracing::debug!(msg = "layout_request_skipped_no_foreground"),
    }

    platform.settle(settle);

    for record in records {
        platform
            .send_keys(&replay::replay_sequence(record))
            .map_err(|e| {
                tracing::warn!(msg = "replay_failed", error = %e);
                Failure::InputError
            })?;
    }

    layout
}

fn log_outcome(outcome: &CorrectionOutcome) {
    match outcome {
        CorrectionOutcome::Applied { count, replayed } => {
            tracing::info!(msg = "correction_applied", count = *count, replayed = *replayed);
        }
        CorrectionOutcome::Skipped(reason) => {
            tracing::debug!(msg = "correction_skipped", reason = reason.as_str());
        }
        CorrectionOutcome::Failed(failure) => {
            tracing::warn!(msg = "correction_failed", failure = failure.as_str());
        }
    }
}

impl<P: InputPlatform> KeyObserver for CorrectionEngine<P> {
    fn on_key(&mut self, event: &KeyEvent) -> HookDecision {
        if self.correcting || event.injected || !event.is_down() {
            return HookDecision::Pass;
        }

        self.track_focus();

        if event.key == self.settings.trigger {
            log_outcome(&self.correct());
            return HookDecision::Swallow;
        }

        self.record(event);
        HookDecision::Pass
    }

    fn on_mouse(&mut self, event: &MouseEvent) {
        if self.correcting {
            return;
        }

        if let MouseEvent::ButtonDown {
            button,
            injected: false,
        } = *event
        {
            tracing::trace!(msg = "click_buffer_dropped", button = ?button);
            self.invalidate();
        }
    }

    fn observes_mouse(&self) -> bool {
        true
    }
}

/// The text-correction feature as seen by the shell.
#[derive(Debug)]
pub struct InputInterceptor<P> {
    handle: ObserverHandle<CorrectionEngine<P>>,
}

impl<P: InputPlatform + 'static> InputInterceptor<P> {
    pub fn new(platform: P, settings: CorrectionSettings, host: Rc<dyn HookHost>) -> Self {
        Self {
            handle: ObserverHandle::new(CorrectionEngine::new(platform, settings), host),
        }
    }

    pub fn start(&mut self) -> Result<(), HookError> {
        if self.handle.is_active() {
            return Ok(());
        }

        self.handle.start()?;
        tracing::info!(msg = "text_correction_started");
        Ok(())
    }

    /// Unsubscribes and forgets everything typed so far.
    pub fn stop(&mut self) {
        if !self.handle.stop() {
            return;
        }

        if let Some(mut engine) = self.handle.try_observer_mut() {
            engine.reset();
        }
        tracing::info!(msg = "text_correction_stopped");
    }

    pub fn is_active(&self) -> bool {
        self.handle.is_active()
    }

    pub fn engine(&self) -> Ref<'_, CorrectionEngine<P>> {
        self.handle.observer()
    }
}
