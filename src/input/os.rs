//! The OS boundary consumed by the correction engine and the shortcut latch.
//!
//! Every call reports failure as a value. The engine branches on those
//! results; nothing here is expected to unwind.

use std::time::Duration;

use super::event::{SyntheticKey, WindowId};

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("synthetic input rejected: {sent} of {requested} events inserted")]
    PartialInput { sent: usize, requested: usize },

    #[error("layout change request failed: {0}")]
    LayoutRequest(String),
}

pub trait InputPlatform {
    /// The window that currently receives keyboard input, if any.
    fn foreground_window(&self) -> Option<WindowId>;

    /// Injects `keys` in order through the system-wide synthetic input path.
    fn send_keys(&mut self, keys: &[SyntheticKey]) -> Result<(), PlatformError>;

    /// Asks `window` to advance to the next installed input layout.
    fn request_layout_change(&mut self, window: WindowId) -> Result<(), PlatformError>;

    /// Blocks the calling (hook) thread.
    fn settle(&mut self, delay: Duration);
}
