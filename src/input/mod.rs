pub mod buffer;
pub mod event;
pub mod interceptor;
pub mod latch;
pub mod observer;
pub mod os;
pub mod replay;

pub use buffer::{CorrectionHistory, KeystrokeBuffer, KeystrokeRecord};
pub use event::{
    HookDecision, KeyEvent, KeyTransition, ModifierState, MouseButton, MouseEvent, SyntheticKey,
    WindowId,
};
pub use interceptor::{CorrectionEngine, CorrectionSettings, InputInterceptor};
pub use latch::{LayoutShortcut, ShortcutLatch};
pub use observer::{
    HookError, HookHost, KeyObserver, ObserverHandle, ObserverRegistry, SharedObserver,
    Subscription, SubscriptionId,
};
pub use os::{InputPlatform, PlatformError};
