//! A subscribe / per-event callback / unsubscribe abstraction over the
//! global keyboard and mouse streams.
//!
//! Both the correction engine and the shortcut latch are [`KeyObserver`]s.
//! A [`HookHost`] owns the actual OS hook and feeds every event into an
//! [`ObserverRegistry`]; the registry is the only place where delivery
//! order, consumption and fault isolation are decided.

use std::{
    cell::{Cell, Ref, RefCell, RefMut},
    fmt,
    panic::{self, AssertUnwindSafe},
    rc::Rc,
};

use super::event::{HookDecision, KeyEvent, MouseEvent};

pub trait KeyObserver {
    /// Called for every keyboard transition. Returning `Swallow` hides the
    /// event from the focused application and from later observers.
    fn on_key(&mut self, event: &KeyEvent) -> HookDecision;

    fn on_mouse(&mut self, _event: &MouseEvent) {}

    /// Whether the host must also deliver the mouse stream.
    fn observes_mouse(&self) -> bool {
        false
    }
}

pub type SharedObserver = Rc<RefCell<dyn KeyObserver>>;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct SubscriptionId(u64);

struct Entry {
    id: SubscriptionId,
    observer: SharedObserver,
    mouse: bool,
}

/// Subscribers of one host, dispatched in subscription order.
#[derive(Default)]
pub struct ObserverRegistry {
    entries: RefCell<Vec<Entry>>,
    next_id: Cell<u64>,
}

impl fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<SubscriptionId> = self.entries.borrow().iter().map(|e| e.id).collect();
        f.debug_struct("ObserverRegistry")
            .field("subscriptions", &ids)
            .finish()
    }
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, observer: SharedObserver) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        let mouse = observer.try_borrow().is_ok_and(|o| o.observes_mouse());
        self.entries.borrow_mut().push(Entry {
            id,
            observer,
            mouse,
        });

        tracing::debug!(msg = "observer_registered", id = id.0, mouse);
        id
    }

    pub fn unregister(&self, id: SubscriptionId) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|e| e.id != id);
        let removed = entries.len() != before;

        tracing::debug!(msg = "observer_unregistered", id = id.0, removed);
        removed
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn wants_mouse(&self) -> bool {
        self.entries.borrow().iter().any(|e| e.mouse)
    }

    fn snapshot(&self, mouse_only: bool) -> Vec<SharedObserver> {
        self.entries
            .borrow()
            .iter()
            .filter(|e| !mouse_only || e.mouse)
            .map(|e| Rc::clone(&e.observer))
            .collect()
    }

    /// Delivers a keyboard event. The first `Swallow` stops delivery.
    ///
    /// An observer that is still running (the event re-entered the stream
    /// from inside its own callback) is skipped, and a panicking observer
    /// counts as `Pass`. Neither can stop the event from reaching the
    /// focused application.
    pub fn dispatch_key(&self, event: &KeyEvent) -> HookDecision {
        for observer in self.snapshot(false) {
            let Ok(mut observer) = observer.try_borrow_mut() else {
                tracing::trace!(msg = "observer_busy", key = event.key.code());
                continue;
            };

            match panic::catch_unwind(AssertUnwindSafe(|| observer.on_key(event))) {
                Ok(HookDecision::Swallow) => return HookDecision::Swallow,
                Ok(HookDecision::Pass) => {}
                Err(_) => {
                    tracing::error!(msg = "key_observer_panicked", key = event.key.code());
                }
            }
        }

        HookDecision::Pass
    }

    /// Delivers a mouse event to mouse observers. Mouse events are never consumed.
    pub fn dispatch_mouse(&self, event: &MouseEvent) {
        for observer in self.snapshot(true) {
            let Ok(mut observer) = observer.try_borrow_mut() else {
                continue;
            };

            if panic::catch_unwind(AssertUnwindSafe(|| observer.on_mouse(event))).is_err() {
                tracing::error!(msg = "mouse_observer_panicked");
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("failed to install {stream} hook: {reason}")]
    Install {
        stream: &'static str,
        reason: String,
    },
}

/// Source of the global event streams.
pub trait HookHost {
    fn subscribe(&self, observer: SharedObserver) -> Result<Subscription, HookError>;
}

/// Live registration with a [`HookHost`]. Dropping it unsubscribes.
pub struct Subscription {
    id: SubscriptionId,
    release: Option<Box<dyn FnOnce(SubscriptionId)>>,
}

impl Subscription {
    pub fn new(id: SubscriptionId, release: impl FnOnce(SubscriptionId) + 'static) -> Self {
        Self {
            id,
            release: Some(Box::new(release)),
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release(self.id);
        }
    }
}

/// Start/stop lifecycle shared by every global observer component.
///
/// `start` on an active handle and `stop` on an inactive one are no-ops.
pub struct ObserverHandle<O> {
    observer: Rc<RefCell<O>>,
    host: Rc<dyn HookHost>,
    subscription: Option<Subscription>,
}

impl<O: fmt::Debug> fmt::Debug for ObserverHandle<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverHandle")
            .field("observer", &self.observer)
            .field("subscription", &self.subscription)
            .finish_non_exhaustive()
    }
}

impl<O: KeyObserver + 'static> ObserverHandle<O> {
    pub fn new(observer: O, host: Rc<dyn HookHost>) -> Self {
        Self {
            observer: Rc::new(RefCell::new(observer)),
            host,
            subscription: None,
        }
    }

    pub fn start(&mut self) -> Result<(), HookError> {
        if self.subscription.is_some() {
            return Ok(());
        }

        let shared: SharedObserver = self.observer.clone();
        self.subscription = Some(self.host.subscribe(shared)?);
        Ok(())
    }

    /// Returns whether a subscription was actually dropped.
    pub fn stop(&mut self) -> bool {
        self.subscription.take().is_some()
    }

    pub fn is_active(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn observer(&self) -> Ref<'_, O> {
        self.observer.borrow()
    }

    /// `None` while the observer is handling an event.
    pub fn try_observer_mut(&self) -> Option<RefMut<'_, O>> {
        self.observer.try_borrow_mut().ok()
    }
}
