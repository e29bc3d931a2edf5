//! Listener registration on an input surface.

use crate::events::{KeyEvent, TouchEvent};
use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::Rc,
};

/// Receives raw events from an [`InputSurface`].
pub trait InputListener {
    /// Called for every key press on the surface.
    fn on_key(&self, event: &mut KeyEvent);

    /// Called for every touch event on the surface.
    fn on_touch(&self, event: &mut TouchEvent);
}

/// Handle identifying a registered listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Element that delivers raw key and touch events to registered listeners.
pub trait InputSurface {
    /// Registers a listener and returns the handle needed to remove it.
    fn add_listener(&self, listener: Rc<dyn InputListener>) -> ListenerId;

    /// Removes a listener. Returns `false` if it was not registered.
    fn remove_listener(&self, id: ListenerId) -> bool;
}

/// In-process input surface that fans events out to its listeners.
///
/// Hosts translate their native events and feed them to
/// [`dispatch_key`](Self::dispatch_key) and
/// [`dispatch_touch`](Self::dispatch_touch).
#[derive(Default)]
pub struct EventHub {
    listeners: RefCell<Vec<(ListenerId, Rc<dyn InputListener>)>>,
    next_id: Cell<u64>,
}

impl fmt::Debug for EventHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHub")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl EventHub {
    /// Creates a hub with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Delivers a key press to every listener.
    pub fn dispatch_key(&self, event: &mut KeyEvent) {
        for (id, listener) in self.snapshot() {
            if self.is_registered(id) {
                listener.on_key(event);
            }
        }
    }

    /// Delivers a touch event to every listener.
    pub fn dispatch_touch(&self, event: &mut TouchEvent) {
        for (id, listener) in self.snapshot() {
            if self.is_registered(id) {
                listener.on_touch(event);
            }
        }
    }

    // Listeners may add or remove listeners while being dispatched to.
    fn snapshot(&self) -> Vec<(ListenerId, Rc<dyn InputListener>)> {
        self.listeners.borrow().clone()
    }

    fn is_registered(&self, id: ListenerId) -> bool {
        self.listeners
            .borrow()
            .iter()
            .any(|(registered, _)| *registered == id)
    }
}

impl InputSurface for EventHub {
    fn add_listener(&self, listener: Rc<dyn InputListener>) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(self.next_id.get().wrapping_add(1));
        self.listeners.borrow_mut().push((id, listener));
        id
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(registered, _)| *registered != id);
        listeners.len() != before
    }
}
