//! Mounted gesture engine bound to an input surface.

use crate::{
    events::{KeyEvent, TouchEvent},
    recognizer::GestureRecognizer,
    surface::{InputListener, InputSurface, ListenerId},
};
use snake_arena_core::Direction;
use std::{cell::RefCell, fmt, rc::Rc};

struct GestureListener<F> {
    recognizer: RefCell<GestureRecognizer>,
    on_direction: RefCell<F>,
}

impl<F: FnMut(Direction)> GestureListener<F> {
    fn emit(&self, direction: Option<Direction>) {
        let Some(direction) = direction else {
            return;
        };
        if let Ok(mut on_direction) = self.on_direction.try_borrow_mut() {
            (&mut *on_direction)(direction);
        }
    }
}

impl<F: FnMut(Direction)> InputListener for GestureListener<F> {
    fn on_key(&self, event: &mut KeyEvent) {
        let direction = self.recognizer.borrow_mut().on_key(event);
        self.emit(direction);
    }

    fn on_touch(&self, event: &mut TouchEvent) {
        let direction = self.recognizer.borrow_mut().on_touch(event);
        self.emit(direction);
    }
}

/// Gesture recognition mounted on an input surface.
///
/// Mounting registers exactly one listener; dropping the engine (or calling
/// [`unmount`](Self::unmount)) removes it, so a replaced view never leaves a
/// second listener emitting duplicate directions.
pub struct GestureEngine<S: InputSurface + ?Sized> {
    surface: Rc<S>,
    listener: Option<ListenerId>,
}

impl<S: InputSurface + ?Sized> GestureEngine<S> {
    /// Registers gesture recognition on `surface`.
    ///
    /// `on_direction` is invoked synchronously, exactly once per recognised key
    /// press or swipe.
    pub fn mount<F>(surface: Rc<S>, on_direction: F) -> Self
    where
        F: FnMut(Direction) + 'static,
    {
        let listener = Rc::new(GestureListener {
            recognizer: RefCell::new(GestureRecognizer::new()),
            on_direction: RefCell::new(on_direction),
        });
        let id = surface.add_listener(listener);
        Self {
            surface,
            listener: Some(id),
        }
    }

    /// Removes the listener from the surface.
    pub fn unmount(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(id) = self.listener.take() {
            let _ = self.surface.remove_listener(id);
        }
    }
}

impl<S: InputSurface + ?Sized> Drop for GestureEngine<S> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<S: InputSurface + ?Sized> fmt::Debug for GestureEngine<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GestureEngine")
            .field("listener", &self.listener)
            .finish()
    }
}
