//! Self-rescheduling repaint loop.

use crate::scheduler::{FrameHandle, FrameScheduler};
use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::{Rc, Weak},
};
use tracing::trace;

type DrawFn = dyn FnMut();

struct DriverInner<S: FrameScheduler> {
    scheduler: S,
    draw: RefCell<Rc<RefCell<DrawFn>>>,
    armed: Cell<Option<FrameHandle>>,
    active: Cell<bool>,
    invocations: Cell<u64>,
}

impl<S: FrameScheduler + 'static> DriverInner<S> {
    fn arm(self: &Rc<Self>) {
        let weak: Weak<Self> = Rc::downgrade(self);
        let handle = self.scheduler.request_frame(Box::new(move |_time| {
            if let Some(inner) = weak.upgrade() {
                inner.tick();
            }
        }));
        self.armed.set(Some(handle));
    }

    fn disarm(&self) {
        if let Some(handle) = self.armed.take() {
            self.scheduler.cancel_frame(handle);
            trace!(handle = handle.get(), "cancelled armed frame");
        }
    }

    fn tick(self: &Rc<Self>) {
        // The handle that brought us here has fired.
        self.armed.set(None);
        if !self.active.get() {
            return;
        }

        let draw = Rc::clone(&*self.draw.borrow());
        if let Ok(mut draw) = draw.try_borrow_mut() {
            (&mut *draw)();
            self.invocations.set(self.invocations.get() + 1);
        }

        if self.active.get() && self.armed.get().is_none() {
            self.arm();
        }
    }
}

/// Repaint loop that runs a draw callback once per display refresh while active.
///
/// The driver keeps at most one armed frame in a single-owner slot. Each tick
/// runs the current draw callback and then re-arms the slot. Deactivating,
/// swapping the draw callback and dropping the driver all cancel the armed
/// frame, so no draw call fires after any of them.
pub struct FrameDriver<S: FrameScheduler + 'static> {
    inner: Rc<DriverInner<S>>,
}

impl<S: FrameScheduler + 'static> FrameDriver<S> {
    /// Creates an inactive driver.
    pub fn new<F>(scheduler: S, draw: F) -> Self
    where
        F: FnMut() + 'static,
    {
        let draw: Rc<RefCell<DrawFn>> = Rc::new(RefCell::new(draw));
        Self {
            inner: Rc::new(DriverInner {
                scheduler,
                draw: RefCell::new(draw),
                armed: Cell::new(None),
                active: Cell::new(false),
                invocations: Cell::new(0),
            }),
        }
    }

    /// Starts or stops the loop.
    ///
    /// Starting arms the next frame; stopping cancels an armed frame before it
    /// fires.
    pub fn set_active(&self, active: bool) {
        let was_active = self.inner.active.replace(active);
        match (was_active, active) {
            (false, true) => {
                if self.inner.armed.get().is_none() {
                    self.inner.arm();
                }
            }
            (true, false) => self.inner.disarm(),
            _ => {}
        }
    }

    /// Whether the loop is running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.inner.active.get()
    }

    /// Whether a frame is currently scheduled.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.inner.armed.get().is_some()
    }

    /// Number of times a draw callback has run.
    #[must_use]
    pub fn invocations(&self) -> u64 {
        self.inner.invocations.get()
    }

    /// Replaces the draw callback.
    ///
    /// Later frames always run the newest callback. A running loop is
    /// restarted: its armed frame is cancelled and a fresh one requested.
    pub fn set_draw<F>(&self, draw: F)
    where
        F: FnMut() + 'static,
    {
        let draw: Rc<RefCell<DrawFn>> = Rc::new(RefCell::new(draw));
        *self.inner.draw.borrow_mut() = draw;
        if self.inner.active.get() {
            self.inner.disarm();
            self.inner.arm();
        }
    }
}

impl<S: FrameScheduler + 'static> Drop for FrameDriver<S> {
    fn drop(&mut self) {
        self.inner.active.set(false);
        self.inner.disarm();
    }
}

impl<S: FrameScheduler + 'static> fmt::Debug for FrameDriver<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameDriver")
            .field("active", &self.is_active())
            .field("armed", &self.is_armed())
            .field("invocations", &self.invocations())
            .finish()
    }
}
