//! Display-paced callback scheduling.

use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    fmt,
    rc::Rc,
    time::Duration,
};

/// Timing information handed to frame callbacks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameTime {
    /// Zero-based index of the frame being run.
    pub frame: u64,
    /// Host time elapsed since the scheduler started.
    pub elapsed: Duration,
}

/// Handle to a requested frame callback, used to cancel it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

impl FrameHandle {
    /// Creates a handle from a host-assigned identifier.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Host-assigned identifier.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// One-shot callback run on the next display refresh.
pub type FrameCallback = Box<dyn FnOnce(FrameTime)>;

/// Host facility that runs a callback once on its next display refresh.
pub trait FrameScheduler {
    /// Schedules `callback` for the next refresh.
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle;

    /// Cancels a callback that has not fired yet. Unknown handles are ignored.
    fn cancel_frame(&self, handle: FrameHandle);
}

impl<S: FrameScheduler + ?Sized> FrameScheduler for Rc<S> {
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle {
        (**self).request_frame(callback)
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        (**self).cancel_frame(handle);
    }
}

/// In-process scheduler driven by the host's refresh loop.
///
/// The host calls [`run_frame`](Self::run_frame) once per refresh. Callbacks
/// requested while a frame runs are deferred to the next one, and a callback
/// cancelled before its turn never runs, even within the same frame.
#[derive(Default)]
pub struct FrameQueue {
    pending: RefCell<Vec<(FrameHandle, FrameCallback)>>,
    due: RefCell<VecDeque<(FrameHandle, FrameCallback)>>,
    next_id: Cell<u64>,
    frames: Cell<u64>,
}

impl fmt::Debug for FrameQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameQueue")
            .field("pending", &self.pending())
            .field("frames", &self.frames.get())
            .finish()
    }
}

impl FrameQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of callbacks waiting for the next frame.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Number of frames run so far.
    #[must_use]
    pub fn frames_run(&self) -> u64 {
        self.frames.get()
    }

    /// Runs every callback requested before this call and returns how many fired.
    pub fn run_frame(&self, elapsed: Duration) -> usize {
        let time = FrameTime {
            frame: self.frames.get(),
            elapsed,
        };
        self.frames.set(time.frame.wrapping_add(1));

        let batch = std::mem::take(&mut *self.pending.borrow_mut());
        self.due.borrow_mut().extend(batch);

        let mut fired = 0;
        loop {
            let next = self.due.borrow_mut().pop_front();
            let Some((_, callback)) = next else {
                break;
            };
            callback(time);
            fired += 1;
        }
        fired
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle {
        let handle = FrameHandle::new(self.next_id.get());
        self.next_id.set(handle.0.wrapping_add(1));
        self.pending.borrow_mut().push((handle, callback));
        handle
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        self.pending.borrow_mut().retain(|(queued, _)| *queued != handle);
        self.due.borrow_mut().retain(|(queued, _)| *queued != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callbacks_requested_during_a_frame_wait_for_the_next() {
        let queue = Rc::new(FrameQueue::new());
        let fired = Rc::new(Cell::new(0));
        let requeue = Rc::clone(&queue);
        let counter = Rc::clone(&fired);
        let _ = queue.request_frame(Box::new(move |_| {
            counter.set(counter.get() + 1);
            let counter = Rc::clone(&counter);
            let _ = requeue.request_frame(Box::new(move |_| counter.set(counter.get() + 1)));
        }));

        assert_eq!(queue.run_frame(Duration::ZERO), 1);
        assert_eq!(fired.get(), 1);
        assert_eq!(queue.pending(), 1);
        assert_eq!(queue.run_frame(Duration::from_millis(16)), 1);
        assert_eq!(fired.get(), 2);
    }

    #[test]
    fn cancelled_callback_never_fires() {
        let queue = FrameQueue::new();
        let fired = Rc::new(Cell::new(false));
        let flag = Rc::clone(&fired);
        let handle = queue.request_frame(Box::new(move |_| flag.set(true)));

        queue.cancel_frame(handle);

        assert_eq!(queue.run_frame(Duration::ZERO), 0);
        assert!(!fired.get());
    }

    #[test]
    fn cancel_within_the_same_frame_is_honoured() {
        let queue = Rc::new(FrameQueue::new());
        let fired = Rc::new(Cell::new(false));
        let victim_handle = Rc::new(Cell::new(None));

        let canceller = Rc::clone(&queue);
        let victim = Rc::clone(&victim_handle);
        let _ = queue.request_frame(Box::new(move |_| {
            if let Some(handle) = victim.get() {
                canceller.cancel_frame(handle);
            }
        }));
        let flag = Rc::clone(&fired);
        victim_handle.set(Some(queue.request_frame(Box::new(move |_| flag.set(true)))));

        assert_eq!(queue.run_frame(Duration::ZERO), 1);
        assert!(!fired.get());
    }

    #[test]
    fn frame_time_counts_frames() {
        let queue = Rc::new(FrameQueue::new());
        let seen = Rc::new(Cell::new(FrameTime::default()));
        for elapsed in [Duration::ZERO, Duration::from_millis(16)] {
            let sink = Rc::clone(&seen);
            let _ = queue.request_frame(Box::new(move |time| sink.set(time)));
            let _ = queue.run_frame(elapsed);
        }

        assert_eq!(
            seen.get(),
            FrameTime {
                frame: 1,
                elapsed: Duration::from_millis(16)
            }
        );
        assert_eq!(queue.frames_run(), 2);
    }
}
