//! Frame scheduling and time sources.
//!
//! A canvas never sleeps or spawns threads. It asks its [`FrameScheduler`]
//! for a frame, and the host loop later asks the scheduler whether that frame
//! is due. Time comes from a [`Clock`], so tests drive both by hand.

use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::rc::Rc;
use std::time::Instant;

/// Token of one requested frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(u64);

/// Decides when requested frames run.
pub trait FrameScheduler {
    /// Requests one frame at or after `now` (milliseconds).
    fn request_frame(&mut self, now: f64) -> FrameHandle;

    /// Cancels a request. Unknown or already-run handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);

    /// Whether the frame behind `handle` may run at `now`.
    fn is_due(&self, handle: FrameHandle, now: f64) -> bool;

    /// Called after the frame behind `handle` ran.
    fn frame_ran(&mut self, handle: FrameHandle, now: f64);
}

/// Monotonic millisecond time source.
pub trait Clock {
    fn now(&self) -> f64;
}

/// Wall-clock time since construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Hand-driven clock. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock(Rc<Cell<f64>>);

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: f64) {
        self.0.set(self.0.get() + ms);
    }

    pub fn set(&self, ms: f64) {
        self.0.set(ms);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.0.get()
    }
}

#[derive(Debug, Default)]
struct ManualState {
    next: u64,
    pending: BTreeSet<FrameHandle>,
    requested: usize,
    cancelled: usize,
    ran: usize,
}

/// Scheduler whose frames are due as soon as they are requested.
///
/// Clones share state, so a test can keep one to inspect request counts
/// while the canvas owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler(Rc<RefCell<ManualState>>);

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames requested so far.
    pub fn requested(&self) -> usize {
        self.0.borrow().requested
    }

    pub fn cancelled(&self) -> usize {
        self.0.borrow().cancelled
    }

    pub fn ran(&self) -> usize {
        self.0.borrow().ran
    }

    /// Requests neither run nor cancelled yet.
    pub fn pending(&self) -> usize {
        self.0.borrow().pending.len()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self, _now: f64) -> FrameHandle {
        let mut state = self.0.borrow_mut();
        let handle = FrameHandle(state.next);
        state.next += 1;
        state.requested += 1;
        state.pending.insert(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let mut state = self.0.borrow_mut();
        if state.pending.remove(&handle) {
            state.cancelled += 1;
        }
    }

    fn is_due(&self, handle: FrameHandle, _now: f64) -> bool {
        self.0.borrow().pending.contains(&handle)
    }

    fn frame_ran(&mut self, handle: FrameHandle, _now: f64) {
        let mut state = self.0.borrow_mut();
        if state.pending.remove(&handle) {
            state.ran += 1;
        }
    }
}

/// Scheduler that spaces frames at least `interval_ms` apart.
#[derive(Debug, Clone)]
pub struct IntervalScheduler {
    interval_ms: f64,
    next: u64,
    /// Pending handle and the earliest time it may run.
    pending: Option<(FrameHandle, f64)>,
    last_frame: Option<f64>,
}

impl IntervalScheduler {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms: interval_ms.max(0.0),
            next: 0,
            pending: None,
            last_frame: None,
        }
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// When the pending frame may run, if one is pending.
    pub fn due_at(&self) -> Option<f64> {
        self.pending.map(|(_, at)| at)
    }
}

impl FrameScheduler for IntervalScheduler {
    fn request_frame(&mut self, now: f64) -> FrameHandle {
        let handle = FrameHandle(self.next);
        self.next += 1;
        let due = match self.last_frame {
            Some(last) => now.max(last + self.interval_ms),
            None => now,
        };
        self.pending = Some((handle, due));
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending.is_some_and(|(pending, _)| pending == handle) {
            self.pending = None;
        }
    }

    fn is_due(&self, handle: FrameHandle, now: f64) -> bool {
        self.pending
            .is_some_and(|(pending, due)| pending == handle && now >= due)
    }

    fn frame_ran(&mut self, handle: FrameHandle, now: f64) {
        if self.pending.is_some_and(|(pending, _)| pending == handle) {
            self.pending = None;
        }
        self.last_frame = Some(now);
    }
}
