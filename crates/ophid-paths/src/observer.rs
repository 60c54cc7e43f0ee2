//! Side-channel reporting of search progress.

use std::thread;
use std::time::Duration;

use ophid_core::Pos;

/// Receives each position as the search finalizes it.
///
/// Observers exist for external display only. The search reports positions
/// through this hook and never alters cell occupancy to mark progress, so
/// concurrent field queries between calls always see a consistent board.
pub trait SearchObserver {
    /// Called once per freshly expanded (non-stale) position, in pop order.
    fn visited(&mut self, p: Pos);
}

impl<F: FnMut(Pos)> SearchObserver for F {
    fn visited(&mut self, p: Pos) {
        self(p)
    }
}

/// Wraps an observer with a fixed per-step delay.
///
/// After each report the calling thread is suspended for `delay`, pacing the
/// search so it can be watched in real time. Only the calling thread sleeps;
/// tests use unpaced observers.
pub struct PacedObserver<O> {
    inner: O,
    delay: Duration,
}

impl<O: SearchObserver> PacedObserver<O> {
    /// Pace `inner` with `delay` between steps.
    pub fn new(inner: O, delay: Duration) -> Self {
        Self { inner, delay }
    }
}

impl<O: SearchObserver> SearchObserver for PacedObserver<O> {
    fn visited(&mut self, p: Pos) {
        self.inner.visited(p);
        thread::sleep(self.delay);
    }
}
