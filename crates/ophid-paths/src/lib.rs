//! **ophid-paths** — A* shortest-path search for the *ophid* playing field.
//!
//! [`PathFinder`] computes minimum-length four-directional routes over an
//! [`ophid_core::Field`], avoiding walls and agent segments, and returns
//! them as ordered [`ophid_core::Direction`] sequences.
//!
//! The frontier tolerates stale duplicate entries (*lazy deletion*): when a
//! cheaper cost is discovered for a position, a new entry is pushed next to
//! the obsolete one, and obsolete entries are discarded at pop time against
//! the visited set. Correctness rests on that pop-time check, not on
//! frontier deduplication.
//!
//! Search progress can be watched through a [`SearchObserver`], optionally
//! paced with [`PacedObserver`]. Observers are a side channel and never
//! touch cell occupancy.

mod astar;
mod distance;
mod frontier;
mod observer;

pub use astar::PathFinder;
pub use distance::manhattan;
pub use observer::{PacedObserver, SearchObserver};
