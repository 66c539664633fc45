//! Async single-consumer mailbox feeding one display slot at a time.

/// Ordered buffer plus a single-slot consumer handoff.
pub mod queue;

pub use queue::Queue;
