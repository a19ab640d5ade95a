//! Outbound Event Queue
//!
//! Every pool owns one `EventQueue<E>` for its own event enum. Pool methods
//! push events as things happen (a drop spawns, a mob dies, a portal fades
//! out), and the host drains them once per frame to drive rendering, sound
//! or cross-pool effects such as spawning drops for a dead mob.
//!
//! # Design Principles
//!
//! - **Type Safety**: Each pool has its own strongly typed event enum
//! - **Ordering**: Events come out in exactly the order they were pushed
//! - **Decoupling**: Pools never call into presentation code directly
//!
//! # Example
//!
//! ```ignore
//! drops.update(now, dt);
//! for event in drops.drain_events() {
//!     if let DropEvent::PickedUp { id, picker_id } = event {
//!         play_pickup_sound(id, picker_id);
//!     }
//! }
//! ```

use std::collections::VecDeque;

// ============================================================================
// Event Queue
// ============================================================================

/// FIFO queue of events produced by a pool.
///
/// # Performance
///
/// - Push: O(1) amortized
/// - Iteration: O(n)
/// - Drain: O(n), keeps the allocation
#[derive(Debug, Clone)]
pub struct EventQueue<E> {
    events: VecDeque<E>,
}

impl<E> EventQueue<E> {
    /// Default initial capacity for event queues.
    const DEFAULT_CAPACITY: usize = 64;

    /// Create a new event queue with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a new event queue with specified initial capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity),
        }
    }

    /// Push an event. It becomes visible to `iter` and `drain` immediately.
    #[inline]
    pub fn push(&mut self, event: E) {
        self.events.push_back(event);
    }

    /// Iterate over queued events without consuming them.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.events.iter()
    }

    /// Take ownership of every queued event, oldest first.
    #[inline]
    pub fn drain(&mut self) -> impl Iterator<Item = E> + '_ {
        self.events.drain(..)
    }

    /// Check if there are no queued events.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of queued events.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Discard all queued events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
