//! Object Pool for Allocation Reuse
//!
//! A generic cache of reusable objects. Entity pools use it to recycle their
//! per-entity records (drops are spawned and removed hundreds of times a
//! minute), and collaborators can use it for scratch buffers.
//!
//! # Design Principles
//!
//! - **Bounded**: Returned objects beyond `max_size` are simply dropped
//! - **Lock Free**: `get` and `release` take `&self` and may race freely
//! - **Reset on Return**: An optional reset action scrubs state before storage
//! - **Advisory Stats**: Counters exist for tuning, never for decisions
//!
//! # Example
//!
//! ```ignore
//! let pool = ObjectPool::with_factory(|| Vec::<u32>::with_capacity(64), 8, 32)
//!     .with_reset(Vec::clear);
//!
//! let mut scratch = pool.get();
//! scratch.push(1);
//! pool.release(scratch);
//!
//! // Or let a guard hand it back
//! {
//!     let mut scratch = pool.get_pooled();
//!     scratch.push(2);
//! }
//! ```

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam_queue::SegQueue;

type Factory<T> = Box<dyn Fn() -> T + Send + Sync>;
type ResetAction<T> = Box<dyn Fn(&mut T) + Send + Sync>;

// ============================================================================
// Statistics
// ============================================================================

/// Snapshot of pool usage counters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoolStatistics {
    /// Objects built by the factory (including pre-allocation)
    pub created: usize,
    /// `get` calls served from the store
    pub reused: usize,
    /// Objects currently stored
    pub in_pool: usize,
    /// `reused / (created + reused)`, 0 when nothing happened yet
    pub reuse_rate: f32,
}

impl fmt::Display for PoolStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "InPool={}, Created={}, Reused={}, ReuseRate={:.1}%",
            self.in_pool,
            self.created,
            self.reused,
            self.reuse_rate * 100.0
        )
    }
}

// ============================================================================
// Object Pool
// ============================================================================

/// Thread-safe cache of reusable `T` values.
///
/// # Performance Characteristics
///
/// | Operation   | Time Complexity |
/// |-------------|-----------------|
/// | `get`       | O(1)            |
/// | `release`   | O(1) + reset    |
/// | `len`       | O(1)            |
/// | `clear`     | O(n)            |
///
/// The capacity check in `release` is not atomic with the push, so under
/// contention the store may briefly exceed `max_size` by the number of racing
/// threads.
pub struct ObjectPool<T> {
    store: SegQueue<T>,
    factory: Factory<T>,
    reset: Option<ResetAction<T>>,
    /// Maximum stored objects, 0 for unlimited
    max_size: usize,
    created: AtomicUsize,
    reused: AtomicUsize,
}

impl<T: Default + 'static> ObjectPool<T> {
    /// Create a pool that builds objects with `T::default()`.
    #[must_use]
    pub fn new(max_size: usize) -> Self {
        Self::with_factory(T::default, 0, max_size)
    }
}

impl<T> ObjectPool<T> {
    /// Default maximum number of stored objects.
    pub const DEFAULT_MAX_SIZE: usize = 100;

    /// Create a pool with a custom factory, pre-allocating `initial_size` objects.
    #[must_use]
    pub fn with_factory(
        factory: impl Fn() -> T + Send + Sync + 'static,
        initial_size: usize,
        max_size: usize,
    ) -> Self {
        let store = SegQueue::new();
        for _ in 0..initial_size {
            store.push(factory());
        }

        Self {
            store,
            factory: Box::new(factory),
            reset: None,
            max_size,
            created: AtomicUsize::new(initial_size),
            reused: AtomicUsize::new(0),
        }
    }

    /// Install the action applied to every object on `release`.
    #[must_use]
    pub fn with_reset(mut self, reset: impl Fn(&mut T) + Send + Sync + 'static) -> Self {
        self.reset = Some(Box::new(reset));
        self
    }

    /// Take a stored object, or build a new one if the store is empty.
    pub fn get(&self) -> T {
        if let Some(item) = self.store.pop() {
            self.reused.fetch_add(1, Ordering::Relaxed);
            return item;
        }

        self.created.fetch_add(1, Ordering::Relaxed);
        (self.factory)()
    }

    /// Get an object wrapped in a guard that releases it when dropped.
    pub fn get_pooled(&self) -> Pooled<'_, T> {
        Pooled {
            pool: self,
            item: Some(self.get()),
        }
    }

    /// Return an object to the pool.
    ///
    /// When the pool already holds `max_size` objects the item is dropped
    /// without running the reset action.
    pub fn release(&self, mut item: T) {
        if self.max_size > 0 && self.store.len() >= self.max_size {
            return;
        }

        if let Some(reset) = &self.reset {
            reset(&mut item);
        }
        self.store.push(item);
    }

    /// Number of objects currently stored.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Check if the store is empty.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Maximum stored objects, 0 for unlimited.
    #[must_use]
    pub const fn max_size(&self) -> usize {
        self.max_size
    }

    /// Drop every stored object. Counters are kept.
    pub fn clear(&self) {
        while self.store.pop().is_some() {}
    }

    /// Current usage counters.
    #[must_use]
    pub fn statistics(&self) -> PoolStatistics {
        let created = self.created.load(Ordering::Relaxed);
        let reused = self.reused.load(Ordering::Relaxed);
        let total = created + reused;
        let reuse_rate = if total > 0 {
            reused as f32 / total as f32
        } else {
            0.0
        };

        PoolStatistics {
            created,
            reused,
            in_pool: self.store.len(),
            reuse_rate,
        }
    }

    /// One-line statistics summary for debug overlays and logs.
    #[must_use]
    pub fn format_statistics(&self) -> String {
        let name = std::any::type_name::<T>();
        let short = name.rsplit("::").next().unwrap_or(name);
        format!("ObjectPool<{short}>: {}", self.statistics())
    }
}

impl<T> fmt::Debug for ObjectPool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectPool")
            .field("in_pool", &self.store.len())
            .field("max_size", &self.max_size)
            .field("has_reset", &self.reset.is_some())
            .field("created", &self.created.load(Ordering::Relaxed))
            .field("reused", &self.reused.load(Ordering::Relaxed))
            .finish()
    }
}

impl<T: Default + 'static> Default for ObjectPool<T> {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_SIZE)
    }
}

// ============================================================================
// Pooled Guard
// ============================================================================

/// A pooled object that goes back to its pool when dropped.
pub struct Pooled<'a, T> {
    pool: &'a ObjectPool<T>,
    item: Option<T>,
}

impl<T> Pooled<'_, T> {
    /// Keep the object instead of returning it to the pool.
    #[must_use]
    pub fn into_inner(mut self) -> T {
        // `item` is only taken here or in `drop`, so it is always present
        match self.item.take() {
            Some(value) => value,
            None => unreachable!("pooled value taken twice"),
        }
    }
}

impl<T> Deref for Pooled<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        match &self.item {
            Some(value) => value,
            None => unreachable!("pooled value accessed after release"),
        }
    }
}

impl<T> DerefMut for Pooled<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        match &mut self.item {
            Some(value) => value,
            None => unreachable!("pooled value accessed after release"),
        }
    }
}

impl<T> Drop for Pooled<'_, T> {
    fn drop(&mut self) {
        if let Some(value) = self.item.take() {
            self.pool.release(value);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
