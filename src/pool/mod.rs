//! Generic object pooling
//!
//! Provides `ObjectPool<T>`, the allocation-reuse primitive the entity pools
//! build on.

mod object_pool;

pub use object_pool::{ObjectPool, PoolStatistics, Pooled};
