//! Field entity pools for a 2D side-scrolling world simulator
//!
//! This crate provides:
//! - A generic recycling object pool
//! - Drops with physics, ownership windows, pet looting and meso explosion
//! - Mob spawn points with respawn scheduling and skill targeting queries
//! - Portals with hidden-portal reveal timing and player collision
//! - Reactors with a six-state activation machine
//!
//! Pools are driven by a host loop calling `update` once per frame and
//! report what happened through per-pool event queues.

pub mod core;
pub mod drops;
pub mod geometry;
pub mod mobs;
pub mod pool;
pub mod portals;
pub mod reactors;

// Re-exports for convenience
pub use glam;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::core::{EventQueue, FrameClock, SimConfig, SimRng, Tick};
    pub use crate::drops::{DropEvent, DropId, DropPool, DropPoolConfig, DropType, LootEntry};
    pub use crate::geometry::{Rect, Trapezoid};
    pub use crate::mobs::{
        MobAi, MobControllerType, MobDeathType, MobEntity, MobEvent, MobId, MobPool,
        MobPoolConfig, MobSpawnPoint, MobTemplate,
    };
    pub use crate::pool::ObjectPool;
    pub use crate::portals::{PortalEvent, PortalInstance, PortalPool, PortalPoolConfig, PortalType};
    pub use crate::reactors::{
        ReactorActivationType, ReactorEntity, ReactorEvent, ReactorPool, ReactorPoolConfig,
        ReactorSpawnPoint, ReactorState, ReactorTemplate,
    };
    pub use glam::Vec2;
}
