//! Item and meso drops
//!
//! Drops fall from dead mobs, bounce to rest on the ground, and wait to be
//! picked up by a player, a pet, or a thieving mob before they fade out.
//!
//! # Lifecycle
//!
//! ```text
//! Spawning -> Falling <-> Bouncing -> Idle -> PickingUp -> Removed
//!                                       \-> Expired  ->/
//! ```

mod config;
mod filter;
mod item;
mod pickup;
mod pool;

pub use config::DropPoolConfig;
pub use filter::{DropExceptionEntry, DropFilter};
pub use item::{DropId, DropItem, DropState, DropType, GlowColor};
pub use pickup::{PetDropTarget, PickupHistory, RecentPickupRecord};
pub use pool::{DropEvent, DropPool, DropPoolStats, LootEntry};
