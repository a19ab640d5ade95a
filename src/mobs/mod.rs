//! Mobs
//!
//! Spawn-point scheduling for the map's monsters plus the spatial queries
//! skills use to pick their targets.

mod config;
mod entity;
mod pool;
mod targeting;

#[cfg(test)]
mod testing;

pub use config::MobPoolConfig;
pub use entity::{MobAi, MobControllerType, MobDeathType, MobEntity, MobId, MobTemplate, PuppetInfo};
pub use pool::{MobEvent, MobPool, MobPoolStats, MobSpawnPoint};
pub use targeting::ChainPath;
