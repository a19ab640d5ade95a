//! Reactors
//!
//! Interactive map objects (boxes, levers, quest triggers) with a six-state
//! activation machine and timed respawns.

mod config;
mod entity;
mod pool;
mod state;

pub use config::ReactorPoolConfig;
pub use entity::{ReactorEntity, ReactorId, ReactorTemplate};
pub use pool::{ReactorEvent, ReactorPool, ReactorPoolStats, ReactorSpawnPoint};
pub use state::{HitResult, ReactorActivationType, ReactorRuntimeData, ReactorState, ReactorTransition};
