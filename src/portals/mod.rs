//! Portals
//!
//! Map portals, hidden-portal reveal timing and player collision tests.

mod config;
mod pool;
mod portal;

pub use config::PortalPoolConfig;
pub use pool::{PortalEvent, PortalPool, PortalPoolStats};
pub use portal::{HiddenPortalState, PortalInstance, PortalProperties, PortalType};
