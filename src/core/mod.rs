//! Core simulation module
//!
//! Contains the tick clock, the outbound event queue, seedable randomness
//! and configuration

mod config;
pub mod events;
pub mod rng;
mod time;

pub use config::{ConfigError, SimConfig};
pub use events::EventQueue;
pub use rng::SimRng;
pub use time::{FrameClock, Tick};
