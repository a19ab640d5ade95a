//! Drop pool balance values

use serde::{Deserialize, Serialize};

/// Tunables for a [`DropPool`](super::DropPool). Defaults match the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropPoolConfig {
    /// Time a drop stays on the ground (ms)
    pub lifetime_ms: u64,
    /// Owner-only pickup window after spawn (ms)
    pub owner_priority_ms: u64,
    /// Horizontal gap between drops from one source
    pub drop_spread: f32,
    /// Initial upward velocity (negative is up)
    pub initial_velocity_y: f32,
    /// Height above the source at which drops appear
    pub spawn_height: f32,
    /// Live drop cap, the oldest is evicted beyond this
    pub max_drops: usize,
    /// Default player pickup radius
    pub pickup_range: f32,
    pub pet_pickup_range: f32,
    /// Maximum weighted distance a pet will travel for loot
    pub pet_loot_range: f32,
    pub pet_chase_speed: f32,
    pub pet_pickup_cooldown_ms: u64,
    pub mob_pickup_range: f32,
    pub meso_explosion_range: f32,
    pub max_meso_explosion_drops: usize,
    pub max_recent_pickups: usize,
    pub recent_pickup_lifetime_ms: u64,
    /// RNG seed for spawn jitter, `None` draws one from the OS
    pub seed: Option<u64>,
}

impl Default for DropPoolConfig {
    fn default() -> Self {
        Self {
            lifetime_ms: 120_000,
            owner_priority_ms: 15_000,
            drop_spread: 30.0,
            initial_velocity_y: -200.0,
            spawn_height: 60.0,
            max_drops: 200,
            pickup_range: 40.0,
            pet_pickup_range: 80.0,
            pet_loot_range: 300.0,
            pet_chase_speed: 150.0,
            pet_pickup_cooldown_ms: 200,
            mob_pickup_range: 30.0,
            meso_explosion_range: 150.0,
            max_meso_explosion_drops: 10,
            max_recent_pickups: 50,
            recent_pickup_lifetime_ms: 30_000,
            seed: None,
        }
    }
}

impl DropPoolConfig {
    /// Set drop lifetime
    #[must_use]
    pub const fn with_lifetime(mut self, lifetime_ms: u64) -> Self {
        self.lifetime_ms = lifetime_ms;
        self
    }

    /// Set owner priority window
    #[must_use]
    pub const fn with_owner_priority(mut self, owner_priority_ms: u64) -> Self {
        self.owner_priority_ms = owner_priority_ms;
        self
    }

    /// Set live drop cap
    #[must_use]
    pub const fn with_max_drops(mut self, max_drops: usize) -> Self {
        self.max_drops = max_drops;
        self
    }

    /// Fix the RNG seed for reproducible spawns
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
