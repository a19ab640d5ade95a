//! Portal pool tunables

use serde::{Deserialize, Serialize};

/// Hidden-portal timing and collision defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalPoolConfig {
    /// Distance at which hidden portals reveal
    pub reveal_range: f32,
    /// Alpha change per second
    pub fade_speed: f32,
    /// Time a hidden portal stays revealed after the player leaves (ms)
    pub reveal_duration_ms: u64,
    /// Default radius for position lookups
    pub detection_range: f32,
    /// Fallback `h_range` for regular portals
    pub collision_h_range: i32,
    /// Fallback `v_range` for regular portals, also the default PH
    pub collision_v_range: i32,
    /// Fallback ranges for touch-triggered portal kinds
    pub impact_h_range: i32,
    pub impact_v_range: i32,
    pub player_height: f32,
}

impl Default for PortalPoolConfig {
    fn default() -> Self {
        Self {
            reveal_range: 50.0,
            fade_speed: 3.0,
            reveal_duration_ms: 2_000,
            detection_range: 40.0,
            collision_h_range: 40,
            collision_v_range: 30,
            impact_h_range: 30,
            impact_v_range: 20,
            player_height: 60.0,
        }
    }
}

impl PortalPoolConfig {
    #[must_use]
    pub const fn with_reveal_range(mut self, range: f32) -> Self {
        self.reveal_range = range;
        self
    }

    #[must_use]
    pub const fn with_reveal_duration(mut self, duration_ms: u64) -> Self {
        self.reveal_duration_ms = duration_ms;
        self
    }
}
