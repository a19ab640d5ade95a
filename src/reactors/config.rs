//! Reactor pool tunables

use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactorPoolConfig {
    /// Respawn delay when the template has none (ms)
    pub default_respawn_ms: u64,
    /// Time spent in `Activated` before becoming `Active` (ms)
    pub activation_animation_ms: u64,
    /// Alpha lost per second while deactivating
    pub fade_speed: f32,
    /// Default radius for position lookups
    pub detection_range: f32,
    /// Default radius for skill lookups
    pub skill_detection_range: f32,
    pub player_hitbox: Vec2,
    pub respawn_enabled: bool,
}

impl Default for ReactorPoolConfig {
    fn default() -> Self {
        Self {
            default_respawn_ms: 60_000,
            activation_animation_ms: 500,
            fade_speed: 2.0,
            detection_range: 40.0,
            skill_detection_range: 100.0,
            player_hitbox: Vec2::new(40.0, 60.0),
            respawn_enabled: true,
        }
    }
}

impl ReactorPoolConfig {
    #[must_use]
    pub const fn with_default_respawn(mut self, respawn_ms: u64) -> Self {
        self.default_respawn_ms = respawn_ms;
        self
    }

    #[must_use]
    pub const fn with_respawn_enabled(mut self, enabled: bool) -> Self {
        self.respawn_enabled = enabled;
        self
    }
}
