//! Mob pool tunables

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Respawn and hitbox defaults for a [`MobPool`](super::MobPool).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MobPoolConfig {
    /// Respawn delay for spawn points whose template has none (ms)
    pub default_respawn_ms: u64,
    /// Added to every respawn delay so the corpse can finish animating (ms)
    pub death_animation_ms: u64,
    pub respawn_enabled: bool,
    pub boss_spawn_enabled: bool,
    /// Player hitbox used by body-attack queries
    pub player_hitbox: Vec2,
    /// Mob hitbox when the mob reports no frame size
    pub default_mob_frame: Vec2,
}

impl Default for MobPoolConfig {
    fn default() -> Self {
        Self {
            default_respawn_ms: 7_000,
            death_animation_ms: 2_000,
            respawn_enabled: true,
            boss_spawn_enabled: true,
            player_hitbox: Vec2::new(40.0, 60.0),
            default_mob_frame: Vec2::new(40.0, 40.0),
        }
    }
}

impl MobPoolConfig {
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

    #[must_use]
    pub const fn with_boss_spawn_enabled(mut self, enabled: bool) -> Self {
        self.boss_spawn_enabled = enabled;
        self
    }
}
