//! Mob capability traits
//!
//! The pool never builds or animates mobs. It sees them through two traits:
//! [`MobEntity`] for the live object (position, template data, animation
//! state) and [`MobAi`] for the behavior component that owns health, boss
//! flags and controller state.
//!
//! # Example
//!
//! ```ignore
//! struct Snail { ai: SnailAi, pos: Vec2, template: MobTemplate, dead_anim_done: bool }
//!
//! impl MobEntity for Snail {
//!     type Ai = SnailAi;
//!     fn ai(&self) -> Option<&SnailAi> { Some(&self.ai) }
//!     fn ai_mut(&mut self) -> Option<&mut SnailAi> { Some(&mut self.ai) }
//!     fn position(&self) -> Option<Vec2> { Some(self.pos) }
//!     fn template(&self) -> &MobTemplate { &self.template }
//!     fn is_death_animation_complete(&self) -> bool { self.dead_anim_done }
//! }
//! ```

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::Tick;

// ============================================================================
// Ids and Enums
// ============================================================================

/// Pool-assigned mob handle. Never reused within a pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MobId(pub u32);

impl MobId {
    #[must_use]
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for MobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mob#{}", self.0)
    }
}

/// How a mob died, forwarded to its AI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MobDeathType {
    Normal,
    /// Killed by a player
    #[default]
    Killed,
    /// Self-destructed
    Bomb,
    /// Vanished without a death animation
    Miss,
    /// Eaten by another mob
    Swallowed,
    Timeout,
}

/// Who drives a mob's movement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MobControllerType {
    #[default]
    None,
    Local,
    Remote,
    Server,
}

// ============================================================================
// Template
// ============================================================================

/// Map placement data a mob was created from.
///
/// Copied into a spawn point so the mob can be recreated after it dies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MobTemplate {
    /// Mob type id, e.g. `"0100100"`
    pub type_id: String,
    /// Display name, used for boss announcements
    pub name: Option<String>,
    /// Placement position, used when the mob reports no spawn position
    pub position: Vec2,
    pub rx0_shift: i32,
    pub rx1_shift: i32,
    pub flip: bool,
    /// Respawn delay (ms). `None` uses the pool default, `Some(0)` never respawns.
    pub mob_time: Option<u64>,
    pub is_boss: bool,
}

impl MobTemplate {
    #[must_use]
    pub fn new(type_id: impl Into<String>, position: Vec2) -> Self {
        Self {
            type_id: type_id.into(),
            position,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub const fn with_mob_time(mut self, mob_time: u64) -> Self {
        self.mob_time = Some(mob_time);
        self
    }

    #[must_use]
    pub const fn boss(mut self) -> Self {
        self.is_boss = true;
        self
    }
}

// ============================================================================
// Capability Traits
// ============================================================================

/// Behavior component of a mob.
///
/// The pool reads health and flags from it and routes kill, controller,
/// aggro and guided-arrow changes to it. It never decides them.
pub trait MobAi {
    fn is_dead(&self) -> bool;

    /// Remaining health in `[0, 1]`
    fn hp_percent(&self) -> f32;

    fn is_boss(&self) -> bool {
        false
    }

    fn level(&self) -> u32 {
        1
    }

    fn is_undead(&self) -> bool {
        false
    }

    /// Confused mobs that may hit other mobs
    fn is_dazzled(&self) -> bool {
        false
    }

    /// Enter the death state.
    fn kill(&mut self, now: Tick, death_type: MobDeathType);

    /// Whether the AI reached its final removed state
    fn is_removed(&self) -> bool;

    fn mark_removed(&mut self, now: Tick);

    fn set_aggro_range(&mut self, range: f32);

    fn controller_type(&self) -> MobControllerType;

    fn controller_id(&self) -> u32;

    fn change_controller(&mut self, kind: MobControllerType, controller_id: u32, now: Tick);

    fn is_guided_by(&self, target_id: u32) -> bool;

    fn set_guided(&mut self, target_id: u32);

    fn reset_guided(&mut self);
}

/// A live mob as seen by the pool.
pub trait MobEntity {
    type Ai: MobAi;

    /// Behavior component. Mobs without one are skipped by every query.
    fn ai(&self) -> Option<&Self::Ai>;

    fn ai_mut(&mut self) -> Option<&mut Self::Ai>;

    /// Current foot position. `None` while the mob has no movement data.
    fn position(&self) -> Option<Vec2>;

    /// Position the mob was placed at, if tracked separately from the template.
    fn spawn_position(&self) -> Option<Vec2> {
        None
    }

    fn template(&self) -> &MobTemplate;

    /// Current animation frame size, used for body-attack hitboxes.
    fn frame_size(&self) -> Option<Vec2> {
        None
    }

    fn is_death_animation_complete(&self) -> bool;
}

// ============================================================================
// Puppets
// ============================================================================

/// A summon that draws mob aggro away from its owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PuppetInfo {
    pub object_id: u32,
    pub position: Vec2,
    pub owner_id: u32,
    pub aggro_value: i32,
    /// Tick at which the puppet disappears, 0 for never
    pub expiration_time: Tick,
    pub is_active: bool,
}

impl PuppetInfo {
    #[must_use]
    pub fn new(object_id: u32, position: Vec2, owner_id: u32) -> Self {
        Self {
            object_id,
            position,
            owner_id,
            aggro_value: 0,
            expiration_time: 0,
            is_active: true,
        }
    }

    #[must_use]
    pub const fn expiring_at(mut self, tick: Tick) -> Self {
        self.expiration_time = tick;
        self
    }

    /// Whether the puppet should be dropped at `now`.
    #[must_use]
    pub fn is_expired(&self, now: Tick) -> bool {
        !self.is_active || (self.expiration_time > 0 && now >= self.expiration_time)
    }
}
