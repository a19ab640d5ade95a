//! Reactor entity trait and template data

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ReactorState;
use crate::core::Tick;
use crate::geometry::Rect;

/// Pool-assigned reactor handle. A respawned reactor gets a new one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReactorId(pub u32);

impl ReactorId {
    #[must_use]
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ReactorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "reactor#{}", self.0)
    }
}

/// Placement data of one reactor on the map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactorTemplate {
    /// Reactor type id
    pub reactor_id: String,
    pub name: Option<String>,
    pub position: Vec2,
    /// Sprite origin, subtracted from `position` to get the hitbox corner
    pub origin: Vec2,
    /// Hitbox width and height
    pub size: Vec2,
    pub flip: bool,
    /// Respawn delay in ms; `None` or 0 uses the pool default
    pub reactor_time: Option<u64>,
}

impl ReactorTemplate {
    #[must_use]
    pub fn new(reactor_id: impl Into<String>, position: Vec2) -> Self {
        Self {
            reactor_id: reactor_id.into(),
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
    pub const fn with_hitbox(mut self, origin: Vec2, size: Vec2) -> Self {
        self.origin = origin;
        self.size = size;
        self
    }

    #[must_use]
    pub const fn with_reactor_time(mut self, respawn_ms: u64) -> Self {
        self.reactor_time = Some(respawn_ms);
        self
    }
}

/// A reactor as the pool sees it.
pub trait ReactorEntity {
    fn template(&self) -> &ReactorTemplate;

    fn position(&self) -> Vec2 {
        self.template().position
    }

    /// Touch hitbox: `position - origin`, sized by the template.
    fn hitbox(&self) -> Rect {
        let template = self.template();
        let corner = self.position() - template.origin;
        Rect::new(corner.x, corner.y, template.size.x, template.size.y)
    }

    /// Called after every state change so the reactor can switch animation.
    fn on_state_changed(&mut self, _state: ReactorState, _now: Tick) {}
}
