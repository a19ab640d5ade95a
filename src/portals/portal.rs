//! Portal data
//!
//! A portal is fixed map data: where it is, what kind it is and where it
//! leads. The only runtime state is the fade of hidden portals.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Portal kind as stored in map data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortalType {
    /// Player spawn location
    StartPoint,
    Invisible,
    Visible,
    /// Triggers on touch
    Collision,
    Changeable,
    ChangeableInvisible,
    /// Mystic door destination
    TownPortalPoint,
    Script,
    ScriptInvisible,
    CollisionScript,
    /// Appears when the player comes close
    Hidden,
    ScriptHidden,
    CollisionVerticalJump,
    CollisionCustomImpact,
    CollisionCustomImpact2,
    CollisionUnknownPcig,
    ScriptHiddenUng,
    #[default]
    Default,
}

impl PortalType {
    /// Whether the portal fades in on proximity
    #[must_use]
    pub const fn is_hidden(self) -> bool {
        matches!(self, Self::Hidden | Self::ScriptHidden | Self::ScriptHiddenUng)
    }

    /// Touch-triggered jump or impact portals
    #[must_use]
    pub const fn is_collision_subtype(self) -> bool {
        matches!(
            self,
            Self::Collision
                | Self::CollisionScript
                | Self::CollisionVerticalJump
                | Self::CollisionCustomImpact
                | Self::CollisionCustomImpact2
                | Self::CollisionUnknownPcig
        )
    }

    /// Whether the player can enter the portal at all
    #[must_use]
    pub const fn is_interactive(self) -> bool {
        !matches!(
            self,
            Self::StartPoint | Self::TownPortalPoint | Self::Invisible | Self::ScriptInvisible
        )
    }

    /// Always drawn
    #[must_use]
    pub const fn is_visible(self) -> bool {
        matches!(self, Self::Visible | Self::Default)
    }
}

/// One portal placed on the map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalInstance {
    /// Portal name (`pn`), unique per map in well-formed data
    pub name: String,
    pub portal_type: PortalType,
    pub position: Vec2,
    /// Destination map id
    pub target_map: Option<u32>,
    /// Destination portal name
    pub target_name: Option<String>,
    pub script: Option<String>,
    /// Horizontal detection half-range
    pub h_range: Option<i32>,
    /// Vertical detection half-range
    pub v_range: Option<i32>,
    pub horizontal_impact: Option<i32>,
    pub vertical_impact: Option<i32>,
    pub delay: Option<u32>,
    pub hide_tooltip: bool,
    pub only_once: bool,
}

impl PortalInstance {
    #[must_use]
    pub fn new(name: impl Into<String>, portal_type: PortalType, position: Vec2) -> Self {
        Self {
            name: name.into(),
            portal_type,
            position,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_target(mut self, map: u32, portal: impl Into<String>) -> Self {
        self.target_map = Some(map);
        self.target_name = Some(portal.into());
        self
    }

    #[must_use]
    pub const fn with_ranges(mut self, h_range: i32, v_range: i32) -> Self {
        self.h_range = Some(h_range);
        self.v_range = Some(v_range);
        self
    }

    #[must_use]
    pub const fn with_impact(mut self, horizontal: i32, vertical: i32) -> Self {
        self.horizontal_impact = Some(horizontal);
        self.vertical_impact = Some(vertical);
        self
    }

    #[must_use]
    pub fn with_script(mut self, script: impl Into<String>) -> Self {
        self.script = Some(script.into());
        self
    }
}

/// Resolved range and impact values of a portal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PortalProperties {
    /// PH, the vertical detection range
    pub height: i32,
    /// PSH, special height for spring portals
    pub special_height: i32,
    /// PV, vertical launch velocity
    pub vertical: i32,
    pub horizontal_range: i32,
    pub vertical_range: i32,
    pub horizontal_impact: i32,
    pub vertical_impact: i32,
}

/// Fade state of one hidden portal.
///
/// `alpha` chases `target_alpha`; `is_revealed` flips on at reveal and off
/// only once `alpha` has reached 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HiddenPortalState {
    pub index: usize,
    pub name: String,
    pub is_revealed: bool,
    /// Last tick the player was in range
    pub revealed_time: u64,
    pub alpha: f32,
    pub target_alpha: f32,
}

impl HiddenPortalState {
    pub(super) fn new(index: usize, name: String) -> Self {
        Self {
            index,
            name,
            is_revealed: false,
            revealed_time: 0,
            alpha: 0.0,
            target_alpha: 0.0,
        }
    }
}
