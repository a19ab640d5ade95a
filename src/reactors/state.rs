//! Reactor state machine
//!
//! Pure transition rules, kept apart from the pool so they can be checked
//! without any reactors loaded.
//!
//! ```text
//! Idle --Activate--> Activated --AnimationFinished--> Active --Deactivate--> Deactivating
//!   ^                                                                             |
//!   |                                                                          FadedOut
//!   |                                                                             v
//!   +---Respawn--- Respawning <--ScheduleRespawn-- Destroyed <--Destroy-- (any present state)
//! ```

use serde::{Deserialize, Serialize};

use super::ReactorId;
use crate::core::Tick;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReactorState {
    /// Waiting for interaction
    #[default]
    Idle,
    /// Playing the activation animation
    Activated,
    /// Triggered
    Active,
    /// Fading out
    Deactivating,
    Destroyed,
    /// Waiting on its spawn point's timer
    Respawning,
}

/// Event that moves a reactor between states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ReactorTransition {
    Activate,
    AnimationFinished,
    Deactivate,
    FadedOut,
    Destroy,
    ScheduleRespawn,
    Respawn,
    Reset,
}

impl ReactorState {
    /// Whether the reactor is on the map at all
    #[must_use]
    pub const fn is_present(self) -> bool {
        !matches!(self, Self::Destroyed | Self::Respawning)
    }

    #[must_use]
    pub const fn can_be_hit(self) -> bool {
        matches!(self, Self::Idle | Self::Active)
    }

    #[must_use]
    pub const fn can_be_touched(self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Animation row shown for this state. Respawning reactors are not drawn
    /// and report the idle row.
    #[must_use]
    pub const fn animation_index(self) -> u8 {
        match self {
            Self::Idle | Self::Respawning => 0,
            Self::Activated => 1,
            Self::Active => 2,
            Self::Deactivating => 3,
            Self::Destroyed => 4,
        }
    }

    /// Next state, or `None` if the transition does not apply here.
    #[must_use]
    pub const fn transition(self, transition: ReactorTransition) -> Option<Self> {
        use ReactorTransition as T;

        match (self, transition) {
            (Self::Idle, T::Activate) => Some(Self::Activated),
            (Self::Activated, T::AnimationFinished) => Some(Self::Active),
            (Self::Activated | Self::Active, T::Deactivate) => Some(Self::Deactivating),
            (Self::Deactivating, T::FadedOut) => Some(Self::Destroyed),
            (Self::Destroyed, T::ScheduleRespawn) => Some(Self::Respawning),
            (Self::Respawning, T::Respawn) => Some(Self::Idle),
            (state, T::Destroy) if state.is_present() => Some(Self::Destroyed),
            (state, T::Reset) if state.is_present() => Some(Self::Idle),
            _ => None,
        }
    }
}

/// What makes a reactor go off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReactorActivationType {
    /// Player walks into it
    #[default]
    Touch,
    /// Attacked
    Hit,
    /// A specific skill lands on it
    Skill,
    Quest,
    /// Goes off on a timer
    Time,
    /// An item is used on it
    Item,
}

impl ReactorActivationType {
    /// Reactors that skill and attack queries can find
    #[must_use]
    pub const fn is_skill_activated(self) -> bool {
        matches!(self, Self::Skill | Self::Hit)
    }
}

/// Result of one hit on a reactor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitResult {
    /// The reactor cannot be hit in its current state
    Ignored,
    /// Counted toward the threshold
    Counted,
    /// Threshold reached; the counter was reset
    Triggered(ReactorTransition),
}

/// Per-slot runtime state of a reactor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReactorRuntimeData {
    pub id: ReactorId,
    pub state: ReactorState,
    /// Updates spent in the current state
    pub state_frame: u32,
    pub state_start_time: Tick,
    pub hit_count: u32,
    pub required_hits: u32,
    pub alpha: f32,
    pub activation_type: ReactorActivationType,
    pub activating_player_id: Option<u32>,
    pub can_respawn: bool,
}

impl ReactorRuntimeData {
    #[must_use]
    pub fn new(id: ReactorId) -> Self {
        Self {
            id,
            state: ReactorState::Idle,
            state_frame: 0,
            state_start_time: 0,
            hit_count: 0,
            required_hits: 1,
            alpha: 1.0,
            activation_type: ReactorActivationType::Touch,
            activating_player_id: None,
            can_respawn: true,
        }
    }

    /// Apply `transition`, restarting the state timer. Returns `false` and
    /// leaves everything untouched when the transition is not allowed.
    pub fn apply(&mut self, transition: ReactorTransition, now: Tick) -> bool {
        let Some(next) = self.state.transition(transition) else {
            return false;
        };

        self.state = next;
        self.state_start_time = now;
        self.state_frame = 0;
        if next == ReactorState::Idle {
            self.hit_count = 0;
            self.alpha = 1.0;
            self.activating_player_id = None;
        }
        true
    }

    /// Count `damage` hits. Reaching the threshold activates an idle reactor
    /// and destroys an active one.
    pub fn register_hit(&mut self, damage: u32) -> HitResult {
        if !self.state.can_be_hit() {
            return HitResult::Ignored;
        }

        self.hit_count = self.hit_count.saturating_add(damage);
        if self.hit_count < self.required_hits.max(1) {
            return HitResult::Counted;
        }

        self.hit_count = 0;
        if self.state == ReactorState::Idle {
            HitResult::Triggered(ReactorTransition::Activate)
        } else {
            HitResult::Triggered(ReactorTransition::Destroy)
        }
    }
}
