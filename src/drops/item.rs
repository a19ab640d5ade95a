//! Dropped item entity and its physics state machine

use std::f32::consts::TAU;
use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::Tick;

// ============================================================================
// Identifiers and Enums
// ============================================================================

/// Pool-assigned drop handle. Never reused within a pool's lifetime.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct DropId(pub u32);

impl DropId {
    /// Get the raw id value.
    #[must_use]
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for DropId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "drop#{}", self.0)
    }
}

/// What a drop contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DropType {
    /// Currency
    #[default]
    Meso,
    /// Equipment, consumables and etc items
    Item,
    /// Quest-specific item
    QuestItem,
    /// Installation item such as a chair
    InstallItem,
}

/// Animation state of a drop. Exactly one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DropState {
    /// Just spawned, becomes `Falling` on the next update
    #[default]
    Spawning,
    /// Ballistic flight under gravity
    Falling,
    /// Same integration as `Falling`, after at least one ground contact
    Bouncing,
    /// Resting on the ground, the only state that can be picked up
    Idle,
    /// Rising and fading after a pickup
    PickingUp,
    /// Faded out, removed on the next update
    Expired,
    /// Ready for removal from the pool
    Removed,
}

/// Glow tint drawn behind valuable drops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GlowColor {
    /// No glow
    #[default]
    White,
    /// Meso piles of 1000 or more
    Silver,
    /// Meso piles of 10000 or more
    Gold,
    /// Rare items
    Purple,
}

impl GlowColor {
    /// RGB components
    #[must_use]
    pub const fn rgb(self) -> [u8; 3] {
        match self {
            Self::White => [255, 255, 255],
            Self::Silver => [192, 192, 192],
            Self::Gold => [255, 215, 0],
            Self::Purple => [200, 150, 255],
        }
    }
}

// ============================================================================
// Drop Item
// ============================================================================

/// A single dropped item with physics and animation state.
///
/// Owned by a [`DropPool`](super::DropPool); callers only ever see shared
/// references, so the public fields are read-only outside the pool.
#[derive(Debug, Clone, Default)]
pub struct DropItem {
    pub id: DropId,
    pub drop_type: DropType,
    /// Item identifier, `None` for mesos
    pub item_id: Option<String>,
    /// Stack size
    pub quantity: u32,
    /// Meso amount, 0 for items
    pub meso_amount: u32,

    pub position: Vec2,
    pub velocity: Vec2,
    /// Where the source died
    pub spawn_position: Vec2,
    /// Landing height, resolved once at spawn
    pub ground_y: f32,

    pub state: DropState,
    pub spawn_time: Tick,
    pub bounce_count: u32,
    pub alpha: f32,
    pub scale: f32,
    pub last_state_change: Tick,
    pub is_rare: bool,
    pub glow: GlowColor,

    pub can_pickup: bool,
    /// Player with pickup priority, `None` for anyone
    pub owner_id: Option<u32>,
    /// End of the owner's priority window
    pub owner_expire_time: Tick,
    /// When the drop disappears if left on the ground
    pub expire_time: Tick,
}

impl DropItem {
    /// Gravity acceleration (px/s²)
    pub const GRAVITY: f32 = 1200.0;
    /// Velocity multiplier applied on each bounce
    pub const BOUNCE_DAMPENING: f32 = 0.5;
    /// Impact speeds at or below this settle instead of bouncing
    pub const MIN_BOUNCE_VELOCITY: f32 = 30.0;
    pub const MAX_BOUNCES: u32 = 3;
    /// Fade-out window before `expire_time` (ms)
    pub const EXPIRE_FADE_DURATION: u64 = 1000;
    /// Pickup rise-and-fade animation length (ms)
    pub const PICKUP_DURATION: u64 = 200;
    /// Height the pickup animation rises (px)
    pub const PICKUP_RISE: f32 = 30.0;

    /// Whether the drop has finished its lifecycle.
    #[must_use]
    #[inline]
    pub fn is_expired(&self) -> bool {
        matches!(self.state, DropState::Expired | DropState::Removed)
    }

    /// Whether the owner's priority window blocks `requester` at `now`.
    #[must_use]
    pub fn is_owner_locked(&self, requester: u32, now: Tick) -> bool {
        match self.owner_id {
            Some(owner) => owner != requester && now < self.owner_expire_time,
            None => false,
        }
    }

    /// Idle, pickable, and not locked to someone else.
    #[must_use]
    pub fn can_be_picked_by(&self, requester: u32, now: Tick) -> bool {
        self.state == DropState::Idle && self.can_pickup && !self.is_owner_locked(requester, now)
    }

    /// Squared distance to `point`
    #[must_use]
    #[inline]
    pub fn distance_squared(&self, point: Vec2) -> f32 {
        self.position.distance_squared(point)
    }

    /// Whether an idle drop is within `range` of `point`.
    #[must_use]
    pub fn is_in_pickup_range(&self, point: Vec2, range: f32) -> bool {
        self.state == DropState::Idle && self.distance_squared(point) <= range * range
    }

    /// Advance the state machine by one frame.
    pub fn update(&mut self, now: Tick, dt: f32) {
        match self.state {
            DropState::Spawning => {
                self.state = DropState::Falling;
                self.last_state_change = now;
            }
            DropState::Falling | DropState::Bouncing => self.update_falling(now, dt),
            DropState::Idle => self.update_idle(now),
            DropState::PickingUp => self.update_picking_up(now),
            DropState::Expired => self.state = DropState::Removed,
            DropState::Removed => {}
        }
    }

    fn update_falling(&mut self, now: Tick, dt: f32) {
        self.velocity.y += Self::GRAVITY * dt;
        self.position.y += self.velocity.y * dt;
        self.position.x += self.velocity.x * dt;

        if self.position.y < self.ground_y {
            return;
        }

        self.position.y = self.ground_y;
        if self.velocity.y.abs() > Self::MIN_BOUNCE_VELOCITY && self.bounce_count < Self::MAX_BOUNCES
        {
            self.velocity.y = -self.velocity.y * Self::BOUNCE_DAMPENING;
            self.velocity.x *= Self::BOUNCE_DAMPENING;
            self.bounce_count += 1;
            self.state = DropState::Bouncing;
        } else {
            self.velocity = Vec2::ZERO;
            self.state = DropState::Idle;
            self.last_state_change = now;
        }
    }

    fn update_idle(&mut self, now: Tick) {
        let fade_start = self.expire_time.saturating_sub(Self::EXPIRE_FADE_DURATION);
        if self.expire_time > 0 && now >= fade_start {
            if now >= self.expire_time {
                self.state = DropState::Expired;
                self.alpha = 0.0;
            } else {
                let remaining = self.expire_time - now;
                self.alpha = remaining as f32 / Self::EXPIRE_FADE_DURATION as f32;
            }
        }

        if self.is_rare {
            let t = (now % 1000) as f32 / 1000.0;
            self.scale = 1.0 + 0.05 * (t * TAU).sin();
        }
    }

    fn update_picking_up(&mut self, now: Tick) {
        let elapsed = now.saturating_sub(self.last_state_change);
        let t = elapsed as f32 / Self::PICKUP_DURATION as f32;

        if t >= 1.0 {
            self.state = DropState::Removed;
            self.alpha = 0.0;
            return;
        }

        self.position.y = self.ground_y - Self::PICKUP_RISE * t;
        self.alpha = 1.0 - t;
        self.scale = 1.0 + 0.3 * t;
    }

    /// Begin the pickup animation. Only valid from `Idle`.
    pub fn start_pickup(&mut self, now: Tick) -> bool {
        if self.state != DropState::Idle {
            return false;
        }
        self.state = DropState::PickingUp;
        self.last_state_change = now;
        true
    }

    /// Force the pickup animation regardless of state, used by mob theft and
    /// meso explosion.
    pub(crate) fn force_pickup(&mut self, now: Tick) {
        self.state = DropState::PickingUp;
        self.last_state_change = now;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn falling_drop() -> DropItem {
        DropItem {
            id: DropId(1),
            position: Vec2::new(0.0, -60.0),
            velocity: Vec2::new(10.0, -200.0),
            ground_y: 0.0,
            alpha: 1.0,
            scale: 1.0,
            can_pickup: true,
            expire_time: 120_000,
            ..Default::default()
        }
    }

    fn settle(drop: &mut DropItem) -> Tick {
        let mut now = 0;
        while drop.state != DropState::Idle {
            now += 16;
            drop.update(now, DT);
            assert!(now < 10_000, "drop never settled");
        }
        now
    }

    #[test]
    fn test_spawning_moves_to_falling_without_integration() {
        let mut drop = falling_drop();
        drop.update(16, DT);

        assert_eq!(drop.state, DropState::Falling);
        assert_eq!(drop.position, Vec2::new(0.0, -60.0));
    }

    #[test]
    fn test_semi_implicit_euler_step() {
        let mut drop = falling_drop();
        drop.state = DropState::Falling;
        drop.update(16, 0.1);

        // v' = -200 + 120 = -80, y' = -60 - 8 = -68
        assert!((drop.velocity.y + 80.0).abs() < 1e-4);
        assert!((drop.position.y + 68.0).abs() < 1e-4);
        assert!((drop.position.x - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_bounces_then_settles() {
        let mut drop = falling_drop();
        settle(&mut drop);

        assert!(drop.bounce_count >= 1);
        assert!(drop.bounce_count <= DropItem::MAX_BOUNCES);
        assert_eq!(drop.position.y, drop.ground_y);
        assert_eq!(drop.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_slow_impact_does_not_bounce() {
        let mut drop = falling_drop();
        drop.state = DropState::Falling;
        drop.position.y = -0.1;
        drop.velocity = Vec2::new(5.0, 10.0);
        drop.update(16, 0.01);

        assert_eq!(drop.state, DropState::Idle);
        assert_eq!(drop.bounce_count, 0);
    }

    #[test]
    fn test_trajectory_is_deterministic() {
        let mut a = falling_drop();
        let mut b = falling_drop();
        for step in 1..=60 {
            a.update(step * 16, DT);
            b.update(step * 16, DT);
            assert_eq!(a.position.y.to_bits(), b.position.y.to_bits());
        }
    }

    #[test]
    fn test_idle_fade_and_expiry() {
        let mut drop = falling_drop();
        drop.state = DropState::Idle;

        drop.update(100_000, DT);
        assert_eq!(drop.alpha, 1.0);

        drop.update(119_500, DT);
        assert!((drop.alpha - 0.5).abs() < 1e-6);
        assert_eq!(drop.state, DropState::Idle);

        drop.update(120_000, DT);
        assert_eq!(drop.state, DropState::Expired);
        assert_eq!(drop.alpha, 0.0);
        assert!(drop.is_expired());

        drop.update(120_001, DT);
        assert_eq!(drop.state, DropState::Removed);
    }

    #[test]
    fn test_rare_hover_scale() {
        let mut drop = falling_drop();
        drop.state = DropState::Idle;
        drop.is_rare = true;

        drop.update(250, DT);
        assert!((drop.scale - 1.05).abs() < 1e-5);
        drop.update(750, DT);
        assert!((drop.scale - 0.95).abs() < 1e-5);
    }

    #[test]
    fn test_pickup_animation() {
        let mut drop = falling_drop();
        drop.state = DropState::Idle;

        assert!(drop.start_pickup(1000));
        assert!(!drop.start_pickup(1000), "Only idle drops start pickup");

        drop.update(1100, DT);
        assert!((drop.position.y + 15.0).abs() < 1e-4);
        assert!((drop.alpha - 0.5).abs() < 1e-6);
        assert!((drop.scale - 1.15).abs() < 1e-6);

        drop.update(1200, DT);
        assert_eq!(drop.state, DropState::Removed);
        assert_eq!(drop.alpha, 0.0);
    }

    #[test]
    fn test_owner_lock() {
        let mut drop = falling_drop();
        drop.state = DropState::Idle;
        drop.owner_id = Some(7);
        drop.owner_expire_time = 15_000;

        assert!(drop.can_be_picked_by(7, 0));
        assert!(!drop.can_be_picked_by(8, 14_999));
        assert!(drop.can_be_picked_by(8, 15_000));
    }

    #[test]
    fn test_glow_rgb() {
        assert_eq!(GlowColor::Gold.rgb(), [255, 215, 0]);
        assert_eq!(GlowColor::default().rgb(), [255, 255, 255]);
    }
}
