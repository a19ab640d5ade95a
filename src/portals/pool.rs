//! Portal Pool
//!
//! Holds the map's fixed portal list and the fade state of hidden portals.
//!
//! # Design Principles
//!
//! - **Index Addressed**: Portals keep their map-data order; the index is the id
//! - **Case-Insensitive Names**: `"SP"` and `"sp"` resolve to the same portal
//! - **Hysteresis**: Hidden portals reveal instantly but hide only after a
//!   grace period and a full fade-out
//!
//! # Example
//!
//! ```ignore
//! let mut portals = PortalPool::new(PortalPoolConfig::default());
//! portals.initialize(map.portals);
//!
//! portals.update(player_feet, now, dt);
//! if let Some(index) = portals.check_portal_collision(player_feet, None) {
//!     portals.trigger_portal(index);
//! }
//! ```

use std::collections::BTreeMap;

use glam::Vec2;
use rustc_hash::FxHashMap;
use serde::Serialize;

use super::{HiddenPortalState, PortalInstance, PortalPoolConfig, PortalProperties, PortalType};
use crate::core::{EventQueue, Tick};

/// Name used by map data for the default start point.
const START_POINT_NAME: &str = "sp";

// ============================================================================
// Events
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[non_exhaustive]
pub enum PortalEvent {
    /// A hidden portal began fading in
    HiddenRevealed { index: usize, name: String },
    /// A hidden portal finished fading out
    HiddenHidden { index: usize, name: String },
    /// The player entered a portal
    Triggered { index: usize, name: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PortalPoolStats {
    pub total_portals: usize,
    pub visible_portals: usize,
    pub hidden_portals: usize,
    pub revealed_hidden_portals: usize,
}

// ============================================================================
// Portal Pool
// ============================================================================

pub struct PortalPool {
    config: PortalPoolConfig,
    portals: Vec<PortalInstance>,
    /// Lowercased name to index
    names: FxHashMap<String, usize>,
    hidden: BTreeMap<usize, HiddenPortalState>,
    last_update: Tick,
    events: EventQueue<PortalEvent>,
}

impl PortalPool {
    #[must_use]
    pub fn new(config: PortalPoolConfig) -> Self {
        Self {
            config,
            portals: Vec::new(),
            names: FxHashMap::default(),
            hidden: BTreeMap::new(),
            last_update: 0,
            events: EventQueue::new(),
        }
    }

    /// Replace the portal list. Hidden portals start fully hidden.
    pub fn initialize(&mut self, portals: impl IntoIterator<Item = PortalInstance>) {
        self.clear();
        self.portals = portals.into_iter().collect();

        for (index, portal) in self.portals.iter().enumerate() {
            if !portal.name.is_empty() {
                // Later duplicates shadow earlier ones
                self.names.insert(portal.name.to_ascii_lowercase(), index);
            }
            if portal.portal_type.is_hidden() {
                self.hidden
                    .insert(index, HiddenPortalState::new(index, portal.name.clone()));
            }
        }

        log::info!(
            "Portal pool initialized: {} portals, {} hidden",
            self.portals.len(),
            self.hidden.len()
        );
    }

    pub fn clear(&mut self) {
        self.portals.clear();
        self.names.clear();
        self.hidden.clear();
        self.events.clear();
        self.last_update = 0;
    }

    #[must_use]
    pub fn config(&self) -> &PortalPoolConfig {
        &self.config
    }

    #[must_use]
    pub fn events(&self) -> &EventQueue<PortalEvent> {
        &self.events
    }

    pub fn drain_events(&mut self) -> impl Iterator<Item = PortalEvent> + '_ {
        self.events.drain()
    }

    #[must_use]
    #[inline]
    pub fn last_update(&self) -> Tick {
        self.last_update
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    #[must_use]
    #[inline]
    pub fn portal(&self, index: usize) -> Option<&PortalInstance> {
        self.portals.get(index)
    }

    #[must_use]
    pub fn portals(&self) -> &[PortalInstance] {
        &self.portals
    }

    #[must_use]
    #[inline]
    pub fn portal_count(&self) -> usize {
        self.portals.len()
    }

    #[must_use]
    pub fn portal_index_by_name(&self, name: &str) -> Option<usize> {
        self.names.get(&name.to_ascii_lowercase()).copied()
    }

    #[must_use]
    pub fn portal_by_name(&self, name: &str) -> Option<&PortalInstance> {
        self.portal_index_by_name(name).and_then(|i| self.portals.get(i))
    }

    /// The `StartPoint` portal, else the one named `sp`, else the first one.
    #[must_use]
    pub fn find_start_point(&self) -> Option<usize> {
        if self.portals.is_empty() {
            return None;
        }
        self.portals
            .iter()
            .position(|p| p.portal_type == PortalType::StartPoint)
            .or_else(|| self.portal_index_by_name(START_POINT_NAME))
            .or(Some(0))
    }

    /// First portal within `range` (default `detection_range`) of `point`.
    #[must_use]
    pub fn find_portal_at_position(&self, point: Vec2, range: Option<f32>) -> Option<usize> {
        let range = range.unwrap_or(self.config.detection_range);
        let range_sq = range * range;
        self.portals
            .iter()
            .position(|p| p.position.distance_squared(point) <= range_sq)
    }

    #[must_use]
    pub fn portals_in_range(&self, point: Vec2, range: f32) -> Vec<usize> {
        let range_sq = range * range;
        self.portals
            .iter()
            .enumerate()
            .filter(|(_, p)| p.position.distance_squared(point) <= range_sq)
            .map(|(i, _)| i)
            .collect()
    }

    /// Hidden portals within `range` of the player. A non-positive range
    /// falls back to the reveal range.
    #[must_use]
    pub fn find_portal_hidden(&self, player: Vec2, range: Option<f32>) -> Vec<usize> {
        let range = range
            .filter(|r| *r > 0.0)
            .unwrap_or(self.config.reveal_range);
        let range_sq = range * range;
        self.hidden
            .keys()
            .copied()
            .filter(|&i| {
                self.portals
                    .get(i)
                    .is_some_and(|p| p.position.distance_squared(player) <= range_sq)
            })
            .collect()
    }

    // ========================================================================
    // Hidden Portals
    // ========================================================================

    /// Advance every hidden portal's reveal timer and fade.
    pub fn update_hidden_portal(&mut self, player: Vec2, now: Tick, dt: f32) {
        let range_sq = self.config.reveal_range * self.config.reveal_range;
        let step = self.config.fade_speed * dt;

        for (&index, state) in &mut self.hidden {
            let Some(portal) = self.portals.get(index) else {
                continue;
            };

            if portal.position.distance_squared(player) <= range_sq {
                if !state.is_revealed {
                    state.is_revealed = true;
                    self.events.push(PortalEvent::HiddenRevealed {
                        index,
                        name: state.name.clone(),
                    });
                    log::debug!("Hidden portal '{}' revealed", state.name);
                }
                state.revealed_time = now;
                state.target_alpha = 1.0;
            } else if state.is_revealed
                && now.saturating_sub(state.revealed_time) > self.config.reveal_duration_ms
            {
                state.target_alpha = 0.0;
            }

            if state.alpha < state.target_alpha {
                state.alpha = (state.alpha + step).min(state.target_alpha);
            } else if state.alpha > state.target_alpha {
                state.alpha = (state.alpha - step).max(state.target_alpha);
                if state.alpha <= 0.0 && state.is_revealed {
                    state.is_revealed = false;
                    self.events.push(PortalEvent::HiddenHidden {
                        index,
                        name: state.name.clone(),
                    });
                    log::debug!("Hidden portal '{}' hidden", state.name);
                }
            }
        }
    }

    /// Force a hidden portal shown or hidden, skipping the proximity timer.
    ///
    /// Hiding snaps alpha to 0. Returns `false` if `index` is not a hidden
    /// portal.
    pub fn set_hidden_portal(&mut self, index: usize, hidden: bool, now: Tick) -> bool {
        let Some(state) = self.hidden.get_mut(&index) else {
            return false;
        };

        if hidden {
            state.target_alpha = 0.0;
            if state.is_revealed {
                state.is_revealed = false;
                state.alpha = 0.0;
                self.events.push(PortalEvent::HiddenHidden {
                    index,
                    name: state.name.clone(),
                });
            }
        } else {
            state.target_alpha = 1.0;
            state.revealed_time = now;
            if !state.is_revealed {
                state.is_revealed = true;
                self.events.push(PortalEvent::HiddenRevealed {
                    index,
                    name: state.name.clone(),
                });
            }
        }
        true
    }

    pub fn set_hidden_portal_by_name(&mut self, name: &str, hidden: bool, now: Tick) -> bool {
        match self.portal_index_by_name(name) {
            Some(index) => self.set_hidden_portal(index, hidden, now),
            None => false,
        }
    }

    /// Draw alpha. Portals that are not hidden are always fully opaque.
    #[must_use]
    pub fn hidden_portal_alpha(&self, index: usize) -> f32 {
        self.hidden.get(&index).map_or(1.0, |s| s.alpha)
    }

    /// Non-hidden portals count as revealed.
    #[must_use]
    pub fn is_hidden_portal_revealed(&self, index: usize) -> bool {
        self.hidden.get(&index).is_none_or(|s| s.is_revealed)
    }

    #[must_use]
    pub fn is_hidden_portal(&self, index: usize) -> bool {
        self.hidden.contains_key(&index)
    }

    #[must_use]
    pub fn hidden_portal_state(&self, index: usize) -> Option<&HiddenPortalState> {
        self.hidden.get(&index)
    }

    // ========================================================================
    // Properties
    // ========================================================================

    /// Vertical detection range (PH). 0 for an unknown index.
    #[must_use]
    pub fn prop_ph(&self, index: usize) -> i32 {
        self.portals
            .get(index)
            .map_or(0, |p| p.v_range.unwrap_or(self.config.collision_v_range))
    }

    /// Special height (PSH), taken from the vertical impact.
    #[must_use]
    pub fn prop_psh(&self, index: usize) -> i32 {
        self.portals
            .get(index)
            .map_or(0, |p| p.vertical_impact.unwrap_or(0))
    }

    /// Vertical launch velocity (PV).
    #[must_use]
    pub fn prop_pv(&self, index: usize) -> i32 {
        self.prop_psh(index)
    }

    #[must_use]
    pub fn portal_properties(&self, index: usize) -> PortalProperties {
        let Some(portal) = self.portals.get(index) else {
            return PortalProperties::default();
        };
        let v_range = portal.v_range.unwrap_or(self.config.collision_v_range);
        let vertical_impact = portal.vertical_impact.unwrap_or(0);
        PortalProperties {
            height: v_range,
            special_height: vertical_impact,
            vertical: vertical_impact,
            horizontal_range: portal.h_range.unwrap_or(self.config.collision_h_range),
            vertical_range: v_range,
            horizontal_impact: portal.horizontal_impact.unwrap_or(0),
            vertical_impact,
        }
    }

    #[must_use]
    pub fn portal_properties_by_name(&self, name: &str) -> PortalProperties {
        self.portal_index_by_name(name)
            .map(|i| self.portal_properties(i))
            .unwrap_or_default()
    }

    // ========================================================================
    // Collision
    // ========================================================================

    /// First enterable portal overlapping a player standing at `feet`.
    ///
    /// The player spans `feet.y - height ..= feet.y`; the portal spans
    /// `position.y ± v_range`.
    #[must_use]
    pub fn check_portal_collision(&self, feet: Vec2, player_height: Option<f32>) -> Option<usize> {
        let height = player_height.unwrap_or(self.config.player_height);

        self.portals.iter().enumerate().find_map(|(index, portal)| {
            if !portal.portal_type.is_interactive() || !self.is_hidden_portal_revealed(index) {
                return None;
            }
            let h = portal.h_range.unwrap_or(self.config.collision_h_range) as f32;
            let v = portal.v_range.unwrap_or(self.config.collision_v_range) as f32;

            let hit = (feet.x - portal.position.x).abs() <= h
                && feet.y - height <= portal.position.y + v
                && feet.y >= portal.position.y - v;
            hit.then_some(index)
        })
    }

    /// First touch-triggered portal (jump or impact kinds) around `point`.
    #[must_use]
    pub fn check_collision_portal(&self, point: Vec2) -> Option<usize> {
        self.portals.iter().enumerate().find_map(|(index, portal)| {
            if !portal.portal_type.is_collision_subtype() {
                return None;
            }
            let h = portal.h_range.unwrap_or(self.config.impact_h_range) as f32;
            let v = portal.v_range.unwrap_or(self.config.impact_v_range) as f32;

            let delta = (point - portal.position).abs();
            (delta.x <= h && delta.y <= v).then_some(index)
        })
    }

    /// Record that the player used a portal.
    pub fn trigger_portal(&mut self, index: usize) -> bool {
        let Some(portal) = self.portals.get(index) else {
            return false;
        };
        log::debug!(
            "Portal '{}' triggered -> {:?}/{:?}",
            portal.name,
            portal.target_map,
            portal.target_name
        );
        self.events.push(PortalEvent::Triggered {
            index,
            name: portal.name.clone(),
        });
        true
    }

    // ========================================================================
    // Frame Update
    // ========================================================================

    pub fn update(&mut self, player: Vec2, now: Tick, dt: f32) {
        self.last_update = now;
        self.update_hidden_portal(player, now, dt);
    }

    #[must_use]
    pub fn stats(&self) -> PortalPoolStats {
        PortalPoolStats {
            total_portals: self.portals.len(),
            visible_portals: self
                .portals
                .iter()
                .filter(|p| p.portal_type.is_visible())
                .count(),
            hidden_portals: self.hidden.len(),
            revealed_hidden_portals: self.hidden.values().filter(|s| s.is_revealed).count(),
        }
    }
}

impl Default for PortalPool {
    fn default() -> Self {
        Self::new(PortalPoolConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn portal(name: &str, kind: PortalType, x: f32, y: f32) -> PortalInstance {
        PortalInstance::new(name, kind, Vec2::new(x, y))
    }

    fn pool_with(portals: Vec<PortalInstance>) -> PortalPool {
        let mut pool = PortalPool::default();
        pool.initialize(portals);
        pool
    }

    #[test]
    fn test_initialize_and_name_lookup() {
        let pool = pool_with(vec![
            portal("sp", PortalType::StartPoint, 0.0, 0.0),
            portal("East00", PortalType::Visible, 500.0, 0.0),
            portal("secret", PortalType::Hidden, 200.0, 0.0),
        ]);

        assert_eq!(pool.portal_count(), 3);
        assert_eq!(pool.portal_index_by_name("east00"), Some(1));
        assert_eq!(pool.portal_index_by_name("EAST00"), Some(1));
        assert_eq!(pool.portal_by_name("Secret").map(|p| p.position.x), Some(200.0));
        assert!(pool.portal_by_name("missing").is_none());

        assert!(pool.is_hidden_portal(2));
        assert_eq!(pool.hidden_portal_alpha(2), 0.0);
        assert!(!pool.is_hidden_portal_revealed(2));
    }

    #[test]
    fn test_non_hidden_portal_reads_as_revealed() {
        let pool = pool_with(vec![portal("a", PortalType::Visible, 0.0, 0.0)]);
        assert_eq!(pool.hidden_portal_alpha(0), 1.0);
        assert!(pool.is_hidden_portal_revealed(0));
        assert!(pool.hidden_portal_state(0).is_none());
    }

    #[test]
    fn test_start_point_fallbacks() {
        let typed = pool_with(vec![
            portal("sp", PortalType::Visible, 0.0, 0.0),
            portal("spawn", PortalType::StartPoint, 1.0, 0.0),
        ]);
        assert_eq!(typed.find_start_point(), Some(1));

        let named = pool_with(vec![
            portal("a", PortalType::Visible, 0.0, 0.0),
            portal("SP", PortalType::Visible, 1.0, 0.0),
        ]);
        assert_eq!(named.find_start_point(), Some(1));

        let first = pool_with(vec![portal("a", PortalType::Visible, 0.0, 0.0)]);
        assert_eq!(first.find_start_point(), Some(0));

        assert_eq!(PortalPool::default().find_start_point(), None);
    }

    #[test]
    fn test_hidden_portal_hysteresis() {
        let mut pool = pool_with(vec![portal("secret", PortalType::Hidden, 0.0, 0.0)]);
        let near = Vec2::new(10.0, 0.0);
        let far = Vec2::new(500.0, 0.0);

        pool.update(near, 0, 0.1);
        assert!(pool.is_hidden_portal_revealed(0));
        let events: Vec<_> = pool.drain_events().collect();
        assert!(matches!(events[..], [PortalEvent::HiddenRevealed { index: 0, .. }]));

        for tick in 1..=4 {
            pool.update(near, tick * 100, 0.1);
        }
        assert!((pool.hidden_portal_alpha(0) - 1.0).abs() < 1e-6);

        // Grace period counts from the last in-range tick (400)
        pool.update(far, 1_000, 0.1);
        pool.update(far, 2_400, 0.1);
        let state = pool.hidden_portal_state(0).cloned().unwrap();
        assert!(state.is_revealed);
        assert_eq!(state.target_alpha, 1.0);

        pool.update(far, 2_401, 0.1);
        assert_eq!(pool.hidden_portal_state(0).unwrap().target_alpha, 0.0);
        assert!(pool.is_hidden_portal_revealed(0));

        pool.update(far, 2_500, 0.1);
        pool.update(far, 2_600, 0.1);
        assert!(pool.is_hidden_portal_revealed(0));
        assert!(pool.events().is_empty());

        pool.update(far, 2_700, 0.1);
        assert!(!pool.is_hidden_portal_revealed(0));
        assert_eq!(pool.hidden_portal_alpha(0), 0.0);
        let events: Vec<_> = pool.drain_events().collect();
        assert!(matches!(events[..], [PortalEvent::HiddenHidden { index: 0, .. }]));
    }

    #[test]
    fn test_reentering_range_cancels_hide() {
        let mut pool = pool_with(vec![portal("secret", PortalType::Hidden, 0.0, 0.0)]);
        pool.update(Vec2::ZERO, 0, 1.0);
        pool.update(Vec2::new(500.0, 0.0), 3_000, 0.1);
        assert_eq!(pool.hidden_portal_state(0).unwrap().target_alpha, 0.0);

        pool.update(Vec2::ZERO, 3_100, 0.1);
        let state = pool.hidden_portal_state(0).unwrap();
        assert_eq!(state.target_alpha, 1.0);
        assert!(state.is_revealed);
        assert_eq!(
            pool.drain_events()
                .filter(|e| matches!(e, PortalEvent::HiddenRevealed { .. }))
                .count(),
            1
        );
    }

    #[test]
    fn test_set_hidden_portal_override() {
        let mut pool = pool_with(vec![
            portal("a", PortalType::Visible, 0.0, 0.0),
            portal("secret", PortalType::ScriptHidden, 0.0, 0.0),
        ]);

        assert!(!pool.set_hidden_portal(0, false, 0));
        assert!(pool.set_hidden_portal_by_name("SECRET", false, 10));
        assert!(pool.is_hidden_portal_revealed(1));
        assert_eq!(pool.hidden_portal_state(1).unwrap().revealed_time, 10);

        pool.update(Vec2::new(999.0, 0.0), 20, 1.0);
        assert_eq!(pool.hidden_portal_alpha(1), 1.0);

        assert!(pool.set_hidden_portal(1, true, 30));
        assert!(!pool.is_hidden_portal_revealed(1));
        assert_eq!(pool.hidden_portal_alpha(1), 0.0);

        let kinds: Vec<_> = pool.drain_events().collect();
        assert!(matches!(
            kinds[..],
            [PortalEvent::HiddenRevealed { index: 1, .. }, PortalEvent::HiddenHidden { index: 1, .. }]
        ));
    }

    #[test]
    fn test_portal_collision() {
        let mut pool = pool_with(vec![
            portal("sp", PortalType::StartPoint, 0.0, 0.0),
            portal("secret", PortalType::Hidden, 300.0, 0.0),
            portal("door", PortalType::Visible, 600.0, 0.0).with_ranges(20, 10),
        ]);

        assert_eq!(pool.check_portal_collision(Vec2::ZERO, None), None);
        assert_eq!(pool.check_portal_collision(Vec2::new(300.0, 0.0), None), None);

        pool.set_hidden_portal(1, false, 0);
        assert_eq!(pool.check_portal_collision(Vec2::new(340.0, 0.0), None), Some(1));
        assert_eq!(pool.check_portal_collision(Vec2::new(341.0, 0.0), None), None);

        // Head inside the vertical window
        assert_eq!(pool.check_portal_collision(Vec2::new(600.0, 70.0), None), Some(2));
        assert_eq!(pool.check_portal_collision(Vec2::new(600.0, 71.0), None), None);
        assert_eq!(pool.check_portal_collision(Vec2::new(600.0, -10.0), None), Some(2));
        assert_eq!(pool.check_portal_collision(Vec2::new(600.0, -11.0), None), None);
        assert_eq!(pool.check_portal_collision(Vec2::new(600.0, 20.0), Some(5.0)), None);
    }

    #[test]
    fn test_collision_portal_subtypes_only() {
        let pool = pool_with(vec![
            portal("plain", PortalType::Visible, 0.0, 0.0),
            portal("spring", PortalType::CollisionVerticalJump, 100.0, 0.0),
        ]);

        assert_eq!(pool.check_collision_portal(Vec2::ZERO), None);
        assert_eq!(pool.check_collision_portal(Vec2::new(130.0, 20.0)), Some(1));
        assert_eq!(pool.check_collision_portal(Vec2::new(130.0, 21.0)), None);
    }

    #[test]
    fn test_properties() {
        let pool = pool_with(vec![
            portal("bare", PortalType::Visible, 0.0, 0.0),
            portal("spring", PortalType::CollisionCustomImpact, 0.0, 0.0)
                .with_ranges(25, 45)
                .with_impact(120, -900),
        ]);

        assert_eq!(pool.prop_ph(0), 30);
        assert_eq!(pool.prop_psh(0), 0);
        assert_eq!(pool.prop_ph(1), 45);
        assert_eq!(pool.prop_pv(1), -900);
        assert_eq!(pool.prop_ph(7), 0);

        let props = pool.portal_properties_by_name("SPRING");
        assert_eq!(props.horizontal_range, 25);
        assert_eq!(props.horizontal_impact, 120);
        assert_eq!(props.special_height, -900);

        assert_eq!(pool.portal_properties(0).horizontal_range, 40);
        assert_eq!(pool.portal_properties(9), PortalProperties::default());
    }

    #[test]
    fn test_position_queries_and_stats() {
        let mut pool = pool_with(vec![
            portal("a", PortalType::Visible, 0.0, 0.0),
            portal("b", PortalType::Hidden, 30.0, 0.0),
            portal("c", PortalType::Default, 100.0, 0.0),
        ]);

        assert_eq!(pool.find_portal_at_position(Vec2::new(35.0, 0.0), None), Some(0));
        assert_eq!(pool.find_portal_at_position(Vec2::new(60.0, 0.0), Some(10.0)), None);
        assert_eq!(pool.portals_in_range(Vec2::new(50.0, 0.0), 50.0), vec![0, 1, 2]);
        assert_eq!(pool.find_portal_hidden(Vec2::ZERO, None), vec![1]);
        assert!(pool.find_portal_hidden(Vec2::ZERO, Some(10.0)).is_empty());

        assert!(pool.trigger_portal(2));
        assert!(!pool.trigger_portal(3));

        pool.update(Vec2::new(30.0, 0.0), 16, 0.016);
        let stats = pool.stats();
        assert_eq!(stats.total_portals, 3);
        assert_eq!(stats.visible_portals, 2);
        assert_eq!(stats.hidden_portals, 1);
        assert_eq!(stats.revealed_hidden_portals, 1);
        assert_eq!(pool.last_update(), 16);
    }

    #[test]
    fn test_clear() {
        let mut pool = pool_with(vec![portal("a", PortalType::Hidden, 0.0, 0.0)]);
        pool.clear();
        assert_eq!(pool.portal_count(), 0);
        assert!(pool.portal_index_by_name("a").is_none());
        assert!(!pool.is_hidden_portal(0));
    }
}
