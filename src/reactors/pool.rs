//! Reactor Pool
//!
//! Owns the map's reactor spawn points, the reactor currently standing at
//! each one and its activation state.
//!
//! # Design Principles
//!
//! - **Slot Addressed**: Spawn point, runtime data and entity share one index
//! - **Central Transitions**: Every state change goes through
//!   [`ReactorState::transition`]
//! - **Destroy Means Gone**: A destroyed reactor's spawn point is inactive
//!   until it respawns
//!
//! # Example
//!
//! ```ignore
//! let mut reactors = ReactorPool::new(ReactorPoolConfig::default());
//! reactors.initialize(map.reactors);
//! reactors.set_reactor_factory(|point| Some(Reactor::load(&point.reactor_id, point.position)));
//!
//! for index in reactors.find_touch_reactor_around_local_user(player_feet, None) {
//!     reactors.activate_reactor(index, player_id, now, ReactorActivationType::Touch);
//! }
//! reactors.update(now, dt);
//! ```

use glam::Vec2;
use rustc_hash::FxHashMap;
use serde::Serialize;
use smallvec::SmallVec;

use super::{
    HitResult, ReactorActivationType, ReactorEntity, ReactorId, ReactorPoolConfig,
    ReactorRuntimeData, ReactorState, ReactorTransition,
};
use crate::core::{EventQueue, Tick};
use crate::geometry::Rect;

type ReactorFactory<R> = Box<dyn FnMut(&ReactorSpawnPoint) -> Option<R>>;

// ============================================================================
// Spawn Points
// ============================================================================

/// Where a reactor stands and when it comes back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReactorSpawnPoint {
    pub spawn_id: usize,
    /// Reactor type id
    pub reactor_id: String,
    pub name: Option<String>,
    pub position: Vec2,
    pub flip: bool,
    pub respawn_time_ms: u64,

    pub is_active: bool,
    pub destroy_time: Tick,
    pub next_spawn_time: Tick,
    pub current_reactor: Option<ReactorId>,
}

// ============================================================================
// Events and Stats
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[non_exhaustive]
pub enum ReactorEvent {
    Spawned { index: usize, id: ReactorId },
    /// A player walked into a touch reactor
    Touched { index: usize, id: ReactorId, player_id: u32 },
    /// A hit landed, whether or not it reached the threshold
    Hit { index: usize, id: ReactorId, player_id: u32 },
    Activated { index: usize, id: ReactorId, player_id: u32 },
    /// `player_id` is `None` when the reactor faded out on its own
    Destroyed {
        index: usize,
        id: ReactorId,
        player_id: Option<u32>,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReactorPoolStats {
    pub total_reactors: usize,
    pub total_spawn_points: usize,
    pub idle_reactors: usize,
    /// Activated or Active
    pub active_reactors: usize,
    pub deactivating_reactors: usize,
    pub destroyed_reactors: usize,
    pub respawning_reactors: usize,
}

struct ReactorSlot<R> {
    spawn: ReactorSpawnPoint,
    data: ReactorRuntimeData,
    /// Kept across destruction so the same reactor can come back without a
    /// factory
    reactor: Option<R>,
}

// ============================================================================
// Reactor Pool
// ============================================================================

pub struct ReactorPool<R: ReactorEntity> {
    config: ReactorPoolConfig,
    slots: Vec<ReactorSlot<R>>,
    /// Lowercased name to slot indices
    names: FxHashMap<String, SmallVec<[usize; 4]>>,
    factory: Option<ReactorFactory<R>>,
    next_id: u32,
    last_update: Tick,
    respawn_enabled: bool,
    events: EventQueue<ReactorEvent>,
}

impl<R: ReactorEntity> ReactorPool<R> {
    #[must_use]
    pub fn new(config: ReactorPoolConfig) -> Self {
        Self {
            respawn_enabled: config.respawn_enabled,
            config,
            slots: Vec::new(),
            names: FxHashMap::default(),
            factory: None,
            next_id: 1,
            last_update: 0,
            events: EventQueue::new(),
        }
    }

    /// Register the reactors placed on the map, one spawn point each.
    pub fn initialize(&mut self, reactors: impl IntoIterator<Item = R>) {
        self.clear();

        for reactor in reactors {
            let index = self.slots.len();
            let id = self.next_reactor_id();
            let template = reactor.template();

            let spawn = ReactorSpawnPoint {
                spawn_id: index,
                reactor_id: template.reactor_id.clone(),
                name: template.name.clone(),
                position: reactor.position(),
                flip: template.flip,
                respawn_time_ms: template
                    .reactor_time
                    .filter(|&t| t > 0)
                    .unwrap_or(self.config.default_respawn_ms),
                is_active: true,
                destroy_time: 0,
                next_spawn_time: 0,
                current_reactor: Some(id),
            };

            self.index_name(spawn.name.as_deref(), index);
            self.slots.push(ReactorSlot {
                spawn,
                data: ReactorRuntimeData::new(id),
                reactor: Some(reactor),
            });
        }

        log::debug!("Reactor pool initialized with {} reactors", self.slots.len());
    }

    /// Builds reactors for spawn points that have none to reuse.
    pub fn set_reactor_factory<F>(&mut self, factory: F)
    where
        F: FnMut(&ReactorSpawnPoint) -> Option<R> + 'static,
    {
        self.factory = Some(Box::new(factory));
    }

    /// Drop every reactor and spawn point. The factory stays; ids keep counting.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.names.clear();
        self.events.clear();
    }

    fn next_reactor_id(&mut self) -> ReactorId {
        let id = ReactorId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1).max(1);
        id
    }

    fn index_name(&mut self, name: Option<&str>, index: usize) {
        if let Some(name) = name.filter(|n| !n.is_empty()) {
            self.names
                .entry(name.to_ascii_lowercase())
                .or_default()
                .push(index);
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[must_use]
    pub fn config(&self) -> &ReactorPoolConfig {
        &self.config
    }

    #[must_use]
    pub fn events(&self) -> &EventQueue<ReactorEvent> {
        &self.events
    }

    pub fn drain_events(&mut self) -> impl Iterator<Item = ReactorEvent> + '_ {
        self.events.drain()
    }

    #[must_use]
    pub const fn respawn_enabled(&self) -> bool {
        self.respawn_enabled
    }

    pub fn set_respawn_enabled(&mut self, enabled: bool) {
        self.respawn_enabled = enabled;
    }

    #[must_use]
    #[inline]
    pub const fn last_update(&self) -> Tick {
        self.last_update
    }

    /// Number of spawn slots, live or not
    #[must_use]
    #[inline]
    pub fn reactor_count(&self) -> usize {
        self.slots.len()
    }

    /// Reactors currently on the map
    #[must_use]
    pub fn active_reactor_count(&self) -> usize {
        self.slots.iter().filter(|s| s.data.state.is_present()).count()
    }

    #[must_use]
    pub fn spawn_point(&self, index: usize) -> Option<&ReactorSpawnPoint> {
        self.slots.get(index).map(|s| &s.spawn)
    }

    pub fn spawn_points(&self) -> impl Iterator<Item = &ReactorSpawnPoint> {
        self.slots.iter().map(|s| &s.spawn)
    }

    /// The reactor standing at `index`, if its spawn point is active.
    #[must_use]
    pub fn reactor(&self, index: usize) -> Option<&R> {
        self.slots
            .get(index)
            .filter(|s| s.spawn.is_active)
            .and_then(|s| s.reactor.as_ref())
    }

    pub fn reactor_mut(&mut self, index: usize) -> Option<&mut R> {
        self.slots
            .get_mut(index)
            .filter(|s| s.spawn.is_active)
            .and_then(|s| s.reactor.as_mut())
    }

    /// Active reactors with this name, case-insensitive.
    pub fn reactors_by_name(&self, name: &str) -> impl Iterator<Item = (usize, &R)> {
        self.names
            .get(&name.to_ascii_lowercase())
            .into_iter()
            .flatten()
            .filter_map(|&i| self.reactor(i).map(|r| (i, r)))
    }

    #[must_use]
    #[inline]
    pub fn reactor_data(&self, index: usize) -> Option<&ReactorRuntimeData> {
        self.slots.get(index).map(|s| &s.data)
    }

    /// Set how a reactor is triggered and how many hits it takes.
    pub fn configure_reactor(
        &mut self,
        index: usize,
        activation: ReactorActivationType,
        required_hits: u32,
        can_respawn: bool,
    ) -> bool {
        let Some(slot) = self.slots.get_mut(index) else {
            return false;
        };
        slot.data.activation_type = activation;
        slot.data.required_hits = required_hits.max(1);
        slot.data.can_respawn = can_respawn;
        true
    }

    // ========================================================================
    // Detection
    // ========================================================================

    fn present_reactors(&self) -> impl Iterator<Item = (usize, &ReactorSlot<R>, &R)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.spawn.is_active && s.data.state.is_present())
            .filter_map(|(i, s)| s.reactor.as_ref().map(|r| (i, s, r)))
    }

    /// First present reactor within `range` (default `detection_range`).
    #[must_use]
    pub fn find_reactor_at_position(&self, point: Vec2, range: Option<f32>) -> Option<usize> {
        let range = range.unwrap_or(self.config.detection_range);
        let range_sq = range * range;
        self.present_reactors()
            .find(|(_, _, r)| r.position().distance_squared(point) <= range_sq)
            .map(|(i, _, _)| i)
    }

    /// Idle touch reactors whose hitbox overlaps the player's.
    #[must_use]
    pub fn find_touch_reactor_around_local_user(
        &self,
        feet: Vec2,
        player_hitbox: Option<Vec2>,
    ) -> Vec<usize> {
        let size = player_hitbox.unwrap_or(self.config.player_hitbox);
        let player = Rect::standing_at(feet, size.x, size.y);

        self.present_reactors()
            .filter(|(_, s, _)| {
                s.data.state.can_be_touched()
                    && s.data.activation_type == ReactorActivationType::Touch
            })
            .filter(|(_, _, r)| player.intersects(&r.hitbox()))
            .map(|(i, _, _)| i)
            .collect()
    }

    /// Skill- or hit-activated reactors within `range` (default
    /// `skill_detection_range`).
    #[must_use]
    pub fn find_skill_reactor(&self, point: Vec2, range: Option<f32>) -> Vec<usize> {
        let range = range.unwrap_or(self.config.skill_detection_range);
        let range_sq = range * range;
        self.present_reactors()
            .filter(|(_, s, _)| s.data.activation_type.is_skill_activated())
            .filter(|(_, _, r)| r.position().distance_squared(point) <= range_sq)
            .map(|(i, _, _)| i)
            .collect()
    }

    // ========================================================================
    // State Changes
    // ========================================================================

    fn apply(&mut self, index: usize, transition: ReactorTransition, now: Tick) -> bool {
        let Some(slot) = self.slots.get_mut(index) else {
            return false;
        };
        if !slot.data.apply(transition, now) {
            return false;
        }
        if let Some(reactor) = slot.reactor.as_mut() {
            reactor.on_state_changed(slot.data.state, now);
        }
        log::trace!("Reactor slot {index} -> {:?}", slot.data.state);
        true
    }

    fn live_id(&self, index: usize) -> Option<ReactorId> {
        self.slots
            .get(index)
            .filter(|s| s.spawn.is_active && s.reactor.is_some())
            .map(|s| s.data.id)
    }

    /// Trigger an idle reactor.
    pub fn activate_reactor(
        &mut self,
        index: usize,
        player_id: u32,
        now: Tick,
        activation: ReactorActivationType,
    ) -> bool {
        let Some(id) = self.live_id(index) else {
            return false;
        };
        let can_activate = self.slots.get(index).is_some_and(|s| {
            s.data.state.transition(ReactorTransition::Activate).is_some()
        });
        if !can_activate {
            return false;
        }

        let cause = if activation == ReactorActivationType::Touch {
            ReactorEvent::Touched { index, id, player_id }
        } else {
            ReactorEvent::Hit { index, id, player_id }
        };
        self.events.push(cause);
        self.activate(index, player_id, now)
    }

    fn activate(&mut self, index: usize, player_id: u32, now: Tick) -> bool {
        let Some(id) = self.live_id(index) else {
            return false;
        };
        if !self.apply(index, ReactorTransition::Activate, now) {
            return false;
        }
        if let Some(slot) = self.slots.get_mut(index) {
            slot.data.activating_player_id = Some(player_id);
        }
        self.events
            .push(ReactorEvent::Activated { index, id, player_id });
        true
    }

    /// Land `damage` hits. Returns `true` when the hit threshold was reached
    /// and the reactor activated (from idle) or was destroyed (from active).
    pub fn hit_reactor(&mut self, index: usize, player_id: u32, now: Tick, damage: u32) -> bool {
        let Some(id) = self.live_id(index) else {
            return false;
        };
        let Some(slot) = self.slots.get_mut(index) else {
            return false;
        };

        let result = slot.data.register_hit(damage);
        if result == HitResult::Ignored {
            return false;
        }
        self.events.push(ReactorEvent::Hit { index, id, player_id });

        match result {
            HitResult::Triggered(ReactorTransition::Activate) => self.activate(index, player_id, now),
            HitResult::Triggered(_) => self.destroy_reactor(index, Some(player_id), now),
            _ => false,
        }
    }

    /// Start fading out an activated or active reactor.
    pub fn deactivate_reactor(&mut self, index: usize, now: Tick) -> bool {
        self.apply(index, ReactorTransition::Deactivate, now)
    }

    /// Take a present reactor off the map and schedule its respawn.
    pub fn destroy_reactor(&mut self, index: usize, player_id: Option<u32>, now: Tick) -> bool {
        self.destroy(index, player_id, now, ReactorTransition::Destroy)
    }

    fn destroy(
        &mut self,
        index: usize,
        player_id: Option<u32>,
        now: Tick,
        transition: ReactorTransition,
    ) -> bool {
        if !self.apply(index, transition, now) {
            return false;
        }
        let Some(slot) = self.slots.get_mut(index) else {
            return false;
        };

        let id = slot.data.id;
        slot.data.alpha = 0.0;
        slot.spawn.is_active = false;
        slot.spawn.destroy_time = now;
        slot.spawn.next_spawn_time = now.saturating_add(slot.spawn.respawn_time_ms);
        slot.spawn.current_reactor = None;
        let schedule = self.respawn_enabled && slot.data.can_respawn;

        self.events.push(ReactorEvent::Destroyed { index, id, player_id });
        log::debug!("Reactor {id} at slot {index} destroyed");

        if schedule {
            self.apply(index, ReactorTransition::ScheduleRespawn, now);
        }
        true
    }

    /// Put a present reactor back to idle with full alpha and no hits.
    pub fn reset_reactor(&mut self, index: usize, now: Tick) -> bool {
        self.apply(index, ReactorTransition::Reset, now)
    }

    // ========================================================================
    // Spawning
    // ========================================================================

    /// Bring back the reactor at an inactive spawn point right away.
    ///
    /// Uses the factory if one is set and it produces a reactor, otherwise
    /// reuses the destroyed one. Returns the new id.
    pub fn spawn_reactor(&mut self, index: usize, now: Tick) -> Option<ReactorId> {
        let slot = self.slots.get(index)?;
        if slot.spawn.is_active {
            return None;
        }

        let fresh = self.factory.as_mut().and_then(|f| f(&slot.spawn));
        let slot = self.slots.get_mut(index)?;
        if let Some(reactor) = fresh {
            slot.reactor = Some(reactor);
        }
        if slot.reactor.is_none() {
            return None;
        }

        if slot.data.state == ReactorState::Destroyed {
            slot.data.apply(ReactorTransition::ScheduleRespawn, now);
        }

        let id = self.next_reactor_id();
        let slot = self.slots.get_mut(index)?;
        slot.data.id = id;
        slot.spawn.is_active = true;
        slot.spawn.current_reactor = Some(id);
        self.apply(index, ReactorTransition::Respawn, now);

        self.events.push(ReactorEvent::Spawned { index, id });
        log::debug!("Reactor {id} spawned at slot {index}");
        Some(id)
    }

    /// Add new spawn points that fill on the next update. Needs a factory.
    pub fn spawn_reactors_at_positions(
        &mut self,
        reactor_id: &str,
        positions: &[Vec2],
        now: Tick,
    ) -> Vec<usize> {
        let mut indices = Vec::with_capacity(positions.len());

        for &position in positions {
            let index = self.slots.len();
            let name = format!("spawned_{reactor_id}_{index}");
            let mut data = ReactorRuntimeData::new(ReactorId::default());
            data.state = ReactorState::Respawning;
            data.state_start_time = now;

            self.index_name(Some(&name), index);
            self.slots.push(ReactorSlot {
                spawn: ReactorSpawnPoint {
                    spawn_id: index,
                    reactor_id: reactor_id.to_owned(),
                    name: Some(name),
                    position,
                    flip: false,
                    respawn_time_ms: self.config.default_respawn_ms,
                    is_active: false,
                    destroy_time: now,
                    next_spawn_time: now,
                    current_reactor: None,
                },
                data,
                reactor: None,
            });
            indices.push(index);
        }

        indices
    }

    // ========================================================================
    // Frame Update
    // ========================================================================

    /// Advance animations and fades, then run due respawns.
    pub fn update(&mut self, now: Tick, dt: f32) {
        self.last_update = now;
        let fade = self.config.fade_speed * dt;

        for index in 0..self.slots.len() {
            let slot = &mut self.slots[index];
            slot.data.state_frame = slot.data.state_frame.saturating_add(1);

            let state = slot.data.state;
            match state {
                ReactorState::Activated
                    if now.saturating_sub(slot.data.state_start_time)
                        >= self.config.activation_animation_ms =>
                {
                    self.apply(index, ReactorTransition::AnimationFinished, now);
                }
                ReactorState::Deactivating => {
                    slot.data.alpha = (slot.data.alpha - fade).max(0.0);
                    if slot.data.alpha <= 0.0 {
                        self.destroy(index, None, now, ReactorTransition::FadedOut);
                    }
                }
                _ => {}
            }
        }

        if !self.respawn_enabled {
            return;
        }
        for index in 0..self.slots.len() {
            let slot = &self.slots[index];
            // Destroyed while respawn was off
            if slot.data.state == ReactorState::Destroyed
                && slot.data.can_respawn
                && !slot.spawn.is_active
            {
                self.apply(index, ReactorTransition::ScheduleRespawn, now);
            }

            let slot = &self.slots[index];
            let due = slot.data.state == ReactorState::Respawning
                && !slot.spawn.is_active
                && now >= slot.spawn.next_spawn_time;

            if due && self.spawn_reactor(index, now).is_none() {
                log::trace!("Reactor slot {index} has nothing to respawn");
            }
        }
    }

    // ========================================================================
    // Rendering and Stats
    // ========================================================================

    /// Reactors to draw with their alpha.
    pub fn renderable_reactors(&self) -> impl Iterator<Item = (usize, &R, f32)> {
        self.present_reactors()
            .filter(|(_, s, _)| s.data.alpha > 0.0)
            .map(|(i, s, r)| (i, r, s.data.alpha))
    }

    /// Animation row and frame counter. `(0, 0)` for an unknown index.
    #[must_use]
    pub fn reactor_animation_state(&self, index: usize) -> (u8, u32) {
        self.slots.get(index).map_or((0, 0), |s| {
            (s.data.state.animation_index(), s.data.state_frame)
        })
    }

    #[must_use]
    pub fn stats(&self) -> ReactorPoolStats {
        let mut stats = ReactorPoolStats {
            total_reactors: self.slots.iter().filter(|s| s.reactor.is_some()).count(),
            total_spawn_points: self.slots.len(),
            ..Default::default()
        };

        for slot in &self.slots {
            match slot.data.state {
                ReactorState::Idle => stats.idle_reactors += 1,
                ReactorState::Activated | ReactorState::Active => stats.active_reactors += 1,
                ReactorState::Deactivating => stats.deactivating_reactors += 1,
                ReactorState::Destroyed => stats.destroyed_reactors += 1,
                ReactorState::Respawning => stats.respawning_reactors += 1,
            }
        }
        stats
    }
}

impl<R: ReactorEntity> Default for ReactorPool<R> {
    fn default() -> Self {
        Self::new(ReactorPoolConfig::default())
    }
}
