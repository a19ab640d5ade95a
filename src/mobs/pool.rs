//! Mob Pool
//!
//! Owns the map's mob spawn points and the mob currently alive at each one.
//!
//! # Design Principles
//!
//! - **Durable spawn points**: A spawn point is created once per placed mob and
//!   is never destroyed, only deactivated while its mob is dead
//! - **External construction**: Respawned mobs come from a caller-supplied
//!   factory; the pool never builds mobs itself
//! - **Routing, not authority**: Kill, controller, aggro and guided-arrow
//!   changes are forwarded to each mob's [`MobAi`]
//!
//! # Lifecycle
//!
//! ```text
//! active --(kill / ai reports dead)--> dying --(death animation done)--> removed
//!    ^                                                                     |
//!    +------------- factory(spawn point) at next_spawn_time ---------------+
//! ```

use glam::Vec2;
use rustc_hash::FxHashMap;
use serde::Serialize;
use smallvec::SmallVec;

use super::{MobAi, MobControllerType, MobDeathType, MobEntity, MobId, MobPoolConfig, PuppetInfo};
use crate::core::{EventQueue, Tick};

// ============================================================================
// Spawn Points
// ============================================================================

/// Where a mob lives and when it comes back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MobSpawnPoint {
    pub spawn_id: u32,
    /// Mob type id
    pub mob_type: String,
    pub name: Option<String>,
    pub position: Vec2,
    pub rx0_shift: i32,
    pub rx1_shift: i32,
    pub flip: bool,
    /// 0 never respawns
    pub respawn_time_ms: u64,
    pub is_boss: bool,

    pub is_active: bool,
    pub death_time: Tick,
    pub next_spawn_time: Tick,
    /// Mob currently alive at this point
    pub current_mob: Option<MobId>,
}

impl MobSpawnPoint {
    fn from_mob<M: MobEntity>(mob: &M, spawn_id: u32, default_respawn_ms: u64) -> Self {
        let template = mob.template();
        Self {
            spawn_id,
            mob_type: template.type_id.clone(),
            name: template.name.clone(),
            position: mob.spawn_position().unwrap_or(template.position),
            rx0_shift: template.rx0_shift,
            rx1_shift: template.rx1_shift,
            flip: template.flip,
            respawn_time_ms: template.mob_time.unwrap_or(default_respawn_ms),
            is_boss: template.is_boss,
            is_active: true,
            death_time: 0,
            next_spawn_time: 0,
            current_mob: None,
        }
    }
}

// ============================================================================
// Events and Stats
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub enum MobEvent {
    /// A mob was respawned at a spawn point
    Spawned { id: MobId, spawn_id: u32 },
    /// A mob started dying
    Died { id: MobId },
    /// A dead mob finished its death animation and left the pool
    Removed { id: MobId },
    /// Broadcast text for a boss spawn
    BossAnnouncement { message: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MobPoolStats {
    pub active_mobs: usize,
    pub dying_mobs: usize,
    pub total_spawn_points: usize,
    pub active_spawn_points: usize,
    pub boss_spawn_points: usize,
    pub active_bosses: usize,
}

/// A live, positioned mob with an AI, as visited by queries.
pub(super) struct LiveMob<'a, M: MobEntity> {
    pub id: MobId,
    pub mob: &'a M,
    pub ai: &'a M::Ai,
    pub position: Vec2,
}

// ============================================================================
// Mob Pool
// ============================================================================

/// Spawn points, live mobs and dying mobs of one map.
pub struct MobPool<M: MobEntity> {
    pub(super) config: MobPoolConfig,
    pub(super) mobs: FxHashMap<MobId, M>,
    pub(super) active: Vec<MobId>,
    dying: Vec<MobId>,
    spawn_points: Vec<MobSpawnPoint>,
    puppets: Vec<PuppetInfo>,
    next_id: u32,
    last_update: Tick,
    respawn_enabled: bool,
    boss_spawn_enabled: bool,
    events: EventQueue<MobEvent>,
}

impl<M: MobEntity> MobPool<M> {
    #[must_use]
    pub fn new(config: MobPoolConfig) -> Self {
        Self {
            respawn_enabled: config.respawn_enabled,
            boss_spawn_enabled: config.boss_spawn_enabled,
            config,
            mobs: FxHashMap::default(),
            active: Vec::new(),
            dying: Vec::new(),
            spawn_points: Vec::new(),
            puppets: Vec::new(),
            next_id: 1,
            last_update: 0,
            events: EventQueue::new(),
        }
    }

    /// Register the mobs placed on the map, one spawn point each.
    pub fn initialize(&mut self, mobs: impl IntoIterator<Item = M>) {
        self.clear();

        for mob in mobs {
            let id = self.next_mob_id();
            let mut point = MobSpawnPoint::from_mob(&mob, id.raw(), self.config.default_respawn_ms);
            point.current_mob = Some(id);

            self.mobs.insert(id, mob);
            self.active.push(id);
            self.spawn_points.push(point);
        }

        log::debug!("Mob pool initialized with {} spawn points", self.spawn_points.len());
    }

    /// Drop every mob, spawn point and puppet. Ids keep counting.
    pub fn clear(&mut self) {
        self.mobs.clear();
        self.active.clear();
        self.dying.clear();
        self.spawn_points.clear();
        self.puppets.clear();
        self.events.clear();
    }

    fn next_mob_id(&mut self) -> MobId {
        let id = MobId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1).max(1);
        id
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[must_use]
    pub fn config(&self) -> &MobPoolConfig {
        &self.config
    }

    #[must_use]
    pub fn active_mob_count(&self) -> usize {
        self.active.len()
    }

    #[must_use]
    pub fn dying_mob_count(&self) -> usize {
        self.dying.len()
    }

    #[must_use]
    pub fn total_mob_count(&self) -> usize {
        self.active.len() + self.dying.len()
    }

    #[must_use]
    pub fn spawn_point_count(&self) -> usize {
        self.spawn_points.len()
    }

    #[must_use]
    pub const fn respawn_enabled(&self) -> bool {
        self.respawn_enabled
    }

    pub fn set_respawn_enabled(&mut self, enabled: bool) {
        self.respawn_enabled = enabled;
    }

    #[must_use]
    pub const fn boss_spawn_enabled(&self) -> bool {
        self.boss_spawn_enabled
    }

    pub fn set_boss_spawn_enabled(&mut self, enabled: bool) {
        self.boss_spawn_enabled = enabled;
    }

    #[must_use]
    pub const fn last_update(&self) -> Tick {
        self.last_update
    }

    #[must_use]
    pub fn spawn_points(&self) -> &[MobSpawnPoint] {
        &self.spawn_points
    }

    #[must_use]
    pub fn events(&self) -> &EventQueue<MobEvent> {
        &self.events
    }

    pub fn drain_events(&mut self) -> impl Iterator<Item = MobEvent> + '_ {
        self.events.drain()
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    #[must_use]
    #[inline]
    pub fn mob(&self, id: MobId) -> Option<&M> {
        self.mobs.get(&id)
    }

    #[inline]
    pub fn mob_mut(&mut self, id: MobId) -> Option<&mut M> {
        self.mobs.get_mut(&id)
    }

    /// Whether `id` is alive (not dying or removed)
    #[must_use]
    pub fn is_active(&self, id: MobId) -> bool {
        self.active.contains(&id)
    }

    pub fn active_mobs(&self) -> impl Iterator<Item = (MobId, &M)> {
        self.active
            .iter()
            .filter_map(|&id| self.mobs.get(&id).map(|mob| (id, mob)))
    }

    pub fn dying_mobs(&self) -> impl Iterator<Item = (MobId, &M)> {
        self.dying
            .iter()
            .filter_map(|&id| self.mobs.get(&id).map(|mob| (id, mob)))
    }

    /// Active mobs first, then dying ones still playing their death animation.
    pub fn renderable_mobs(&self) -> impl Iterator<Item = (MobId, &M)> {
        self.active_mobs().chain(self.dying_mobs())
    }

    /// Active, not dead, with an AI and a position.
    pub(super) fn live_mobs(&self) -> impl Iterator<Item = LiveMob<'_, M>> {
        self.active.iter().filter_map(|&id| {
            let mob = self.mobs.get(&id)?;
            let ai = mob.ai().filter(|ai| !ai.is_dead())?;
            let position = mob.position()?;
            Some(LiveMob {
                id,
                mob,
                ai,
                position,
            })
        })
    }

    #[must_use]
    pub fn mobs_by_type(&self, type_id: &str) -> Vec<MobId> {
        self.active_mobs()
            .filter(|(_, mob)| mob.template().type_id == type_id)
            .map(|(id, _)| id)
            .collect()
    }

    /// Active mobs within `radius` of `center`, edge included.
    #[must_use]
    pub fn mobs_in_radius(&self, center: Vec2, radius: f32) -> Vec<MobId> {
        let radius_sq = radius * radius;
        self.active_mobs()
            .filter(|(_, mob)| {
                mob.position()
                    .is_some_and(|pos| pos.distance_squared(center) <= radius_sq)
            })
            .map(|(id, _)| id)
            .collect()
    }

    /// Closest active mob strictly inside `max_radius`, unbounded when `None`.
    #[must_use]
    pub fn closest_mob(&self, point: Vec2, max_radius: Option<f32>) -> Option<MobId> {
        let mut best = None;
        let mut best_dist = max_radius.map_or(f32::INFINITY, |r| r * r);
        for (id, mob) in self.active_mobs() {
            let Some(pos) = mob.position() else {
                continue;
            };
            let dist = pos.distance_squared(point);
            if dist < best_dist {
                best_dist = dist;
                best = Some(id);
            }
        }
        best
    }

    #[must_use]
    pub fn has_active_boss(&self) -> bool {
        self.active_mobs()
            .any(|(_, mob)| mob.ai().is_some_and(MobAi::is_boss))
    }

    #[must_use]
    pub fn active_bosses(&self) -> Vec<MobId> {
        self.active_mobs()
            .filter(|(_, mob)| mob.ai().is_some_and(MobAi::is_boss))
            .map(|(id, _)| id)
            .collect()
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Start killing an active mob. Returns false if `id` is not active.
    pub fn kill_mob(&mut self, id: MobId, death_type: MobDeathType) -> bool {
        let Some(index) = self.active.iter().position(|&active| active == id) else {
            return false;
        };
        self.active.remove(index);
        self.dying.push(id);

        let now = self.last_update;
        if let Some(ai) = self.mobs.get_mut(&id).and_then(|mob| mob.ai_mut()) {
            ai.kill(now, death_type);
        }
        self.mark_spawn_point_dead(id, now);

        log::debug!("Killed {id} ({death_type:?})");
        self.events.push(MobEvent::Died { id });
        true
    }

    /// Kill every active mob, e.g. for a map clear.
    pub fn kill_all_mobs(&mut self, death_type: MobDeathType) -> usize {
        let targets = self.active.clone();
        targets
            .into_iter()
            .filter(|&id| self.kill_mob(id, death_type))
            .count()
    }

    fn mark_spawn_point_dead(&mut self, id: MobId, now: Tick) {
        let delay = self.config.death_animation_ms;
        if let Some(point) = self
            .spawn_points
            .iter_mut()
            .find(|point| point.current_mob == Some(id))
        {
            point.is_active = false;
            point.death_time = now;
            point.next_spawn_time = now
                .saturating_add(delay)
                .saturating_add(point.respawn_time_ms);
            point.current_mob = None;
        }
    }

    /// Advance one tick: collect mobs the AI reports dead, remove mobs whose
    /// death animation finished, then respawn ready spawn points.
    ///
    /// `factory` builds the mob for a spawn point; returning `None` skips it
    /// until the next tick.
    pub fn update<F>(&mut self, now: Tick, mut factory: F)
    where
        F: FnMut(&MobSpawnPoint) -> Option<M>,
    {
        self.last_update = now;

        let mobs = &self.mobs;
        let mut newly_dead: SmallVec<[MobId; 8]> = SmallVec::new();
        self.active.retain(|id| {
            let dead = mobs
                .get(id)
                .and_then(|mob| mob.ai())
                .is_some_and(MobAi::is_dead);
            if dead {
                newly_dead.push(*id);
            }
            !dead
        });
        for id in newly_dead {
            self.dying.push(id);
            self.mark_spawn_point_dead(id, now);
            log::debug!("{id} died");
            self.events.push(MobEvent::Died { id });
        }

        let mut finished: SmallVec<[MobId; 8]> = SmallVec::new();
        for &id in &self.dying {
            let Some(mob) = self.mobs.get_mut(&id) else {
                finished.push(id);
                continue;
            };
            let animation_done = mob.is_death_animation_complete();
            match mob.ai_mut() {
                None => finished.push(id),
                Some(ai) if animation_done => {
                    if !ai.is_removed() {
                        ai.mark_removed(now);
                    }
                    finished.push(id);
                }
                Some(_) => {}
            }
        }
        for id in finished {
            self.remove_mob(id);
        }

        if self.respawn_enabled {
            for index in 0..self.spawn_points.len() {
                let point = &self.spawn_points[index];
                if point.is_active || point.respawn_time_ms == 0 || now < point.next_spawn_time {
                    continue;
                }
                self.spawn_at_point(index, &mut factory);
            }
        }
    }

    fn remove_mob(&mut self, id: MobId) {
        self.dying.retain(|&dying| dying != id);
        if self.mobs.remove(&id).is_some() {
            log::trace!("Removed {id}");
            self.events.push(MobEvent::Removed { id });
        }
    }

    fn spawn_at_point<F>(&mut self, index: usize, factory: &mut F) -> Option<MobId>
    where
        F: FnMut(&MobSpawnPoint) -> Option<M>,
    {
        let point = self.spawn_points.get(index)?;
        if point.is_boss && !self.boss_spawn_enabled {
            return None;
        }

        let mob = factory(point)?;
        let spawn_id = point.spawn_id;
        let announcement = point.is_boss.then(|| {
            let name = mob.template().name.as_deref().unwrap_or("Boss");
            format!("{name} has appeared!")
        });

        let id = self.next_mob_id();
        self.mobs.insert(id, mob);
        self.active.push(id);

        let point = &mut self.spawn_points[index];
        point.current_mob = Some(id);
        point.is_active = true;

        log::debug!("Respawned {id} at spawn point {spawn_id}");
        self.events.push(MobEvent::Spawned { id, spawn_id });
        if let Some(message) = announcement {
            log::info!("{message}");
            self.events.push(MobEvent::BossAnnouncement { message });
        }
        Some(id)
    }

    /// Respawn every dead spawn point now, ignoring timers.
    pub fn force_respawn_all<F>(&mut self, mut factory: F) -> usize
    where
        F: FnMut(&MobSpawnPoint) -> Option<M>,
    {
        let mut spawned = 0;
        for index in 0..self.spawn_points.len() {
            let point = &self.spawn_points[index];
            if point.is_active || point.respawn_time_ms == 0 {
                continue;
            }
            if self.spawn_at_point(index, &mut factory).is_some() {
                spawned += 1;
            }
        }
        spawned
    }

    /// Override the respawn delay of every non-boss spawn point.
    pub fn set_global_respawn_time(&mut self, respawn_ms: u64) {
        for point in self.spawn_points.iter_mut().filter(|point| !point.is_boss) {
            point.respawn_time_ms = respawn_ms;
        }
    }

    #[must_use]
    pub fn stats(&self) -> MobPoolStats {
        MobPoolStats {
            active_mobs: self.active.len(),
            dying_mobs: self.dying.len(),
            total_spawn_points: self.spawn_points.len(),
            active_spawn_points: self.spawn_points.iter().filter(|p| p.is_active).count(),
            boss_spawn_points: self.spawn_points.iter().filter(|p| p.is_boss).count(),
            active_bosses: self.active_bosses().len(),
        }
    }

    // ========================================================================
    // Puppets
    // ========================================================================

    /// Register a summon that draws aggro, replacing one with the same id.
    pub fn register_puppet(&mut self, puppet: PuppetInfo) {
        self.puppets.retain(|p| p.object_id != puppet.object_id);
        self.puppets.push(puppet);
    }

    pub fn remove_puppet(&mut self, object_id: u32) {
        self.puppets.retain(|p| p.object_id != object_id);
    }

    pub fn clear_puppets(&mut self) {
        self.puppets.clear();
    }

    /// Drop inactive and expired puppets.
    pub fn update_puppets(&mut self, now: Tick) {
        self.puppets.retain(|p| !p.is_expired(now));
    }

    #[must_use]
    pub fn active_puppets(&self) -> &[PuppetInfo] {
        &self.puppets
    }

    /// Point the aggro range of every live mob near a puppet at it.
    ///
    /// Returns how many mobs were affected. Pathing is left to the AI.
    pub fn let_mob_chase_puppet(&mut self, puppet_position: Vec2, aggro_range: f32, puppet_id: u32) -> usize {
        let range_sq = aggro_range * aggro_range;
        let mut count = 0;

        for id in &self.active {
            let Some(mob) = self.mobs.get_mut(id) else {
                continue;
            };
            let Some(position) = mob.position() else {
                continue;
            };
            let Some(ai) = mob.ai_mut().filter(|ai| !ai.is_dead()) else {
                continue;
            };
            if position.distance_squared(puppet_position) <= range_sq {
                ai.set_aggro_range(aggro_range);
                count += 1;
            }
        }

        log::trace!("{count} mobs chasing puppet {puppet_id}");
        count
    }

    // ========================================================================
    // Controllers
    // ========================================================================

    fn ai_mut(&mut self, id: MobId) -> Option<&mut M::Ai> {
        self.mobs.get_mut(&id).and_then(|mob| mob.ai_mut())
    }

    /// Hand control of a mob to this client.
    pub fn set_local_mob(&mut self, id: MobId, controller_id: u32) -> bool {
        let now = self.last_update;
        self.on_mob_change_controller(id, MobControllerType::Local, controller_id, now)
    }

    /// Hand control of a mob to another client.
    pub fn set_remote_mob(&mut self, id: MobId, controller_id: u32) -> bool {
        let now = self.last_update;
        self.on_mob_change_controller(id, MobControllerType::Remote, controller_id, now)
    }

    pub fn on_mob_change_controller(
        &mut self,
        id: MobId,
        kind: MobControllerType,
        controller_id: u32,
        now: Tick,
    ) -> bool {
        match self.ai_mut(id) {
            Some(ai) => {
                ai.change_controller(kind, controller_id, now);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn locally_controlled_mobs(&self) -> Vec<MobId> {
        self.active_mobs()
            .filter(|(_, mob)| {
                mob.ai()
                    .is_some_and(|ai| ai.controller_type() == MobControllerType::Local)
            })
            .map(|(id, _)| id)
            .collect()
    }

    #[must_use]
    pub fn mobs_controlled_by(&self, controller_id: u32) -> Vec<MobId> {
        self.active_mobs()
            .filter(|(_, mob)| {
                mob.ai()
                    .is_some_and(|ai| ai.controller_type() != MobControllerType::None
                        && ai.controller_id() == controller_id)
            })
            .map(|(id, _)| id)
            .collect()
    }

    // ========================================================================
    // Guided Arrow
    // ========================================================================

    /// Clear guided-arrow marks for `target_id`, or all marks when `None`.
    pub fn reset_guided_mob(&mut self, target_id: Option<u32>) {
        for id in &self.active {
            let Some(ai) = self.mobs.get_mut(id).and_then(|mob| mob.ai_mut()) else {
                continue;
            };
            if target_id.is_none_or(|target| ai.is_guided_by(target)) {
                ai.reset_guided();
            }
        }
    }

    pub fn set_guided_mob(&mut self, id: MobId, target_id: u32) -> bool {
        match self.ai_mut(id) {
            Some(ai) => {
                ai.set_guided(target_id);
                true
            }
            None => false,
        }
    }

    /// First active mob marked by `target_id`.
    #[must_use]
    pub fn guided_mob(&self, target_id: u32) -> Option<MobId> {
        self.active_mobs()
            .find(|(_, mob)| mob.ai().is_some_and(|ai| ai.is_guided_by(target_id)))
            .map(|(id, _)| id)
    }
}

impl<M: MobEntity> Default for MobPool<M> {
    fn default() -> Self {
        Self::new(MobPoolConfig::default())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mobs::MobTemplate;
    use crate::mobs::testing::TestMob;

    fn respawn_factory(point: &MobSpawnPoint) -> Option<TestMob> {
        let mut mob = TestMob::at(point.position.x, point.position.y);
        mob.template.is_boss = point.is_boss;
        mob.template.name = point.name.clone();
        Some(mob)
    }

    fn no_factory(_: &MobSpawnPoint) -> Option<TestMob> {
        None
    }

    fn pool_with(mobs: Vec<TestMob>) -> MobPool<TestMob> {
        let mut pool = MobPool::new(MobPoolConfig::default());
        pool.initialize(mobs);
        pool
    }

    #[test]
    fn test_initialize_creates_spawn_points() {
        let mob = TestMob::at(0.0, 0.0)
            .with_template(MobTemplate::new("0100100", Vec2::new(5.0, 6.0)).with_mob_time(3_000));
        let pool = pool_with(vec![mob, TestMob::at(100.0, 0.0)]);

        assert_eq!(pool.active_mob_count(), 2);
        assert_eq!(pool.spawn_point_count(), 2);
        let points = pool.spawn_points();
        assert_eq!(points[0].position, Vec2::new(5.0, 6.0));
        assert_eq!(points[0].respawn_time_ms, 3_000);
        assert_eq!(points[1].respawn_time_ms, 7_000);
        assert!(points.iter().all(|p| p.is_active && p.current_mob.is_some()));
    }

    #[test]
    fn test_kill_schedules_respawn() {
        let mut pool = pool_with(vec![TestMob::at(0.0, 0.0)]);
        pool.update(1_000, no_factory);
        let id = MobId(1);

        assert!(pool.kill_mob(id, MobDeathType::Bomb));
        assert!(!pool.kill_mob(id, MobDeathType::Bomb), "Already dying");
        assert_eq!(pool.dying_mob_count(), 1);

        let ai = pool.mob(id).and_then(|m| m.ai()).unwrap();
        assert_eq!(ai.death, Some((1_000, MobDeathType::Bomb)));

        let point = &pool.spawn_points()[0];
        assert!(!point.is_active);
        assert_eq!(point.death_time, 1_000);
        assert_eq!(point.next_spawn_time, 1_000 + 2_000 + 7_000);
        assert_eq!(point.current_mob, None);
        assert_eq!(pool.drain_events().collect::<Vec<_>>(), vec![MobEvent::Died { id }]);
    }

    #[test]
    fn test_ai_reported_death_detected_on_update() {
        let mut pool = pool_with(vec![TestMob::at(0.0, 0.0), TestMob::at(50.0, 0.0)]);
        if let Some(ai) = pool.mob_mut(MobId(2)).and_then(|m| m.ai_mut()) {
            ai.dead = true;
        }
        pool.update(500, no_factory);

        assert_eq!(pool.active_mob_count(), 1);
        assert_eq!(pool.dying_mob_count(), 1);
        assert_eq!(pool.spawn_points()[1].next_spawn_time, 9_500);
    }

    #[test]
    fn test_death_animation_then_removal() {
        let mut pool = pool_with(vec![TestMob::at(0.0, 0.0)]);
        let id = MobId(1);
        pool.kill_mob(id, MobDeathType::Killed);

        pool.update(100, no_factory);
        assert_eq!(pool.dying_mob_count(), 1, "Animation still playing");
        assert_eq!(pool.renderable_mobs().count(), 1);

        if let Some(mob) = pool.mob_mut(id) {
            mob.death_animation_done = true;
        }
        pool.update(200, no_factory);

        assert!(pool.mob(id).is_none());
        assert_eq!(pool.total_mob_count(), 0);
        assert!(pool.events().iter().any(|e| *e == MobEvent::Removed { id }));
    }

    #[test]
    fn test_mob_without_ai_removed_immediately() {
        let mut pool = pool_with(vec![TestMob::at(0.0, 0.0)]);
        let id = MobId(1);
        pool.kill_mob(id, MobDeathType::Killed);
        if let Some(mob) = pool.mob_mut(id) {
            mob.ai = None;
        }
        pool.update(10, no_factory);
        assert!(pool.mob(id).is_none());
    }

    #[test]
    fn test_respawn_at_next_spawn_time_with_fresh_id() {
        let mut pool = pool_with(vec![TestMob::at(30.0, 0.0)]);
        pool.kill_mob(MobId(1), MobDeathType::Killed);

        pool.update(8_999, respawn_factory);
        assert_eq!(pool.active_mob_count(), 0);

        pool.update(9_000, respawn_factory);
        assert_eq!(pool.active_mob_count(), 1);
        let point = &pool.spawn_points()[0];
        assert!(point.is_active);
        assert_eq!(point.current_mob, Some(MobId(2)));
        assert!(pool.events().iter().any(|e| *e == MobEvent::Spawned { id: MobId(2), spawn_id: 1 }));
    }

    #[test]
    fn test_factory_returning_none_retries() {
        let mut pool = pool_with(vec![TestMob::at(0.0, 0.0)]);
        pool.kill_mob(MobId(1), MobDeathType::Killed);

        pool.update(10_000, no_factory);
        assert!(!pool.spawn_points()[0].is_active);
        pool.update(10_016, respawn_factory);
        assert!(pool.spawn_points()[0].is_active);
    }

    #[test]
    fn test_zero_respawn_time_never_respawns() {
        let mob = TestMob::at(0.0, 0.0)
            .with_template(MobTemplate::new("0100100", Vec2::ZERO).with_mob_time(0));
        let mut pool = pool_with(vec![mob]);
        pool.kill_mob(MobId(1), MobDeathType::Killed);

        pool.update(1_000_000, respawn_factory);
        assert_eq!(pool.force_respawn_all(respawn_factory), 0);
        assert_eq!(pool.active_mob_count(), 0);
    }

    #[test]
    fn test_respawn_disabled() {
        let mut pool = pool_with(vec![TestMob::at(0.0, 0.0)]);
        pool.set_respawn_enabled(false);
        pool.kill_mob(MobId(1), MobDeathType::Killed);

        pool.update(100_000, respawn_factory);
        assert_eq!(pool.active_mob_count(), 0);
    }

    #[test]
    fn test_boss_announcement() {
        let boss = TestMob::at(0.0, 0.0)
            .boss(120, "Zakum")
            .with_template(
                MobTemplate::new("8800000", Vec2::ZERO)
                    .with_name("Zakum")
                    .with_mob_time(1_000)
                    .boss(),
            );
        let mut pool = pool_with(vec![boss]);
        pool.kill_mob(MobId(1), MobDeathType::Killed);
        pool.drain_events().for_each(drop);

        pool.update(3_000, respawn_factory);
        let events: Vec<_> = pool.drain_events().collect();
        assert_eq!(
            events,
            vec![
                MobEvent::Spawned { id: MobId(2), spawn_id: 1 },
                MobEvent::BossAnnouncement {
                    message: "Zakum has appeared!".to_owned()
                },
            ]
        );
    }

    #[test]
    fn test_boss_spawn_disabled() {
        let boss = TestMob::at(0.0, 0.0)
            .with_template(MobTemplate::new("8800000", Vec2::ZERO).with_mob_time(1_000).boss());
        let mut pool = MobPool::new(MobPoolConfig::default().with_boss_spawn_enabled(false));
        pool.initialize(vec![boss]);
        pool.kill_mob(MobId(1), MobDeathType::Killed);

        pool.update(10_000, respawn_factory);
        assert_eq!(pool.force_respawn_all(respawn_factory), 0);

        pool.set_boss_spawn_enabled(true);
        pool.update(10_016, |_: &MobSpawnPoint| Some(TestMob::at(0.0, 0.0)));
        assert!(
            pool.events().iter().any(|e| *e == MobEvent::BossAnnouncement {
                message: "Boss has appeared!".to_owned()
            }),
            "Unnamed bosses use a generic name"
        );
    }

    #[test]
    fn test_global_respawn_time_skips_bosses() {
        let boss = TestMob::at(0.0, 0.0)
            .with_template(MobTemplate::new("8800000", Vec2::ZERO).with_mob_time(60_000).boss());
        let mut pool = pool_with(vec![boss, TestMob::at(10.0, 0.0)]);
        pool.set_global_respawn_time(1_500);

        assert_eq!(pool.spawn_points()[0].respawn_time_ms, 60_000);
        assert_eq!(pool.spawn_points()[1].respawn_time_ms, 1_500);
    }

    #[test]
    fn test_kill_all_and_force_respawn() {
        let mut pool = pool_with(vec![TestMob::at(0.0, 0.0), TestMob::at(10.0, 0.0)]);
        assert_eq!(pool.kill_all_mobs(MobDeathType::Timeout), 2);
        assert_eq!(pool.stats().active_spawn_points, 0);

        assert_eq!(pool.force_respawn_all(respawn_factory), 2);
        let stats = pool.stats();
        assert_eq!(stats.active_mobs, 2);
        assert_eq!(stats.dying_mobs, 2);
        assert_eq!(stats.active_spawn_points, 2);
    }

    #[test]
    fn test_ids_not_reused_after_clear() {
        let mut pool = pool_with(vec![TestMob::at(0.0, 0.0)]);
        pool.initialize(vec![TestMob::at(0.0, 0.0)]);

        assert!(pool.mob(MobId(1)).is_none());
        assert!(pool.mob(MobId(2)).is_some());
    }

    #[test]
    fn test_lookup_queries() {
        let boss = TestMob::at(300.0, 0.0).boss(50, "Mano");
        let mut slime = TestMob::at(40.0, 0.0);
        slime.template.type_id = "0210100".to_owned();
        let pool = pool_with(vec![TestMob::at(0.0, 0.0), slime, boss]);

        assert_eq!(pool.mobs_by_type("0210100"), vec![MobId(2)]);
        assert_eq!(pool.mobs_in_radius(Vec2::ZERO, 40.0), vec![MobId(1), MobId(2)]);
        assert_eq!(pool.closest_mob(Vec2::new(35.0, 0.0), None), Some(MobId(2)));
        assert_eq!(pool.closest_mob(Vec2::new(1000.0, 0.0), Some(100.0)), None);
        assert!(pool.has_active_boss());
        assert_eq!(pool.active_bosses(), vec![MobId(3)]);
        assert_eq!(pool.stats().active_bosses, 1);
    }

    #[test]
    fn test_puppets() {
        let far = TestMob::at(500.0, 0.0);
        let dead = TestMob::at(10.0, 0.0).with_ai(|ai| ai.dead = true);
        let mut pool = pool_with(vec![TestMob::at(20.0, 0.0), far, dead]);

        pool.register_puppet(PuppetInfo::new(7, Vec2::ZERO, 1).expiring_at(5_000));
        pool.register_puppet(PuppetInfo::new(7, Vec2::new(5.0, 0.0), 1));
        assert_eq!(pool.active_puppets().len(), 1);

        assert_eq!(pool.let_mob_chase_puppet(Vec2::ZERO, 100.0, 7), 1);
        let ai = pool.mob(MobId(1)).and_then(|m| m.ai()).unwrap();
        assert_eq!(ai.aggro_range, Some(100.0));

        pool.register_puppet(PuppetInfo::new(8, Vec2::ZERO, 1).expiring_at(5_000));
        pool.update_puppets(5_000);
        assert_eq!(pool.active_puppets().len(), 1);
        pool.remove_puppet(7);
        assert!(pool.active_puppets().is_empty());
    }

    #[test]
    fn test_controllers() {
        let mut pool = pool_with(vec![TestMob::at(0.0, 0.0), TestMob::at(10.0, 0.0)]);

        assert!(pool.set_local_mob(MobId(1), 42));
        assert!(pool.set_remote_mob(MobId(2), 43));
        assert!(!pool.set_local_mob(MobId(99), 42));

        assert_eq!(pool.locally_controlled_mobs(), vec![MobId(1)]);
        assert_eq!(pool.mobs_controlled_by(43), vec![MobId(2)]);

        pool.on_mob_change_controller(MobId(2), MobControllerType::Local, 42, 100);
        assert_eq!(pool.mobs_controlled_by(42), vec![MobId(1), MobId(2)]);
    }

    #[test]
    fn test_guided_arrow() {
        let mut pool = pool_with(vec![TestMob::at(0.0, 0.0), TestMob::at(10.0, 0.0)]);
        pool.set_guided_mob(MobId(2), 3101005);
        pool.set_guided_mob(MobId(1), 1);

        assert_eq!(pool.guided_mob(3101005), Some(MobId(2)));

        pool.reset_guided_mob(Some(3101005));
        assert_eq!(pool.guided_mob(3101005), None);
        assert_eq!(pool.guided_mob(1), Some(MobId(1)));

        pool.reset_guided_mob(None);
        assert_eq!(pool.guided_mob(1), None);
    }
}
