//! Drop Pool
//!
//! Owns every item and meso drop on the map, from the moment a mob dies to
//! the moment the drop is picked up, stolen, exploded or fades away.
//!
//! # Design Principles
//!
//! - **Stable Ids**: `DropId`s increase monotonically and are never reused
//! - **Bounded**: At `max_drops` the oldest drop is evicted, never the new one
//! - **Recycled**: Drop records go back to an [`ObjectPool`] on removal
//! - **Observable**: Every lifecycle step is pushed as a [`DropEvent`]
//!
//! # Example
//!
//! ```ignore
//! let mut drops = DropPool::new(DropPoolConfig::default());
//! drops.set_ground_lookup(|pos| footholds.ground_below(pos));
//!
//! let ids = drops.spawn_drops_from_mob(mob_pos, now, Some(player), 150, &loot);
//! drops.update(now, dt);
//! drops.try_pickup_closest(player_pos, player, now, 40.0);
//! ```

use glam::Vec2;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use smallvec::SmallVec;

use super::{
    DropExceptionEntry, DropFilter, DropId, DropItem, DropPoolConfig, DropState, DropType,
    GlowColor, PetDropTarget, PickupHistory, RecentPickupRecord,
};
use crate::core::rng::{self, SimRng};
use crate::core::{EventQueue, Tick};
use crate::geometry::Rect;
use crate::pool::ObjectPool;

type GroundLookup = Box<dyn Fn(Vec2) -> f32>;

// ============================================================================
// Events
// ============================================================================

/// Something that happened to a drop.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[non_exhaustive]
pub enum DropEvent {
    /// A drop was created
    Spawned {
        id: DropId,
        drop_type: DropType,
        position: Vec2,
    },
    /// A player (or a pet on their behalf) started picking up a drop
    PickedUp { id: DropId, picker_id: u32 },
    /// A pet looted a drop
    PetPickedUp { id: DropId, pet_id: u32 },
    /// A pet was assigned a new drop to chase
    PetStartChasing { pet_id: u32, id: DropId },
    /// A mob stole a drop
    MobPickedUp { id: DropId, mob_id: u32 },
    /// Someone other than the trap owner picked up a booby-trapped drop
    BoobyTrapTriggered {
        id: DropId,
        trap_owner_id: u32,
        picker_id: u32,
    },
    /// A drop faded out without being picked up
    Expired { id: DropId },
    /// A drop left the pool; its id is retired
    Removed { id: DropId },
}

// ============================================================================
// Supporting Types
// ============================================================================

/// One item in a mob's loot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LootEntry {
    pub item_id: String,
    pub quantity: u32,
    pub is_rare: bool,
}

impl LootEntry {
    #[must_use]
    pub fn new(item_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            item_id: item_id.into(),
            quantity,
            is_rare: false,
        }
    }

    /// Mark as rare
    #[must_use]
    pub fn rare(mut self) -> Self {
        self.is_rare = true;
        self
    }
}

/// Snapshot counts for debug overlays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DropPoolStats {
    pub total_drops: usize,
    pub idle_drops: usize,
    /// Falling or bouncing
    pub falling_drops: usize,
    pub total_mesos: u64,
}

// ============================================================================
// Drop Pool
// ============================================================================

/// Manages item drops, their physics and every pickup path.
pub struct DropPool {
    config: DropPoolConfig,
    drops: FxHashMap<DropId, DropItem>,
    /// Live ids in spawn order, oldest first
    order: Vec<DropId>,
    recycler: ObjectPool<DropItem>,
    next_id: u32,
    last_update: Tick,
    rng: SimRng,
    ground_lookup: Option<GroundLookup>,

    pet_targets: FxHashMap<u32, PetDropTarget>,
    pet_last_pickup: FxHashMap<u32, Tick>,
    pickup_mobs: FxHashSet<u32>,
    filter: DropFilter,
    history: PickupHistory,
    /// drop id -> trap owner
    booby_traps: FxHashMap<DropId, u32>,

    events: EventQueue<DropEvent>,
}

impl DropPool {
    /// Padding around the view rectangle for render culling.
    const RENDER_PADDING: f32 = 50.0;

    /// Create an empty pool.
    #[must_use]
    pub fn new(config: DropPoolConfig) -> Self {
        let recycler = ObjectPool::new(config.max_drops)
            .with_reset(|drop: &mut DropItem| *drop = DropItem::default());

        Self {
            rng: rng::seeded(config.seed),
            history: PickupHistory::new(config.max_recent_pickups, config.recent_pickup_lifetime_ms),
            drops: FxHashMap::default(),
            order: Vec::with_capacity(config.max_drops),
            recycler,
            next_id: 1,
            last_update: 0,
            ground_lookup: None,
            pet_targets: FxHashMap::default(),
            pet_last_pickup: FxHashMap::default(),
            pickup_mobs: FxHashSet::default(),
            filter: DropFilter::new(),
            booby_traps: FxHashMap::default(),
            events: EventQueue::new(),
            config,
        }
    }

    /// Reset for a new map.
    pub fn initialize(&mut self) {
        self.clear();
    }

    /// Remove every drop and all pickup bookkeeping.
    ///
    /// The exception list survives. Ids keep counting up from where they were.
    pub fn clear(&mut self) {
        for (_, drop) in self.drops.drain() {
            self.recycler.release(drop);
        }
        self.order.clear();
        self.pet_targets.clear();
        self.pet_last_pickup.clear();
        self.pickup_mobs.clear();
        self.history.clear();
        self.booby_traps.clear();
        self.events.clear();
    }

    /// Install the function that maps a spawn position to its landing height.
    pub fn set_ground_lookup(&mut self, lookup: impl Fn(Vec2) -> f32 + 'static) {
        self.ground_lookup = Some(Box::new(lookup));
    }

    #[must_use]
    pub fn config(&self) -> &DropPoolConfig {
        &self.config
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Queued events, oldest first.
    #[must_use]
    pub fn events(&self) -> &EventQueue<DropEvent> {
        &self.events
    }

    /// Take every queued event.
    pub fn drain_events(&mut self) -> impl Iterator<Item = DropEvent> + '_ {
        self.events.drain()
    }

    // ========================================================================
    // Spawning
    // ========================================================================

    /// Spawn a meso pile. Large piles glow.
    pub fn spawn_meso_drop(
        &mut self,
        position: Vec2,
        amount: u32,
        now: Tick,
        owner: Option<u32>,
    ) -> DropId {
        let mut drop = self.allocate(DropType::Meso, None, position, now, owner);
        drop.meso_amount = amount;
        if amount >= 10_000 {
            drop.is_rare = true;
            drop.glow = GlowColor::Gold;
        } else if amount >= 1_000 {
            drop.glow = GlowColor::Silver;
        }
        self.insert(drop)
    }

    /// Spawn an item drop.
    pub fn spawn_item_drop(
        &mut self,
        position: Vec2,
        item_id: impl Into<String>,
        quantity: u32,
        now: Tick,
        owner: Option<u32>,
        is_rare: bool,
    ) -> DropId {
        let mut drop = self.allocate(DropType::Item, Some(item_id.into()), position, now, owner);
        drop.quantity = quantity;
        drop.is_rare = is_rare;
        if is_rare {
            drop.glow = GlowColor::Purple;
        }
        self.insert(drop)
    }

    /// Spawn a mob's whole loot, fanned out horizontally. Mesos come first.
    pub fn spawn_drops_from_mob(
        &mut self,
        position: Vec2,
        now: Tick,
        owner: Option<u32>,
        meso_amount: u32,
        items: &[LootEntry],
    ) -> Vec<DropId> {
        let total = usize::from(meso_amount > 0) + items.len();
        let mut spawned = Vec::with_capacity(total);
        let mut index = 0;

        if meso_amount > 0 {
            let offset = self.drop_offset(index, total);
            index += 1;
            spawned.push(self.spawn_meso_drop(
                position + Vec2::new(offset, 0.0),
                meso_amount,
                now,
                owner,
            ));
        }

        for entry in items {
            let offset = self.drop_offset(index, total);
            index += 1;
            spawned.push(self.spawn_item_drop(
                position + Vec2::new(offset, 0.0),
                entry.item_id.clone(),
                entry.quantity,
                now,
                owner,
                entry.is_rare,
            ));
        }

        spawned
    }

    /// Horizontal offset of drop `index` out of `total`, symmetric about 0.
    #[must_use]
    pub fn drop_offset(&self, index: usize, total: usize) -> f32 {
        if total <= 1 {
            return 0.0;
        }
        let total_width = (total - 1) as f32 * self.config.drop_spread;
        -total_width / 2.0 + index as f32 * self.config.drop_spread
    }

    fn allocate(
        &mut self,
        drop_type: DropType,
        item_id: Option<String>,
        position: Vec2,
        now: Tick,
        owner: Option<u32>,
    ) -> DropItem {
        if self.config.max_drops > 0 {
            while self.order.len() >= self.config.max_drops {
                let oldest = self.order[0];
                log::debug!("Drop cap {} reached, evicting {oldest}", self.config.max_drops);
                self.remove_drop(oldest);
            }
        }

        let mut drop = self.recycler.get();
        let owner = owner.filter(|&id| id > 0);

        drop.id = DropId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1).max(1);
        drop.drop_type = drop_type;
        drop.item_id = item_id;
        drop.quantity = 1;
        drop.meso_amount = 0;

        drop.spawn_position = position;
        drop.position = Vec2::new(position.x, position.y - self.config.spawn_height);
        drop.velocity = Vec2::new(
            rng::random_uniform(&mut self.rng, -40.0, 40.0),
            self.config.initial_velocity_y + rng::random_uniform(&mut self.rng, -20.0, 20.0),
        );
        drop.ground_y = self
            .ground_lookup
            .as_ref()
            .map_or(position.y, |lookup| lookup(position));

        drop.state = DropState::Spawning;
        drop.spawn_time = now;
        drop.bounce_count = 0;
        drop.alpha = 1.0;
        drop.scale = 1.0;
        drop.last_state_change = now;
        drop.is_rare = false;
        drop.glow = GlowColor::White;

        drop.can_pickup = true;
        drop.owner_id = owner;
        drop.owner_expire_time = if owner.is_some() {
            now.saturating_add(self.config.owner_priority_ms)
        } else {
            0
        };
        drop.expire_time = now.saturating_add(self.config.lifetime_ms);
        drop
    }

    fn insert(&mut self, drop: DropItem) -> DropId {
        let id = drop.id;
        log::trace!("Spawned {id} ({:?}) at {}", drop.drop_type, drop.spawn_position);
        self.events.push(DropEvent::Spawned {
            id,
            drop_type: drop.drop_type,
            position: drop.position,
        });
        self.order.push(id);
        self.drops.insert(id, drop);
        id
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    #[must_use]
    #[inline]
    pub fn drop(&self, id: DropId) -> Option<&DropItem> {
        self.drops.get(&id)
    }

    #[inline]
    pub fn drop_mut(&mut self, id: DropId) -> Option<&mut DropItem> {
        self.drops.get_mut(&id)
    }

    /// Live drops in spawn order.
    pub fn active_drops(&self) -> impl Iterator<Item = &DropItem> {
        self.order.iter().filter_map(|id| self.drops.get(id))
    }

    #[must_use]
    pub fn active_drop_count(&self) -> usize {
        self.order.len()
    }

    /// Idle drops within `range` of `point`.
    #[must_use]
    pub fn drops_in_range(&self, point: Vec2, range: f32) -> Vec<DropId> {
        self.active_drops()
            .filter(|drop| drop.is_in_pickup_range(point, range))
            .map(|drop| drop.id)
            .collect()
    }

    /// Nearest drop `player` could pick up right now, strictly inside `max_range`.
    #[must_use]
    pub fn closest_drop(&self, point: Vec2, max_range: f32, player: u32, now: Tick) -> Option<DropId> {
        self.closest_matching(point, max_range, |drop| drop.can_be_picked_by(player, now))
    }

    /// Visible drops inside `view`, padded so icons at the edge are kept.
    pub fn renderable_drops(&self, view: &Rect) -> impl Iterator<Item = &DropItem> {
        let padded = Rect::from_edges(
            view.left() - Self::RENDER_PADDING,
            view.top() - Self::RENDER_PADDING,
            view.right() + Self::RENDER_PADDING,
            view.bottom() + Self::RENDER_PADDING,
        );
        self.active_drops()
            .filter(move |drop| drop.alpha > 0.0 && padded.contains_inclusive(drop.position))
    }

    /// Allow or forbid pickup of a drop. Returns false for unknown ids.
    pub fn set_can_pickup(&mut self, id: DropId, can_pickup: bool) -> bool {
        match self.drops.get_mut(&id) {
            Some(drop) => {
                drop.can_pickup = can_pickup;
                true
            }
            None => false,
        }
    }

    fn closest_matching(
        &self,
        point: Vec2,
        range: f32,
        mut accept: impl FnMut(&DropItem) -> bool,
    ) -> Option<DropId> {
        let mut best = None;
        let mut best_dist = range * range;
        for drop in self.active_drops() {
            if !accept(drop) {
                continue;
            }
            let dist = drop.distance_squared(point);
            if dist < best_dist {
                best_dist = dist;
                best = Some(drop.id);
            }
        }
        best
    }

    // ========================================================================
    // Player Pickup
    // ========================================================================

    /// Start picking up `id` for `player`. Fails on wrong state or owner lock.
    pub fn try_pickup(&mut self, id: DropId, player: u32, now: Tick) -> bool {
        let Some(drop) = self.drops.get_mut(&id) else {
            return false;
        };
        if !drop.can_be_picked_by(player, now) {
            return false;
        }

        drop.start_pickup(now);
        self.events.push(DropEvent::PickedUp {
            id,
            picker_id: player,
        });
        true
    }

    /// Pick up the nearest eligible drop within `range`.
    pub fn try_pickup_closest(
        &mut self,
        point: Vec2,
        player: u32,
        now: Tick,
        range: f32,
    ) -> Option<DropId> {
        let id = self.closest_drop(point, range, player, now)?;
        self.try_pickup(id, player, now).then_some(id)
    }

    // ========================================================================
    // Update
    // ========================================================================

    /// Advance every drop, then remove the ones that finished.
    pub fn update(&mut self, now: Tick, dt: f32) {
        self.last_update = now;

        let mut finished: SmallVec<[(DropId, bool); 8]> = SmallVec::new();
        for id in &self.order {
            if let Some(drop) = self.drops.get_mut(id) {
                let was_expired = drop.state == DropState::Expired;
                drop.update(now, dt);
                if drop.state == DropState::Removed {
                    finished.push((*id, was_expired));
                }
            }
        }

        for (id, faded) in finished {
            if faded {
                self.events.push(DropEvent::Expired { id });
            }
            self.remove_drop(id);
        }
    }

    /// Tick of the most recent `update`
    #[must_use]
    pub const fn last_update(&self) -> Tick {
        self.last_update
    }

    fn remove_drop(&mut self, id: DropId) -> bool {
        let Some(drop) = self.drops.remove(&id) else {
            return false;
        };
        if let Some(index) = self.order.iter().position(|&live| live == id) {
            self.order.remove(index);
        }
        self.booby_traps.remove(&id);
        self.pet_targets.retain(|_, target| target.drop_id != id);
        self.recycler.release(drop);
        self.events.push(DropEvent::Removed { id });
        log::trace!("Removed {id}");
        true
    }

    /// Counts by state and the meso total on the ground.
    #[must_use]
    pub fn stats(&self) -> DropPoolStats {
        let mut stats = DropPoolStats {
            total_drops: self.order.len(),
            ..Default::default()
        };
        for drop in self.active_drops() {
            match drop.state {
                DropState::Idle => stats.idle_drops += 1,
                DropState::Falling | DropState::Bouncing => stats.falling_drops += 1,
                _ => {}
            }
            if drop.drop_type == DropType::Meso {
                stats.total_mesos += u64::from(drop.meso_amount);
            }
        }
        stats
    }

    /// Recycler usage, for tuning `max_drops`.
    #[must_use]
    pub fn recycler_statistics(&self) -> String {
        self.recycler.format_statistics()
    }

    // ========================================================================
    // Pet Pickup
    // ========================================================================

    /// Let a pet loot the nearest eligible drop.
    ///
    /// Rate-limited per pet, honors ownership and the exception list.
    /// `range` of `None` uses the configured pet pickup range.
    pub fn try_pick_up_drop_by_pet(
        &mut self,
        pet_id: u32,
        pet_position: Vec2,
        player_id: u32,
        now: Tick,
        range: Option<f32>,
    ) -> Option<DropId> {
        let range = range
            .filter(|&r| r > 0.0)
            .unwrap_or(self.config.pet_pickup_range);

        if let Some(&last) = self.pet_last_pickup.get(&pet_id) {
            if now.saturating_sub(last) < self.config.pet_pickup_cooldown_ms {
                return None;
            }
        }

        let filter = &self.filter;
        let id = self.closest_matching(pet_position, range, |drop| {
            drop.can_be_picked_by(player_id, now) && !filter.is_excluded(drop)
        })?;

        let drop = self.drops.get_mut(&id)?;
        drop.start_pickup(now);
        self.pet_last_pickup.insert(pet_id, now);
        self.history.record(drop, pet_id, true, now);

        if self
            .pet_targets
            .get(&pet_id)
            .is_some_and(|target| target.drop_id == id)
        {
            self.pet_targets.remove(&pet_id);
        }

        self.events.push(DropEvent::PickedUp {
            id,
            picker_id: player_id,
        });
        self.events.push(DropEvent::PetPickedUp { id, pet_id });
        Some(id)
    }

    /// Keep a pet's chase target current, or pick a new one.
    ///
    /// A valid existing target is refreshed. Otherwise the drop minimizing
    /// `dist_to_pet² + 0.5 · dist_to_player²` within the loot range is chosen,
    /// skipping drops another pet is already chasing.
    pub fn update_chasing_drop_for_pet(
        &mut self,
        pet_id: u32,
        pet_position: Vec2,
        player_id: u32,
        player_position: Vec2,
        now: Tick,
    ) -> Option<PetDropTarget> {
        let pickup_range_sq = self.config.pet_pickup_range * self.config.pet_pickup_range;

        if let Some(drop_id) = self.pet_targets.get(&pet_id).map(|target| target.drop_id) {
            let still_valid = self
                .drops
                .get(&drop_id)
                .filter(|drop| drop.state == DropState::Idle && drop.can_pickup)
                .map(|drop| (drop.position, drop.distance_squared(pet_position)));

            match still_valid {
                Some((position, dist_sq)) => {
                    if let Some(target) = self.pet_targets.get_mut(&pet_id) {
                        target.target = position;
                        target.is_chasing = dist_sq > pickup_range_sq;
                        return Some(*target);
                    }
                }
                None => {
                    self.pet_targets.remove(&pet_id);
                }
            }
        }

        let mut best = None;
        let mut best_score = self.config.pet_loot_range * self.config.pet_loot_range;
        for drop in self.active_drops() {
            if !drop.can_be_picked_by(player_id, now) || self.filter.is_excluded(drop) {
                continue;
            }
            let claimed = self
                .pet_targets
                .values()
                .any(|target| target.pet_id != pet_id && target.drop_id == drop.id);
            if claimed {
                continue;
            }

            let score = drop.distance_squared(pet_position)
                + drop.distance_squared(player_position) * 0.5;
            if score < best_score {
                best_score = score;
                best = Some((drop.id, drop.position));
            }
        }

        let (drop_id, position) = best?;
        let target = PetDropTarget {
            pet_id,
            drop_id,
            target: position,
            start_time: now,
            is_chasing: true,
            chase_speed: self.config.pet_chase_speed,
        };
        self.pet_targets.insert(pet_id, target);
        self.events.push(DropEvent::PetStartChasing {
            pet_id,
            id: drop_id,
        });
        Some(target)
    }

    pub fn clear_pet_target(&mut self, pet_id: u32) {
        self.pet_targets.remove(&pet_id);
    }

    #[must_use]
    pub fn pet_target(&self, pet_id: u32) -> Option<&PetDropTarget> {
        self.pet_targets.get(&pet_id)
    }

    // ========================================================================
    // Mob Pickup
    // ========================================================================

    pub fn register_mob_with_pickup_ability(&mut self, mob_id: u32) {
        self.pickup_mobs.insert(mob_id);
    }

    pub fn unregister_mob_with_pickup_ability(&mut self, mob_id: u32) {
        self.pickup_mobs.remove(&mob_id);
    }

    /// Let a registered thief mob steal the nearest idle drop, ignoring ownership.
    pub fn try_pick_up_drop_by_mob(&mut self, mob_id: u32, position: Vec2, now: Tick) -> Option<DropId> {
        if !self.pickup_mobs.contains(&mob_id) {
            return None;
        }

        let id = self.closest_matching(position, self.config.mob_pickup_range, |drop| {
            drop.state == DropState::Idle && drop.can_pickup
        })?;

        let drop = self.drops.get_mut(&id)?;
        drop.can_pickup = false;
        drop.force_pickup(now);
        self.history.record(drop, mob_id, false, now);

        log::debug!("Mob {mob_id} stole {id}");
        self.events.push(DropEvent::MobPickedUp { id, mob_id });
        Some(id)
    }

    // ========================================================================
    // Meso Explosion
    // ========================================================================

    fn is_explosive_for(drop: &DropItem, player: u32, now: Tick) -> bool {
        drop.state == DropState::Idle
            && drop.can_pickup
            && drop.drop_type == DropType::Meso
            && !drop.is_owner_locked(player, now)
    }

    fn explosion_cap(&self, max_count: usize) -> usize {
        if max_count == 0 {
            self.config.max_meso_explosion_drops
        } else {
            max_count
        }
    }

    /// Meso drops `player` may explode inside a rectangle centered on `center`.
    ///
    /// A `max_count` of 0 uses the configured cap.
    #[must_use]
    pub fn get_explosive_drop_in_rect(
        &self,
        center: Vec2,
        width: f32,
        height: f32,
        player: u32,
        now: Tick,
        max_count: usize,
    ) -> Vec<DropId> {
        let area = Rect::from_center(center, width, height);
        self.active_drops()
            .filter(|drop| Self::is_explosive_for(drop, player, now))
            .filter(|drop| area.contains_inclusive(drop.position))
            .map(|drop| drop.id)
            .take(self.explosion_cap(max_count))
            .collect()
    }

    /// Meso drops `player` may explode within `radius` of `center`.
    #[must_use]
    pub fn get_explosive_drop_in_range(
        &self,
        center: Vec2,
        radius: f32,
        player: u32,
        now: Tick,
        max_count: usize,
    ) -> Vec<DropId> {
        let radius_sq = radius * radius;
        self.active_drops()
            .filter(|drop| Self::is_explosive_for(drop, player, now))
            .filter(|drop| drop.distance_squared(center) <= radius_sq)
            .map(|drop| drop.id)
            .take(self.explosion_cap(max_count))
            .collect()
    }

    /// Sum the mesos of still-idle drops and send them into the pickup animation.
    pub fn consume_mesos_for_explosion(&mut self, ids: &[DropId], now: Tick) -> u64 {
        let mut total = 0;
        for id in ids {
            if let Some(drop) = self.drops.get_mut(id) {
                if drop.state != DropState::Idle {
                    continue;
                }
                total += u64::from(drop.meso_amount);
                drop.force_pickup(now);
            }
        }
        total
    }

    // ========================================================================
    // Booby Traps
    // ========================================================================

    pub fn register_booby_trap_drop(&mut self, id: DropId, trap_owner_id: u32) {
        self.booby_traps.insert(id, trap_owner_id);
    }

    /// Resolve a trap on pickup. Returns true if the trap fired on `picker_id`.
    ///
    /// Either way the registration is consumed; the owner never triggers
    /// their own trap.
    pub fn booby_trap_check_pickup_item(&mut self, id: DropId, picker_id: u32) -> bool {
        let Some(trap_owner_id) = self.booby_traps.remove(&id) else {
            return false;
        };
        if picker_id == trap_owner_id {
            return false;
        }

        self.events.push(DropEvent::BoobyTrapTriggered {
            id,
            trap_owner_id,
            picker_id,
        });
        true
    }

    #[must_use]
    pub fn is_booby_trap_drop(&self, id: DropId) -> bool {
        self.booby_traps.contains_key(&id)
    }

    pub fn clear_booby_trap(&mut self, id: DropId) {
        self.booby_traps.remove(&id);
    }

    // ========================================================================
    // Recent Pickup History
    // ========================================================================

    /// Log a pickup of a live drop. Returns false for unknown ids.
    pub fn record_recent_pickup_item(
        &mut self,
        id: DropId,
        picker_id: u32,
        picked_by_pet: bool,
        now: Tick,
    ) -> bool {
        match self.drops.get(&id) {
            Some(drop) => {
                self.history.record(drop, picker_id, picked_by_pet, now);
                true
            }
            None => false,
        }
    }

    pub fn recent_pickups(&self) -> impl Iterator<Item = &RecentPickupRecord> {
        self.history.iter()
    }

    pub fn recent_pickups_of(&self, drop_type: DropType) -> impl Iterator<Item = &RecentPickupRecord> {
        self.history.of_type(drop_type)
    }

    #[must_use]
    pub fn recent_meso_total(&self) -> u64 {
        self.history.meso_total()
    }

    pub fn clear_recent_pickups(&mut self) {
        self.history.clear();
    }

    // ========================================================================
    // Exception List
    // ========================================================================

    /// Whether pets skip drop `id`. Unknown ids are never excluded.
    #[must_use]
    pub fn is_in_exception_list(&self, id: DropId) -> bool {
        self.drops
            .get(&id)
            .is_some_and(|drop| self.filter.is_excluded(drop))
    }

    pub fn add_exception_entry(&mut self, entry: DropExceptionEntry) {
        self.filter.add(entry);
    }

    pub fn add_to_blocklist(&mut self, item_id: impl Into<String>) {
        self.filter.add_item_block(item_id);
    }

    pub fn add_type_to_blocklist(&mut self, drop_type: DropType) {
        self.filter.add_type_block(drop_type);
    }

    pub fn block_mesos_under(&mut self, amount: u32) {
        self.filter.block_mesos_under(amount);
    }

    pub fn remove_from_exception_list(&mut self, item_id: &str) {
        self.filter.remove_item(item_id);
    }

    pub fn clear_exception_list(&mut self) {
        self.filter.clear();
    }

    /// `true` switches to whitelist mode
    pub fn set_exception_list_mode(&mut self, whitelist: bool) {
        self.filter.set_whitelist(whitelist);
    }

    #[must_use]
    pub fn is_whitelist_mode(&self) -> bool {
        self.filter.is_whitelist()
    }

    #[must_use]
    pub fn exception_list(&self) -> &[DropExceptionEntry] {
        self.filter.entries()
    }
}

impl Default for DropPool {
    fn default() -> Self {
        Self::new(DropPoolConfig::default())
    }
}

// ============================================================================
// Tests
// ============================================================================
