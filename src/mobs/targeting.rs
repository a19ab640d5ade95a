//! Combat targeting queries
//!
//! Read-only scans over the live mobs of a [`MobPool`]. Only mobs that are
//! active, not dead, and have both an AI and a position are ever returned.
//! Results are valid until the next `update`.

use glam::Vec2;
use smallvec::SmallVec;

use super::{MobAi, MobEntity, MobId, MobPool};
use crate::geometry::{Rect, Trapezoid};

/// Ordered chain-lightning hits.
pub type ChainPath = SmallVec<[MobId; 8]>;

impl<M: MobEntity> MobPool<M> {
    // ========================================================================
    // Trapezoid
    // ========================================================================

    /// Whether mob `id` stands inside `area`.
    #[must_use]
    #[inline]
    pub fn check_mob_in_trapezoid(&self, id: MobId, area: &Trapezoid) -> bool {
        self.mobs
            .get(&id)
            .and_then(MobEntity::position)
            .is_some_and(|pos| area.contains_point(pos))
    }

    /// Live mobs inside `area`, in pool order, at most `max_targets`.
    #[must_use]
    pub fn find_hit_mob_in_trapezoid_plural(&self, area: &Trapezoid, max_targets: usize) -> Vec<MobId> {
        self.live_mobs()
            .filter(|live| area.contains_point(live.position))
            .map(|live| live.id)
            .take(max_targets)
            .collect()
    }

    /// Live mobs inside `area`, nearest to `origin` first.
    #[must_use]
    pub fn find_hit_mob_in_trapezoid_sorted(
        &self,
        area: &Trapezoid,
        origin: Vec2,
        max_targets: usize,
    ) -> Vec<MobId> {
        let mut hits: Vec<(MobId, f32)> = self
            .live_mobs()
            .filter(|live| area.contains_point(live.position))
            .map(|live| (live.id, live.position.distance_squared(origin)))
            .collect();
        hits.sort_by(|a, b| a.1.total_cmp(&b.1));
        hits.into_iter().take(max_targets).map(|(id, _)| id).collect()
    }

    // ========================================================================
    // Chain Lightning
    // ========================================================================

    /// Greedy bounce path from `start`.
    ///
    /// Each bounce picks the nearest unvisited mob within `bounce_range` of
    /// the previous link. Stops early once nothing is in range.
    ///
    /// A mob standing on `start` is the first hop. To bounce away from a mob
    /// that was already hit, use [`Self::find_hit_mob_by_chain_lightning_from`].
    #[must_use]
    pub fn find_hit_mob_by_chain_lightning(
        &self,
        start: Vec2,
        bounce_range: f32,
        max_bounces: usize,
        exclude: &[MobId],
    ) -> ChainPath {
        let range_sq = bounce_range * bounce_range;
        let mut path = ChainPath::new();
        let mut current = start;

        for _ in 0..max_bounces {
            let mut nearest = None;
            let mut nearest_dist = f32::INFINITY;
            for live in self.live_mobs() {
                if exclude.contains(&live.id) || path.contains(&live.id) {
                    continue;
                }
                let dist = live.position.distance_squared(current);
                if dist <= range_sq && dist < nearest_dist {
                    nearest_dist = dist;
                    nearest = Some((live.id, live.position));
                }
            }

            let Some((id, position)) = nearest else {
                break;
            };
            path.push(id);
            current = position;
        }

        path
    }

    /// Bounce path starting at an already-hit mob, which is never revisited.
    #[must_use]
    pub fn find_hit_mob_by_chain_lightning_from(
        &self,
        start: MobId,
        bounce_range: f32,
        max_bounces: usize,
    ) -> ChainPath {
        match self.mobs.get(&start).and_then(MobEntity::position) {
            Some(origin) => {
                self.find_hit_mob_by_chain_lightning(origin, bounce_range, max_bounces, &[start])
            }
            None => ChainPath::new(),
        }
    }

    // ========================================================================
    // Rectangle
    // ========================================================================

    #[must_use]
    pub fn mobs_in_rect(&self, area: &Rect) -> Vec<MobId> {
        self.live_mobs()
            .filter(|live| area.contains(live.position))
            .map(|live| live.id)
            .collect()
    }

    /// Undead mobs in `area`, for holy damage.
    #[must_use]
    pub fn find_hit_undead_mob_in_rect(&self, area: &Rect, max_targets: usize) -> Vec<MobId> {
        self.live_mobs()
            .filter(|live| live.ai.is_undead() && area.contains(live.position))
            .map(|live| live.id)
            .take(max_targets)
            .collect()
    }

    #[must_use]
    pub fn find_hit_dazzled_mob_in_rect(&self, area: &Rect, max_targets: usize) -> Vec<MobId> {
        self.live_mobs()
            .filter(|live| live.ai.is_dazzled() && area.contains(live.position))
            .map(|live| live.id)
            .take(max_targets)
            .collect()
    }

    // ========================================================================
    // Body Attack
    // ========================================================================

    fn body_hits(&self, player: Vec2, hitbox: Option<Vec2>) -> impl Iterator<Item = (MobId, Vec2)> {
        let size = hitbox.unwrap_or(self.config.player_hitbox);
        let player_rect = Rect::standing_at(player, size.x, size.y);
        let default_frame = self.config.default_mob_frame;

        self.live_mobs().filter_map(move |live| {
            let frame = live.mob.frame_size().unwrap_or(default_frame);
            let mob_rect = Rect::standing_at(live.position, frame.x, frame.y);
            player_rect
                .intersects(&mob_rect)
                .then_some((live.id, live.position))
        })
    }

    /// Closest mob touching the player's hitbox.
    ///
    /// `hitbox` of `None` uses the configured player size.
    #[must_use]
    pub fn find_body_attack_mob(&self, player: Vec2, hitbox: Option<Vec2>) -> Option<MobId> {
        self.body_hits(player, hitbox)
            .map(|(id, pos)| (id, pos.distance_squared(player)))
            .fold(None, |best: Option<(MobId, f32)>, (id, dist)| match best {
                Some((_, best_dist)) if best_dist <= dist => best,
                _ => Some((id, dist)),
            })
            .map(|(id, _)| id)
    }

    #[must_use]
    pub fn find_all_body_attack_mobs(&self, player: Vec2, hitbox: Option<Vec2>) -> Vec<MobId> {
        self.body_hits(player, hitbox).map(|(id, _)| id).collect()
    }

    // ========================================================================
    // Bosses
    // ========================================================================

    /// Highest-level live boss. On equal levels the earliest spawned wins.
    #[must_use]
    pub fn find_boss_mob(&self) -> Option<MobId> {
        let mut best: Option<(MobId, u32)> = None;
        for live in self.live_mobs().filter(|live| live.ai.is_boss()) {
            let level = live.ai.level();
            if best.is_none_or(|(_, best_level)| level > best_level) {
                best = Some((live.id, level));
            }
        }
        best.map(|(id, _)| id)
    }

    #[must_use]
    pub fn find_all_boss_mobs(&self) -> Vec<MobId> {
        self.live_mobs()
            .filter(|live| live.ai.is_boss())
            .map(|live| live.id)
            .collect()
    }

    #[must_use]
    pub fn find_nearest_boss_mob(&self, point: Vec2) -> Option<MobId> {
        self.nearest_where(point, f32::INFINITY, |ai| ai.is_boss())
    }

    // ========================================================================
    // Nearest
    // ========================================================================

    fn nearest_where(&self, point: Vec2, limit_sq: f32, accept: impl Fn(&M::Ai) -> bool) -> Option<MobId> {
        let mut best = None;
        let mut best_dist = limit_sq;
        for live in self.live_mobs() {
            if !accept(live.ai) {
                continue;
            }
            let dist = live.position.distance_squared(point);
            if dist < best_dist {
                best_dist = dist;
                best = Some(live.id);
            }
        }
        best
    }

    /// Nearest live mob strictly inside `max_radius` (unbounded when `None`).
    #[must_use]
    pub fn find_nearest_mob(&self, point: Vec2, max_radius: Option<f32>, include_bosses: bool) -> Option<MobId> {
        let limit_sq = max_radius.map_or(f32::INFINITY, |r| r * r);
        self.nearest_where(point, limit_sq, |ai| include_bosses || !ai.is_boss())
    }

    /// Up to `count` live mobs within `max_radius`, nearest first.
    #[must_use]
    pub fn find_nearest_mobs(&self, point: Vec2, count: usize, max_radius: Option<f32>) -> Vec<MobId> {
        let limit_sq = max_radius.map_or(f32::INFINITY, |r| r * r);
        let mut hits: Vec<(MobId, f32)> = self
            .live_mobs()
            .map(|live| (live.id, live.position.distance_squared(point)))
            .filter(|(_, dist)| *dist <= limit_sq)
            .collect();
        hits.sort_by(|a, b| a.1.total_cmp(&b.1));
        hits.into_iter().take(count).map(|(id, _)| id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mobs::testing::TestMob;
    use crate::mobs::{MobDeathType, MobPoolConfig};

    fn pool_with(mobs: Vec<TestMob>) -> MobPool<TestMob> {
        let mut pool = MobPool::new(MobPoolConfig::default());
        pool.initialize(mobs);
        pool
    }

    #[test]
    fn test_chain_lightning_stops_when_out_of_range() {
        let pool = pool_with(vec![
            TestMob::at(0.0, 0.0),
            TestMob::at(50.0, 0.0),
            TestMob::at(120.0, 0.0),
        ]);

        let path = pool.find_hit_mob_by_chain_lightning_from(MobId(1), 60.0, 3);
        assert_eq!(path.as_slice(), &[MobId(2)]);
    }

    #[test]
    fn test_chain_lightning_from_point_hits_mob_on_start() {
        let pool = pool_with(vec![
            TestMob::at(0.0, 0.0),
            TestMob::at(50.0, 0.0),
            TestMob::at(200.0, 0.0),
        ]);

        let path = pool.find_hit_mob_by_chain_lightning(Vec2::ZERO, 60.0, 3, &[]);
        assert_eq!(path.as_slice(), &[MobId(1), MobId(2)]);

        let from_mob = pool.find_hit_mob_by_chain_lightning_from(MobId(1), 60.0, 3);
        assert_eq!(from_mob.as_slice(), &[MobId(2)]);
    }

    #[test]
    fn test_chain_lightning_walks_nearest_unvisited() {
        let pool = pool_with(vec![
            TestMob::at(40.0, 0.0),
            TestMob::at(80.0, 0.0),
            TestMob::at(20.0, 0.0),
            TestMob::at(500.0, 0.0),
        ]);

        let path = pool.find_hit_mob_by_chain_lightning(Vec2::ZERO, 45.0, 10, &[]);
        assert_eq!(path.as_slice(), &[MobId(3), MobId(1), MobId(2)]);

        let capped = pool.find_hit_mob_by_chain_lightning(Vec2::ZERO, 45.0, 2, &[MobId(3)]);
        assert_eq!(capped.as_slice(), &[MobId(1), MobId(2)]);
    }

    #[test]
    fn test_trapezoid_queries() {
        let pool = pool_with(vec![
            TestMob::at(100.0, 0.0),
            TestMob::at(30.0, 0.0),
            TestMob::at(-50.0, 0.0),
            TestMob::at(60.0, 0.0).with_ai(|ai| ai.dead = true),
        ]);
        let area = Trapezoid::new(Vec2::ZERO, 40.0, 80.0, 150.0, true);

        assert!(pool.check_mob_in_trapezoid(MobId(1), &area));
        assert!(!pool.check_mob_in_trapezoid(MobId(3), &area));
        assert_eq!(
            pool.find_hit_mob_in_trapezoid_plural(&area, usize::MAX),
            vec![MobId(1), MobId(2)]
        );
        assert_eq!(pool.find_hit_mob_in_trapezoid_plural(&area, 1), vec![MobId(1)]);
        assert_eq!(
            pool.find_hit_mob_in_trapezoid_sorted(&area, Vec2::ZERO, usize::MAX),
            vec![MobId(2), MobId(1)]
        );
    }

    #[test]
    fn test_rect_filters() {
        let pool = pool_with(vec![
            TestMob::at(10.0, 10.0).with_ai(|ai| ai.undead = true),
            TestMob::at(20.0, 10.0).with_ai(|ai| ai.dazzled = true),
            TestMob::at(30.0, 10.0),
            TestMob::at(100.0, 10.0).with_ai(|ai| ai.undead = true),
        ]);
        let area = Rect::new(0.0, 0.0, 100.0, 50.0);

        assert_eq!(pool.mobs_in_rect(&area), vec![MobId(1), MobId(2), MobId(3)]);
        assert_eq!(pool.find_hit_undead_mob_in_rect(&area, 10), vec![MobId(1)]);
        assert_eq!(pool.find_hit_dazzled_mob_in_rect(&area, 10), vec![MobId(2)]);
        assert!(pool.find_hit_dazzled_mob_in_rect(&area, 0).is_empty());
    }

    #[test]
    fn test_body_attack() {
        let mut wide = TestMob::at(60.0, 0.0);
        wide.frame = Some(Vec2::new(130.0, 40.0));
        let pool = pool_with(vec![TestMob::at(25.0, 0.0), TestMob::at(10.0, 0.0), wide]);

        assert_eq!(pool.find_body_attack_mob(Vec2::ZERO, None), Some(MobId(2)));
        assert_eq!(
            pool.find_all_body_attack_mobs(Vec2::ZERO, None),
            vec![MobId(1), MobId(2), MobId(3)]
        );
        assert_eq!(
            pool.find_all_body_attack_mobs(Vec2::ZERO, Some(Vec2::new(2.0, 60.0))),
            vec![MobId(2), MobId(3)]
        );
        assert_eq!(pool.find_body_attack_mob(Vec2::new(0.0, 500.0), None), None);
    }

    #[test]
    fn test_boss_selection() {
        let mut pool = pool_with(vec![
            TestMob::at(0.0, 0.0),
            TestMob::at(100.0, 0.0).boss(80, "A"),
            TestMob::at(200.0, 0.0).boss(90, "B"),
            TestMob::at(300.0, 0.0).boss(90, "C"),
        ]);

        assert_eq!(pool.find_boss_mob(), Some(MobId(3)), "First of equal levels wins");
        assert_eq!(pool.find_all_boss_mobs(), vec![MobId(2), MobId(3), MobId(4)]);
        assert_eq!(pool.find_nearest_boss_mob(Vec2::new(290.0, 0.0)), Some(MobId(4)));

        pool.kill_mob(MobId(3), MobDeathType::Killed);
        assert_eq!(pool.find_boss_mob(), Some(MobId(4)));
    }

    #[test]
    fn test_nearest_mobs() {
        let pool = pool_with(vec![
            TestMob::at(50.0, 0.0),
            TestMob::at(10.0, 0.0).boss(10, "Boss"),
            TestMob::at(30.0, 0.0),
            TestMob::at(400.0, 0.0),
        ]);

        assert_eq!(pool.find_nearest_mob(Vec2::ZERO, None, true), Some(MobId(2)));
        assert_eq!(pool.find_nearest_mob(Vec2::ZERO, None, false), Some(MobId(3)));
        assert_eq!(pool.find_nearest_mob(Vec2::ZERO, Some(5.0), true), None);

        assert_eq!(
            pool.find_nearest_mobs(Vec2::ZERO, 3, Some(100.0)),
            vec![MobId(2), MobId(3), MobId(1)]
        );
        assert_eq!(pool.find_nearest_mobs(Vec2::ZERO, 1, None), vec![MobId(2)]);
    }
}
