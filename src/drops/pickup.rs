//! Pickup bookkeeping: pet chase targets and recent pickup history

use std::collections::VecDeque;

use glam::Vec2;
use serde::Serialize;

use super::{DropId, DropItem, DropType};
use crate::core::Tick;

/// A drop a pet has been assigned to chase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PetDropTarget {
    pub pet_id: u32,
    pub drop_id: DropId,
    /// Last known position of the drop
    pub target: Vec2,
    pub start_time: Tick,
    /// `false` once the pet is within pickup range
    pub is_chasing: bool,
    /// Pixels per second
    pub chase_speed: f32,
}

/// One entry of the recent pickup history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentPickupRecord {
    pub drop_id: DropId,
    pub drop_type: DropType,
    pub item_id: Option<String>,
    pub meso_amount: u32,
    pub quantity: u32,
    pub pickup_time: Tick,
    /// Player, pet or mob that took the drop
    pub picker_id: u32,
    pub picked_by_pet: bool,
}

impl RecentPickupRecord {
    fn from_drop(drop: &DropItem, picker_id: u32, picked_by_pet: bool, now: Tick) -> Self {
        Self {
            drop_id: drop.id,
            drop_type: drop.drop_type,
            item_id: drop.item_id.clone(),
            meso_amount: drop.meso_amount,
            quantity: drop.quantity,
            pickup_time: now,
            picker_id,
            picked_by_pet,
        }
    }
}

/// Bounded, time-limited pickup log, oldest first.
#[derive(Debug, Clone)]
pub struct PickupHistory {
    records: VecDeque<RecentPickupRecord>,
    max_records: usize,
    lifetime_ms: u64,
}

impl PickupHistory {
    #[must_use]
    pub fn new(max_records: usize, lifetime_ms: u64) -> Self {
        Self {
            records: VecDeque::with_capacity(max_records),
            max_records,
            lifetime_ms,
        }
    }

    /// Append a record, first pruning stale entries and enforcing the cap.
    pub fn record(&mut self, drop: &DropItem, picker_id: u32, picked_by_pet: bool, now: Tick) {
        while self
            .records
            .front()
            .is_some_and(|oldest| now.saturating_sub(oldest.pickup_time) > self.lifetime_ms)
        {
            self.records.pop_front();
        }

        if self.max_records == 0 {
            return;
        }
        while self.records.len() >= self.max_records {
            self.records.pop_front();
        }

        self.records
            .push_back(RecentPickupRecord::from_drop(drop, picker_id, picked_by_pet, now));
    }

    pub fn iter(&self) -> impl Iterator<Item = &RecentPickupRecord> {
        self.records.iter()
    }

    pub fn of_type(&self, drop_type: DropType) -> impl Iterator<Item = &RecentPickupRecord> {
        self.records.iter().filter(move |r| r.drop_type == drop_type)
    }

    /// Sum of meso amounts in the history
    #[must_use]
    pub fn meso_total(&self) -> u64 {
        self.of_type(DropType::Meso)
            .map(|r| u64::from(r.meso_amount))
            .sum()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meso(id: u32, amount: u32) -> DropItem {
        DropItem {
            id: DropId(id),
            drop_type: DropType::Meso,
            meso_amount: amount,
            quantity: 1,
            ..Default::default()
        }
    }

    #[test]
    fn test_history_caps_size() {
        let mut history = PickupHistory::new(3, 30_000);
        for i in 0..5 {
            history.record(&meso(i, 10), 1, false, 100);
        }

        assert_eq!(history.len(), 3);
        let ids: Vec<_> = history.iter().map(|r| r.drop_id.raw()).collect();
        assert_eq!(ids, vec![2, 3, 4]);
    }

    #[test]
    fn test_history_prunes_stale_records() {
        let mut history = PickupHistory::new(50, 30_000);
        history.record(&meso(1, 10), 1, false, 0);
        history.record(&meso(2, 10), 1, false, 20_000);
        history.record(&meso(3, 10), 1, true, 30_001);

        let ids: Vec<_> = history.iter().map(|r| r.drop_id.raw()).collect();
        assert_eq!(ids, vec![2, 3]);
        assert!(history.iter().last().is_some_and(|r| r.picked_by_pet));
    }

    #[test]
    fn test_history_filters_and_totals() {
        let mut history = PickupHistory::new(50, 30_000);
        history.record(&meso(1, 100), 1, false, 0);
        history.record(&meso(2, 250), 1, false, 0);
        let item = DropItem {
            id: DropId(3),
            drop_type: DropType::Item,
            item_id: Some("2000000".into()),
            ..Default::default()
        };
        history.record(&item, 1, true, 0);

        assert_eq!(history.meso_total(), 350);
        assert_eq!(history.of_type(DropType::Item).count(), 1);

        history.clear();
        assert!(history.is_empty());
    }
}
