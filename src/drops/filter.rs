//! Pet auto-loot exception list
//!
//! An ordered rule list deciding which drops pets may pick up. In blocklist
//! mode the first matching rule decides; in whitelist mode a drop must match
//! at least one rule to be allowed.

use serde::{Deserialize, Serialize};

use super::{DropItem, DropType};

/// One filter rule. Unset criteria match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropExceptionEntry {
    /// Exact item identifier
    pub item_id: Option<String>,
    /// Drop type
    pub drop_type: Option<DropType>,
    /// Inclusive lower meso bound. Setting either bound only matches mesos.
    pub min_meso_amount: Option<u32>,
    /// Inclusive upper meso bound
    pub max_meso_amount: Option<u32>,
    /// `true` blocks matches, `false` allows them
    pub block_pickup: bool,
}

impl DropExceptionEntry {
    /// Block one item id
    #[must_use]
    pub fn block_item(item_id: impl Into<String>) -> Self {
        Self {
            item_id: Some(item_id.into()),
            block_pickup: true,
            ..Default::default()
        }
    }

    /// Allow one item id
    #[must_use]
    pub fn allow_item(item_id: impl Into<String>) -> Self {
        Self {
            item_id: Some(item_id.into()),
            block_pickup: false,
            ..Default::default()
        }
    }

    /// Block a whole drop type
    #[must_use]
    pub fn block_type(drop_type: DropType) -> Self {
        Self {
            drop_type: Some(drop_type),
            block_pickup: true,
            ..Default::default()
        }
    }

    /// Whether every set criterion matches `drop`.
    #[must_use]
    pub fn matches(&self, drop: &DropItem) -> bool {
        if let Some(item_id) = self.item_id.as_deref().filter(|id| !id.is_empty()) {
            if drop.item_id.as_deref() != Some(item_id) {
                return false;
            }
        }

        if let Some(drop_type) = self.drop_type {
            if drop.drop_type != drop_type {
                return false;
            }
        }

        if self.min_meso_amount.is_some() || self.max_meso_amount.is_some() {
            if drop.drop_type != DropType::Meso {
                return false;
            }
            if self.min_meso_amount.is_some_and(|min| drop.meso_amount < min) {
                return false;
            }
            if self.max_meso_amount.is_some_and(|max| drop.meso_amount > max) {
                return false;
            }
        }

        true
    }
}

/// Ordered exception list with blocklist/whitelist mode.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DropFilter {
    entries: Vec<DropExceptionEntry>,
    whitelist: bool,
}

impl DropFilter {
    /// Empty blocklist
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether pets should skip `drop`.
    ///
    /// An empty list never excludes anything, in either mode.
    #[must_use]
    pub fn is_excluded(&self, drop: &DropItem) -> bool {
        if self.entries.is_empty() {
            return false;
        }

        match self.entries.iter().find(|entry| entry.matches(drop)) {
            Some(entry) => !self.whitelist && entry.block_pickup,
            None => self.whitelist,
        }
    }

    pub fn add(&mut self, entry: DropExceptionEntry) {
        self.entries.push(entry);
    }

    pub fn add_item_block(&mut self, item_id: impl Into<String>) {
        self.add(DropExceptionEntry::block_item(item_id));
    }

    pub fn add_type_block(&mut self, drop_type: DropType) {
        self.add(DropExceptionEntry::block_type(drop_type));
    }

    /// Block meso piles smaller than `amount`. A zero amount blocks nothing.
    pub fn block_mesos_under(&mut self, amount: u32) {
        let Some(max) = amount.checked_sub(1) else {
            return;
        };
        self.add(DropExceptionEntry {
            drop_type: Some(DropType::Meso),
            max_meso_amount: Some(max),
            block_pickup: true,
            ..Default::default()
        });
    }

    /// Remove every rule targeting `item_id`.
    pub fn remove_item(&mut self, item_id: &str) {
        self.entries
            .retain(|entry| entry.item_id.as_deref() != Some(item_id));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn set_whitelist(&mut self, whitelist: bool) {
        self.whitelist = whitelist;
    }

    #[must_use]
    pub const fn is_whitelist(&self) -> bool {
        self.whitelist
    }

    #[must_use]
    pub fn entries(&self) -> &[DropExceptionEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str) -> DropItem {
        DropItem {
            drop_type: DropType::Item,
            item_id: Some(id.to_owned()),
            ..Default::default()
        }
    }

    fn meso(amount: u32) -> DropItem {
        DropItem {
            drop_type: DropType::Meso,
            meso_amount: amount,
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_filter_excludes_nothing() {
        let mut filter = DropFilter::new();
        assert!(!filter.is_excluded(&item("2000000")));

        filter.set_whitelist(true);
        assert!(!filter.is_excluded(&item("2000000")));
    }

    #[test]
    fn test_first_match_wins_in_blocklist_mode() {
        let mut filter = DropFilter::new();
        filter.add(DropExceptionEntry::block_item("X"));
        filter.add(DropExceptionEntry::allow_item("X"));

        assert!(filter.is_excluded(&item("X")));
        assert!(!filter.is_excluded(&item("Y")));
    }

    #[test]
    fn test_allow_rule_first_shadows_block() {
        let mut filter = DropFilter::new();
        filter.add(DropExceptionEntry::allow_item("X"));
        filter.add_type_block(DropType::Item);

        assert!(!filter.is_excluded(&item("X")));
        assert!(filter.is_excluded(&item("Y")));
    }

    #[test]
    fn test_whitelist_requires_match() {
        let mut filter = DropFilter::new();
        filter.add(DropExceptionEntry::block_item("X"));
        filter.set_whitelist(true);

        assert!(
            !filter.is_excluded(&item("X")),
            "Any match allows in whitelist mode, even a block rule"
        );
        assert!(filter.is_excluded(&item("Y")));
    }

    #[test]
    fn test_block_mesos_under() {
        let mut filter = DropFilter::new();
        filter.block_mesos_under(100);

        assert!(filter.is_excluded(&meso(99)));
        assert!(!filter.is_excluded(&meso(100)));
        assert!(!filter.is_excluded(&item("X")));

        filter.clear();
        filter.block_mesos_under(0);
        assert!(filter.entries().is_empty());
    }

    #[test]
    fn test_meso_range_never_matches_items() {
        let entry = DropExceptionEntry {
            min_meso_amount: Some(0),
            block_pickup: true,
            ..Default::default()
        };
        assert!(entry.matches(&meso(0)));
        assert!(!entry.matches(&item("X")));
    }

    #[test]
    fn test_remove_item() {
        let mut filter = DropFilter::new();
        filter.add_item_block("X");
        filter.add_item_block("Y");
        filter.add_type_block(DropType::Meso);
        filter.remove_item("X");

        assert_eq!(filter.entries().len(), 2);
        assert!(!filter.is_excluded(&item("X")));
    }
}
