use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Parameters for one stocked product. Immutable for the run: the catalog is
/// loaded once and never edited by the simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique key across the catalog.
    pub name: String,
    /// Inclusive lower bound on random daily demand.
    pub min_daily_usage: u32,
    /// Inclusive upper bound on random daily demand.
    pub max_daily_usage: u32,
    /// Days of cover the reorder point should protect.
    pub buffer_days: u32,
    /// Days of cover one replenishment order should provide.
    pub target_days: u32,
    /// Shelf life stamped onto newly received batches, in calendar months.
    pub standard_shelf_life_months: u32,
}

impl Item {
    /// ROP = max daily usage * buffer days. Derived on demand, never stored.
    /// `None` means the parameters overflow and classification should report
    /// an error rather than a bogus threshold.
    pub fn reorder_point(&self) -> Option<u32> {
        self.max_daily_usage.checked_mul(self.buffer_days)
    }

    /// RoQ = max daily usage * target days.
    pub fn reorder_quantity(&self) -> Option<u32> {
        self.max_daily_usage.checked_mul(self.target_days)
    }
}

/// All items for the run, keyed by name.
///
/// Iteration order (ascending name) is the canonical order used everywhere an
/// ordered walk over items is needed: daily consumption, history emission,
/// reorder suggestions. Keeping one canonical order makes repeated runs over
/// identical random draws reproducible.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ItemCatalog {
    items: BTreeMap<String, Item>,
}

impl ItemCatalog {
    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Self {
        Self {
            items: items
                .into_iter()
                .map(|item| (item.name.clone(), item))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Item> {
        self.items.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items.contains_key(name)
    }

    /// Items in canonical (ascending name) order.
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
