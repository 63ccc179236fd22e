use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::EngineError;

/// Unique identifier for one received lot.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BatchId(pub u64);

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A discrete, dated lot of stock for one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    pub id: BatchId,
    pub item_name: String,
    pub quantity_on_hand: u32,
    /// `None` means the expiry is unknown; such batches classify as Unknown
    /// and are never consumed automatically.
    pub expiry_date: Option<NaiveDate>,
}

/// The complete set of active batches across all items.
///
/// Every mutating operation takes `&self` and returns the next `Ledger`, so
/// the caller always holds a consistent snapshot and a failed operation
/// leaves its ledger untouched. Invariant: no batch with quantity 0 is ever
/// retained in the active set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Ledger {
    batches: BTreeMap<BatchId, Batch>,
    next_batch_id: u64,
}

impl Ledger {
    /// Builds a ledger from loaded batches. Batches that arrive with zero
    /// quantity are already consumed and are not admitted to the active set.
    pub fn from_batches(batches: impl IntoIterator<Item = Batch>) -> Self {
        let batches: BTreeMap<BatchId, Batch> = batches
            .into_iter()
            .filter(|b| b.quantity_on_hand > 0)
            .map(|b| (b.id, b))
            .collect();
        let next_batch_id = batches.keys().last().map_or(1, |id| id.0 + 1);
        Self {
            batches,
            next_batch_id,
        }
    }

    /// Adds a freshly received batch, assigning it the next free identifier.
    pub fn receive(
        &self,
        item_name: &str,
        quantity: u32,
        expiry_date: Option<NaiveDate>,
    ) -> (Ledger, BatchId) {
        let mut next = self.clone();
        let id = BatchId(next.next_batch_id);
        next.next_batch_id += 1;
        if quantity > 0 {
            next.batches.insert(
                id,
                Batch {
                    id,
                    item_name: item_name.to_string(),
                    quantity_on_hand: quantity,
                    expiry_date,
                },
            );
        }
        (next, id)
    }

    /// Removes the named batch entirely, whatever its remaining quantity.
    pub fn discard_batch(&self, id: BatchId) -> Result<Ledger, EngineError> {
        if !self.batches.contains_key(&id) {
            return Err(EngineError::BatchNotFound(id));
        }
        let mut next = self.clone();
        next.batches.remove(&id);
        Ok(next)
    }

    /// Reduces a batch's quantity by `amount`, never below zero. A batch
    /// drained to zero is removed from the active set.
    pub fn decrement_batch(&self, id: BatchId, amount: u32) -> Result<Ledger, EngineError> {
        if !self.batches.contains_key(&id) {
            return Err(EngineError::BatchNotFound(id));
        }
        let mut next = self.clone();
        next.decrement_in_place(id, amount);
        Ok(next)
    }

    /// In-place variant for the daily allocator, which already works on its
    /// own clone of the ledger. Returns the quantity actually removed.
    pub(crate) fn decrement_in_place(&mut self, id: BatchId, amount: u32) -> u32 {
        let Some(batch) = self.batches.get_mut(&id) else {
            return 0;
        };
        let taken = batch.quantity_on_hand.min(amount);
        batch.quantity_on_hand -= taken;
        if batch.quantity_on_hand == 0 {
            self.batches.remove(&id);
        }
        taken
    }

    pub fn get(&self, id: BatchId) -> Option<&Batch> {
        self.batches.get(&id)
    }

    /// All active batches, in ascending batch-id order.
    pub fn batches(&self) -> impl Iterator<Item = &Batch> {
        self.batches.values()
    }

    /// Active batches belonging to one item.
    pub fn batches_for<'a>(&'a self, item_name: &'a str) -> impl Iterator<Item = &'a Batch> {
        self.batches
            .values()
            .filter(move |b| b.item_name == item_name)
    }

    /// Total quantity on hand for an item, summed over its batches.
    pub fn total_on_hand(&self, item_name: &str) -> u32 {
        self.batches_for(item_name)
            .map(|b| b.quantity_on_hand)
            .sum()
    }

    /// Per-item totals in ascending item-name order.
    pub fn item_totals(&self) -> BTreeMap<&str, u32> {
        let mut totals: BTreeMap<&str, u32> = BTreeMap::new();
        for batch in self.batches.values() {
            *totals.entry(batch.item_name.as_str()).or_default() += batch.quantity_on_hand;
        }
        totals
    }

    pub fn len(&self) -> usize {
        self.batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }
}
