// src/io/tables.rs
//
// Input contracts for the external loader. The engine owns no storage
// format; whoever seeds and reads the database hands over plain records and
// the conversions here turn them into the typed catalog and ledger.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::EngineWarning;
use crate::model::batch::{Batch, BatchId, Ledger};
use crate::model::item::{Item, ItemCatalog};

/// One row of the item parameter table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub item_name: String,
    pub min_daily_usage: u32,
    pub max_daily_usage: u32,
    pub buffer_days: u32,
    pub target_days: u32,
    pub standard_shelf_life_months: u32,
}

impl From<ItemRecord> for Item {
    fn from(record: ItemRecord) -> Self {
        Item {
            name: record.item_name,
            min_daily_usage: record.min_daily_usage,
            max_daily_usage: record.max_daily_usage,
            buffer_days: record.buffer_days,
            target_days: record.target_days,
            standard_shelf_life_months: record.standard_shelf_life_months,
        }
    }
}

/// One row of the batch table. `expiry_date` is an optional ISO `YYYY-MM-DD`
/// string; anything unparseable downgrades to an unknown expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRecord {
    pub batch_id: u64,
    pub item_name: String,
    pub quantity_on_hand: u32,
    pub expiry_date: Option<String>,
}

impl BatchRecord {
    fn into_batch(self) -> (Batch, Option<EngineWarning>) {
        let id = BatchId(self.batch_id);
        let (expiry_date, warning) = match self.expiry_date {
            None => (None, None),
            Some(raw) => match raw.parse::<chrono::NaiveDate>() {
                Ok(date) => (Some(date), None),
                Err(_) => {
                    warn!(batch = %id, raw = raw.as_str(), "unparseable expiry date; treating as unknown");
                    (
                        None,
                        Some(EngineWarning::UnparseableDate { batch_id: id, raw }),
                    )
                }
            },
        };
        (
            Batch {
                id,
                item_name: self.item_name,
                quantity_on_hand: self.quantity_on_hand,
                expiry_date,
            },
            warning,
        )
    }
}

/// Converts item rows into the catalog. `item_name` is the unique key: a
/// repeated name keeps the first row and drops the rest with a warning.
pub fn build_catalog(records: Vec<ItemRecord>) -> (ItemCatalog, Vec<EngineWarning>) {
    let mut warnings = Vec::new();
    let mut items: Vec<Item> = Vec::with_capacity(records.len());

    for record in records {
        if items.iter().any(|i| i.name == record.item_name) {
            warn!(
                item = record.item_name.as_str(),
                "duplicate item row; keeping the first"
            );
            warnings.push(EngineWarning::DataInconsistency {
                item_name: record.item_name,
                detail: "duplicate item row; keeping the first".to_string(),
            });
            continue;
        }
        items.push(Item::from(record));
    }

    (ItemCatalog::from_items(items), warnings)
}

/// Converts batch rows into the initial ledger. Rows pointing at items the
/// catalog does not know, and rows reusing an already-seen `batch_id`, are
/// dropped with a warning; the rest of the load proceeds.
pub fn build_ledger(
    records: Vec<BatchRecord>,
    catalog: &ItemCatalog,
) -> (Ledger, Vec<EngineWarning>) {
    let mut warnings = Vec::new();
    let mut batches: Vec<Batch> = Vec::with_capacity(records.len());

    for record in records {
        if batches.iter().any(|b| b.id.0 == record.batch_id) {
            warn!(
                batch = record.batch_id,
                item = record.item_name.as_str(),
                "duplicate batch id; keeping the first"
            );
            warnings.push(EngineWarning::DataInconsistency {
                item_name: record.item_name.clone(),
                detail: format!("duplicate batch id {}; keeping the first", record.batch_id),
            });
            continue;
        }
        if !catalog.contains(&record.item_name) {
            warn!(
                batch = record.batch_id,
                item = record.item_name.as_str(),
                "batch references unknown item; dropped from load"
            );
            warnings.push(EngineWarning::DataInconsistency {
                item_name: record.item_name.clone(),
                detail: format!("batch {} references an unknown item", record.batch_id),
            });
            continue;
        }
        let (batch, warning) = record.into_batch();
        warnings.extend(warning);
        batches.push(batch);
    }

    (Ledger::from_batches(batches), warnings)
}
