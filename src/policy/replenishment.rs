// src/policy/replenishment.rs

use chrono::{Months, NaiveDate};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::EngineError;
use crate::model::batch::Ledger;
use crate::model::item::ItemCatalog;
use crate::model::status::{stock_status, StockStatus};

/// One line of the reorder report: this item is at or below its reorder
/// point, order this much.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReorderSuggestion {
    pub item_name: String,
    pub recommended_qty: u32,
}

/// Walks the catalog in canonical order and lists every item whose on-hand
/// total classifies as ReorderNeeded, together with its recommended order
/// quantity. Items whose thresholds cannot be derived are skipped (they
/// already surface as `StockStatus::Error` in the status report).
pub fn reorder_suggestions(catalog: &ItemCatalog, ledger: &Ledger) -> Vec<ReorderSuggestion> {
    catalog
        .iter()
        .filter_map(|item| {
            let qoh = ledger.total_on_hand(&item.name);
            match (stock_status(qoh, item.reorder_point()), item.reorder_quantity()) {
                (StockStatus::ReorderNeeded, Some(qty)) => Some(ReorderSuggestion {
                    item_name: item.name.clone(),
                    recommended_qty: qty,
                }),
                _ => None,
            }
        })
        .collect()
}

/// Simulates receiving one recommended order for `item_name`: a new batch of
/// `reorder_quantity` units, expiring `standard_shelf_life_months` calendar
/// months after `current_date`. Item parameters are untouched; only the
/// ledger changes.
///
/// Fails with `UnknownItem` when the item is not in the catalog, leaving the
/// ledger as it was. An item whose order quantity cannot be derived receives
/// nothing (conservative default), with a warning rather than a failure.
pub fn receive_batch(
    ledger: &Ledger,
    catalog: &ItemCatalog,
    item_name: &str,
    current_date: NaiveDate,
) -> Result<Ledger, EngineError> {
    let item = catalog
        .get(item_name)
        .ok_or_else(|| EngineError::UnknownItem(item_name.to_string()))?;

    let Some(quantity) = item.reorder_quantity() else {
        warn!(item = item_name, "reorder quantity overflows; nothing received");
        return Ok(ledger.clone());
    };

    let expiry_date = current_date.checked_add_months(Months::new(item.standard_shelf_life_months));
    let (next, id) = ledger.receive(item_name, quantity, expiry_date);
    info!(
        item = item_name,
        batch = %id,
        quantity,
        expiry = ?expiry_date,
        "received replenishment batch"
    );
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::item::Item;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn item(name: &str, max_usage: u32, buffer: u32, target: u32, shelf: u32) -> Item {
        Item {
            name: name.to_string(),
            min_daily_usage: 0,
            max_daily_usage: max_usage,
            buffer_days: buffer,
            target_days: target,
            standard_shelf_life_months: shelf,
        }
    }

    #[test]
    fn received_batch_carries_roq_and_shelf_life_expiry() {
        let catalog = ItemCatalog::from_items(vec![item("Amoxicillin 250mg", 5, 2, 10, 6)]);
        let ledger = Ledger::default();

        let next = receive_batch(&ledger, &catalog, "Amoxicillin 250mg", date(2024, 1, 15)).unwrap();

        let batch = next.batches().next().unwrap();
        assert_eq!(batch.quantity_on_hand, 50);
        // Calendar months, not a fixed day count.
        assert_eq!(batch.expiry_date, Some(date(2024, 7, 15)));
    }

    #[test]
    fn month_arithmetic_clamps_to_the_end_of_shorter_months() {
        let catalog = ItemCatalog::from_items(vec![item("Vaccine Rabies", 2, 3, 7, 1)]);
        let ledger = Ledger::default();

        let next = receive_batch(&ledger, &catalog, "Vaccine Rabies", date(2024, 1, 31)).unwrap();
        let batch = next.batches().next().unwrap();
        assert_eq!(batch.expiry_date, Some(date(2024, 2, 29)));
    }

    #[test]
    fn unknown_item_is_rejected_and_ledger_is_unchanged() {
        let catalog = ItemCatalog::from_items(vec![item("Gauze", 5, 2, 10, 6)]);
        let ledger = Ledger::default();

        let err = receive_batch(&ledger, &catalog, "Bandage", date(2024, 1, 15)).unwrap_err();
        assert_eq!(err, EngineError::UnknownItem("Bandage".to_string()));
        assert!(ledger.is_empty());
    }

    #[test]
    fn suggestions_list_only_reorder_needed_items_in_catalog_order() {
        let catalog = ItemCatalog::from_items(vec![
            item("Zinc Supplement", 2, 5, 10, 6),  // rop 10
            item("Aspirin", 5, 2, 10, 6),          // rop 10
            item("Gauze", 1, 4, 8, 6),             // rop 4
        ]);
        let ledger = Ledger::default()
            .receive("Zinc Supplement", 9, None) // at/below rop
            .0
            .receive("Aspirin", 10, None) // exactly rop
            .0
            .receive("Gauze", 50, None) // well above
            .0;

        let suggestions = reorder_suggestions(&catalog, &ledger);
        let names: Vec<&str> = suggestions.iter().map(|s| s.item_name.as_str()).collect();
        assert_eq!(names, vec!["Aspirin", "Zinc Supplement"]);
        assert_eq!(suggestions[0].recommended_qty, 50);
        assert_eq!(suggestions[1].recommended_qty, 20);
    }
}
