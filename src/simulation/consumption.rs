// src/simulation/consumption.rs
//
// The FEFO daily allocator: draw a bounded-random demand per item and consume
// it against that item's batches in expiry order.

use chrono::NaiveDate;
use rand::Rng;
use std::collections::BTreeMap;
use tracing::warn;

use crate::error::EngineWarning;
use crate::model::batch::{BatchId, Ledger};
use crate::model::item::{Item, ItemCatalog};

/// Outcome of one simulated day of consumption across the whole catalog.
#[derive(Debug)]
pub struct DayConsumption {
    /// The ledger after all items have consumed.
    pub ledger: Ledger,
    /// Units actually consumed per item (may fall short of the drawn demand
    /// on a stockout).
    pub consumed: BTreeMap<String, u32>,
    pub warnings: Vec<EngineWarning>,
}

/// Runs one day of consumption for every catalog item, in canonical item
/// order. Items are independent; the order matters only for reproducibility
/// of the random draws.
pub fn consume_day(
    ledger: &Ledger,
    catalog: &ItemCatalog,
    current_date: NaiveDate,
    rng: &mut impl Rng,
) -> DayConsumption {
    let mut next = ledger.clone();
    let mut consumed = BTreeMap::new();
    let mut warnings = Vec::new();

    for item in catalog.iter() {
        let (demand, warning) = draw_demand(item, rng);
        if let Some(warning) = warning {
            warnings.push(warning);
        }
        let taken = consume_item(&mut next, &item.name, demand, current_date);
        consumed.insert(item.name.clone(), taken);
    }

    DayConsumption {
        ledger: next,
        consumed,
        warnings,
    }
}

/// Draws the day's demand for one item.
///
/// `min > max` is a data inconsistency: the run continues with the lower
/// bound rather than failing (conservative choice, matching the warning the
/// caller sees). `min == max` is a fixed draw with no randomness.
fn draw_demand(item: &Item, rng: &mut impl Rng) -> (u32, Option<EngineWarning>) {
    let (min, max) = (item.min_daily_usage, item.max_daily_usage);
    if min > max {
        warn!(
            item = item.name.as_str(),
            min, max, "min daily usage exceeds max; using min"
        );
        let warning = EngineWarning::DataInconsistency {
            item_name: item.name.clone(),
            detail: format!("min daily usage {min} exceeds max {max}; using min"),
        };
        (min, Some(warning))
    } else if min == max {
        (min, None)
    } else {
        (rng.gen_range(min..=max), None)
    }
}

/// Consumes up to `demand` units of one item, soonest expiry first.
///
/// Only batches with a known expiry on or after `current_date` are eligible;
/// expired or dateless batches stay on the ledger untouched until someone
/// discards them. Demand beyond the eligible stock is lost (stockout, not an
/// error). Returns the units actually consumed.
fn consume_item(ledger: &mut Ledger, item_name: &str, demand: u32, current_date: NaiveDate) -> u32 {
    if demand == 0 {
        return 0;
    }

    // (expiry, id) sort key: expiry order with batch id as the deterministic
    // tie-breaker.
    let mut eligible: Vec<(NaiveDate, BatchId)> = ledger
        .batches_for(item_name)
        .filter_map(|b| match b.expiry_date {
            Some(expiry) if expiry >= current_date => Some((expiry, b.id)),
            _ => None,
        })
        .collect();
    eligible.sort();

    let mut remaining = demand;
    for (_, id) in eligible {
        if remaining == 0 {
            break;
        }
        remaining -= ledger.decrement_in_place(id, remaining);
    }
    demand - remaining
}
