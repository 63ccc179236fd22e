// src/simulation/engine.rs

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::error::{EngineError, EngineWarning};
use crate::io::tables::{self, BatchRecord, ItemRecord};
use crate::model::batch::{BatchId, Ledger};
use crate::model::item::ItemCatalog;
use crate::model::status::{expiry_status, stock_status, ExpiryStatus, StockStatus};
use crate::policy::replenishment::{self, ReorderSuggestion};
use crate::simulation::config::SimulationConfig;
use crate::simulation::consumption;
use crate::simulation::history::{History, HistoryRecord};

/// What one tick did: which day it produced and what each item consumed.
#[derive(Debug)]
pub struct DayReport {
    pub day: u32,
    pub date: NaiveDate,
    pub consumed: BTreeMap<String, u32>,
    pub warnings: Vec<EngineWarning>,
}

/// One line of the status report handed to the display layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemStatusRow {
    pub item_name: String,
    pub total_qoh: u32,
    pub reorder_point: Option<u32>,
    pub stock_status: StockStatus,
    pub nearing_expiry_batches: usize,
    pub expired_batches: usize,
    pub earliest_expiry: Option<NaiveDate>,
}

/// Live state of a successfully initialized simulation.
#[derive(Debug)]
pub struct SimulationState {
    config: SimulationConfig,
    catalog: ItemCatalog,
    ledger: Ledger,
    history: History,
    current_date: NaiveDate,
    day_count: u32,
    rng: StdRng,
}

/// The simulation clock.
///
/// Construction via [`SimulationClock::load`] is the only way out of the
/// implicit uninitialized state: it lands in `Ready` on a good load and in
/// `Failed` otherwise. A `Failed` clock never crashes; every advance or
/// order operation on it is a no-op that reports [`EngineWarning::NotReady`].
#[derive(Debug)]
pub enum SimulationClock {
    Ready(SimulationState),
    Failed,
}

impl SimulationClock {
    /// Builds the clock from the loader's tables. An empty item table is a
    /// failed load (there is nothing to simulate); everything else degrades
    /// per row and is reported in the returned warnings.
    pub fn load(
        config: SimulationConfig,
        items: Vec<ItemRecord>,
        batches: Vec<BatchRecord>,
    ) -> (Self, Vec<EngineWarning>) {
        if items.is_empty() {
            warn!("item table is empty; simulation cannot initialize");
            let warning = EngineWarning::DataInconsistency {
                item_name: String::new(),
                detail: "item table is empty".to_string(),
            };
            return (SimulationClock::Failed, vec![warning]);
        }

        let (catalog, mut warnings) = tables::build_catalog(items);
        let (ledger, batch_warnings) = tables::build_ledger(batches, &catalog);
        warnings.extend(batch_warnings);

        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let current_date = config.start_date;
        info!(
            items = catalog.len(),
            batches = ledger.len(),
            start = %current_date,
            "simulation initialized"
        );

        let state = SimulationState {
            config,
            catalog,
            ledger,
            history: History::default(),
            current_date,
            day_count: 0,
            rng,
        };
        (SimulationClock::Ready(state), warnings)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, SimulationClock::Ready(_))
    }

    /// Advances the simulation by one calendar day: draw and consume demand
    /// for every item, then snapshot every item's total into the history.
    /// The whole day happens or none of it does.
    pub fn advance_one_day(&mut self) -> DayReport {
        let state = match self {
            SimulationClock::Ready(state) => state,
            SimulationClock::Failed => {
                warn!("advance requested on a clock that is not ready; ignored");
                return DayReport {
                    day: 0,
                    date: NaiveDate::MIN,
                    consumed: BTreeMap::new(),
                    warnings: vec![EngineWarning::NotReady],
                };
            }
        };

        let Some(next_date) = state.current_date.succ_opt() else {
            // Calendar overflow; nothing sensible to advance into.
            warn!(date = %state.current_date, "cannot advance past the end of the calendar");
            return DayReport {
                day: state.day_count,
                date: state.current_date,
                consumed: BTreeMap::new(),
                warnings: vec![EngineWarning::DataInconsistency {
                    item_name: String::new(),
                    detail: "calendar overflow".to_string(),
                }],
            };
        };

        state.day_count += 1;
        state.current_date = next_date;

        let outcome = consumption::consume_day(
            &state.ledger,
            &state.catalog,
            state.current_date,
            &mut state.rng,
        );
        state.ledger = outcome.ledger;

        for item in state.catalog.iter() {
            state.history.record_day(
                state.day_count,
                &item.name,
                state.ledger.total_on_hand(&item.name),
            );
        }

        DayReport {
            day: state.day_count,
            date: state.current_date,
            consumed: outcome.consumed,
            warnings: outcome.warnings,
        }
    }

    /// Seven sequential day ticks. Ledger mutation and history snapshots
    /// happen per day; statuses are derived on demand from the final state.
    pub fn advance_one_week(&mut self) -> Vec<DayReport> {
        (0..7).map(|_| self.advance_one_day()).collect()
    }

    /// Receives one recommended order for `item_name` at the current
    /// simulated date, outside the tick cycle.
    ///
    /// On a clock that never initialized nothing happens and the returned
    /// warnings carry [`EngineWarning::NotReady`], so the caller is told the
    /// ledger was not touched.
    pub fn receive_order(&mut self, item_name: &str) -> Result<Vec<EngineWarning>, EngineError> {
        let SimulationClock::Ready(state) = self else {
            warn!("receive_order on a clock that is not ready; ignored");
            return Ok(vec![EngineWarning::NotReady]);
        };
        state.ledger = replenishment::receive_batch(
            &state.ledger,
            &state.catalog,
            item_name,
            state.current_date,
        )?;
        Ok(Vec::new())
    }

    /// Discards a batch entirely (expired or damaged stock), outside the
    /// tick cycle. Same not-ready contract as [`Self::receive_order`].
    pub fn discard_batch(&mut self, batch_id: BatchId) -> Result<Vec<EngineWarning>, EngineError> {
        let SimulationClock::Ready(state) = self else {
            warn!("discard_batch on a clock that is not ready; ignored");
            return Ok(vec![EngineWarning::NotReady]);
        };
        state.ledger = state.ledger.discard_batch(batch_id)?;
        Ok(Vec::new())
    }

    /// Days simulated so far; day 0 is the state as loaded.
    pub fn day_count(&self) -> u32 {
        match self {
            SimulationClock::Ready(state) => state.day_count,
            SimulationClock::Failed => 0,
        }
    }

    pub fn current_date(&self) -> Option<NaiveDate> {
        match self {
            SimulationClock::Ready(state) => Some(state.current_date),
            SimulationClock::Failed => None,
        }
    }

    pub fn ledger(&self) -> Option<&Ledger> {
        match self {
            SimulationClock::Ready(state) => Some(&state.ledger),
            SimulationClock::Failed => None,
        }
    }

    pub fn history(&self) -> &[HistoryRecord] {
        match self {
            SimulationClock::Ready(state) => state.history.records(),
            SimulationClock::Failed => &[],
        }
    }

    /// Day-indexed quantity series per item, for the trend display.
    pub fn history_series(&self) -> BTreeMap<&str, Vec<(u32, u32)>> {
        match self {
            SimulationClock::Ready(state) => state.history.series_by_item(),
            SimulationClock::Failed => BTreeMap::new(),
        }
    }

    /// Items at or below their reorder point, in catalog order.
    pub fn reorder_suggestions(&self) -> Vec<ReorderSuggestion> {
        match self {
            SimulationClock::Ready(state) => {
                replenishment::reorder_suggestions(&state.catalog, &state.ledger)
            }
            SimulationClock::Failed => Vec::new(),
        }
    }

    /// Per-item stock and expiry summary at the current simulated date, in
    /// catalog order.
    pub fn status_report(&self) -> Vec<ItemStatusRow> {
        let SimulationClock::Ready(state) = self else {
            return Vec::new();
        };
        let window = state.config.expiry_alert_window_days;

        state
            .catalog
            .iter()
            .map(|item| {
                let total_qoh = state.ledger.total_on_hand(&item.name);
                let mut nearing = 0;
                let mut expired = 0;
                let mut earliest: Option<NaiveDate> = None;
                for batch in state.ledger.batches_for(&item.name) {
                    match expiry_status(batch.expiry_date, state.current_date, window) {
                        ExpiryStatus::NearingExpiry => nearing += 1,
                        ExpiryStatus::Expired => expired += 1,
                        ExpiryStatus::Ok | ExpiryStatus::Unknown => {}
                    }
                    if let Some(expiry) = batch.expiry_date {
                        earliest = Some(earliest.map_or(expiry, |e| e.min(expiry)));
                    }
                }
                ItemStatusRow {
                    item_name: item.name.clone(),
                    total_qoh,
                    reorder_point: item.reorder_point(),
                    stock_status: stock_status(total_qoh, item.reorder_point()),
                    nearing_expiry_batches: nearing,
                    expired_batches: expired,
                    earliest_expiry: earliest,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn item_record(name: &str, min: u32, max: u32) -> ItemRecord {
        ItemRecord {
            item_name: name.to_string(),
            min_daily_usage: min,
            max_daily_usage: max,
            buffer_days: 2,
            target_days: 10,
            standard_shelf_life_months: 6,
        }
    }

    fn batch_record(id: u64, item: &str, qty: u32, expiry: &str) -> BatchRecord {
        BatchRecord {
            batch_id: id,
            item_name: item.to_string(),
            quantity_on_hand: qty,
            expiry_date: Some(expiry.to_string()),
        }
    }

    fn ready_clock() -> SimulationClock {
        let config = SimulationConfig::new(date(2024, 1, 1)).with_seed(42);
        let (clock, warnings) = SimulationClock::load(
            config,
            vec![
                item_record("Gauze", 1, 3),
                item_record("Syringe 5ml", 2, 2),
            ],
            vec![
                batch_record(1, "Gauze", 30, "2024-06-01"),
                batch_record(2, "Syringe 5ml", 40, "2024-09-01"),
            ],
        );
        assert!(warnings.is_empty());
        clock
    }

    #[test]
    fn empty_item_table_fails_the_load() {
        let (clock, warnings) =
            SimulationClock::load(SimulationConfig::new(date(2024, 1, 1)), vec![], vec![]);
        assert!(!clock.is_ready());
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn failed_clock_no_ops_with_a_warning() {
        let (mut clock, _) =
            SimulationClock::load(SimulationConfig::new(date(2024, 1, 1)), vec![], vec![]);

        let report = clock.advance_one_day();
        assert_eq!(report.warnings, vec![EngineWarning::NotReady]);
        assert_eq!(clock.day_count(), 0);
        assert!(clock.history().is_empty());
        assert!(clock.status_report().is_empty());

        // Order operations do nothing, and say so in the returned warnings
        // rather than posing as a success.
        assert_eq!(
            clock.receive_order("Gauze"),
            Ok(vec![EngineWarning::NotReady])
        );
        assert_eq!(
            clock.discard_batch(BatchId(1)),
            Ok(vec![EngineWarning::NotReady])
        );
        assert!(clock.ledger().is_none());
    }

    #[test]
    fn a_day_tick_advances_counter_date_and_history() {
        let mut clock = ready_clock();
        let report = clock.advance_one_day();

        assert_eq!(report.day, 1);
        assert_eq!(report.date, date(2024, 1, 2));
        assert_eq!(clock.day_count(), 1);
        assert_eq!(clock.current_date(), Some(date(2024, 1, 2)));
        // One history record per catalog item, even for untouched items.
        assert_eq!(clock.history().len(), 2);
        assert!(clock
            .history()
            .iter()
            .all(|r| r.day == 1));
    }

    #[test]
    fn a_week_is_seven_days_of_records_with_increasing_days() {
        let mut clock = ready_clock();
        let reports = clock.advance_one_week();

        assert_eq!(reports.len(), 7);
        assert_eq!(clock.day_count(), 7);
        assert_eq!(clock.current_date(), Some(date(2024, 1, 8)));
        // 7 days x 2 items.
        assert_eq!(clock.history().len(), 14);

        let series = clock.history_series();
        let days: Vec<u32> = series["Gauze"].iter().map(|&(d, _)| d).collect();
        assert_eq!(days, vec![1, 2, 3, 4, 5, 6, 7]);
        // Fixed-demand item drains exactly 2/day.
        let syringe: Vec<u32> = series["Syringe 5ml"].iter().map(|&(_, q)| q).collect();
        assert_eq!(syringe, vec![38, 36, 34, 32, 30, 28, 26]);
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let mut a = ready_clock();
        let mut b = ready_clock();
        a.advance_one_week();
        b.advance_one_week();
        assert_eq!(a.history(), b.history());
    }

    #[test]
    fn receive_order_adds_stock_at_the_current_date() {
        let mut clock = ready_clock();
        clock.advance_one_day();
        clock.receive_order("Gauze").unwrap();

        let ledger = clock.ledger().unwrap();
        assert!(ledger.total_on_hand("Gauze") > 30 - 3);
        // New batch expires six calendar months after day 1's date.
        let newest = ledger.batches_for("Gauze").last().unwrap();
        assert_eq!(newest.quantity_on_hand, 30);
        assert_eq!(newest.expiry_date, Some(date(2024, 7, 2)));

        assert_eq!(
            clock.receive_order("Bandage"),
            Err(EngineError::UnknownItem("Bandage".to_string()))
        );
    }

    #[test]
    fn discard_batch_removes_stock_outside_the_tick_cycle() {
        let mut clock = ready_clock();
        clock.discard_batch(BatchId(1)).unwrap();
        assert_eq!(clock.ledger().unwrap().total_on_hand("Gauze"), 0);
        assert_eq!(
            clock.discard_batch(BatchId(1)),
            Err(EngineError::BatchNotFound(BatchId(1)))
        );
    }

    #[test]
    fn status_report_counts_expiry_alerts_per_item() {
        let config = SimulationConfig::new(date(2024, 5, 20)).with_seed(1);
        let (clock, _) = SimulationClock::load(
            config,
            vec![item_record("Gauze", 0, 0)],
            vec![
                batch_record(1, "Gauze", 5, "2024-05-01"), // expired
                batch_record(2, "Gauze", 5, "2024-06-01"), // nearing
                batch_record(3, "Gauze", 5, "2024-12-01"), // ok
            ],
        );

        let rows = clock.status_report();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.total_qoh, 15);
        assert_eq!(row.expired_batches, 1);
        assert_eq!(row.nearing_expiry_batches, 1);
        assert_eq!(row.earliest_expiry, Some(date(2024, 5, 1)));
        assert_eq!(row.stock_status, StockStatus::Ok);
    }

    #[test]
    fn narrower_alert_window_mutes_farther_expiries() {
        let items = vec![item_record("Gauze", 0, 0)];
        let batches = vec![
            batch_record(1, "Gauze", 5, "2024-05-25"),
            batch_record(2, "Gauze", 5, "2024-06-01"),
        ];

        let default_window = SimulationConfig::new(date(2024, 5, 20)).with_seed(1);
        let (clock, _) = SimulationClock::load(default_window, items.clone(), batches.clone());
        assert_eq!(clock.status_report()[0].nearing_expiry_batches, 2);

        let week_window = SimulationConfig::new(date(2024, 5, 20))
            .with_seed(1)
            .with_alert_window(7);
        let (clock, _) = SimulationClock::load(week_window, items, batches);
        // Only the batch expiring within 7 days still alerts.
        assert_eq!(clock.status_report()[0].nearing_expiry_batches, 1);
    }
}
