use serde::Serialize;
use std::collections::BTreeMap;

/// One per-item, per-day snapshot of total quantity on hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryRecord {
    pub day: u32,
    pub item_name: String,
    pub total_qoh: u32,
}

/// Append-only log of daily snapshots, one set per simulated day. Records
/// are never rewritten or compacted; the trend display reads them as
/// `(day, item) -> total_qoh`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct History {
    records: Vec<HistoryRecord>,
}

impl History {
    pub fn record_day(&mut self, day: u32, item_name: &str, total_qoh: u32) {
        self.records.push(HistoryRecord {
            day,
            item_name: item_name.to_string(),
            total_qoh,
        });
    }

    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    /// Records for a subset of items, in append order.
    pub fn for_items<'a>(
        &'a self,
        item_names: &'a [&'a str],
    ) -> impl Iterator<Item = &'a HistoryRecord> {
        self.records
            .iter()
            .filter(move |r| item_names.contains(&r.item_name.as_str()))
    }

    /// Pivots the log into one day-indexed series per item, for charting.
    pub fn series_by_item(&self) -> BTreeMap<&str, Vec<(u32, u32)>> {
        let mut series: BTreeMap<&str, Vec<(u32, u32)>> = BTreeMap::new();
        for record in &self.records {
            series
                .entry(record.item_name.as_str())
                .or_default()
                .push((record.day, record.total_qoh));
        }
        series
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
