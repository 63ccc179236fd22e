// src/model/status.rs
//
// Pure classifiers. Same inputs always yield the same output; nothing here
// touches the ledger or the clock.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

/// Days ahead of expiry at which a batch starts raising an alert.
pub const DEFAULT_EXPIRY_ALERT_WINDOW_DAYS: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StockStatus {
    Ok,
    LowStock,
    ReorderNeeded,
    /// Classification failed (the reorder point could not be derived).
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExpiryStatus {
    Expired,
    NearingExpiry,
    Ok,
    /// Expiry date absent or unparseable.
    Unknown,
}

/// Classifies quantity on hand against a reorder point.
///
/// `qoh <= rop` is ReorderNeeded, `rop < qoh <= rop * 1.25` is LowStock,
/// anything above is Ok. The 1.25 boundary is evaluated as `4 * qoh <= 5 *
/// rop` in u64 so there is no float rounding at the edge. A missing reorder
/// point (overflowed derivation) reports Error instead of guessing.
pub fn stock_status(qoh: u32, rop: Option<u32>) -> StockStatus {
    let Some(rop) = rop else {
        return StockStatus::Error;
    };
    if qoh <= rop {
        StockStatus::ReorderNeeded
    } else if 4 * u64::from(qoh) <= 5 * u64::from(rop) {
        StockStatus::LowStock
    } else {
        StockStatus::Ok
    }
}

/// Classifies a batch expiry date against the current simulated date.
///
/// Comparison is on calendar dates only; there is no time-of-day component
/// anywhere in the engine, so a batch expiring today is NearingExpiry (still
/// usable today), and Expired strictly after its date has passed.
pub fn expiry_status(
    expiry_date: Option<NaiveDate>,
    current_date: NaiveDate,
    alert_window_days: u32,
) -> ExpiryStatus {
    let Some(expiry) = expiry_date else {
        return ExpiryStatus::Unknown;
    };
    if expiry < current_date {
        return ExpiryStatus::Expired;
    }
    match current_date.checked_add_signed(Duration::days(i64::from(alert_window_days))) {
        Some(window_end) if expiry >= window_end => ExpiryStatus::Ok,
        // A window running off the end of the calendar contains every
        // representable expiry date.
        _ => ExpiryStatus::NearingExpiry,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn stock_status_boundaries() {
        assert_eq!(stock_status(10, Some(10)), StockStatus::ReorderNeeded);
        assert_eq!(stock_status(11, Some(10)), StockStatus::LowStock);
        // 12.5 rounds nowhere: 12 is low, 13 is ok.
        assert_eq!(stock_status(12, Some(10)), StockStatus::LowStock);
        assert_eq!(stock_status(13, Some(10)), StockStatus::Ok);
        assert_eq!(stock_status(0, Some(0)), StockStatus::ReorderNeeded);
    }

    #[test]
    fn stock_status_without_a_reorder_point_is_an_error() {
        assert_eq!(stock_status(50, None), StockStatus::Error);
    }

    #[test]
    fn expiry_status_is_a_strict_date_comparison() {
        let today = date(2024, 3, 15);
        assert_eq!(
            expiry_status(Some(date(2024, 3, 14)), today, 30),
            ExpiryStatus::Expired
        );
        // Expiring today is still usable today.
        assert_eq!(
            expiry_status(Some(today), today, 30),
            ExpiryStatus::NearingExpiry
        );
        // Day 29 of the window alerts, day 30 does not.
        assert_eq!(
            expiry_status(Some(date(2024, 4, 13)), today, 30),
            ExpiryStatus::NearingExpiry
        );
        assert_eq!(
            expiry_status(Some(date(2024, 4, 14)), today, 30),
            ExpiryStatus::Ok
        );
    }

    #[test]
    fn window_past_the_end_of_the_calendar_does_not_panic() {
        let today = NaiveDate::MAX;
        assert_eq!(
            expiry_status(Some(NaiveDate::MAX), today, 30),
            ExpiryStatus::NearingExpiry
        );
        assert_eq!(
            expiry_status(Some(date(2024, 1, 1)), today, 30),
            ExpiryStatus::Expired
        );
    }

    #[test]
    fn absent_expiry_is_unknown_not_an_error() {
        let today = date(2024, 3, 15);
        assert_eq!(expiry_status(None, today, 30), ExpiryStatus::Unknown);
    }
}
