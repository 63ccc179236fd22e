// src/simulation/config.rs

use chrono::NaiveDate;

use crate::model::status::DEFAULT_EXPIRY_ALERT_WINDOW_DAYS;

#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Calendar date of day 0 (the state as loaded, before any tick).
    pub start_date: NaiveDate,
    /// Days ahead of expiry at which batches raise a NearingExpiry alert.
    pub expiry_alert_window_days: u32,
    /// Fixed RNG seed for reproducible runs; `None` seeds from the OS.
    pub rng_seed: Option<u64>,
}

impl SimulationConfig {
    pub fn new(start_date: NaiveDate) -> Self {
        Self {
            start_date,
            expiry_alert_window_days: DEFAULT_EXPIRY_ALERT_WINDOW_DAYS,
            rng_seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn with_alert_window(mut self, days: u32) -> Self {
        self.expiry_alert_window_days = days;
        self
    }
}
