//! Batch-level inventory simulation engine for perishable stock.
//!
//! Stock is tracked as discrete, dated batches per item rather than a single
//! quantity counter. Each simulated day draws a bounded-random demand per
//! item and consumes it First-Expired-First-Out across that item's batches;
//! the clock records a per-item history snapshot after every tick. Status
//! classification, replenishment suggestions and manual batch operations
//! (receive, discard) act on the same ledger outside the tick cycle.
//!
//! Display, storage and command surfaces live outside this crate: they feed
//! the engine plain [`io::tables`] records and read back ledgers, status
//! rows and history series.

pub mod error;
pub mod io;
pub mod model;
pub mod policy;
pub mod simulation;

pub use error::{EngineError, EngineWarning};
pub use io::tables::{BatchRecord, ItemRecord};
pub use model::batch::{Batch, BatchId, Ledger};
pub use model::item::{Item, ItemCatalog};
pub use model::status::{
    expiry_status, stock_status, ExpiryStatus, StockStatus, DEFAULT_EXPIRY_ALERT_WINDOW_DAYS,
};
pub use policy::replenishment::{receive_batch, reorder_suggestions, ReorderSuggestion};
pub use simulation::config::SimulationConfig;
pub use simulation::engine::{DayReport, ItemStatusRow, SimulationClock};
pub use simulation::history::{History, HistoryRecord};
