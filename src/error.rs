// src/error.rs

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::model::batch::BatchId;

/// Hard failures: the operation is rejected and the ledger is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("unknown item `{0}`")]
    UnknownItem(String),

    #[error("batch {0} not found")]
    BatchNotFound(BatchId),
}

/// Soft faults: the engine degrades per item/batch and keeps running.
///
/// Every warning is also emitted through `tracing::warn!` at the point of
/// detection; the enum exists so the caller (table UI, report writer) can
/// render what happened without scraping log output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum EngineWarning {
    /// Broken item parameters (min > max usage, arithmetic overflow, empty
    /// input table). The engine substitutes a conservative value.
    DataInconsistency { item_name: String, detail: String },

    /// An expiry date that could not be parsed; treated as absent, which
    /// downgrades the batch's expiry classification to Unknown.
    UnparseableDate { batch_id: BatchId, raw: String },

    /// An advance/order operation was attempted on a clock that never
    /// initialized. The operation is a no-op.
    NotReady,
}

impl fmt::Display for EngineWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineWarning::DataInconsistency { item_name, detail } => {
                write!(f, "data inconsistency for `{item_name}`: {detail}")
            }
            EngineWarning::UnparseableDate { batch_id, raw } => {
                write!(f, "unparseable expiry date `{raw}` on batch {batch_id}")
            }
            EngineWarning::NotReady => write!(f, "simulation clock is not ready"),
        }
    }
}
