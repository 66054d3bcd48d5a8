//! Base error type.
//!
//! Sub-crates define their own error enums and wrap `DsError` as one variant
//! via `From`.  The scheduling engine itself never fails: malformed input is
//! normalized rather than rejected (see [`crate::workload`]).

use thiserror::Error;

/// The top-level error type for `ds-core` and a common base for sub-crates.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DsError {
    #[error("parse error: {0}")]
    Parse(String),
}

/// Shorthand result type for all `ds-*` crates.
pub type DsResult<T> = Result<T, DsError>;
