use chrono::NaiveDate;
use thiserror::Error;

/// Error types for the ledger module
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// A reporting span whose end date precedes its start date.
    #[error("Invalid date span: {start} to {end}")]
    InvalidSpan { start: NaiveDate, end: NaiveDate },
}

/// Type alias for Result with LedgerError
pub type Result<T> = std::result::Result<T, LedgerError>;
