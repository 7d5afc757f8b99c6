//! Error types for fintrack
//!
//! One `thiserror` enum covers the library. The binary wraps it in
//! `anyhow` at the top level.

use std::fmt;

use thiserror::Error;

/// Kind of stored record an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Account,
    Transaction,
    FixedExpense,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Account => write!(f, "Account"),
            Self::Transaction => write!(f, "Transaction"),
            Self::FixedExpense => write!(f, "Fixed expense"),
        }
    }
}

#[derive(Error, Debug)]
pub enum FinanceError {
    /// Unreadable settings or an unusable data directory
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),

    /// A data file or audit line that is not valid JSON
    #[error("JSON error: {0}")]
    Json(String),

    /// Rejected user input: bad amounts, dates, names or due days
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{kind} not found: {identifier}")]
    NotFound { kind: RecordKind, identifier: String },

    #[error("{kind} already exists: {identifier}")]
    Duplicate { kind: RecordKind, identifier: String },

    /// Poisoned collection lock or a failed write
    #[error("Storage error: {0}")]
    Storage(String),
}

impl FinanceError {
    pub fn not_found(kind: RecordKind, identifier: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            identifier: identifier.into(),
        }
    }

    pub fn duplicate(kind: RecordKind, identifier: impl Into<String>) -> Self {
        Self::Duplicate {
            kind,
            identifier: identifier.into(),
        }
    }

    pub fn account_not_found(identifier: impl Into<String>) -> Self {
        Self::not_found(RecordKind::Account, identifier)
    }

    pub fn transaction_not_found(identifier: impl Into<String>) -> Self {
        Self::not_found(RecordKind::Transaction, identifier)
    }

    pub fn fixed_expense_not_found(identifier: impl Into<String>) -> Self {
        Self::not_found(RecordKind::FixedExpense, identifier)
    }

    /// A short id that names more than one record
    pub fn ambiguous(kind: RecordKind, identifier: &str, matches: usize) -> Self {
        Self::Validation(format!(
            "Ambiguous id '{}': {} {} records match, use more characters",
            identifier.trim(),
            matches,
            kind
        ))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for FinanceError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for FinanceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

pub type FinanceResult<T> = Result<T, FinanceError>;
