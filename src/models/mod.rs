//! Core data models for fintrack
//!
//! This module contains the data structures of the finance domain: accounts,
//! transactions, fixed expense templates, money and local dates.

pub mod account;
pub mod date;
pub mod fixed_expense;
pub mod ids;
pub mod money;
pub mod transaction;

pub use account::{Account, AccountType, AccountValidationError, UnknownAccountType};
pub use fixed_expense::FixedExpense;
pub use ids::{AccountId, FixedExpenseId, TransactionId};
pub use money::Money;
pub use transaction::{Transaction, TransactionDraft, TransactionKind, TransactionStatus};
