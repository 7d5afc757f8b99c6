//! Service layer for fintrack
//!
//! Pure computations (balance aggregation, calendar grids) and the entity
//! services that validate and persist through a [`crate::storage::FinanceStore`].

pub mod account;
pub mod aggregate;
pub mod calendar;
pub mod fixed_expense;
pub mod transaction;

use crate::error::{FinanceError, FinanceResult, RecordKind};

/// The one record matching a typed id, `None` when nothing matches.
/// A fragment that fits several records is an error rather than a guess.
fn single_match<T>(
    records: Vec<T>,
    kind: RecordKind,
    identifier: &str,
    is_match: impl Fn(&T) -> bool,
) -> FinanceResult<Option<T>> {
    let mut matches: Vec<T> = records.into_iter().filter(|r| is_match(r)).collect();
    match matches.len() {
        0 | 1 => Ok(matches.pop()),
        n => Err(FinanceError::ambiguous(kind, identifier, n)),
    }
}

pub use account::{AccountBalance, AccountService};
pub use aggregate::{aggregate, BalanceSummary, CategoryShare, CategoryTotal, PeriodTotals};
pub use calendar::{build_month_grid, Cell, DayCell, MonthCursor, Week};
pub use fixed_expense::{FixedExpenseService, Registration, RegistrationSummary};
pub use transaction::{TransactionFilter, TransactionService};
