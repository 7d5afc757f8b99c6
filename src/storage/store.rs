//! The store capability handed to services.

use crate::audit::AuditEntry;
use crate::error::FinanceResult;
use crate::models::{Account, FixedExpense, FixedExpenseId, Transaction, TransactionId};

/// Persistence operations the services need.
///
/// `owner` filters: `Some(id)` keeps only records owned by `id`, `None` returns
/// every record. Accounts and templates are listed newest first, transactions
/// by occurrence date with the most recent first.
pub trait FinanceStore {
    fn list_accounts(&self, owner: Option<&str>) -> FinanceResult<Vec<Account>>;

    /// Persist a new account and return it as stored.
    fn insert_account(&self, account: Account) -> FinanceResult<Account>;

    fn list_transactions(&self, owner: Option<&str>) -> FinanceResult<Vec<Transaction>>;

    fn get_transaction(&self, id: TransactionId) -> FinanceResult<Option<Transaction>>;

    /// Insert or replace a transaction by id.
    fn upsert_transaction(&self, txn: Transaction) -> FinanceResult<Transaction>;

    fn list_fixed_expenses(&self, owner: Option<&str>) -> FinanceResult<Vec<FixedExpense>>;

    fn get_fixed_expense(&self, id: FixedExpenseId) -> FinanceResult<Option<FixedExpense>>;

    /// Insert or replace a template by id.
    fn insert_fixed_expense(&self, item: FixedExpense) -> FinanceResult<FixedExpense>;

    /// Hard delete. Returns the removed template, or `None` if it was unknown.
    fn delete_fixed_expense(&self, id: FixedExpenseId) -> FinanceResult<Option<FixedExpense>>;

    /// Record a change in the audit trail. Stores without one ignore it.
    fn record_audit(&self, _entry: &AuditEntry) -> FinanceResult<()> {
        Ok(())
    }
}
