//! In-memory [`FinanceStore`] for tests and embedding.

use std::sync::RwLock;

use crate::audit::AuditEntry;
use crate::error::FinanceResult;
use crate::models::{Account, FixedExpense, FixedExpenseId, Transaction, TransactionId};

use super::file_io::lock_error;
use super::store::FinanceStore;

/// A store that keeps everything in vectors and forgets it on drop.
#[derive(Debug, Default)]
pub struct MemoryStore {
    accounts: RwLock<Vec<Account>>,
    transactions: RwLock<Vec<Transaction>>,
    fixed_expenses: RwLock<Vec<FixedExpense>>,
    audit: RwLock<Vec<AuditEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Audit entries recorded so far, oldest first
    pub fn audit_entries(&self) -> FinanceResult<Vec<AuditEntry>> {
        Ok(self.audit.read().map_err(lock_error)?.clone())
    }
}

impl FinanceStore for MemoryStore {
    fn list_accounts(&self, owner: Option<&str>) -> FinanceResult<Vec<Account>> {
        let accounts = self.accounts.read().map_err(lock_error)?;
        let mut out: Vec<Account> = accounts
            .iter()
            .filter(|a| a.is_owned_by(owner))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(out)
    }

    fn insert_account(&self, account: Account) -> FinanceResult<Account> {
        let mut accounts = self.accounts.write().map_err(lock_error)?;
        accounts.retain(|a| a.id != account.id);
        accounts.push(account.clone());
        Ok(account)
    }

    fn list_transactions(&self, owner: Option<&str>) -> FinanceResult<Vec<Transaction>> {
        let transactions = self.transactions.read().map_err(lock_error)?;
        let mut out: Vec<Transaction> = transactions
            .iter()
            .filter(|t| t.is_owned_by(owner))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.date.cmp(&a.date).then(a.id.cmp(&b.id)));
        Ok(out)
    }

    fn get_transaction(&self, id: TransactionId) -> FinanceResult<Option<Transaction>> {
        let transactions = self.transactions.read().map_err(lock_error)?;
        Ok(transactions.iter().find(|t| t.id == id).cloned())
    }

    fn upsert_transaction(&self, txn: Transaction) -> FinanceResult<Transaction> {
        let mut transactions = self.transactions.write().map_err(lock_error)?;
        match transactions.iter_mut().find(|t| t.id == txn.id) {
            Some(existing) => *existing = txn.clone(),
            None => transactions.push(txn.clone()),
        }
        Ok(txn)
    }

    fn list_fixed_expenses(&self, owner: Option<&str>) -> FinanceResult<Vec<FixedExpense>> {
        let items = self.fixed_expenses.read().map_err(lock_error)?;
        let mut out: Vec<FixedExpense> = items
            .iter()
            .filter(|f| f.is_owned_by(owner))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(out)
    }

    fn get_fixed_expense(&self, id: FixedExpenseId) -> FinanceResult<Option<FixedExpense>> {
        let items = self.fixed_expenses.read().map_err(lock_error)?;
        Ok(items.iter().find(|f| f.id == id).cloned())
    }

    fn insert_fixed_expense(&self, item: FixedExpense) -> FinanceResult<FixedExpense> {
        let mut items = self.fixed_expenses.write().map_err(lock_error)?;
        items.retain(|f| f.id != item.id);
        items.push(item.clone());
        Ok(item)
    }

    fn delete_fixed_expense(&self, id: FixedExpenseId) -> FinanceResult<Option<FixedExpense>> {
        let mut items = self.fixed_expenses.write().map_err(lock_error)?;
        let position = items.iter().position(|f| f.id == id);
        Ok(position.map(|i| items.remove(i)))
    }

    fn record_audit(&self, entry: &AuditEntry) -> FinanceResult<()> {
        self.audit.write().map_err(lock_error)?.push(entry.clone());
        Ok(())
    }
}
