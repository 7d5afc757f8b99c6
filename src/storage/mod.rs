//! Storage layer for fintrack
//!
//! JSON file storage with atomic writes, plus the [`FinanceStore`] trait the
//! services are written against and an in-memory implementation of it.

pub mod collection;
pub mod file_io;
pub mod init;
pub mod memory;
pub mod store;

pub use collection::{JsonCollection, Record};
pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use memory::MemoryStore;
pub use store::FinanceStore;

use crate::audit::{AuditEntry, AuditLogger};
use crate::config::paths::FinancePaths;
use crate::error::{FinanceError, FinanceResult};
use crate::models::{Account, FixedExpense, FixedExpenseId, Transaction, TransactionId};

/// File-backed store: one JSON document per collection plus the audit log
pub struct Storage {
    paths: FinancePaths,
    pub accounts: JsonCollection<Account>,
    pub transactions: JsonCollection<Transaction>,
    pub fixed_expenses: JsonCollection<FixedExpense>,
    audit: AuditLogger,
}

impl Storage {
    /// Create a storage handle. Nothing is read until [`Storage::load_all`].
    pub fn new(paths: FinancePaths) -> Result<Self, FinanceError> {
        paths.ensure_directories()?;

        Ok(Self {
            accounts: JsonCollection::new(paths.accounts_file()),
            transactions: JsonCollection::new(paths.transactions_file()),
            fixed_expenses: JsonCollection::new(paths.fixed_expenses_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    /// Create and load in one step
    pub fn open(paths: FinancePaths) -> Result<Self, FinanceError> {
        let storage = Self::new(paths)?;
        storage.load_all()?;
        Ok(storage)
    }

    pub fn paths(&self) -> &FinancePaths {
        &self.paths
    }

    pub fn audit_logger(&self) -> &AuditLogger {
        &self.audit
    }

    pub fn load_all(&self) -> Result<(), FinanceError> {
        self.accounts.load()?;
        self.transactions.load()?;
        self.fixed_expenses.load()?;
        Ok(())
    }

    pub fn save_all(&self) -> Result<(), FinanceError> {
        self.accounts.save()?;
        self.transactions.save()?;
        self.fixed_expenses.save()?;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }
}

impl FinanceStore for Storage {
    fn list_accounts(&self, owner: Option<&str>) -> FinanceResult<Vec<Account>> {
        Ok(self
            .accounts
            .all()?
            .into_iter()
            .filter(|a| a.is_owned_by(owner))
            .collect())
    }

    fn insert_account(&self, account: Account) -> FinanceResult<Account> {
        self.accounts.upsert(account.clone())?;
        self.accounts.save()?;
        Ok(account)
    }

    fn list_transactions(&self, owner: Option<&str>) -> FinanceResult<Vec<Transaction>> {
        Ok(self
            .transactions
            .all()?
            .into_iter()
            .filter(|t| t.is_owned_by(owner))
            .collect())
    }

    fn get_transaction(&self, id: TransactionId) -> FinanceResult<Option<Transaction>> {
        self.transactions.get(id)
    }

    fn upsert_transaction(&self, txn: Transaction) -> FinanceResult<Transaction> {
        self.transactions.upsert(txn.clone())?;
        self.transactions.save()?;
        Ok(txn)
    }

    fn list_fixed_expenses(&self, owner: Option<&str>) -> FinanceResult<Vec<FixedExpense>> {
        Ok(self
            .fixed_expenses
            .all()?
            .into_iter()
            .filter(|f| f.is_owned_by(owner))
            .collect())
    }

    fn get_fixed_expense(&self, id: FixedExpenseId) -> FinanceResult<Option<FixedExpense>> {
        self.fixed_expenses.get(id)
    }

    fn insert_fixed_expense(&self, item: FixedExpense) -> FinanceResult<FixedExpense> {
        self.fixed_expenses.upsert(item.clone())?;
        self.fixed_expenses.save()?;
        Ok(item)
    }

    fn delete_fixed_expense(&self, id: FixedExpenseId) -> FinanceResult<Option<FixedExpense>> {
        let removed = self.fixed_expenses.remove(id)?;
        if removed.is_some() {
            self.fixed_expenses.save()?;
        }
        Ok(removed)
    }

    fn record_audit(&self, entry: &AuditEntry) -> FinanceResult<()> {
        self.audit.log(entry)
    }
}
