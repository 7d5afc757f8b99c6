//! Account service
//!
//! Provides business logic for account management: creation with validation,
//! lookup, and balances computed by the aggregator.

use crate::audit::AuditEntry;
use crate::error::{FinanceError, FinanceResult, RecordKind};
use crate::models::{Account, AccountId, AccountType, Money};
use crate::storage::FinanceStore;

use super::aggregate::aggregate;
use super::single_match;

/// Name given to the account created when an owner has none
pub const DEFAULT_ACCOUNT_NAME: &str = "Cash";

/// Service for account management
pub struct AccountService<'a> {
    store: &'a dyn FinanceStore,
    owner: Option<&'a str>,
}

/// An account with its computed balance
#[derive(Debug, Clone)]
pub struct AccountBalance {
    pub account: Account,
    /// Signed sum of all its transactions, scheduled ones included
    pub balance: Money,
}

impl<'a> AccountService<'a> {
    /// Create a service scoped to `owner` (`None` sees every account)
    pub fn new(store: &'a dyn FinanceStore, owner: Option<&'a str>) -> Self {
        Self { store, owner }
    }

    /// Create a new account
    pub fn create(&self, name: &str, account_type: AccountType) -> FinanceResult<Account> {
        let name = name.trim();

        let mut account = Account::new(name, account_type);
        if let Some(owner) = self.owner {
            account = account.with_owner(owner);
        }

        account
            .validate()
            .map_err(|e| FinanceError::Validation(e.to_string()))?;

        if self.get_by_name(name)?.is_some() {
            return Err(FinanceError::duplicate(RecordKind::Account, name));
        }

        let account = self.store.insert_account(account)?;

        self.store.record_audit(&AuditEntry::created(&account))?;
        tracing::info!(id = %account.id, name = %account.name, "created account");

        Ok(account)
    }

    /// All accounts, newest first
    pub fn list(&self) -> FinanceResult<Vec<Account>> {
        self.store.list_accounts(self.owner)
    }

    pub fn get(&self, id: AccountId) -> FinanceResult<Option<Account>> {
        Ok(self.list()?.into_iter().find(|a| a.id == id))
    }

    /// Get an account by name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> FinanceResult<Option<Account>> {
        let wanted = name.trim().to_lowercase();
        Ok(self
            .list()?
            .into_iter()
            .find(|a| a.name.to_lowercase() == wanted))
    }

    /// Find an account by name or ID string
    pub fn find(&self, identifier: &str) -> FinanceResult<Option<Account>> {
        if let Some(account) = self.get_by_name(identifier)? {
            return Ok(Some(account));
        }

        single_match(self.list()?, RecordKind::Account, identifier, |a| {
            a.id.matches(identifier)
        })
    }

    /// Like [`AccountService::find`], but a miss is an error
    pub fn require(&self, identifier: &str) -> FinanceResult<Account> {
        self.find(identifier)?
            .ok_or_else(|| FinanceError::account_not_found(identifier))
    }

    /// All accounts with their balances
    pub fn list_with_balances(&self) -> FinanceResult<Vec<AccountBalance>> {
        let accounts = self.list()?;
        let transactions = self.store.list_transactions(self.owner)?;
        let summary = aggregate(&accounts, &transactions);

        Ok(accounts
            .into_iter()
            .map(|account| AccountBalance {
                balance: summary.balance_of(account.id),
                account,
            })
            .collect())
    }

    /// Make sure the owner has at least one account, creating a cash account
    /// when they have none. Returns the account that was created, if any.
    pub fn ensure_default(&self) -> FinanceResult<Option<Account>> {
        if !self.list()?.is_empty() {
            return Ok(None);
        }

        tracing::debug!("no accounts yet, creating the default one");
        self.create(DEFAULT_ACCOUNT_NAME, AccountType::Cash).map(Some)
    }
}
