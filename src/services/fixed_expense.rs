//! Fixed expense service
//!
//! Recurring bill templates and their registration as scheduled expenses.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::audit::AuditEntry;
use crate::error::{FinanceError, FinanceResult, RecordKind};
use crate::models::fixed_expense::MAX_SUGGESTED_DUE_DAY;
use crate::models::{AccountId, FixedExpense, Money, Transaction, TransactionDraft, TransactionStatus};
use crate::storage::FinanceStore;

use super::calendar::MonthCursor;
use super::single_match;
use super::transaction::TransactionService;

/// Templates without a due day sort after every real day
const UNSET_DUE_DAY_ORDER: u32 = 99;

/// Service for fixed expense templates
pub struct FixedExpenseService<'a> {
    store: &'a dyn FinanceStore,
    owner: Option<&'a str>,
}

/// One template to register in a batch
#[derive(Debug, Clone)]
pub struct Registration {
    pub identifier: String,
    pub amount: Money,
    pub due: DateTime<Utc>,
}

/// What a batch registration produced
#[derive(Debug, Clone, Default)]
pub struct RegistrationSummary {
    pub transactions: Vec<Transaction>,
    pub total: Money,
}

impl RegistrationSummary {
    pub fn count(&self) -> usize {
        self.transactions.len()
    }
}

impl<'a> FixedExpenseService<'a> {
    pub fn new(store: &'a dyn FinanceStore, owner: Option<&'a str>) -> Self {
        Self { store, owner }
    }

    /// Create a template
    pub fn create(
        &self,
        name: &str,
        due_day: Option<u32>,
        amount: Option<Money>,
        now: DateTime<Utc>,
    ) -> FinanceResult<FixedExpense> {
        let mut item = FixedExpense::new(name, now);
        if let Some(day) = due_day {
            item = item.with_due_day(day);
        }
        if let Some(amount) = amount {
            item = item.with_amount(amount);
        }
        if let Some(owner) = self.owner {
            item = item.with_owner(owner);
        }

        item.validate()
            .map_err(|e| FinanceError::Validation(e.to_string()))?;

        let item = self.store.insert_fixed_expense(item)?;

        self.store.record_audit(&AuditEntry::created(&item))?;
        tracing::info!(id = %item.id, name = %item.name, "created fixed expense");

        Ok(item)
    }

    /// Templates ordered by due day (unset last), then name
    pub fn list(&self, include_archived: bool) -> FinanceResult<Vec<FixedExpense>> {
        let mut items: Vec<FixedExpense> = self
            .store
            .list_fixed_expenses(self.owner)?
            .into_iter()
            .filter(|f| include_archived || !f.archived)
            .collect();

        items.sort_by(|a, b| {
            let day = |f: &FixedExpense| f.default_due_day.unwrap_or(UNSET_DUE_DAY_ORDER);
            day(a).cmp(&day(b)).then_with(|| a.name.cmp(&b.name))
        });
        Ok(items)
    }

    /// Find by name (case-insensitive) or id
    pub fn find(&self, identifier: &str) -> FinanceResult<Option<FixedExpense>> {
        let items = self.store.list_fixed_expenses(self.owner)?;
        let wanted = identifier.trim().to_lowercase();

        if let Some(item) = items.iter().find(|f| f.name.to_lowercase() == wanted) {
            return Ok(Some(item.clone()));
        }

        single_match(items, RecordKind::FixedExpense, identifier, |f| {
            f.id.matches(identifier)
        })
    }

    pub fn require(&self, identifier: &str) -> FinanceResult<FixedExpense> {
        self.find(identifier)?
            .ok_or_else(|| FinanceError::fixed_expense_not_found(identifier))
    }

    /// Permanently remove a template
    pub fn delete(&self, identifier: &str) -> FinanceResult<FixedExpense> {
        let item = self.require(identifier)?;

        let removed = self
            .store
            .delete_fixed_expense(item.id)?
            .ok_or_else(|| FinanceError::fixed_expense_not_found(identifier))?;

        self.store.record_audit(&AuditEntry::deleted(&removed))?;
        tracing::info!(id = %removed.id, name = %removed.name, "deleted fixed expense");

        Ok(removed)
    }

    /// Hide a template from the default listing without deleting it
    pub fn archive(&self, identifier: &str, now: DateTime<Utc>) -> FinanceResult<FixedExpense> {
        let before = self.require(identifier)?;

        let mut item = before.clone();
        item.archive(now);
        let item = self.store.insert_fixed_expense(item)?;

        self.store.record_audit(&AuditEntry::updated(&before, &item))?;

        Ok(item)
    }

    /// Create a scheduled expense from a template.
    ///
    /// The transaction's note is the template name so it reads the same in the
    /// pending list.
    pub fn register(
        &self,
        identifier: &str,
        account_id: AccountId,
        amount: Money,
        due: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> FinanceResult<Transaction> {
        let item = self.require(identifier)?;

        let draft = TransactionDraft::expense(account_id, amount)
            .note(item.name.as_str())
            .due(due)
            .status(TransactionStatus::Scheduled);

        TransactionService::new(self.store, self.owner).create(draft, now)
    }

    /// Register several templates into one account.
    ///
    /// Stops at the first failure; anything registered before it stays.
    pub fn register_batch(
        &self,
        account_id: AccountId,
        registrations: &[Registration],
        now: DateTime<Utc>,
    ) -> FinanceResult<RegistrationSummary> {
        let mut summary = RegistrationSummary::default();

        for registration in registrations {
            let txn = self.register(
                &registration.identifier,
                account_id,
                registration.amount,
                registration.due,
                now,
            )?;
            summary.total += txn.amount;
            summary.transactions.push(txn);
        }

        Ok(summary)
    }

    /// Suggested due date for `item` within `month`.
    ///
    /// Uses the template's due day, or today's day of month without one,
    /// capped at the 28th so every month has it.
    pub fn suggested_due_date(
        &self,
        item: &FixedExpense,
        month: MonthCursor,
        today: NaiveDate,
    ) -> NaiveDate {
        let day = item
            .default_due_day
            .unwrap_or_else(|| today.day())
            .clamp(1, MAX_SUGGESTED_DUE_DAY);

        NaiveDate::from_ymd_opt(month.year(), month.month(), day).unwrap_or(today)
    }
}
