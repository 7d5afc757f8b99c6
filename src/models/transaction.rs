//! Transaction model
//!
//! A transaction is an income or an expense against one account. Expenses can
//! be scheduled with a due date and later marked paid. The amount is always a
//! non-negative number of cents; `kind` decides whether it adds to or takes
//! from the account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::ids::{AccountId, TransactionId};
use super::money::{self, Money};

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    /// +1 for income, -1 for expense
    pub fn sign(&self) -> i64 {
        match self {
            Self::Income => 1,
            Self::Expense => -1,
        }
    }

    /// Category used when none is given
    pub fn default_category(&self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" | "in" => Some(Self::Income),
            "expense" | "out" => Some(Self::Expense),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "Income"),
            Self::Expense => write!(f, "Expense"),
        }
    }
}

/// Lifecycle status of a transaction
///
/// `Overdue` can appear in stored records, but the effective status is always
/// recomputed from the due date with [`Transaction::effective_status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Paid,
    #[default]
    Scheduled,
    Overdue,
}

impl TransactionStatus {
    pub fn is_paid(&self) -> bool {
        matches!(self, Self::Paid)
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "paid" => Some(Self::Paid),
            "scheduled" | "pending" => Some(Self::Scheduled),
            "overdue" => Some(Self::Overdue),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Paid => write!(f, "Paid"),
            Self::Scheduled => write!(f, "Scheduled"),
            Self::Overdue => write!(f, "Overdue"),
        }
    }
}

/// Derive the effective status at `now`.
///
/// Paid stays paid. Anything else is overdue when its due date is strictly
/// before `now` and scheduled otherwise; a stored `Overdue` is recomputed.
pub fn compute_status(
    status: TransactionStatus,
    due_date: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> TransactionStatus {
    if status.is_paid() {
        return TransactionStatus::Paid;
    }
    match due_date {
        Some(due) if due < now => TransactionStatus::Overdue,
        _ => TransactionStatus::Scheduled,
    }
}

/// A financial transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    #[serde(default, rename = "userId", skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,

    /// The account this transaction belongs to
    pub account_id: AccountId,

    #[serde(rename = "type")]
    pub kind: TransactionKind,

    /// Amount in cents, never negative
    #[serde(default, rename = "amountCents", deserialize_with = "money::deserialize_lenient")]
    pub amount: Money,

    /// Free-text category label
    #[serde(default)]
    pub category: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    /// When the transaction happened (or was entered)
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub date: DateTime<Utc>,

    /// When a scheduled transaction is due
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub due_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub status: TransactionStatus,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,

    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub paid_at: Option<DateTime<Utc>>,
}

impl Transaction {
    /// Amount with the direction applied
    pub fn signed_amount(&self) -> Money {
        Money::from_cents(self.kind.sign() * self.amount.cents())
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    /// Status as of `now`, ignoring any stale stored `overdue`
    pub fn effective_status(&self, now: DateTime<Utc>) -> TransactionStatus {
        compute_status(self.status, self.due_date, now)
    }

    /// Check whether this transaction is overdue at `now`
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.effective_status(now) == TransactionStatus::Overdue
    }

    /// Check whether this transaction belongs to `owner` (`None` matches everything)
    pub fn is_owned_by(&self, owner: Option<&str>) -> bool {
        owner.map_or(true, |o| self.owner_id.as_deref() == Some(o))
    }

    /// Display label: the trimmed note, or the category when there is none
    pub fn label(&self) -> &str {
        match self.note.as_deref().map(str::trim) {
            Some(note) if !note.is_empty() => note,
            _ => &self.category,
        }
    }

    /// Mark as paid at `now`. The occurrence date moves to the payment time.
    pub fn mark_paid(&mut self, now: DateTime<Utc>) {
        self.status = TransactionStatus::Paid;
        self.paid_at = Some(now);
        self.date = now;
        self.updated_at = now;
    }

    /// Revert a payment back to scheduled
    pub fn mark_unpaid(&mut self, now: DateTime<Utc>) {
        self.status = TransactionStatus::Scheduled;
        self.paid_at = None;
        self.updated_at = now;
    }

    /// Validate the transaction
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if self.amount.is_negative() {
            return Err(TransactionValidationError::NegativeAmount(self.amount));
        }

        if self.category.trim().is_empty() {
            return Err(TransactionValidationError::EmptyCategory);
        }

        if self.status.is_paid() != self.paid_at.is_some() {
            return Err(TransactionValidationError::PaidStampMismatch);
        }

        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.date.format("%Y-%m-%d"),
            self.label(),
            self.signed_amount()
        )
    }
}

/// Typed builder for new transactions.
///
/// Defaults follow the entry form: income is recorded paid; an expense is
/// scheduled when it has a due date and paid otherwise. The category falls
/// back to the direction's default label.
#[derive(Debug, Clone)]
pub struct TransactionDraft {
    account_id: AccountId,
    kind: TransactionKind,
    amount: Money,
    category: Option<String>,
    note: Option<String>,
    due_date: Option<DateTime<Utc>>,
    status: Option<TransactionStatus>,
    owner_id: Option<String>,
    date: Option<DateTime<Utc>>,
}

impl TransactionDraft {
    pub fn new(account_id: AccountId, kind: TransactionKind, amount: Money) -> Self {
        Self {
            account_id,
            kind,
            amount,
            category: None,
            note: None,
            due_date: None,
            status: None,
            owner_id: None,
            date: None,
        }
    }

    pub fn income(account_id: AccountId, amount: Money) -> Self {
        Self::new(account_id, TransactionKind::Income, amount)
    }

    pub fn expense(account_id: AccountId, amount: Money) -> Self {
        Self::new(account_id, TransactionKind::Expense, amount)
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn due(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn status(mut self, status: TransactionStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn owner(mut self, owner_id: impl Into<String>) -> Self {
        self.owner_id = Some(owner_id.into());
        self
    }

    /// Override the occurrence date (defaults to the build time)
    pub fn date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    /// Build the transaction, stamped at `now`
    pub fn build(self, now: DateTime<Utc>) -> Result<Transaction, TransactionValidationError> {
        let status = self.status.unwrap_or(match (self.kind, self.due_date) {
            (TransactionKind::Expense, Some(_)) => TransactionStatus::Scheduled,
            _ => TransactionStatus::Paid,
        });

        let category = self
            .category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| self.kind.default_category().to_string());

        let note = self
            .note
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        let txn = Transaction {
            id: TransactionId::new(),
            owner_id: self.owner_id,
            account_id: self.account_id,
            kind: self.kind,
            amount: self.amount,
            category,
            note,
            date: self.date.unwrap_or(now),
            due_date: self.due_date,
            status,
            created_at: now,
            updated_at: now,
            paid_at: status.is_paid().then_some(now),
        };

        txn.validate()?;
        Ok(txn)
    }
}

/// Why a transaction cannot be stored
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionValidationError {
    #[error("Amount cannot be negative ({0}); use the income/expense type instead")]
    NegativeAmount(Money),
    #[error("Category cannot be empty")]
    EmptyCategory,
    #[error("Paid transactions need a paid time, unpaid ones must not have one")]
    PaidStampMismatch,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_overdue_is_derived_from_due_date() {
        let account = AccountId::new();
        let yesterday = TransactionDraft::expense(account, Money::from_cents(5000))
            .due(now() - Duration::days(1))
            .build(now() - Duration::days(2))
            .unwrap();
        let tomorrow = TransactionDraft::expense(account, Money::from_cents(5000))
            .due(now() + Duration::days(1))
            .build(now() - Duration::days(2))
            .unwrap();

        assert_eq!(yesterday.status, TransactionStatus::Scheduled);
        assert!(yesterday.is_overdue(now()));
        assert!(!tomorrow.is_overdue(now()));
        assert_eq!(tomorrow.effective_status(now()), TransactionStatus::Scheduled);
    }

    #[test]
    fn test_stale_overdue_status_is_not_trusted() {
        let due = now() + Duration::days(3);
        assert_eq!(
            compute_status(TransactionStatus::Overdue, Some(due), now()),
            TransactionStatus::Scheduled
        );
        assert_eq!(
            compute_status(TransactionStatus::Overdue, None, now()),
            TransactionStatus::Scheduled
        );
        assert_eq!(
            compute_status(TransactionStatus::Overdue, Some(now() - Duration::days(1)), now()),
            TransactionStatus::Overdue
        );
        assert_eq!(
            compute_status(TransactionStatus::Paid, Some(now() - Duration::days(3)), now()),
            TransactionStatus::Paid
        );
        assert_eq!(
            compute_status(TransactionStatus::Scheduled, None, now()),
            TransactionStatus::Scheduled
        );
    }

    #[test]
    fn test_draft_defaults() {
        let account = AccountId::new();

        let income = TransactionDraft::income(account, Money::from_cents(264000))
            .build(now())
            .unwrap();
        assert_eq!(income.status, TransactionStatus::Paid);
        assert_eq!(income.paid_at, Some(now()));
        assert_eq!(income.category, "Income");

        let bill = TransactionDraft::expense(account, Money::from_cents(2831000))
            .category("Card bill")
            .note("  ")
            .due(now() + Duration::days(5))
            .build(now())
            .unwrap();
        assert_eq!(bill.status, TransactionStatus::Scheduled);
        assert!(bill.paid_at.is_none());
        assert!(bill.note.is_none());
        assert_eq!(bill.label(), "Card bill");

        let cash_expense = TransactionDraft::expense(account, Money::from_cents(100))
            .build(now())
            .unwrap();
        assert_eq!(cash_expense.status, TransactionStatus::Paid);
    }

    #[test]
    fn test_draft_rejects_negative_amount() {
        let result = TransactionDraft::expense(AccountId::new(), Money::from_cents(-1)).build(now());
        assert!(matches!(
            result,
            Err(TransactionValidationError::NegativeAmount(_))
        ));
    }

    #[test]
    fn test_mark_paid_and_unpaid() {
        let mut txn = TransactionDraft::expense(AccountId::new(), Money::from_cents(9900))
            .due(now())
            .build(now() - Duration::days(10))
            .unwrap();

        txn.mark_paid(now());
        assert_eq!(txn.status, TransactionStatus::Paid);
        assert_eq!(txn.paid_at, Some(now()));
        assert_eq!(txn.date, now());
        assert_eq!(txn.updated_at, now());
        assert!(txn.validate().is_ok());

        let later = now() + Duration::minutes(1);
        txn.mark_unpaid(later);
        assert_eq!(txn.status, TransactionStatus::Scheduled);
        assert!(txn.paid_at.is_none());
        assert_eq!(txn.updated_at, later);
        assert!(txn.validate().is_ok());
    }

    #[test]
    fn test_signed_amount_and_label() {
        let account = AccountId::new();
        let txn = TransactionDraft::expense(account, Money::from_cents(4000))
            .note(" Internet ")
            .build(now())
            .unwrap();
        assert_eq!(txn.signed_amount().cents(), -4000);
        assert_eq!(txn.label(), "Internet");
    }

    #[test]
    fn test_document_shape() {
        let txn = TransactionDraft::expense(AccountId::new(), Money::from_cents(4000))
            .due(now())
            .owner("u1")
            .build(now())
            .unwrap();
        let value = serde_json::to_value(&txn).unwrap();
        assert_eq!(value["type"], "expense");
        assert_eq!(value["status"], "scheduled");
        assert_eq!(value["amountCents"], 4000);
        assert_eq!(value["dueDate"], now().timestamp_millis());
        assert_eq!(value["userId"], "u1");
        assert!(value.get("paidAt").is_none());

        let back: Transaction = serde_json::from_value(value).unwrap();
        assert_eq!(back, txn);
    }

    #[test]
    fn test_malformed_amount_reads_as_zero() {
        let json = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "accountId": "650e8400-e29b-41d4-a716-446655440000",
            "type": "income",
            "amountCents": "not a number",
            "category": "Salary",
            "date": 1700000000000,
            "status": "paid",
            "createdAt": 1700000000000,
            "updatedAt": 1700000000000,
            "paidAt": 1700000000000
        }"#;
        let txn: Transaction = serde_json::from_str(json).unwrap();
        assert!(txn.amount.is_zero());
        assert!(txn.due_date.is_none());
    }
}
