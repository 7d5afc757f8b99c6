//! Transaction service
//!
//! Creation from typed drafts, filtered listing, and the paid/unpaid toggle.

use chrono::{DateTime, Utc};

use crate::audit::AuditEntry;
use crate::error::{FinanceError, FinanceResult, RecordKind};
use crate::models::{AccountId, Transaction, TransactionDraft, TransactionKind, TransactionStatus};
use crate::storage::FinanceStore;

use super::single_match;

/// Service for transaction management
pub struct TransactionService<'a> {
    store: &'a dyn FinanceStore,
    owner: Option<&'a str>,
}

/// Filter options for listing transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub account_id: Option<AccountId>,
    pub kind: Option<TransactionKind>,
    /// Matched against the effective status, so `Overdue` finds late bills
    pub status: Option<TransactionStatus>,
    pub limit: Option<usize>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account(mut self, account_id: AccountId) -> Self {
        self.account_id = Some(account_id);
        self
    }

    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn status(mut self, status: TransactionStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn matches(&self, txn: &Transaction, now: DateTime<Utc>) -> bool {
        self.account_id.map_or(true, |id| txn.account_id == id)
            && self.kind.map_or(true, |kind| txn.kind == kind)
            && self
                .status
                .map_or(true, |status| txn.effective_status(now) == status)
    }
}

impl<'a> TransactionService<'a> {
    pub fn new(store: &'a dyn FinanceStore, owner: Option<&'a str>) -> Self {
        Self { store, owner }
    }

    /// Create a transaction from a draft.
    ///
    /// The draft's account must be visible to this owner. The owner is stamped
    /// on the record when the service is scoped to one.
    pub fn create(&self, draft: TransactionDraft, now: DateTime<Utc>) -> FinanceResult<Transaction> {
        let account_id = draft.account_id();
        let account_known = self
            .store
            .list_accounts(self.owner)?
            .iter()
            .any(|a| a.id == account_id);
        if !account_known {
            return Err(FinanceError::account_not_found(account_id.to_string()));
        }

        let draft = match self.owner {
            Some(owner) => draft.owner(owner),
            None => draft,
        };

        let txn = draft
            .build(now)
            .map_err(|e| FinanceError::Validation(e.to_string()))?;

        let txn = self.store.upsert_transaction(txn)?;

        self.store.record_audit(&AuditEntry::created(&txn))?;
        tracing::info!(id = %txn.id, kind = %txn.kind, amount = %txn.amount, "created transaction");

        Ok(txn)
    }

    /// Transactions matching `filter`, most recent first
    pub fn list(&self, filter: &TransactionFilter, now: DateTime<Utc>) -> FinanceResult<Vec<Transaction>> {
        let matching = self
            .store
            .list_transactions(self.owner)?
            .into_iter()
            .filter(|t| filter.matches(t, now));

        Ok(match filter.limit {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        })
    }

    /// Every transaction visible to this owner
    pub fn list_all(&self) -> FinanceResult<Vec<Transaction>> {
        self.store.list_transactions(self.owner)
    }

    /// Find by full id or short id prefix; a prefix shared by several
    /// transactions is rejected
    pub fn find(&self, identifier: &str) -> FinanceResult<Option<Transaction>> {
        single_match(self.list_all()?, RecordKind::Transaction, identifier, |t| {
            t.id.matches(identifier)
        })
    }

    /// Like [`TransactionService::find`], but a miss is an error
    pub fn require(&self, identifier: &str) -> FinanceResult<Transaction> {
        self.find(identifier)?
            .ok_or_else(|| FinanceError::transaction_not_found(identifier))
    }

    /// Mark a transaction paid at `now`
    pub fn mark_paid(&self, identifier: &str, now: DateTime<Utc>) -> FinanceResult<Transaction> {
        self.update(identifier, |txn| txn.mark_paid(now))
    }

    /// Put a paid transaction back to scheduled
    pub fn mark_unpaid(&self, identifier: &str, now: DateTime<Utc>) -> FinanceResult<Transaction> {
        self.update(identifier, |txn| txn.mark_unpaid(now))
    }

    fn update(
        &self,
        identifier: &str,
        change: impl FnOnce(&mut Transaction),
    ) -> FinanceResult<Transaction> {
        let before = self.require(identifier)?;

        let mut txn = before.clone();
        change(&mut txn);
        let txn = self.store.upsert_transaction(txn)?;

        self.store.record_audit(&AuditEntry::updated(&before, &txn))?;
        tracing::info!(id = %txn.id, status = %txn.status, "updated transaction");

        Ok(txn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::models::{Account, AccountType, Money, TransactionId};
    use crate::storage::MemoryStore;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap()
    }

    fn setup() -> (MemoryStore, Account) {
        let store = MemoryStore::new();
        let account = store
            .insert_account(Account::new("Card", AccountType::Card).with_owner("ana"))
            .unwrap();
        (store, account)
    }

    #[test]
    fn test_create_stamps_owner() {
        let (store, account) = setup();
        let service = TransactionService::new(&store, Some("ana"));

        let txn = service
            .create(
                TransactionDraft::income(account.id, Money::from_cents(10000)),
                now(),
            )
            .unwrap();

        assert_eq!(txn.owner_id.as_deref(), Some("ana"));
        assert_eq!(txn.status, TransactionStatus::Paid);
        assert_eq!(txn.paid_at, Some(now()));
        assert_eq!(store.list_transactions(Some("ana")).unwrap().len(), 1);
    }

    #[test]
    fn test_create_requires_visible_account() {
        let (store, account) = setup();
        let other = TransactionService::new(&store, Some("bo"));

        let err = other
            .create(
                TransactionDraft::expense(account.id, Money::from_cents(100)),
                now(),
            )
            .unwrap_err();
        assert!(err.is_not_found());

        let err = other
            .create(
                TransactionDraft::expense(AccountId::new(), Money::from_cents(100)),
                now(),
            )
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_create_rejects_invalid_draft() {
        let (store, account) = setup();
        let service = TransactionService::new(&store, None);

        let err = service
            .create(
                TransactionDraft::expense(account.id, Money::from_cents(-5)),
                now(),
            )
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_mark_paid_and_unpaid() {
        let (store, account) = setup();
        let service = TransactionService::new(&store, None);
        let bill = service
            .create(
                TransactionDraft::expense(account.id, Money::from_cents(4000))
                    .note("Internet")
                    .due(now() + Duration::days(5)),
                now(),
            )
            .unwrap();
        assert_eq!(bill.status, TransactionStatus::Scheduled);

        let later = now() + Duration::hours(2);
        let paid = service.mark_paid(&bill.id.to_string(), later).unwrap();
        assert_eq!(paid.status, TransactionStatus::Paid);
        assert_eq!(paid.paid_at, Some(later));
        assert_eq!(paid.date, later);
        assert_eq!(paid.updated_at, later);

        let reverted = service.mark_unpaid(&bill.id.to_string(), later).unwrap();
        assert_eq!(reverted.status, TransactionStatus::Scheduled);
        assert!(reverted.paid_at.is_none());

        let audit = store.audit_entries().unwrap();
        let updates: Vec<_> = audit
            .iter()
            .filter(|e| e.operation == Operation::Update)
            .collect();
        assert_eq!(updates.len(), 2);
        assert!(updates[0].diff_summary.as_deref().unwrap().contains("status"));
    }

    #[test]
    fn test_mark_paid_unknown_id() {
        let (store, _account) = setup();
        let service = TransactionService::new(&store, None);
        assert!(service.mark_paid("txn-deadbeef", now()).unwrap_err().is_not_found());
    }

    #[test]
    fn test_shared_prefix_is_ambiguous() {
        let (store, account) = setup();
        let service = TransactionService::new(&store, None);

        for uuid in [
            "aaaa0000-0000-4000-8000-000000000000",
            "aaaa1111-0000-4000-8000-000000000000",
        ] {
            let mut bill = TransactionDraft::expense(account.id, Money::from_cents(5000))
                .due(now() + Duration::days(1))
                .build(now())
                .unwrap();
            bill.id = TransactionId::parse(uuid).unwrap();
            store.upsert_transaction(bill).unwrap();
        }

        let err = service.mark_paid("aaaa", now()).unwrap_err();
        assert!(err.is_validation(), "{}", err);
        assert!(err.to_string().contains("Ambiguous id 'aaaa'"));
        assert!(store
            .list_transactions(None)
            .unwrap()
            .iter()
            .all(|t| !t.status.is_paid()));

        let paid = service.mark_paid("txn-aaaa1111", now()).unwrap();
        assert_eq!(paid.id.to_string(), "txn-aaaa1111");
        assert!(paid.status.is_paid());
    }

    #[test]
    fn test_list_filters_by_effective_status() {
        let (store, account) = setup();
        let service = TransactionService::new(&store, None);

        let late = service
            .create(
                TransactionDraft::expense(account.id, Money::from_cents(100))
                    .due(now() - Duration::days(1)),
                now() - Duration::days(3),
            )
            .unwrap();
        service
            .create(
                TransactionDraft::expense(account.id, Money::from_cents(200))
                    .due(now() + Duration::days(1)),
                now() - Duration::days(2),
            )
            .unwrap();
        service
            .create(
                TransactionDraft::income(account.id, Money::from_cents(300)),
                now() - Duration::days(1),
            )
            .unwrap();

        let overdue = service
            .list(&TransactionFilter::new().status(TransactionStatus::Overdue), now())
            .unwrap();
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].id, late.id);

        let scheduled = service
            .list(&TransactionFilter::new().status(TransactionStatus::Scheduled), now())
            .unwrap();
        assert_eq!(scheduled.len(), 1);

        let expenses = service
            .list(&TransactionFilter::new().kind(TransactionKind::Expense), now())
            .unwrap();
        assert_eq!(expenses.len(), 2);

        let latest = service
            .list(&TransactionFilter::new().account(account.id).limit(1), now())
            .unwrap();
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].kind, TransactionKind::Income);
    }
}
