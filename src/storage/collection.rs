//! One JSON document per record kind
//!
//! Each file holds `{ "<collection>": [ ... ] }`. A bare top-level array is
//! also read, and a missing file or key is an empty collection.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{FinanceError, FinanceResult};
use crate::models::{
    Account, AccountId, FixedExpense, FixedExpenseId, Transaction, TransactionId,
};

use super::file_io::{lock_error, read_json, write_json_atomic};

/// A record kept in a [`JsonCollection`]
pub trait Record: Clone + Serialize + DeserializeOwned {
    type Id: Copy + Eq + Hash + Ord + fmt::Display;

    /// Key of the record array inside the document
    const COLLECTION: &'static str;

    fn record_id(&self) -> Self::Id;

    /// Listings are ordered by this, newest first
    fn listed_at(&self) -> DateTime<Utc>;
}

impl Record for Account {
    type Id = AccountId;
    const COLLECTION: &'static str = "accounts";

    fn record_id(&self) -> AccountId {
        self.id
    }

    fn listed_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Record for Transaction {
    type Id = TransactionId;
    const COLLECTION: &'static str = "transactions";

    fn record_id(&self) -> TransactionId {
        self.id
    }

    fn listed_at(&self) -> DateTime<Utc> {
        self.date
    }
}

impl Record for FixedExpense {
    type Id = FixedExpenseId;
    const COLLECTION: &'static str = "fixed_expenses";

    fn record_id(&self) -> FixedExpenseId {
        self.id
    }

    fn listed_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Records of one kind, held in memory and written back as a whole
pub struct JsonCollection<R: Record> {
    path: PathBuf,
    records: RwLock<HashMap<R::Id, R>>,
}

impl<R: Record> JsonCollection<R> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            records: RwLock::new(HashMap::new()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the in-memory records with the file's
    pub fn load(&self) -> FinanceResult<()> {
        let document: Value = read_json(&self.path)?;
        let loaded = self.parse_document(document)?;

        let mut records = self.records.write().map_err(lock_error)?;
        *records = loaded.into_iter().map(|r| (r.record_id(), r)).collect();

        tracing::debug!(collection = R::COLLECTION, count = records.len(), "loaded records");
        Ok(())
    }

    /// A record that does not parse is skipped with a warning. A document
    /// whose collection is not an array at all is an error.
    fn parse_document(&self, document: Value) -> FinanceResult<Vec<R>> {
        let items = match document {
            Value::Null => return Ok(Vec::new()),
            Value::Array(items) => items,
            Value::Object(mut map) => match map.remove(R::COLLECTION) {
                Some(Value::Array(items)) => items,
                Some(Value::Null) | None => return Ok(Vec::new()),
                Some(other) => return Err(self.not_an_array(&other)),
            },
            other => return Err(self.not_an_array(&other)),
        };

        let records = items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match serde_json::from_value::<R>(item) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(
                        collection = R::COLLECTION,
                        index,
                        error = %e,
                        "skipping unreadable record"
                    );
                    None
                }
            })
            .collect();
        Ok(records)
    }

    fn not_an_array(&self, found: &Value) -> FinanceError {
        let kind = match found {
            Value::Bool(_) => "a boolean",
            Value::Number(_) => "a number",
            Value::String(_) => "a string",
            Value::Object(_) => "an object",
            Value::Null | Value::Array(_) => "not a list",
        };
        FinanceError::Storage(format!(
            "Failed to parse {}: expected a list of {}, found {}",
            self.path.display(),
            R::COLLECTION,
            kind
        ))
    }

    /// Write every record, oldest first so diffs of the file stay small
    pub fn save(&self) -> FinanceResult<()> {
        let records = self.records.read().map_err(lock_error)?;

        let mut ordered: Vec<&R> = records.values().collect();
        ordered.sort_by_key(|r| (r.listed_at(), r.record_id()));

        let mut document = Map::new();
        document.insert(R::COLLECTION.to_string(), serde_json::to_value(&ordered)?);
        write_json_atomic(&self.path, &document)
    }

    pub fn get(&self, id: R::Id) -> FinanceResult<Option<R>> {
        let records = self.records.read().map_err(lock_error)?;
        Ok(records.get(&id).cloned())
    }

    /// Every record, newest first
    pub fn all(&self) -> FinanceResult<Vec<R>> {
        let records = self.records.read().map_err(lock_error)?;

        let mut all: Vec<R> = records.values().cloned().collect();
        all.sort_by(|a, b| {
            b.listed_at()
                .cmp(&a.listed_at())
                .then_with(|| a.record_id().cmp(&b.record_id()))
        });
        Ok(all)
    }

    /// Insert or replace, returning the version that was replaced
    pub fn upsert(&self, record: R) -> FinanceResult<Option<R>> {
        let mut records = self.records.write().map_err(lock_error)?;
        Ok(records.insert(record.record_id(), record))
    }

    pub fn remove(&self, id: R::Id) -> FinanceResult<Option<R>> {
        let mut records = self.records.write().map_err(lock_error)?;
        Ok(records.remove(&id))
    }

    pub fn len(&self) -> FinanceResult<usize> {
        Ok(self.records.read().map_err(lock_error)?.len())
    }

    pub fn is_empty(&self) -> FinanceResult<bool> {
        Ok(self.len()? == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountType, Money, TransactionDraft};
    use chrono::{Duration, TimeZone};
    use tempfile::TempDir;

    fn ts(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let accounts: JsonCollection<Account> =
            JsonCollection::new(temp_dir.path().join("accounts.json"));

        accounts.load().unwrap();
        assert!(accounts.is_empty().unwrap());
    }

    #[test]
    fn test_save_and_reload_keeps_records() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("accounts.json");
        let accounts = JsonCollection::new(path.clone());

        let card = Account::created_at("Card", AccountType::Card, ts(1));
        let savings = Account::created_at("Savings", AccountType::Savings, ts(2));
        accounts.upsert(card.clone()).unwrap();
        accounts.upsert(savings.clone()).unwrap();
        accounts.save().unwrap();

        let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["accounts"][0]["name"], "Card");

        let reloaded: JsonCollection<Account> = JsonCollection::new(path);
        reloaded.load().unwrap();
        assert_eq!(reloaded.all().unwrap(), vec![savings, card.clone()]);
        assert_eq!(reloaded.get(card.id).unwrap(), Some(card));
    }

    #[test]
    fn test_upsert_returns_previous_and_remove() {
        let temp_dir = TempDir::new().unwrap();
        let txns: JsonCollection<Transaction> =
            JsonCollection::new(temp_dir.path().join("transactions.json"));

        let mut txn = TransactionDraft::expense(AccountId::new(), Money::from_cents(4000))
            .due(ts(1) + Duration::days(3))
            .build(ts(1))
            .unwrap();
        assert!(txns.upsert(txn.clone()).unwrap().is_none());

        txn.mark_paid(ts(2));
        let previous = txns.upsert(txn.clone()).unwrap().unwrap();
        assert!(!previous.status.is_paid());
        assert_eq!(txns.len().unwrap(), 1);

        assert_eq!(txns.remove(txn.id).unwrap(), Some(txn.clone()));
        assert!(txns.remove(txn.id).unwrap().is_none());
    }

    #[test]
    fn test_transactions_list_by_occurrence_date() {
        let temp_dir = TempDir::new().unwrap();
        let txns: JsonCollection<Transaction> =
            JsonCollection::new(temp_dir.path().join("transactions.json"));
        let account = AccountId::new();

        let early = TransactionDraft::income(account, Money::from_cents(10000))
            .date(ts(1))
            .build(ts(5))
            .unwrap();
        let late = TransactionDraft::expense(account, Money::from_cents(2500))
            .date(ts(3))
            .build(ts(3))
            .unwrap();
        txns.upsert(early.clone()).unwrap();
        txns.upsert(late.clone()).unwrap();

        assert_eq!(txns.all().unwrap(), vec![late, early]);
    }

    #[test]
    fn test_reads_bare_array_and_rejects_garbage() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("fixed_expenses.json");
        let rent = FixedExpense::new("Rent", ts(1));

        std::fs::write(&path, serde_json::to_string(&vec![rent.clone()]).unwrap()).unwrap();
        let items: JsonCollection<FixedExpense> = JsonCollection::new(path.clone());
        items.load().unwrap();
        assert_eq!(items.all().unwrap(), vec![rent]);

        std::fs::write(&path, r#"{"fixed_expenses": 3}"#).unwrap();
        let err = items.load().unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_unreadable_records_are_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("accounts.json");
        let card = Account::created_at("Card", AccountType::Card, ts(1));

        let document = serde_json::json!({
            "accounts": [
                serde_json::to_value(&card).unwrap(),
                {"id": "not-a-uuid", "name": "Broken", "type": "card", "createdAt": 0},
                {"id": "550e8400-e29b-41d4-a716-446655440000", "name": "Odd", "type": "checking", "createdAt": 0}
            ]
        });
        std::fs::write(&path, document.to_string()).unwrap();

        let accounts: JsonCollection<Account> = JsonCollection::new(path);
        accounts.load().unwrap();
        assert_eq!(accounts.all().unwrap(), vec![card]);
    }
}
