//! Audit entries and the records that produce them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::models::{Account, FixedExpense, Transaction};

use super::diff::generate_diff;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Operation::Create => "CREATE",
            Operation::Update => "UPDATE",
            Operation::Delete => "DELETE",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Account,
    Transaction,
    FixedExpense,
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntityType::Account => "Account",
            EntityType::Transaction => "Transaction",
            EntityType::FixedExpense => "FixedExpense",
        };
        f.write_str(label)
    }
}

/// A stored record whose changes go to the audit log
pub trait Audited: Serialize {
    const ENTITY: EntityType;

    fn audit_id(&self) -> String;

    /// Name shown next to the id in `fintrack history`
    fn audit_name(&self) -> Option<String>;
}

impl Audited for Account {
    const ENTITY: EntityType = EntityType::Account;

    fn audit_id(&self) -> String {
        self.id.to_string()
    }

    fn audit_name(&self) -> Option<String> {
        Some(self.name.clone())
    }
}

impl Audited for Transaction {
    const ENTITY: EntityType = EntityType::Transaction;

    fn audit_id(&self) -> String {
        self.id.to_string()
    }

    fn audit_name(&self) -> Option<String> {
        Some(self.label().to_string())
    }
}

impl Audited for FixedExpense {
    const ENTITY: EntityType = EntityType::FixedExpense;

    fn audit_id(&self) -> String {
        self.id.to_string()
    }

    fn audit_name(&self) -> Option<String> {
        Some(self.name.clone())
    }
}

/// One line of the audit log.
///
/// Snapshots are kept as raw JSON so old lines still parse after the models
/// change shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub operation: Operation,
    pub entity_type: EntityType,
    pub entity_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<Value>,

    /// `field: old -> new` list, updates only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

impl AuditEntry {
    /// Bare entry stamped now; snapshots are attached with the `with_*` methods
    pub fn new(operation: Operation, entity_type: EntityType, entity_id: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_id: entity_id.into(),
            entity_name: None,
            before: None,
            after: None,
            diff_summary: None,
        }
    }

    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.entity_name = name;
        self
    }

    pub fn with_before(mut self, snapshot: Value) -> Self {
        self.before = Some(snapshot);
        self.refresh_diff();
        self
    }

    pub fn with_after(mut self, snapshot: Value) -> Self {
        self.after = Some(snapshot);
        self.refresh_diff();
        self
    }

    fn refresh_diff(&mut self) {
        self.diff_summary = match (&self.before, &self.after) {
            (Some(before), Some(after)) => generate_diff(before, after),
            _ => None,
        };
    }

    pub fn created<T: Audited>(record: &T) -> Self {
        let entry = Self::for_record(Operation::Create, record);
        match serde_json::to_value(record) {
            Ok(after) => entry.with_after(after),
            Err(_) => entry,
        }
    }

    pub fn updated<T: Audited>(before: &T, after: &T) -> Self {
        let mut entry = Self::for_record(Operation::Update, after);
        if let Ok(snapshot) = serde_json::to_value(before) {
            entry = entry.with_before(snapshot);
        }
        if let Ok(snapshot) = serde_json::to_value(after) {
            entry = entry.with_after(snapshot);
        }
        entry
    }

    pub fn deleted<T: Audited>(record: &T) -> Self {
        let entry = Self::for_record(Operation::Delete, record);
        match serde_json::to_value(record) {
            Ok(before) => entry.with_before(before),
            Err(_) => entry,
        }
    }

    fn for_record<T: Audited>(operation: Operation, record: &T) -> Self {
        Self::new(operation, T::ENTITY, record.audit_id()).with_name(record.audit_name())
    }

    /// `[time] OP Entity id (name)`, with the change list on a second line
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id
        );

        if let Some(name) = &self.entity_name {
            output.push_str(&format!(" ({})", name));
        }
        if let Some(diff) = &self.diff_summary {
            output.push_str(&format!("\n  Changes: {}", diff));
        }

        output
    }
}
