//! Accounts: the places money lives
//!
//! Stored documents use camelCase keys, the owner under `userId` and the
//! creation time in epoch milliseconds.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ids::AccountId;

const MAX_NAME_LEN: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    #[default]
    Cash,
    /// Debit or credit card
    Card,
    Savings,
}

impl AccountType {
    pub const ALL: [AccountType; 3] = [Self::Cash, Self::Card, Self::Savings];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Card => "card",
            Self::Savings => "savings",
        }
    }

    /// Lenient parse of what a user types; `None` for anything unknown
    pub fn parse(s: &str) -> Option<Self> {
        s.parse().ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid account type: '{0}'. Valid types: cash, card, savings")]
pub struct UnknownAccountType(pub String);

impl FromStr for AccountType {
    type Err = UnknownAccountType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let found = match s.trim().to_ascii_lowercase().as_str() {
            "cash" | "wallet" => Self::Cash,
            "card" | "credit" | "debit" => Self::Card,
            "savings" | "saving" => Self::Savings,
            _ => return Err(UnknownAccountType(s.trim().to_string())),
        };
        Ok(found)
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Cash => "Cash",
            Self::Card => "Card",
            Self::Savings => "Savings",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: AccountId,

    /// Set when the data file is shared between users
    #[serde(default, rename = "userId", skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,

    pub name: String,

    #[serde(rename = "type")]
    pub account_type: AccountType,

    /// Pastel hex color used by front ends
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountValidationError {
    #[error("Account name cannot be empty")]
    EmptyName,
    #[error("Account name too long ({0} chars, max 100)")]
    NameTooLong(usize),
}

impl Account {
    pub fn new(name: impl Into<String>, account_type: AccountType) -> Self {
        Self::created_at(name, account_type, super::date::now())
    }

    pub fn created_at(
        name: impl Into<String>,
        account_type: AccountType,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: AccountId::new(),
            owner_id: None,
            name: name.into(),
            account_type,
            color: None,
            icon: None,
            created_at,
        }
    }

    pub fn with_owner(mut self, owner_id: impl Into<String>) -> Self {
        self.owner_id = Some(owner_id.into());
        self
    }

    /// `None` matches every account
    pub fn is_owned_by(&self, owner: Option<&str>) -> bool {
        match owner {
            Some(owner) => self.owner_id.as_deref() == Some(owner),
            None => true,
        }
    }

    pub fn validate(&self) -> Result<(), AccountValidationError> {
        let len = self.name.chars().count();
        if self.name.trim().is_empty() {
            Err(AccountValidationError::EmptyName)
        } else if len > MAX_NAME_LEN {
            Err(AccountValidationError::NameTooLong(len))
        } else {
            Ok(())
        }
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.account_type)
    }
}
