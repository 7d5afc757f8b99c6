//! Record identifiers
//!
//! Each record kind gets its own UUID newtype so an account id can never be
//! passed where a transaction id is expected. On screen an id is shown as a
//! kind prefix plus the first eight hex digits (`txn-550e8400`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Shortest fragment accepted when looking a record up by id
const MIN_ID_FRAGMENT: usize = 4;
const SHORT_ID_LEN: usize = 8;

/// Whether user input names `uuid`: the full UUID, the short display form or
/// a leading fragment of at least four hex digits, with or without `prefix`.
fn input_names(uuid: &Uuid, prefix: &str, input: &str) -> bool {
    let input = input.trim();
    let fragment = input.strip_prefix(prefix).unwrap_or(input).to_ascii_lowercase();

    fragment.len() >= MIN_ID_FRAGMENT && uuid.hyphenated().to_string().starts_with(&fragment)
}

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident => $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub const PREFIX: &'static str = $prefix;

            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn parse(s: &str) -> Result<Self, uuid::Error> {
                s.parse()
            }

            pub fn matches(&self, input: &str) -> bool {
                input_names(&self.0, Self::PREFIX, input)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let hex = self.0.simple().to_string();
                write!(f, "{}{}", Self::PREFIX, &hex[..SHORT_ID_LEN])
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                Uuid::parse_str(s.strip_prefix(Self::PREFIX).unwrap_or(s)).map(Self)
            }
        }
    };
}

record_id!(
    /// Identifies an account
    AccountId => "acc-"
);
record_id!(
    /// Identifies an income or expense entry
    TransactionId => "txn-"
);
record_id!(
    /// Identifies a fixed expense template
    FixedExpenseId => "fix-"
);
