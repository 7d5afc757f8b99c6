//! Audit logging for fintrack
//!
//! Every create, update and delete that goes through the file-backed store is
//! appended to `audit.log` as one JSON line, with before/after snapshots and a
//! field diff for updates.

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, Audited, EntityType, Operation};
pub use logger::AuditLogger;
