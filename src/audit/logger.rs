//! The audit log file: one JSON entry per line, appended and never rewritten

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{FinanceError, FinanceResult};

use super::entry::AuditEntry;

#[derive(Debug, Clone)]
pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }

    pub fn log(&self, entry: &AuditEntry) -> FinanceResult<()> {
        self.append(std::slice::from_ref(entry))
    }

    /// Append several entries with a single open and flush
    pub fn append(&self, entries: &[AuditEntry]) -> FinanceResult<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let mut buffer = String::new();
        for entry in entries {
            let line = serde_json::to_string(entry).map_err(|e| {
                FinanceError::Json(format!("Failed to serialize audit entry: {}", e))
            })?;
            buffer.push_str(&line);
            buffer.push('\n');
        }

        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .and_then(|mut file| {
                file.write_all(buffer.as_bytes())?;
                file.flush()
            })
            .map_err(|e| {
                FinanceError::Io(format!(
                    "Failed to append to audit log {}: {}",
                    self.log_path.display(),
                    e
                ))
            })?;

        tracing::trace!(count = entries.len(), "audit entries appended");
        Ok(())
    }

    /// Every entry, oldest first. Blank lines are skipped; any other line
    /// that does not parse is an error naming its line number.
    pub fn read_all(&self) -> FinanceResult<Vec<AuditEntry>> {
        let contents = match fs::read_to_string(&self.log_path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(FinanceError::Io(format!("Failed to read audit log: {}", e))),
        };

        contents
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| {
                serde_json::from_str(line).map_err(|e| {
                    FinanceError::Json(format!("Bad audit entry on line {}: {}", index + 1, e))
                })
            })
            .collect()
    }

    /// The last `count` entries, oldest first
    pub fn read_recent(&self, count: usize) -> FinanceResult<Vec<AuditEntry>> {
        let entries = self.read_all()?;
        let skip = entries.len().saturating_sub(count);
        Ok(entries.into_iter().skip(skip).collect())
    }
}
