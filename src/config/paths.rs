//! Where fintrack keeps its files
//!
//! The base directory is `$FINTRACK_DATA_DIR` when set, otherwise
//! `$XDG_CONFIG_HOME/fintrack` (falling back to `~/.config/fintrack`), or
//! `%APPDATA%\fintrack` on Windows. Inside it:
//!
//! ```text
//! config.json
//! audit.log
//! data/accounts.json
//! data/transactions.json
//! data/fixed_expenses.json
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::FinanceError;

pub const DATA_DIR_ENV: &str = "FINTRACK_DATA_DIR";

const APP_DIR: &str = "fintrack";
const DATA_SUBDIR: &str = "data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinancePaths {
    base_dir: PathBuf,
}

/// A non-empty environment variable
fn env_path(name: &str) -> Option<PathBuf> {
    env::var_os(name)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

#[cfg(not(windows))]
fn platform_base() -> Result<PathBuf, FinanceError> {
    env_path("XDG_CONFIG_HOME")
        .or_else(|| env_path("HOME").map(|home| home.join(".config")))
        .map(|config| config.join(APP_DIR))
        .ok_or_else(|| FinanceError::Config("Could not determine HOME directory".into()))
}

#[cfg(windows)]
fn platform_base() -> Result<PathBuf, FinanceError> {
    env_path("APPDATA")
        .map(|appdata| appdata.join(APP_DIR))
        .ok_or_else(|| FinanceError::Config("Could not determine APPDATA directory".into()))
}

impl FinancePaths {
    /// Resolve the base directory from the environment
    pub fn new() -> Result<Self, FinanceError> {
        let base_dir = match env_path(DATA_DIR_ENV) {
            Some(dir) => dir,
            None => platform_base()?,
        };
        Ok(Self { base_dir })
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join(DATA_SUBDIR)
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// `data/<collection>.json`
    pub fn collection_file(&self, collection: &str) -> PathBuf {
        self.data_dir().join(format!("{}.json", collection))
    }

    pub fn accounts_file(&self) -> PathBuf {
        self.collection_file("accounts")
    }

    pub fn transactions_file(&self) -> PathBuf {
        self.collection_file("transactions")
    }

    pub fn fixed_expenses_file(&self) -> PathBuf {
        self.collection_file("fixed_expenses")
    }

    /// Create the base and data directories
    pub fn ensure_directories(&self) -> Result<(), FinanceError> {
        let data_dir = self.data_dir();
        fs::create_dir_all(&data_dir).map_err(|e| {
            FinanceError::Io(format!(
                "Failed to create data directory {}: {}",
                data_dir.display(),
                e
            ))
        })
    }

    /// `fintrack init` has run here
    pub fn is_initialized(&self) -> bool {
        self.settings_file().is_file()
    }
}
