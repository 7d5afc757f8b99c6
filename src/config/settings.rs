//! `config.json`: display preferences and the default owner

use std::fs;
use std::io;

use serde::{Deserialize, Serialize};

use super::paths::FinancePaths;
use crate::error::FinanceError;
use crate::storage::write_json_atomic;

const SCHEMA_VERSION: u32 = 1;

/// Missing keys take their default, so older files keep loading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub schema_version: u32,

    /// Shown before every amount
    pub currency_symbol: String,

    /// strftime pattern for dates in listings
    pub date_format: String,

    /// Owner stamped on new records and used to filter listings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_owner: Option<String>,

    /// Leave accounts named "cash" out of the summary's account list
    pub hide_cash_in_summary: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            currency_symbol: "R$".to_string(),
            date_format: "%d/%m/%Y".to_string(),
            default_owner: None,
            hide_cash_in_summary: true,
        }
    }
}

impl Settings {
    /// Read `config.json`; defaults when there is none yet
    pub fn load_or_create(paths: &FinancePaths) -> Result<Self, FinanceError> {
        let path = paths.settings_file();

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no settings file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(FinanceError::Io(format!(
                    "Failed to read settings file: {}",
                    e
                )))
            }
        };

        serde_json::from_str(&contents).map_err(|e| {
            FinanceError::Config(format!("Invalid settings in {}: {}", path.display(), e))
        })
    }

    pub fn save(&self, paths: &FinancePaths) -> Result<(), FinanceError> {
        write_json_atomic(paths.settings_file(), self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.currency_symbol, "R$");
        assert_eq!(settings.date_format, "%d/%m/%Y");
        assert!(settings.default_owner.is_none());
        assert!(settings.hide_cash_in_summary);
    }

    #[test]
    fn test_missing_file_gives_defaults_and_save_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinancePaths::with_base_dir(temp_dir.path().to_path_buf());
        assert_eq!(Settings::load_or_create(&paths).unwrap(), Settings::default());

        let settings = Settings {
            currency_symbol: "$".into(),
            default_owner: Some("u1".into()),
            ..Settings::default()
        };
        settings.save(&paths).unwrap();

        assert_eq!(Settings::load_or_create(&paths).unwrap(), settings);
        assert!(paths.is_initialized());
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"currency_symbol": "€"}"#).unwrap();
        assert_eq!(settings.currency_symbol, "€");
        assert_eq!(settings.schema_version, 1);
        assert!(settings.hide_cash_in_summary);
    }

    #[test]
    fn test_corrupt_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinancePaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), "{ not json").unwrap();

        let result = Settings::load_or_create(&paths);
        assert!(matches!(result, Err(FinanceError::Config(_))));
    }
}
