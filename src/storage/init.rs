//! First-run setup of the data directory

use serde_json::{Map, Value};

use crate::config::paths::FinancePaths;
use crate::config::Settings;
use crate::error::FinanceError;
use crate::models::{Account, FixedExpense, Transaction};

use super::collection::Record;
use super::file_io::write_json_atomic;

/// Write an empty `{ "<collection>": [] }` document unless one exists
fn create_empty_collection<R: Record>(paths: &FinancePaths) -> Result<bool, FinanceError> {
    let path = paths.collection_file(R::COLLECTION);
    if path.exists() {
        return Ok(false);
    }

    let mut document = Map::new();
    document.insert(R::COLLECTION.to_string(), Value::Array(Vec::new()));
    write_json_atomic(&path, &document)?;
    Ok(true)
}

/// Create the directories, `config.json` and empty collection files.
///
/// Existing files are never touched. Returns whether anything was created.
pub fn initialize_storage(paths: &FinancePaths) -> Result<bool, FinanceError> {
    paths.ensure_directories()?;

    let mut created = false;
    if !paths.is_initialized() {
        Settings::default().save(paths)?;
        created = true;
    }

    created |= create_empty_collection::<Account>(paths)?;
    created |= create_empty_collection::<Transaction>(paths)?;
    created |= create_empty_collection::<FixedExpense>(paths)?;

    if created {
        tracing::info!(base = %paths.base_dir().display(), "initialized data directory");
    }
    Ok(created)
}
