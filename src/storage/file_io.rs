//! JSON file helpers
//!
//! Writes go to a sibling temp file that is synced and renamed over the
//! target, so a crash leaves either the old document or the new one.

use std::fmt::Display;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{FinanceError, FinanceResult};

fn storage_error(action: &str, path: &Path, err: impl Display) -> FinanceError {
    FinanceError::Storage(format!("Failed to {} {}: {}", action, path.display(), err))
}

/// Read a JSON document; a file that does not exist reads as `T::default()`
pub fn read_json<T, P>(path: P) -> FinanceResult<T>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "data file missing, starting empty");
            return Ok(T::default());
        }
        Err(e) => return Err(storage_error("read", path, e)),
    };

    if contents.trim().is_empty() {
        return Ok(T::default());
    }

    serde_json::from_str(&contents).map_err(|e| storage_error("parse", path, e))
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(format!(".{}.tmp", std::process::id()));
    path.with_file_name(name)
}

/// Pretty-print `data` to `path`, creating parent directories as needed
pub fn write_json_atomic<T, P>(path: P, data: &T) -> FinanceResult<()>
where
    T: Serialize + ?Sized,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| storage_error("create directory", parent, e))?;
    }

    let temp_path = temp_path_for(path);
    let result = write_synced(&temp_path, data).and_then(|()| {
        fs::rename(&temp_path, path).map_err(|e| storage_error("replace", path, e))
    });

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_synced<T: Serialize + ?Sized>(temp_path: &Path, data: &T) -> FinanceResult<()> {
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(temp_path)
        .map_err(|e| storage_error("create", temp_path, e))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| storage_error("serialize", temp_path, e))?;
    writer
        .flush()
        .map_err(|e| storage_error("write", temp_path, e))?;

    let file: &File = writer.get_ref();
    file.sync_all().map_err(|e| storage_error("sync", temp_path, e))
}

/// A poisoned collection lock
pub(crate) fn lock_error<E: Display>(e: E) -> FinanceError {
    FinanceError::Storage(format!("Failed to acquire lock: {}", e))
}
