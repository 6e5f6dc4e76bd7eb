//! JSON file helpers for the data directory
//!
//! Writes go to a sibling `.tmp` file which is synced and then renamed over
//! the target, so a crash leaves either the old or the new content.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::ScroogeError;

fn storage_error(action: &str, path: &Path, err: impl std::fmt::Display) -> ScroogeError {
    ScroogeError::Storage(format!("Failed to {} {}: {}", action, path.display(), err))
}

/// Read a JSON file; a missing file yields `T::default()`
pub fn read_json<T, P>(path: P) -> Result<T, ScroogeError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(T::default()),
        Err(e) => return Err(storage_error("open", path, e)),
    };

    serde_json::from_reader(BufReader::new(file)).map_err(|e| storage_error("parse", path, e))
}

/// Replace the content of `path` with `data`, creating parent directories
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), ScroogeError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| storage_error("create", parent, e))?;
    }

    let temp_path = path.with_extension("json.tmp");
    let file = File::create(&temp_path).map_err(|e| storage_error("create", &temp_path, e))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| storage_error("serialize", path, e))?;
    writer
        .flush()
        .and_then(|_| writer.get_ref().sync_all())
        .map_err(|e| storage_error("sync", &temp_path, e))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        storage_error("replace", path, e)
    })
}
