// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, ErrorKind, Write},
    path::{Path, PathBuf},
};

use serde::{Serialize, de::DeserializeOwned};
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JsonFileError {
    #[error("File '{}' does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize content for '{}': {source}", path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl JsonFileError {
    pub fn path(&self) -> &Path {
        match self {
            JsonFileError::NotFound(path) => path,
            JsonFileError::Read { path, .. }
            | JsonFileError::Parse { path, .. }
            | JsonFileError::Write { path, .. }
            | JsonFileError::Serialize { path, .. } => path,
        }
    }
}

/// Read and deserialize a JSON file. A missing file is [`JsonFileError::NotFound`].
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, JsonFileError> {
    read_json_if_exists(path)?.ok_or_else(|| JsonFileError::NotFound(path.to_path_buf()))
}

/// Read and deserialize a JSON file, treating a missing file as `None`.
pub fn read_json_if_exists<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, JsonFileError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(JsonFileError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    tracing::debug!("Reading {}", path.display());

    serde_json::from_reader(BufReader::new(file))
        .map(Some)
        .map_err(|source| JsonFileError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// Serialize `value` as pretty JSON and atomically replace the file at `path`.
///
/// The content is written to a temporary file in the destination directory and then renamed
/// over the target, so readers see either the previous content or the new one. The parent
/// directory must exist.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), JsonFileError> {
    let write_error = |source| JsonFileError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let temp_file = NamedTempFile::new_in(dir).map_err(write_error)?;

    {
        let mut writer = BufWriter::new(temp_file.as_file());
        serde_json::to_writer_pretty(&mut writer, value).map_err(|source| {
            JsonFileError::Serialize {
                path: path.to_path_buf(),
                source,
            }
        })?;
        writer.write_all(b"\n").map_err(write_error)?;
        writer.flush().map_err(write_error)?;
    }
    temp_file.as_file().sync_all().map_err(write_error)?;

    temp_file
        .persist(path)
        .map_err(|e| write_error(e.error))?;

    tracing::debug!("Wrote {}", path.display());

    Ok(())
}

/// Remove a file if it exists. Returns whether a file was removed.
pub fn remove_if_exists(path: &Path) -> std::io::Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!("Removed {}", path.display());
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    #[test]
    fn write_replaces_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        write_json(&path, &json!({"a": 1})).unwrap();
        write_json(&path, &json!({"b": [true, null]})).unwrap();

        let value: Value = read_json(&path).unwrap();
        assert_eq!(value, json!({"b": [true, null]}));

        // Only the target remains; the temporary file was renamed over it
        let entries = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");

        assert!(matches!(
            read_json::<Value>(&path),
            Err(JsonFileError::NotFound(_))
        ));
        assert!(read_json_if_exists::<Value>(&path).unwrap().is_none());
        assert!(!remove_if_exists(&path).unwrap());
    }

    #[test]
    fn malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let err = read_json::<Value>(&path).unwrap_err();
        assert!(matches!(err, JsonFileError::Parse { .. }));
        assert_eq!(err.path(), path);
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out.json");

        assert!(matches!(
            write_json(&path, &json!({})),
            Err(JsonFileError::Write { .. })
        ));
        assert!(!path.exists());
    }
}
