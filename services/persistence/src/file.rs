//! JSON file store
//!
//! Layout: `<dir>/<key>.json`, pretty-printed.
//!
//! Writes are atomic per key: serialize → write `<key>.json.tmp` → fsync →
//! rename over `<key>.json`. A reader therefore sees either the previous
//! value or the new one, never a prefix.

use serde_json::Value;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::store::{StateStore, StoreError, StoreKey};

/// Store backed by one JSON file per key
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .map_err(|e| StoreError::Unavailable(format!("{}: {}", dir.display(), e)))?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: StoreKey) -> PathBuf {
        self.dir.join(format!("{}.json", key.as_str()))
    }

    fn tmp_path_for(&self, key: StoreKey) -> PathBuf {
        self.dir.join(format!("{}.json.tmp", key.as_str()))
    }
}

impl StateStore for JsonFileStore {
    fn read(&self, key: StoreKey) -> Result<Option<Value>, StoreError> {
        let path = self.path_for(key);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Io { key, source }),
        };

        if content.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| StoreError::Corrupt {
                key,
                message: format!("{}: {}", path.display(), e),
            })
    }

    fn write(&self, key: StoreKey, value: &Value) -> Result<(), StoreError> {
        let data = serde_json::to_vec_pretty(value).map_err(|e| StoreError::Serialization {
            key,
            message: e.to_string(),
        })?;

        let path = self.path_for(key);
        let tmp_path = self.tmp_path_for(key);

        if let Err(source) = replace_atomically(&tmp_path, &path, &data) {
            // leave no partial temp file behind
            let _ = fs::remove_file(&tmp_path);
            return Err(StoreError::Io { key, source });
        }

        tracing::trace!(key = %key, bytes = data.len(), "state key written");
        Ok(())
    }
}

fn replace_atomically(tmp_path: &Path, path: &Path, data: &[u8]) -> io::Result<()> {
    {
        let mut file = File::create(tmp_path)?;
        file.write_all(data)?;
        file.sync_all()?;
    }
    fs::rename(tmp_path, path)
}
