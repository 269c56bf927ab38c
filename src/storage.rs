//! Key-value storage the story store persists into.
//!
//! The store only needs two operations, so anything that can hold a string
//! under a key can back it: a map in memory for tests, or a directory on disk
//! for the terminal app.

use crate::error::{Result, StoreError};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Browsers give a site about five megabytes of local storage.
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

pub trait StoragePort {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(limit: usize) -> Self {
        MemoryStorage {
            values: HashMap::new(),
            quota: Some(limit),
        }
    }

    /// Writes a raw value, skipping the quota. Lets tests plant damaged data.
    pub fn insert_raw(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    fn used_except(&self, key: &str) -> usize {
        self.values
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl StoragePort for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if let Some(limit) = self.quota {
            let needed = self.used_except(key) + key.len() + value.len();
            if needed > limit {
                return Err(StoreError::QuotaExceeded { needed, limit });
            }
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
    quota: usize,
}

impl FileStorage {
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_quota(dir, DEFAULT_QUOTA_BYTES)
    }

    pub fn open_with_quota(dir: impl AsRef<Path>, quota: usize) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        tracing::debug!(dir = %dir.display(), quota, "opened file storage");
        Ok(FileStorage { dir, quota })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(StoreError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("unusable storage key {key:?}"),
            )));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }

    fn used_except(&self, skip: &Path) -> Result<usize> {
        let mut used = 0;
        for dir_entry in fs::read_dir(&self.dir)? {
            let path = dir_entry?.path();
            if path == skip || path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            used += fs::metadata(&path)?.len() as usize;
        }
        Ok(used)
    }
}

impl StoragePort for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key)?;
        let needed = self.used_except(&path)? + value.len();
        if needed > self.quota {
            return Err(StoreError::QuotaExceeded {
                needed,
                limit: self.quota,
            });
        }

        // Readers never see a half-written file.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        if let Err(e) = fs::rename(&tmp, &path) {
            if let Err(cleanup) = fs::remove_file(&tmp) {
                tracing::warn!(
                    error = %cleanup,
                    path = %tmp.display(),
                    "failed to remove temp file"
                );
            }
            return Err(e.into());
        }
        Ok(())
    }
}
