// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Persisted state.
//!
//! State lives in a [`KeyValueStore`] as independent JSON blobs, one per key
//! (`user`, `bookings`, `reviews`). [`JsonRepository`] gives a typed view over
//! one key: domain values are converted to their stored form on save and back
//! on load, so date handling stays at this boundary.
//!
//! A record that cannot be read or parsed is discarded and loads as empty.

use crate::error::StorageError;
use dashmap::DashMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;

/// String blobs addressed by key.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-process store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).map(|value| value.clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Directory-backed store: each key is a `<key>.json` file under `root`.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

fn io_error(key: &str, error: std::io::Error) -> StorageError {
    StorageError::Io {
        key: key.to_owned(),
        message: error.to_string(),
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(key, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root).map_err(|e| io_error(key, e))?;
        // Staged write, then rename over the target.
        let target = self.path(key);
        let staging = self.root.join(format!(".{key}.json.tmp"));
        fs::write(&staging, value).map_err(|e| io_error(key, e))?;
        fs::rename(&staging, &target).map_err(|e| io_error(key, e))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(key, e)),
        }
    }
}

/// A domain type persisted as a JSON array under a fixed key.
pub trait Record: Sized {
    const KEY: &'static str;

    /// The on-disk shape of one record.
    type Stored: Serialize + DeserializeOwned;

    fn to_stored(&self) -> Self::Stored;
    fn from_stored(stored: Self::Stored) -> Self;
}

/// Typed collection storage.
pub trait Repository<T>: Send + Sync {
    /// Loads every record. Unreadable or corrupt state loads as empty.
    fn load(&self) -> Vec<T>;
    fn save(&self, items: &[T]) -> Result<(), StorageError>;
    fn clear(&self) -> Result<(), StorageError>;
}

/// [`Repository`] over a [`KeyValueStore`] key holding a JSON array.
pub struct JsonRepository<T> {
    store: Arc<dyn KeyValueStore>,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> JsonRepository<T> {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }
}

impl<T: Record> Repository<T> for JsonRepository<T> {
    fn load(&self) -> Vec<T> {
        let raw = match self.store.get(T::KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(key = T::KEY, error = %e, "failed to read stored records");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<T::Stored>>(&raw) {
            Ok(stored) => stored.into_iter().map(T::from_stored).collect(),
            Err(e) => {
                warn!(key = T::KEY, error = %e, "discarding corrupt stored records");
                if let Err(e) = self.store.remove(T::KEY) {
                    warn!(key = T::KEY, error = %e, "failed to remove corrupt record");
                }
                Vec::new()
            }
        }
    }

    fn save(&self, items: &[T]) -> Result<(), StorageError> {
        let stored: Vec<T::Stored> = items.iter().map(T::to_stored).collect();
        let json = serde_json::to_string(&stored).map_err(|e| StorageError::Encode {
            key: T::KEY.to_owned(),
            message: e.to_string(),
        })?;
        self.store.set(T::KEY, &json)
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(T::KEY)
    }
}
