//! Persisted favorites set.
//!
//! `FavoritesStore` keeps an ordered, duplicate-free list of positive
//! movie ids, persisted as a JSON array under a single well-known key.
//! The persistence mechanism is an injected [`KeyValueStorage`] so the
//! store can be tested without touching the filesystem.
//!
//! The store self-heals on load: anything other than a JSON array of
//! positive integers is repaired (invalid elements dropped, duplicates
//! collapsed, non-arrays reset to empty), logged, and the cleaned list
//! persisted immediately. Storage failures degrade to an empty set and
//! never fail the caller.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex as StdMutex;

use serde_json::Value;

/// Well-known storage key for the favorites list.
pub const FAVORITES_KEY: &str = "favorites";

/// Minimal string key-value persistence capability.
pub trait KeyValueStorage: Send + Sync {
    /// Returns the stored value for `key`, or `None` if absent.
    fn read(&self, key: &str) -> io::Result<Option<String>>;
    /// Stores `value` under `key`, overwriting any previous value.
    fn write(&self, key: &str, value: &str) -> io::Result<()>;
}

/// File-backed storage: one `<key>.json` file per key under `dir`.
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStorage for JsonFileStorage {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn write(&self, key: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)
    }
}

/// In-memory storage for tests and ephemeral deployments.
#[derive(Default)]
pub struct InMemoryStorage {
    entries: StdMutex<HashMap<String, String>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a value, e.g. to simulate previously persisted state.
    pub fn seed(self, key: &str, value: &str) -> Self {
        self.entries
            .lock()
            .expect("in-memory storage lock poisoned")
            .insert(key.to_string(), value.to_string());
        self
    }
}

impl KeyValueStorage for InMemoryStorage {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self
            .entries
            .lock()
            .expect("in-memory storage lock poisoned")
            .get(key)
            .cloned())
    }

    fn write(&self, key: &str, value: &str) -> io::Result<()> {
        self.entries
            .lock()
            .expect("in-memory storage lock poisoned")
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Ordered set of favorite movie ids with injected persistence.
pub struct FavoritesStore {
    storage: Box<dyn KeyValueStorage>,
    ids: Vec<u64>,
}

impl FavoritesStore {
    /// Load the favorites list from storage, healing corrupt data.
    pub fn load(storage: Box<dyn KeyValueStorage>) -> Self {
        let raw = match storage.read(FAVORITES_KEY) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("Failed to read favorites, starting empty: {}", err);
                None
            }
        };

        let mut store = Self {
            storage,
            ids: Vec::new(),
        };

        if let Some(raw) = raw {
            let (ids, repaired) = sanitize(&raw);
            store.ids = ids;
            if repaired {
                tracing::warn!(
                    "Stored favorites were corrupt; healed to {} valid ids",
                    store.ids.len()
                );
                store.persist();
            }
        }

        store
    }

    /// Favorite ids in insertion order.
    pub fn list(&self) -> &[u64] {
        &self.ids
    }

    pub fn contains(&self, id: u64) -> bool {
        self.ids.contains(&id)
    }

    /// Add `id` to the set. Adding an existing id is a no-op.
    pub fn add(&mut self, id: u64) {
        if !self.contains(id) {
            self.ids.push(id);
            self.persist();
        }
    }

    /// Remove `id` from the set. Removing an absent id is a no-op.
    pub fn remove(&mut self, id: u64) {
        let before = self.ids.len();
        self.ids.retain(|&existing| existing != id);
        if self.ids.len() != before {
            self.persist();
        }
    }

    /// Flip membership for `id`. Returns `true` when the id is now a favorite.
    pub fn toggle(&mut self, id: u64) -> bool {
        if self.contains(id) {
            self.remove(id);
            false
        } else {
            self.add(id);
            true
        }
    }

    fn persist(&self) {
        let serialized = match serde_json::to_string(&self.ids) {
            Ok(s) => s,
            Err(err) => {
                tracing::error!("Failed to serialize favorites: {}", err);
                return;
            }
        };
        if let Err(err) = self.storage.write(FAVORITES_KEY, &serialized) {
            tracing::error!("Failed to persist favorites: {}", err);
        }
    }
}

/// Parse a stored favorites value, salvaging what is valid.
///
/// Returns the cleaned id list and whether any repair was needed. A value
/// that is not a JSON array resets to empty; array elements that are not
/// positive integers are dropped; duplicates keep their first occurrence.
fn sanitize(raw: &str) -> (Vec<u64>, bool) {
    let parsed: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(_) => return (Vec::new(), true),
    };

    let items = match parsed {
        Value::Array(items) => items,
        _ => return (Vec::new(), true),
    };

    let mut ids = Vec::with_capacity(items.len());
    let mut repaired = false;
    for item in &items {
        match item.as_u64() {
            Some(id) if id > 0 && !ids.contains(&id) => ids.push(id),
            _ => repaired = true,
        }
    }

    (ids, repaired)
}
