//! Persistence Adapter for the CRM workspace.
//!
//! Saves and restores a user's open tabs through a string key-value store
//! (key `tabs_<userId>`). Last write wins; reads that fail for any reason are
//! treated as "nothing saved" so a broken store never blocks startup.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{params, OptionalExtension};

use crate::database::connection::Database;
use crate::types::errors::StoreError;
use crate::types::workspace::Workspace;

/// Default key prefix for saved workspaces.
pub const DEFAULT_KEY_PREFIX: &str = "tabs_";

/// Durable string store, shaped like browser local storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// SQLite-backed store using the `kv_store` table.
pub struct SqliteKeyValueStore {
    db: Database,
}

impl SqliteKeyValueStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.db
            .connection()
            .query_row("SELECT value FROM kv_store WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(|e| StoreError::DatabaseError(e.to_string()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64;
        self.db
            .connection()
            .execute(
                "INSERT OR REPLACE INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)",
                params![key, value, now],
            )
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.db
            .connection()
            .execute("DELETE FROM kv_store WHERE key = ?1", params![key])
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}

/// Process-local store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;
        entries.remove(key);
        Ok(())
    }
}

/// Trait defining workspace persistence operations.
pub trait PersistenceAdapterTrait {
    fn load(&self, user_id: &str) -> Option<Workspace>;
    fn save(&self, user_id: &str, workspace: &Workspace) -> Result<(), StoreError>;
    fn clear(&self, user_id: &str) -> Result<(), StoreError>;
}

/// Serializes workspaces to JSON under a per-user key.
pub struct PersistenceAdapter<S: KeyValueStore> {
    store: S,
    key_prefix: String,
}

impl<S: KeyValueStore> PersistenceAdapter<S> {
    pub fn new(store: S) -> Self {
        Self::with_prefix(store, DEFAULT_KEY_PREFIX)
    }

    pub fn with_prefix(store: S, key_prefix: &str) -> Self {
        Self {
            store,
            key_prefix: key_prefix.to_string(),
        }
    }

    /// Storage key for a user, e.g. `tabs_42`.
    pub fn key_for(&self, user_id: &str) -> String {
        format!("{}{}", self.key_prefix, user_id)
    }

    /// Later loads and saves use `key_prefix`; entries under the old prefix stay put.
    pub fn set_key_prefix(&mut self, key_prefix: &str) {
        self.key_prefix = key_prefix.to_string();
    }

    pub fn key_prefix(&self) -> &str {
        &self.key_prefix
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: KeyValueStore> PersistenceAdapterTrait for PersistenceAdapter<S> {
    fn load(&self, user_id: &str) -> Option<Workspace> {
        let key = self.key_for(user_id);
        let raw = match self.store.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("could not read saved workspace {}: {}", key, e);
                return None;
            }
        };

        match serde_json::from_str::<Workspace>(&raw) {
            Ok(workspace) => Some(workspace),
            Err(e) => {
                log::warn!("discarding unreadable workspace {}: {}", key, e);
                None
            }
        }
    }

    fn save(&self, user_id: &str, workspace: &Workspace) -> Result<(), StoreError> {
        let json = serde_json::to_string(workspace)
            .map_err(|e| StoreError::SerializationError(e.to_string()))?;
        self.store.set(&self.key_for(user_id), &json)
    }

    fn clear(&self, user_id: &str) -> Result<(), StoreError> {
        self.store.remove(&self.key_for(user_id))
    }
}
