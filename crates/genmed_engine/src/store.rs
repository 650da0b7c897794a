//! Durable client storage: a small string map that survives restarts.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use genmed_core::{Preferences, SessionToken};
use genmed_logging::{genmed_debug, genmed_warn};
use thiserror::Error;

use crate::persist::{ensure_state_dir, AtomicFileWriter, PersistError};

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const TOKEN_TYPE_KEY: &str = "token_type";
pub const PREFERENCES_KEY: &str = "preferences";
pub const STORE_FILENAME: &str = "store.ron";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Persist(#[from] PersistError),
    #[error("failed to encode store: {0}")]
    Encode(String),
    #[error("stored value for {key:?} is unreadable: {reason}")]
    Decode { key: &'static str, reason: String },
}

pub trait DurableStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

type Entries = BTreeMap<String, String>;

fn lock(entries: &Mutex<Entries>) -> MutexGuard<'_, Entries> {
    entries.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-process store; nothing is written to disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<Entries>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DurableStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(lock(&self.entries).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        lock(&self.entries).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        lock(&self.entries).remove(key);
        Ok(())
    }
}

/// RON map at `<dir>/store.ron`. Every change rewrites the file atomically;
/// a failed write leaves both the file and the in-memory map unchanged.
#[derive(Debug)]
pub struct FileStore {
    writer: AtomicFileWriter,
    entries: Mutex<Entries>,
}

impl FileStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        ensure_state_dir(&dir)?;
        let entries = read_entries(&dir.join(STORE_FILENAME))?;
        Ok(Self {
            writer: AtomicFileWriter::new(dir),
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> PathBuf {
        self.writer.dir().join(STORE_FILENAME)
    }

    fn update(&self, change: impl FnOnce(&mut Entries)) -> Result<(), StoreError> {
        let mut entries = lock(&self.entries);
        let mut next = entries.clone();
        change(&mut next);
        if next == *entries {
            return Ok(());
        }
        let content = ron::ser::to_string_pretty(&next, ron::ser::PrettyConfig::new())
            .map_err(|err| StoreError::Encode(err.to_string()))?;
        self.writer.write(STORE_FILENAME, &content)?;
        *entries = next;
        Ok(())
    }
}

fn read_entries(path: &Path) -> Result<Entries, StoreError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Entries::new()),
        Err(err) => return Err(PersistError::Io(err).into()),
    };
    match ron::from_str(&content) {
        Ok(entries) => {
            genmed_debug!("Loaded client store from {:?}", path);
            Ok(entries)
        }
        Err(err) => {
            genmed_warn!("Ignoring unreadable client store {:?}: {}", path, err);
            Ok(Entries::new())
        }
    }
}

impl DurableStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(lock(&self.entries).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.update(|entries| {
            entries.remove(key);
        })
    }
}

/// Returns the token only when both keys are present.
pub fn load_session_token(store: &dyn DurableStore) -> Result<Option<SessionToken>, StoreError> {
    let access_token = store.get(ACCESS_TOKEN_KEY)?;
    let token_type = store.get(TOKEN_TYPE_KEY)?;
    Ok(match (access_token, token_type) {
        (Some(access_token), Some(token_type)) => Some(SessionToken {
            access_token,
            token_type,
        }),
        _ => None,
    })
}

pub fn save_session_token(
    store: &dyn DurableStore,
    token: &SessionToken,
) -> Result<(), StoreError> {
    store.set(ACCESS_TOKEN_KEY, &token.access_token)?;
    store.set(TOKEN_TYPE_KEY, &token.token_type)
}

pub fn clear_session_token(store: &dyn DurableStore) -> Result<(), StoreError> {
    store.remove(ACCESS_TOKEN_KEY)?;
    store.remove(TOKEN_TYPE_KEY)
}

pub fn load_preferences(store: &dyn DurableStore) -> Result<Option<Preferences>, StoreError> {
    let Some(raw) = store.get(PREFERENCES_KEY)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|err| StoreError::Decode {
            key: PREFERENCES_KEY,
            reason: err.to_string(),
        })
}

pub fn save_preferences(
    store: &dyn DurableStore,
    preferences: &Preferences,
) -> Result<(), StoreError> {
    let raw =
        serde_json::to_string(preferences).map_err(|err| StoreError::Encode(err.to_string()))?;
    store.set(PREFERENCES_KEY, &raw)
}
