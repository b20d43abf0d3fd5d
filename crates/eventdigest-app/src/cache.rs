//! Key-value cache for session state and preferences.
//!
//! Backends store raw bytes under string keys. Typed access goes through
//! [`KeyValueCacheExt`], either JSON-encoded (`encode = true`) or, for
//! booleans, numbers and strings, as their plain text form.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::CacheError;

/// Keys of the values the application persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// The active calendar of the session.
    CurrentCalendar,
    UseFacebookCalendar,
    UseGoogleCalendar,
    /// The template selected for summary posts.
    SummaryPostTemplate,
}

impl CacheKey {
    pub const ALL: [CacheKey; 4] = [
        Self::CurrentCalendar,
        Self::UseFacebookCalendar,
        Self::UseGoogleCalendar,
        Self::SummaryPostTemplate,
    ];

    /// The storage key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CurrentCalendar => "session.currentCalendar",
            Self::UseFacebookCalendar => "preferences.useFacebookCalendar",
            Self::UseGoogleCalendar => "preferences.useGoogleCalendar",
            Self::SummaryPostTemplate => "preferences.summaryPostTemplate",
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A byte store keyed by strings.
pub trait KeyValueCache: Send + Sync {
    fn get(&self, key: &str) -> Option<Vec<u8>>;

    fn set(&self, key: &str, value: Vec<u8>) -> Result<(), CacheError>;

    fn remove(&self, key: &str) -> Result<(), CacheError>;

    /// Removes every key.
    fn clear(&self) -> Result<(), CacheError>;
}

/// Typed access to a [`KeyValueCache`].
pub trait KeyValueCacheExt: KeyValueCache {
    /// Stores `value` under `key`.
    ///
    /// With `encode` the value is stored as JSON. Without it the value must
    /// be a boolean, number or string and is stored as plain text.
    fn save<T: Serialize + ?Sized>(
        &self,
        key: CacheKey,
        value: &T,
        encode: bool,
    ) -> Result<(), CacheError> {
        let bytes = if encode {
            serde_json::to_vec(value).map_err(|source| CacheError::Encode {
                key: key.to_string(),
                source,
            })?
        } else {
            let value = serde_json::to_value(value).map_err(|source| CacheError::Encode {
                key: key.to_string(),
                source,
            })?;
            match value {
                Value::String(text) => text.into_bytes(),
                Value::Bool(_) | Value::Number(_) => value.to_string().into_bytes(),
                _ => {
                    return Err(CacheError::NotScalar {
                        key: key.to_string(),
                    });
                }
            }
        };

        self.set(key.as_str(), bytes)
    }

    /// Loads the value under `key`, `None` if absent or unreadable.
    ///
    /// `decode` must match the `encode` flag the value was saved with.
    fn load<T: DeserializeOwned>(&self, key: CacheKey, decode: bool) -> Option<T> {
        let bytes = self.get(key.as_str())?;

        let result = if decode {
            serde_json::from_slice(&bytes)
        } else {
            let text = String::from_utf8_lossy(&bytes).into_owned();
            serde_json::from_str(&text).or_else(|_| serde_json::from_value(Value::String(text)))
        };

        match result {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key = %key, error = %err, "ignoring unreadable cached value");
                None
            }
        }
    }
}

impl<C: KeyValueCache + ?Sized> KeyValueCacheExt for C {}

/// An in-process cache.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueCache for MemoryCache {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: Vec<u8>) -> Result<(), CacheError> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), CacheError> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        Ok(())
    }
}

/// A cache kept in a single JSON object file, rewritten on every change.
#[derive(Debug)]
pub struct FileCache {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl FileCache {
    /// Opens the cache at `path`. A missing file is an empty cache; an
    /// unreadable one is logged and replaced on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|err| {
                warn!(path = %path.display(), error = %err, "cache file unreadable, starting empty");
                HashMap::new()
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(err.into()),
        };

        debug!(path = %path.display(), entries = entries.len(), "opened cache");
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Returns the default cache file path.
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("eventdigest")
            .join("cache.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &HashMap<String, String>) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(entries).map_err(|source| CacheError::Encode {
            key: self.path.display().to_string(),
            source,
        })?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    fn update(
        &self,
        change: impl FnOnce(&mut HashMap<String, String>) -> bool,
    ) -> Result<(), CacheError> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if change(&mut entries) {
            self.persist(&entries)?;
        }
        Ok(())
    }
}

impl KeyValueCache for FileCache {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .map(|value| value.clone().into_bytes())
    }

    fn set(&self, key: &str, value: Vec<u8>) -> Result<(), CacheError> {
        let value = String::from_utf8(value).map_err(|_| CacheError::NotText {
            key: key.to_string(),
        })?;
        self.update(|entries| entries.insert(key.to_string(), value.clone()) != Some(value))
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.update(|entries| entries.remove(key).is_some())
    }

    fn clear(&self) -> Result<(), CacheError> {
        self.update(|entries| {
            let changed = !entries.is_empty();
            entries.clear();
            changed
        })
    }
}
