//! Persistent key-value settings storage.
//!
//! A JSON document on disk, addressed through statically typed keys. The
//! read path never fails: a value that is missing or does not deserialize
//! as the key's type yields the caller-supplied default instead, with a
//! diagnostic logged for the mismatch case.

use std::fs;
use std::io;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

/// A settings key with its value type fixed at compile time.
pub struct Key<T> {
    name: &'static str,
    _value: PhantomData<fn() -> T>,
}

impl<T> Key<T> {
    /// Define a key. Intended for `const` items next to the code that owns
    /// the setting.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _value: PhantomData,
        }
    }

    /// The key's name in the stored document.
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

/// Why a read returned the default instead of a stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// No value is stored under the key.
    Missing,

    /// A value is stored but does not deserialize as the key's type.
    TypeMismatch,
}

/// Result of a settings read.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    /// The stored value deserialized as the key's type.
    Stored(T),

    /// The default was substituted.
    Fallback {
        value: T,
        reason: FallbackReason,
    },
}

impl<T> Lookup<T> {
    /// Unwrap to the value, stored or fallback.
    pub fn into_value(self) -> T {
        match self {
            Lookup::Stored(value) | Lookup::Fallback { value, .. } => value,
        }
    }

    /// Whether the default was substituted.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Lookup::Fallback { .. })
    }
}

/// Settings persistence error types.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to write settings file {path}: {source}")]
    Write {
        path: PathBuf,
        source: io::Error,
    },

    #[error("failed to encode settings document: {0}")]
    Encode(#[from] serde_json::Error),
}

/// JSON-document settings store.
pub struct Settings {
    path: PathBuf,
    values: Map<String, Value>,
}

impl Settings {
    /// Open the settings document at `path`.
    ///
    /// A missing file starts an empty store; an unreadable or corrupt file
    /// does the same with a warning. Opening never fails.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str::<Value>(&text) {
                Ok(Value::Object(map)) => map,
                Ok(_) => {
                    warn!(path = %path.display(), "settings file is not a JSON object, starting empty");
                    Map::new()
                }
                Err(err) => {
                    warn!(path = %path.display(), %err, "settings file is corrupt, starting empty");
                    Map::new()
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => Map::new(),
            Err(err) => {
                warn!(path = %path.display(), %err, "settings file is unreadable, starting empty");
                Map::new()
            }
        };

        Self { path, values }
    }

    /// Read a value, reporting whether the default was substituted and why.
    pub fn lookup<T: DeserializeOwned>(&self, key: &Key<T>, default: T) -> Lookup<T> {
        let Some(stored) = self.values.get(key.name()) else {
            return Lookup::Fallback {
                value: default,
                reason: FallbackReason::Missing,
            };
        };

        match serde_json::from_value(stored.clone()) {
            Ok(value) => Lookup::Stored(value),
            Err(err) => {
                debug!(
                    key = key.name(),
                    %err,
                    "stored settings value does not match the requested type"
                );
                Lookup::Fallback {
                    value: default,
                    reason: FallbackReason::TypeMismatch,
                }
            }
        }
    }

    /// Read a value, substituting `default` when it is missing or mismatched.
    pub fn get<T: DeserializeOwned>(&self, key: &Key<T>, default: T) -> T {
        self.lookup(key, default).into_value()
    }

    /// Write a value into the document.
    ///
    /// Plain data types always encode; a value that does not is dropped
    /// with a warning rather than surfaced to the caller.
    pub fn set<T: Serialize>(&mut self, key: &Key<T>, value: &T) {
        match serde_json::to_value(value) {
            Ok(encoded) => {
                self.values.insert(key.name().to_string(), encoded);
            }
            Err(err) => warn!(key = key.name(), %err, "could not encode settings value"),
        }
    }

    /// Persist the whole document to disk, creating parent directories.
    pub fn save(&self) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| SettingsError::Write {
                path: self.path.clone(),
                source,
            })?;
        }

        let text = serde_json::to_string_pretty(&Value::Object(self.values.clone()))?;
        fs::write(&self.path, text).map_err(|source| SettingsError::Write {
            path: self.path.clone(),
            source,
        })
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
