//! Persisted credential pair.
//!
//! Two opaque strings keyed `accessToken` and `refreshToken`. The store knows
//! nothing about validity; it only saves, reads and clears.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::StoreError;

pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Key-value storage for the access/refresh pair.
pub trait TokenStore: Send + Sync {
    fn access(&self) -> Option<String>;

    fn refresh(&self) -> Option<String>;

    /// Persist both tokens.
    fn save(&self, access: &str, refresh: &str) -> Result<(), StoreError>;

    /// Replace only the access token (after a refresh).
    fn set_access(&self, access: &str) -> Result<(), StoreError>;

    /// Remove both tokens.
    fn clear(&self) -> Result<(), StoreError>;
}

// =============================================================================
// In-memory store
// =============================================================================

/// Process-local store.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    entries: RwLock<HashMap<&'static str, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn get(&self, key: &'static str) -> Option<String> {
        self.entries.read().ok()?.get(key).cloned()
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<&'static str, String>>, StoreError> {
        self.entries
            .write()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))
    }
}

impl TokenStore for MemoryTokenStore {
    fn access(&self) -> Option<String> {
        self.get(ACCESS_TOKEN_KEY)
    }

    fn refresh(&self) -> Option<String> {
        self.get(REFRESH_TOKEN_KEY)
    }

    fn save(&self, access: &str, refresh: &str) -> Result<(), StoreError> {
        let mut entries = self.write()?;
        entries.insert(ACCESS_TOKEN_KEY, access.to_string());
        entries.insert(REFRESH_TOKEN_KEY, refresh.to_string());
        Ok(())
    }

    fn set_access(&self, access: &str) -> Result<(), StoreError> {
        self.write()?.insert(ACCESS_TOKEN_KEY, access.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.write()?.clear();
        Ok(())
    }
}

// =============================================================================
// File-backed store
// =============================================================================

/// On-disk layout of the credentials file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredTokens {
    #[serde(rename = "accessToken", default, skip_serializing_if = "Option::is_none")]
    access: Option<String>,
    #[serde(rename = "refreshToken", default, skip_serializing_if = "Option::is_none")]
    refresh: Option<String>,
}

/// Store persisted as a JSON file; survives process restarts.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: RwLock<()>,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: RwLock::new(()),
        }
    }

    /// Store at the default location (`<data dir>/diary/credentials.json`).
    pub fn at_default_path() -> Self {
        Self::new(default_credentials_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file. Missing → empty; unreadable or corrupt → empty with a
    /// warning, so a damaged file degrades to "signed out".
    fn load(&self) -> StoredTokens {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return StoredTokens::default(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "cannot read credentials file");
                return StoredTokens::default();
            }
        };
        serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "ignoring corrupt credentials file");
            StoredTokens::default()
        })
    }

    fn persist(&self, tokens: &StoredTokens) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(tokens)?;
        // Readers never observe a partially written file.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), "credentials saved");
        Ok(())
    }

    fn guard(&self) -> Result<std::sync::RwLockWriteGuard<'_, ()>, StoreError> {
        self.lock
            .write()
            .map_err(|_| StoreError::Unavailable("credentials lock poisoned".into()))
    }
}

impl TokenStore for FileTokenStore {
    fn access(&self) -> Option<String> {
        self.load().access
    }

    fn refresh(&self) -> Option<String> {
        self.load().refresh
    }

    fn save(&self, access: &str, refresh: &str) -> Result<(), StoreError> {
        let _guard = self.guard()?;
        self.persist(&StoredTokens {
            access: Some(access.to_string()),
            refresh: Some(refresh.to_string()),
        })
    }

    fn set_access(&self, access: &str) -> Result<(), StoreError> {
        let _guard = self.guard()?;
        let mut tokens = self.load();
        tokens.access = Some(access.to_string());
        self.persist(&tokens)
    }

    fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.guard()?;
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Default credentials path under the platform data directory.
pub fn default_credentials_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("diary")
        .join("credentials.json")
}
