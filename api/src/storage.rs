//! Durable client-side token storage.
//!
//! Two opaque strings survive restarts: the bearer token under [`TOKEN_KEY`]
//! and the refresh token under [`REFRESH_TOKEN_KEY`]. Any component may read
//! them; only the session layer writes them.

use crate::error::StorageError;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Storage key of the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Storage key of the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Durable token storage.
///
/// Implementations must make `clear` atomic with respect to concurrent
/// callers: exactly one of several racing `clear` calls observes the tokens
/// and returns `true`.
pub trait TokenStorage: Send + Sync {
    /// The persisted bearer token.
    fn access_token(&self) -> Option<String>;

    /// The persisted refresh token.
    fn refresh_token(&self) -> Option<String>;

    /// Persist a bearer token. A `Some` refresh token replaces the stored
    /// one; `None` leaves it untouched.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing store cannot be written.
    fn save(&self, access_token: &str, refresh_token: Option<&str>) -> Result<(), StorageError>;

    /// Remove both tokens. Returns whether anything was stored.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing store cannot be written.
    fn clear(&self) -> Result<bool, StorageError>;
}

type Slots = BTreeMap<String, String>;

fn lock(slots: &Mutex<Slots>) -> MutexGuard<'_, Slots> {
    slots.lock().unwrap_or_else(PoisonError::into_inner)
}

fn apply_save(slots: &mut Slots, access_token: &str, refresh_token: Option<&str>) {
    slots.insert(TOKEN_KEY.to_string(), access_token.to_string());
    if let Some(refresh) = refresh_token {
        slots.insert(REFRESH_TOKEN_KEY.to_string(), refresh.to_string());
    }
}

fn apply_clear(slots: &mut Slots) -> bool {
    let had_token = slots.remove(TOKEN_KEY).is_some();
    let had_refresh = slots.remove(REFRESH_TOKEN_KEY).is_some();
    had_token || had_refresh
}

// ═══════════════════════════════════════════════════════════
// In-memory storage
// ═══════════════════════════════════════════════════════════

/// Process-local token storage. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryTokenStorage {
    slots: Mutex<Slots>,
}

impl MemoryTokenStorage {
    /// Create empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage that already holds tokens, as after a previous login.
    #[must_use]
    pub fn with_tokens(access_token: &str, refresh_token: Option<&str>) -> Self {
        let storage = Self::new();
        apply_save(&mut lock(&storage.slots), access_token, refresh_token);
        storage
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn access_token(&self) -> Option<String> {
        lock(&self.slots).get(TOKEN_KEY).cloned()
    }

    fn refresh_token(&self) -> Option<String> {
        lock(&self.slots).get(REFRESH_TOKEN_KEY).cloned()
    }

    fn save(&self, access_token: &str, refresh_token: Option<&str>) -> Result<(), StorageError> {
        apply_save(&mut lock(&self.slots), access_token, refresh_token);
        Ok(())
    }

    fn clear(&self) -> Result<bool, StorageError> {
        Ok(apply_clear(&mut lock(&self.slots)))
    }
}

impl fmt::Debug for MemoryTokenStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slots = lock(&self.slots);
        f.debug_struct("MemoryTokenStorage")
            .field("has_token", &slots.contains_key(TOKEN_KEY))
            .field("has_refresh_token", &slots.contains_key(REFRESH_TOKEN_KEY))
            .finish()
    }
}

// ═══════════════════════════════════════════════════════════
// File storage
// ═══════════════════════════════════════════════════════════

/// Token storage persisted as a small JSON document.
///
/// The file mirrors browser local storage: a flat object keyed by
/// [`TOKEN_KEY`] and [`REFRESH_TOKEN_KEY`]. Writes go through to disk while
/// the in-memory lock is held, so disk order matches call order.
pub struct FileTokenStorage {
    path: PathBuf,
    slots: Mutex<Slots>,
}

impl FileTokenStorage {
    /// Open storage at `path`. A missing file is an empty store.
    ///
    /// # Errors
    ///
    /// - [`StorageError::Io`] if the file exists but cannot be read
    /// - [`StorageError::Corrupt`] if it is not a JSON object of strings
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();

        let slots = match std::fs::read(&path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Slots::new(),
            Ok(bytes) => serde_json::from_slice::<Slots>(&bytes)
                .map_err(|e| StorageError::Corrupt(e.to_string()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Slots::new(),
            Err(e) => return Err(StorageError::Io(e.to_string())),
        };

        tracing::debug!(path = %path.display(), has_token = slots.contains_key(TOKEN_KEY), "Opened token storage");

        Ok(Self {
            path,
            slots: Mutex::new(slots),
        })
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, slots: &Slots) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::Io(e.to_string()))?;
        }
        let bytes =
            serde_json::to_vec_pretty(slots).map_err(|e| StorageError::Io(e.to_string()))?;
        std::fs::write(&self.path, bytes).map_err(|e| StorageError::Io(e.to_string()))
    }
}

impl TokenStorage for FileTokenStorage {
    fn access_token(&self) -> Option<String> {
        lock(&self.slots).get(TOKEN_KEY).cloned()
    }

    fn refresh_token(&self) -> Option<String> {
        lock(&self.slots).get(REFRESH_TOKEN_KEY).cloned()
    }

    fn save(&self, access_token: &str, refresh_token: Option<&str>) -> Result<(), StorageError> {
        let mut slots = lock(&self.slots);
        apply_save(&mut slots, access_token, refresh_token);
        self.persist(&slots)
    }

    fn clear(&self) -> Result<bool, StorageError> {
        let mut slots = lock(&self.slots);
        let had_tokens = apply_clear(&mut slots);
        if had_tokens {
            self.persist(&slots)?;
        }
        Ok(had_tokens)
    }
}

impl fmt::Debug for FileTokenStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slots = lock(&self.slots);
        f.debug_struct("FileTokenStorage")
            .field("path", &self.path)
            .field("has_token", &slots.contains_key(TOKEN_KEY))
            .field("has_refresh_token", &slots.contains_key(REFRESH_TOKEN_KEY))
            .finish()
    }
}
