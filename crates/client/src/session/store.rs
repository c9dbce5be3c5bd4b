//! Persisted session state.
//!
//! The browser original kept two cookies (tokens) and one localStorage key
//! (cart identifier); here the same three values live in a single JSON state
//! file. The store is deliberately last-writer-wins: concurrent refreshes may
//! both write, and the later pair simply replaces the earlier one.

use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use mercadito_core::CartId;

use super::CredentialPair;

/// Errors reading or writing the persisted session state.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// State file contents could not be parsed.
    #[error("state file parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Persistence seam for the session's credential pair and cart identifier.
///
/// Implementations must be safe to share across tasks; writes are
/// last-writer-wins.
pub trait CredentialStore: Send + Sync {
    /// Load the persisted credential pair, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn load(&self) -> Result<Option<CredentialPair>, StoreError>;

    /// Persist a credential pair, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn save(&self, pair: &CredentialPair) -> Result<(), StoreError>;

    /// Delete the persisted credential pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn clear_credentials(&self) -> Result<(), StoreError>;

    /// Load the persisted cart identifier, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn cart_id(&self) -> Result<Option<CartId>, StoreError>;

    /// Persist the cart identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set_cart_id(&self, cart_id: &CartId) -> Result<(), StoreError>;

    /// Delete the persisted cart identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn clear_cart_id(&self) -> Result<(), StoreError>;
}

/// On-disk shape of the state file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PersistedState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    access: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cart_id: Option<CartId>,
}

// ─────────────────────────────────────────────────────────────────────────────
// FileStore
// ─────────────────────────────────────────────────────────────────────────────

/// JSON-file-backed store, the cookie jar of the terminal client.
///
/// The mutex only serializes read-modify-write cycles within this process;
/// across processes the file is last-writer-wins.
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// Create a store backed by the given file. The file and its parent
    /// directory are created lazily on first write.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    fn read_state(&self) -> Result<PersistedState, StoreError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(PersistedState::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_state(&self, state: &PersistedState) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&self.path, serde_json::to_vec_pretty(state)?)?;

        // The file holds bearer credentials; keep it private to the user.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    fn update<F>(&self, mutate: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut PersistedState),
    {
        let _guard = self.lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut state = self.read_state()?;
        mutate(&mut state);
        self.write_state(&state)
    }
}

impl CredentialStore for FileStore {
    fn load(&self) -> Result<Option<CredentialPair>, StoreError> {
        let state = self.read_state()?;
        Ok(match (state.access, state.refresh) {
            (Some(access), Some(refresh)) => Some(CredentialPair { access, refresh }),
            _ => None,
        })
    }

    fn save(&self, pair: &CredentialPair) -> Result<(), StoreError> {
        self.update(|state| {
            state.access = Some(pair.access.clone());
            state.refresh = Some(pair.refresh.clone());
        })
    }

    fn clear_credentials(&self) -> Result<(), StoreError> {
        self.update(|state| {
            state.access = None;
            state.refresh = None;
        })
    }

    fn cart_id(&self) -> Result<Option<CartId>, StoreError> {
        Ok(self.read_state()?.cart_id)
    }

    fn set_cart_id(&self, cart_id: &CartId) -> Result<(), StoreError> {
        self.update(|state| state.cart_id = Some(cart_id.clone()))
    }

    fn clear_cart_id(&self) -> Result<(), StoreError> {
        self.update(|state| state.cart_id = None)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// MemoryStore
// ─────────────────────────────────────────────────────────────────────────────

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<PersistedState>,
}

impl MemoryStore {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut PersistedState) -> R) -> R {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&mut state)
    }
}

impl CredentialStore for MemoryStore {
    fn load(&self) -> Result<Option<CredentialPair>, StoreError> {
        Ok(self.with_state(|state| match (&state.access, &state.refresh) {
            (Some(access), Some(refresh)) => Some(CredentialPair {
                access: access.clone(),
                refresh: refresh.clone(),
            }),
            _ => None,
        }))
    }

    fn save(&self, pair: &CredentialPair) -> Result<(), StoreError> {
        self.with_state(|state| {
            state.access = Some(pair.access.clone());
            state.refresh = Some(pair.refresh.clone());
        });
        Ok(())
    }

    fn clear_credentials(&self) -> Result<(), StoreError> {
        self.with_state(|state| {
            state.access = None;
            state.refresh = None;
        });
        Ok(())
    }

    fn cart_id(&self) -> Result<Option<CartId>, StoreError> {
        Ok(self.with_state(|state| state.cart_id.clone()))
    }

    fn set_cart_id(&self, cart_id: &CartId) -> Result<(), StoreError> {
        self.with_state(|state| state.cart_id = Some(cart_id.clone()));
        Ok(())
    }

    fn clear_cart_id(&self) -> Result<(), StoreError> {
        self.with_state(|state| state.cart_id = None);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_state_file(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("mercadito-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn test_file_store_roundtrip() {
        let path = temp_state_file("roundtrip");
        let store = FileStore::new(path.clone());

        assert!(store.load().unwrap().is_none());

        let pair = CredentialPair {
            access: "access-token".to_string(),
            refresh: "refresh-token".to_string(),
        };
        store.save(&pair).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.access, "access-token");
        assert_eq!(loaded.refresh, "refresh-token");

        store.clear_credentials().unwrap();
        assert!(store.load().unwrap().is_none());

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_file_store_cart_id_survives_credential_clear() {
        let path = temp_state_file("cart-id");
        let store = FileStore::new(path.clone());

        let cart_id = CartId::generate();
        store.set_cart_id(&cart_id).unwrap();
        store
            .save(&CredentialPair {
                access: "a".to_string(),
                refresh: "r".to_string(),
            })
            .unwrap();

        store.clear_credentials().unwrap();
        assert_eq!(store.cart_id().unwrap(), Some(cart_id));

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let store = FileStore::new(temp_state_file("never-written"));
        assert!(store.load().unwrap().is_none());
        assert!(store.cart_id().unwrap().is_none());
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();

        let pair = CredentialPair {
            access: "a".to_string(),
            refresh: "r".to_string(),
        };
        store.save(&pair).unwrap();
        assert!(store.load().unwrap().is_some());

        let cart_id = CartId::generate();
        store.set_cart_id(&cart_id).unwrap();
        assert_eq!(store.cart_id().unwrap(), Some(cart_id));

        store.clear_credentials().unwrap();
        store.clear_cart_id().unwrap();
        assert!(store.load().unwrap().is_none());
        assert!(store.cart_id().unwrap().is_none());
    }
}
