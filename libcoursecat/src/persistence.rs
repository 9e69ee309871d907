//! Persistence bridge between the store and durable key-value storage
//!
//! Three domains are persisted, each under its own key:
//!
//! | key          | format                                                 |
//! |--------------|--------------------------------------------------------|
//! | `favourites` | JSON array of course ids, e.g. `[3,1]`                 |
//! | `theme`      | raw `light` or `dark`                                  |
//! | `auth`       | `{"isAuthenticated":..,"user":..,"token":..}`          |
//!
//! The bridge is the only writer of these keys (and of `registeredUser`).
//! Failures on one key are logged and never stop the others.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{Result, StorageError};
use crate::storage::KeyValueStore;
use crate::store::{Action, AppState, Domain, Store};
use crate::types::{AuthSession, Registration, ThemeMode};

pub const FAVOURITES_KEY: &str = "favourites";
pub const THEME_KEY: &str = "theme";
pub const AUTH_KEY: &str = "auth";
pub const REGISTERED_USER_KEY: &str = "registeredUser";

/// What hydration did with one key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Key absent; domain kept its default
    Missing,
    /// Value decoded and applied
    Restored,
    /// Read or decode failed; domain kept its default
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HydrationReport {
    pub favourites: KeyOutcome,
    pub theme: KeyOutcome,
    pub auth: KeyOutcome,
}

impl HydrationReport {
    /// Keys whose stored value could not be used
    pub fn failed_keys(&self) -> Vec<&'static str> {
        [
            (FAVOURITES_KEY, self.favourites),
            (THEME_KEY, self.theme),
            (AUTH_KEY, self.auth),
        ]
        .into_iter()
        .filter(|(_, outcome)| *outcome == KeyOutcome::Failed)
        .map(|(key, _)| key)
        .collect()
    }

    pub fn is_clean(&self) -> bool {
        self.failed_keys().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistReport {
    pub written: Vec<&'static str>,
    pub failed: Vec<&'static str>,
}

impl PersistReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// One-way synchronization between the [`Store`] and a [`KeyValueStore`]
#[derive(Clone)]
pub struct PersistenceBridge {
    kv: Arc<dyn KeyValueStore>,
}

impl PersistenceBridge {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Restore persisted domains into `store`.
    ///
    /// Never fails: a missing key leaves the domain at its default, and a
    /// key that cannot be read or decoded is logged and treated the same way.
    pub async fn hydrate(&self, store: &Store) -> HydrationReport {
        let favourites = self
            .hydrate_key(store, FAVOURITES_KEY, |raw| {
                decode_favourites(raw).map(Action::RestoreFavourites)
            })
            .await;

        let theme = self
            .hydrate_key(store, THEME_KEY, |raw| decode_theme(raw).map(Action::SetTheme))
            .await;

        let auth = self
            .hydrate_key(store, AUTH_KEY, |raw| decode_auth(raw).map(Action::RestoreAuth))
            .await;

        let report = HydrationReport {
            favourites,
            theme,
            auth,
        };

        if report.is_clean() {
            info!("state hydrated");
        } else {
            warn!(
                failed = ?report.failed_keys(),
                "state hydrated with defaults for unreadable keys"
            );
        }

        report
    }

    async fn hydrate_key<F>(&self, store: &Store, key: &'static str, decode: F) -> KeyOutcome
    where
        F: FnOnce(&str) -> std::result::Result<Action, String>,
    {
        let raw = match self.kv.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key, "nothing stored");
                return KeyOutcome::Missing;
            }
            Err(e) => {
                warn!(key, error = %e, "failed to read persisted value");
                return KeyOutcome::Failed;
            }
        };

        match decode(&raw) {
            Ok(action) => {
                store.dispatch(action);
                debug!(key, "restored");
                KeyOutcome::Restored
            }
            Err(e) => {
                warn!(key, error = %e, "failed to decode persisted value, keeping default");
                KeyOutcome::Failed
            }
        }
    }

    /// Write the persisted domains of `snapshot`.
    ///
    /// Each key is written independently. Errors are logged and reported,
    /// never returned; callers proceed as if the write succeeded.
    pub async fn persist(&self, snapshot: &AppState) -> PersistReport {
        let mut report = PersistReport::default();

        let entries: [(&'static str, std::result::Result<String, StorageError>); 3] = [
            (FAVOURITES_KEY, encode_favourites(&snapshot.favourites.items)),
            (THEME_KEY, Ok(encode_theme(snapshot.theme.mode))),
            (AUTH_KEY, encode_auth(&snapshot.auth)),
        ];

        for (key, encoded) in entries {
            let result = match encoded {
                Ok(value) => self.kv.set(key, &value).await,
                Err(e) => Err(e),
            };

            match result {
                Ok(()) => report.written.push(key),
                Err(e) => {
                    warn!(key, error = %e, "failed to persist value");
                    report.failed.push(key);
                }
            }
        }

        debug!(written = ?report.written, failed = ?report.failed, "state persisted");
        report
    }

    /// Persist only if the domain is one that lives on durable storage
    pub async fn persist_after(&self, domain: Domain, snapshot: &AppState) -> PersistReport {
        if domain.is_persisted() {
            self.persist(snapshot).await
        } else {
            PersistReport::default()
        }
    }

    /// Record a demo registration under `registeredUser`
    pub async fn save_registration(&self, registration: &Registration) -> Result<()> {
        let value = serde_json::to_string(registration).map_err(|e| StorageError::Encode {
            key: REGISTERED_USER_KEY.to_string(),
            message: e.to_string(),
        })?;
        self.kv.set(REGISTERED_USER_KEY, &value).await?;
        Ok(())
    }

    /// The last recorded registration, if any can be read
    pub async fn load_registration(&self) -> Option<Registration> {
        match self.kv.get(REGISTERED_USER_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(registration) => Some(registration),
                Err(e) => {
                    warn!(
                        key = REGISTERED_USER_KEY,
                        error = %e,
                        "ignoring unreadable registration"
                    );
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(key = REGISTERED_USER_KEY, error = %e, "failed to read registration");
                None
            }
        }
    }
}

pub fn encode_favourites(items: &[u32]) -> std::result::Result<String, StorageError> {
    serde_json::to_string(items).map_err(|e| StorageError::Encode {
        key: FAVOURITES_KEY.to_string(),
        message: e.to_string(),
    })
}

pub fn decode_favourites(raw: &str) -> std::result::Result<Vec<u32>, String> {
    serde_json::from_str(raw).map_err(|e| e.to_string())
}

pub fn encode_theme(mode: ThemeMode) -> String {
    mode.as_str().to_string()
}

/// Only the exact stored forms are accepted
pub fn decode_theme(raw: &str) -> std::result::Result<ThemeMode, String> {
    match raw {
        "light" => Ok(ThemeMode::Light),
        "dark" => Ok(ThemeMode::Dark),
        other => Err(format!("unknown theme mode '{}'", other)),
    }
}

pub fn encode_auth(session: &AuthSession) -> std::result::Result<String, StorageError> {
    serde_json::to_string(session).map_err(|e| StorageError::Encode {
        key: AUTH_KEY.to_string(),
        message: e.to_string(),
    })
}

pub fn decode_auth(raw: &str) -> std::result::Result<AuthSession, String> {
    let session: AuthSession = serde_json::from_str(raw).map_err(|e| e.to_string())?;
    if !session.is_consistent() {
        return Err("authenticated session without user or token".to_string());
    }
    Ok(session)
}
