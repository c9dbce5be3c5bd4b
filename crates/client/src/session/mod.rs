//! Session and token lifecycle management.
//!
//! Owns the client-side authentication state: the persisted JWT pair, the
//! identity decoded from it, and the anonymous cart identifier. Every
//! outbound API call asks the session for a fresh bearer token first;
//! expired access tokens are exchanged transparently and a failed exchange
//! degrades to a clean logout, never to a propagated error.
//!
//! # Concurrency
//!
//! Several tasks may trigger a refresh at the same time. The persisted store
//! is last-writer-wins and every refresh call is independently valid against
//! the server, so the worst outcome of a race is a redundant round trip -
//! there is deliberately no refresh mutex or de-duplication.

mod claims;
mod store;

pub use claims::Identity;
pub use store::{CredentialStore, FileStore, MemoryStore, StoreError};

use std::sync::Arc;

use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use mercadito_core::{CartId, Email};

use crate::config::ClientConfig;
use crate::error::{ApiError, extract_detail};

/// JWT access/refresh pair as issued by the token endpoints.
///
/// Both tokens are opaque bearer strings; embedded claims are read with
/// [`claims::decode`] but never verified client-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialPair {
    /// Short-lived token attached as `Authorization: Bearer`.
    pub access: String,
    /// Longer-lived token exchanged for new pairs.
    pub refresh: String,
}

/// Wire shape of the token and refresh endpoints.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access: String,
    refresh: String,
}

/// Fields the registration endpoint expects.
#[derive(Debug)]
pub struct Registration {
    pub full_name: String,
    pub email: Email,
    pub phone: String,
    pub password: SecretString,
    pub password2: SecretString,
}

/// Session service with an explicit lifecycle: constructed at startup from
/// the persisted state file, cleared on logout.
///
/// Cheaply cloneable; all clones share the same store.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    http: reqwest::Client,
    token_url: String,
    refresh_url: String,
    register_url: String,
    store: Box<dyn CredentialStore>,
}

impl Session {
    /// Create a session service over the given credential store.
    #[must_use]
    pub fn new(config: &ClientConfig, store: Box<dyn CredentialStore>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_default();

        let base = config.api_url.as_str();

        Self {
            inner: Arc::new(SessionInner {
                http,
                token_url: format!("{base}user/token/"),
                refresh_url: format!("{base}user/token/refresh"),
                register_url: format!("{base}user/register/"),
                store,
            }),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Identity
    // ─────────────────────────────────────────────────────────────────────

    /// Identity claims of the logged-in user, or `None` when anonymous.
    ///
    /// Decoded (not verified) from the stored refresh token; side-effect
    /// free and infallible - an unreadable store or malformed token is just
    /// "not logged in".
    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        let pair = self.inner.store.load().ok().flatten()?;
        claims::decode(&pair.refresh)
    }

    /// Whether a credential pair is currently stored.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.identity().is_some()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Token lifecycle
    // ─────────────────────────────────────────────────────────────────────

    /// Produce a currently-valid access token, or `None` for anonymous
    /// requests.
    ///
    /// With no stored pair this is a no-op. An expired access token triggers
    /// exactly one refresh attempt; if that fails the session has been
    /// logged out and `None` is returned. Never returns an error - a broken
    /// session degrades to anonymous.
    pub async fn ensure_fresh(&self) -> Option<String> {
        let pair = self.inner.store.load().ok().flatten()?;

        if claims::is_expired(&pair.access, Utc::now().timestamp()) {
            debug!("access token expired, refreshing");
            return self.refresh().await.map(|fresh| fresh.access);
        }

        Some(pair.access)
    }

    /// Exchange the stored refresh token for a new credential pair.
    ///
    /// On success the new pair is persisted and returned. On any failure
    /// (transport error or non-2xx, notably a 401 for an expired refresh
    /// token) the session is logged out and `None` is returned.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Option<CredentialPair> {
        let refresh = self.inner.store.load().ok().flatten()?.refresh;

        let response = self
            .inner
            .http
            .post(&self.inner.refresh_url)
            .json(&serde_json::json!({ "refresh": refresh }))
            .send()
            .await;

        let pair = match response {
            Ok(response) if response.status().is_success() => {
                match response.json::<TokenResponse>().await {
                    Ok(tokens) => CredentialPair {
                        access: tokens.access,
                        refresh: tokens.refresh,
                    },
                    Err(error) => {
                        warn!(%error, "token refresh returned an unreadable body");
                        self.logout();
                        return None;
                    }
                }
            }
            Ok(response) => {
                warn!(status = %response.status(), "token refresh rejected, logging out");
                self.logout();
                return None;
            }
            Err(error) => {
                warn!(%error, "token refresh failed, logging out");
                self.logout();
                return None;
            }
        };

        // Last-writer-wins; a concurrent refresh may overwrite this pair,
        // and either pair is valid against the server.
        if let Err(error) = self.inner.store.save(&pair) {
            warn!(%error, "could not persist refreshed credentials");
        }

        Some(pair)
    }

    /// Log in with email and password, persisting the issued pair.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] with the server's message for
    /// rejected credentials, or a transport/store error.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &Email, password: &SecretString) -> Result<Identity, ApiError> {
        let response = self
            .inner
            .http
            .post(&self.inner.token_url)
            .json(&serde_json::json!({
                "email": email.as_str(),
                "password": password.expose_secret(),
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ApiError::Validation(extract_detail(&text)));
        }

        let tokens: TokenResponse = response.json().await?;
        self.install(CredentialPair {
            access: tokens.access,
            refresh: tokens.refresh,
        })
    }

    /// Register a new account, then log in with the same credentials.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] with the server's message when the
    /// registration is rejected, or a transport/store error.
    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register(&self, registration: &Registration) -> Result<Identity, ApiError> {
        let response = self
            .inner
            .http
            .post(&self.inner.register_url)
            .json(&serde_json::json!({
                "full_name": registration.full_name,
                "email": registration.email.as_str(),
                "phone": registration.phone,
                "password": registration.password.expose_secret(),
                "password2": registration.password2.expose_secret(),
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ApiError::Validation(extract_detail(&text)));
        }

        self.login(&registration.email, &registration.password)
            .await
    }

    /// Persist an externally-issued credential pair and decode its identity.
    ///
    /// # Errors
    ///
    /// Returns a store error if the pair cannot be persisted, or
    /// [`ApiError::Validation`] if the refresh token carries no readable
    /// claims.
    pub fn install(&self, pair: CredentialPair) -> Result<Identity, ApiError> {
        self.inner.store.save(&pair)?;

        claims::decode(&pair.refresh)
            .ok_or_else(|| ApiError::Validation("server issued an unreadable token".to_string()))
    }

    /// Clear the session: both tokens and the cart identifier.
    ///
    /// The cart identifier is cleared so a subsequent anonymous session
    /// starts a fresh cart rather than inheriting one bound to the departing
    /// user. Infallible; store failures are logged and swallowed.
    pub fn logout(&self) {
        if let Err(error) = self.inner.store.clear_credentials() {
            warn!(%error, "could not clear stored credentials");
        }
        if let Err(error) = self.inner.store.clear_cart_id() {
            warn!(%error, "could not clear stored cart id");
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Cart identity
    // ─────────────────────────────────────────────────────────────────────

    /// The persisted cart identifier, generated lazily on first use.
    ///
    /// Repeated calls return the same value until [`Session::logout`] clears
    /// it. If the identifier cannot be persisted the generated value is
    /// still returned so the current flow can proceed.
    #[must_use]
    pub fn cart_id(&self) -> CartId {
        match self.inner.store.cart_id() {
            Ok(Some(id)) => return id,
            Ok(None) => {}
            Err(error) => warn!(%error, "could not read stored cart id"),
        }

        let id = CartId::generate();
        if let Err(error) = self.inner.store.set_cart_id(&id) {
            warn!(%error, "could not persist cart id");
        }
        id
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn test_session(store: Box<dyn CredentialStore>) -> Session {
        let config = ClientConfig::for_api_url(
            "http://127.0.0.1:9", // discard port; unit tests never hit the network
            PathBuf::from("/nonexistent"),
        )
        .unwrap();
        Session::new(&config, store)
    }

    fn far_future_token(user_id: i32) -> String {
        claims::make_token(&serde_json::json!({
            "token_type": "refresh",
            "exp": 4_102_444_800_i64,
            "user_id": user_id,
            "vendor_id": 0,
        }))
    }

    #[test]
    fn test_identity_none_when_anonymous() {
        let session = test_session(Box::new(MemoryStore::new()));
        assert!(session.identity().is_none());
        assert!(!session.is_logged_in());
    }

    #[test]
    fn test_identity_none_on_malformed_token() {
        let store = MemoryStore::new();
        store
            .save(&CredentialPair {
                access: "garbage".to_string(),
                refresh: "also-garbage".to_string(),
            })
            .unwrap();

        let session = test_session(Box::new(store));
        assert!(session.identity().is_none());
    }

    #[test]
    fn test_identity_decodes_refresh_claims() {
        let store = MemoryStore::new();
        store
            .save(&CredentialPair {
                access: far_future_token(7),
                refresh: far_future_token(7),
            })
            .unwrap();

        let session = test_session(Box::new(store));
        let identity = session.identity().unwrap();
        assert_eq!(identity.user_id.as_i32(), 7);
        assert_eq!(identity.vendor(), None);
    }

    #[tokio::test]
    async fn test_ensure_fresh_anonymous_is_noop() {
        let session = test_session(Box::new(MemoryStore::new()));
        assert!(session.ensure_fresh().await.is_none());
    }

    #[tokio::test]
    async fn test_ensure_fresh_returns_valid_token_without_network() {
        let access = far_future_token(1);
        let store = MemoryStore::new();
        store
            .save(&CredentialPair {
                access: access.clone(),
                refresh: far_future_token(1),
            })
            .unwrap();

        // The session points at a dead address; a network call would error
        // and clear the session, so getting the token back proves no call
        // was made.
        let session = test_session(Box::new(store));
        assert_eq!(session.ensure_fresh().await, Some(access));
        assert!(session.is_logged_in());
    }

    #[tokio::test]
    async fn test_refresh_failure_logs_out() {
        let store = MemoryStore::new();
        store
            .save(&CredentialPair {
                access: "expired".to_string(),
                refresh: far_future_token(1),
            })
            .unwrap();
        store.set_cart_id(&CartId::generate()).unwrap();

        // Dead address: the refresh POST fails at the transport level.
        let session = test_session(Box::new(store));
        assert!(session.refresh().await.is_none());
        assert!(session.identity().is_none());

        // Cart id was cleared with the credentials.
        let fresh = session.cart_id();
        let again = session.cart_id();
        assert_eq!(fresh, again);
    }

    #[test]
    fn test_cart_id_idempotent_until_logout() {
        let session = test_session(Box::new(MemoryStore::new()));

        let first = session.cart_id();
        let second = session.cart_id();
        assert_eq!(first, second);
        assert_eq!(first.as_str().len(), 30);

        session.logout();
        let third = session.cart_id();
        assert_ne!(first, third);
    }

    #[test]
    fn test_logout_clears_everything() {
        let store = MemoryStore::new();
        store
            .save(&CredentialPair {
                access: far_future_token(3),
                refresh: far_future_token(3),
            })
            .unwrap();

        let session = test_session(Box::new(store));
        assert!(session.is_logged_in());

        session.logout();
        assert!(session.identity().is_none());
    }
}
