//! Typed client for the remote store API.
//!
//! # Architecture
//!
//! - The server is the source of truth - no local sync, direct API calls
//! - Every request goes through [`ApiClient::send`], which attaches a fresh
//!   bearer token (refreshing an expired one first) and replays the request
//!   at most once after a 401
//! - Catalog reads are cached in-memory via `moka` (5 minute TTL); cart and
//!   order state is never cached
//!
//! # Example
//!
//! ```rust,ignore
//! use mercadito_client::{ApiClient, ClientConfig, Session};
//! use mercadito_client::session::FileStore;
//!
//! let config = ClientConfig::from_env()?;
//! let session = Session::new(&config, Box::new(FileStore::new(config.state_file.clone())));
//! let client = ApiClient::new(&config, session);
//!
//! let product = client.product("alpaca-sweater").await?;
//! ```

mod auth;
mod cache;
mod cart;
mod catalog;
mod customer;
mod orders;
mod vendor;

pub use auth::{PasswordChanged, PasswordResetStarted};
pub use cart::CartLine;
pub use orders::OrderDetails;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{ApiError, error_from_response};
use crate::session::Session;

use cache::CacheValue;

/// Typed client over the store API.
///
/// Cheaply cloneable via `Arc`; all clones share the HTTP connection pool,
/// the session, and the catalog cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base: String,
    session: Session,
    cache: Cache<String, CacheValue>,
}

impl ApiClient {
    /// Create a new API client sharing the given session.
    #[must_use]
    pub fn new(config: &ClientConfig, session: Session) -> Self {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_default();

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(ApiClientInner {
                http,
                base: config.api_url.as_str().to_owned(),
                session,
                cache,
            }),
        }
    }

    /// The session shared with this client.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    /// Absolute URL for an endpoint path relative to the API base.
    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base)
    }

    // =========================================================================
    // Transport
    // =========================================================================

    /// Execute a request with the session's bearer token attached.
    ///
    /// A 401 response triggers a single token refresh followed by one replay
    /// of the original request; the replay's outcome is final even if it is
    /// another 401. When the refresh itself fails the session has already
    /// been cleared, and the caller sees [`ApiError::Unauthorized`].
    async fn send(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ApiError> {
        let bearer = self.inner.session.ensure_fresh().await;

        // Clone before attaching the bearer so the replay can carry the
        // refreshed token instead of a second copy of the stale one.
        let replay = builder.try_clone();

        let request = match bearer.as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };

        let response = request.send().await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            if let Some(replay) = replay
                && let Some(pair) = self.inner.session.refresh().await
            {
                debug!("replaying request after token refresh");
                let replayed = replay.bearer_auth(&pair.access).send().await?;
                return check_status(replayed).await;
            }

            // Refresh failed (session already cleared) or the request body
            // was not replayable; the original 401 stands.
            return Err(ApiError::Unauthorized);
        }

        check_status(response).await
    }

    /// GET a JSON response.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(self.inner.http.get(self.endpoint(path))).await?;
        read_json(response).await
    }

    /// POST a urlencoded form and parse the JSON response.
    pub(crate) async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let response = self
            .send(self.inner.http.post(self.endpoint(path)).form(form))
            .await?;
        read_json(response).await
    }

    /// POST a JSON body and parse the JSON response.
    pub(crate) async fn post_json<T: DeserializeOwned, B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .send(self.inner.http.post(self.endpoint(path)).json(body))
            .await?;
        read_json(response).await
    }

    /// PATCH a JSON body and parse the JSON response.
    pub(crate) async fn patch_json<T: DeserializeOwned, B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .send(self.inner.http.patch(self.endpoint(path)).json(body))
            .await?;
        read_json(response).await
    }

    /// DELETE a resource, ignoring any response body.
    pub(crate) async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(self.inner.http.delete(self.endpoint(path)))
            .await?;
        Ok(())
    }

    // =========================================================================
    // Cache plumbing (catalog reads only)
    // =========================================================================

    pub(crate) fn cache(&self) -> &Cache<String, CacheValue> {
        &self.inner.cache
    }

    /// Invalidate all cached catalog data.
    ///
    /// Vendors call this after mutating their products so subsequent reads
    /// are not served stale.
    pub async fn invalidate_catalog(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}

/// Map non-success statuses to [`ApiError`].
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let path = response.url().path().to_owned();
    let body = response.text().await.unwrap_or_default();
    Err(error_from_response(status, &path, &body))
}

/// Read a response body as text and parse it, logging the body on failure.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let text = response.text().await?;

    match serde_json::from_str(&text) {
        Ok(value) => Ok(value),
        Err(error) => {
            tracing::error!(
                %error,
                body = %text.chars().take(500).collect::<String>(),
                "failed to parse API response"
            );
            Err(ApiError::Parse(error))
        }
    }
}
