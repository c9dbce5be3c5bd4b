//! Mercadito client library.
//!
//! A headless client for the remote Mercadito store API: session and token
//! lifecycle management plus typed wrappers over the storefront, customer,
//! and vendor endpoints.
//!
//! # Architecture
//!
//! - The server is the source of truth - no local sync, direct API calls
//! - [`session::Session`] owns the persisted credential pair (JWT access +
//!   refresh) and the anonymous cart identifier
//! - [`api::ApiClient`] attaches a fresh bearer token to every request and
//!   replays a request at most once after a 401
//! - Catalog reads are cached in-memory via `moka` (5 minute TTL)
//!
//! # Example
//!
//! ```rust,ignore
//! use mercadito_client::config::ClientConfig;
//! use mercadito_client::session::{FileStore, Session};
//! use mercadito_client::api::ApiClient;
//!
//! let config = ClientConfig::from_env()?;
//! let store = FileStore::new(config.state_file.clone());
//! let session = Session::new(&config, Box::new(store));
//! let client = ApiClient::new(&config, session);
//!
//! // Browse anonymously; the cart identifier is generated on first use
//! let products = client.products().await?;
//! let cart = client.cart_list(&client.session().cart_id(), None).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod session;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use session::Session;
