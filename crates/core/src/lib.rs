//! Mercadito Core - Shared types library.
//!
//! This crate provides common types used across all Mercadito components:
//! - `client` - API client and session management for the remote store API
//! - `cli` - Terminal front-end for the customer and vendor flows
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, the cart identifier,
//!   emails, and order/payment statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
