//! CLI command implementations.
//!
//! Each module is a thin consumer of `mercadito_client`: build the request,
//! print the response. No command carries logic of its own beyond
//! presentation.

pub mod account;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod orders;
pub mod vendor;
