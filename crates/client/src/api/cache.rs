//! Cache types for catalog responses.

use crate::models::{Category, Product};

/// Cached value types. Only immutable-ish catalog data is cached; cart and
/// order responses never enter the cache.
#[derive(Debug, Clone)]
pub(crate) enum CacheValue {
    Product(Box<Product>),
    Products(Vec<Product>),
    Categories(Vec<Category>),
}
