//! Catalog reads: products, categories, search, reviews.
//!
//! Product and category reads are cached for 5 minutes; search results and
//! reviews are always fetched fresh.

use tracing::{debug, instrument};

use mercadito_core::ProductId;

use crate::error::ApiError;
use crate::models::{Category, Product, Review};

use super::ApiClient;
use super::cache::CacheValue;

impl ApiClient {
    /// List the catalog's products.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Vec<Product>, ApiError> {
        const CACHE_KEY: &str = "products:";

        if let Some(CacheValue::Products(products)) = self.cache().get(CACHE_KEY).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let products: Vec<Product> = self.get_json("products/").await?;

        self.cache()
            .insert(CACHE_KEY.to_owned(), CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Get a product by its slug.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if no product has this slug, or an
    /// error if the API request fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn product(&self, slug: &str) -> Result<Product, ApiError> {
        let cache_key = format!("product:{slug}");

        if let Some(CacheValue::Product(product)) = self.cache().get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let product: Product = self.get_json(&format!("products/{slug}/")).await?;

        self.cache()
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// List the catalog's categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        const CACHE_KEY: &str = "category:";

        if let Some(CacheValue::Categories(categories)) = self.cache().get(CACHE_KEY).await {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let categories: Vec<Category> = self.get_json("category/").await?;

        self.cache()
            .insert(
                CACHE_KEY.to_owned(),
                CacheValue::Categories(categories.clone()),
            )
            .await;

        Ok(categories)
    }

    /// Full-text product search. Never cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(query = %query))]
    pub async fn search(&self, query: &str) -> Result<Vec<Product>, ApiError> {
        let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
        self.get_json(&format!("search/?query={encoded}")).await
    }

    /// List the reviews of a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn reviews(&self, product_id: ProductId) -> Result<Vec<Review>, ApiError> {
        self.get_json(&format!("reviews/{product_id}/")).await
    }

    /// Submit a review for a product as the logged-in user.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::LoginRequired`] when anonymous, or an error if
    /// the API request fails.
    #[instrument(skip(self, review), fields(product_id = %product_id))]
    pub async fn submit_review(
        &self,
        product_id: ProductId,
        rating: i32,
        review: &str,
    ) -> Result<Review, ApiError> {
        let identity = self.session().identity().ok_or(ApiError::LoginRequired)?;

        self.post_form(
            &format!("reviews/{product_id}/"),
            &[
                ("user_id", identity.user_id.to_string()),
                ("rating", rating.to_string()),
                ("review", review.to_owned()),
            ],
        )
        .await
    }
}
