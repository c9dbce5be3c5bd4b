//! Catalog types: products, categories, and reviews.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use mercadito_core::{CategoryId, ProductId, ReviewId, UserId};

/// A product category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
}

/// A secondary product image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gallery {
    #[serde(default)]
    pub id: Option<i32>,
    pub image: String,
}

/// A product specification row (label/value).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Specification {
    pub title: String,
    pub content: String,
}

/// A selectable size variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSize {
    pub name: String,
    #[serde(default)]
    pub price: Option<Decimal>,
}

/// A selectable color variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductColor {
    pub name: String,
    #[serde(default)]
    pub color_code: Option<String>,
}

/// A catalog product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    pub price: Decimal,
    #[serde(default, rename = "oldPrice")]
    pub old_price: Option<Decimal>,
    #[serde(default)]
    pub shipping_amount: Decimal,
    #[serde(default)]
    pub stock_qty: Option<i32>,
    #[serde(default)]
    pub in_stock: bool,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub gallery: Vec<Gallery>,
    #[serde(default)]
    pub specification: Vec<Specification>,
    #[serde(default)]
    pub size: Vec<ProductSize>,
    #[serde(default)]
    pub color: Vec<ProductColor>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

/// The reviewer as embedded in a review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewUser {
    #[serde(default)]
    pub id: Option<UserId>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

/// A product review, optionally with the vendor's reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    #[serde(default)]
    pub user: Option<ReviewUser>,
    pub review: String,
    #[serde(default)]
    pub reply: Option<String>,
    pub rating: i32,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub product: Option<Box<Product>>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_minimal_payload() {
        let json = r#"{
            "id": 4,
            "title": "Alpaca Sweater",
            "slug": "alpaca-sweater",
            "price": "59.90",
            "in_stock": true
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id.as_i32(), 4);
        assert_eq!(product.price.to_string(), "59.90");
        assert!(product.in_stock);
        assert!(product.gallery.is_empty());
        assert_eq!(product.old_price, None);
    }

    #[test]
    fn test_product_old_price_wire_name() {
        let json = r#"{
            "id": 1,
            "title": "Mug",
            "slug": "mug",
            "price": "8.00",
            "oldPrice": "12.00"
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.old_price.unwrap().to_string(), "12.00");
    }

    #[test]
    fn test_review_without_reply() {
        let json = r#"{
            "id": 9,
            "review": "Great quality",
            "rating": 5,
            "user": {"full_name": "Ana"}
        }"#;

        let review: Review = serde_json::from_str(json).unwrap();
        assert_eq!(review.rating, 5);
        assert!(review.reply.is_none());
        assert_eq!(review.user.unwrap().full_name.as_deref(), Some("Ana"));
    }
}
