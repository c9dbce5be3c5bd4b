//! Cart operations.
//!
//! The cart is addressed by the session's cart identifier (plus the user id
//! once logged in, so the server can merge the anonymous cart into the
//! account). Nothing here is cached: totals are server-computed and
//! re-fetched after every mutation.

use rust_decimal::Decimal;
use tracing::instrument;

use mercadito_core::{CartId, CartItemId, ProductId, UserId};

use crate::error::ApiError;
use crate::models::{CartItem, CartMutation, CartSummary};

use super::ApiClient;

/// A line to add to the cart.
#[derive(Debug, Clone)]
pub struct CartLine {
    pub product_id: ProductId,
    pub qty: i32,
    pub price: Decimal,
    pub shipping_amount: Decimal,
    pub country: String,
    pub size: String,
    pub color: String,
}

impl ApiClient {
    /// Add a line to the cart, or replace the line's quantity if the product
    /// variant is already present (the server upserts).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, line), fields(cart_id = %cart_id, product_id = %line.product_id))]
    pub async fn cart_add(
        &self,
        cart_id: &CartId,
        line: &CartLine,
    ) -> Result<CartMutation, ApiError> {
        let user_id = self
            .session()
            .identity()
            .map(|identity| identity.user_id.to_string())
            .unwrap_or_default();

        self.post_form(
            "cart-view/",
            &[
                ("product_id", line.product_id.to_string()),
                ("user_id", user_id),
                ("qty", line.qty.to_string()),
                ("price", line.price.to_string()),
                ("shipping_amount", line.shipping_amount.to_string()),
                ("country", line.country.clone()),
                ("size", line.size.clone()),
                ("color", line.color.clone()),
                ("cart_id", cart_id.to_string()),
            ],
        )
        .await
    }

    /// Fetch the cart's lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn cart_list(
        &self,
        cart_id: &CartId,
        user_id: Option<UserId>,
    ) -> Result<Vec<CartItem>, ApiError> {
        let path = match user_id {
            Some(user_id) => format!("cart-list/{cart_id}/{user_id}/"),
            None => format!("cart-list/{cart_id}/"),
        };
        self.get_json(&path).await
    }

    /// Fetch the server-computed totals for the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn cart_summary(
        &self,
        cart_id: &CartId,
        user_id: Option<UserId>,
    ) -> Result<CartSummary, ApiError> {
        let path = match user_id {
            Some(user_id) => format!("cart-detail/{cart_id}/{user_id}/"),
            None => format!("cart-detail/{cart_id}/"),
        };
        self.get_json(&path).await
    }

    /// Remove a line from the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(cart_id = %cart_id, item_id = %item_id))]
    pub async fn cart_remove(
        &self,
        cart_id: &CartId,
        item_id: CartItemId,
        user_id: Option<UserId>,
    ) -> Result<(), ApiError> {
        let path = match user_id {
            Some(user_id) => format!("cart-delete/{cart_id}/{item_id}/{user_id}"),
            None => format!("cart-delete/{cart_id}/{item_id}/"),
        };
        self.delete(&path).await
    }
}
