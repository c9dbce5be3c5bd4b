//! Checkout: order creation, coupon application, payment verification.

use tracing::instrument;

use mercadito_core::{CartId, OrderOid};

use crate::error::ApiError;
use crate::models::{AppliedCoupon, CreatedOrder, Order, PaymentResult};

use super::ApiClient;

/// Shipping/billing details for a new order.
#[derive(Debug, Clone)]
pub struct OrderDetails {
    pub full_name: String,
    pub email: String,
    pub mobile: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
}

impl ApiClient {
    /// Turn the cart into a pending order.
    ///
    /// Anonymous checkouts send a user id of 0, matching what the server
    /// expects for guest orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, details), fields(cart_id = %cart_id))]
    pub async fn create_order(
        &self,
        cart_id: &CartId,
        details: &OrderDetails,
    ) -> Result<CreatedOrder, ApiError> {
        let user_id = self
            .session()
            .identity()
            .map_or_else(|| "0".to_owned(), |identity| identity.user_id.to_string());

        self.post_form(
            "create-order/",
            &[
                ("full_name", details.full_name.clone()),
                ("email", details.email.clone()),
                ("mobile", details.mobile.clone()),
                ("address", details.address.clone()),
                ("city", details.city.clone()),
                ("state", details.state.clone()),
                ("country", details.country.clone()),
                ("cart_id", cart_id.to_string()),
                ("user_id", user_id),
            ],
        )
        .await
    }

    /// Fetch a pending order for the checkout view.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for an unknown oid, or an error if the
    /// API request fails.
    #[instrument(skip(self), fields(oid = %oid))]
    pub async fn checkout(&self, oid: &OrderOid) -> Result<Order, ApiError> {
        self.get_json(&format!("checkout/{oid}/")).await
    }

    /// Apply a coupon code to a pending order.
    ///
    /// The server validates the code and recomputes the totals; its verdict
    /// is surfaced verbatim in the response message.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for rejected codes, or an error if
    /// the API request fails.
    #[instrument(skip(self), fields(oid = %oid, code = %code))]
    pub async fn apply_coupon(
        &self,
        oid: &OrderOid,
        code: &str,
    ) -> Result<AppliedCoupon, ApiError> {
        self.post_form(
            "coupon/",
            &[
                ("order_oid", oid.to_string()),
                ("coupon_code", code.trim().to_owned()),
            ],
        )
        .await
    }

    /// Verify the payment state of an order after returning from the
    /// payment provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, session_id), fields(oid = %oid))]
    pub async fn verify_payment(
        &self,
        oid: &OrderOid,
        session_id: Option<&str>,
    ) -> Result<PaymentResult, ApiError> {
        let mut form = vec![("order_oid", oid.to_string())];
        if let Some(session_id) = session_id {
            form.push(("session_id", session_id.to_owned()));
        }

        self.post_form(&format!("payment-success/{oid}"), &form).await
    }
}
