//! Customer account: order history, wishlist, notifications.
//!
//! Every operation here requires a logged-in user; the user id in the path
//! comes from the session's decoded claims and the server re-checks it
//! against the bearer token.

use tracing::instrument;

use mercadito_core::{NotificationId, OrderOid, ProductId, UserId};

use crate::error::ApiError;
use crate::models::{Notification, Order, WishlistItem, WishlistToggle};
use crate::session::Identity;

use super::ApiClient;

impl ApiClient {
    fn require_login(&self) -> Result<Identity, ApiError> {
        self.session().identity().ok_or(ApiError::LoginRequired)
    }

    /// The logged-in user's id.
    fn current_user(&self) -> Result<UserId, ApiError> {
        Ok(self.require_login()?.user_id)
    }

    /// List the logged-in user's orders.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::LoginRequired`] when anonymous, or an error if
    /// the API request fails.
    #[instrument(skip(self))]
    pub async fn my_orders(&self) -> Result<Vec<Order>, ApiError> {
        let user_id = self.current_user()?;
        self.get_json(&format!("customer/orders/{user_id}/")).await
    }

    /// Fetch one of the logged-in user's orders.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::LoginRequired`] when anonymous,
    /// [`ApiError::NotFound`] for an unknown oid, or an error if the API
    /// request fails.
    #[instrument(skip(self), fields(oid = %oid))]
    pub async fn my_order(&self, oid: &OrderOid) -> Result<Order, ApiError> {
        let user_id = self.current_user()?;
        self.get_json(&format!("customer/order/{user_id}/{oid}/"))
            .await
    }

    /// List the logged-in user's wishlist.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::LoginRequired`] when anonymous, or an error if
    /// the API request fails.
    #[instrument(skip(self))]
    pub async fn wishlist(&self) -> Result<Vec<WishlistItem>, ApiError> {
        let user_id = self.current_user()?;
        self.get_json(&format!("customer/wishlist/{user_id}/")).await
    }

    /// Add a product to the wishlist, or remove it if already present.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::LoginRequired`] when anonymous, or an error if
    /// the API request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn wishlist_toggle(
        &self,
        product_id: ProductId,
    ) -> Result<WishlistToggle, ApiError> {
        let user_id = self.current_user()?;
        self.post_form(
            &format!("customer/wishlist/{user_id}/"),
            &[("product_id", product_id.to_string())],
        )
        .await
    }

    /// List the logged-in user's notifications.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::LoginRequired`] when anonymous, or an error if
    /// the API request fails.
    #[instrument(skip(self))]
    pub async fn notifications(&self) -> Result<Vec<Notification>, ApiError> {
        let user_id = self.current_user()?;
        self.get_json(&format!("customer/notification/{user_id}/"))
            .await
    }

    /// Mark a notification as seen.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::LoginRequired`] when anonymous, or an error if
    /// the API request fails.
    #[instrument(skip(self), fields(notification_id = %notification_id))]
    pub async fn mark_notification_seen(
        &self,
        notification_id: NotificationId,
    ) -> Result<Notification, ApiError> {
        let user_id = self.current_user()?;
        self.get_json(&format!(
            "customer/notification/{user_id}/{notification_id}/"
        ))
        .await
    }
}
