//! Vendor back-office: dashboard stats, orders, products, coupons, reviews.
//!
//! Every operation requires an identity whose claims carry a non-zero
//! vendor id. The check here is a convenience gate for the terminal UI; the
//! server independently authorizes every call against the bearer token.

use tracing::instrument;

use mercadito_core::{CouponId, NotificationId, OrderOid, ProductId, ReviewId, VendorId};

use crate::error::ApiError;
use crate::models::{
    Coupon, CouponPayload, CouponStats, EarningSummary, MonthlyEarning, NewProduct, Notification,
    NotificationSummary, Order, OrdersChartPoint, Product, ProductsChartPoint, Review,
    VendorStats,
};
use crate::models::vendor::ShopUpdate;

use super::ApiClient;

impl ApiClient {
    fn require_vendor(&self) -> Result<VendorId, ApiError> {
        self.session()
            .identity()
            .ok_or(ApiError::LoginRequired)?
            .vendor()
            .ok_or(ApiError::VendorRequired)
    }

    // =========================================================================
    // Dashboard
    // =========================================================================

    /// Headline dashboard numbers: product count, order count, revenue.
    ///
    /// The server answers with a single-element array.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::VendorRequired`] without a vendor identity, or an
    /// error if the API request fails.
    #[instrument(skip(self))]
    pub async fn vendor_stats(&self) -> Result<VendorStats, ApiError> {
        let vendor_id = self.require_vendor()?;
        let stats: Vec<VendorStats> =
            self.get_json(&format!("vendor/stats/{vendor_id}")).await?;
        Ok(stats.into_iter().next().unwrap_or_default())
    }

    /// Current-month and lifetime revenue.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::VendorRequired`] without a vendor identity, or an
    /// error if the API request fails.
    #[instrument(skip(self))]
    pub async fn vendor_earnings(&self) -> Result<EarningSummary, ApiError> {
        let vendor_id = self.require_vendor()?;
        self.get_json(&format!("vendor-earning/{vendor_id}/")).await
    }

    /// Per-month earnings for the revenue chart.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::VendorRequired`] without a vendor identity, or an
    /// error if the API request fails.
    #[instrument(skip(self))]
    pub async fn vendor_monthly_earnings(&self) -> Result<Vec<MonthlyEarning>, ApiError> {
        let vendor_id = self.require_vendor()?;
        self.get_json(&format!("vendor-monthly-earning/{vendor_id}/"))
            .await
    }

    /// Per-month order counts for the orders chart.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::VendorRequired`] without a vendor identity, or an
    /// error if the API request fails.
    #[instrument(skip(self))]
    pub async fn vendor_orders_chart(&self) -> Result<Vec<OrdersChartPoint>, ApiError> {
        let vendor_id = self.require_vendor()?;
        self.get_json(&format!("vendor-orders-chart/{vendor_id}"))
            .await
    }

    /// Per-month product counts for the products chart.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::VendorRequired`] without a vendor identity, or an
    /// error if the API request fails.
    #[instrument(skip(self))]
    pub async fn vendor_products_chart(&self) -> Result<Vec<ProductsChartPoint>, ApiError> {
        let vendor_id = self.require_vendor()?;
        self.get_json(&format!("vendor-products-chart/{vendor_id}"))
            .await
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// List orders containing this vendor's products.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::VendorRequired`] without a vendor identity, or an
    /// error if the API request fails.
    #[instrument(skip(self))]
    pub async fn vendor_orders(&self) -> Result<Vec<Order>, ApiError> {
        let vendor_id = self.require_vendor()?;
        self.get_json(&format!("vendor/orders/{vendor_id}/")).await
    }

    /// Fetch one of this vendor's orders.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::VendorRequired`] without a vendor identity,
    /// [`ApiError::NotFound`] for an unknown oid, or an error if the API
    /// request fails.
    #[instrument(skip(self), fields(oid = %oid))]
    pub async fn vendor_order(&self, oid: &OrderOid) -> Result<Order, ApiError> {
        let vendor_id = self.require_vendor()?;
        self.get_json(&format!("vendor/orders/{vendor_id}/{oid}/"))
            .await
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// List this vendor's products.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::VendorRequired`] without a vendor identity, or an
    /// error if the API request fails.
    #[instrument(skip(self))]
    pub async fn vendor_products(&self) -> Result<Vec<Product>, ApiError> {
        let vendor_id = self.require_vendor()?;
        self.get_json(&format!("vendor/products/{vendor_id}/")).await
    }

    /// Create a product, then drop the catalog cache so storefront reads
    /// pick it up.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::VendorRequired`] without a vendor identity,
    /// [`ApiError::Validation`] for rejected input, or an error if the API
    /// request fails.
    #[instrument(skip(self, product), fields(title = %product.title))]
    pub async fn vendor_create_product(&self, product: &NewProduct) -> Result<Product, ApiError> {
        let vendor_id = self.require_vendor()?;
        let created = self
            .post_json(&format!("vendor/products/{vendor_id}/"), product)
            .await?;
        self.invalidate_catalog().await;
        Ok(created)
    }

    /// Delete one of this vendor's products.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::VendorRequired`] without a vendor identity, or an
    /// error if the API request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn vendor_delete_product(&self, product_id: ProductId) -> Result<(), ApiError> {
        let vendor_id = self.require_vendor()?;
        self.delete(&format!("vendor/product/{vendor_id}/{product_id}/"))
            .await?;
        self.invalidate_catalog().await;
        Ok(())
    }

    // =========================================================================
    // Coupons
    // =========================================================================

    /// List this vendor's coupons.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::VendorRequired`] without a vendor identity, or an
    /// error if the API request fails.
    #[instrument(skip(self))]
    pub async fn vendor_coupons(&self) -> Result<Vec<Coupon>, ApiError> {
        let vendor_id = self.require_vendor()?;
        self.get_json(&format!("vendor-coupon-list/{vendor_id}/"))
            .await
    }

    /// Create a coupon.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::VendorRequired`] without a vendor identity,
    /// [`ApiError::Validation`] for rejected input, or an error if the API
    /// request fails.
    #[instrument(skip(self, payload), fields(code = %payload.code))]
    pub async fn vendor_create_coupon(&self, payload: &CouponPayload) -> Result<Coupon, ApiError> {
        let vendor_id = self.require_vendor()?;
        self.post_json(&format!("vendor-coupon-list/{vendor_id}/"), payload)
            .await
    }

    /// Fetch one coupon.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::VendorRequired`] without a vendor identity, or an
    /// error if the API request fails.
    #[instrument(skip(self), fields(coupon_id = %coupon_id))]
    pub async fn vendor_coupon(&self, coupon_id: CouponId) -> Result<Coupon, ApiError> {
        let vendor_id = self.require_vendor()?;
        self.get_json(&format!("vendor-coupon-detail/{vendor_id}/{coupon_id}/"))
            .await
    }

    /// Update a coupon.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::VendorRequired`] without a vendor identity, or an
    /// error if the API request fails.
    #[instrument(skip(self, payload), fields(coupon_id = %coupon_id))]
    pub async fn vendor_update_coupon(
        &self,
        coupon_id: CouponId,
        payload: &CouponPayload,
    ) -> Result<Coupon, ApiError> {
        let vendor_id = self.require_vendor()?;
        self.patch_json(
            &format!("vendor-coupon-detail/{vendor_id}/{coupon_id}/"),
            payload,
        )
        .await
    }

    /// Delete a coupon.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::VendorRequired`] without a vendor identity, or an
    /// error if the API request fails.
    #[instrument(skip(self), fields(coupon_id = %coupon_id))]
    pub async fn vendor_delete_coupon(&self, coupon_id: CouponId) -> Result<(), ApiError> {
        let vendor_id = self.require_vendor()?;
        self.delete(&format!("vendor-coupon-detail/{vendor_id}/{coupon_id}/"))
            .await
    }

    /// Coupon totals for the coupon dashboard.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::VendorRequired`] without a vendor identity, or an
    /// error if the API request fails.
    #[instrument(skip(self))]
    pub async fn vendor_coupon_stats(&self) -> Result<CouponStats, ApiError> {
        let vendor_id = self.require_vendor()?;
        self.get_json(&format!("vendor-coupon-stats/{vendor_id}/"))
            .await
    }

    // =========================================================================
    // Reviews
    // =========================================================================

    /// List reviews of this vendor's products.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::VendorRequired`] without a vendor identity, or an
    /// error if the API request fails.
    #[instrument(skip(self))]
    pub async fn vendor_reviews(&self) -> Result<Vec<Review>, ApiError> {
        let vendor_id = self.require_vendor()?;
        self.get_json(&format!("vendor-reviews/{vendor_id}/")).await
    }

    /// Reply to a review.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::VendorRequired`] without a vendor identity, or an
    /// error if the API request fails.
    #[instrument(skip(self, reply), fields(review_id = %review_id))]
    pub async fn vendor_reply_review(
        &self,
        review_id: ReviewId,
        reply: &str,
    ) -> Result<Review, ApiError> {
        let vendor_id = self.require_vendor()?;
        self.patch_json(
            &format!("vendor-reviews/{vendor_id}/{review_id}/"),
            &serde_json::json!({ "reply": reply }),
        )
        .await
    }

    // =========================================================================
    // Notifications & shop
    // =========================================================================

    /// List this vendor's notifications.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::VendorRequired`] without a vendor identity, or an
    /// error if the API request fails.
    #[instrument(skip(self))]
    pub async fn vendor_notifications(&self) -> Result<Vec<Notification>, ApiError> {
        let vendor_id = self.require_vendor()?;
        self.get_json(&format!("vendor/notification/{vendor_id}/"))
            .await
    }

    /// Mark one of this vendor's notifications as seen.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::VendorRequired`] without a vendor identity, or an
    /// error if the API request fails.
    #[instrument(skip(self), fields(notification_id = %notification_id))]
    pub async fn vendor_mark_notification_seen(
        &self,
        notification_id: NotificationId,
    ) -> Result<Notification, ApiError> {
        let vendor_id = self.require_vendor()?;
        self.get_json(&format!(
            "vendor/notification/{vendor_id}/{notification_id}/"
        ))
        .await
    }

    /// Notification totals.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::VendorRequired`] without a vendor identity, or an
    /// error if the API request fails.
    #[instrument(skip(self))]
    pub async fn vendor_notification_summary(&self) -> Result<NotificationSummary, ApiError> {
        let vendor_id = self.require_vendor()?;
        self.get_json(&format!("vendor/notification-summary/{vendor_id}/"))
            .await
    }

    /// Update the vendor's shop settings.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::VendorRequired`] without a vendor identity, or an
    /// error if the API request fails.
    #[instrument(skip(self, update))]
    pub async fn vendor_update_shop(&self, update: &ShopUpdate) -> Result<(), ApiError> {
        let vendor_id = self.require_vendor()?;
        let _: serde_json::Value = self
            .patch_json(&format!("vendor/shop/{vendor_id}/"), update)
            .await?;
        Ok(())
    }
}
