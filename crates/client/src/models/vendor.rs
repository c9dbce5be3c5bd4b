//! Vendor back-office types: dashboard stats, coupons, charts.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use mercadito_core::CouponId;

/// Headline dashboard numbers (`vendor/stats/`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VendorStats {
    #[serde(default)]
    pub products: i64,
    #[serde(default)]
    pub orders: i64,
    #[serde(default)]
    pub revenue: Decimal,
}

/// Revenue summary (`vendor-earning/`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EarningSummary {
    #[serde(default)]
    pub monthly_revenue: Decimal,
    #[serde(default)]
    pub total_revenue: Decimal,
}

/// One month of earnings (`vendor-monthly-earning/`).
#[derive(Debug, Clone, Deserialize)]
pub struct MonthlyEarning {
    pub month: u32,
    #[serde(default)]
    pub total_earning: Decimal,
}

/// One month of order counts (`vendor-orders-chart/`).
#[derive(Debug, Clone, Deserialize)]
pub struct OrdersChartPoint {
    pub month: u32,
    #[serde(default)]
    pub orders: i64,
}

/// One month of product counts (`vendor-products-chart/`).
///
/// The server serializes the count under the singular key `product`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductsChartPoint {
    pub month: u32,
    #[serde(default, rename = "product")]
    pub products: i64,
}

/// A vendor discount coupon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coupon {
    pub id: CouponId,
    pub code: String,
    /// Percentage discount applied at checkout.
    pub discount: i32,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

/// Body of the coupon create/update endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct CouponPayload {
    pub code: String,
    pub discount: i32,
    pub active: bool,
}

/// Coupon totals (`vendor-coupon-stats/`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CouponStats {
    #[serde(default)]
    pub total_coupons: i64,
    #[serde(default)]
    pub active_coupons: i64,
}

/// Notification totals (`vendor/notification-summary/`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationSummary {
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub unseen: i64,
}

/// Fields accepted by the shop settings endpoint.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ShopUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Fields accepted by the vendor product create endpoint.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<i32>,
    pub price: Decimal,
    #[serde(rename = "oldPrice", skip_serializing_if = "Option::is_none")]
    pub old_price: Option<Decimal>,
    pub shipping_amount: Decimal,
    pub stock_qty: i32,
    pub in_stock: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub featured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_products_chart_singular_wire_key() {
        let json = r#"[{"month": 3, "product": 7}]"#;
        let points: Vec<ProductsChartPoint> = serde_json::from_str(json).unwrap();
        assert_eq!(points.first().map(|p| p.products), Some(7));
    }

    #[test]
    fn test_vendor_stats_defaults() {
        let stats: VendorStats = serde_json::from_str("{}").unwrap();
        assert_eq!(stats.orders, 0);
        assert_eq!(stats.revenue, Decimal::ZERO);
    }

    #[test]
    fn test_coupon_payload_shape() {
        let payload = CouponPayload {
            code: "VERANO20".to_string(),
            discount: 20,
            active: true,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["code"], "VERANO20");
        assert_eq!(value["discount"], 20);
        assert_eq!(value["active"], true);
    }
}
