//! Order and checkout types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use mercadito_core::{OrderOid, OrderStatus, PaymentStatus, ShippingStatus};

use super::product::Product;

/// A line item within an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(default)]
    pub id: Option<i32>,
    pub product: Product,
    pub qty: i32,
    pub price: Decimal,
    #[serde(default)]
    pub sub_total: Decimal,
    #[serde(default)]
    pub shipping_amount: Decimal,
    #[serde(default)]
    pub order_status: OrderStatus,
    #[serde(default)]
    pub shipping_status: ShippingStatus,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

/// An order with its server-computed totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub oid: OrderOid,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub sub_total: Decimal,
    #[serde(default)]
    pub shipping_amount: Decimal,
    #[serde(default)]
    pub tax_fee: Decimal,
    #[serde(default)]
    pub service_fee: Decimal,
    #[serde(default)]
    pub total: Decimal,
    /// Amount saved through an applied coupon.
    #[serde(default)]
    pub saved: Decimal,
    #[serde(default)]
    pub order_status: OrderStatus,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default, rename = "orderitem")]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

/// Response of `create-order/`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedOrder {
    pub order_oid: OrderOid,
    #[serde(default)]
    pub message: Option<String>,
}

/// Response of the coupon application endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct AppliedCoupon {
    #[serde(default)]
    pub message: Option<String>,
    /// "success" / "warning" / "error" as hinted by the server.
    #[serde(default)]
    pub icon: Option<String>,
}

/// Response of the payment verification endpoint.
///
/// The server answers with a literal message: "Payment Successfully",
/// "Already Paid", "UnPaid", or "Cancelled".
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentResult {
    pub message: String,
}

impl PaymentResult {
    /// Whether the payment is settled (either just captured or previously).
    #[must_use]
    pub fn is_paid(&self) -> bool {
        matches!(self.message.as_str(), "Payment Successfully" | "Already Paid")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_deserializes_items_from_orderitem_key() {
        let json = serde_json::json!({
            "oid": "a1b2c3",
            "total": "42.50",
            "order_status": "pending",
            "payment_status": "processing",
            "orderitem": [{
                "product": {"id": 1, "title": "Mug", "slug": "mug", "price": "10.00"},
                "qty": 2,
                "price": "10.00"
            }]
        });

        let order: Order = serde_json::from_value(json).unwrap();
        assert_eq!(order.oid.as_str(), "a1b2c3");
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.payment_status, PaymentStatus::Processing);
    }

    #[test]
    fn test_payment_result_is_paid() {
        let paid = PaymentResult {
            message: "Payment Successfully".to_string(),
        };
        let already = PaymentResult {
            message: "Already Paid".to_string(),
        };
        let unpaid = PaymentResult {
            message: "UnPaid".to_string(),
        };

        assert!(paid.is_paid());
        assert!(already.is_paid());
        assert!(!unpaid.is_paid());
    }
}
