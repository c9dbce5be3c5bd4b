//! Cart types.
//!
//! Cart state lives entirely server-side; these types are snapshots of the
//! last successful fetch and are never cached beyond it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use mercadito_core::CartItemId;

use super::product::Product;

/// A line in the cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub id: CartItemId,
    pub product: Product,
    pub qty: i32,
    pub price: Decimal,
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
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// Server-computed totals for a cart (`cart-detail` response).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CartSummary {
    #[serde(default)]
    pub shipping: Decimal,
    #[serde(default)]
    pub tax: Decimal,
    #[serde(default)]
    pub service_fee: Decimal,
    #[serde(default)]
    pub sub_total: Decimal,
    #[serde(default)]
    pub total: Decimal,
}

/// Response of the cart mutation endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CartMutation {
    #[serde(default)]
    pub message: Option<String>,
}

/// Number of items in the cart: the sum of line quantities of the last
/// successful fetch.
#[must_use]
pub fn cart_count(items: &[CartItem]) -> i64 {
    items.iter().map(|item| i64::from(item.qty)).sum()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(qty: i32) -> CartItem {
        serde_json::from_value(serde_json::json!({
            "id": qty,
            "qty": qty,
            "price": "10.00",
            "product": {
                "id": 1,
                "title": "Mug",
                "slug": "mug",
                "price": "10.00"
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_cart_count_sums_quantities() {
        assert_eq!(cart_count(&[]), 0);
        assert_eq!(cart_count(&[item(2), item(3)]), 5);
    }

    #[test]
    fn test_cart_summary_defaults() {
        let summary: CartSummary = serde_json::from_str("{}").unwrap();
        assert_eq!(summary.total, Decimal::ZERO);
    }
}
