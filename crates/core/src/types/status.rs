//! Status enums for orders and payments.
//!
//! Variants map to the literal strings the remote store API serializes, so
//! these types deserialize straight out of its JSON responses. Unknown
//! strings fold into an `Unknown` variant rather than failing the whole
//! response.

use serde::{Deserialize, Serialize};

/// Order fulfillment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Fulfilled,
    Cancelled,
    #[serde(other)]
    Unknown,
}

/// Order payment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Processing,
    Paid,
    Failed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

/// Shipping status of an individual order item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ShippingStatus {
    #[default]
    Pending,
    Shipped,
    InTransit,
    Delivered,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Fulfilled => write!(f, "fulfilled"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Processing => write!(f, "processing"),
            Self::Paid => write!(f, "paid"),
            Self::Failed => write!(f, "failed"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_literals() {
        let status: OrderStatus = serde_json::from_str("\"fulfilled\"").unwrap();
        assert_eq!(status, OrderStatus::Fulfilled);
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"fulfilled\"");
    }

    #[test]
    fn test_payment_status_unknown_variant() {
        let status: PaymentStatus = serde_json::from_str("\"initiated\"").unwrap();
        assert_eq!(status, PaymentStatus::Unknown);
    }

    #[test]
    fn test_display_matches_wire_format() {
        assert_eq!(OrderStatus::Pending.to_string(), "pending");
        assert_eq!(PaymentStatus::Paid.to_string(), "paid");
    }
}
