//! Customer account types: profile, wishlist, notifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mercadito_core::NotificationId;

use super::order::OrderItem;
use super::product::Product;

/// A customer (or vendor) profile.
///
/// The wire format spells the street address `adress`; the field keeps the
/// Rust spelling and maps onto the historic name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default, rename = "adress")]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub about: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Fields accepted by the profile update endpoint.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(rename = "adress", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

/// A wishlist entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WishlistItem {
    #[serde(default)]
    pub id: Option<i32>,
    pub product: Product,
}

/// Response of the wishlist toggle endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct WishlistToggle {
    #[serde(default)]
    pub message: Option<String>,
}

/// An order-related notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    #[serde(default)]
    pub seen: bool,
    #[serde(default)]
    pub order_item: Option<Box<OrderItem>>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_adress_wire_name() {
        let json = r#"{"full_name": "Ana Torres", "adress": "Av. Siempre Viva 742"}"#;
        let profile: Profile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.address.as_deref(), Some("Av. Siempre Viva 742"));

        let update = ProfileUpdate {
            address: Some("Calle 9".to_string()),
            ..ProfileUpdate::default()
        };
        let body = serde_json::to_value(&update).unwrap();
        assert_eq!(body["adress"], "Calle 9");
        assert!(body.get("city").is_none());
    }

    #[test]
    fn test_notification_without_order_item() {
        let json = r#"{"id": 3, "seen": false}"#;
        let notification: Notification = serde_json::from_str(json).unwrap();
        assert!(!notification.seen);
        assert!(notification.order_item.is_none());
    }
}
