//! Customer account commands: order history, wishlist, notifications.

use clap::Subcommand;

use mercadito_client::{ApiClient, ApiError};
use mercadito_core::NotificationId;

#[derive(Subcommand)]
pub enum WishlistAction {
    /// Add a product to the wishlist, or remove it if already present
    Toggle {
        /// Product slug
        slug: String,
    },
}

pub async fn my_orders(client: &ApiClient) -> Result<(), ApiError> {
    let orders = client.my_orders().await?;

    if orders.is_empty() {
        println!("No orders yet");
        return Ok(());
    }

    for order in &orders {
        println!(
            "{}  {} / payment {}  ${}",
            order.oid, order.order_status, order.payment_status, order.total
        );
    }
    Ok(())
}

pub async fn wishlist(client: &ApiClient, action: Option<WishlistAction>) -> Result<(), ApiError> {
    match action {
        Some(WishlistAction::Toggle { slug }) => {
            let product = client.product(&slug).await?;
            let toggled = client.wishlist_toggle(product.id).await?;
            println!(
                "{}",
                toggled
                    .message
                    .unwrap_or_else(|| "Wishlist updated".to_string())
            );
        }
        None => {
            let items = client.wishlist().await?;
            if items.is_empty() {
                println!("Your wishlist is empty");
                return Ok(());
            }
            for item in &items {
                println!(
                    "{:>5}  {}  ${}",
                    item.product.id, item.product.title, item.product.price
                );
            }
        }
    }
    Ok(())
}

pub async fn notifications(client: &ApiClient, seen: Option<i32>) -> Result<(), ApiError> {
    if let Some(id) = seen {
        client
            .mark_notification_seen(NotificationId::new(id))
            .await?;
        println!("Notification {id} marked as seen");
        return Ok(());
    }

    let notifications = client.notifications().await?;
    if notifications.is_empty() {
        println!("No notifications");
        return Ok(());
    }

    for notification in &notifications {
        let marker = if notification.seen { " " } else { "*" };
        let what = notification
            .order_item
            .as_ref()
            .map_or_else(String::new, |item| {
                format!("  {} x{}", item.product.title, item.qty)
            });
        println!("{marker} {:>5}{what}", notification.id);
    }
    Ok(())
}
