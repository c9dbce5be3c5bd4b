//! Cart commands.

use clap::Subcommand;

use mercadito_client::api::CartLine;
use mercadito_client::models::cart_count;
use mercadito_client::{ApiClient, ApiError};
use mercadito_core::CartItemId;

#[derive(Subcommand)]
pub enum CartAction {
    /// Add a product to the cart
    Add {
        /// Product slug
        slug: String,

        /// Quantity
        #[arg(short, long, default_value_t = 1)]
        qty: i32,

        /// Size variant
        #[arg(long, default_value = "No Size")]
        size: String,

        /// Color variant
        #[arg(long, default_value = "No Color")]
        color: String,

        /// Shipping country code
        #[arg(long, default_value = "US")]
        country: String,
    },
    /// List the cart's lines and totals
    List,
    /// Remove a line from the cart
    Remove {
        /// Cart line id (from `cart list`)
        item_id: i32,
    },
}

pub async fn run(client: &ApiClient, action: CartAction) -> Result<(), ApiError> {
    let cart_id = client.session().cart_id();
    let user_id = client.session().identity().map(|identity| identity.user_id);

    match action {
        CartAction::Add {
            slug,
            qty,
            size,
            color,
            country,
        } => {
            let product = client.product(&slug).await?;

            if !product.in_stock {
                return Err(ApiError::Validation(format!(
                    "{} is out of stock",
                    product.title
                )));
            }

            let line = CartLine {
                product_id: product.id,
                qty,
                price: product.price,
                shipping_amount: product.shipping_amount,
                country,
                size,
                color,
            };
            client.cart_add(&cart_id, &line).await?;

            // Totals are server-computed; re-fetch rather than guessing.
            let items = client.cart_list(&cart_id, user_id).await?;
            println!(
                "Added {} x{qty} - cart now has {} item(s)",
                product.title,
                cart_count(&items)
            );
            Ok(())
        }
        CartAction::List => {
            let items = client.cart_list(&cart_id, user_id).await?;

            if items.is_empty() {
                println!("Your cart is empty");
                return Ok(());
            }

            for item in &items {
                let variant = match (&item.size, &item.color) {
                    (Some(size), Some(color)) => format!(" [{size}/{color}]"),
                    (Some(size), None) => format!(" [{size}]"),
                    (None, Some(color)) => format!(" [{color}]"),
                    (None, None) => String::new(),
                };
                println!(
                    "{:>5}  {} x{}{variant}  ${}",
                    item.id, item.product.title, item.qty, item.sub_total
                );
            }

            let summary = client.cart_summary(&cart_id, user_id).await?;
            println!("---");
            println!("sub total: ${}", summary.sub_total);
            println!("shipping:  ${}", summary.shipping);
            println!("tax:       ${}", summary.tax);
            println!("service:   ${}", summary.service_fee);
            println!("total:     ${}", summary.total);
            Ok(())
        }
        CartAction::Remove { item_id } => {
            client
                .cart_remove(&cart_id, CartItemId::new(item_id), user_id)
                .await?;

            let items = client.cart_list(&cart_id, user_id).await?;
            println!("Removed - cart now has {} item(s)", cart_count(&items));
            Ok(())
        }
    }
}
