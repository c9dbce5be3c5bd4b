//! Checkout and order commands.

use clap::Subcommand;

use mercadito_client::api::OrderDetails;
use mercadito_client::models::Order;
use mercadito_client::{ApiClient, ApiError};
use mercadito_core::OrderOid;

#[derive(Subcommand)]
pub enum OrderAction {
    /// Turn the cart into a pending order
    Create {
        /// Recipient name
        #[arg(long)]
        full_name: String,

        /// Contact email
        #[arg(long)]
        email: String,

        /// Contact phone
        #[arg(long)]
        mobile: String,

        /// Street address
        #[arg(long)]
        address: String,

        /// City
        #[arg(long)]
        city: String,

        /// State or region
        #[arg(long)]
        state: String,

        /// Country
        #[arg(long)]
        country: String,
    },
    /// Show a pending order's checkout summary
    Show {
        /// Order oid
        oid: String,
    },
    /// Apply a coupon code to a pending order
    Coupon {
        /// Order oid
        oid: String,

        /// Coupon code
        code: String,
    },
    /// Verify the payment state of an order
    Pay {
        /// Order oid
        oid: String,

        /// Payment provider session id, if returning from a redirect
        #[arg(long)]
        session_id: Option<String>,
    },
}

fn print_order(order: &Order) {
    println!("order {}", order.oid);
    println!(
        "status: {} / payment {}",
        order.order_status, order.payment_status
    );
    for item in &order.items {
        println!(
            "  {} x{}  ${}",
            item.product.title, item.qty, item.sub_total
        );
    }
    println!("sub total: ${}", order.sub_total);
    println!("shipping:  ${}", order.shipping_amount);
    println!("tax:       ${}", order.tax_fee);
    println!("service:   ${}", order.service_fee);
    if order.saved > rust_decimal::Decimal::ZERO {
        println!("saved:     ${}", order.saved);
    }
    println!("total:     ${}", order.total);
}

pub async fn run(client: &ApiClient, action: OrderAction) -> Result<(), ApiError> {
    match action {
        OrderAction::Create {
            full_name,
            email,
            mobile,
            address,
            city,
            state,
            country,
        } => {
            let cart_id = client.session().cart_id();
            let details = OrderDetails {
                full_name,
                email,
                mobile,
                address,
                city,
                state,
                country,
            };
            let created = client.create_order(&cart_id, &details).await?;
            println!("Order created: {}", created.order_oid);
            println!("Next: mercadito order show {}", created.order_oid);
            Ok(())
        }
        OrderAction::Show { oid } => {
            let order = client.checkout(&OrderOid::from(oid.as_str())).await?;
            print_order(&order);
            Ok(())
        }
        OrderAction::Coupon { oid, code } => {
            let oid = OrderOid::from(oid.as_str());
            let applied = client.apply_coupon(&oid, &code).await?;
            println!(
                "{}",
                applied.message.unwrap_or_else(|| "Coupon applied".to_string())
            );

            // Show the recomputed totals.
            let order = client.checkout(&oid).await?;
            print_order(&order);
            Ok(())
        }
        OrderAction::Pay { oid, session_id } => {
            let result = client
                .verify_payment(&OrderOid::from(oid.as_str()), session_id.as_deref())
                .await?;
            println!("{}", result.message);
            Ok(())
        }
    }
}
