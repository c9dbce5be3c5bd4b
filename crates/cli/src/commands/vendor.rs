//! Vendor back-office commands.

use clap::Subcommand;
use rust_decimal::Decimal;

use mercadito_client::models::{CouponPayload, NewProduct};
use mercadito_client::{ApiClient, ApiError};
use mercadito_core::{CouponId, OrderOid, ProductId, ReviewId};

#[derive(Subcommand)]
pub enum VendorAction {
    /// Headline dashboard numbers
    Stats,
    /// Monthly and lifetime revenue
    Earnings,
    /// Orders containing this vendor's products
    Orders {
        /// Show one order in full
        oid: Option<String>,
    },
    /// Manage this vendor's products
    Products {
        #[command(subcommand)]
        action: Option<ProductAction>,
    },
    /// Manage this vendor's coupons
    Coupons {
        #[command(subcommand)]
        action: Option<CouponAction>,
    },
    /// Reviews of this vendor's products
    Reviews {
        /// Reply to this review id
        #[arg(long)]
        reply_to: Option<i32>,

        /// Reply text
        #[arg(long, requires = "reply_to")]
        reply: Option<String>,
    },
    /// Notifications for this vendor
    Notifications,
}

#[derive(Subcommand)]
pub enum ProductAction {
    /// Create a product
    Create {
        /// Product title
        #[arg(short, long)]
        title: String,

        /// Price
        #[arg(short, long)]
        price: Decimal,

        /// Shipping amount
        #[arg(long, default_value = "0.00")]
        shipping: Decimal,

        /// Stock quantity
        #[arg(long, default_value_t = 1)]
        stock: i32,

        /// Description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Category id
        #[arg(long)]
        category: Option<i32>,
    },
    /// Delete a product
    Delete {
        /// Product id
        product_id: i32,
    },
}

#[derive(Subcommand)]
pub enum CouponAction {
    /// Create a coupon
    Create {
        /// Coupon code
        #[arg(short, long)]
        code: String,

        /// Percentage discount
        #[arg(short, long)]
        discount: i32,

        /// Create as inactive
        #[arg(long)]
        inactive: bool,
    },
    /// Update a coupon
    Update {
        /// Coupon id
        coupon_id: i32,

        /// New code
        #[arg(short, long)]
        code: String,

        /// New percentage discount
        #[arg(short, long)]
        discount: i32,

        /// Deactivate the coupon
        #[arg(long)]
        inactive: bool,
    },
    /// Delete a coupon
    Delete {
        /// Coupon id
        coupon_id: i32,
    },
}

pub async fn run(client: &ApiClient, action: VendorAction) -> Result<(), ApiError> {
    match action {
        VendorAction::Stats => {
            let stats = client.vendor_stats().await?;
            println!("products: {}", stats.products);
            println!("orders:   {}", stats.orders);
            println!("revenue:  ${}", stats.revenue);
            Ok(())
        }
        VendorAction::Earnings => {
            let earnings = client.vendor_earnings().await?;
            println!("this month: ${}", earnings.monthly_revenue);
            println!("lifetime:   ${}", earnings.total_revenue);

            let monthly = client.vendor_monthly_earnings().await?;
            for point in &monthly {
                println!("  month {:>2}: ${}", point.month, point.total_earning);
            }
            Ok(())
        }
        VendorAction::Orders { oid } => {
            match oid {
                Some(oid) => {
                    let order = client.vendor_order(&OrderOid::from(oid.as_str())).await?;
                    println!(
                        "{}  {} / payment {}  ${}",
                        order.oid, order.order_status, order.payment_status, order.total
                    );
                    for item in &order.items {
                        println!("  {} x{}  ${}", item.product.title, item.qty, item.sub_total);
                    }
                }
                None => {
                    for order in &client.vendor_orders().await? {
                        println!(
                            "{}  {} / payment {}  ${}",
                            order.oid, order.order_status, order.payment_status, order.total
                        );
                    }
                }
            }
            Ok(())
        }
        VendorAction::Products { action } => match action {
            None => {
                for product in &client.vendor_products().await? {
                    let stock = if product.in_stock { "" } else { "  [out of stock]" };
                    println!(
                        "{:>5}  {:<40}  ${}{stock}",
                        product.id, product.title, product.price
                    );
                }
                Ok(())
            }
            Some(ProductAction::Create {
                title,
                price,
                shipping,
                stock,
                description,
                category,
            }) => {
                let product = NewProduct {
                    title,
                    description,
                    category,
                    price,
                    old_price: None,
                    shipping_amount: shipping,
                    stock_qty: stock,
                    in_stock: stock > 0,
                    status: Some("published".to_string()),
                    featured: false,
                    image: None,
                };
                let created = client.vendor_create_product(&product).await?;
                println!("Created {} (#{})", created.title, created.id);
                Ok(())
            }
            Some(ProductAction::Delete { product_id }) => {
                client
                    .vendor_delete_product(ProductId::new(product_id))
                    .await?;
                println!("Deleted product {product_id}");
                Ok(())
            }
        },
        VendorAction::Coupons { action } => match action {
            None => {
                let stats = client.vendor_coupon_stats().await?;
                println!(
                    "{} coupon(s), {} active",
                    stats.total_coupons, stats.active_coupons
                );
                for coupon in &client.vendor_coupons().await? {
                    let state = if coupon.active { "active" } else { "inactive" };
                    println!(
                        "{:>5}  {:<20}  {}%  {state}",
                        coupon.id, coupon.code, coupon.discount
                    );
                }
                Ok(())
            }
            Some(CouponAction::Create {
                code,
                discount,
                inactive,
            }) => {
                let coupon = client
                    .vendor_create_coupon(&CouponPayload {
                        code,
                        discount,
                        active: !inactive,
                    })
                    .await?;
                println!("Created coupon {} (#{})", coupon.code, coupon.id);
                Ok(())
            }
            Some(CouponAction::Update {
                coupon_id,
                code,
                discount,
                inactive,
            }) => {
                let coupon = client
                    .vendor_update_coupon(
                        CouponId::new(coupon_id),
                        &CouponPayload {
                            code,
                            discount,
                            active: !inactive,
                        },
                    )
                    .await?;
                println!("Updated coupon {} (#{})", coupon.code, coupon.id);
                Ok(())
            }
            Some(CouponAction::Delete { coupon_id }) => {
                client.vendor_delete_coupon(CouponId::new(coupon_id)).await?;
                println!("Deleted coupon {coupon_id}");
                Ok(())
            }
        },
        VendorAction::Reviews { reply_to, reply } => {
            if let (Some(review_id), Some(reply)) = (reply_to, reply) {
                let review = client
                    .vendor_reply_review(ReviewId::new(review_id), &reply)
                    .await?;
                println!("Replied to review {}", review.id);
                return Ok(());
            }

            for review in &client.vendor_reviews().await? {
                let who = review
                    .user
                    .as_ref()
                    .and_then(|u| u.full_name.as_deref())
                    .unwrap_or("anonymous");
                let product = review
                    .product
                    .as_ref()
                    .map_or("", |product| product.title.as_str());
                println!(
                    "{:>5}  [{} / 5] {who} on {product}: {}",
                    review.id, review.rating, review.review
                );
                if let Some(reply) = &review.reply {
                    println!("       reply: {reply}");
                }
            }
            Ok(())
        }
        VendorAction::Notifications => {
            let summary = client.vendor_notification_summary().await?;
            println!("{} notification(s), {} unseen", summary.total, summary.unseen);
            for notification in &client.vendor_notifications().await? {
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
    }
}
