//! Catalog commands: products, categories, reviews.

use mercadito_client::{ApiClient, ApiError};

pub async fn products(client: &ApiClient, search: Option<&str>) -> Result<(), ApiError> {
    let products = match search {
        Some(query) => client.search(query).await?,
        None => client.products().await?,
    };

    if products.is_empty() {
        println!("No products found");
        return Ok(());
    }

    for product in &products {
        let stock = if product.in_stock { "" } else { "  [out of stock]" };
        println!(
            "{:>5}  {:<40}  ${}{stock}",
            product.id, product.slug, product.price
        );
    }
    println!("{} product(s)", products.len());
    Ok(())
}

pub async fn product(client: &ApiClient, slug: &str) -> Result<(), ApiError> {
    let product = client.product(slug).await?;

    println!("{}  (#{})", product.title, product.id);
    println!("price: ${}", product.price);
    if let Some(old_price) = product.old_price {
        println!("was: ${old_price}");
    }
    println!("shipping: ${}", product.shipping_amount);
    if let Some(category) = &product.category {
        println!("category: {}", category.title);
    }
    println!("in stock: {}", if product.in_stock { "yes" } else { "no" });
    if let Some(description) = &product.description {
        println!("\n{description}");
    }
    if !product.size.is_empty() {
        let sizes: Vec<&str> = product.size.iter().map(|s| s.name.as_str()).collect();
        println!("sizes: {}", sizes.join(", "));
    }
    if !product.color.is_empty() {
        let colors: Vec<&str> = product.color.iter().map(|c| c.name.as_str()).collect();
        println!("colors: {}", colors.join(", "));
    }
    for spec in &product.specification {
        println!("  {}: {}", spec.title, spec.content);
    }
    Ok(())
}

pub async fn categories(client: &ApiClient) -> Result<(), ApiError> {
    let categories = client.categories().await?;
    for category in &categories {
        println!("{:>5}  {}", category.id, category.title);
    }
    Ok(())
}

pub async fn reviews(client: &ApiClient, slug: &str) -> Result<(), ApiError> {
    let product = client.product(slug).await?;
    let reviews = client.reviews(product.id).await?;

    if reviews.is_empty() {
        println!("No reviews yet for {}", product.title);
        return Ok(());
    }

    for review in &reviews {
        let who = review
            .user
            .as_ref()
            .and_then(|u| u.full_name.as_deref())
            .unwrap_or("anonymous");
        println!("[{} / 5] {who}: {}", review.rating, review.review);
        if let Some(reply) = &review.reply {
            println!("    vendor reply: {reply}");
        }
    }
    Ok(())
}
