//! Catalog lookups.

use creator_market_core::{Product, ProductId};
use creator_market_storefront::{AppError, AppState};

use super::{price_label, product_row};

/// List products, optionally narrowed by category, creator, or trending.
pub fn products(
    state: &AppState,
    category: Option<&str>,
    creator: Option<&str>,
    trending: bool,
) -> Result<(), AppError> {
    let catalog = state.catalog();
    let mut selected: Vec<&Product> = match category {
        Some(category) => catalog.by_category(category).collect(),
        None => catalog.products().iter().collect(),
    };
    if let Some(handle) = creator {
        selected.retain(|p| p.creator.handle == handle);
    }
    if trending {
        selected.retain(|p| p.trending);
    }

    if selected.is_empty() {
        return Err(AppError::NotFound("no products match".to_string()));
    }
    for product in selected {
        println!("{}", product_row(product));
    }
    Ok(())
}

/// Show one product in full.
pub fn product(state: &AppState, id: &ProductId) -> Result<(), AppError> {
    let product = state
        .catalog()
        .product(id)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    println!("{} ({})", product.name, product.id);
    println!("  price:    {}", price_label(product));
    println!("  category: {}", product.category);
    println!("  creator:  {} (@{})", product.creator.name, product.creator.handle);
    println!(
        "  rating:   {:.1} from {} reviews",
        product.rating, product.review_count
    );
    if !product.tags.is_empty() {
        println!("  tags:     {}", product.tags.join(", "));
    }
    if let Some(description) = &product.description {
        println!();
        println!("{description}");
    }
    Ok(())
}

/// List creator shops.
pub fn creators(state: &AppState) {
    for creator in state.catalog().creators() {
        let badge = if creator.verified { " ✓" } else { "" };
        println!(
            "@{:<16} {}{} - {} - {} followers, {} products",
            creator.handle,
            creator.name,
            badge,
            creator.category,
            creator.followers,
            creator.product_count
        );
    }
}

/// Show one creator shop and the products it sells.
pub fn creator(state: &AppState, handle: &str) -> Result<(), AppError> {
    let catalog = state.catalog();
    let creator = catalog
        .creator(handle)
        .ok_or_else(|| AppError::NotFound(format!("creator @{handle}")))?;

    println!("{} (@{})", creator.name, creator.handle);
    println!("  {}", creator.description);
    println!(
        "  instagram {} / youtube {} / tiktok {}",
        creator.socials_count.instagram, creator.socials_count.youtube, creator.socials_count.tiktok
    );
    println!();
    for product in catalog.by_creator(handle) {
        println!("{}", product_row(product));
    }
    Ok(())
}

/// List categories.
pub fn categories(state: &AppState) {
    for category in state.catalog().categories() {
        println!("{:<16} {}", category.slug, category.name);
    }
}
