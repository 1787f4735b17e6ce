//! Command implementations. Results are written to stdout, logs to stderr.

pub mod account;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod wishlist;

use creator_market_core::Product;

/// Discounted unit price, with the original price when on sale.
fn price_label(product: &Product) -> String {
    match product.discount {
        Some(pct) => format!(
            "{} ({}% off {})",
            product.discounted_price(),
            pct.get(),
            product.price
        ),
        None => product.price.to_string(),
    }
}

/// One-line product listing.
fn product_row(product: &Product) -> String {
    format!(
        "{:<6} {:<40} {:<28} by @{}",
        product.id,
        product.name,
        price_label(product),
        product.creator.handle
    )
}
