//! Cart commands.

use creator_market_core::ProductId;
use creator_market_storefront::{AppError, AppState};

/// Print line items and the total.
pub async fn show(state: &AppState) {
    let cart = state.cart().await;
    if cart.is_empty() {
        println!("Your cart is empty");
        return;
    }

    for line in cart.lines() {
        println!(
            "{:<6} {:<40} {:>3} x {:<10} {}",
            line.product.id, line.product.name, line.quantity, line.unit_price, line.line_price
        );
    }
    println!("{} item(s), total {}", cart.item_count(), cart.total());
}

pub async fn add(state: &AppState, id: &ProductId) -> Result<(), AppError> {
    let mut cart = state.cart().await;
    if state.catalog().product(id).is_none() {
        tracing::warn!(product_id = %id, "Product not in catalog; it will not count toward the total");
    }
    cart.add_item(id)?;
    println!("Added {id} (quantity {})", cart.quantity_of(id).unwrap_or(1));
    Ok(())
}

pub async fn remove(state: &AppState, id: &ProductId) -> Result<(), AppError> {
    state.cart().await.remove_item(id)?;
    println!("Removed {id}");
    Ok(())
}

pub async fn set(state: &AppState, id: &ProductId, quantity: i64) -> Result<(), AppError> {
    let mut cart = state.cart().await;
    cart.update_quantity(id, quantity)?;
    match cart.quantity_of(id) {
        Some(quantity) => println!("{id} quantity is now {quantity}"),
        None => println!("{id} is not in the cart"),
    }
    Ok(())
}

pub async fn clear(state: &AppState) -> Result<(), AppError> {
    state.cart().await.clear()?;
    println!("Cart cleared");
    Ok(())
}
