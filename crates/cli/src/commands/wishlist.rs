//! Wishlist commands.

use creator_market_core::ProductId;
use creator_market_storefront::{AppError, AppState};

use super::product_row;

/// Print saved products.
pub async fn show(state: &AppState) {
    let wishlist = state.wishlist().await;
    if wishlist.is_empty() {
        println!("Your wishlist is empty");
        return;
    }
    for product in wishlist.products() {
        println!("{}", product_row(product));
    }
}

pub async fn add(state: &AppState, id: &ProductId) -> Result<(), AppError> {
    state.wishlist().await.add_item(id)?;
    println!("Saved {id}");
    Ok(())
}

pub async fn remove(state: &AppState, id: &ProductId) -> Result<(), AppError> {
    state.wishlist().await.remove_item(id)?;
    println!("Removed {id}");
    Ok(())
}

pub async fn move_to_cart(state: &AppState, id: &ProductId) -> Result<(), AppError> {
    if !state.wishlist().await.is_in_wishlist(id) {
        return Err(AppError::NotFound(format!("{id} in wishlist")));
    }
    state.move_to_cart(id).await?;
    println!("Moved {id} to cart");
    Ok(())
}

pub async fn clear(state: &AppState) -> Result<(), AppError> {
    state.wishlist().await.clear()?;
    println!("Wishlist cleared");
    Ok(())
}
