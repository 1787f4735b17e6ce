//! Checkout command.

use clap::Args;
use secrecy::SecretString;

use creator_market_storefront::services::checkout::{
    CheckoutError, CheckoutForm, OrderSummary, PaymentMethod,
};
use creator_market_storefront::{AppError, AppState};

use super::account::print_field_errors;

/// Arguments for `checkout`.
#[derive(Args)]
pub struct CheckoutArgs {
    /// Print the order summary without placing the order
    #[arg(long)]
    pub summary: bool,

    #[arg(long, default_value_t)]
    pub first_name: String,

    #[arg(long, default_value_t)]
    pub last_name: String,

    #[arg(long, default_value_t)]
    pub email: String,

    #[arg(long, default_value_t)]
    pub address: String,

    #[arg(long, default_value_t)]
    pub city: String,

    #[arg(long, default_value_t)]
    pub postal_code: String,

    #[arg(long, default_value_t)]
    pub country: String,

    /// Remember these details for next time
    #[arg(long)]
    pub save_info: bool,

    /// Payment method (`credit-card`, `paypal`)
    #[arg(long, default_value = "credit-card")]
    pub payment: PaymentMethod,

    #[arg(long, default_value_t)]
    pub card_name: String,

    #[arg(long, default_value_t)]
    pub card_number: String,

    /// Card expiry as MM/YY
    #[arg(long, default_value_t)]
    pub card_expiry: String,

    #[arg(long, default_value_t)]
    pub card_cvc: String,
}

impl From<CheckoutArgs> for CheckoutForm {
    fn from(args: CheckoutArgs) -> Self {
        Self {
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
            address: args.address,
            city: args.city,
            postal_code: args.postal_code,
            country: args.country,
            save_info: args.save_info,
            payment_method: args.payment,
            card_name: args.card_name,
            card_number: SecretString::from(args.card_number),
            card_expiry: args.card_expiry,
            card_cvc: SecretString::from(args.card_cvc),
        }
    }
}

pub async fn place_order(state: &AppState, args: CheckoutArgs) -> Result<(), AppError> {
    if args.summary {
        print_summary(&state.order_summary().await);
        return Ok(());
    }

    let form = CheckoutForm::from(args);
    match state.place_order(&form).await {
        Ok(confirmation) => {
            println!("Order confirmed! Order number #{}", confirmation.order_number);
            println!(
                "{} item(s) paid by {}",
                confirmation.item_count, confirmation.payment_method
            );
            print_summary(&confirmation.summary);
            Ok(())
        }
        Err(CheckoutError::Invalid(errors)) => {
            print_field_errors(&errors);
            Err(AppError::Validation(errors))
        }
        Err(e) => Err(e.into()),
    }
}

fn print_summary(summary: &OrderSummary) {
    println!("  subtotal  {}", summary.subtotal);
    println!("  shipping  Free");
    println!("  tax       {}", summary.tax);
    println!("  total     {}", summary.total);
}
