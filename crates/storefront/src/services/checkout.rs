//! Checkout service.
//!
//! Validates the checkout form, prices the order, and simulates payment. No
//! payment method is charged and no order record is kept: a successful
//! checkout only empties the cart and hands back an order number.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use std::time::Duration;

use rand::Rng;
use regex::Regex;
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use creator_market_core::Price;

use super::FieldErrors;
use crate::models::SessionUser;
use crate::storage::RepositoryError;
use crate::stores::CartStore;

/// Default latency of the simulated payment.
pub const DEFAULT_CHECKOUT_LATENCY: Duration = Duration::from_millis(2000);

/// Sales tax applied to the subtotal, in percent.
pub const TAX_RATE_PERCENT: u32 = 7;

const REQUIRED: &str = "This field is required";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex"));

static CARD_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{16}$").expect("Invalid regex"));

static EXPIRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{2}/[0-9]{2}$").expect("Invalid regex"));

static CVC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{3,4}$").expect("Invalid regex"));

/// Errors from placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Sign in required")]
    SignInRequired,

    #[error("Your cart is empty")]
    EmptyCart,

    #[error("{} field(s) need attention", .0.len())]
    Invalid(FieldErrors),

    #[error("storage error: {0}")]
    Repository(#[from] RepositoryError),
}

/// How the shopper intends to pay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[default]
    #[serde(rename = "credit-card")]
    CreditCard,
    #[serde(rename = "paypal")]
    PayPal,
}

impl PaymentMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreditCard => "credit-card",
            Self::PayPal => "paypal",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown payment method name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown payment method: {0}")]
pub struct PaymentMethodError(String);

impl FromStr for PaymentMethod {
    type Err = PaymentMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "credit-card" => Ok(Self::CreditCard),
            "paypal" => Ok(Self::PayPal),
            other => Err(PaymentMethodError(other.to_owned())),
        }
    }
}

/// Shipping and payment details as entered.
///
/// Card number and CVC are held as secrets so the form can be logged or
/// debug-printed without leaking them.
#[derive(Debug)]
pub struct CheckoutForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub save_info: bool,
    pub payment_method: PaymentMethod,
    pub card_name: String,
    pub card_number: SecretString,
    pub card_expiry: String,
    pub card_cvc: SecretString,
}

impl Default for CheckoutForm {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            address: String::new(),
            city: String::new(),
            postal_code: String::new(),
            country: String::new(),
            save_info: false,
            payment_method: PaymentMethod::default(),
            card_name: String::new(),
            card_number: SecretString::from(String::new()),
            card_expiry: String::new(),
            card_cvc: SecretString::from(String::new()),
        }
    }
}

impl CheckoutForm {
    /// Check the form, returning one message per invalid field.
    ///
    /// Keys use the form's field names (`firstName`, `cardNumber`, ...). Card
    /// fields are only checked when paying by credit card. An empty map
    /// means the order may be placed.
    #[must_use]
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        let required = [
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("email", &self.email),
            ("address", &self.address),
            ("city", &self.city),
            ("postalCode", &self.postal_code),
            ("country", &self.country),
        ];
        for (field, value) in required {
            if value.is_empty() {
                errors.insert(field, REQUIRED.to_owned());
            }
        }

        if !self.email.is_empty() && !EMAIL_RE.is_match(&self.email) {
            errors.insert("email", "Please enter a valid email address".to_owned());
        }

        if self.payment_method == PaymentMethod::CreditCard {
            self.validate_card(&mut errors);
        }

        errors
    }

    fn validate_card(&self, errors: &mut FieldErrors) {
        let number = self.card_number.expose_secret();
        let cvc = self.card_cvc.expose_secret();

        if self.card_name.is_empty() {
            errors.insert("cardName", "Cardholder name is required".to_owned());
        }

        if number.is_empty() {
            errors.insert("cardNumber", "Card number is required".to_owned());
        } else {
            let digits: String = number.chars().filter(|c| !c.is_whitespace()).collect();
            if !CARD_NUMBER_RE.is_match(&digits) {
                errors.insert(
                    "cardNumber",
                    "Please enter a valid 16-digit card number".to_owned(),
                );
            }
        }

        if self.card_expiry.is_empty() {
            errors.insert("cardExpiry", "Expiry date is required".to_owned());
        } else if !EXPIRY_RE.is_match(&self.card_expiry) {
            errors.insert("cardExpiry", "Please use MM/YY format".to_owned());
        }

        if cvc.is_empty() {
            errors.insert("cardCvc", "CVC is required".to_owned());
        } else if !CVC_RE.is_match(cvc) {
            errors.insert("cardCvc", "Please enter a valid CVC".to_owned());
        }
    }
}

/// Price breakdown shown beside the checkout form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    pub subtotal: Price,
    /// Always free.
    pub shipping: Price,
    pub tax: Price,
    pub total: Price,
}

impl OrderSummary {
    /// Price an order whose items come to `subtotal`.
    #[must_use]
    pub fn from_subtotal(subtotal: Price) -> Self {
        let shipping = Price::zero(subtotal.currency_code);
        let tax = subtotal.percent(Decimal::from(TAX_RATE_PERCENT));
        Self {
            subtotal,
            shipping,
            tax,
            total: subtotal + shipping + tax,
        }
    }
}

/// Returned from a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    /// Random six-digit number shown to the shopper.
    pub order_number: u32,
    pub summary: OrderSummary,
    /// Units purchased.
    pub item_count: u64,
    pub payment_method: PaymentMethod,
}

/// Simulated order placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutService {
    latency: Duration,
}

impl Default for CheckoutService {
    fn default() -> Self {
        Self::new(DEFAULT_CHECKOUT_LATENCY)
    }
}

impl CheckoutService {
    /// Create a service whose payments take `latency` to complete.
    #[must_use]
    pub const fn new(latency: Duration) -> Self {
        Self { latency }
    }

    /// Price the current cart.
    #[must_use]
    pub fn summary(cart: &CartStore) -> OrderSummary {
        OrderSummary::from_subtotal(cart.total())
    }

    /// Validate, simulate payment, and empty the cart.
    ///
    /// Dropping the future before the payment delay elapses leaves the cart
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::SignInRequired` without a session,
    /// `CheckoutError::EmptyCart` for an empty cart, `CheckoutError::Invalid`
    /// with the per-field messages for a bad form, or
    /// `CheckoutError::Repository` if the emptied cart cannot be persisted.
    #[instrument(skip_all, fields(payment_method = %form.payment_method))]
    pub async fn place_order(
        &self,
        user: Option<&SessionUser>,
        cart: &mut CartStore,
        form: &CheckoutForm,
    ) -> Result<OrderConfirmation, CheckoutError> {
        let Some(user) = user else {
            return Err(CheckoutError::SignInRequired);
        };
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let errors = form.validate();
        if !errors.is_empty() {
            tracing::debug!(fields = ?errors.keys().collect::<Vec<_>>(), "Checkout form rejected");
            return Err(CheckoutError::Invalid(errors));
        }

        let summary = Self::summary(cart);
        let item_count = cart.item_count();

        tokio::time::sleep(self.latency).await;

        cart.clear()?;
        let order_number = rand::rng().random_range(100_000..1_000_000);
        tracing::info!(
            user_id = %user.id,
            order_number,
            item_count,
            total = %summary.total,
            "Order placed"
        );

        Ok(OrderConfirmation {
            order_number,
            summary,
            item_count,
            payment_method: form.payment_method,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use creator_market_core::{Catalog, Email, ProductId, UserId, UserRole};

    use super::*;
    use crate::models::keys;
    use crate::storage::{MemoryStore, Repository};

    fn secret(raw: &str) -> SecretString {
        SecretString::from(raw.to_owned())
    }

    fn valid_form() -> CheckoutForm {
        CheckoutForm {
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            email: "ada@example.com".to_owned(),
            address: "12 Analytical Way".to_owned(),
            city: "London".to_owned(),
            postal_code: "N1 9GU".to_owned(),
            country: "UK".to_owned(),
            save_info: true,
            payment_method: PaymentMethod::CreditCard,
            card_name: "Ada Lovelace".to_owned(),
            card_number: secret("4242 4242 4242 4242"),
            card_expiry: "12/29".to_owned(),
            card_cvc: secret("123"),
        }
    }

    fn shopper() -> SessionUser {
        SessionUser {
            id: UserId::new("user-1"),
            name: "user".to_owned(),
            email: Email::parse("user@test.com").unwrap(),
            role: UserRole::User,
            avatar: None,
            creator_profile: None,
        }
    }

    fn cart() -> CartStore {
        let store: Arc<MemoryStore> = Arc::new(MemoryStore::new());
        CartStore::load(
            Arc::new(Catalog::sample()),
            Repository::new(store, keys::CART),
        )
        .unwrap()
    }

    #[test]
    fn test_valid_form_has_no_errors() {
        assert!(valid_form().validate().is_empty());
    }

    #[test]
    fn test_required_fields() {
        let errors = CheckoutForm::default().validate();
        for field in [
            "firstName",
            "lastName",
            "email",
            "address",
            "city",
            "postalCode",
            "country",
        ] {
            assert_eq!(errors.get(field).map(String::as_str), Some(REQUIRED), "{field}");
        }
        assert_eq!(
            errors.get("cardName").map(String::as_str),
            Some("Cardholder name is required")
        );
        assert_eq!(
            errors.get("cardNumber").map(String::as_str),
            Some("Card number is required")
        );
        assert_eq!(
            errors.get("cardExpiry").map(String::as_str),
            Some("Expiry date is required")
        );
        assert_eq!(errors.get("cardCvc").map(String::as_str), Some("CVC is required"));
    }

    #[test]
    fn test_format_checks() {
        let form = CheckoutForm {
            email: "ada@example".to_owned(),
            card_number: secret("4242 4242 4242"),
            card_expiry: "1229".to_owned(),
            card_cvc: secret("12a"),
            ..valid_form()
        };
        let errors = form.validate();

        assert_eq!(
            errors.get("email").map(String::as_str),
            Some("Please enter a valid email address")
        );
        assert_eq!(
            errors.get("cardNumber").map(String::as_str),
            Some("Please enter a valid 16-digit card number")
        );
        assert_eq!(
            errors.get("cardExpiry").map(String::as_str),
            Some("Please use MM/YY format")
        );
        assert_eq!(
            errors.get("cardCvc").map(String::as_str),
            Some("Please enter a valid CVC")
        );
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_card_fields_accept_ascii_digits_only() {
        let form = CheckoutForm {
            card_number: secret("٤٢٤٢٤٢٤٢٤٢٤٢٤٢٤٢"),
            card_expiry: "١٢/٢٩".to_owned(),
            card_cvc: secret("١٢٣"),
            ..valid_form()
        };
        let errors = form.validate();

        assert_eq!(
            errors.get("cardNumber").map(String::as_str),
            Some("Please enter a valid 16-digit card number")
        );
        assert_eq!(
            errors.get("cardExpiry").map(String::as_str),
            Some("Please use MM/YY format")
        );
        assert_eq!(
            errors.get("cardCvc").map(String::as_str),
            Some("Please enter a valid CVC")
        );
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_paypal_skips_card_fields() {
        let form = CheckoutForm {
            payment_method: PaymentMethod::PayPal,
            card_name: String::new(),
            card_number: secret(""),
            card_expiry: "bogus".to_owned(),
            card_cvc: secret(""),
            ..valid_form()
        };
        assert!(form.validate().is_empty());
    }

    #[test]
    fn test_payment_method_names() {
        assert_eq!("paypal".parse::<PaymentMethod>().unwrap(), PaymentMethod::PayPal);
        assert_eq!(PaymentMethod::CreditCard.to_string(), "credit-card");
        assert!("cash".parse::<PaymentMethod>().is_err());
        assert_eq!(
            serde_json::to_string(&PaymentMethod::CreditCard).unwrap(),
            r#""credit-card""#
        );
    }

    #[test]
    fn test_order_summary_arithmetic() {
        let summary = OrderSummary::from_subtotal(Price::usd_cents(10_000));
        assert_eq!(summary.shipping, Price::usd_cents(0));
        assert_eq!(summary.tax.display(), "$7.00");
        assert_eq!(summary.total.display(), "$107.00");

        let summary = OrderSummary::from_subtotal(Price::usd_cents(6997));
        assert_eq!(summary.tax.display(), "$4.90");
        assert_eq!(summary.total.display(), "$74.87");
    }

    #[tokio::test]
    async fn test_place_order_requires_session() {
        let mut cart = cart();
        cart.add_item(&ProductId::new("p1")).unwrap();
        let service = CheckoutService::new(Duration::ZERO);

        let err = service
            .place_order(None, &mut cart, &valid_form())
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::SignInRequired));
        assert_eq!(cart.item_count(), 1);
    }

    #[tokio::test]
    async fn test_place_order_rejects_empty_cart_and_bad_form() {
        let mut cart = cart();
        let service = CheckoutService::new(Duration::ZERO);
        let user = shopper();

        let err = service
            .place_order(Some(&user), &mut cart, &valid_form())
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::EmptyCart));

        cart.add_item(&ProductId::new("p3")).unwrap();
        let err = service
            .place_order(Some(&user), &mut cart, &CheckoutForm::default())
            .await
            .unwrap_err();
        let CheckoutError::Invalid(errors) = err else {
            panic!("expected field errors");
        };
        assert!(errors.contains_key("firstName"));
        assert_eq!(cart.item_count(), 1);
    }

    #[tokio::test]
    async fn test_place_order_clears_cart() {
        let mut cart = cart();
        cart.add_item(&ProductId::new("p1")).unwrap();
        cart.add_item(&ProductId::new("p1")).unwrap();
        let user = shopper();

        let confirmation = CheckoutService::new(Duration::ZERO)
            .place_order(Some(&user), &mut cart, &valid_form())
            .await
            .unwrap();

        assert!((100_000..1_000_000).contains(&confirmation.order_number));
        assert_eq!(confirmation.item_count, 2);
        assert_eq!(confirmation.summary.subtotal.display(), "$49.98");
        assert_eq!(confirmation.summary.total.display(), "$53.48");
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Price::usd_cents(0));
    }
}
