//! Type-safe price representation using decimal arithmetic.
//!
//! Sample prices are stored exactly (e.g. `149.99`) and discounts are applied
//! without binary floating-point drift, so a cart total recomputed from the
//! same items is always bit-for-bit identical.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a USD price from an amount in cents.
    #[must_use]
    pub fn usd_cents(cents: i64) -> Self {
        Self::new(Decimal::new(cents, 2), CurrencyCode::USD)
    }

    /// A zero amount in the given currency.
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::ZERO, currency_code)
    }

    /// Apply an optional percentage discount.
    ///
    /// `price × (1 − discount / 100)`; no discount returns the price unchanged.
    #[must_use]
    pub fn discounted(self, discount: Option<DiscountPercent>) -> Self {
        match discount {
            Some(pct) => {
                let remaining = Decimal::ONE_HUNDRED - Decimal::from(pct.get());
                Self::new(
                    self.amount * remaining / Decimal::ONE_HUNDRED,
                    self.currency_code,
                )
            }
            None => self,
        }
    }

    /// Multiply by a percentage rate (e.g. `7` for 7% tax).
    #[must_use]
    pub fn percent(self, rate: Decimal) -> Self {
        Self::new(self.amount * rate / Decimal::ONE_HUNDRED, self.currency_code)
    }

    /// Amount rounded half away from zero to two decimal places.
    #[must_use]
    pub fn rounded(&self) -> Decimal {
        self.amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}{:.2}", self.currency_code.symbol(), self.rounded())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.display())
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        debug_assert_eq!(
            self.currency_code, rhs.currency_code,
            "cannot add prices in different currencies"
        );
        Self::new(self.amount + rhs.amount, self.currency_code)
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self::Output {
        Self::new(self.amount * Decimal::from(quantity), self.currency_code)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(CurrencyCode::default()), Add::add)
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }
}

/// Error returned when a discount is outside `0..=100`.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("discount must be between 0 and 100 percent (got {0})")]
pub struct DiscountOutOfRange(pub u8);

/// A percentage discount between 0 and 100 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DiscountPercent(u8);

impl DiscountPercent {
    /// Create a discount, rejecting values above 100.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountOutOfRange`] if `pct > 100`.
    pub const fn new(pct: u8) -> Result<Self, DiscountOutOfRange> {
        if pct > 100 {
            return Err(DiscountOutOfRange(pct));
        }
        Ok(Self(pct))
    }

    /// The percentage value.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for DiscountPercent {
    type Error = DiscountOutOfRange;

    fn try_from(pct: u8) -> Result<Self, Self::Error> {
        Self::new(pct)
    }
}

impl From<DiscountPercent> for u8 {
    fn from(pct: DiscountPercent) -> Self {
        pct.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_discount_applies_percentage() {
        let price = Price::usd_cents(14999);
        let discounted = price.discounted(Some(DiscountPercent::new(15).unwrap()));
        assert_eq!(discounted.amount, Decimal::new(1_274_915, 4));
        assert_eq!(discounted.display(), "$127.49");
    }

    #[test]
    fn test_no_discount_is_identity() {
        let price = Price::usd_cents(2499);
        assert_eq!(price.discounted(None), price);
    }

    #[test]
    fn test_discount_out_of_range() {
        assert_eq!(DiscountPercent::new(101), Err(DiscountOutOfRange(101)));
        assert!(DiscountPercent::new(100).is_ok());
    }

    #[test]
    fn test_sum_and_mul() {
        let total: Price = [Price::usd_cents(1000) * 2, Price::usd_cents(250)]
            .into_iter()
            .sum();
        assert_eq!(total.display(), "$22.50");
    }

    #[test]
    fn test_display_rounds_half_away_from_zero() {
        let price = Price::new(Decimal::new(12345, 3), CurrencyCode::USD);
        assert_eq!(price.display(), "$12.35");
    }

    #[test]
    fn test_display_respects_width() {
        let price = Price::usd_cents(2499);
        assert_eq!(format!("[{price:<10}]"), "[$24.99    ]");
        assert_eq!(format!("[{price:>8}]"), "[  $24.99]");
    }

    #[test]
    fn test_discount_serde_rejects_out_of_range() {
        assert!(serde_json::from_str::<DiscountPercent>("150").is_err());
        let pct: DiscountPercent = serde_json::from_str("20").unwrap();
        assert_eq!(pct.get(), 20);
    }
}
