use crate::error::ShopError;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Default currency code for every price in the store.
pub const DEFAULT_CURRENCY: &str = "INR";
/// Currency symbol used when rendering prices.
pub const CURRENCY_SYMBOL: &str = "₹";

/// A positive amount of rupees charged in a single payment.
///
/// Wraps `rust_decimal::Decimal` so that a zero or negative charge can never
/// reach the gateway.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, ShopError> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(ShopError::ValidationError(
                "Amount must be positive".to_string(),
            ))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = ShopError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

/// Formats rupees the way an `en-IN` locale does: lakh/crore digit grouping,
/// at most two fraction digits and no trailing zeros.
pub fn format_inr(amount: Decimal) -> String {
    let rounded = amount.round_dp(2).normalize();
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = rounded.abs().to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (text.as_str(), None),
    };

    let mut grouped = group_indian(int_part);
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    format!("{sign}{CURRENCY_SYMBOL}{grouped}")
}

/// Formats rupees as the bare symbol followed by the plain number.
pub fn format_inr_simple(amount: Decimal) -> String {
    format!("{CURRENCY_SYMBOL}{}", amount.normalize())
}

// Last three digits form one group, the rest are grouped in pairs.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

/// Converts rupees to whole paisa, rounding half away from zero.
pub fn to_paisa(rupees: Decimal) -> Result<i64, ShopError> {
    (rupees * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or_else(|| ShopError::ValidationError(format!("Amount out of range: {rupees}")))
}

pub fn from_paisa(paisa: i64) -> Decimal {
    Decimal::new(paisa, 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_validation() {
        assert!(Amount::new(dec!(1.0)).is_ok());
        assert!(matches!(
            Amount::new(dec!(0.0)),
            Err(ShopError::ValidationError(_))
        ));
        assert!(matches!(
            Amount::new(dec!(-1.0)),
            Err(ShopError::ValidationError(_))
        ));
    }

    #[test]
    fn test_amount_rejects_zero_on_deserialize() {
        let parsed: Result<Amount, _> = serde_json::from_str("\"0\"");
        assert!(parsed.is_err());
        let parsed: Amount = serde_json::from_str("\"12.5\"").unwrap();
        assert_eq!(parsed.value(), dec!(12.5));
    }

    #[test]
    fn test_format_inr_grouping() {
        assert_eq!(format_inr(dec!(999)), "₹999");
        assert_eq!(format_inr(dec!(1990)), "₹1,990");
        assert_eq!(format_inr(dec!(123456.5)), "₹1,23,456.5");
        assert_eq!(format_inr(dec!(12345678.999)), "₹1,23,45,679");
        assert_eq!(format_inr(dec!(-2500.10)), "-₹2,500.1");
    }

    #[test]
    fn test_format_inr_simple() {
        assert_eq!(format_inr_simple(dec!(1990.00)), "₹1990");
    }

    #[test]
    fn test_paisa_conversion() {
        assert_eq!(to_paisa(dec!(19.99)).unwrap(), 1999);
        assert_eq!(to_paisa(dec!(0.005)).unwrap(), 1);
        assert_eq!(from_paisa(1999), dec!(19.99));
    }
}
