use super::cart::CartItem;
use super::money::{Amount, DEFAULT_CURRENCY};
use crate::error::ShopError;
use chrono::{DateTime, Utc};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifying and amount data for one UPI transaction submitted for
/// status polling.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct VerificationRequest {
    pub transaction_id: String,
    pub amount: Amount,
    pub merchant_id: String,
    pub merchant_name: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Pending,
    Completed,
    Failed,
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        f.write_str(status)
    }
}

/// What the gateway reported for a transaction at `timestamp`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct VerificationResponse {
    pub transaction_id: String,
    pub status: VerificationStatus,
    pub amount: Amount,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl VerificationResponse {
    /// A response for `request` with no reference id or error message.
    pub fn for_request(request: &VerificationRequest, status: VerificationStatus) -> Self {
        Self {
            transaction_id: request.transaction_id.clone(),
            status,
            amount: request.amount,
            timestamp: Utc::now(),
            reference_id: None,
            error_message: None,
        }
    }

    pub fn with_reference(mut self, reference_id: impl Into<String>) -> Self {
        self.reference_id = Some(reference_id.into());
        self
    }

    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }
}

/// Checks a UPI virtual payment address: `[\w.-]+@[\w.-]+`.
pub fn is_valid_upi_id(upi_id: &str) -> bool {
    fn valid_part(part: &str) -> bool {
        !part.is_empty()
            && part
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '-')
    }

    match upi_id.split_once('@') {
        Some((user, handle)) => valid_part(user) && valid_part(handle),
        None => false,
    }
}

/// The `upi://pay` deep link a payment app scans to start a transfer.
#[derive(Debug, PartialEq, Clone)]
pub struct UpiIntent {
    pub payee_id: String,
    pub payee_name: String,
    pub amount: Amount,
    pub transaction_ref: String,
    pub note: String,
    pub currency: String,
}

impl UpiIntent {
    pub const DEFAULT_NOTE: &'static str = "Payment for Order";

    pub fn new(request: &VerificationRequest) -> Self {
        Self {
            payee_id: request.merchant_id.clone(),
            payee_name: request.merchant_name.clone(),
            amount: request.amount,
            transaction_ref: request.transaction_id.clone(),
            note: Self::DEFAULT_NOTE.to_string(),
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }

    pub fn to_uri(&self) -> String {
        format!(
            "upi://pay?pa={}&pn={}&am={:.2}&tr={}&tn={}&cu={}",
            encode_component(&self.payee_id),
            encode_component(&self.payee_name),
            self.amount.value().round_dp(2),
            encode_component(&self.transaction_ref),
            encode_component(&self.note),
            encode_component(&self.currency),
        )
    }
}

impl fmt::Display for UpiIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_uri())
    }
}

// Unreserved characters plus `@`, so payee addresses stay readable in the link.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'@');

fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct BillingAddress {
    pub full_name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

impl BillingAddress {
    pub fn validate(&self) -> Result<(), ShopError> {
        let fields = [
            &self.full_name,
            &self.phone,
            &self.address,
            &self.city,
            &self.state,
            &self.zip_code,
        ];
        if fields.iter().any(|field| field.trim().is_empty()) {
            return Err(ShopError::ValidationError(
                "Please fill in all address fields".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CardDetails {
    pub number: String,
    pub expiry: String,
    pub cvv: String,
    pub name_on_card: String,
}

impl CardDetails {
    pub fn validate(&self) -> Result<(), ShopError> {
        let invalid = |message: &str| Err(ShopError::ValidationError(message.to_string()));

        if [&self.number, &self.expiry, &self.cvv, &self.name_on_card]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return invalid("Please fill in all card details");
        }

        let digits: String = self.number.chars().filter(|c| !c.is_whitespace()).collect();
        if !(12..=19).contains(&digits.len()) || !digits.chars().all(|c| c.is_ascii_digit()) {
            return invalid("Card number must be 12 to 19 digits");
        }

        let month = self
            .expiry
            .split_once('/')
            .filter(|(mm, yy)| {
                mm.len() == 2
                    && yy.len() == 2
                    && mm.chars().chain(yy.chars()).all(|c| c.is_ascii_digit())
            })
            .and_then(|(mm, _)| mm.parse::<u8>().ok());
        if !matches!(month, Some(1..=12)) {
            return invalid("Expiry date must be MM/YY");
        }

        if !(3..=4).contains(&self.cvv.len()) || !self.cvv.chars().all(|c| c.is_ascii_digit()) {
            return invalid("CVV must be 3 or 4 digits");
        }

        Ok(())
    }

    pub fn last4(&self) -> String {
        let digits: Vec<char> = self.number.chars().filter(char::is_ascii_digit).collect();
        digits[digits.len().saturating_sub(4)..].iter().collect()
    }
}

/// Subtotal, GST and grand total for a set of cart lines.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy)]
pub struct Quote {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl Quote {
    pub fn for_items(items: &[CartItem], tax_rate: Decimal) -> Self {
        let subtotal: Decimal = items.iter().map(CartItem::line_total).sum();
        let tax = (subtotal * tax_rate).round_dp(2);
        Self {
            subtotal,
            tax,
            total: (subtotal + tax).round_dp(2),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Card,
    Upi,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Card => f.write_str("CARD"),
            Self::Upi => f.write_str("UPI"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub items: Vec<CartItem>,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total_amount: Decimal,
    pub method: PaymentMethod,
    pub transaction_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub billing_address: BillingAddress,
    pub tracking_number: String,
}
