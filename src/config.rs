use crate::domain::payment::is_valid_upi_id;
use crate::error::{Result, ShopError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::ops::RangeInclusive;
use std::time::Duration;

/// Upper bound on verification attempts in a single polling session.
pub const MAX_POLL_ATTEMPTS: u32 = 100;

/// How often, and how many times, a pending payment is re-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    max_attempts: u32,
    interval: Duration,
}

impl PollPolicy {
    /// Attempts and interval the UPI checkout uses while a code is on screen.
    pub const CHECKOUT: Self = Self {
        max_attempts: 15,
        interval: Duration::from_millis(3000),
    };

    pub fn new(max_attempts: u32, interval: Duration) -> Result<Self> {
        if !(1..=MAX_POLL_ATTEMPTS).contains(&max_attempts) {
            return Err(ShopError::ValidationError(format!(
                "max attempts must be between 1 and {MAX_POLL_ATTEMPTS}, got {max_attempts}"
            )));
        }
        Ok(Self {
            max_attempts,
            interval,
        })
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            interval: Duration::from_millis(3000),
        }
    }
}

/// The payee shown in UPI intents and charged GST.
#[derive(Debug, Clone, PartialEq)]
pub struct MerchantConfig {
    pub merchant_id: String,
    pub merchant_name: String,
    pub tax_rate: Decimal,
}

impl MerchantConfig {
    pub fn new(merchant_id: impl Into<String>, merchant_name: impl Into<String>) -> Result<Self> {
        let merchant_id = merchant_id.into();
        if !is_valid_upi_id(&merchant_id) {
            return Err(ShopError::ValidationError(format!(
                "Please enter a valid UPI ID (e.g., yourname@paytm), got '{merchant_id}'"
            )));
        }
        Ok(Self {
            merchant_id,
            merchant_name: merchant_name.into(),
            ..Self::default()
        })
    }
}

impl Default for MerchantConfig {
    fn default() -> Self {
        Self {
            merchant_id: "merchant@paytm".to_string(),
            merchant_name: "ShopEase".to_string(),
            tax_rate: dec!(0.18),
        }
    }
}

/// Which outcomes the simulated UPI gateway produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SimulationMode {
    /// 70% completed, 20% pending, 10% failed.
    #[default]
    Random,
    Completed,
    Pending,
    Failed,
    /// Every status check errors out.
    Unreachable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GatewayConfig {
    pub mode: SimulationMode,
    pub latency: RangeInclusive<Duration>,
    pub seed: Option<u64>,
}

impl GatewayConfig {
    pub fn instant(mode: SimulationMode) -> Self {
        Self {
            mode,
            latency: Duration::ZERO..=Duration::ZERO,
            seed: None,
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            mode: SimulationMode::Random,
            latency: Duration::from_millis(1500)..=Duration::from_millis(2500),
            seed: None,
        }
    }
}
