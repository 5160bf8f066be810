use crate::config::{GatewayConfig, SimulationMode};
use crate::domain::payment::{VerificationRequest, VerificationResponse, VerificationStatus};
use crate::domain::ports::StatusChecker;
use crate::error::{Result, ShopError};
use async_trait::async_trait;
use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use std::time::Duration;

pub const DECLINED_MESSAGE: &str = "Insufficient balance or transaction declined";

/// A stand-in for the UPI switch.
///
/// Each check sleeps for a latency drawn from the configured range and then
/// reports an outcome chosen by the [`SimulationMode`].
pub struct SimulatedUpiGateway {
    mode: SimulationMode,
    latency: (Duration, Duration),
    rng: Mutex<StdRng>,
}

impl SimulatedUpiGateway {
    pub fn new(config: GatewayConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            mode: config.mode,
            latency: (*config.latency.start(), *config.latency.end()),
            rng: Mutex::new(rng),
        }
    }

    // Draws everything a single check needs while holding the lock once.
    fn roll(&self) -> (Duration, f64, String) {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let (min, max) = self.latency;
        let latency = if max > min {
            rng.gen_range(min..=max)
        } else {
            min
        };
        let draw = rng.gen_range(0.0..1.0);
        let reference: String = (&mut *rng)
            .sample_iter(&Alphanumeric)
            .take(12)
            .map(|b| (b as char).to_ascii_uppercase())
            .collect();
        (latency, draw, reference)
    }
}

impl Default for SimulatedUpiGateway {
    fn default() -> Self {
        Self::new(GatewayConfig::default())
    }
}

#[async_trait]
impl StatusChecker for SimulatedUpiGateway {
    async fn check(&self, request: &VerificationRequest) -> Result<VerificationResponse> {
        let (latency, draw, reference) = self.roll();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        let status = match self.mode {
            SimulationMode::Completed => VerificationStatus::Completed,
            SimulationMode::Pending => VerificationStatus::Pending,
            SimulationMode::Failed => VerificationStatus::Failed,
            SimulationMode::Unreachable => {
                return Err(ShopError::GatewayError(
                    "Network error - please check your connection".to_string(),
                ));
            }
            SimulationMode::Random if draw < 0.7 => VerificationStatus::Completed,
            SimulationMode::Random if draw < 0.9 => VerificationStatus::Pending,
            SimulationMode::Random => VerificationStatus::Failed,
        };

        tracing::debug!(
            transaction_id = %request.transaction_id,
            %status,
            latency_ms = latency.as_millis() as u64,
            "Simulated UPI status check"
        );

        let response = VerificationResponse::for_request(request, status);
        Ok(match status {
            VerificationStatus::Completed => response.with_reference(format!("UPI_{reference}")),
            VerificationStatus::Failed => response.with_error(DECLINED_MESSAGE),
            VerificationStatus::Pending => response,
        })
    }
}
