#![allow(dead_code)]

use async_trait::async_trait;
use rust_decimal_macros::dec;
use shopease::domain::money::Amount;
use shopease::domain::payment::{
    BillingAddress, VerificationRequest, VerificationResponse, VerificationStatus,
};
use shopease::domain::ports::StatusChecker;
use shopease::error::{Result, ShopError};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// One scripted answer from the fake gateway.
#[derive(Debug, Clone)]
pub enum Step {
    Pending,
    Completed,
    Failed(Option<&'static str>),
    Error,
}

/// A status checker that replays a fixed script.
///
/// Once the script runs out the last step repeats.
pub struct ScriptedChecker {
    script: Mutex<VecDeque<Step>>,
    last: Mutex<Step>,
    calls: AtomicUsize,
}

impl ScriptedChecker {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        let script: VecDeque<Step> = steps.into_iter().collect();
        let last = script.back().cloned().unwrap_or(Step::Pending);
        Self {
            script: Mutex::new(script),
            last: Mutex::new(last),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn always(step: Step) -> Self {
        Self::new([step])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatusChecker for ScriptedChecker {
    async fn check(&self, request: &VerificationRequest) -> Result<VerificationResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let step = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.last.lock().unwrap().clone());

        match step {
            Step::Pending => Ok(VerificationResponse::for_request(
                request,
                VerificationStatus::Pending,
            )),
            Step::Completed => Ok(VerificationResponse::for_request(
                request,
                VerificationStatus::Completed,
            )
            .with_reference("UPI_TESTREF00001")),
            Step::Failed(message) => {
                let response =
                    VerificationResponse::for_request(request, VerificationStatus::Failed);
                Ok(match message {
                    Some(message) => response.with_error(message),
                    None => response,
                })
            }
            Step::Error => Err(ShopError::GatewayError("connection reset".to_string())),
        }
    }
}

pub fn request() -> VerificationRequest {
    VerificationRequest {
        transaction_id: "TXN_1700000000000_abc123".to_string(),
        amount: Amount::new(dec!(2348.20)).unwrap(),
        merchant_id: "merchant@paytm".to_string(),
        merchant_name: "ShopEase".to_string(),
    }
}

pub fn address() -> BillingAddress {
    BillingAddress {
        full_name: "Asha Rao".to_string(),
        phone: "9876543210".to_string(),
        address: "12 MG Road".to_string(),
        city: "Bengaluru".to_string(),
        state: "Karnataka".to_string(),
        zip_code: "560001".to_string(),
    }
}
