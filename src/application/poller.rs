use crate::config::PollPolicy;
use crate::domain::payment::{VerificationRequest, VerificationResponse, VerificationStatus};
use crate::domain::ports::StatusCheckerRef;
use crate::error::{ShopError, VerificationError};

/// Message used when the gateway rejects a payment without saying why.
pub const DEFAULT_REJECTION: &str = "Payment failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Polling,
    Succeeded,
    Failed,
    TimedOut,
}

/// What the poller should do after a check has been recorded.
#[derive(Debug)]
pub enum PollStep {
    /// Wait for the interval and check again.
    Retry,
    /// The session reached a terminal state.
    Done(Result<VerificationResponse, VerificationError>),
}

/// Attempt accounting and state transitions for one polling session.
///
/// Holds no I/O; [`PaymentPoller`] feeds it the outcome of every check.
#[derive(Debug)]
pub struct PollSession {
    transaction_id: String,
    max_attempts: u32,
    attempts: u32,
    state: PollState,
}

impl PollSession {
    pub fn new(request: &VerificationRequest, policy: &PollPolicy) -> Self {
        Self {
            transaction_id: request.transaction_id.clone(),
            max_attempts: policy.max_attempts(),
            attempts: 0,
            state: PollState::Polling,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    /// Records the outcome of one status check and moves the session on.
    pub fn record(&mut self, outcome: Result<VerificationResponse, ShopError>) -> PollStep {
        debug_assert_eq!(self.state, PollState::Polling, "session already terminal");
        self.attempts += 1;
        let budget_spent = self.attempts >= self.max_attempts;

        match outcome {
            Ok(response) => match response.status {
                VerificationStatus::Completed => {
                    self.state = PollState::Succeeded;
                    PollStep::Done(Ok(response))
                }
                VerificationStatus::Failed => {
                    self.state = PollState::Failed;
                    PollStep::Done(Err(VerificationError::Rejected {
                        transaction_id: self.transaction_id.clone(),
                        message: response
                            .error_message
                            .unwrap_or_else(|| DEFAULT_REJECTION.to_string()),
                    }))
                }
                VerificationStatus::Pending if budget_spent => {
                    self.state = PollState::TimedOut;
                    PollStep::Done(Err(VerificationError::Timeout {
                        transaction_id: self.transaction_id.clone(),
                        attempts: self.attempts,
                    }))
                }
                VerificationStatus::Pending => PollStep::Retry,
            },
            Err(source) if budget_spent => {
                self.state = PollState::Failed;
                PollStep::Done(Err(VerificationError::Unreachable {
                    transaction_id: self.transaction_id.clone(),
                    attempts: self.attempts,
                    source: Box::new(source),
                }))
            }
            Err(_) => PollStep::Retry,
        }
    }
}

/// Re-checks a payment until the gateway settles it or the budget runs out.
///
/// `completed` returns at once, `failed` is never retried, `pending` and
/// check errors are retried after the policy interval. No wait follows the
/// final attempt. Dropping the returned future abandons the session.
pub struct PaymentPoller {
    checker: StatusCheckerRef,
    policy: PollPolicy,
}

impl PaymentPoller {
    pub fn new(checker: StatusCheckerRef, policy: PollPolicy) -> Self {
        Self { checker, policy }
    }

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    pub async fn poll(
        &self,
        request: &VerificationRequest,
    ) -> Result<VerificationResponse, VerificationError> {
        let mut session = PollSession::new(request, &self.policy);

        loop {
            let outcome = self.checker.check(request).await;
            if let Err(e) = &outcome {
                tracing::warn!(
                    transaction_id = %request.transaction_id,
                    attempt = session.attempts() + 1,
                    error = %e,
                    "Payment status check failed"
                );
            }

            match session.record(outcome) {
                PollStep::Done(result) => {
                    match &result {
                        Ok(response) => tracing::info!(
                            transaction_id = %request.transaction_id,
                            attempts = session.attempts(),
                            reference_id = response.reference_id.as_deref().unwrap_or_default(),
                            "Payment verified"
                        ),
                        Err(e) => tracing::warn!(
                            transaction_id = %request.transaction_id,
                            attempts = session.attempts(),
                            error = %e,
                            "Payment verification ended without success"
                        ),
                    }
                    return result;
                }
                PollStep::Retry => {
                    tracing::debug!(
                        transaction_id = %request.transaction_id,
                        attempt = session.attempts(),
                        max_attempts = self.policy.max_attempts(),
                        "Payment still pending, checking again"
                    );
                    if !self.policy.interval().is_zero() {
                        tokio::time::sleep(self.policy.interval()).await;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::money::Amount;
    use rust_decimal_macros::dec;
    use std::time::Duration;

    fn request() -> VerificationRequest {
        VerificationRequest {
            transaction_id: "TXN_42".to_string(),
            amount: Amount::new(dec!(500)).unwrap(),
            merchant_id: "merchant@paytm".to_string(),
            merchant_name: "ShopEase".to_string(),
        }
    }

    fn response(status: VerificationStatus) -> Result<VerificationResponse, ShopError> {
        Ok(VerificationResponse::for_request(&request(), status))
    }

    fn session(max_attempts: u32) -> PollSession {
        PollSession::new(
            &request(),
            &PollPolicy::new(max_attempts, Duration::ZERO).unwrap(),
        )
    }

    #[test]
    fn test_pending_retries_until_budget() {
        let mut session = session(2);
        assert!(matches!(
            session.record(response(VerificationStatus::Pending)),
            PollStep::Retry
        ));
        assert_eq!(session.state(), PollState::Polling);

        let step = session.record(response(VerificationStatus::Pending));
        assert!(matches!(
            step,
            PollStep::Done(Err(VerificationError::Timeout { attempts: 2, .. }))
        ));
        assert_eq!(session.state(), PollState::TimedOut);
    }

    #[test]
    fn test_failed_status_is_terminal_with_default_message() {
        let mut session = session(5);
        let step = session.record(response(VerificationStatus::Failed));
        match step {
            PollStep::Done(Err(VerificationError::Rejected {
                transaction_id,
                message,
            })) => {
                assert_eq!(transaction_id, "TXN_42");
                assert_eq!(message, DEFAULT_REJECTION);
            }
            other => panic!("unexpected step: {other:?}"),
        }
        assert_eq!(session.state(), PollState::Failed);
        assert_eq!(session.attempts(), 1);
    }

    #[test]
    fn test_check_error_on_last_attempt_is_unreachable() {
        let mut session = session(2);
        let gateway_down = || Err(ShopError::GatewayError("down".to_string()));

        assert!(matches!(session.record(gateway_down()), PollStep::Retry));
        let step = session.record(gateway_down());
        assert!(matches!(
            step,
            PollStep::Done(Err(VerificationError::Unreachable { attempts: 2, .. }))
        ));
        assert_eq!(session.state(), PollState::Failed);
    }

    #[test]
    fn test_completed_after_errors_succeeds() {
        let mut session = session(3);
        assert!(matches!(
            session.record(Err(ShopError::GatewayError("blip".to_string()))),
            PollStep::Retry
        ));
        assert!(matches!(
            session.record(response(VerificationStatus::Completed)),
            PollStep::Done(Ok(_))
        ));
        assert_eq!(session.state(), PollState::Succeeded);
    }
}
