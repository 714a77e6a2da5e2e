//! Runs the KYC → credit score gate against the backend.

use std::sync::{Arc, PoisonError, RwLock};

use lendwise_core::eligibility::{
    CreditEligibility, CreditScore, DEFAULT_MIN_CREDIT_SCORE, EligibilityError, EligibilityState,
    KycStatus,
};
use lendwise_shared::{ApiError, ApiResult};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::endpoints;
use crate::gateway::SessionGateway;
use crate::request::ApiRequest;

/// Publishes every [`EligibilityState`] a check passes through.
#[derive(Debug)]
pub struct EligibilityGate {
    gateway: Arc<SessionGateway>,
    threshold: u32,
    sender: watch::Sender<EligibilityState>,
    report: RwLock<Option<CreditEligibility>>,
}

impl EligibilityGate {
    /// Creates a gate with the default threshold.
    #[must_use]
    pub fn new(gateway: Arc<SessionGateway>) -> Self {
        Self::with_threshold(gateway, DEFAULT_MIN_CREDIT_SCORE)
    }

    /// Creates a gate requiring at least `threshold` points.
    #[must_use]
    pub fn with_threshold(gateway: Arc<SessionGateway>, threshold: u32) -> Self {
        let (sender, _) = watch::channel(EligibilityState::Checking);
        Self {
            gateway,
            threshold,
            sender,
            report: RwLock::new(None),
        }
    }

    /// Minimum passing score.
    #[must_use]
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Latest published state.
    #[must_use]
    pub fn state(&self) -> EligibilityState {
        self.sender.borrow().clone()
    }

    /// KYC and credit details from the latest run that reached the score
    /// stage; `None` before that or after a run that stopped earlier.
    #[must_use]
    pub fn credit_eligibility(&self) -> Option<CreditEligibility> {
        self.report
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Subscribes to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<EligibilityState> {
        self.sender.subscribe()
    }

    /// Runs the gate from `Checking` to a terminal state.
    ///
    /// The credit score is fetched only after KYC is verified. Fetches are not
    /// retried; a failure leaves the last published state in place.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if either fetch fails.
    pub async fn check(&self) -> ApiResult<EligibilityState> {
        self.set_report(None);
        let state = self.publish(EligibilityState::Checking);

        let kyc: KycStatus = self
            .gateway
            .fetch(&ApiRequest::get(endpoints::KYC_STATUS).authorized())
            .await?;
        let state = self.publish(state.on_kyc_status(kyc.verified).map_err(transition_error)?);
        if state.is_terminal() {
            info!(state = %state, "Eligibility check finished");
            return Ok(state);
        }

        debug!("KYC verified, fetching credit score");
        let score: CreditScore = self
            .gateway
            .fetch(&ApiRequest::get(endpoints::CREDIT_SCORE).authorized())
            .await?;
        let state = self.publish(
            state
                .on_credit_score(score.credit_score, score.rating, self.threshold)
                .map_err(transition_error)?,
        );
        self.set_report(Some(CreditEligibility::new(kyc, score.clone())));

        info!(
            state = %state,
            score = %score.credit_score,
            threshold = self.threshold,
            "Eligibility check finished"
        );
        Ok(state)
    }

    fn set_report(&self, report: Option<CreditEligibility>) {
        *self.report.write().unwrap_or_else(PoisonError::into_inner) = report;
    }

    fn publish(&self, state: EligibilityState) -> EligibilityState {
        self.sender.send_replace(state.clone());
        state
    }
}

fn transition_error(error: EligibilityError) -> ApiError {
    ApiError::server(error.to_string())
}
