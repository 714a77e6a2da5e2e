//! Async client for the Lendwise backend.
//!
//! This crate wires the pure logic in `lendwise-core` to the network:
//! - Credential store and the shared session context
//! - Session gateway with bearer tokens and one-shot refresh on 401
//! - Auth, eligibility and loan services

pub mod auth;
pub mod eligibility;
mod endpoints;
pub mod error;
pub mod gateway;
pub mod loans;
pub mod request;
pub mod session;
pub mod store;

use std::sync::Arc;

use lendwise_shared::{ApiResult, AppConfig};
use tracing::debug;

pub use auth::AuthService;
pub use eligibility::EligibilityGate;
pub use error::ClientError;
pub use gateway::{ApiSuccess, SessionGateway};
pub use lendwise_core::eligibility::{CreditEligibility, EligibilityState, EligibleApplicant};
pub use lendwise_core::loan::{Loan, LoanApplication, LoanSummary, LoanType};
pub use lendwise_shared::{ApiError, ErrorKind, Session, UserProfile, UserType};
pub use loans::{LoanService, PaymentReceipt};
pub use request::ApiRequest;
pub use session::SessionContext;
pub use store::{CredentialStore, FileCredentialStore, MemoryCredentialStore, StoreError};

/// Entry point bundling every service over one shared session.
#[derive(Debug)]
pub struct LendwiseClient {
    gateway: Arc<SessionGateway>,
    auth: AuthService,
    loans: LoanService,
    eligibility: EligibilityGate,
}

impl LendwiseClient {
    /// Builds a client persisting credentials to `storage.credentials_path`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, ClientError> {
        let store = Arc::new(FileCredentialStore::new(&config.storage.credentials_path));
        Self::with_store(config, store)
    }

    /// Builds a client over an explicit credential store.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the HTTP client cannot be built.
    pub fn with_store(
        config: &AppConfig,
        store: Arc<dyn CredentialStore>,
    ) -> Result<Self, ClientError> {
        let session = Arc::new(SessionContext::new(store));
        let gateway = Arc::new(SessionGateway::new(
            config.api.base_url.clone(),
            &config.api.user_agent,
            session,
        )?);
        debug!(base_url = %config.api.base_url, "Lendwise client ready");

        Ok(Self {
            auth: AuthService::new(Arc::clone(&gateway)),
            loans: LoanService::new(Arc::clone(&gateway)),
            eligibility: EligibilityGate::with_threshold(
                Arc::clone(&gateway),
                config.eligibility.min_credit_score,
            ),
            gateway,
        })
    }

    /// Shared session context.
    #[must_use]
    pub fn session(&self) -> &Arc<SessionContext> {
        self.gateway.session()
    }

    /// Session gateway, for calls not covered by a service.
    #[must_use]
    pub fn gateway(&self) -> &Arc<SessionGateway> {
        &self.gateway
    }

    /// Authentication flows.
    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    /// Loan operations.
    #[must_use]
    pub fn loans(&self) -> &LoanService {
        &self.loans
    }

    /// Eligibility gate.
    #[must_use]
    pub fn eligibility(&self) -> &EligibilityGate {
        &self.eligibility
    }

    /// Runs the eligibility gate from the start.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the KYC or credit score fetch fails.
    pub async fn check_eligibility(&self) -> ApiResult<EligibilityState> {
        self.eligibility.check().await
    }
}
