//! KYC and credit-score eligibility gate.

pub mod error;
pub mod state;
pub mod types;

pub use error::EligibilityError;
pub use state::{EligibilityState, EligibleApplicant};
pub use types::{CreditEligibility, CreditRating, CreditScore, DEFAULT_MIN_CREDIT_SCORE, KycStatus};
