//! Two-stage eligibility state machine.
//!
//! The valid transitions are:
//! - Checking → Unverified (KYC not verified, terminal)
//! - Checking → VerifiedPendingScore (KYC verified)
//! - VerifiedPendingScore → Eligible (score ≥ threshold, terminal)
//! - VerifiedPendingScore → InsufficientScore (score < threshold, terminal)
//!
//! Re-entering the gate always starts again from `Checking`.

use rust_decimal::Decimal;
use serde::Serialize;

use super::error::EligibilityError;
use super::types::CreditRating;

/// Where a borrower stands in the eligibility check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum EligibilityState {
    /// KYC status is being fetched.
    Checking,
    /// KYC is not verified; the credit score is never fetched.
    Unverified,
    /// KYC passed; the credit score is being fetched.
    VerifiedPendingScore,
    /// Score met the threshold; loan applications are allowed.
    Eligible {
        /// Credit score.
        score: Decimal,
        /// Rating band.
        rating: CreditRating,
    },
    /// Score fell below the threshold.
    InsufficientScore {
        /// Credit score.
        score: Decimal,
        /// Threshold that was not met.
        threshold: u32,
    },
}

impl EligibilityState {
    /// Returns the state name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Checking => "checking",
            Self::Unverified => "unverified",
            Self::VerifiedPendingScore => "verified_pending_score",
            Self::Eligible { .. } => "eligible",
            Self::InsufficientScore { .. } => "insufficient_score",
        }
    }

    /// Returns true once no further transition is possible.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Unverified | Self::Eligible { .. } | Self::InsufficientScore { .. }
        )
    }

    /// Applies the KYC result.
    ///
    /// # Errors
    ///
    /// Returns `EligibilityError::InvalidTransition` unless in `Checking`.
    pub fn on_kyc_status(&self, verified: bool) -> Result<Self, EligibilityError> {
        match self {
            Self::Checking if verified => Ok(Self::VerifiedPendingScore),
            Self::Checking => Ok(Self::Unverified),
            _ => Err(EligibilityError::InvalidTransition {
                from: self.as_str(),
                event: "kyc_status",
            }),
        }
    }

    /// Applies the credit score, comparing it inclusively against `threshold`.
    ///
    /// # Errors
    ///
    /// Returns `EligibilityError::InvalidTransition` unless in `VerifiedPendingScore`.
    pub fn on_credit_score(
        &self,
        score: Decimal,
        rating: CreditRating,
        threshold: u32,
    ) -> Result<Self, EligibilityError> {
        match self {
            Self::VerifiedPendingScore if score >= Decimal::from(threshold) => {
                Ok(Self::Eligible { score, rating })
            }
            Self::VerifiedPendingScore => Ok(Self::InsufficientScore { score, threshold }),
            _ => Err(EligibilityError::InvalidTransition {
                from: self.as_str(),
                event: "credit_score",
            }),
        }
    }

    /// Returns the applicant proof when, and only when, the state is `Eligible`.
    #[must_use]
    pub fn eligible_applicant(&self) -> Option<EligibleApplicant> {
        match self {
            Self::Eligible { score, rating } => Some(EligibleApplicant {
                score: *score,
                rating: *rating,
            }),
            _ => None,
        }
    }
}

impl std::fmt::Display for EligibilityState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Marker that a state was `Eligible`, required by the loan catalog and
/// application calls.
///
/// The fields are private, so the only way to obtain one is
/// [`EligibilityState::eligible_applicant`]. That guards against passing a
/// non-eligible state by mistake; it is not tamper-proof, since
/// `EligibilityState::Eligible` itself can be built by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EligibleApplicant {
    score: Decimal,
    rating: CreditRating,
}

impl EligibleApplicant {
    /// Credit score that passed the gate.
    #[must_use]
    pub const fn score(&self) -> Decimal {
        self.score
    }

    /// Rating band that passed the gate.
    #[must_use]
    pub const fn rating(&self) -> CreditRating {
        self.rating
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eligibility::types::DEFAULT_MIN_CREDIT_SCORE;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_unverified_is_terminal() {
        let state = EligibilityState::Checking.on_kyc_status(false).unwrap();

        assert_eq!(state, EligibilityState::Unverified);
        assert!(state.is_terminal());
        assert!(state.eligible_applicant().is_none());
        assert!(matches!(
            state.on_credit_score(dec!(90), CreditRating::Good, DEFAULT_MIN_CREDIT_SCORE),
            Err(EligibilityError::InvalidTransition { from: "unverified", .. })
        ));
    }

    #[test]
    fn test_verified_waits_for_score() {
        let state = EligibilityState::Checking.on_kyc_status(true).unwrap();

        assert_eq!(state, EligibilityState::VerifiedPendingScore);
        assert!(!state.is_terminal());
        assert!(state.eligible_applicant().is_none());
    }

    #[rstest]
    #[case(dec!(49), false)]
    #[case(dec!(49.99), false)]
    #[case(dec!(50), true)]
    #[case(dec!(50.0), true)]
    #[case(dec!(88), true)]
    fn test_threshold_is_inclusive(#[case] score: Decimal, #[case] eligible: bool) {
        let state = EligibilityState::VerifiedPendingScore
            .on_credit_score(score, CreditRating::Fair, DEFAULT_MIN_CREDIT_SCORE)
            .unwrap();

        assert!(state.is_terminal());
        assert_eq!(state.eligible_applicant().is_some(), eligible);
        if !eligible {
            assert_eq!(
                state,
                EligibilityState::InsufficientScore {
                    score,
                    threshold: DEFAULT_MIN_CREDIT_SCORE
                }
            );
        }
    }

    #[test]
    fn test_applicant_carries_score() {
        let state = EligibilityState::Eligible {
            score: dec!(72),
            rating: CreditRating::Good,
        };
        let applicant = state.eligible_applicant().unwrap();

        assert_eq!(applicant.score(), dec!(72));
        assert_eq!(applicant.rating(), CreditRating::Good);
    }

    #[test]
    fn test_checking_rejects_score_before_kyc() {
        assert!(
            EligibilityState::Checking
                .on_credit_score(dec!(70), CreditRating::Good, 50)
                .is_err()
        );
    }

    #[test]
    fn test_terminal_states_reject_kyc() {
        let eligible = EligibilityState::Eligible {
            score: dec!(60),
            rating: CreditRating::Fair,
        };
        assert!(eligible.on_kyc_status(true).is_err());
        assert!(EligibilityState::Unverified.on_kyc_status(true).is_err());
    }

    #[test]
    fn test_serializes_tagged() {
        let value = serde_json::to_value(EligibilityState::InsufficientScore {
            score: dec!(49),
            threshold: 50,
        })
        .unwrap();
        assert_eq!(value["state"], "insufficientScore");
        assert_eq!(value["threshold"], 50);
    }
}
