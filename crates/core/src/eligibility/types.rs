//! Eligibility domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Minimum credit score (inclusive) required to apply for a loan.
pub const DEFAULT_MIN_CREDIT_SCORE: u32 = 50;

/// Credit rating band reported alongside the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditRating {
    /// Top band.
    #[serde(alias = "Excellent", alias = "EXCELLENT")]
    Excellent,
    /// Above average.
    #[serde(alias = "Good", alias = "GOOD")]
    Good,
    /// Average.
    #[serde(alias = "Fair", alias = "FAIR")]
    Fair,
    /// Below average.
    #[serde(alias = "Poor", alias = "POOR")]
    Poor,
    /// Bottom band.
    #[serde(alias = "Very Poor", alias = "VERY_POOR", alias = "veryPoor")]
    VeryPoor,
    /// No rating available or a band this client does not know.
    #[serde(other)]
    Unrated,
}

/// KYC verification status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KycStatus {
    /// Bank Verification Number on file.
    #[serde(default)]
    pub bvn: Option<String>,
    /// National Identification Number on file.
    #[serde(default)]
    pub nin: Option<String>,
    /// Whether identity verification has passed.
    #[serde(alias = "isVerified", alias = "kycVerified")]
    pub verified: bool,
}

/// Credit score report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditScore {
    /// Numeric score.
    #[serde(alias = "score")]
    pub credit_score: Decimal,
    /// Rating band.
    #[serde(default = "unrated")]
    pub rating: CreditRating,
}

fn unrated() -> CreditRating {
    CreditRating::Unrated
}

/// Combined KYC and credit view of a borrower. Transient, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditEligibility {
    /// Bank Verification Number.
    pub bvn: Option<String>,
    /// National Identification Number.
    pub nin: Option<String>,
    /// Whether KYC passed.
    pub verified: bool,
    /// Numeric score.
    pub credit_score: Decimal,
    /// Rating band.
    pub rating: CreditRating,
}

impl CreditEligibility {
    /// Combines a KYC status with a credit score report.
    #[must_use]
    pub fn new(kyc: KycStatus, score: CreditScore) -> Self {
        Self {
            bvn: kyc.bvn,
            nin: kyc.nin,
            verified: kyc.verified,
            credit_score: score.credit_score,
            rating: score.rating,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_credit_eligibility_combines_both_reports() {
        let kyc: KycStatus =
            serde_json::from_value(json!({ "bvn": "22222222222", "kycVerified": true })).unwrap();
        let score: CreditScore =
            serde_json::from_value(json!({ "score": 64, "rating": "FAIR" })).unwrap();

        let combined = CreditEligibility::new(kyc, score);

        assert_eq!(combined.bvn.as_deref(), Some("22222222222"));
        assert_eq!(combined.nin, None);
        assert!(combined.verified);
        assert_eq!(combined.credit_score, dec!(64));
        assert_eq!(combined.rating, CreditRating::Fair);
        assert_eq!(
            serde_json::to_value(&combined).unwrap()["creditScore"],
            json!("64")
        );
    }

    #[test]
    fn test_unknown_rating_is_unrated() {
        let score: CreditScore =
            serde_json::from_value(json!({ "creditScore": 10, "rating": "Platinum" })).unwrap();
        assert_eq!(score.rating, CreditRating::Unrated);

        let missing: CreditScore = serde_json::from_value(json!({ "creditScore": 10 })).unwrap();
        assert_eq!(missing.rating, CreditRating::Unrated);
    }
}
