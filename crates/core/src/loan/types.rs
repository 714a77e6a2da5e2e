//! Loan data types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::compat::{LoanDto, LoanTypeDto};

/// Loan lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    /// Application submitted, awaiting review.
    Pending,
    /// Approved but not yet disbursed.
    Approved,
    /// Disbursed and being repaid.
    Active,
    /// Repayment is behind schedule.
    Overdue,
    /// Fully repaid.
    Paid,
    /// Application declined.
    Rejected,
}

impl LoanStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Active => "active",
            Self::Overdue => "overdue",
            Self::Paid => "paid",
            Self::Rejected => "rejected",
        }
    }

    /// Returns true if installments are currently being collected.
    #[must_use]
    pub const fn is_repaying(&self) -> bool {
        matches!(self, Self::Active | Self::Overdue)
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LoanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" | "submitted" | "under_review" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "active" | "disbursed" => Ok(Self::Active),
            "overdue" | "defaulted" => Ok(Self::Overdue),
            "paid" | "completed" | "closed" => Ok(Self::Paid),
            "rejected" | "declined" => Ok(Self::Rejected),
            _ => Err(format!("Unknown loan status: {s}")),
        }
    }
}

/// A loan record as read from the backend.
///
/// Deserialization goes through [`LoanDto`] so every backend field variant is
/// normalized in one place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "LoanDto")]
pub struct Loan {
    /// Loan ID.
    pub id: String,
    /// Amount borrowed. Zero when the backend omitted it.
    pub principal: Decimal,
    /// Annual interest rate in percent.
    pub rate: Decimal,
    /// Term in months.
    pub term: u32,
    /// Balance still owed, when reported.
    pub outstanding_balance: Option<Decimal>,
    /// Total repayable amount.
    pub amount_due: Decimal,
    /// Backend-computed progress in percent, when reported.
    pub payment_progress: Option<Decimal>,
    /// Lifecycle status.
    pub status: LoanStatus,
    /// Creation timestamp.
    pub created_at: Option<DateTime<Utc>>,
    /// Next scheduled installment.
    pub next_payment_date: Option<DateTime<Utc>>,
}

/// Figures a loan view renders, derived from one [`Loan`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanSummary {
    /// Percent of principal repaid, 0..=100.
    pub progress: u8,
    /// Amount currently owed.
    pub current_amount_due: Decimal,
    /// Next scheduled installment.
    pub next_payment_date: Option<DateTime<Utc>>,
    /// Lifecycle status.
    pub status: LoanStatus,
}

/// A loan product from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "LoanTypeDto")]
pub struct LoanType {
    /// Loan type ID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Annual interest rate in percent.
    pub interest_rate: Decimal,
    /// Smallest amount that may be requested.
    pub min_amount: Option<Decimal>,
    /// Largest amount that may be requested.
    pub max_amount: Option<Decimal>,
    /// Shortest term in months.
    pub min_term: Option<u32>,
    /// Longest term in months.
    pub max_term: Option<u32>,
    /// Optional description.
    pub description: Option<String>,
}

impl LoanType {
    /// Returns true if `amount` and `term` fall within this product's limits.
    #[must_use]
    pub fn accepts(&self, amount: Decimal, term: u32) -> bool {
        let amount_ok = self.min_amount.is_none_or(|min| amount >= min)
            && self.max_amount.is_none_or(|max| amount <= max);
        let term_ok = self.min_term.is_none_or(|min| term >= min)
            && self.max_term.is_none_or(|max| term <= max);
        amount_ok && term_ok && amount > Decimal::ZERO && term > 0
    }
}

/// Loan application payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanApplication {
    /// Selected loan type.
    pub loan_type_id: String,
    /// Requested principal.
    pub amount: Decimal,
    /// Requested term in months.
    pub term: u32,
    /// Stated purpose.
    pub purpose: String,
}
