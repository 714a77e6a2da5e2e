//! Field-compatibility mapping for loosely-typed backend records.
//!
//! Different backend endpoints spell the same field differently (`interest` vs
//! `interestRate`, `_id` vs `id`, `amount` vs `principal`). The DTOs below accept
//! every known spelling and the `From`/`TryFrom` impls map them onto the
//! canonical domain types, so no call site needs its own fallbacks.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use super::types::{Loan, LoanStatus, LoanType};

/// An identifier the backend sends either as a string or a number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    /// String ID (document stores).
    Text(String),
    /// Numeric ID (relational stores).
    Number(i64),
}

impl From<WireId> for String {
    fn from(id: WireId) -> Self {
        match id {
            WireId::Text(text) => text,
            WireId::Number(number) => number.to_string(),
        }
    }
}

/// Raw loan record with every known field spelling.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanDto {
    #[serde(alias = "_id", alias = "loanId")]
    id: Option<WireId>,
    #[serde(alias = "amount", alias = "loanAmount")]
    principal: Option<Decimal>,
    #[serde(alias = "interestRate", alias = "interest")]
    rate: Option<Decimal>,
    #[serde(alias = "duration", alias = "tenure", alias = "termMonths")]
    term: Option<u32>,
    #[serde(alias = "balance", alias = "remainingBalance")]
    outstanding_balance: Option<Decimal>,
    #[serde(alias = "totalAmountDue", alias = "totalRepayment")]
    amount_due: Option<Decimal>,
    #[serde(alias = "progress")]
    payment_progress: Option<Decimal>,
    status: String,
    #[serde(alias = "created_at", alias = "dateCreated")]
    created_at: Option<DateTime<Utc>>,
    #[serde(alias = "nextDueDate", alias = "next_payment_date")]
    next_payment_date: Option<DateTime<Utc>>,
}

impl TryFrom<LoanDto> for Loan {
    type Error = String;

    fn try_from(dto: LoanDto) -> Result<Self, Self::Error> {
        Ok(Self {
            id: dto.id.map(String::from).unwrap_or_default(),
            principal: dto.principal.unwrap_or_default(),
            rate: dto.rate.unwrap_or_default(),
            term: dto.term.unwrap_or_default(),
            outstanding_balance: dto.outstanding_balance,
            amount_due: dto.amount_due.unwrap_or_default(),
            payment_progress: dto.payment_progress,
            status: dto.status.parse::<LoanStatus>()?,
            created_at: dto.created_at,
            next_payment_date: dto.next_payment_date,
        })
    }
}

/// Raw loan-type record with every known field spelling.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanTypeDto {
    #[serde(alias = "_id")]
    id: Option<WireId>,
    #[serde(alias = "title")]
    name: String,
    #[serde(alias = "interest", alias = "rate")]
    interest_rate: Option<Decimal>,
    #[serde(alias = "minimumAmount")]
    min_amount: Option<Decimal>,
    #[serde(alias = "maximumAmount")]
    max_amount: Option<Decimal>,
    #[serde(alias = "minDuration", alias = "minTenure")]
    min_term: Option<u32>,
    #[serde(alias = "maxDuration", alias = "maxTenure")]
    max_term: Option<u32>,
    description: Option<String>,
}

impl From<LoanTypeDto> for LoanType {
    fn from(dto: LoanTypeDto) -> Self {
        Self {
            id: dto.id.map(String::from).unwrap_or_default(),
            name: dto.name,
            interest_rate: dto.interest_rate.unwrap_or_default(),
            min_amount: dto.min_amount,
            max_amount: dto.max_amount,
            min_term: dto.min_term,
            max_term: dto.max_term,
            description: dto.description,
        }
    }
}
