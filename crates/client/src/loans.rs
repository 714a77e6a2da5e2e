//! Loan listing, catalog, application and repayment calls.

use std::sync::Arc;

use lendwise_core::eligibility::EligibleApplicant;
use lendwise_core::loan::{Loan, LoanApplication, LoanType};
use lendwise_shared::{ApiError, ApiResult};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::endpoints;
use crate::gateway::SessionGateway;
use crate::request::ApiRequest;

/// List endpoints return either a bare array or an object wrapping one.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListPayload<T> {
    Bare(Vec<T>),
    Loans { loans: Vec<T> },
    LoanTypes {
        #[serde(alias = "types")]
        #[serde(rename = "loanTypes")]
        loan_types: Vec<T>,
    },
}

impl<T> ListPayload<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Self::Bare(items) | Self::Loans { loans: items } | Self::LoanTypes { loan_types: items } => {
                items
            }
        }
    }
}

/// Single-record endpoints return either the loan or `{ loan }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum LoanPayload {
    Wrapped { loan: Loan },
    Bare(Loan),
}

impl From<LoanPayload> for Loan {
    fn from(payload: LoanPayload) -> Self {
        match payload {
            LoanPayload::Wrapped { loan } | LoanPayload::Bare(loan) => loan,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PaymentRequest<'a> {
    loan_id: &'a str,
    amount: Decimal,
}

/// Backend acknowledgement of a repayment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    /// Payment reference.
    #[serde(default, alias = "id", alias = "_id", alias = "transactionId")]
    pub reference: Option<String>,
    /// Loan the payment was applied to.
    #[serde(default)]
    pub loan_id: Option<String>,
    /// Amount received.
    #[serde(default)]
    pub amount: Option<Decimal>,
    /// Payment status as reported by the backend.
    #[serde(default)]
    pub status: Option<String>,
}

/// Borrower-facing loan operations.
#[derive(Debug, Clone)]
pub struct LoanService {
    gateway: Arc<SessionGateway>,
}

impl LoanService {
    /// Creates a new loan service.
    #[must_use]
    pub fn new(gateway: Arc<SessionGateway>) -> Self {
        Self { gateway }
    }

    /// Lists the logged-in borrower's loans.
    ///
    /// Records that cannot be read are logged and left out.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on request failure.
    pub async fn my_loans(&self) -> ApiResult<Vec<Loan>> {
        let request = ApiRequest::get(endpoints::MY_LOANS).authorized();
        let loans: ListPayload<Value> = self.gateway.fetch(&request).await?;
        Ok(parse_records(loans.into_vec(), "loan"))
    }

    /// Fetches one loan.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on request failure.
    pub async fn loan(&self, id: &str) -> ApiResult<Loan> {
        let request = ApiRequest::get(endpoints::loan(id)).authorized();
        Ok(self.gateway.fetch::<LoanPayload>(&request).await?.into())
    }

    /// Fetches the loan product catalog. Requires a passed eligibility check.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on request failure.
    pub async fn loan_types(&self, _applicant: &EligibleApplicant) -> ApiResult<Vec<LoanType>> {
        let request = ApiRequest::get(endpoints::LOAN_TYPES).authorized();
        let types: ListPayload<Value> = self.gateway.fetch(&request).await?;
        Ok(parse_records(types.into_vec(), "loan type"))
    }

    /// Submits a loan application for `loan_type`. Requires a passed
    /// eligibility check.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an incomplete application or one outside
    /// the product's amount and term limits, otherwise `ApiError` on request
    /// failure.
    pub async fn apply(
        &self,
        applicant: &EligibleApplicant,
        loan_type: &LoanType,
        application: &LoanApplication,
    ) -> ApiResult<Loan> {
        validate_application(application)?;
        validate_against_product(loan_type, application)?;

        let request = ApiRequest::post(endpoints::APPLY)
            .authorized()
            .json(application)?;
        let loan: Loan = self.gateway.fetch::<LoanPayload>(&request).await?.into();

        info!(
            loan_id = %loan.id,
            amount = %application.amount,
            term = application.term,
            score = %applicant.score(),
            "Loan application submitted"
        );
        Ok(loan)
    }

    /// Pays `amount` towards `loan_id`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a non-positive amount, otherwise
    /// `ApiError` on request failure.
    pub async fn make_payment(&self, loan_id: &str, amount: Decimal) -> ApiResult<PaymentReceipt> {
        if amount <= Decimal::ZERO {
            return Err(ApiError::validation("amount", "Amount must be greater than zero"));
        }

        let request = ApiRequest::post(endpoints::PAYMENTS)
            .authorized()
            .json(&PaymentRequest { loan_id, amount })?;
        let receipt: PaymentReceipt = self.gateway.fetch(&request).await?;

        info!(loan_id, amount = %amount, "Payment submitted");
        Ok(receipt)
    }
}

fn validate_application(application: &LoanApplication) -> ApiResult<()> {
    if application.loan_type_id.trim().is_empty() {
        return Err(ApiError::validation("loanTypeId", "Select a loan type"));
    }
    if application.amount <= Decimal::ZERO {
        return Err(ApiError::validation("amount", "Amount must be greater than zero"));
    }
    if application.term == 0 {
        return Err(ApiError::validation("term", "Term must be at least one month"));
    }
    if application.purpose.trim().is_empty() {
        return Err(ApiError::validation("purpose", "Purpose is required"));
    }
    Ok(())
}

fn validate_against_product(loan_type: &LoanType, application: &LoanApplication) -> ApiResult<()> {
    if loan_type.id != application.loan_type_id {
        return Err(ApiError::validation(
            "loanTypeId",
            "Application does not match the selected loan type",
        ));
    }
    let amount = application.amount;
    if loan_type.min_amount.is_some_and(|min| amount < min)
        || loan_type.max_amount.is_some_and(|max| amount > max)
    {
        return Err(ApiError::validation(
            "amount",
            format!("Amount is outside the limits for {}", loan_type.name),
        ));
    }
    if !loan_type.accepts(amount, application.term) {
        return Err(ApiError::validation(
            "term",
            format!("Term is outside the limits for {}", loan_type.name),
        ));
    }
    Ok(())
}

/// Decodes each record on its own so one unreadable entry does not hide the
/// rest of the list.
fn parse_records<T: DeserializeOwned>(records: Vec<Value>, kind: &str) -> Vec<T> {
    records
        .into_iter()
        .filter_map(|record| match serde_json::from_value(record) {
            Ok(parsed) => Some(parsed),
            Err(error) => {
                warn!(kind, error = %error, "Skipping unreadable record");
                None
            }
        })
        .collect()
}
