//! Current amount owed on a repaying loan.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::types::{Loan, LoanSummary};
use super::progress::calculate_loan_progress;

/// Length of one billing cycle. Calendar months are approximated as 30 days.
pub const BILLING_CYCLE_DAYS: i64 = 30;

const BILLING_CYCLE_MILLIS: i64 = BILLING_CYCLE_DAYS * 24 * 60 * 60 * 1000;

/// Returns how much the borrower should have paid by `now` but has not.
///
/// Only `active` and `overdue` loans owe anything. Installments accrue one per
/// billing cycle starting at `created_at`, capped at the term.
#[must_use]
pub fn calculate_current_amount_due(loan: &Loan, now: DateTime<Utc>) -> Decimal {
    if !loan.status.is_repaying() {
        return Decimal::ZERO;
    }

    let monthly_installment = loan
        .amount_due
        .checked_div(Decimal::from(loan.term.max(1)))
        .unwrap_or(Decimal::ZERO);

    let Some(created_at) = loan.created_at else {
        return monthly_installment;
    };

    let elapsed_millis = (now - created_at).num_milliseconds();
    let installments_due = (elapsed_millis.div_euclid(BILLING_CYCLE_MILLIS) + 1).min(i64::from(loan.term));

    // Backend figures are unchecked, so arithmetic saturates instead of overflowing.
    let total_should_be_paid = monthly_installment.saturating_mul(Decimal::from(installments_due));
    let amount_paid = loan
        .amount_due
        .saturating_sub(loan.outstanding_balance.unwrap_or(loan.amount_due));

    total_should_be_paid.saturating_sub(amount_paid).max(Decimal::ZERO)
}

impl Loan {
    /// Derives the figures a loan view renders.
    #[must_use]
    pub fn summary(&self, now: DateTime<Utc>) -> LoanSummary {
        LoanSummary {
            progress: calculate_loan_progress(self),
            current_amount_due: calculate_current_amount_due(self, now),
            next_payment_date: self.next_payment_date,
            status: self.status,
        }
    }
}
