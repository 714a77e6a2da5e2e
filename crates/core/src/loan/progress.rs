//! Repayment progress of a loan.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use super::types::Loan;

/// Returns the percentage of the loan repaid, rounded to a whole number.
///
/// A non-negative backend `paymentProgress` wins; otherwise the figure is
/// derived from principal and outstanding balance; otherwise 0.
#[must_use]
pub fn calculate_loan_progress(loan: &Loan) -> u8 {
    if let Some(progress) = loan.payment_progress.filter(|p| *p >= Decimal::ZERO) {
        return to_whole_percent(progress);
    }

    if let Some(outstanding) = loan.outstanding_balance {
        let repaid = loan.principal.saturating_sub(outstanding);
        if loan.principal > Decimal::ZERO && repaid > Decimal::ZERO {
            let fraction = repaid.checked_div(loan.principal).unwrap_or(Decimal::ONE);
            return to_whole_percent(fraction.saturating_mul(Decimal::ONE_HUNDRED));
        }
    }

    0
}

/// Clamps to `[0, 100]` and rounds half away from zero.
fn to_whole_percent(value: Decimal) -> u8 {
    value
        .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u8()
        .unwrap_or(0)
}
