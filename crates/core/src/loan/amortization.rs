//! Fixed-rate, reducing-balance amortization.

use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};

use super::error::LoanError;

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Repayment figures for a loan, at full precision.
///
/// Rounding for display is the caller's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Amortization {
    /// Equal monthly installment.
    pub monthly_payment: Decimal,
    /// Sum of all installments.
    pub total_payment: Decimal,
    /// Total paid minus principal.
    pub total_interest: Decimal,
}

/// Computes the equal monthly installment for a reducing-balance loan.
///
/// With monthly rate `r = annual_rate_percent / 100 / 12`:
/// - `r > 0`: `P·r·(1+r)^n / ((1+r)^n − 1)`
/// - `r = 0`: `P / n`
///
/// # Errors
///
/// Returns `LoanError` when `principal <= 0`, the rate is negative, the term
/// is zero, or an intermediate value overflows.
///
/// # Example
///
/// ```
/// use lendwise_core::loan::compute_amortization;
/// use rust_decimal::Decimal;
///
/// let plan = compute_amortization(Decimal::from(1200), Decimal::ZERO, 12).unwrap();
/// assert_eq!(plan.monthly_payment, Decimal::from(100));
/// ```
pub fn compute_amortization(
    principal: Decimal,
    annual_rate_percent: Decimal,
    term_months: u32,
) -> Result<Amortization, LoanError> {
    if principal <= Decimal::ZERO {
        return Err(LoanError::InvalidPrincipal(principal));
    }
    if annual_rate_percent < Decimal::ZERO {
        return Err(LoanError::NegativeRate(annual_rate_percent));
    }
    if term_months == 0 {
        return Err(LoanError::InvalidTerm);
    }

    let term = Decimal::from(term_months);
    let monthly_rate = annual_rate_percent / Decimal::ONE_HUNDRED / MONTHS_PER_YEAR;

    let monthly_payment = if monthly_rate.is_zero() {
        principal / term
    } else {
        let growth = (Decimal::ONE + monthly_rate)
            .checked_powu(u64::from(term_months))
            .ok_or(LoanError::Overflow)?;
        principal
            .checked_mul(monthly_rate)
            .and_then(|v| v.checked_mul(growth))
            .and_then(|v| v.checked_div(growth - Decimal::ONE))
            .ok_or(LoanError::Overflow)?
    };

    let total_payment = monthly_payment
        .checked_mul(term)
        .ok_or(LoanError::Overflow)?;

    Ok(Amortization {
        monthly_payment,
        total_payment,
        total_interest: total_payment - principal,
    })
}
