//! Loan calculation error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised when loan inputs fall outside the calculable domain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoanError {
    /// Principal must be strictly positive.
    #[error("Principal must be greater than zero, got {0}")]
    InvalidPrincipal(Decimal),

    /// Annual rate cannot be negative.
    #[error("Annual rate cannot be negative, got {0}")]
    NegativeRate(Decimal),

    /// Term must be at least one month.
    #[error("Term must be at least one month")]
    InvalidTerm,

    /// An intermediate value exceeded decimal range.
    #[error("Calculation overflowed decimal range")]
    Overflow,
}
