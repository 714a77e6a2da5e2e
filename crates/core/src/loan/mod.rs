//! Loan math: amortization, repayment progress and current amount due.

pub mod amortization;
pub mod compat;
pub mod due;
pub mod error;
pub mod progress;
pub mod types;

#[cfg(test)]
mod props;

pub use amortization::{Amortization, compute_amortization};
pub use due::{BILLING_CYCLE_DAYS, calculate_current_amount_due};
pub use error::LoanError;
pub use progress::calculate_loan_progress;
pub use types::{Loan, LoanApplication, LoanStatus, LoanSummary, LoanType};
