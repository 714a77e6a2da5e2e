//! Core business logic for Lendwise.
//!
//! This crate contains pure business logic with ZERO network or storage dependencies.
//! All loan calculations and eligibility rules live here.
//!
//! # Modules
//!
//! - `loan` - Amortization, repayment progress, current amount due
//! - `eligibility` - KYC then credit-score gate for loan applications

pub mod eligibility;
pub mod loan;
