//! Property-based tests for loan math.

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::amortization::compute_amortization;
use super::due::calculate_current_amount_due;
use super::progress::calculate_loan_progress;
use super::types::{Loan, LoanStatus};

/// Principal from 1,000.00 to 100,000,000.00.
fn principal() -> impl Strategy<Value = Decimal> {
    (100_000i64..10_000_000_000i64).prop_map(|kobo| Decimal::new(kobo, 2))
}

/// Annual rate from 0.01% to 60.00%.
fn positive_rate() -> impl Strategy<Value = Decimal> {
    (1i64..6_000i64).prop_map(|bps| Decimal::new(bps, 2))
}

fn status() -> impl Strategy<Value = LoanStatus> {
    prop_oneof![
        Just(LoanStatus::Pending),
        Just(LoanStatus::Approved),
        Just(LoanStatus::Active),
        Just(LoanStatus::Overdue),
        Just(LoanStatus::Paid),
        Just(LoanStatus::Rejected),
    ]
}

fn loan(principal: Decimal, outstanding: Decimal, term: u32, status: LoanStatus) -> Loan {
    Loan {
        id: "prop".to_string(),
        principal,
        rate: dec!(10),
        term,
        outstanding_balance: Some(outstanding),
        amount_due: principal,
        payment_progress: None,
        status,
        created_at: Some(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()),
        next_payment_date: None,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Interest is positive whenever the rate is, and the totals are consistent.
    #[test]
    fn prop_interest_positive_for_positive_rate(
        principal in principal(),
        rate in positive_rate(),
        term in 1u32..=360,
    ) {
        let plan = compute_amortization(principal, rate, term).unwrap();

        prop_assert!(plan.monthly_payment > Decimal::ZERO);
        prop_assert!(plan.total_interest > Decimal::ZERO);
        prop_assert_eq!(plan.total_payment, plan.monthly_payment * Decimal::from(term));
        prop_assert_eq!(plan.total_interest, plan.total_payment - principal);
    }

    /// The installment never drops below straight-line repayment of principal.
    #[test]
    fn prop_installment_at_least_straight_line(
        principal in principal(),
        rate in positive_rate(),
        term in 1u32..=120,
    ) {
        let plan = compute_amortization(principal, rate, term).unwrap();
        prop_assert!(plan.monthly_payment >= principal / Decimal::from(term));
    }

    /// Zero interest divides the principal evenly.
    #[test]
    fn prop_zero_rate_divides_evenly(principal in principal(), term in 1u32..=360) {
        let plan = compute_amortization(principal, Decimal::ZERO, term).unwrap();
        prop_assert_eq!(plan.monthly_payment, principal / Decimal::from(term));
    }

    /// Progress always lands in [0, 100].
    #[test]
    fn prop_progress_bounded(
        principal in principal(),
        outstanding in 0i64..20_000_000_000i64,
        reported in proptest::option::of(-1_000i64..1_000i64),
    ) {
        let mut subject = loan(principal, Decimal::new(outstanding, 2), 12, LoanStatus::Active);
        subject.payment_progress = reported.map(Decimal::from);
        prop_assert!(calculate_loan_progress(&subject) <= 100);
    }

    /// Amount due is never negative and never exceeds the full repayable amount.
    #[test]
    fn prop_amount_due_bounded(
        principal in principal(),
        paid_fraction in 0u32..=100,
        term in 1u32..=60,
        days in 0i64..3_000,
        status in status(),
    ) {
        let outstanding = principal - principal * Decimal::from(paid_fraction) / Decimal::ONE_HUNDRED;
        let subject = loan(principal, outstanding, term, status);
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap() + Duration::days(days);

        let due = calculate_current_amount_due(&subject, now);
        prop_assert!(due >= Decimal::ZERO);
        prop_assert!(due <= principal + dec!(0.000001));
        if !status.is_repaying() {
            prop_assert_eq!(due, Decimal::ZERO);
        }
    }
}
