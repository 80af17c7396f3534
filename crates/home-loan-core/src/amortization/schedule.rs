use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::time_value::checked_mul;
use crate::types::{Money, Rate};
use crate::{HomeLoanError, HomeLoanResult};

/// Rows returned when the caller does not ask for the full schedule.
pub const PREVIEW_MONTHS: u32 = 12;

/// Upper bound on a full schedule (500 years of monthly payments).
pub const MAX_SCHEDULE_MONTHS: u32 = 6_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    /// 1-based payment number.
    pub month: u32,
    pub payment: Money,
    pub principal: Money,
    pub interest: Money,
    /// Remaining balance after the payment, floored at zero.
    pub balance: Money,
}

/// First twelve months of the amortization schedule.
pub fn build_schedule(
    loan_amount: Money,
    monthly_rate: Rate,
    number_of_payments: Decimal,
    monthly_payment: Money,
) -> HomeLoanResult<Vec<AmortizationRow>> {
    build_schedule_with_limit(
        loan_amount,
        monthly_rate,
        number_of_payments,
        monthly_payment,
        Some(PREVIEW_MONTHS),
    )
}

/// Amortization schedule of at most `limit` rows (`None` for every whole
/// payment of the term).
///
/// Interest accrues on the unclamped running balance; only the emitted
/// `balance` is floored at zero.
pub fn build_schedule_with_limit(
    loan_amount: Money,
    monthly_rate: Rate,
    number_of_payments: Decimal,
    monthly_payment: Money,
    limit: Option<u32>,
) -> HomeLoanResult<Vec<AmortizationRow>> {
    let months = schedule_months(number_of_payments, limit)?;
    let mut rows = Vec::with_capacity(months as usize);
    let mut running = loan_amount;

    for month in 1..=months {
        let interest = checked_mul(running, monthly_rate, "schedule interest")?;
        let principal = monthly_payment
            .checked_sub(interest)
            .ok_or_else(|| HomeLoanError::NumericOverflow {
                context: format!("schedule principal at month {month}"),
            })?;
        running = running
            .checked_sub(principal)
            .ok_or_else(|| HomeLoanError::NumericOverflow {
                context: format!("schedule balance at month {month}"),
            })?;

        rows.push(AmortizationRow {
            month,
            payment: monthly_payment,
            principal,
            interest,
            balance: running.max(Decimal::ZERO),
        });
    }

    Ok(rows)
}

/// Whole months to emit: floor(min(n, limit)), zero when n <= 0. Any
/// result above `MAX_SCHEDULE_MONTHS` is rejected, capped or not.
fn schedule_months(number_of_payments: Decimal, limit: Option<u32>) -> HomeLoanResult<u32> {
    if number_of_payments <= Decimal::ZERO {
        return Ok(0);
    }

    let whole = number_of_payments.floor();
    let months = match (whole.to_u32(), limit) {
        (Some(w), Some(cap)) => Some(w.min(cap)),
        (None, Some(cap)) => Some(cap),
        (w, None) => w,
    };
    months
        .filter(|m| *m <= MAX_SCHEDULE_MONTHS)
        .ok_or_else(|| HomeLoanError::InvalidInput {
            field: "schedule_length".into(),
            reason: format!("Schedules are limited to {MAX_SCHEDULE_MONTHS} payments"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_preview_is_twelve_rows() {
        let rows = build_schedule(dec!(120_000), Decimal::ZERO, dec!(120), dec!(1000)).unwrap();
        assert_eq!(rows.len(), 12);
        assert_eq!(rows[0].month, 1);
        assert_eq!(rows[11].month, 12);
        assert_eq!(rows[11].balance, dec!(108_000));
    }

    #[test]
    fn test_short_term_emits_every_month() {
        let rows = build_schedule(dec!(6000), Decimal::ZERO, dec!(6), dec!(1000)).unwrap();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[5].balance, Decimal::ZERO);
    }

    #[test]
    fn test_zero_or_negative_payments_yield_no_rows() {
        assert!(build_schedule(dec!(1000), dec!(0.01), Decimal::ZERO, dec!(10)).unwrap().is_empty());
        assert!(build_schedule(dec!(1000), dec!(0.01), dec!(-3), dec!(10)).unwrap().is_empty());
    }

    #[test]
    fn test_fractional_payments_are_floored() {
        let rows = build_schedule(dec!(6600), Decimal::ZERO, dec!(6.6), dec!(1000)).unwrap();
        assert_eq!(rows.len(), 6);
    }

    #[test]
    fn test_interest_and_principal_split() {
        let rows = build_schedule(dec!(1000), dec!(0.01), dec!(2), dec!(507.51)).unwrap();
        assert_eq!(rows[0].interest, dec!(10));
        assert_eq!(rows[0].principal, dec!(497.51));
        assert_eq!(rows[0].balance, dec!(502.49));
    }

    #[test]
    fn test_clamped_balance_but_unclamped_running() {
        // Overpayment drives the running balance negative; the emitted
        // balance stays at zero while interest keeps accruing on the
        // negative running value.
        let rows = build_schedule(dec!(100), dec!(0.10), dec!(3), dec!(200)).unwrap();
        assert_eq!(rows[0].balance, Decimal::ZERO);
        // running after month 1: 100 - (200 - 10) = -90
        assert_eq!(rows[1].interest, dec!(-9));
        assert_eq!(rows[1].principal, dec!(209));
        assert_eq!(rows[1].balance, Decimal::ZERO);
    }

    #[test]
    fn test_full_schedule() {
        let rows =
            build_schedule_with_limit(dec!(24_000), Decimal::ZERO, dec!(240), dec!(100), None).unwrap();
        assert_eq!(rows.len(), 240);
        assert_eq!(rows.last().unwrap().balance, Decimal::ZERO);
    }

    #[test]
    fn test_full_schedule_too_long() {
        let err = build_schedule_with_limit(dec!(1), Decimal::ZERO, dec!(1_000_000), dec!(0), None)
            .unwrap_err();
        assert!(matches!(err, HomeLoanError::InvalidInput { .. }));
    }

    #[test]
    fn test_oversized_preview_on_endless_term_rejected() {
        let err = build_schedule_with_limit(
            dec!(1000),
            Decimal::ZERO,
            dec!(12_000_000_000),
            dec!(0),
            Some(u32::MAX),
        )
        .unwrap_err();
        assert!(matches!(err, HomeLoanError::InvalidInput { .. }));
    }

    #[test]
    fn test_large_preview_cap_on_short_term_is_fine() {
        let rows =
            build_schedule_with_limit(dec!(1200), Decimal::ZERO, dec!(12), dec!(100), Some(u32::MAX))
                .unwrap();
        assert_eq!(rows.len(), 12);
    }
}
