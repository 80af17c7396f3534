use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::HomeLoanError;
use crate::types::{Money, Percent, Rate, Years};
use crate::HomeLoanResult;

pub const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Convert an annual percentage (10 = 10%) into a monthly decimal rate.
pub fn monthly_rate(annual_rate_pct: Percent) -> Rate {
    annual_rate_pct / dec!(100) / MONTHS_PER_YEAR
}

/// Number of monthly payments in a term. Fractional terms are not rounded.
pub fn number_of_payments(term_years: Years) -> HomeLoanResult<Decimal> {
    checked_mul(term_years, MONTHS_PER_YEAR, "number of payments")
}

/// Compound growth factor (1 + rate)^nper.
///
/// Integral period counts use exact repeated multiplication; fractional ones
/// fall back to `powd`. Results outside the decimal range are reported as
/// overflow rather than saturated.
pub fn growth_factor(rate: Rate, nper: Decimal) -> HomeLoanResult<Decimal> {
    if nper < Decimal::ZERO {
        return Err(HomeLoanError::InvalidInput {
            field: "nper".into(),
            reason: "Number of periods cannot be negative".into(),
        });
    }

    let one_plus_r = Decimal::ONE + rate;
    let factor = if nper.fract().is_zero() {
        nper.to_u64().and_then(|n| one_plus_r.checked_powu(n))
    } else {
        one_plus_r.checked_powd(nper)
    };

    factor.ok_or_else(|| HomeLoanError::NumericOverflow {
        context: format!("growth factor (1 + {rate})^{nper}"),
    })
}

/// Level payment that fully amortises `principal` over `nper` periods.
///
/// A zero rate degrades to straight-line repayment. Zero periods is a
/// division by zero for either branch.
pub fn level_payment(rate: Rate, nper: Decimal, principal: Money) -> HomeLoanResult<Money> {
    if nper.is_zero() {
        return Err(HomeLoanError::DivisionByZero {
            context: "level payment with zero periods".into(),
        });
    }

    if rate.is_zero() {
        return principal
            .checked_div(nper)
            .ok_or_else(|| HomeLoanError::NumericOverflow {
                context: "straight-line payment".into(),
            });
    }

    let factor = growth_factor(rate, nper)?;
    let denominator = factor - Decimal::ONE;
    if denominator.is_zero() {
        return Err(HomeLoanError::DivisionByZero {
            context: "annuity denominator (1 + r)^n - 1".into(),
        });
    }

    let numerator = checked_mul(rate, factor, "annuity numerator")?;
    let annuity_factor =
        numerator
            .checked_div(denominator)
            .ok_or_else(|| HomeLoanError::NumericOverflow {
                context: "annuity factor".into(),
            })?;

    checked_mul(principal, annuity_factor, "level payment")
}

/// Multiplication that reports overflow instead of panicking.
pub(crate) fn checked_mul(a: Decimal, b: Decimal, context: &str) -> HomeLoanResult<Decimal> {
    a.checked_mul(b).ok_or_else(|| HomeLoanError::NumericOverflow {
        context: context.to_string(),
    })
}

/// Addition that reports overflow instead of panicking.
pub(crate) fn checked_add(a: Decimal, b: Decimal, context: &str) -> HomeLoanResult<Decimal> {
    a.checked_add(b).ok_or_else(|| HomeLoanError::NumericOverflow {
        context: context.to_string(),
    })
}

/// Overflow-checked total of a sequence of amounts.
pub(crate) fn checked_sum(
    values: impl IntoIterator<Item = Decimal>,
    context: &str,
) -> HomeLoanResult<Decimal> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| checked_add(acc, v, context))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_monthly_rate_from_percent() {
        assert_eq!(monthly_rate(dec!(12)), dec!(0.01));
        assert_eq!(monthly_rate(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_number_of_payments_keeps_fraction() {
        assert_eq!(number_of_payments(dec!(20)).unwrap(), dec!(240));
        assert_eq!(number_of_payments(dec!(2.5)).unwrap(), dec!(30));
        assert_eq!(number_of_payments(dec!(0.55)).unwrap(), dec!(6.6));
    }

    #[test]
    fn test_growth_factor_integral() {
        let f = growth_factor(dec!(0.10), dec!(2)).unwrap();
        assert_eq!(f, dec!(1.21));
    }

    #[test]
    fn test_growth_factor_fractional() {
        // 1.21^0.5 = 1.1
        let f = growth_factor(dec!(0.21), dec!(0.5)).unwrap();
        assert!((f - dec!(1.1)).abs() < dec!(0.0000001));
    }

    #[test]
    fn test_growth_factor_overflow() {
        let err = growth_factor(dec!(10), dec!(1000)).unwrap_err();
        assert!(matches!(err, HomeLoanError::NumericOverflow { .. }));
    }

    #[test]
    fn test_level_payment_basic() {
        // 100k over 360 months at 0.5%/month ≈ 599.55
        let p = level_payment(dec!(0.005), dec!(360), dec!(100_000)).unwrap();
        assert!((p - dec!(599.55)).abs() < dec!(0.01));
    }

    #[test]
    fn test_level_payment_zero_rate_is_straight_line() {
        let p = level_payment(Decimal::ZERO, dec!(120), dec!(120_000)).unwrap();
        assert_eq!(p, dec!(1000));
    }

    #[test]
    fn test_level_payment_zero_periods() {
        for rate in [Decimal::ZERO, dec!(0.01)] {
            let err = level_payment(rate, Decimal::ZERO, dec!(1000)).unwrap_err();
            assert!(matches!(err, HomeLoanError::DivisionByZero { .. }));
        }
    }

    #[test]
    fn test_level_payment_negative_principal() {
        let p = level_payment(dec!(0.01), dec!(12), dec!(-1200)).unwrap();
        assert!(p < Decimal::ZERO);
    }

    #[test]
    fn test_checked_sum_reports_overflow() {
        assert_eq!(checked_sum([dec!(1), dec!(2.5)], "t").unwrap(), dec!(3.5));
        assert_eq!(checked_sum(Vec::new(), "t").unwrap(), Decimal::ZERO);
        let err = checked_sum([Decimal::MAX, Decimal::ONE], "debt total").unwrap_err();
        assert!(matches!(err, HomeLoanError::NumericOverflow { .. }));
    }
}
