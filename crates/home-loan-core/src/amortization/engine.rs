use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::affordability::assess_affordability;
use super::config::EngineConfig;
use super::schedule::{build_schedule_with_limit, AmortizationRow};
use crate::time_value::{self, checked_mul};
use crate::{types::*, HomeLoanError, HomeLoanResult};

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// Loan parameters as captured from the calculator form. Absent fields are
/// zero, and zero is a valid value rather than a "missing" marker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanInputs {
    #[serde(alias = "propertyValue")]
    pub property_value: Money,
    #[serde(alias = "downPayment")]
    pub down_payment: Money,
    /// Annual rate in percent (10 = 10%).
    #[serde(alias = "interestRate")]
    pub annual_interest_rate_pct: Percent,
    #[serde(alias = "loanTerm")]
    pub term_years: Years,
    /// One-time costs added to the total, not financed.
    #[serde(alias = "additionalCosts")]
    pub additional_costs: Money,
    #[serde(alias = "monthlyIncome")]
    pub monthly_income: Money,
    #[serde(alias = "monthlyExpenses")]
    pub monthly_expenses: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanResult {
    /// Property value minus down payment. Not clamped: a down payment above
    /// the property value gives a negative amount.
    pub loan_amount: Money,
    pub monthly_rate: Rate,
    pub number_of_payments: Decimal,
    pub monthly_payment: Money,
    /// All payments plus the additional costs.
    pub total_payment: Money,
    pub total_interest: Money,
    /// Monthly income minus monthly expenses.
    pub monthly_capacity: Money,
    pub max_affordable_payment: Money,
    pub is_viable: bool,
    pub schedule: Vec<AmortizationRow>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Price a loan with the default 35% affordability rule and a twelve month
/// schedule preview.
pub fn compute_loan(inputs: &LoanInputs) -> HomeLoanResult<ComputationOutput<LoanResult>> {
    compute_loan_with_config(inputs, &EngineConfig::default())
}

/// Price a loan: level monthly payment, totals, affordability verdict and
/// amortization schedule.
pub fn compute_loan_with_config(
    inputs: &LoanInputs,
    config: &EngineConfig,
) -> HomeLoanResult<ComputationOutput<LoanResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_inputs(inputs)?;
    config.validate()?;

    let loan_amount = inputs.property_value - inputs.down_payment;
    if loan_amount < Decimal::ZERO {
        warnings.push(format!(
            "Down payment exceeds property value; loan amount is negative ({loan_amount})."
        ));
    }

    let monthly_rate = time_value::monthly_rate(inputs.annual_interest_rate_pct);
    let number_of_payments = time_value::number_of_payments(inputs.term_years)?;
    if !number_of_payments.fract().is_zero() {
        warnings.push(format!(
            "Term of {} years is not a whole number of months ({number_of_payments} payments).",
            inputs.term_years
        ));
    }

    log::debug!(
        "pricing loan: amount={loan_amount} monthly_rate={monthly_rate} payments={number_of_payments}"
    );

    let monthly_payment = time_value::level_payment(monthly_rate, number_of_payments, loan_amount)?;

    let total_payment = checked_mul(monthly_payment, number_of_payments, "total payment")?
        .checked_add(inputs.additional_costs)
        .ok_or_else(|| HomeLoanError::NumericOverflow {
            context: "total payment".into(),
        })?;
    let total_interest = total_payment
        .checked_sub(loan_amount)
        .and_then(|v| v.checked_sub(inputs.additional_costs))
        .ok_or_else(|| HomeLoanError::NumericOverflow {
            context: "total interest".into(),
        })?;

    let monthly_capacity = inputs.monthly_income - inputs.monthly_expenses;
    let affordability =
        assess_affordability(monthly_payment, monthly_capacity, config.max_payment_ratio)?;

    let schedule = build_schedule_with_limit(
        loan_amount,
        monthly_rate,
        number_of_payments,
        monthly_payment,
        config.schedule_length.limit(),
    )?;
    if Decimal::from(schedule.len() as u64) < number_of_payments.floor() {
        warnings.push(format!(
            "Schedule shows the first {} of {} payments.",
            schedule.len(),
            number_of_payments.floor()
        ));
    }

    let output = LoanResult {
        loan_amount,
        monthly_rate,
        number_of_payments,
        monthly_payment,
        total_payment,
        total_interest,
        monthly_capacity,
        max_affordable_payment: affordability.max_affordable_payment,
        is_viable: affordability.is_viable,
        schedule,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "max_payment_ratio": config.max_payment_ratio.to_string(),
        "schedule_length": config.schedule_length,
        "compounding": "monthly",
    });

    Ok(with_metadata(
        "Level-payment amortization with payment-to-capacity affordability rule",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn validate_inputs(inputs: &LoanInputs) -> HomeLoanResult<()> {
    let fields = [
        ("property_value", inputs.property_value),
        ("down_payment", inputs.down_payment),
        ("annual_interest_rate_pct", inputs.annual_interest_rate_pct),
        ("term_years", inputs.term_years),
        ("additional_costs", inputs.additional_costs),
        ("monthly_income", inputs.monthly_income),
        ("monthly_expenses", inputs.monthly_expenses),
    ];

    for (field, value) in fields {
        if value < Decimal::ZERO {
            return Err(HomeLoanError::InvalidInput {
                field: field.into(),
                reason: "Value cannot be negative.".into(),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
