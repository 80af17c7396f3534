use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::{
    compute_loan_with_config, AmortizationRow, EngineConfig, LoanInputs, ScheduleLength,
};
use crate::profile::{FinancialProfile, DEBT_CAPACITY_RATIO};
use crate::time_value::checked_mul;
use crate::{types::*, HomeLoanError, HomeLoanResult};

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditKind {
    Mortgage,
    Auto,
}

/// A saved credit scenario: down payment as a percentage of the price and a
/// whole-year term.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditSimulation {
    pub kind: CreditKind,
    pub name: String,
    pub property_value: Money,
    /// 0..=100
    pub down_payment_pct: Percent,
    /// 0..=100
    pub annual_interest_rate_pct: Percent,
    /// At least one year.
    pub term_years: u32,
    /// Insurance, notary and similar one-time costs.
    #[serde(default)]
    pub additional_costs: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationInput {
    pub profile: FinancialProfile,
    pub simulation: CreditSimulation,
    #[serde(default)]
    pub full_schedule: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationOutput {
    pub name: String,
    pub kind: CreditKind,
    pub down_payment_amount: Money,
    pub loan_amount: Money,
    pub number_of_payments: u32,
    pub monthly_rate: Rate,
    pub monthly_payment: Money,
    pub total_payment: Money,
    pub total_interest: Money,
    /// 35% of the profile's total income.
    pub debt_capacity: Money,
    pub is_viable: bool,
    pub schedule: Vec<AmortizationRow>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run a saved credit scenario against a financial profile.
///
/// Viability compares the payment with the profile's debt capacity (a share
/// of total income), not with income net of expenses.
pub fn simulate_credit(
    input: &SimulationInput,
) -> HomeLoanResult<ComputationOutput<SimulationOutput>> {
    let start = Instant::now();
    let sim = &input.simulation;

    input.profile.validate()?;
    validate_simulation(sim)?;

    let down_payment_amount = checked_mul(
        sim.property_value,
        sim.down_payment_pct / dec!(100),
        "down payment amount",
    )?;
    // Income with no expenses deducted, so the engine's capacity is the
    // profile's total income and its ceiling is the debt capacity.
    let loan_inputs = LoanInputs {
        property_value: sim.property_value,
        down_payment: down_payment_amount,
        annual_interest_rate_pct: sim.annual_interest_rate_pct,
        term_years: Decimal::from(sim.term_years),
        additional_costs: sim.additional_costs,
        monthly_income: input.profile.total_income()?,
        monthly_expenses: Decimal::ZERO,
    };
    let config = EngineConfig {
        max_payment_ratio: DEBT_CAPACITY_RATIO,
        schedule_length: if input.full_schedule {
            ScheduleLength::Full
        } else {
            ScheduleLength::default()
        },
    };

    let priced = compute_loan_with_config(&loan_inputs, &config)?;
    let loan = priced.result;

    let output = SimulationOutput {
        name: sim.name.clone(),
        kind: sim.kind,
        down_payment_amount,
        loan_amount: loan.loan_amount,
        number_of_payments: sim.term_years.saturating_mul(12),
        monthly_rate: loan.monthly_rate,
        monthly_payment: loan.monthly_payment,
        total_payment: loan.total_payment,
        total_interest: loan.total_interest,
        debt_capacity: loan.max_affordable_payment,
        is_viable: loan.is_viable,
        schedule: loan.schedule,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "debt_capacity_ratio": DEBT_CAPACITY_RATIO.to_string(),
        "debt_capacity_base": "total_income",
        "full_schedule": input.full_schedule,
    });

    Ok(with_metadata(
        "Credit simulation (level-payment amortization vs. income-based debt capacity)",
        &assumptions,
        priced.warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn validate_simulation(sim: &CreditSimulation) -> HomeLoanResult<()> {
    let percentages = [
        ("down_payment_pct", sim.down_payment_pct),
        ("annual_interest_rate_pct", sim.annual_interest_rate_pct),
    ];
    for (field, value) in percentages {
        if value < Decimal::ZERO || value > dec!(100) {
            return Err(HomeLoanError::InvalidInput {
                field: field.into(),
                reason: "Percentage must be between 0 and 100.".into(),
            });
        }
    }
    if sim.term_years < 1 {
        return Err(HomeLoanError::InvalidInput {
            field: "term_years".into(),
            reason: "Term must be at least one year.".into(),
        });
    }
    if sim.property_value < Decimal::ZERO {
        return Err(HomeLoanError::InvalidInput {
            field: "property_value".into(),
            reason: "Property value cannot be negative.".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn profile() -> FinancialProfile {
        FinancialProfile {
            monthly_income: dec!(20_000),
            other_income: Decimal::ZERO,
            fixed_expenses: dec!(8_000),
            monthly_savings: dec!(2_000),
            current_savings: Decimal::ZERO,
            credit_score: None,
            debts: Vec::new(),
            goals: Vec::new(),
        }
    }

    fn mortgage() -> CreditSimulation {
        CreditSimulation {
            kind: CreditKind::Mortgage,
            name: "Casa".into(),
            property_value: dec!(1_000_000),
            down_payment_pct: dec!(20),
            annual_interest_rate_pct: dec!(10),
            term_years: 20,
            additional_costs: dec!(30_000),
        }
    }

    #[test]
    fn test_down_payment_from_percentage() {
        let input = SimulationInput {
            profile: profile(),
            simulation: mortgage(),
            full_schedule: false,
        };
        let out = simulate_credit(&input).unwrap().result;
        assert_eq!(out.down_payment_amount, dec!(200_000));
        assert_eq!(out.loan_amount, dec!(800_000));
        assert_eq!(out.number_of_payments, 240);
        assert_eq!(out.schedule.len(), 12);
    }

    #[test]
    fn test_viability_uses_total_income() {
        // capacity = 20k * 0.35 = 7,000 < 7,720 payment
        let input = SimulationInput {
            profile: profile(),
            simulation: mortgage(),
            full_schedule: false,
        };
        let out = simulate_credit(&input).unwrap().result;
        assert_eq!(out.debt_capacity, dec!(7000));
        assert!(!out.is_viable);

        let mut richer = profile();
        richer.other_income = dec!(5_000);
        let input = SimulationInput {
            profile: richer,
            simulation: mortgage(),
            full_schedule: false,
        };
        // 25k * 0.35 = 8,750; fixed expenses are not deducted
        assert!(simulate_credit(&input).unwrap().result.is_viable);
    }

    #[test]
    fn test_full_schedule_flag() {
        let input = SimulationInput {
            profile: profile(),
            simulation: mortgage(),
            full_schedule: true,
        };
        let out = simulate_credit(&input).unwrap().result;
        assert_eq!(out.schedule.len(), 240);
    }

    #[test]
    fn test_zero_term_rejected() {
        let mut sim = mortgage();
        sim.term_years = 0;
        let input = SimulationInput {
            profile: profile(),
            simulation: sim,
            full_schedule: false,
        };
        match simulate_credit(&input).unwrap_err() {
            HomeLoanError::InvalidInput { field, .. } => assert_eq!(field, "term_years"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_down_payment_over_hundred_rejected() {
        let mut sim = mortgage();
        sim.down_payment_pct = dec!(120);
        let input = SimulationInput {
            profile: profile(),
            simulation: sim,
            full_schedule: false,
        };
        assert!(simulate_credit(&input).is_err());
    }
}
