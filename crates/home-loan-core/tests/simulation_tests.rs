#![cfg(all(feature = "profile", feature = "simulation"))]

use chrono::NaiveDate;
use home_loan_core::profile::{self, DebtKind, FinancialProfile, GoalKind};
use home_loan_core::simulation::{self, CreditKind, SimulationInput};
use home_loan_core::HomeLoanError;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

const PROFILE_JSON: &str = r#"{
    "monthly_income": "35000",
    "other_income": "5000",
    "fixed_expenses": "12000",
    "monthly_savings": "6000",
    "credit_score": 710,
    "debts": [
        {
            "kind": "credit_card",
            "name": "Visa",
            "balance": "18000",
            "monthly_payment": "1500",
            "annual_interest_rate_pct": "36",
            "start_date": "2025-03-15"
        },
        {
            "kind": "auto",
            "name": "Sedan",
            "balance": "120000",
            "monthly_payment": "3500",
            "annual_interest_rate_pct": "11.9",
            "start_date": "2023-06-01",
            "term_months": 60
        }
    ],
    "goals": [
        { "kind": "house", "name": "Enganche", "target_amount": "300000", "term_months": 60 }
    ]
}"#;

fn sample_profile() -> FinancialProfile {
    serde_json::from_str(PROFILE_JSON).unwrap()
}

#[test]
fn test_profile_from_json() {
    let p = sample_profile();
    assert_eq!(p.debts[0].kind, DebtKind::CreditCard);
    assert_eq!(p.goals[0].kind, GoalKind::House);
    assert!(p.goals[0].active);
    assert_eq!(p.current_savings, dec!(0));
}

#[test]
fn test_profile_analysis() {
    let out = profile::analyze_profile(&sample_profile()).unwrap();
    let a = &out.result;

    assert_eq!(a.total_income, dec!(40_000));
    assert_eq!(a.savings_capacity, dec!(28_000));
    assert_eq!(a.debt_capacity, dec!(14_000));
    assert_eq!(a.total_debt_balance, dec!(138_000));
    assert_eq!(a.total_debt_payments, dec!(5_000));
    assert_eq!(a.available_debt_capacity, dec!(9_000));
    assert_eq!(a.total_required_saving, dec!(5_000));
    assert!(a.goals_covered);
    assert!(out.warnings.is_empty());

    assert_eq!(a.debts[0].maturity_date, None);
    assert_eq!(a.debts[1].maturity_date, NaiveDate::from_ymd_opt(2028, 6, 1));
}

#[test]
fn test_auto_credit_simulation() {
    let input: SimulationInput = serde_json::from_value(serde_json::json!({
        "profile": serde_json::from_str::<serde_json::Value>(PROFILE_JSON).unwrap(),
        "simulation": {
            "kind": "auto",
            "name": "Pickup",
            "property_value": "450000",
            "down_payment_pct": "10",
            "annual_interest_rate_pct": "0",
            "term_years": 3,
            "additional_costs": "9000"
        }
    }))
    .unwrap();

    let out = simulation::simulate_credit(&input).unwrap().result;
    assert_eq!(out.kind, CreditKind::Auto);
    assert_eq!(out.down_payment_amount, dec!(45_000));
    assert_eq!(out.loan_amount, dec!(405_000));
    assert_eq!(out.number_of_payments, 36);
    assert_eq!(out.monthly_payment, dec!(11_250));
    assert_eq!(out.total_payment, dec!(414_000));
    assert_eq!(out.total_interest, dec!(0));
    // 11,250 <= 14,000
    assert!(out.is_viable);
    assert_eq!(out.schedule.len(), 12);
    assert_eq!(out.schedule[11].balance, dec!(270_000));
}

#[test]
fn test_simulation_rejects_invalid_profile() {
    let mut p = sample_profile();
    p.credit_score = Some(120);
    let input = SimulationInput {
        profile: p,
        simulation: serde_json::from_value(serde_json::json!({
            "kind": "mortgage",
            "name": "Casa",
            "property_value": "1000000",
            "down_payment_pct": "20",
            "annual_interest_rate_pct": "10",
            "term_years": 20
        }))
        .unwrap(),
        full_schedule: false,
    };
    match simulation::simulate_credit(&input).unwrap_err() {
        HomeLoanError::InvalidInput { field, .. } => assert_eq!(field, "credit_score"),
        other => panic!("Expected InvalidInput, got {other:?}"),
    }
}
