use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::time_value::{checked_add, checked_mul, checked_sum};
use crate::{types::*, HomeLoanError, HomeLoanResult};

/// Share of total income that may go to debt service.
pub const DEBT_CAPACITY_RATIO: Rate = dec!(0.35);

pub const MIN_CREDIT_SCORE: u16 = 300;
pub const MAX_CREDIT_SCORE: u16 = 850;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtKind {
    CreditCard,
    Personal,
    Student,
    Auto,
    Mortgage,
    Other,
}

/// An obligation the household is already servicing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Debt {
    pub kind: DebtKind,
    pub name: String,
    pub balance: Money,
    pub monthly_payment: Money,
    /// Annual rate in percent, 0..=100.
    pub annual_interest_rate_pct: Percent,
    pub start_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term_months: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalKind {
    House,
    Car,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub kind: GoalKind,
    pub name: String,
    pub target_amount: Money,
    pub term_months: u32,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialProfile {
    /// Must be positive.
    pub monthly_income: Money,
    #[serde(default)]
    pub other_income: Money,
    pub fixed_expenses: Money,
    pub monthly_savings: Money,
    #[serde(default)]
    pub current_savings: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_score: Option<u16>,
    #[serde(default)]
    pub debts: Vec<Debt>,
    #[serde(default)]
    pub goals: Vec<SavingsGoal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtSummary {
    pub name: String,
    pub kind: DebtKind,
    pub balance: Money,
    pub monthly_payment: Money,
    pub maturity_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalSummary {
    pub name: String,
    pub kind: GoalKind,
    pub target_amount: Money,
    pub required_monthly_saving: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileAnalysis {
    pub total_income: Money,
    /// Total income minus fixed expenses.
    pub savings_capacity: Money,
    /// Largest monthly debt service the income supports.
    pub debt_capacity: Money,
    pub total_debt_balance: Money,
    pub total_debt_payments: Money,
    pub available_debt_capacity: Money,
    pub debts: Vec<DebtSummary>,
    pub active_goals: Vec<GoalSummary>,
    pub total_required_saving: Money,
    pub goals_covered: bool,
}

// ---------------------------------------------------------------------------
// Derived figures
// ---------------------------------------------------------------------------

impl FinancialProfile {
    pub fn total_income(&self) -> HomeLoanResult<Money> {
        checked_add(self.monthly_income, self.other_income, "total income")
    }

    pub fn savings_capacity(&self) -> HomeLoanResult<Money> {
        self.total_income()?
            .checked_sub(self.fixed_expenses)
            .ok_or_else(|| HomeLoanError::NumericOverflow {
                context: "savings capacity".into(),
            })
    }

    pub fn debt_capacity(&self) -> HomeLoanResult<Money> {
        checked_mul(self.total_income()?, DEBT_CAPACITY_RATIO, "debt capacity")
    }

    pub fn validate(&self) -> HomeLoanResult<()> {
        if self.monthly_income <= Decimal::ZERO {
            return Err(HomeLoanError::InvalidInput {
                field: "monthly_income".into(),
                reason: "Monthly income must be positive.".into(),
            });
        }
        let non_negative = [
            ("other_income", self.other_income),
            ("fixed_expenses", self.fixed_expenses),
            ("monthly_savings", self.monthly_savings),
            ("current_savings", self.current_savings),
        ];
        for (field, value) in non_negative {
            if value < Decimal::ZERO {
                return Err(HomeLoanError::InvalidInput {
                    field: field.into(),
                    reason: "Value cannot be negative.".into(),
                });
            }
        }
        if let Some(score) = self.credit_score {
            if !(MIN_CREDIT_SCORE..=MAX_CREDIT_SCORE).contains(&score) {
                return Err(HomeLoanError::InvalidInput {
                    field: "credit_score".into(),
                    reason: format!(
                        "Credit score must be between {MIN_CREDIT_SCORE} and {MAX_CREDIT_SCORE}."
                    ),
                });
            }
        }
        for debt in &self.debts {
            debt.validate()?;
        }
        Ok(())
    }
}

impl Debt {
    /// Start date plus the term, when the debt has a fixed term.
    pub fn maturity_date(&self) -> Option<NaiveDate> {
        self.term_months
            .and_then(|m| self.start_date.checked_add_months(Months::new(m)))
    }

    fn validate(&self) -> HomeLoanResult<()> {
        if self.annual_interest_rate_pct < Decimal::ZERO || self.annual_interest_rate_pct > dec!(100) {
            return Err(HomeLoanError::InvalidInput {
                field: format!("debts[{}].annual_interest_rate_pct", self.name),
                reason: "Rate must be between 0 and 100 percent.".into(),
            });
        }
        if self.monthly_payment < Decimal::ZERO {
            return Err(HomeLoanError::InvalidInput {
                field: format!("debts[{}].monthly_payment", self.name),
                reason: "Monthly payment cannot be negative.".into(),
            });
        }
        Ok(())
    }
}

impl SavingsGoal {
    /// Even monthly saving that reaches the target by the deadline; zero for
    /// goals without a term.
    pub fn required_monthly_saving(&self) -> Money {
        if self.term_months > 0 {
            self.target_amount / Decimal::from(self.term_months)
        } else {
            Decimal::ZERO
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Summarise a household's income, debt load and savings goals.
pub fn analyze_profile(
    profile: &FinancialProfile,
) -> HomeLoanResult<ComputationOutput<ProfileAnalysis>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    profile.validate()?;

    let total_income = profile.total_income()?;
    let debt_capacity = profile.debt_capacity()?;
    let total_debt_balance =
        checked_sum(profile.debts.iter().map(|d| d.balance), "total debt balance")?;
    let total_debt_payments =
        checked_sum(profile.debts.iter().map(|d| d.monthly_payment), "total debt payments")?;
    let available_debt_capacity = debt_capacity - total_debt_payments;
    if available_debt_capacity < Decimal::ZERO {
        warnings.push(format!(
            "Existing debt payments ({total_debt_payments}) exceed debt capacity ({debt_capacity})."
        ));
    }

    let debts = profile
        .debts
        .iter()
        .map(|d| DebtSummary {
            name: d.name.clone(),
            kind: d.kind,
            balance: d.balance,
            monthly_payment: d.monthly_payment,
            maturity_date: d.maturity_date(),
        })
        .collect();

    let active_goals: Vec<GoalSummary> = profile
        .goals
        .iter()
        .filter(|g| g.active)
        .map(|g| GoalSummary {
            name: g.name.clone(),
            kind: g.kind,
            target_amount: g.target_amount,
            required_monthly_saving: g.required_monthly_saving(),
        })
        .collect();
    let total_required_saving = checked_sum(
        active_goals.iter().map(|g| g.required_monthly_saving),
        "total required saving",
    )?;
    let goals_covered = profile.monthly_savings >= total_required_saving;
    if !goals_covered {
        warnings.push(format!(
            "Monthly savings ({}) fall short of the {total_required_saving} the active goals need.",
            profile.monthly_savings
        ));
    }

    let output = ProfileAnalysis {
        total_income,
        savings_capacity: profile.savings_capacity()?,
        debt_capacity,
        total_debt_balance,
        total_debt_payments,
        available_debt_capacity,
        debts,
        active_goals,
        total_required_saving,
        goals_covered,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "debt_capacity_ratio": DEBT_CAPACITY_RATIO.to_string(),
        "debt_capacity_base": "total_income",
    });

    Ok(with_metadata(
        "Household cash-flow and debt capacity summary",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn base_profile() -> FinancialProfile {
        FinancialProfile {
            monthly_income: dec!(40_000),
            other_income: dec!(5_000),
            fixed_expenses: dec!(15_000),
            monthly_savings: dec!(8_000),
            current_savings: dec!(120_000),
            credit_score: Some(720),
            debts: vec![Debt {
                kind: DebtKind::Auto,
                name: "Car".into(),
                balance: dec!(150_000),
                monthly_payment: dec!(4_500),
                annual_interest_rate_pct: dec!(12.5),
                start_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
                term_months: Some(48),
            }],
            goals: vec![
                SavingsGoal {
                    kind: GoalKind::House,
                    name: "Deposit".into(),
                    target_amount: dec!(240_000),
                    term_months: 48,
                    active: true,
                },
                SavingsGoal {
                    kind: GoalKind::Other,
                    name: "Trip".into(),
                    target_amount: dec!(30_000),
                    term_months: 10,
                    active: false,
                },
            ],
        }
    }

    #[test]
    fn test_income_and_capacity() {
        let p = base_profile();
        assert_eq!(p.total_income().unwrap(), dec!(45_000));
        assert_eq!(p.savings_capacity().unwrap(), dec!(30_000));
        assert_eq!(p.debt_capacity().unwrap(), dec!(15_750));
    }

    #[test]
    fn test_analysis_totals() {
        let a = analyze_profile(&base_profile()).unwrap().result;
        assert_eq!(a.total_debt_payments, dec!(4_500));
        assert_eq!(a.available_debt_capacity, dec!(11_250));
        assert_eq!(a.active_goals.len(), 1);
        assert_eq!(a.total_required_saving, dec!(5_000));
        assert!(a.goals_covered);
    }

    #[test]
    fn test_maturity_date_clamps_month_end() {
        let p = base_profile();
        // 2024-01-31 + 48 months = 2028-01-31
        assert_eq!(
            p.debts[0].maturity_date(),
            NaiveDate::from_ymd_opt(2028, 1, 31)
        );
        let mut d = p.debts[0].clone();
        d.term_months = Some(1);
        assert_eq!(d.maturity_date(), NaiveDate::from_ymd_opt(2024, 2, 29));
        d.term_months = None;
        assert_eq!(d.maturity_date(), None);
    }

    #[test]
    fn test_goal_without_term_needs_nothing() {
        let goal = SavingsGoal {
            kind: GoalKind::Car,
            name: "Car".into(),
            target_amount: dec!(100_000),
            term_months: 0,
            active: true,
        };
        assert_eq!(goal.required_monthly_saving(), Decimal::ZERO);
    }

    #[test]
    fn test_shortfall_warnings() {
        let mut p = base_profile();
        p.monthly_savings = dec!(1_000);
        p.debts[0].monthly_payment = dec!(20_000);
        let result = analyze_profile(&p).unwrap();
        assert!(!result.result.goals_covered);
        assert_eq!(result.warnings.len(), 2);
    }

    #[test]
    fn test_zero_income_rejected() {
        let mut p = base_profile();
        p.monthly_income = Decimal::ZERO;
        match analyze_profile(&p).unwrap_err() {
            HomeLoanError::InvalidInput { field, .. } => assert_eq!(field, "monthly_income"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_credit_score_range() {
        let mut p = base_profile();
        p.credit_score = Some(900);
        assert!(p.validate().is_err());
        p.credit_score = Some(300);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_income_overflow_is_reported() {
        let mut p = base_profile();
        p.monthly_income = Decimal::MAX;
        let err = analyze_profile(&p).unwrap_err();
        assert!(matches!(err, HomeLoanError::NumericOverflow { .. }));
    }

    #[test]
    fn test_debt_total_overflow_is_reported() {
        let mut p = base_profile();
        let mut second = p.debts[0].clone();
        p.debts[0].balance = Decimal::MAX;
        second.balance = Decimal::MAX;
        p.debts.push(second);
        let err = analyze_profile(&p).unwrap_err();
        assert!(matches!(err, HomeLoanError::NumericOverflow { .. }));
    }
}
