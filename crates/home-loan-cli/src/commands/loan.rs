use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use home_loan_core::amortization::{self, LoanInputs};
use home_loan_core::form::FormFields;

use crate::{input, store};

/// The seven calculator fields. Omitted flags are zero.
#[derive(Args, Debug, Default)]
pub struct LoanFieldArgs {
    /// Property value
    #[arg(long)]
    pub property_value: Option<Decimal>,

    /// Down payment amount
    #[arg(long)]
    pub down_payment: Option<Decimal>,

    /// Annual interest rate in percent (10 = 10%)
    #[arg(long, alias = "rate")]
    pub interest_rate: Option<Decimal>,

    /// Loan term in years
    #[arg(long, alias = "term")]
    pub term_years: Option<Decimal>,

    /// One-time costs (insurance, notary, ...)
    #[arg(long)]
    pub additional_costs: Option<Decimal>,

    /// Monthly income
    #[arg(long, alias = "income")]
    pub monthly_income: Option<Decimal>,

    /// Monthly expenses
    #[arg(long, alias = "expenses")]
    pub monthly_expenses: Option<Decimal>,
}

impl LoanFieldArgs {
    pub fn to_inputs(&self) -> LoanInputs {
        LoanInputs {
            property_value: self.property_value.unwrap_or_default(),
            down_payment: self.down_payment.unwrap_or_default(),
            annual_interest_rate_pct: self.interest_rate.unwrap_or_default(),
            term_years: self.term_years.unwrap_or_default(),
            additional_costs: self.additional_costs.unwrap_or_default(),
            monthly_income: self.monthly_income.unwrap_or_default(),
            monthly_expenses: self.monthly_expenses.unwrap_or_default(),
        }
    }
}

/// Arguments for loan pricing
#[derive(Args)]
pub struct LoanArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Path to JSON/YAML engine configuration
    #[arg(long)]
    pub config: Option<String>,

    /// Share of monthly capacity a payment may take (0.35 = 35%)
    #[arg(long)]
    pub max_payment_ratio: Option<Decimal>,

    /// Return every month instead of the first twelve
    #[arg(long)]
    pub full_schedule: bool,

    /// Persist the inputs to this form store after a successful calculation
    #[arg(long)]
    pub save: Option<String>,

    #[command(flatten)]
    pub fields: LoanFieldArgs,
}

pub fn run_loan(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan_input: LoanInputs = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        args.fields.to_inputs()
    };

    let config = super::engine_config(
        args.config.as_deref(),
        args.max_payment_ratio,
        args.full_schedule,
    )?;
    let result = amortization::compute_loan_with_config(&loan_input, &config)?;

    if let Some(ref path) = args.save {
        let mut form_store = store::read_store(path)?;
        form_store.save(FormFields::from_loan_inputs(&loan_input));
        store::write_store(path, &form_store)?;
    }

    Ok(serde_json::to_value(result)?)
}
