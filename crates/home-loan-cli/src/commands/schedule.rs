use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use home_loan_core::amortization::{build_schedule_with_limit, ScheduleLength, PREVIEW_MONTHS};
use home_loan_core::time_value;

/// Arguments for a standalone amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    /// Amount financed
    #[arg(long)]
    pub loan_amount: Decimal,

    /// Annual interest rate in percent (10 = 10%)
    #[arg(long, alias = "rate")]
    pub interest_rate: Decimal,

    /// Loan term in years
    #[arg(long, alias = "term")]
    pub term_years: Decimal,

    /// Monthly payment (defaults to the level payment for the loan)
    #[arg(long)]
    pub payment: Option<Decimal>,

    /// Number of leading months to show
    #[arg(long, default_value_t = PREVIEW_MONTHS, conflicts_with = "full")]
    pub months: u32,

    /// Show every month of the term
    #[arg(long)]
    pub full: bool,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let monthly_rate = time_value::monthly_rate(args.interest_rate);
    let number_of_payments = time_value::number_of_payments(args.term_years)?;
    let payment = match args.payment {
        Some(p) => p,
        None => time_value::level_payment(monthly_rate, number_of_payments, args.loan_amount)?,
    };
    let limit = ScheduleLength::from_flags(args.full, Some(args.months)).limit();

    let rows = build_schedule_with_limit(
        args.loan_amount,
        monthly_rate,
        number_of_payments,
        payment,
        limit,
    )?;
    Ok(serde_json::to_value(rows)?)
}
