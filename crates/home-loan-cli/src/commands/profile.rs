use clap::Args;
use serde_json::Value;

use home_loan_core::profile::{self, FinancialProfile};

use crate::input;

#[derive(Args)]
pub struct ProfileArgs {
    /// Path to JSON/YAML profile (income, expenses, debts, goals)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_profile(args: ProfileArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let profile_input: FinancialProfile = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("--input <file.json> or stdin required for profile analysis".into());
    };
    let result = profile::analyze_profile(&profile_input)?;
    Ok(serde_json::to_value(result)?)
}
