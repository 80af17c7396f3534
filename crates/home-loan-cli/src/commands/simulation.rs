use clap::Args;
use serde_json::Value;

use home_loan_core::simulation::{self, SimulationInput};

use crate::input;

#[derive(Args)]
pub struct SimulateArgs {
    /// Path to JSON/YAML input holding `profile` and `simulation`
    #[arg(long)]
    pub input: Option<String>,

    /// Return every month instead of the first twelve
    #[arg(long)]
    pub full_schedule: bool,
}

pub fn run_simulate(args: SimulateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut sim_input: SimulationInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("--input <file.json> or stdin required for credit simulation".into());
    };
    if args.full_schedule {
        sim_input.full_schedule = true;
    }
    let result = simulation::simulate_credit(&sim_input)?;
    Ok(serde_json::to_value(result)?)
}
