mod commands;
mod input;
mod output;
mod store;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::form::FormArgs;
use commands::loan::LoanArgs;
use commands::profile::ProfileArgs;
use commands::schedule::ScheduleArgs;
use commands::simulation::SimulateArgs;

/// Loan amortization and affordability calculations
#[derive(Parser)]
#[command(
    name = "hloan",
    version,
    about = "Loan amortization and affordability calculations",
    long_about = "A CLI for pricing home and auto loans with decimal precision. \
                  Computes the level monthly payment, total cost and interest, \
                  an amortization schedule, and whether the payment fits within \
                  35% of monthly capacity."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a loan and judge its affordability
    Loan(LoanArgs),
    /// Print an amortization schedule
    Schedule(ScheduleArgs),
    /// Save, load or clear the persisted calculator form
    Form(FormArgs),
    /// Summarise income, debts and savings goals
    Profile(ProfileArgs),
    /// Run a credit scenario against a financial profile
    Simulate(SimulateArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Loan(args) => commands::loan::run_loan(args),
        Commands::Schedule(args) => commands::schedule::run_schedule(args),
        Commands::Form(args) => commands::form::run_form(args),
        Commands::Profile(args) => commands::profile::run_profile(args),
        Commands::Simulate(args) => commands::simulation::run_simulate(args),
        Commands::Version => {
            println!("hloan {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            log::debug!("command failed: {e:?}");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
