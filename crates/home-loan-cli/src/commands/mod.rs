pub mod form;
pub mod loan;
pub mod profile;
pub mod schedule;
pub mod simulation;

use home_loan_core::amortization::{EngineConfig, ScheduleLength};
use rust_decimal::Decimal;

use crate::input;

/// Build the engine configuration from an optional file plus flag overrides.
pub fn engine_config(
    path: Option<&str>,
    max_payment_ratio: Option<Decimal>,
    full_schedule: bool,
) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    let mut config: EngineConfig = match path {
        Some(p) => input::file::read_input(p)?,
        None => EngineConfig::default(),
    };
    if let Some(ratio) = max_payment_ratio {
        config.max_payment_ratio = ratio;
    }
    if full_schedule {
        config.schedule_length = ScheduleLength::Full;
    }
    Ok(config)
}
