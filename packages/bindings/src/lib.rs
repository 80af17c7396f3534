use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use home_loan_core::amortization::{
    self, AmortizationRow, EngineConfig, LoanInputs, ScheduleLength,
};
use home_loan_core::form::{self, FormFields};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Optional engine configuration as JSON; empty or absent means defaults.
fn parse_config(config_json: Option<String>) -> NapiResult<EngineConfig> {
    match config_json {
        Some(json) if !json.trim().is_empty() => {
            let config: EngineConfig = serde_json::from_str(&json).map_err(to_napi_error)?;
            config.validate().map_err(to_napi_error)?;
            Ok(config)
        }
        _ => Ok(EngineConfig::default()),
    }
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_loan(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    let input: LoanInputs = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let config = parse_config(config_json)?;
    let output =
        amortization::compute_loan_with_config(&input, &config).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compute_loan_from_form(
    fields_json: String,
    config_json: Option<String>,
) -> NapiResult<String> {
    let fields: FormFields = serde_json::from_str(&fields_json).map_err(to_napi_error)?;
    let config = parse_config(config_json)?;
    let output = form::compute_loan_from_form(&fields, &config).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct ScheduleRequest {
    loan_amount: Decimal,
    monthly_rate: Decimal,
    number_of_payments: Decimal,
    monthly_payment: Decimal,
    /// Leading months to return; the twelve month preview when absent.
    #[serde(default)]
    months: Option<u32>,
    /// Every month of the term; takes precedence over `months`.
    #[serde(default)]
    full: bool,
}

#[napi]
pub fn build_schedule(input_json: String) -> NapiResult<String> {
    let req: ScheduleRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let rows: Vec<AmortizationRow> = amortization::build_schedule_with_limit(
        req.loan_amount,
        req.monthly_rate,
        req.number_of_payments,
        req.monthly_payment,
        ScheduleLength::from_flags(req.full, req.months).limit(),
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&rows).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Profile and simulation
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_profile(input_json: String) -> NapiResult<String> {
    let input: home_loan_core::profile::FinancialProfile =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = home_loan_core::profile::analyze_profile(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn simulate_credit(input_json: String) -> NapiResult<String> {
    let input: home_loan_core::simulation::SimulationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = home_loan_core::simulation::simulate_credit(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
