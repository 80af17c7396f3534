pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;
use std::str::FromStr;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Render a scalar for the human-facing formats. Money amounts are shown
/// to the cent; rates, ratios and percentages keep full precision.
pub(crate) fn display_scalar(key: &str, value: &Value) -> String {
    match value {
        Value::String(s) if !keeps_precision(key) => match Decimal::from_str(s) {
            Ok(d) => d
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
                .to_string(),
            Err(_) => s.clone(),
        },
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

fn keeps_precision(key: &str) -> bool {
    ["rate", "ratio", "pct", "number_of_payments", "credit_score"]
        .iter()
        .any(|marker| key.contains(marker))
}
