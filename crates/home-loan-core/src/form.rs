//! Form adapter: turns the calculator's flat field mapping into
//! [`LoanInputs`] and back, and models the persisted slot the mapping lives
//! in between sessions.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::amortization::{compute_loan_with_config, EngineConfig, LoanInputs, LoanResult};
use crate::{ComputationOutput, HomeLoanError, HomeLoanResult};

/// Name of the single slot the calculator form is persisted under.
pub const FORM_STORAGE_SLOT: &str = "financialCalculatorData";

pub const PROPERTY_VALUE: &str = "propertyValue";
pub const DOWN_PAYMENT: &str = "downPayment";
pub const INTEREST_RATE: &str = "interestRate";
pub const LOAN_TERM: &str = "loanTerm";
pub const ADDITIONAL_COSTS: &str = "additionalCosts";
pub const MONTHLY_INCOME: &str = "monthlyIncome";
pub const MONTHLY_EXPENSES: &str = "monthlyExpenses";

pub const FIELD_NAMES: [&str; 7] = [
    PROPERTY_VALUE,
    DOWN_PAYMENT,
    INTEREST_RATE,
    LOAN_TERM,
    ADDITIONAL_COSTS,
    MONTHLY_INCOME,
    MONTHLY_EXPENSES,
];

/// A raw form value: whatever the page handed over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

/// Flat mapping of field name to raw value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormFields(pub BTreeMap<String, FieldValue>);

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: FieldValue) {
        self.0.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    /// Coerce the fields into engine inputs.
    ///
    /// Missing or unparseable fields become zero. Unknown keys are ignored.
    /// Non-finite values are rejected rather than coerced.
    pub fn to_loan_inputs(&self) -> HomeLoanResult<LoanInputs> {
        Ok(LoanInputs {
            property_value: self.decimal_or_zero(PROPERTY_VALUE)?,
            down_payment: self.decimal_or_zero(DOWN_PAYMENT)?,
            annual_interest_rate_pct: self.decimal_or_zero(INTEREST_RATE)?,
            term_years: self.decimal_or_zero(LOAN_TERM)?,
            additional_costs: self.decimal_or_zero(ADDITIONAL_COSTS)?,
            monthly_income: self.decimal_or_zero(MONTHLY_INCOME)?,
            monthly_expenses: self.decimal_or_zero(MONTHLY_EXPENSES)?,
        })
    }

    /// Text fields for persisting a set of inputs.
    pub fn from_loan_inputs(inputs: &LoanInputs) -> Self {
        let pairs = [
            (PROPERTY_VALUE, inputs.property_value),
            (DOWN_PAYMENT, inputs.down_payment),
            (INTEREST_RATE, inputs.annual_interest_rate_pct),
            (LOAN_TERM, inputs.term_years),
            (ADDITIONAL_COSTS, inputs.additional_costs),
            (MONTHLY_INCOME, inputs.monthly_income),
            (MONTHLY_EXPENSES, inputs.monthly_expenses),
        ];

        let mut fields = Self::new();
        for (name, value) in pairs {
            fields.set(name, FieldValue::Text(value.normalize().to_string()));
        }
        fields
    }

    fn decimal_or_zero(&self, name: &str) -> HomeLoanResult<Decimal> {
        match self.0.get(name) {
            None => Ok(Decimal::ZERO),
            Some(FieldValue::Number(n)) => number_to_decimal(name, *n),
            Some(FieldValue::Text(text)) => Ok(parse_leading_number(name, text)?.unwrap_or_default()),
        }
    }
}

/// Persisted form state, keyed by slot name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormStore(pub BTreeMap<String, FormFields>);

impl FormStore {
    pub fn save(&mut self, fields: FormFields) {
        self.0.insert(FORM_STORAGE_SLOT.to_string(), fields);
    }

    pub fn load(&self) -> Option<&FormFields> {
        self.0.get(FORM_STORAGE_SLOT)
    }

    pub fn clear(&mut self) -> Option<FormFields> {
        self.0.remove(FORM_STORAGE_SLOT)
    }
}

/// Coerce a form and run the amortization engine on it.
pub fn compute_loan_from_form(
    fields: &FormFields,
    config: &EngineConfig,
) -> HomeLoanResult<ComputationOutput<LoanResult>> {
    let inputs = fields.to_loan_inputs()?;
    compute_loan_with_config(&inputs, config)
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn number_to_decimal(field: &str, value: f64) -> HomeLoanResult<Decimal> {
    if !value.is_finite() {
        return Err(non_finite(field));
    }
    Decimal::from_f64(value).ok_or_else(|| out_of_range(field))
}

/// Read the longest numeric prefix of `text` the way a browser's
/// `parseFloat` would. `Ok(None)` when there is no number at all.
fn parse_leading_number(field: &str, text: &str) -> HomeLoanResult<Option<Decimal>> {
    let trimmed = text.trim_start();
    let unsigned = trimmed.trim_start_matches(['+', '-']);
    if unsigned.len() + 1 < trimmed.len() {
        // more than one sign character
        return Ok(None);
    }
    if unsigned.starts_with("Infinity") {
        return Err(non_finite(field));
    }

    let bytes = trimmed.as_bytes();
    let mut end = trimmed.len() - unsigned.len();
    let mut digits = 0usize;

    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        digits += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        return Ok(None);
    }

    let mantissa_end = end;
    let mut exponent_end = None;
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut cursor = end + 1;
        if cursor < bytes.len() && (bytes[cursor] == b'+' || bytes[cursor] == b'-') {
            cursor += 1;
        }
        let exp_start = cursor;
        while cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
            cursor += 1;
        }
        if cursor > exp_start {
            exponent_end = Some(cursor);
        }
    }

    let mantissa = normalise_mantissa(&trimmed[..mantissa_end]);
    let parsed = match exponent_end {
        None => Decimal::from_str(&mantissa),
        Some(exp_end) => {
            let exponent = trimmed[mantissa_end..exp_end].to_ascii_lowercase();
            Decimal::from_scientific(&format!("{mantissa}{exponent}"))
        }
    };

    parsed.map(Some).map_err(|_| out_of_range(field))
}

/// "-.5" -> "-0.5", "7." -> "7"
fn normalise_mantissa(raw: &str) -> String {
    let (sign, body) = match raw.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", raw.strip_prefix('+').unwrap_or(raw)),
    };
    let body = body.strip_suffix('.').unwrap_or(body);
    if body.starts_with('.') {
        format!("{sign}0{body}")
    } else {
        format!("{sign}{body}")
    }
}

fn non_finite(field: &str) -> HomeLoanError {
    HomeLoanError::InvalidInput {
        field: field.into(),
        reason: "Value must be a finite number.".into(),
    }
}

fn out_of_range(field: &str) -> HomeLoanError {
    HomeLoanError::InvalidInput {
        field: field.into(),
        reason: "Value is outside the representable decimal range.".into(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
