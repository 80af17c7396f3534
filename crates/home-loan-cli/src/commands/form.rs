use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use serde_json::Value;

use home_loan_core::form::{self, FormFields, FIELD_NAMES, FORM_STORAGE_SLOT};

use super::loan::LoanFieldArgs;
use crate::store;

#[derive(Args)]
pub struct FormArgs {
    #[command(subcommand)]
    pub action: FormAction,
}

#[derive(Subcommand)]
pub enum FormAction {
    /// Write the calculator fields to the store
    Save {
        /// Path to the form store file
        #[arg(long)]
        store: String,

        #[command(flatten)]
        fields: LoanFieldArgs,
    },
    /// Recalculate from the fields saved in the store
    Load {
        /// Path to the form store file
        #[arg(long)]
        store: String,

        /// Path to JSON/YAML engine configuration
        #[arg(long)]
        config: Option<String>,

        /// Share of monthly capacity a payment may take (0.35 = 35%)
        #[arg(long)]
        max_payment_ratio: Option<Decimal>,

        /// Return every month instead of the first twelve
        #[arg(long)]
        full_schedule: bool,
    },
    /// Remove the saved fields from the store
    Clear {
        /// Path to the form store file
        #[arg(long)]
        store: String,
    },
}

pub fn run_form(args: FormArgs) -> Result<Value, Box<dyn std::error::Error>> {
    match args.action {
        FormAction::Save { store: path, fields } => {
            let saved = FormFields::from_loan_inputs(&fields.to_inputs());
            let mut form_store = store::read_store(&path)?;
            form_store.save(saved.clone());
            store::write_store(&path, &form_store)?;
            Ok(serde_json::json!({ "slot": FORM_STORAGE_SLOT, "fields": saved }))
        }
        FormAction::Load {
            store: path,
            config,
            max_payment_ratio,
            full_schedule,
        } => {
            let form_store = store::read_store(&path)?;
            let fields = form_store
                .load()
                .ok_or_else(|| format!("No saved form in '{path}' (slot {FORM_STORAGE_SLOT})"))?;
            let missing: Vec<&str> = FIELD_NAMES
                .iter()
                .copied()
                .filter(|name| fields.get(name).is_none())
                .collect();
            if !missing.is_empty() {
                log::info!("saved form lacks {}; treating as zero", missing.join(", "));
            }

            let config = super::engine_config(config.as_deref(), max_payment_ratio, full_schedule)?;
            let result = form::compute_loan_from_form(fields, &config)?;
            Ok(serde_json::to_value(result)?)
        }
        FormAction::Clear { store: path } => {
            let mut form_store = store::read_store(&path)?;
            let removed = form_store.clear().is_some();
            store::write_store(&path, &form_store)?;
            Ok(serde_json::json!({ "slot": FORM_STORAGE_SLOT, "cleared": removed }))
        }
    }
}
