use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::affordability::DEFAULT_MAX_PAYMENT_RATIO;
use super::schedule::{MAX_SCHEDULE_MONTHS, PREVIEW_MONTHS};
use crate::types::Rate;
use crate::{HomeLoanError, HomeLoanResult};

/// How many schedule rows a computation returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleLength {
    /// At most this many leading months.
    Preview { months: u32 },
    /// Every whole payment of the term.
    Full,
}

impl Default for ScheduleLength {
    fn default() -> Self {
        ScheduleLength::Preview {
            months: PREVIEW_MONTHS,
        }
    }
}

impl ScheduleLength {
    /// `full` wins over `months`; neither gives the default preview.
    pub fn from_flags(full: bool, months: Option<u32>) -> Self {
        match (full, months) {
            (true, _) => ScheduleLength::Full,
            (false, Some(months)) => ScheduleLength::Preview { months },
            (false, None) => ScheduleLength::default(),
        }
    }

    pub fn limit(&self) -> Option<u32> {
        match self {
            ScheduleLength::Preview { months } => Some(*months),
            ScheduleLength::Full => None,
        }
    }
}

/// Tunables for the amortization engine. Every field has a default so a
/// partial JSON/YAML document is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Share of monthly capacity a payment may take (0.35 = 35%).
    #[serde(default = "default_max_payment_ratio")]
    pub max_payment_ratio: Rate,

    #[serde(default)]
    pub schedule_length: ScheduleLength,
}

fn default_max_payment_ratio() -> Rate {
    DEFAULT_MAX_PAYMENT_RATIO
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_payment_ratio: DEFAULT_MAX_PAYMENT_RATIO,
            schedule_length: ScheduleLength::default(),
        }
    }
}

impl EngineConfig {
    pub fn full_schedule() -> Self {
        Self {
            schedule_length: ScheduleLength::Full,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> HomeLoanResult<()> {
        if self.max_payment_ratio < Decimal::ZERO {
            return Err(HomeLoanError::InvalidInput {
                field: "max_payment_ratio".into(),
                reason: "Payment ratio cannot be negative".into(),
            });
        }
        if let ScheduleLength::Preview { months } = self.schedule_length {
            if months > MAX_SCHEDULE_MONTHS {
                return Err(HomeLoanError::InvalidInput {
                    field: "schedule_length".into(),
                    reason: format!("Preview is limited to {MAX_SCHEDULE_MONTHS} months"),
                });
            }
        }
        Ok(())
    }
}
