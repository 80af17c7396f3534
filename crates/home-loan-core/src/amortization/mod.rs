//! Amortization engine: level monthly payment, totals, affordability verdict
//! and a month-by-month balance schedule.

pub mod affordability;
pub mod config;
pub mod engine;
pub mod schedule;

pub use affordability::{assess_affordability, Affordability, DEFAULT_MAX_PAYMENT_RATIO};
pub use config::{EngineConfig, ScheduleLength};
pub use engine::{compute_loan, compute_loan_with_config, LoanInputs, LoanResult};
pub use schedule::{build_schedule, build_schedule_with_limit, AmortizationRow, PREVIEW_MONTHS};
