pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "amortization")]
pub mod amortization;

#[cfg(feature = "amortization")]
pub mod form;

#[cfg(feature = "profile")]
pub mod profile;

#[cfg(feature = "simulation")]
pub mod simulation;

pub use error::HomeLoanError;
pub use types::*;

/// Standard result type for all home-loan operations
pub type HomeLoanResult<T> = Result<T, HomeLoanError>;
