pub mod error;
pub mod format;
pub mod time_value;
pub mod types;

#[cfg(feature = "emi")]
pub mod emi;

#[cfg(feature = "insurance")]
pub mod insurance;

#[cfg(feature = "eligibility")]
pub mod eligibility;

pub use error::LoanCalcError;
pub use types::*;

/// Standard result type for all loan-calc operations
pub type LoanCalcResult<T> = Result<T, LoanCalcError>;
