//! Home-loan eligibility from income, existing obligations and age.

pub mod affordability;
pub mod policy;

pub use affordability::compute_eligibility;
pub use policy::EligibilityPolicy;
