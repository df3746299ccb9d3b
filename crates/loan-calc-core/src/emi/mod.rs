//! Equated monthly instalment calculators: plain reducing-balance EMI,
//! EMI after a compounding moratorium, and the month-by-month amortization
//! schedule.

pub mod moratorium;
pub mod schedule;
pub mod standard;

pub use moratorium::{compute_moratorium_emi, compute_regular_emi};
pub use standard::compute_emi;
