pub mod term;

pub use term::compute_term_premium;
