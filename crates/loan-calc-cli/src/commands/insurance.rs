use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_calc_core::insurance::term::{self, TermInsuranceInput};

use crate::input;

/// Arguments for term insurance premium estimation
#[derive(Args)]
pub struct TermPremiumArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Age of the life assured
    #[arg(long)]
    pub age: Option<u32>,

    /// Sum assured
    #[arg(long, alias = "cover")]
    pub cover_amount: Option<Decimal>,

    /// Policy term in years
    #[arg(long, alias = "term")]
    pub term_years: Option<u32>,
}

pub fn run_term_premium(args: TermPremiumArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let term_input: TermInsuranceInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        TermInsuranceInput {
            age: args.age
                .ok_or("--age is required (or provide --input)")?,
            cover_amount: args.cover_amount
                .ok_or("--cover-amount is required (or provide --input)")?,
            term_years: args.term_years
                .ok_or("--term-years is required (or provide --input)")?,
        }
    };

    let result = term::calculate_term_premium(&term_input)?;
    Ok(serde_json::to_value(result)?)
}
