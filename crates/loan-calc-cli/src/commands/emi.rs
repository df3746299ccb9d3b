use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_calc_core::emi::moratorium::{self, MoratoriumInput, MoratoriumPolicy};
use loan_calc_core::emi::schedule::{self, ScheduleInput};
use loan_calc_core::emi::standard::{self, EmiInput};

use crate::input;

/// Arguments for EMI calculation
#[derive(Args)]
pub struct EmiArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan amount
    #[arg(long, alias = "amount")]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 9.5)
    #[arg(long, alias = "rate")]
    pub annual_rate_percent: Option<Decimal>,

    /// Tenure in months
    #[arg(long, alias = "months")]
    pub tenure_months: Option<u32>,
}

/// Arguments for moratorium EMI calculation
#[derive(Args)]
pub struct MoratoriumArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan amount
    #[arg(long, alias = "amount")]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 9.5)
    #[arg(long, alias = "rate")]
    pub annual_rate_percent: Option<Decimal>,

    /// Total tenure in months, including the moratorium
    #[arg(long, alias = "months")]
    pub tenure_months: Option<u32>,

    /// Months with no payments
    #[arg(long)]
    pub moratorium_months: Option<u32>,

    /// Reject a moratorium that covers the whole tenure instead of clamping
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for amortization schedule generation
#[derive(Args)]
pub struct ScheduleArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan amount
    #[arg(long, alias = "amount")]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 9.5)
    #[arg(long, alias = "rate")]
    pub annual_rate_percent: Option<Decimal>,

    /// Tenure in months
    #[arg(long, alias = "months")]
    pub tenure_months: Option<u32>,

    /// Leading months with no payments
    #[arg(long, default_value_t = 0)]
    pub moratorium_months: u32,

    /// Disbursement date (YYYY-MM-DD); dates each instalment
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Print yearly totals instead of every month
    #[arg(long)]
    pub yearly: bool,
}

pub fn run_emi(args: EmiArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let emi_input: EmiInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        EmiInput {
            principal: args.principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate_percent: args.annual_rate_percent
                .ok_or("--annual-rate-percent is required (or provide --input)")?,
            tenure_months: args.tenure_months
                .ok_or("--tenure-months is required (or provide --input)")?,
        }
    };

    let result = standard::calculate_emi(&emi_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_moratorium(args: MoratoriumArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mor_input: MoratoriumInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        MoratoriumInput {
            principal: args.principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate_percent: args.annual_rate_percent
                .ok_or("--annual-rate-percent is required (or provide --input)")?,
            tenure_months: args.tenure_months
                .ok_or("--tenure-months is required (or provide --input)")?,
            moratorium_months: args.moratorium_months
                .ok_or("--moratorium-months is required (or provide --input)")?,
            policy: if args.strict {
                MoratoriumPolicy::Strict
            } else {
                MoratoriumPolicy::Clamp
            },
        }
    };

    let result = moratorium::calculate_moratorium_emi(&mor_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let sched_input: ScheduleInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        ScheduleInput {
            principal: args.principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate_percent: args.annual_rate_percent
                .ok_or("--annual-rate-percent is required (or provide --input)")?,
            tenure_months: args.tenure_months
                .ok_or("--tenure-months is required (or provide --input)")?,
            moratorium_months: args.moratorium_months,
            start_date: args.start_date,
        }
    };

    let result = schedule::generate_schedule(&sched_input)?;
    let rows = if args.yearly {
        serde_json::to_value(&result.result.yearly)?
    } else {
        serde_json::to_value(&result.result.rows)?
    };

    // "results" is rendered row-per-entry by the table and CSV writers.
    Ok(serde_json::json!({
        "emi": result.result.emi,
        "total_payments": result.result.total_payments,
        "total_interest": result.result.total_interest,
        "results": rows,
        "methodology": result.methodology,
        "warnings": result.warnings,
    }))
}
