use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use loan_calc_core::eligibility::affordability::{self, EligibilityInput};
use loan_calc_core::eligibility::EligibilityPolicy;
use loan_calc_core::EmploymentType;

use crate::input;

#[derive(Debug, Clone, ValueEnum)]
pub enum Employment {
    Salaried,
    SelfEmployed,
}

impl From<Employment> for EmploymentType {
    fn from(e: Employment) -> Self {
        match e {
            Employment::Salaried => EmploymentType::Salaried,
            Employment::SelfEmployed => EmploymentType::SelfEmployed,
        }
    }
}

/// Arguments for loan eligibility calculation
#[derive(Args)]
pub struct EligibilityArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Net monthly income
    #[arg(long, alias = "income")]
    pub monthly_income: Option<Decimal>,

    /// EMIs already being paid each month
    #[arg(long, alias = "existing-emi", default_value = "0")]
    pub existing_monthly_emi: Decimal,

    /// Applicant age in years
    #[arg(long)]
    pub age: Option<u32>,

    /// Employment type
    #[arg(long, alias = "employment", value_enum, default_value = "salaried")]
    pub employment_type: Employment,

    /// Annual interest rate in percent (e.g. 9.5)
    #[arg(long, alias = "rate")]
    pub annual_rate_percent: Option<Decimal>,

    /// Desired tenure in years
    #[arg(long, alias = "tenure-years")]
    pub desired_tenure_years: Option<u32>,
}

pub fn run_eligibility(args: EligibilityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let elig_input: EligibilityInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        EligibilityInput {
            monthly_income: args.monthly_income
                .ok_or("--monthly-income is required (or provide --input)")?,
            existing_monthly_emi: args.existing_monthly_emi,
            age: args.age
                .ok_or("--age is required (or provide --input)")?,
            employment_type: args.employment_type.into(),
            annual_rate_percent: args.annual_rate_percent
                .ok_or("--annual-rate-percent is required (or provide --input)")?,
            desired_tenure_years: args.desired_tenure_years
                .ok_or("--desired-tenure-years is required (or provide --input)")?,
            policy: EligibilityPolicy::default(),
        }
    };

    let result = affordability::calculate_eligibility(&elig_input)?;
    Ok(serde_json::to_value(result)?)
}
