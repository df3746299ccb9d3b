use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::LoanCalcError;
use crate::time_value::{annuity_payment, checked_div, checked_mul, monthly_rate};
use crate::types::{round_currency, round_to, with_metadata, ComputationOutput, Money, Rate};
use crate::LoanCalcResult;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmiInput {
    /// Amount borrowed, in whole currency units.
    pub principal: Money,
    /// Annual interest rate in percent (9.5 = 9.5% p.a.).
    pub annual_rate_percent: Rate,
    pub tenure_months: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmiOutput {
    /// Monthly fractional rate, annual_rate_percent / 1200.
    pub monthly_rate: Decimal,
    /// Instalment rounded to whole currency units.
    pub emi: Money,
    /// emi * tenure_months
    pub total_payable: Money,
    /// total_payable - principal
    pub total_interest: Money,
    /// Total interest as a percentage of principal, 2 dp.
    pub interest_to_principal_pct: Decimal,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Reducing-balance EMI rounded to whole currency units.
///
/// EMI = P * r * (1+r)^n / ((1+r)^n - 1) with r = annual% / 1200, or
/// P / n when the rate is zero.
pub fn compute_emi(principal: Money, annual_rate_percent: Rate, tenure_months: u32) -> LoanCalcResult<Money> {
    validate_loan(principal, annual_rate_percent, tenure_months)?;
    let raw = annuity_payment(principal, monthly_rate(annual_rate_percent), tenure_months)?;
    Ok(round_currency(raw))
}

/// EMI with the derived totals.
pub fn compute_emi_breakdown(input: &EmiInput) -> LoanCalcResult<EmiOutput> {
    let emi = compute_emi(input.principal, input.annual_rate_percent, input.tenure_months)?;
    let total_payable = checked_mul(emi, Decimal::from(input.tenure_months), "total payable")?;
    let total_interest = total_payable - input.principal;

    log::debug!(
        "emi: principal={} rate={}% tenure={}m -> emi={}",
        input.principal,
        input.annual_rate_percent,
        input.tenure_months,
        emi
    );

    let interest_ratio = checked_div(total_interest, input.principal, "interest to principal ratio")?;

    Ok(EmiOutput {
        monthly_rate: monthly_rate(input.annual_rate_percent),
        emi,
        total_payable,
        total_interest,
        interest_to_principal_pct: round_to(checked_mul(interest_ratio, dec!(100), "interest to principal percent")?, 2),
    })
}

/// Calculate the EMI and totals, wrapped in the standard output envelope.
pub fn calculate_emi(input: &EmiInput) -> LoanCalcResult<ComputationOutput<EmiOutput>> {
    let start = Instant::now();
    let output = compute_emi_breakdown(input)?;
    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Reducing-balance EMI: P*r*(1+r)^n / ((1+r)^n - 1)",
        input,
        Vec::new(),
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub(crate) fn validate_loan(principal: Money, annual_rate_percent: Rate, tenure_months: u32) -> LoanCalcResult<()> {
    if principal <= Decimal::ZERO {
        return Err(LoanCalcError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must be positive.".into(),
        });
    }
    if annual_rate_percent < Decimal::ZERO {
        return Err(LoanCalcError::InvalidInput {
            field: "annual_rate_percent".into(),
            reason: "Interest rate cannot be negative.".into(),
        });
    }
    if tenure_months == 0 {
        return Err(LoanCalcError::InvalidInput {
            field: "tenure_months".into(),
            reason: "Tenure must be at least one month.".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
