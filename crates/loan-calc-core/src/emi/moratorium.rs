//! EMI after a moratorium during which no payments are made and interest
//! compounds monthly onto the principal.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::LoanCalcError;
use crate::time_value::{annuity_payment, checked_mul, compound_factor, monthly_rate};
use crate::types::{round_currency, with_metadata, ComputationOutput, Money, Rate};
use crate::LoanCalcResult;

use super::standard::{compute_emi, validate_loan};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// What to do when the moratorium leaves no repayment months.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoratoriumPolicy {
    /// Repay over `max(1, tenure - moratorium)` months and emit a warning.
    #[default]
    Clamp,
    /// Reject `moratorium_months >= tenure_months` as invalid input.
    Strict,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoratoriumInput {
    pub principal: Money,
    /// Annual interest rate in percent.
    pub annual_rate_percent: Rate,
    /// Total loan term including the moratorium.
    pub tenure_months: u32,
    pub moratorium_months: u32,
    #[serde(default)]
    pub policy: MoratoriumPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoratoriumOutput {
    /// principal * (1+r)^moratorium_months, unrounded.
    pub compounded_principal: Money,
    /// Interest added to the balance during the moratorium, rounded.
    pub interest_capitalised: Money,
    pub remaining_tenure_months: u32,
    /// True when the remaining tenure was forced up to one month.
    pub tenure_clamped: bool,
    pub emi_after_moratorium: Money,
    /// EMI over the full tenure with no moratorium.
    pub regular_emi: Money,
    /// Monthly cost of deferring: emi_after_moratorium - regular_emi.
    pub extra_cost: Money,
    /// emi_after_moratorium * remaining_tenure_months
    pub total_payable: Money,
    /// total_payable - regular_emi * tenure_months
    pub total_extra_cost: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// EMI payable once the moratorium ends, using the clamp policy.
pub fn compute_moratorium_emi(
    principal: Money,
    annual_rate_percent: Rate,
    tenure_months: u32,
    moratorium_months: u32,
) -> LoanCalcResult<Money> {
    let input = MoratoriumInput {
        principal,
        annual_rate_percent,
        tenure_months,
        moratorium_months,
        policy: MoratoriumPolicy::Clamp,
    };
    Ok(compute_moratorium(&input)?.emi_after_moratorium)
}

/// EMI on the same loan with no moratorium, for comparison.
pub fn compute_regular_emi(principal: Money, annual_rate_percent: Rate, tenure_months: u32) -> LoanCalcResult<Money> {
    compute_emi(principal, annual_rate_percent, tenure_months)
}

/// Full moratorium breakdown under the input's policy.
pub fn compute_moratorium(input: &MoratoriumInput) -> LoanCalcResult<MoratoriumOutput> {
    validate_loan(input.principal, input.annual_rate_percent, input.tenure_months)?;

    let (remaining, clamped) = remaining_tenure(input)?;
    let r = monthly_rate(input.annual_rate_percent);

    let compounded = checked_mul(
        input.principal,
        compound_factor(r, input.moratorium_months)?,
        "compounded principal",
    )?;

    let emi_after = round_currency(annuity_payment(compounded, r, remaining)?);
    let regular = compute_emi(input.principal, input.annual_rate_percent, input.tenure_months)?;
    let total_payable = checked_mul(emi_after, Decimal::from(remaining), "total payable after moratorium")?;
    let regular_total = checked_mul(regular, Decimal::from(input.tenure_months), "total payable without moratorium")?;

    if clamped {
        log::warn!(
            "moratorium of {}m consumes tenure of {}m; repaying over 1 month",
            input.moratorium_months,
            input.tenure_months
        );
    }
    log::debug!(
        "moratorium: principal={} compounded={} remaining={}m emi={} regular={}",
        input.principal,
        compounded,
        remaining,
        emi_after,
        regular
    );

    Ok(MoratoriumOutput {
        compounded_principal: compounded,
        interest_capitalised: round_currency(compounded - input.principal),
        remaining_tenure_months: remaining,
        tenure_clamped: clamped,
        emi_after_moratorium: emi_after,
        regular_emi: regular,
        extra_cost: emi_after - regular,
        total_payable,
        total_extra_cost: total_payable - regular_total,
    })
}

/// Moratorium breakdown wrapped in the standard output envelope.
pub fn calculate_moratorium_emi(input: &MoratoriumInput) -> LoanCalcResult<ComputationOutput<MoratoriumOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let output = compute_moratorium(input)?;
    if output.tenure_clamped {
        warnings.push(format!(
            "Moratorium of {} months leaves no repayment period within a {}-month tenure; \
             remaining tenure clamped to 1 month",
            input.moratorium_months, input.tenure_months
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Moratorium EMI: P*(1+r)^m amortised over max(1, n - m) months",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn remaining_tenure(input: &MoratoriumInput) -> LoanCalcResult<(u32, bool)> {
    if input.moratorium_months < input.tenure_months {
        return Ok((input.tenure_months - input.moratorium_months, false));
    }

    match input.policy {
        MoratoriumPolicy::Clamp => Ok((1, true)),
        MoratoriumPolicy::Strict => Err(LoanCalcError::InvalidInput {
            field: "moratorium_months".into(),
            reason: format!(
                "Moratorium ({} months) must be shorter than the tenure ({} months).",
                input.moratorium_months, input.tenure_months
            ),
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
