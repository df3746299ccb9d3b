use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::LoanCalcError;
use crate::time_value::{annuity_present_value, checked_div, checked_mul, monthly_rate};
use crate::types::{round_currency, round_to, with_metadata, ComputationOutput, EmploymentType, Money, Rate, Ratio};
use crate::LoanCalcResult;

use super::policy::EligibilityPolicy;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EligibilityInput {
    /// Net monthly income.
    pub monthly_income: Money,
    /// EMIs already being paid on other loans.
    pub existing_monthly_emi: Money,
    pub age: u32,
    pub employment_type: EmploymentType,
    /// Annual interest rate in percent.
    pub annual_rate_percent: Rate,
    pub desired_tenure_years: u32,
    #[serde(default)]
    pub policy: EligibilityPolicy,
}

/// Expected business outcomes that yield zero eligibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IneligibilityReason {
    /// Applicant is at or past retirement age, so no tenure is available.
    TenureExceedsRetirement,
    /// Existing EMIs already use the whole FOIR allowance.
    NoAffordabilityHeadroom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityResult {
    /// EMI the applicant can take on, zero when ineligible.
    pub affordable_emi: Money,
    /// Largest loan the affordable EMI services, rounded to whole units.
    pub eligible_loan_amount: Money,
    /// (existing + affordable EMI) / income * 100, 2 dp.
    pub post_debt_to_income_ratio_percent: Decimal,
    /// Tenure the eligible amount is computed over; zero when ineligible.
    pub approved_tenure_years: u32,
    pub retirement_age: u32,
    /// min(max(retirement_age - age, 0), policy cap)
    pub max_tenure_years: u32,
    pub foir: Ratio,
    pub monthly_rate: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_reason: Option<IneligibilityReason>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Maximum affordable loan from income, obligations, age-capped tenure and
/// the employment-based FOIR.
pub fn compute_eligibility(input: &EligibilityInput) -> LoanCalcResult<EligibilityResult> {
    validate_input(input)?;

    let policy = &input.policy;
    let retirement_age = policy.retirement_age(input.employment_type);
    let max_tenure_years = retirement_age
        .saturating_sub(input.age)
        .min(policy.max_tenure_years);
    let used_tenure_years = input.desired_tenure_years.min(max_tenure_years);

    let foir = policy.foir(input.employment_type);
    let headroom = (input.monthly_income * foir - input.existing_monthly_emi).max(Decimal::ZERO);
    let r = monthly_rate(input.annual_rate_percent);

    let ineligible = |reason: IneligibilityReason| -> LoanCalcResult<EligibilityResult> {
        Ok(EligibilityResult {
            affordable_emi: Decimal::ZERO,
            eligible_loan_amount: Decimal::ZERO,
            post_debt_to_income_ratio_percent: dti_percent(input.existing_monthly_emi, input.monthly_income)?,
            approved_tenure_years: 0,
            retirement_age,
            max_tenure_years,
            foir,
            monthly_rate: r,
            error_reason: Some(reason),
        })
    };

    if used_tenure_years == 0 {
        log::debug!(
            "eligibility: age {} leaves no tenure before retirement at {}",
            input.age,
            retirement_age
        );
        return ineligible(IneligibilityReason::TenureExceedsRetirement);
    }
    if headroom <= Decimal::ZERO {
        log::debug!(
            "eligibility: existing EMI {} exhausts FOIR {} of income {}",
            input.existing_monthly_emi,
            foir,
            input.monthly_income
        );
        return ineligible(IneligibilityReason::NoAffordabilityHeadroom);
    }

    let months = used_tenure_years
        .checked_mul(12)
        .ok_or_else(|| LoanCalcError::Overflow {
            context: format!("tenure of {used_tenure_years} years in months"),
        })?;
    let eligible = round_currency(annuity_present_value(headroom, r, months)?);

    log::debug!(
        "eligibility: headroom={} over {}m at {}% -> {}",
        headroom,
        months,
        input.annual_rate_percent,
        eligible
    );

    Ok(EligibilityResult {
        affordable_emi: headroom,
        eligible_loan_amount: eligible,
        post_debt_to_income_ratio_percent: dti_percent(
            input.existing_monthly_emi + headroom,
            input.monthly_income,
        )?,
        approved_tenure_years: used_tenure_years,
        retirement_age,
        max_tenure_years,
        foir,
        monthly_rate: r,
        error_reason: None,
    })
}

/// Eligibility wrapped in the standard output envelope.
pub fn calculate_eligibility(input: &EligibilityInput) -> LoanCalcResult<ComputationOutput<EligibilityResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let output = compute_eligibility(input)?;

    if output.error_reason.is_none() && output.approved_tenure_years < input.desired_tenure_years {
        warnings.push(format!(
            "Desired tenure of {} years reduced to {} years (retirement age {} / cap {} years)",
            input.desired_tenure_years,
            output.approved_tenure_years,
            output.retirement_age,
            input.policy.max_tenure_years
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "FOIR-based eligibility: (income * FOIR - existing EMI) * annuity factor",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn dti_percent(monthly_obligations: Money, monthly_income: Money) -> LoanCalcResult<Decimal> {
    if monthly_income <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    let ratio = checked_div(monthly_obligations, monthly_income, "debt-to-income ratio")?;
    Ok(round_to(checked_mul(ratio, dec!(100), "debt-to-income percent")?, 2))
}

fn validate_input(input: &EligibilityInput) -> LoanCalcResult<()> {
    if input.monthly_income <= Decimal::ZERO {
        return Err(LoanCalcError::InvalidInput {
            field: "monthly_income".into(),
            reason: "Monthly income must be positive.".into(),
        });
    }
    if input.existing_monthly_emi < Decimal::ZERO {
        return Err(LoanCalcError::InvalidInput {
            field: "existing_monthly_emi".into(),
            reason: "Existing EMI cannot be negative.".into(),
        });
    }
    if input.age == 0 {
        return Err(LoanCalcError::InvalidInput {
            field: "age".into(),
            reason: "Age must be positive.".into(),
        });
    }
    if input.annual_rate_percent < Decimal::ZERO {
        return Err(LoanCalcError::InvalidInput {
            field: "annual_rate_percent".into(),
            reason: "Interest rate cannot be negative.".into(),
        });
    }
    if input.desired_tenure_years == 0 {
        return Err(LoanCalcError::InvalidInput {
            field: "desired_tenure_years".into(),
            reason: "Desired tenure must be at least one year.".into(),
        });
    }
    input.policy.validate()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn salaried_applicant() -> EligibilityInput {
        EligibilityInput {
            monthly_income: dec!(80_000),
            existing_monthly_emi: dec!(15_000),
            age: 30,
            employment_type: EmploymentType::Salaried,
            annual_rate_percent: dec!(9.5),
            desired_tenure_years: 20,
            policy: EligibilityPolicy::default(),
        }
    }

    #[test]
    fn test_salaried_applicant() {
        let out = compute_eligibility(&salaried_applicant()).unwrap();
        assert_eq!(out.max_tenure_years, 30);
        assert_eq!(out.approved_tenure_years, 20);
        assert_eq!(out.affordable_emi, dec!(29_000));
        // 29,000 * annuity factor(9.5%/12, 240) = 3,111,150.06
        assert_eq!(out.eligible_loan_amount, dec!(3_111_150));
        assert_eq!(out.post_debt_to_income_ratio_percent, dec!(55));
        assert_eq!(out.error_reason, None);
    }

    #[test]
    fn test_self_employed_retirement_caps_tenure() {
        let input = EligibilityInput {
            monthly_income: dec!(100_000),
            existing_monthly_emi: dec!(10_000),
            age: 50,
            employment_type: EmploymentType::SelfEmployed,
            annual_rate_percent: dec!(8),
            desired_tenure_years: 25,
            policy: EligibilityPolicy::default(),
        };
        let out = compute_eligibility(&input).unwrap();
        assert_eq!(out.retirement_age, 65);
        assert_eq!(out.max_tenure_years, 15);
        assert_eq!(out.approved_tenure_years, 15);
        assert_eq!(out.affordable_emi, dec!(40_000));
        // 4,185,623.69
        assert_eq!(out.eligible_loan_amount, dec!(4_185_624));
    }

    #[test]
    fn test_tenure_capped_at_thirty_years() {
        let mut input = salaried_applicant();
        input.age = 22;
        input.desired_tenure_years = 35;
        let out = compute_eligibility(&input).unwrap();
        assert_eq!(out.max_tenure_years, 30);
        assert_eq!(out.approved_tenure_years, 30);
    }

    #[test]
    fn test_at_retirement_age_is_ineligible() {
        let mut input = salaried_applicant();
        input.age = 60;
        let out = compute_eligibility(&input).unwrap();
        assert_eq!(out.max_tenure_years, 0);
        assert_eq!(out.eligible_loan_amount, Decimal::ZERO);
        assert_eq!(out.error_reason, Some(IneligibilityReason::TenureExceedsRetirement));
    }

    #[test]
    fn test_past_retirement_age_does_not_underflow() {
        let mut input = salaried_applicant();
        input.age = 72;
        let out = compute_eligibility(&input).unwrap();
        assert_eq!(out.max_tenure_years, 0);
        assert_eq!(out.error_reason, Some(IneligibilityReason::TenureExceedsRetirement));
    }

    #[test]
    fn test_no_headroom() {
        let mut input = salaried_applicant();
        input.existing_monthly_emi = dec!(44_000);
        let out = compute_eligibility(&input).unwrap();
        assert_eq!(out.affordable_emi, Decimal::ZERO);
        assert_eq!(out.eligible_loan_amount, Decimal::ZERO);
        assert_eq!(out.error_reason, Some(IneligibilityReason::NoAffordabilityHeadroom));
        assert_eq!(out.post_debt_to_income_ratio_percent, dec!(55));
    }

    #[test]
    fn test_retirement_checked_before_headroom() {
        let mut input = salaried_applicant();
        input.age = 61;
        input.existing_monthly_emi = dec!(60_000);
        let out = compute_eligibility(&input).unwrap();
        assert_eq!(out.error_reason, Some(IneligibilityReason::TenureExceedsRetirement));
    }

    #[test]
    fn test_zero_rate_factor_is_months() {
        let mut input = salaried_applicant();
        input.annual_rate_percent = Decimal::ZERO;
        input.desired_tenure_years = 5;
        let out = compute_eligibility(&input).unwrap();
        assert_eq!(out.eligible_loan_amount, dec!(29_000) * dec!(60));
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let mut zero_income = salaried_applicant();
        zero_income.monthly_income = Decimal::ZERO;
        let mut zero_age = salaried_applicant();
        zero_age.age = 0;
        let mut zero_tenure = salaried_applicant();
        zero_tenure.desired_tenure_years = 0;

        for (input, expected) in [
            (zero_income, "monthly_income"),
            (zero_age, "age"),
            (zero_tenure, "desired_tenure_years"),
        ] {
            match compute_eligibility(&input).unwrap_err() {
                LoanCalcError::InvalidInput { field, .. } => assert_eq!(field, expected),
                other => panic!("Expected InvalidInput, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_reduced_tenure_warning() {
        let mut input = salaried_applicant();
        input.age = 50;
        let result = calculate_eligibility(&input).unwrap();
        assert_eq!(result.result.approved_tenure_years, 10);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_error_reason_serialises_snake_case() {
        let mut input = salaried_applicant();
        input.age = 60;
        let out = compute_eligibility(&input).unwrap();
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["error_reason"], "tenure_exceeds_retirement");
    }

    #[test]
    fn test_extreme_rate_overflow_is_error() {
        let mut input = salaried_applicant();
        input.annual_rate_percent = dec!(2400);
        input.desired_tenure_years = 5;
        let err = compute_eligibility(&input).unwrap_err();
        assert!(matches!(err, LoanCalcError::Overflow { .. }), "got {err:?}");
    }

    #[test]
    fn test_tiny_income_huge_obligations_overflow_is_error() {
        let mut input = salaried_applicant();
        input.monthly_income = dec!(0.001);
        input.existing_monthly_emi = dec!(10_000_000_000_000_000_000_000_000_000);
        let err = compute_eligibility(&input).unwrap_err();
        assert!(matches!(err, LoanCalcError::Overflow { .. }), "got {err:?}");
    }

    #[test]
    fn test_oversized_policy_rejected_before_arithmetic() {
        let mut input = salaried_applicant();
        input.age = 1;
        input.desired_tenure_years = u32::MAX;
        input.policy = EligibilityPolicy {
            salaried_retirement_age: u32::MAX,
            max_tenure_years: u32::MAX,
            ..Default::default()
        };
        match compute_eligibility(&input).unwrap_err() {
            LoanCalcError::InvalidInput { field, .. } => {
                assert_eq!(field, "policy.salaried_retirement_age")
            }
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_century_long_tenure_still_computes() {
        let mut input = salaried_applicant();
        input.age = 1;
        input.desired_tenure_years = 100;
        input.policy = EligibilityPolicy {
            salaried_retirement_age: 100,
            max_tenure_years: 100,
            ..Default::default()
        };
        let out = compute_eligibility(&input).unwrap();
        assert_eq!(out.approved_tenure_years, 99);
        assert!(out.eligible_loan_amount > Decimal::ZERO);
    }
}
