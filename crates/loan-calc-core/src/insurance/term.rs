//! Term insurance premium estimator.
//!
//! The age and term bands below are simplified placeholders for the website
//! quote widget. They are NOT an actuarial rate table and must not be used
//! for regulatory or binding pricing.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::LoanCalcError;
use crate::time_value::{checked_div, checked_mul};
use crate::types::{round_currency, round_to, with_metadata, ComputationOutput, Money};
use crate::LoanCalcResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Base premium per 1,000 of cover before multipliers.
const BASE_RATE_PER_THOUSAND: Decimal = dec!(1.5);

/// Cover unit for the per-lakh quote (1,00,000).
const ONE_LAKH: Decimal = dec!(100_000);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermInsuranceInput {
    /// Age of the life assured in completed years.
    pub age: u32,
    /// Sum assured.
    pub cover_amount: Money,
    pub term_years: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermPremiumOutput {
    pub base_rate_per_thousand: Decimal,
    pub age_multiplier: Decimal,
    pub term_multiplier: Decimal,
    pub annual_premium: Money,
    /// annual_premium / 12, rounded.
    pub monthly_premium: Money,
    /// annual_premium * term_years
    pub total_premium: Money,
    /// Annual premium per 1,00,000 of cover, 2 dp.
    pub premium_per_lakh_cover: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Annual premium: round(cover * 0.0015 * age_multiplier * term_multiplier).
pub fn compute_term_premium(age: u32, cover_amount: Money, term_years: u32) -> LoanCalcResult<Money> {
    validate(age, cover_amount, term_years)?;
    let rate = BASE_RATE_PER_THOUSAND / dec!(1000);
    Ok(round_currency(
        cover_amount * rate * age_multiplier(age) * term_multiplier(term_years),
    ))
}

/// Premium with its monthly and whole-term figures.
pub fn compute_term_premium_breakdown(input: &TermInsuranceInput) -> LoanCalcResult<TermPremiumOutput> {
    let annual = compute_term_premium(input.age, input.cover_amount, input.term_years)?;

    log::debug!(
        "term premium: age={} cover={} term={}y -> annual={}",
        input.age,
        input.cover_amount,
        input.term_years,
        annual
    );

    let total = checked_mul(annual, Decimal::from(input.term_years), "total premium")?;
    let share_of_cover = checked_div(annual, input.cover_amount, "premium per lakh cover")?;

    Ok(TermPremiumOutput {
        base_rate_per_thousand: BASE_RATE_PER_THOUSAND,
        age_multiplier: age_multiplier(input.age),
        term_multiplier: term_multiplier(input.term_years),
        annual_premium: annual,
        monthly_premium: round_currency(annual / dec!(12)),
        total_premium: total,
        premium_per_lakh_cover: round_to(checked_mul(share_of_cover, ONE_LAKH, "premium per lakh cover")?, 2),
    })
}

/// Premium estimate wrapped in the standard output envelope.
pub fn calculate_term_premium(input: &TermInsuranceInput) -> LoanCalcResult<ComputationOutput<TermPremiumOutput>> {
    let start = Instant::now();
    let output = compute_term_premium_breakdown(input)?;
    let warnings = vec![
        "Indicative estimate from simplified age/term bands; not an actuarial or insurer quote".to_string(),
    ];

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Banded term premium: cover * 1.5/1000 * age multiplier * term multiplier",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Bands
// ---------------------------------------------------------------------------

/// < 35 -> 1.0, 35..45 -> 1.5, 45+ -> 2.0
pub fn age_multiplier(age: u32) -> Decimal {
    if age < 35 {
        dec!(1.0)
    } else if age < 45 {
        dec!(1.5)
    } else {
        dec!(2.0)
    }
}

/// <= 10 -> 1.0, 11..=20 -> 1.2, 21+ -> 1.5
pub fn term_multiplier(term_years: u32) -> Decimal {
    if term_years <= 10 {
        dec!(1.0)
    } else if term_years <= 20 {
        dec!(1.2)
    } else {
        dec!(1.5)
    }
}

fn validate(age: u32, cover_amount: Money, term_years: u32) -> LoanCalcResult<()> {
    if age == 0 {
        return Err(LoanCalcError::InvalidInput {
            field: "age".into(),
            reason: "Age must be positive.".into(),
        });
    }
    if cover_amount <= Decimal::ZERO {
        return Err(LoanCalcError::InvalidInput {
            field: "cover_amount".into(),
            reason: "Cover amount must be positive.".into(),
        });
    }
    if term_years == 0 {
        return Err(LoanCalcError::InvalidInput {
            field: "term_years".into(),
            reason: "Policy term must be at least one year.".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_young_short_term_base_rate() {
        // 50L * 0.0015 = 7,500
        assert_eq!(compute_term_premium(30, dec!(5_000_000), 10).unwrap(), dec!(7500));
    }

    #[test]
    fn test_age_band_edges() {
        assert_eq!(compute_term_premium(34, dec!(5_000_000), 10).unwrap(), dec!(7500));
        assert_eq!(compute_term_premium(35, dec!(5_000_000), 10).unwrap(), dec!(11_250));
        assert_eq!(compute_term_premium(44, dec!(5_000_000), 10).unwrap(), dec!(11_250));
        assert_eq!(compute_term_premium(45, dec!(5_000_000), 10).unwrap(), dec!(15_000));
    }

    #[test]
    fn test_term_band_edges() {
        assert_eq!(term_multiplier(10), dec!(1.0));
        assert_eq!(term_multiplier(11), dec!(1.2));
        assert_eq!(term_multiplier(20), dec!(1.2));
        assert_eq!(term_multiplier(21), dec!(1.5));
    }

    #[test]
    fn test_combined_multipliers() {
        // 7,500 * 1.5 * 1.5
        assert_eq!(compute_term_premium(40, dec!(5_000_000), 25).unwrap(), dec!(16_875));
    }

    #[test]
    fn test_breakdown_rounds_monthly() {
        let input = TermInsuranceInput {
            age: 35,
            cover_amount: dec!(5_000_000),
            term_years: 10,
        };
        let out = compute_term_premium_breakdown(&input).unwrap();
        // 11,250 / 12 = 937.5 -> 938
        assert_eq!(out.monthly_premium, dec!(938));
        assert_eq!(out.total_premium, dec!(112_500));
        assert_eq!(out.premium_per_lakh_cover, dec!(225));
    }

    #[test]
    fn test_annual_premium_rounding() {
        // 333,333 * 0.0015 = 499.9995 -> 500
        assert_eq!(compute_term_premium(25, dec!(333_333), 5).unwrap(), dec!(500));
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let cases = [
            (0, dec!(1_000_000), 10, "age"),
            (30, Decimal::ZERO, 10, "cover_amount"),
            (30, dec!(1_000_000), 0, "term_years"),
        ];
        for (age, cover, term, expected) in cases {
            match compute_term_premium(age, cover, term).unwrap_err() {
                LoanCalcError::InvalidInput { field, .. } => assert_eq!(field, expected),
                other => panic!("Expected InvalidInput, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_estimate_always_warns() {
        let input = TermInsuranceInput {
            age: 30,
            cover_amount: dec!(10_000_000),
            term_years: 30,
        };
        let result = calculate_term_premium(&input).unwrap();
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.result.annual_premium, dec!(22_500));
    }

    #[test]
    fn test_total_premium_overflow_is_error() {
        let input = TermInsuranceInput {
            age: 30,
            cover_amount: Decimal::MAX,
            term_years: u32::MAX,
        };
        let err = compute_term_premium_breakdown(&input).unwrap_err();
        assert!(matches!(err, LoanCalcError::Overflow { .. }), "got {err:?}");
    }

    #[test]
    fn test_per_lakh_rate_on_very_large_cover() {
        let input = TermInsuranceInput {
            age: 30,
            cover_amount: dec!(10_000_000_000_000_000_000_000_000),
            term_years: 10,
        };
        let out = compute_term_premium_breakdown(&input).unwrap();
        assert_eq!(out.premium_per_lakh_cover, dec!(150));
    }
}
