use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::LoanCalcError;
use crate::types::{EmploymentType, Ratio};
use crate::LoanCalcResult;

/// Upper bound for any age or year count in a policy.
pub const MAX_POLICY_YEARS: u32 = 100;

/// Underwriting limits applied by the eligibility calculator.
///
/// The default is the lender panel's standard policy; callers may override
/// individual fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EligibilityPolicy {
    pub salaried_retirement_age: u32,
    pub self_employed_retirement_age: u32,
    /// Fixed obligation to income ratio for salaried applicants.
    pub salaried_foir: Ratio,
    pub self_employed_foir: Ratio,
    pub max_tenure_years: u32,
}

impl Default for EligibilityPolicy {
    fn default() -> Self {
        Self {
            salaried_retirement_age: 60,
            self_employed_retirement_age: 65,
            salaried_foir: dec!(0.55),
            self_employed_foir: dec!(0.50),
            max_tenure_years: 30,
        }
    }
}

impl EligibilityPolicy {
    pub fn retirement_age(&self, employment: EmploymentType) -> u32 {
        match employment {
            EmploymentType::Salaried => self.salaried_retirement_age,
            EmploymentType::SelfEmployed => self.self_employed_retirement_age,
        }
    }

    pub fn foir(&self, employment: EmploymentType) -> Ratio {
        match employment {
            EmploymentType::Salaried => self.salaried_foir,
            EmploymentType::SelfEmployed => self.self_employed_foir,
        }
    }

    pub fn validate(&self) -> LoanCalcResult<()> {
        for (field, ratio) in [
            ("policy.salaried_foir", self.salaried_foir),
            ("policy.self_employed_foir", self.self_employed_foir),
        ] {
            if ratio <= Decimal::ZERO || ratio > Decimal::ONE {
                return Err(LoanCalcError::InvalidInput {
                    field: field.into(),
                    reason: "FOIR must be in (0, 1].".into(),
                });
            }
        }
        for (field, age) in [
            ("policy.salaried_retirement_age", self.salaried_retirement_age),
            ("policy.self_employed_retirement_age", self.self_employed_retirement_age),
        ] {
            if age == 0 || age > MAX_POLICY_YEARS {
                return Err(LoanCalcError::InvalidInput {
                    field: field.into(),
                    reason: format!("Retirement age must be in 1..={MAX_POLICY_YEARS}."),
                });
            }
        }
        if self.max_tenure_years == 0 || self.max_tenure_years > MAX_POLICY_YEARS {
            return Err(LoanCalcError::InvalidInput {
                field: "policy.max_tenure_years".into(),
                reason: format!("Maximum tenure must be in 1..={MAX_POLICY_YEARS} years."),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_policy() {
        let policy = EligibilityPolicy::default();
        assert_eq!(policy.retirement_age(EmploymentType::Salaried), 60);
        assert_eq!(policy.retirement_age(EmploymentType::SelfEmployed), 65);
        assert_eq!(policy.foir(EmploymentType::Salaried), dec!(0.55));
        assert_eq!(policy.foir(EmploymentType::SelfEmployed), dec!(0.50));
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let policy: EligibilityPolicy = serde_json::from_str(r#"{"salaried_foir":"0.6"}"#).unwrap();
        assert_eq!(policy.salaried_foir, dec!(0.6));
        assert_eq!(policy.max_tenure_years, 30);
    }

    #[test]
    fn test_foir_above_one_rejected() {
        let policy = EligibilityPolicy {
            self_employed_foir: dec!(1.2),
            ..Default::default()
        };
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_year_counts_bounded() {
        let cases = [
            (
                EligibilityPolicy {
                    salaried_retirement_age: MAX_POLICY_YEARS + 1,
                    ..Default::default()
                },
                "policy.salaried_retirement_age",
            ),
            (
                EligibilityPolicy {
                    self_employed_retirement_age: 0,
                    ..Default::default()
                },
                "policy.self_employed_retirement_age",
            ),
            (
                EligibilityPolicy {
                    max_tenure_years: u32::MAX,
                    ..Default::default()
                },
                "policy.max_tenure_years",
            ),
        ];
        for (policy, expected) in cases {
            match policy.validate().unwrap_err() {
                LoanCalcError::InvalidInput { field, .. } => assert_eq!(field, expected),
                other => panic!("Expected InvalidInput, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_upper_bounds_inclusive() {
        let policy = EligibilityPolicy {
            salaried_retirement_age: MAX_POLICY_YEARS,
            self_employed_retirement_age: MAX_POLICY_YEARS,
            max_tenure_years: MAX_POLICY_YEARS,
            ..Default::default()
        };
        assert!(policy.validate().is_ok());
    }
}
