//! Level-payment annuity primitives shared by the EMI, moratorium and
//! eligibility calculators. Rates passed in here are monthly fractions, not
//! annual percentages; use [`monthly_rate`] to convert.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::LoanCalcError;
use crate::types::{Money, Rate};
use crate::LoanCalcResult;

/// Convert an annual percentage rate (9.5) to a monthly fraction (0.0079166…).
pub fn monthly_rate(annual_rate_percent: Rate) -> Decimal {
    annual_rate_percent / dec!(1200)
}

/// (1 + r)^n by exponentiation by squaring.
///
/// Checked at every multiplication so absurd tenures surface as an error
/// instead of a panic.
pub fn compound_factor(monthly_rate: Decimal, periods: u32) -> LoanCalcResult<Decimal> {
    let overflow = || LoanCalcError::Overflow {
        context: format!("compound factor over {periods} periods"),
    };

    let mut base = Decimal::ONE + monthly_rate;
    let mut exp = periods;
    let mut result = Decimal::ONE;

    while exp > 0 {
        if exp & 1 == 1 {
            result = result.checked_mul(base).ok_or_else(overflow)?;
        }
        exp >>= 1;
        if exp > 0 {
            base = base.checked_mul(base).ok_or_else(overflow)?;
        }
    }

    Ok(result)
}

/// Unrounded level payment that fully amortises `principal` over `periods`.
///
/// EMI = P * r * (1+r)^n / ((1+r)^n - 1), or P / n when r is zero.
pub fn annuity_payment(principal: Money, monthly_rate: Decimal, periods: u32) -> LoanCalcResult<Money> {
    if periods == 0 {
        return Err(LoanCalcError::InvalidInput {
            field: "periods".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }

    if monthly_rate.is_zero() {
        return Ok(principal / Decimal::from(periods));
    }

    let factor = compound_factor(monthly_rate, periods)?;
    let denom = factor - Decimal::ONE;
    if denom.is_zero() {
        return Err(LoanCalcError::DivisionByZero {
            context: "annuity payment denominator".into(),
        });
    }

    let numerator = principal
        .checked_mul(monthly_rate)
        .and_then(|v| v.checked_mul(factor))
        .ok_or_else(|| LoanCalcError::Overflow {
            context: "annuity payment numerator".into(),
        })?;

    checked_div(numerator, denom, "annuity payment")
}

/// Present value of `periods` level payments of one unit:
/// ((1+r)^n - 1) / (r * (1+r)^n), or n when r is zero.
pub fn annuity_factor(monthly_rate: Decimal, periods: u32) -> LoanCalcResult<Decimal> {
    if monthly_rate.is_zero() {
        return Ok(Decimal::from(periods));
    }

    let factor = compound_factor(monthly_rate, periods)?;
    let denom = checked_mul(monthly_rate, factor, "annuity factor denominator")?;

    checked_div(factor - Decimal::ONE, denom, "annuity factor")
}

/// Principal that a level payment of `payment` can service over `periods`.
pub fn annuity_present_value(payment: Money, monthly_rate: Decimal, periods: u32) -> LoanCalcResult<Money> {
    checked_mul(payment, annuity_factor(monthly_rate, periods)?, "annuity present value")
}

// ---------------------------------------------------------------------------
// Checked arithmetic
// ---------------------------------------------------------------------------

/// `a * b`, or `Overflow` naming `context`.
pub fn checked_mul(a: Decimal, b: Decimal, context: &str) -> LoanCalcResult<Decimal> {
    a.checked_mul(b).ok_or_else(|| LoanCalcError::Overflow {
        context: context.into(),
    })
}

/// `a / b`, or `DivisionByZero` / `Overflow` naming `context`.
pub fn checked_div(a: Decimal, b: Decimal, context: &str) -> LoanCalcResult<Decimal> {
    if b.is_zero() {
        return Err(LoanCalcError::DivisionByZero {
            context: context.into(),
        });
    }
    a.checked_div(b).ok_or_else(|| LoanCalcError::Overflow {
        context: context.into(),
    })
}
