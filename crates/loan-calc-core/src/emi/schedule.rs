//! Month-by-month amortization schedule.
//!
//! Unlike the closed-form EMI calculators this walks every period, so it is
//! O(n) in the tenure. Interest is rounded to paise each month and the last
//! instalment absorbs the residual so the loan closes at exactly zero.
//! Tenures above [`MAX_SCHEDULE_MONTHS`] are rejected before any row is built.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::LoanCalcError;
use crate::time_value::{checked_mul, monthly_rate};
use crate::types::{round_to, with_metadata, ComputationOutput, Money, Rate};
use crate::LoanCalcResult;

use super::moratorium::{compute_moratorium, MoratoriumInput, MoratoriumPolicy};

/// Longest schedule that will be materialised: 50 years of monthly rows.
pub const MAX_SCHEDULE_MONTHS: u32 = 600;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleInput {
    pub principal: Money,
    /// Annual interest rate in percent.
    pub annual_rate_percent: Rate,
    pub tenure_months: u32,
    /// Leading months with no payment; interest is capitalised.
    #[serde(default)]
    pub moratorium_months: u32,
    /// Disbursement date. Payment k falls k months later.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub month: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<NaiveDate>,
    pub opening_balance: Money,
    pub payment: Money,
    pub interest: Money,
    /// payment - interest; negative while interest is being capitalised.
    pub principal: Money,
    pub closing_balance: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearSummary {
    pub year: u32,
    pub payments: Money,
    pub interest: Money,
    pub principal: Money,
    pub closing_balance: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleOutput {
    /// Level instalment after any moratorium.
    pub emi: Money,
    pub rows: Vec<ScheduleRow>,
    pub yearly: Vec<YearSummary>,
    pub total_payments: Money,
    pub total_interest: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Build the amortization schedule.
pub fn generate_schedule(input: &ScheduleInput) -> LoanCalcResult<ComputationOutput<ScheduleOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let output = build_schedule(input)?;

    let last_payment = output.rows.last().map(|row| row.payment).unwrap_or_default();
    if output.rows.len() > 1 && (last_payment - output.emi).abs() >= Decimal::ONE {
        warnings.push(format!(
            "Final instalment {last_payment} differs from the EMI {} after rounding adjustment",
            output.emi
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Reducing-balance amortization schedule (monthly, interest rounded to 2 dp)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

/// The schedule without the envelope.
pub fn build_schedule(input: &ScheduleInput) -> LoanCalcResult<ScheduleOutput> {
    if input.tenure_months > MAX_SCHEDULE_MONTHS {
        return Err(LoanCalcError::InvalidInput {
            field: "tenure_months".into(),
            reason: format!("Schedules are limited to {MAX_SCHEDULE_MONTHS} months."),
        });
    }

    // Strict: a schedule needs at least one repayment month.
    let emi = compute_moratorium(&MoratoriumInput {
        principal: input.principal,
        annual_rate_percent: input.annual_rate_percent,
        tenure_months: input.tenure_months,
        moratorium_months: input.moratorium_months,
        policy: MoratoriumPolicy::Strict,
    })?
    .emi_after_moratorium;

    let r = monthly_rate(input.annual_rate_percent);
    let mut rows: Vec<ScheduleRow> = Vec::with_capacity(input.tenure_months as usize);
    let mut balance = round_to(input.principal, 2);

    for month in 1..=input.tenure_months {
        if balance <= Decimal::ZERO {
            break;
        }

        let opening = balance;
        let interest = round_to(checked_mul(opening, r, "schedule interest")?, 2);
        let due = checked_add(opening, interest, "schedule balance")?;

        let payment = if month <= input.moratorium_months {
            Decimal::ZERO
        } else if month == input.tenure_months || emi >= due {
            due
        } else {
            emi
        };

        balance = due - payment;

        rows.push(ScheduleRow {
            month,
            payment_date: payment_date(input.start_date, month)?,
            opening_balance: opening,
            payment,
            interest,
            principal: payment - interest,
            closing_balance: balance,
        });
    }

    let total_payments = checked_sum(rows.iter().map(|row| row.payment), "total payments")?;
    let total_interest = checked_sum(rows.iter().map(|row| row.interest), "total interest")?;
    let yearly = summarise_years(&rows);

    log::debug!(
        "schedule: {} rows, emi={} total_payments={} total_interest={}",
        rows.len(),
        emi,
        total_payments,
        total_interest
    );

    Ok(ScheduleOutput {
        emi,
        rows,
        yearly,
        total_payments,
        total_interest,
    })
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn payment_date(start: Option<NaiveDate>, month: u32) -> LoanCalcResult<Option<NaiveDate>> {
    match start {
        None => Ok(None),
        Some(date) => date
            .checked_add_months(Months::new(month))
            .map(Some)
            .ok_or_else(|| LoanCalcError::Overflow {
                context: format!("payment date for month {month}"),
            }),
    }
}

fn checked_add(a: Money, b: Money, context: &str) -> LoanCalcResult<Money> {
    a.checked_add(b).ok_or_else(|| LoanCalcError::Overflow {
        context: context.into(),
    })
}

fn checked_sum(mut values: impl Iterator<Item = Money>, context: &str) -> LoanCalcResult<Money> {
    values.try_fold(Decimal::ZERO, |acc, value| checked_add(acc, value, context))
}

fn summarise_years(rows: &[ScheduleRow]) -> Vec<YearSummary> {
    let mut years: Vec<YearSummary> = Vec::new();

    for row in rows {
        let year = (row.month - 1) / 12 + 1;
        match years.last_mut() {
            Some(summary) if summary.year == year => {
                summary.payments += row.payment;
                summary.interest += row.interest;
                summary.principal += row.principal;
                summary.closing_balance = row.closing_balance;
            }
            _ => years.push(YearSummary {
                year,
                payments: row.payment,
                interest: row.interest,
                principal: row.principal,
                closing_balance: row.closing_balance,
            }),
        }
    }

    years
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn car_loan() -> ScheduleInput {
        ScheduleInput {
            principal: dec!(500_000),
            annual_rate_percent: dec!(10),
            tenure_months: 60,
            moratorium_months: 0,
            start_date: None,
        }
    }

    #[test]
    fn test_schedule_closes_at_zero() {
        let out = build_schedule(&car_loan()).unwrap();
        assert_eq!(out.rows.len(), 60);
        assert_eq!(out.rows.last().unwrap().closing_balance, Decimal::ZERO);
    }

    #[test]
    fn test_schedule_uses_rounded_emi() {
        // 10,623.52 -> 10,624
        let out = build_schedule(&car_loan()).unwrap();
        assert_eq!(out.emi, dec!(10_624));
        assert!(out.rows[..59].iter().all(|row| row.payment == dec!(10_624)));
    }

    #[test]
    fn test_first_month_split() {
        let out = build_schedule(&car_loan()).unwrap();
        let first = &out.rows[0];
        // 500,000 * 10% / 12 = 4,166.67
        assert_eq!(first.interest, dec!(4166.67));
        assert_eq!(first.principal, dec!(10_624) - dec!(4166.67));
        assert_eq!(first.closing_balance, dec!(500_000) - first.principal);
    }

    #[test]
    fn test_principal_components_sum_to_loan() {
        let out = build_schedule(&car_loan()).unwrap();
        let principal: Money = out.rows.iter().map(|row| row.principal).sum();
        assert_eq!(principal, dec!(500_000));
        assert_eq!(out.total_payments - out.total_interest, dec!(500_000));
    }

    #[test]
    fn test_yearly_summary_buckets() {
        let out = build_schedule(&car_loan()).unwrap();
        assert_eq!(out.yearly.len(), 5);
        assert_eq!(out.yearly[0].payments, dec!(10_624) * dec!(12));
        assert_eq!(out.yearly[4].closing_balance, Decimal::ZERO);
        let interest: Money = out.yearly.iter().map(|y| y.interest).sum();
        assert_eq!(interest, out.total_interest);
    }

    #[test]
    fn test_moratorium_capitalises_interest() {
        let mut input = car_loan();
        input.moratorium_months = 6;
        let out = build_schedule(&input).unwrap();
        for row in &out.rows[..6] {
            assert_eq!(row.payment, Decimal::ZERO);
            assert_eq!(row.closing_balance, row.opening_balance + row.interest);
            assert!(row.principal < Decimal::ZERO);
        }
        assert!(out.rows[6].opening_balance > dec!(500_000));
        assert_eq!(out.rows.last().unwrap().closing_balance, Decimal::ZERO);
    }

    #[test]
    fn test_moratorium_covering_tenure_rejected() {
        let mut input = car_loan();
        input.moratorium_months = 60;
        assert!(matches!(
            build_schedule(&input),
            Err(LoanCalcError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_payment_dates_clamp_to_month_end() {
        let mut input = car_loan();
        input.tenure_months = 3;
        input.start_date = NaiveDate::from_ymd_opt(2024, 1, 31);
        let out = build_schedule(&input).unwrap();
        let dates: Vec<NaiveDate> = out.rows.iter().filter_map(|row| row.payment_date).collect();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
                NaiveDate::from_ymd_opt(2024, 4, 30).unwrap(),
            ]
        );
    }

    #[test]
    fn test_zero_rate_schedule() {
        let input = ScheduleInput {
            principal: dec!(1000),
            annual_rate_percent: Decimal::ZERO,
            tenure_months: 3,
            moratorium_months: 0,
            start_date: None,
        };
        let out = build_schedule(&input).unwrap();
        // 333, 333, 334
        let payments: Vec<Money> = out.rows.iter().map(|row| row.payment).collect();
        assert_eq!(payments, vec![dec!(333), dec!(333), dec!(334)]);
        assert_eq!(out.total_interest, Decimal::ZERO);
    }

    #[test]
    fn test_tenure_above_cap_rejected() {
        let input = ScheduleInput {
            principal: dec!(1000),
            annual_rate_percent: Decimal::ZERO,
            tenure_months: u32::MAX,
            moratorium_months: 0,
            start_date: None,
        };
        match build_schedule(&input).unwrap_err() {
            LoanCalcError::InvalidInput { field, .. } => assert_eq!(field, "tenure_months"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_tenure_at_cap_accepted() {
        let mut input = car_loan();
        input.tenure_months = MAX_SCHEDULE_MONTHS;
        let out = build_schedule(&input).unwrap();
        assert_eq!(out.rows.len(), MAX_SCHEDULE_MONTHS as usize);
        assert_eq!(out.rows.last().unwrap().closing_balance, Decimal::ZERO);
    }
}
