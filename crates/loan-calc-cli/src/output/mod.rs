pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use rust_decimal::Decimal;
use serde_json::Value;

/// Result fields holding currency amounts; rendered with Indian grouping in
/// human-facing formats.
pub const MONEY_FIELDS: &[&str] = &[
    "emi",
    "total_payable",
    "total_interest",
    "compounded_principal",
    "interest_capitalised",
    "emi_after_moratorium",
    "regular_emi",
    "extra_cost",
    "total_extra_cost",
    "annual_premium",
    "monthly_premium",
    "total_premium",
    "premium_per_lakh_cover",
    "affordable_emi",
    "eligible_loan_amount",
    "total_payments",
    "opening_balance",
    "payment",
    "interest",
    "principal",
    "closing_balance",
    "payments",
];

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// `₹`-formatted rendering of a money field, if `key` is one and the value
/// parses as a decimal.
pub fn format_money(key: &str, value: &Value) -> Option<String> {
    if !MONEY_FIELDS.contains(&key) {
        return None;
    }
    let amount: Decimal = match value {
        Value::String(s) => s.parse().ok()?,
        Value::Number(n) => n.to_string().parse().ok()?,
        _ => return None,
    };
    Some(loan_calc_core::format::format_inr(amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_money_fields_formatted() {
        assert_eq!(format_money("emi", &json!("9321")).as_deref(), Some("₹9,321"));
        assert_eq!(
            format_money("eligible_loan_amount", &json!(3111150)).as_deref(),
            Some("₹31,11,150")
        );
    }

    #[test]
    fn test_other_fields_untouched() {
        assert_eq!(format_money("age_multiplier", &json!("1.5")), None);
        assert_eq!(format_money("emi", &json!(null)), None);
    }
}
