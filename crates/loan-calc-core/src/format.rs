//! Indian-locale currency rendering for the calculator outputs. Presentation
//! only; nothing in the engine depends on it.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::{round_to, Money};

const LAKH: Decimal = dec!(100_000);
const CRORE: Decimal = dec!(10_000_000);

/// `₹22,37,040`, or `₹1,234.50` when there are paise.
pub fn format_inr(amount: Money) -> String {
    let rounded = round_to(amount, 2);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    let abs = rounded.abs();

    let whole = abs.trunc();
    let fraction = abs - whole;

    let grouped = group_indian(&whole.normalize().to_string());
    if fraction.is_zero() {
        format!("{sign}₹{grouped}")
    } else {
        let paise = (fraction * dec!(100)).trunc();
        format!("{sign}₹{grouped}.{:0>2}", paise.to_string())
    }
}

/// Lakh/crore short form: `₹22.37 L`, `₹1.25 Cr`. Amounts below one lakh
/// fall back to [`format_inr`].
pub fn format_inr_compact(amount: Money) -> String {
    let abs = amount.abs();
    let sign = if amount.is_sign_negative() && !amount.is_zero() { "-" } else { "" };
    if abs >= CRORE {
        format!("{sign}₹{} Cr", round_to(abs / CRORE, 2))
    } else if abs >= LAKH {
        format!("{sign}₹{} L", round_to(abs / LAKH, 2))
    } else {
        format_inr(amount)
    }
}

/// 1234567 -> 12,34,567
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, last_three) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), last_three)
}
