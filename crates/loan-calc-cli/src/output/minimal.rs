use serde_json::Value;

use super::format_money;

/// Headline figure of each calculator, in priority order.
const HEADLINE_KEYS: &[&str] = &[
    "emi_after_moratorium",
    "eligible_loan_amount",
    "annual_premium",
    "emi",
];

/// Print just the headline figure, formatted as rupees.
///
/// Ineligible results print the reason instead of a zero amount.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        if let Some(Value::String(reason)) = map.get("error_reason") {
            println!("ineligible: {}", reason);
            return;
        }

        for key in HEADLINE_KEYS {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_money(key, val).unwrap_or_else(|| plain(val)));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, plain(val));
            return;
        }
    }

    println!("{}", plain(result_obj));
}

fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
