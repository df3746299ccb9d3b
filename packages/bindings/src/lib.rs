//! Node bindings for the website's calculator endpoints. Every function takes
//! the request body as a JSON string and returns the computation envelope as
//! a JSON string; malformed bodies and invalid inputs become JS errors.

use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;

use loan_calc_core::format;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// EMI
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_emi(input_json: String) -> NapiResult<String> {
    let input: loan_calc_core::emi::standard::EmiInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = loan_calc_core::emi::standard::calculate_emi(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_moratorium_emi(input_json: String) -> NapiResult<String> {
    let input: loan_calc_core::emi::moratorium::MoratoriumInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        loan_calc_core::emi::moratorium::calculate_moratorium_emi(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let input: loan_calc_core::emi::schedule::ScheduleInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        loan_calc_core::emi::schedule::generate_schedule(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Insurance
// ---------------------------------------------------------------------------

#[napi]
pub fn term_insurance_premium(input_json: String) -> NapiResult<String> {
    let input: loan_calc_core::insurance::term::TermInsuranceInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        loan_calc_core::insurance::term::calculate_term_premium(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Eligibility
// ---------------------------------------------------------------------------

#[napi]
pub fn loan_eligibility(input_json: String) -> NapiResult<String> {
    let input: loan_calc_core::eligibility::affordability::EligibilityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = loan_calc_core::eligibility::affordability::calculate_eligibility(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Render an amount with Indian digit grouping, e.g. "₹22,37,040".
#[napi]
pub fn format_inr(amount: String) -> NapiResult<String> {
    let value: Decimal = amount.trim().parse().map_err(to_napi_error)?;
    Ok(format::format_inr(value))
}

/// Render an amount in lakh/crore short form, e.g. "₹1.25 Cr".
#[napi]
pub fn format_inr_compact(amount: String) -> NapiResult<String> {
    let value: Decimal = amount.trim().parse().map_err(to_napi_error)?;
    Ok(format::format_inr_compact(value))
}
