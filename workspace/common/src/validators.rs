//! Field validators and parsers.
//!
//! The `validator` derive calls the `fn(&str) -> Result<(), ValidationError>`
//! functions through `#[validate(custom(...))]`; the `parse_*` helpers turn
//! raw form strings into typed values.

use std::borrow::Cow;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use validator::ValidationError;

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_CHOICE: &str = "Select a valid choice.";
pub const INVALID_EMAIL: &str = "Enter a valid email address.";
pub const GMAIL_ONLY: &str = "Only Gmail addresses are allowed.";
pub const INVALID_PHONE: &str =
    "Enter a valid Philippine number starting with 09 and 11 digits total.";
pub const INVALID_INTEGER: &str = "Enter a whole number.";
pub const INVALID_DECIMAL: &str = "Enter a number.";

/// `price` is stored as decimal(10, 2).
pub const PRICE_MAX_DIGITS: u32 = 10;
pub const PRICE_DECIMAL_PLACES: u32 = 2;

static GMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@gmail\.com$").expect("gmail pattern compiles")
});

static PH_MOBILE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^09\d{9}$").expect("mobile pattern compiles"));

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles"));

fn failure(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// Rejects empty (already trimmed) values.
pub fn required(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(failure("required", REQUIRED));
    }
    Ok(())
}

/// Optional customer email: empty, or a Gmail address.
pub fn gmail_address(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || GMAIL_RE.is_match(value) {
        Ok(())
    } else {
        Err(failure("gmail", GMAIL_ONLY))
    }
}

/// Optional customer phone: empty, or `09` followed by nine digits.
pub fn ph_mobile(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || PH_MOBILE_RE.is_match(value) {
        Ok(())
    } else {
        Err(failure("phone", INVALID_PHONE))
    }
}

/// Required email address of any domain (account signup).
pub fn email_address(value: &str) -> Result<(), ValidationError> {
    required(value)?;
    if EMAIL_RE.is_match(value) {
        Ok(())
    } else {
        Err(failure("email", INVALID_EMAIL))
    }
}

pub fn parse_quantity(raw: &str) -> Result<i32, &'static str> {
    raw.parse::<i32>().map_err(|_| INVALID_INTEGER)
}

/// Parses a price, enforcing the decimal(10, 2) column bounds.
pub fn parse_price(raw: &str) -> Result<Decimal, String> {
    let value = Decimal::from_str(raw).map_err(|_| INVALID_DECIMAL.to_string())?;
    let normalized = value.normalize();
    let places = normalized.scale();
    if places > PRICE_DECIMAL_PLACES {
        return Err(format!(
            "Ensure that there are no more than {PRICE_DECIMAL_PLACES} decimal places."
        ));
    }
    check_digits(normalized)?;

    let mut price = normalized;
    price.rescale(PRICE_DECIMAL_PLACES);
    Ok(price)
}

/// Lenient price parsing used by the barcode scanner: scientific notation is
/// accepted and extra decimal places are rounded away.
pub fn parse_scan_price(raw: &str) -> Option<Decimal> {
    let value = Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()?;
    let mut price = value.round_dp(PRICE_DECIMAL_PLACES).normalize();
    check_digits(price).ok()?;
    price.rescale(PRICE_DECIMAL_PLACES);
    Some(price)
}

fn check_digits(value: Decimal) -> Result<(), String> {
    let digits = value.mantissa().unsigned_abs().to_string().len() as u32;
    if digits > PRICE_MAX_DIGITS {
        return Err(format!(
            "Ensure that there are no more than {PRICE_MAX_DIGITS} digits in total."
        ));
    }
    let whole_digits = digits.saturating_sub(value.scale());
    let max_whole = PRICE_MAX_DIGITS - PRICE_DECIMAL_PLACES;
    if whole_digits > max_whole {
        return Err(format!(
            "Ensure that there are no more than {max_whole} digits before the decimal point."
        ));
    }
    Ok(())
}

/// Parses an optional foreign-key choice; an empty value means "none".
pub fn parse_choice(raw: &str) -> Result<Option<i32>, &'static str> {
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<i32>().map(Some).map_err(|_| INVALID_CHOICE)
}

/// Human readable message for a failed validation.
pub(crate) fn message_for(error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }
    match error.code.as_ref() {
        "length" => match error.params.get("max").and_then(|max| max.as_u64()) {
            Some(max) => format!("Ensure this value has at most {max} characters."),
            None => "Ensure this value has a valid length.".to_string(),
        },
        _ => "Enter a valid value.".to_string(),
    }
}
