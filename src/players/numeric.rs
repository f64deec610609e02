//! Number parsing with the leniency the front-end has always relied on.
//!
//! `parse_float` reads the longest numeric prefix (`"12abc"` is 12), while
//! `parse_number` requires the whole trimmed string to be a number.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

/// Longest leading decimal literal of `s`, after leading whitespace.
pub fn numeric_prefix(s: &str) -> Option<&str> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    Some(&s[..end])
}

/// `parseFloat` semantics: `None` where JavaScript would produce `NaN`.
pub fn parse_float(s: &str) -> Option<f64> {
    numeric_prefix(s)?.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Strict numeric check: the whole trimmed value must be a finite number.
pub fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Format the numeric prefix of `raw` with exactly `dp` decimals, rounding
/// half away from zero on the decimal text (`"20.145"` → `"20.15"`).
///
/// Returns `None` when `raw` has no numeric prefix.
pub fn format_fixed(raw: &str, dp: u32) -> Option<String> {
    let value = parse_decimal(numeric_prefix(raw)?)?;
    Some(round_fixed(value, dp).to_string())
}

/// A fraction shown as a percentage: `"0.4756"` with 1 decimal is `"47.6%"`.
pub fn format_percent(raw: &str, dp: u32) -> Option<String> {
    let value = parse_decimal(numeric_prefix(raw)?)? * Decimal::ONE_HUNDRED;
    Some(format!("{}%", round_fixed(value, dp)))
}

/// `parse_float` leniency, but exact: the numeric prefix as a `Decimal`.
pub fn parse_float_decimal(s: &str) -> Option<Decimal> {
    parse_decimal(numeric_prefix(s)?)
}

/// Round half away from zero and pad to exactly `dp` decimals.
pub fn round_fixed(value: Decimal, dp: u32) -> Decimal {
    let mut value = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    value.rescale(dp);
    value
}

fn parse_decimal(literal: &str) -> Option<Decimal> {
    let unsigned = literal.strip_prefix('+').unwrap_or(literal);
    let (negative, body) = match unsigned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, unsigned),
    };

    let mut text = String::with_capacity(body.len() + 2);
    if body.starts_with('.') {
        text.push('0');
    }
    text.push_str(body);

    let parsed = if text.contains(['e', 'E']) {
        let (mantissa, exponent) = text.split_once(['e', 'E'])?;
        let mantissa = mantissa.trim_end_matches('.');
        Decimal::from_scientific(&format!("{mantissa}e{exponent}")).ok()
    } else {
        Decimal::from_str(text.trim_end_matches('.')).ok()
    }?;

    Some(if negative { -parsed } else { parsed })
}
