// src/format.rs
//! Number formatting for console lines and chart legends.

use rust_decimal::Decimal;

/// Formats an integer with `,` between thousands groups.
pub fn thousands(n: u64) -> String {
    group_digits(&n.to_string())
}

/// Formats a decimal rounded to `places`, with thousands groups.
pub fn thousands_decimal(value: Decimal, places: u32) -> String {
    let text = value.round_dp(places).abs().to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (text.as_str(), None),
    };

    let mut out = String::new();
    if value.is_sign_negative() && !value.round_dp(places).is_zero() {
        out.push('-');
    }
    out.push_str(&group_digits(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
