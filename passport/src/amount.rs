//! Human decimal amounts to integer base units and back.
//!
//! All conversions work on the decimal digits as text so that no value is ever
//! routed through a float. Fractional digits beyond the asset precision are
//! truncated, never rounded: callers that must not lose value should check the
//! input with [`Amount`] and compare its [`Amount::fraction_digits`] against the
//! precision before converting.

use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::error::{PassportError, Result};

/// Largest precision [`scale_decimal`] accepts (the scale limit of `Decimal`).
pub const MAX_DECIMAL_PRECISION: u32 = 28;

/// Convert a decimal numeral into a base-unit digit string.
///
/// Never fails. An empty input is zero. The input is split at the first `.`;
/// leading zeros are dropped and the fraction is right-padded with zeros, or
/// truncated, to exactly `precision` digits. Text from a second `.` on is
/// dropped, so the output never contains a point. Other characters are not
/// validated here, use [`to_base_units_checked`] for untrusted input.
pub fn to_base_units(input: &str, precision: u32) -> String {
    if input.is_empty() {
        return "0".into();
    }

    let (int_part, dec_part) = input.split_once('.').unwrap_or((input, ""));
    // Anything from a second point on is not part of the fraction.
    let dec_part = dec_part.split('.').next().unwrap_or("");
    let int_part = strip_leading_zeros(int_part);

    let precision = precision as usize;
    let mut digits = String::with_capacity(int_part.len() + precision);
    digits.push_str(int_part);

    let mut taken = 0;
    for c in dec_part.chars().take(precision) {
        digits.push(c);
        taken += 1;
    }
    for _ in taken..precision {
        digits.push('0');
    }

    strip_leading_zeros(&digits).to_string()
}

/// Validate `input` as an [`Amount`] and convert it.
pub fn to_base_units_checked(input: &str, precision: u32) -> Result<String> {
    let amount: Amount = input.parse()?;
    Ok(amount.to_base_units(precision))
}

/// Render a base-unit digit string as a human decimal string.
///
/// Trailing fractional zeros are trimmed: `("123450000", 8)` gives `"1.2345"`.
pub fn from_base_units(base: &str, precision: u32) -> Result<String> {
    if base.is_empty() || !base.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PassportError::Validation(format!(
            "base-unit amount must be digits only: {base:?}"
        )));
    }

    let digits = strip_leading_zeros(base);
    let precision = precision as usize;
    if precision == 0 {
        return Ok(digits.to_string());
    }

    let padded = if digits.len() <= precision {
        format!("{}{}", "0".repeat(precision + 1 - digits.len()), digits)
    } else {
        digits.to_string()
    };
    let (int_part, frac_part) = padded.split_at(padded.len() - precision);
    let frac_part = frac_part.trim_end_matches('0');

    if frac_part.is_empty() {
        Ok(int_part.to_string())
    } else {
        Ok(format!("{int_part}.{frac_part}"))
    }
}

/// Scale a `Decimal` by `10^precision`, truncating any remaining fraction.
///
/// # Errors
///
/// Returns `PassportError::Overflow` for negative values, for a precision above
/// [`MAX_DECIMAL_PRECISION`], or when the result does not fit in a `u128`.
pub fn scale_decimal(x: Decimal, precision: u32) -> Result<u128> {
    if x.is_zero() && precision <= MAX_DECIMAL_PRECISION {
        return Ok(0);
    }
    if x.is_sign_negative() {
        return Err(PassportError::Overflow(format!(
            "scale_decimal: negative amount {x}"
        )));
    }
    if precision > MAX_DECIMAL_PRECISION {
        return Err(PassportError::Overflow(format!(
            "scale_decimal: precision {precision} exceeds {MAX_DECIMAL_PRECISION}"
        )));
    }

    let scale = Decimal::from_i128_with_scale(10i128.pow(precision), 0);
    x.checked_mul(scale)
        .and_then(|scaled| scaled.trunc().to_u128())
        .ok_or_else(|| PassportError::Overflow(format!("scale_decimal: {x} * 10^{precision}")))
}

fn strip_leading_zeros(s: &str) -> &str {
    let stripped = s.trim_start_matches('0');
    if stripped.is_empty() {
        "0"
    } else {
        stripped
    }
}

/// A validated non-negative decimal numeral.
///
/// Accepts ASCII digits with at most one decimal point. A bare `.` or an empty
/// string is zero, matching [`to_base_units`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Amount {
    text: String,
}

impl Amount {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Number of digits after the decimal point.
    pub fn fraction_digits(&self) -> usize {
        self.text.split_once('.').map_or(0, |(_, frac)| frac.len())
    }

    /// True when converting at `precision` would drop non-zero digits.
    pub fn loses_precision(&self, precision: u32) -> bool {
        match self.text.split_once('.') {
            Some((_, frac)) => frac
                .get(precision as usize..)
                .is_some_and(|rest| rest.bytes().any(|b| b != b'0')),
            None => false,
        }
    }

    pub fn to_base_units(&self, precision: u32) -> String {
        to_base_units(&self.text, precision)
    }
}

impl FromStr for Amount {
    type Err = PassportError;

    fn from_str(s: &str) -> Result<Self> {
        let mut seen_point = false;
        for (i, c) in s.char_indices() {
            match c {
                '0'..='9' => {}
                '.' if !seen_point => seen_point = true,
                '.' => {
                    return Err(PassportError::Validation(format!(
                        "amount has more than one decimal point at offset {i}: {s:?}"
                    )))
                }
                other => {
                    return Err(PassportError::Validation(format!(
                        "invalid character {other:?} in amount {s:?}"
                    )))
                }
            }
        }
        Ok(Self { text: s.to_string() })
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    /// Numeric comparison of two canonical digit strings.
    fn le_numeric(a: &str, b: &str) -> bool {
        (a.len(), a) <= (b.len(), b)
    }

    // ---- to_base_units ----

    #[test]
    fn test_empty_is_zero() {
        for p in 0..20 {
            assert_eq!(to_base_units("", p), "0");
        }
    }

    #[test]
    fn test_zero_is_zero() {
        for p in 0..20 {
            assert_eq!(to_base_units("0", p), "0");
            assert_eq!(to_base_units("0.000", p), "0");
            assert_eq!(to_base_units("000", p), "0");
        }
    }

    #[test]
    fn test_pads_fraction() {
        assert_eq!(to_base_units("1.2345", 8), "123450000");
        assert_eq!(to_base_units("1", 8), "100000000");
        assert_eq!(to_base_units("1.", 2), "100");
    }

    #[test]
    fn test_truncates_not_rounds() {
        assert_eq!(to_base_units("1.23456789123", 8), "123456789");
        assert_eq!(to_base_units("0.999", 2), "99");
    }

    #[test]
    fn test_strips_leading_zeros() {
        assert_eq!(to_base_units("007.5", 2), "750");
        assert_eq!(to_base_units("0.05", 2), "5");
        assert_eq!(to_base_units(".5", 1), "5");
    }

    #[test]
    fn test_zero_precision_ignores_fraction() {
        assert_eq!(to_base_units("5", 0), "5");
        assert_eq!(to_base_units("5.99", 0), "5");
        assert_eq!(to_base_units("0.99", 0), "0");
    }

    #[test]
    fn test_keeps_trailing_integer_zeros() {
        assert_eq!(to_base_units("1000", 0), "1000");
        assert_eq!(to_base_units("10.10", 3), "10100");
    }

    #[test]
    fn test_exceeds_u128() {
        let big = "340282366920938463463374607431768211456";
        assert_eq!(to_base_units(big, 2), format!("{big}00"));
    }

    #[test]
    fn test_second_point_ends_fraction() {
        assert_eq!(to_base_units("1.2.3", 4), "12000");
        assert_eq!(to_base_units("1.2.3", 1), "12");
        assert_eq!(to_base_units("..5", 2), "0");
        assert_eq!(to_base_units("7..", 3), "7000");
    }

    #[test]
    fn test_output_is_digits_only() {
        for input in ["", ".", "1.2.3", "1..2", "0.5.5.5", "12.", ".12", "9.99.9"] {
            for p in [0u32, 1, 4, 8] {
                let out = to_base_units(input, p);
                assert!(
                    !out.is_empty() && out.bytes().all(|b| b.is_ascii_digit()),
                    "non-digit base units {out:?} for {input:?} at precision {p}"
                );
            }
        }
    }

    #[test]
    fn test_monotonic() {
        for precision in [0u32, 1, 2, 3, 8] {
            let mut prev = String::from("0");
            for i in 0..5000u32 {
                let text = format!("{}.{:03}", i / 1000, i % 1000);
                let cur = to_base_units(&text, precision);
                assert!(
                    le_numeric(&prev, &cur),
                    "order reversed at {text} (precision {precision}): {prev} > {cur}"
                );
                prev = cur;
            }
        }
    }

    // ---- Amount ----

    #[test]
    fn test_amount_accepts_numerals() {
        assert!("".parse::<Amount>().is_ok());
        assert!("12".parse::<Amount>().is_ok());
        assert!("12.50".parse::<Amount>().is_ok());
        assert!(".5".parse::<Amount>().is_ok());
    }

    #[test]
    fn test_amount_rejects_second_point() {
        let err = "1.2.3".parse::<Amount>().unwrap_err();
        assert!(matches!(err, PassportError::Validation(_)));
        assert!(err.to_string().contains("more than one decimal point"));
    }

    #[test]
    fn test_amount_rejects_non_digits() {
        for bad in ["-1", "1e5", "1,000", " 1", "abc", "1.5x"] {
            assert!(bad.parse::<Amount>().is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_amount_fraction_digits() {
        let a: Amount = "1.2345".parse().unwrap();
        assert_eq!(a.fraction_digits(), 4);
        assert_eq!("7".parse::<Amount>().unwrap().fraction_digits(), 0);
    }

    #[test]
    fn test_amount_loses_precision() {
        let a: Amount = "1.23456789123".parse().unwrap();
        assert!(a.loses_precision(8));
        assert!(!a.loses_precision(11));
        let b: Amount = "1.500000".parse().unwrap();
        assert!(!b.loses_precision(1));
        assert!(b.loses_precision(0));
    }

    #[test]
    fn test_checked_conversion() {
        assert_eq!(to_base_units_checked("007.5", 2).unwrap(), "750");
        assert!(to_base_units_checked("1..5", 2).is_err());
    }

    // ---- from_base_units ----

    #[test]
    fn test_from_base_units() {
        assert_eq!(from_base_units("123450000", 8).unwrap(), "1.2345");
        assert_eq!(from_base_units("5", 2).unwrap(), "0.05");
        assert_eq!(from_base_units("100", 2).unwrap(), "1");
        assert_eq!(from_base_units("0", 8).unwrap(), "0");
        assert_eq!(from_base_units("0042", 0).unwrap(), "42");
    }

    #[test]
    fn test_from_base_units_rejects_non_digits() {
        assert!(from_base_units("", 2).is_err());
        assert!(from_base_units("1.5", 2).is_err());
        assert!(from_base_units("-5", 2).is_err());
    }

    #[test]
    fn test_from_base_units_inverts_conversion() {
        for text in ["1.2345", "0.05", "42", "1000.001"] {
            let base = to_base_units(text, 8);
            assert_eq!(from_base_units(&base, 8).unwrap(), text);
        }
    }

    // ---- scale_decimal ----

    #[test]
    fn test_scale_decimal_basic() {
        assert_eq!(scale_decimal(dec!(1.5), 2).unwrap(), 150);
        assert_eq!(scale_decimal(dec!(0.001), 6).unwrap(), 1000);
        assert_eq!(scale_decimal(dec!(100), 0).unwrap(), 100);
    }

    #[test]
    fn test_scale_decimal_truncates() {
        assert_eq!(scale_decimal(dec!(1.23456789123), 8).unwrap(), 123456789);
        assert_eq!(scale_decimal(dec!(0.999), 2).unwrap(), 99);
    }

    #[test]
    fn test_scale_decimal_matches_text_conversion() {
        for (d, text) in [(dec!(1.2345), "1.2345"), (dec!(7.5), "007.5")] {
            let scaled = scale_decimal(d, 8).unwrap();
            assert_eq!(scaled.to_string(), to_base_units(text, 8));
        }
    }

    #[test]
    fn test_scale_decimal_zero() {
        assert_eq!(scale_decimal(dec!(0), 18).unwrap(), 0);
        assert_eq!(scale_decimal(dec!(-0.0), 2).unwrap(), 0);
    }

    #[test]
    fn test_scale_decimal_negative_returns_err() {
        assert!(matches!(
            scale_decimal(dec!(-1.0), 2),
            Err(PassportError::Overflow(_))
        ));
    }

    #[test]
    fn test_scale_decimal_precision_limit() {
        assert!(scale_decimal(dec!(1), 29).is_err());
        assert!(scale_decimal(Decimal::MAX, 28).is_err());
    }
}
