use lazy_static::lazy_static;
use num::{BigInt, BigRational, One, Signed, ToPrimitive, Zero};
use regex::Regex;
use std::str::FromStr;

use crate::{calc_err, format_calc_err, CalcResult};

/// Numbers are exact rationals with arbitrary precision, since `7 / 2` is not integral
/// and integer literals of any length are allowed.
pub type Number = BigRational;

/// Maximal number of fractional digits shown by [`format_number`](format_number).
pub const N_DISPLAY_DIGITS: usize = 12;

/// Exponents of decimal operands beyond this magnitude are rejected.
pub const MAX_DECIMAL_EXPONENT: i64 = 1000;

lazy_static! {
    static ref RE_DECIMAL: Regex =
        Regex::new(r"^([+-]?)([0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE]([+-]?[0-9]+))?$").unwrap();
}

pub fn from_integer(n: BigInt) -> Number {
    BigRational::from_integer(n)
}

/// Parses an integer literal such as `-42`. Every literal accepted by the tokenizer
/// is accepted here.
pub fn parse_integer(text: &str) -> CalcResult<Number> {
    BigInt::from_str(text)
        .map(from_integer)
        .map_err(|_| format_calc_err!(InvalidInputError, "'{}' is not an integer", text))
}

/// Parses decimal text like `-2.5`, `.5`, `4.`, or `1e-3` exactly into a rational.
/// Surrounding whitespace is ignored.
///
/// # Errors
///
/// [`InvalidInputError`](crate::ErrorKind::InvalidInputError) if the text is not a decimal
/// number or its exponent is out of range.
///
pub fn parse_decimal(text: &str) -> CalcResult<Number> {
    let trimmed = text.trim();
    let caps = RE_DECIMAL
        .captures(trimmed)
        .ok_or_else(|| format_calc_err!(InvalidInputError, "'{}' is not a number", text))?;
    let sign = caps.get(1).map_or("", |m| m.as_str());
    let mantissa = caps.get(2).map_or("", |m| m.as_str());
    let exponent = match caps.get(3) {
        Some(e) => e
            .as_str()
            .parse::<i64>()
            .ok()
            .filter(|e| e.abs() <= MAX_DECIMAL_EXPONENT)
            .ok_or_else(|| format_calc_err!(InvalidInputError, "exponent of '{}' out of range", text))?,
        None => 0,
    };
    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((i, f)) => (i, f),
        None => (mantissa, ""),
    };
    let digits = format!("{sign}{int_part}{frac_part}");
    let numerator = BigInt::from_str(&digits)
        .map_err(|_| format_calc_err!(InvalidInputError, "'{}' is not a number", text))?;
    let scale = exponent - frac_part.len() as i64;
    let ten_pow = num::pow(BigInt::from(10), scale.unsigned_abs() as usize);
    Ok(if scale >= 0 {
        from_integer(numerator * ten_pow)
    } else {
        BigRational::new(numerator, ten_pow)
    })
}

/// Divides `a` by `b`.
///
/// # Errors
///
/// [`DivisionByZero`](crate::ErrorKind::DivisionByZero) if `b` is zero.
pub fn checked_div(a: &Number, b: &Number) -> CalcResult<Number> {
    if b.is_zero() {
        Err(calc_err!(DivisionByZero, "division by zero"))
    } else {
        Ok(a / b)
    }
}

/// Renders integers as integers and everything else as decimal with at most
/// [`N_DISPLAY_DIGITS`](N_DISPLAY_DIGITS) fractional digits, rounded half away from zero.
pub fn format_number(x: &Number) -> String {
    if is_integral(x) {
        return x.to_integer().to_string();
    }
    let scale = num::pow(BigInt::from(10), N_DISPLAY_DIGITS);
    let scaled = (x.abs() * from_integer(scale.clone())).round().to_integer();
    let int_part = &scaled / &scale;
    let frac_part = &scaled % &scale;
    let frac = format!("{:0>width$}", frac_part.to_string(), width = N_DISPLAY_DIGITS);
    let frac = frac.trim_end_matches('0');
    let sign = if x.is_negative() && !scaled.is_zero() {
        "-"
    } else {
        ""
    };
    if frac.is_empty() {
        format!("{sign}{int_part}")
    } else {
        format!("{sign}{int_part}.{frac}")
    }
}

/// Lossy conversion for consumers that want a float.
pub fn to_f64(x: &Number) -> Option<f64> {
    x.to_f64()
}

pub fn is_integral(x: &Number) -> bool {
    x.denom().is_one()
}

#[cfg(test)]
fn rat(n: i64, d: i64) -> Number {
    BigRational::new(BigInt::from(n), BigInt::from(d))
}

#[test]
fn test_parse_decimal() {
    assert_eq!(parse_decimal("2").unwrap(), rat(2, 1));
    assert_eq!(parse_decimal(" -2.5 ").unwrap(), rat(-5, 2));
    assert_eq!(parse_decimal(".5").unwrap(), rat(1, 2));
    assert_eq!(parse_decimal("4.").unwrap(), rat(4, 1));
    assert_eq!(parse_decimal("+0.125").unwrap(), rat(1, 8));
    assert_eq!(parse_decimal("1e3").unwrap(), rat(1000, 1));
    assert_eq!(parse_decimal("25E-2").unwrap(), rat(1, 4));
    assert_eq!(parse_decimal("0.1").unwrap(), rat(1, 10));
    for bad in ["", " ", "abc", ".", "1.2.3", "--1", "1e", "e5", "inf", "nan", "1e100000"] {
        let err = parse_decimal(bad).unwrap_err();
        assert_eq!(err.kind, crate::ErrorKind::InvalidInputError, "{bad}");
    }
}

#[test]
fn test_format_number() {
    assert_eq!(format_number(&rat(7, 1)), "7");
    assert_eq!(format_number(&rat(-7, 1)), "-7");
    assert_eq!(format_number(&rat(7, 2)), "3.5");
    assert_eq!(format_number(&rat(-7, 2)), "-3.5");
    assert_eq!(format_number(&rat(1, 3)), "0.333333333333");
    assert_eq!(format_number(&rat(2, 3)), "0.666666666667");
    assert_eq!(format_number(&rat(-1, 3)), "-0.333333333333");
    assert_eq!(format_number(&rat(1, 10i64.pow(14))), "0");
}

#[test]
fn test_checked_div() {
    assert_eq!(checked_div(&rat(1, 1), &rat(4, 1)).unwrap(), rat(1, 4));
    assert_eq!(
        checked_div(&rat(1, 1), &rat(0, 1)).unwrap_err().kind,
        crate::ErrorKind::DivisionByZero
    );
    assert!(is_integral(&parse_integer("-12").unwrap()));
    assert!(!is_integral(&rat(1, 2)));
    assert_eq!(to_f64(&rat(1, 4)), Some(0.25));
}
