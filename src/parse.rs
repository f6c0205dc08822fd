// SPDX-License-Identifier: Apache-2.0

//! Text to `Decimal128` conversion.

use std::str::FromStr;

use crate::arith::U256;
use crate::context::{Context, Rounding, Status};
use crate::decimal128::{reduce, Decimal128, BIAS, LIMIT};
use crate::error::{ParseDecimalError, ParseErrorKind};

// Exponents past this point overflow or underflow no matter the mantissa;
// clamping keeps the arithmetic in `i32`.
const EXP_CLAMP: i32 = 100_000;

/// Parses a numeral: an optional sign, digits with an optional decimal
/// point, an optional `e`/`E` exponent, or the words `Inf`, `Infinity`, or
/// `NaN` (case-insensitive, optionally signed).
///
/// Mantissas beyond 34 digits are rounded under `rounding`; exponents beyond
/// the representable range clamp to infinity or zero of the appropriate
/// sign. Leading and trailing whitespace is rejected.
pub(crate) fn parse_decimal(
    s: &str,
    rounding: Rounding,
    status: &mut Status,
) -> Result<Decimal128, ParseDecimalError> {
    let bytes = s.as_bytes();
    if bytes.is_empty() {
        return Err(ParseDecimalError {
            kind: ParseErrorKind::Empty,
            pos: 0,
        });
    }

    let mut i = 0;
    let mut neg = false;
    if let b'+' | b'-' = bytes[0] {
        neg = bytes[0] == b'-';
        i = 1;
    }

    match bytes.get(i) {
        None => {
            return Err(ParseDecimalError {
                kind: ParseErrorKind::MissingDigits,
                pos: i,
            });
        }
        Some(b'0'..=b'9' | b'.') => {}
        Some(_) => return parse_special(&bytes[i..], neg, i),
    }

    let mut sig: u128 = 0;
    let mut kept = 0u32;
    let mut frac_digits: i32 = 0;
    let mut extra_exp: i32 = 0;
    let mut rem: u8 = 0;
    let mut sticky = false;
    let mut seen_digit = false;
    let mut seen_dot = false;
    let mut exp_part: i32 = 0;

    while i < bytes.len() {
        match bytes[i] {
            c @ b'0'..=b'9' => {
                seen_digit = true;
                let d = c - b'0';
                if kept < 38 {
                    sig = sig * 10 + u128::from(d);
                    if sig != 0 {
                        kept += 1;
                    }
                    if seen_dot {
                        frac_digits += 1;
                    }
                } else if kept == 38 {
                    // The 39th significant digit becomes the rounding
                    // digit; everything further is sticky.
                    rem = d;
                    kept += 1;
                    if !seen_dot {
                        extra_exp += 1;
                    }
                } else {
                    sticky = sticky || d != 0;
                    if !seen_dot {
                        extra_exp += 1;
                    }
                }
            }
            b'.' if !seen_dot => seen_dot = true,
            b'e' | b'E' if seen_digit => {
                exp_part = parse_exponent(bytes, i + 1)?;
                i = bytes.len();
                break;
            }
            _ => {
                return Err(ParseDecimalError {
                    kind: ParseErrorKind::InvalidCharacter,
                    pos: i,
                });
            }
        }
        i += 1;
    }

    if !seen_digit {
        return Err(ParseDecimalError {
            kind: ParseErrorKind::MissingDigits,
            pos: i,
        });
    }

    let exp = exp_part
        .saturating_add(extra_exp)
        .saturating_sub(frac_digits)
        .saturating_add(BIAS);

    if sig == 0 && rem == 0 && !sticky {
        return Ok(Decimal128::from_parts(neg, 0, exp.clamp(0, LIMIT) as u32));
    }

    Ok(reduce(
        rounding,
        neg,
        U256::from_u128(sig),
        exp,
        rem,
        sticky,
        status,
    ))
}

fn parse_exponent(bytes: &[u8], mut i: usize) -> Result<i32, ParseDecimalError> {
    let mut neg = false;
    if let Some(b'+' | b'-') = bytes.get(i) {
        neg = bytes[i] == b'-';
        i += 1;
    }

    if i >= bytes.len() {
        return Err(ParseDecimalError {
            kind: ParseErrorKind::MissingExponent,
            pos: i,
        });
    }

    let mut exp: i32 = 0;
    while i < bytes.len() {
        let c = bytes[i];
        if !c.is_ascii_digit() {
            return Err(ParseDecimalError {
                kind: ParseErrorKind::InvalidCharacter,
                pos: i,
            });
        }
        if exp < EXP_CLAMP {
            exp = exp * 10 + i32::from(c - b'0');
        }
        i += 1;
    }

    Ok(if neg { -exp } else { exp })
}

fn parse_special(
    word: &[u8],
    neg: bool,
    pos: usize,
) -> Result<Decimal128, ParseDecimalError> {
    if word.eq_ignore_ascii_case(b"inf") || word.eq_ignore_ascii_case(b"infinity") {
        return Ok(if neg {
            Decimal128::NEG_INFINITY
        } else {
            Decimal128::INFINITY
        });
    }
    if word.eq_ignore_ascii_case(b"nan") {
        return Ok(Decimal128::NAN);
    }
    Err(ParseDecimalError {
        kind: ParseErrorKind::InvalidCharacter,
        pos,
    })
}

impl Context<Decimal128> {
    /// Parses a number from its string representation.
    ///
    /// Mantissas with more than 34 significant digits are rounded under the
    /// context's rounding mode. An unrecognizable string sets the
    /// conversion-syntax status flag in addition to returning an error.
    pub fn parse(&mut self, s: &str) -> Result<Decimal128, ParseDecimalError> {
        match parse_decimal(s, self.rounding, &mut self.status) {
            Ok(d) => Ok(d),
            Err(err) => {
                self.status.set_conversion_syntax();
                Err(err)
            }
        }
    }
}

impl FromStr for Decimal128 {
    type Err = ParseDecimalError;

    fn from_str(s: &str) -> Result<Decimal128, ParseDecimalError> {
        Context::<Decimal128>::default().parse(s)
    }
}
