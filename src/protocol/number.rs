// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Decimal number parsing for command arguments.
//!
//! Accepted: `[+-]digits[.digits]`, where either side of the point may be empty but not both.
//! No exponents, no `inf`/`nan`, no surrounding garbage.

use core::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseNumberError {
    Empty,
    InvalidCharacter(char),
    MultipleDecimalPoints,
    NoDigits,
}

impl fmt::Display for ParseNumberError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseNumberError::Empty => f.write_str("empty number"),
            ParseNumberError::InvalidCharacter(c) => write!(f, "unexpected character '{}'", c),
            ParseNumberError::MultipleDecimalPoints => f.write_str("more than one decimal point"),
            ParseNumberError::NoDigits => f.write_str("no digits"),
        }
    }
}

pub fn str_to_float(s: &str) -> Result<f32, ParseNumberError> {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    if s.is_empty() {
        return Err(ParseNumberError::Empty);
    }

    let mut seen_point = false;
    let mut seen_digit = false;
    for c in digits.chars() {
        match c {
            '0'..='9' => seen_digit = true,
            '.' if seen_point => return Err(ParseNumberError::MultipleDecimalPoints),
            '.' => seen_point = true,
            other => return Err(ParseNumberError::InvalidCharacter(other)),
        }
    }
    if !seen_digit {
        return Err(ParseNumberError::NoDigits);
    }

    s.parse::<f32>().map_err(|_| ParseNumberError::NoDigits)
}
