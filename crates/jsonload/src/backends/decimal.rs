//! Digit-string backends.
//!
//! Numbers are stored as normalized ASCII digits, so every value the lexer
//! hands over survives without rounding, at the cost of arithmetic the
//! decoder never needs anyway. Digits are wiped through the context's
//! [`Memory`] when a number is deleted.

use core::cmp::Ordering;

use super::{Numeral, parse_integer, real_text};
use crate::backend::{
    BigIntegerBackend, BigNumberBackend, BigRealBackend, Memory, write_truncated,
};

/// An integer as sign and magnitude digits. Zero is unsigned and has no
/// digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecimalDigits {
    negative: bool,
    digits: String,
}

impl DecimalDigits {
    fn compare(&self, other: &Self) -> Ordering {
        let magnitude = |a: &Self, b: &Self| {
            a.digits
                .len()
                .cmp(&b.digits.len())
                .then_with(|| a.digits.cmp(&b.digits))
        };
        match (self.negative, other.negative) {
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            (false, false) => magnitude(self, other),
            (true, true) => magnitude(other, self),
        }
    }

    fn render(&self) -> String {
        match (self.negative, self.digits.is_empty()) {
            (_, true) => "0".to_string(),
            (true, false) => format!("-{}", self.digits),
            (false, false) => self.digits.clone(),
        }
    }
}

fn wipe(digits: String, memory: &Memory) {
    let mut bytes = memory.scrubbed(digits.into_bytes());
    bytes.clear();
}

/// Integer backend over [`DecimalDigits`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DecimalInteger;

impl BigNumberBackend for DecimalInteger {
    type Num = DecimalDigits;

    fn copy(&self, num: &DecimalDigits, _memory: &Memory) -> Option<DecimalDigits> {
        Some(num.clone())
    }

    fn delete(&self, num: DecimalDigits, memory: &Memory) {
        wipe(num.digits, memory);
    }

    fn compare(&self, a: &DecimalDigits, b: &DecimalDigits, _memory: &Memory) -> Ordering {
        a.compare(b)
    }

    fn to_decimal(&self, num: &DecimalDigits, buf: &mut [u8], memory: &Memory) -> usize {
        let text = memory.scrubbed(num.render().into_bytes());
        write_truncated(&text, buf)
    }

    fn from_decimal(&self, text: &str, _memory: &Memory) -> Option<DecimalDigits> {
        let (negative, digits) = parse_integer(text)?;
        Some(DecimalDigits {
            negative,
            digits: digits.to_string(),
        })
    }
}

impl BigIntegerBackend for DecimalInteger {
    fn from_int(&self, value: i64, memory: &Memory) -> Option<DecimalDigits> {
        self.from_decimal(&value.to_string(), memory)
    }
}

/// A real as sign, significant digits and a power of ten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecimalNumeral(Numeral);

/// Real backend over [`DecimalNumeral`].
///
/// Decimal text comes back positional for moderate exponents and in
/// `d.ddde±x` form otherwise, and always contains a `.` or an exponent.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecimalReal;

impl BigNumberBackend for DecimalReal {
    type Num = DecimalNumeral;

    fn copy(&self, num: &DecimalNumeral, _memory: &Memory) -> Option<DecimalNumeral> {
        Some(num.clone())
    }

    fn delete(&self, num: DecimalNumeral, memory: &Memory) {
        wipe(num.0.digits, memory);
    }

    fn compare(&self, a: &DecimalNumeral, b: &DecimalNumeral, _memory: &Memory) -> Ordering {
        a.0.compare(&b.0)
    }

    fn to_decimal(&self, num: &DecimalNumeral, buf: &mut [u8], memory: &Memory) -> usize {
        let text = memory.scrubbed(num.0.render().into_bytes());
        write_truncated(&text, buf)
    }

    fn from_decimal(&self, text: &str, _memory: &Memory) -> Option<DecimalNumeral> {
        Numeral::parse(text).map(DecimalNumeral)
    }
}

impl BigRealBackend for DecimalReal {
    fn from_real(&self, value: f64, memory: &Memory) -> Option<DecimalNumeral> {
        self.from_decimal(&real_text(value)?, memory)
    }
}
