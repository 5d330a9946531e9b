//! Backends on top of [`num_bigint::BigInt`].

use core::cmp::Ordering;

use num_bigint::BigInt;

use super::{Numeral, parse_integer, real_text};
use crate::backend::{
    BigIntegerBackend, BigNumberBackend, BigRealBackend, Memory, write_truncated,
};

/// Integer backend storing [`BigInt`] values.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumBigInt;

impl BigNumberBackend for NumBigInt {
    type Num = BigInt;

    fn copy(&self, num: &BigInt, _memory: &Memory) -> Option<BigInt> {
        Some(num.clone())
    }

    fn compare(&self, a: &BigInt, b: &BigInt, _memory: &Memory) -> Ordering {
        a.cmp(b)
    }

    fn to_decimal(&self, num: &BigInt, buf: &mut [u8], memory: &Memory) -> usize {
        let text = memory.scrubbed(num.to_str_radix(10).into_bytes());
        write_truncated(&text, buf)
    }

    fn from_decimal(&self, text: &str, _memory: &Memory) -> Option<BigInt> {
        // `parse_bytes` also takes `_` separators; validate first.
        let (negative, digits) = parse_integer(text)?;
        if digits.is_empty() {
            return Some(BigInt::default());
        }
        let magnitude = BigInt::parse_bytes(digits.as_bytes(), 10)?;
        Some(if negative { -magnitude } else { magnitude })
    }
}

impl BigIntegerBackend for NumBigInt {
    fn from_int(&self, value: i64, _memory: &Memory) -> Option<BigInt> {
        Some(BigInt::from(value))
    }
}

/// A real as `mantissa * 10^exponent`, with trailing zeros folded into the
/// exponent so equal values share one representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaledBigInt {
    mantissa: BigInt,
    exponent: i64,
}

impl ScaledBigInt {
    fn numeral(&self) -> Numeral {
        let text = self.mantissa.to_str_radix(10);
        let (negative, digits) = match text.strip_prefix('-') {
            Some(digits) => (true, digits),
            None => (false, text.as_str()),
        };
        if self.mantissa == BigInt::default() {
            return Numeral::zero();
        }
        Numeral {
            negative,
            digits: digits.to_string(),
            exponent: self.exponent,
        }
    }
}

/// Real backend storing [`ScaledBigInt`] values.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumBigDecimal;

impl BigNumberBackend for NumBigDecimal {
    type Num = ScaledBigInt;

    fn copy(&self, num: &ScaledBigInt, _memory: &Memory) -> Option<ScaledBigInt> {
        Some(num.clone())
    }

    fn compare(&self, a: &ScaledBigInt, b: &ScaledBigInt, _memory: &Memory) -> Ordering {
        // Normalized numerals order without scaling either mantissa, which
        // keeps `1e999999999` from allocating a billion digits.
        a.numeral().compare(&b.numeral())
    }

    fn to_decimal(&self, num: &ScaledBigInt, buf: &mut [u8], memory: &Memory) -> usize {
        let text = memory.scrubbed(num.numeral().render().into_bytes());
        write_truncated(&text, buf)
    }

    fn from_decimal(&self, text: &str, _memory: &Memory) -> Option<ScaledBigInt> {
        let numeral = Numeral::parse(text)?;
        if numeral.is_zero() {
            return Some(ScaledBigInt {
                mantissa: BigInt::default(),
                exponent: 0,
            });
        }
        let magnitude = BigInt::parse_bytes(numeral.digits.as_bytes(), 10)?;
        Some(ScaledBigInt {
            mantissa: if numeral.negative { -magnitude } else { magnitude },
            exponent: numeral.exponent,
        })
    }
}

impl BigRealBackend for NumBigDecimal {
    fn from_real(&self, value: f64, memory: &Memory) -> Option<ScaledBigInt> {
        self.from_decimal(&real_text(value)?, memory)
    }
}
