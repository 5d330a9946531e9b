//! Ready-made big-number backends.
//!
//! [`decimal`] keeps numbers as normalized digit strings and needs no extra
//! dependencies. [`bigint`] stores them in `num-bigint` integers and is
//! available with the `num-bigint` feature.

use core::{cmp::Ordering, fmt::Write as _};

#[cfg(feature = "num-bigint")]
pub mod bigint;
pub mod decimal;

fn split_sign(text: &str) -> (bool, &str) {
    if let Some(rest) = text.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = text.strip_prefix('+') {
        (false, rest)
    } else {
        (false, text)
    }
}

fn all_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

/// Sign and magnitude of an integer numeral, leading zeros stripped. Zero
/// comes back as `(false, "")`.
pub(crate) fn parse_integer(text: &str) -> Option<(bool, &str)> {
    let (negative, digits) = split_sign(text);
    if !all_digits(digits) {
        return None;
    }
    let digits = digits.trim_start_matches('0');
    Some((negative && !digits.is_empty(), digits))
}

/// A real numeral normalized to `digits * 10^exponent`.
///
/// `digits` has neither leading nor trailing zeros; zero is the empty string
/// with exponent 0 and no sign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Numeral {
    pub(crate) negative: bool,
    pub(crate) digits: String,
    pub(crate) exponent: i64,
}

impl Numeral {
    /// Parse `[+-]digits[.digits][(e|E)[+-]digits]`.
    pub(crate) fn parse(text: &str) -> Option<Self> {
        let (negative, rest) = split_sign(text);
        let bytes = rest.as_bytes();

        let int_len = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
        if int_len == 0 {
            return None;
        }
        let mut end = int_len;
        let mut frac = "";
        if bytes.get(end) == Some(&b'.') {
            let n = bytes[end + 1..].iter().take_while(|b| b.is_ascii_digit()).count();
            if n == 0 {
                return None;
            }
            frac = &rest[end + 1..end + 1 + n];
            end += 1 + n;
        }

        let mut exponent: i64 = 0;
        if matches!(bytes.get(end), Some(b'e' | b'E')) {
            let (exp_negative, exp_digits) = split_sign(&rest[end + 1..]);
            if !all_digits(exp_digits) {
                return None;
            }
            let magnitude: i64 = exp_digits.parse().ok()?;
            exponent = if exp_negative { -magnitude } else { magnitude };
        } else if end != bytes.len() {
            return None;
        }

        exponent = exponent.checked_sub(i64::try_from(frac.len()).ok()?)?;
        let mut digits = String::with_capacity(int_len + frac.len());
        digits.push_str(rest[..int_len].trim_start_matches('0'));
        if digits.is_empty() {
            digits.push_str(frac.trim_start_matches('0'));
        } else {
            digits.push_str(frac);
        }
        while digits.ends_with('0') {
            digits.pop();
            exponent = exponent.checked_add(1)?;
        }
        if digits.is_empty() {
            return Some(Self::zero());
        }
        Some(Self {
            negative,
            digits,
            exponent,
        })
    }

    pub(crate) fn zero() -> Self {
        Self {
            negative: false,
            digits: String::new(),
            exponent: 0,
        }
    }

    pub(crate) fn is_zero(&self) -> bool {
        self.digits.is_empty()
    }

    /// Exponent of the leading digit, as in `d.ddd * 10^adjusted`.
    fn adjusted(&self) -> i64 {
        let len = i64::try_from(self.digits.len()).unwrap_or(i64::MAX);
        self.exponent.saturating_add(len - 1)
    }

    fn compare_magnitude(&self, other: &Self) -> Ordering {
        match (self.is_zero(), other.is_zero()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => self
                .adjusted()
                .cmp(&other.adjusted())
                .then_with(|| self.digits.as_bytes().cmp(other.digits.as_bytes())),
        }
    }

    pub(crate) fn compare(&self, other: &Self) -> Ordering {
        match (self.negative, other.negative) {
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            (false, false) => self.compare_magnitude(other),
            (true, true) => other.compare_magnitude(self),
        }
    }

    /// Decimal text that always reads back as a JSON real: positional with a
    /// fraction for moderate exponents, `d.ddde±x` otherwise.
    pub(crate) fn render(&self) -> String {
        let mut out = String::with_capacity(self.digits.len() + 8);
        if self.negative {
            out.push('-');
        }
        if self.is_zero() {
            out.push_str("0.0");
            return out;
        }

        let adjusted = self.adjusted();
        if (-7..21).contains(&adjusted) {
            let len = i64::try_from(self.digits.len()).unwrap_or(i64::MAX);
            if self.exponent >= 0 {
                out.push_str(&self.digits);
                for _ in 0..self.exponent {
                    out.push('0');
                }
                out.push_str(".0");
            } else {
                let point = len + self.exponent;
                match usize::try_from(point) {
                    Ok(p) if p > 0 => {
                        out.push_str(&self.digits[..p]);
                        out.push('.');
                        out.push_str(&self.digits[p..]);
                    }
                    _ => {
                        out.push_str("0.");
                        for _ in point..0 {
                            out.push('0');
                        }
                        out.push_str(&self.digits);
                    }
                }
            }
        } else {
            let (first, rest) = self.digits.split_at(1);
            out.push_str(first);
            if !rest.is_empty() {
                out.push('.');
                out.push_str(rest);
            }
            let _ = write!(out, "e{adjusted}");
        }
        out
    }
}

/// Render `value` through `{:e}`, which is the shortest text that reads
/// back to the same `f64`.
pub(crate) fn real_text(value: f64) -> Option<String> {
    value.is_finite().then(|| format!("{value:e}"))
}
