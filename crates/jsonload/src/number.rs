//! Number tokens.
//!
//! The grammar is checked character by character while the token is saved.
//! The saved text is then classified: native `i64`, native `f64`, or handed
//! to a big-number backend when the options ask for it or the native type
//! would lose the value.

use crate::{
    error::{DecodeError, ErrorKind},
    lexer::{Lexer, Token},
    options::{BigIntegerMode, BigRealMode},
    stream::ByteSource,
};

/// Decimal digits an `f64` is guaranteed to round-trip (`DBL_DIG`).
#[allow(clippy::cast_possible_truncation)]
const PRECISION_DIGITS: usize = f64::DIGITS as usize;

fn is_digit(c: Option<char>) -> bool {
    c.is_some_and(|c| c.is_ascii_digit())
}

/// Significant digits of a mantissa: sign, decimal point and leading and
/// trailing zeros do not count.
pub(crate) fn significant_digits(mantissa: &str) -> usize {
    let digits = || mantissa.bytes().filter(u8::is_ascii_digit);
    let total = digits().count();
    let leading = digits().take_while(|&b| b == b'0').count();
    if leading == total {
        return 0;
    }
    let trailing = digits().rev().take_while(|&b| b == b'0').count();
    total - leading - trailing
}

/// Whether `value`, parsed from `text`, fell below the normal `f64` range.
fn underflowed(value: f64, text: &str) -> bool {
    if value.is_subnormal() {
        return true;
    }
    value == 0.0
        && text
            .bytes()
            .take_while(|&b| b != b'e' && b != b'E')
            .any(|b| matches!(b, b'1'..=b'9'))
}

impl<S: ByteSource> Lexer<'_, S> {
    /// Scan a number whose first character, `-` or a digit, is already
    /// saved.
    pub(crate) fn scan_number(&mut self, first: char) -> Result<Token, DecodeError> {
        let mut c = Some(first);
        if first == '-' {
            c = self.get_save()?;
        }

        match c {
            Some('0') => {
                c = self.get_save()?;
                if is_digit(c) {
                    self.unget_unsave(c);
                    return Err(self.error(
                        ErrorKind::Lexical,
                        "numbers may not have unnecessary leading zeros",
                    ));
                }
            }
            Some('1'..='9') => {
                c = self.get_save()?;
                while is_digit(c) {
                    c = self.get_save()?;
                }
            }
            _ => {
                self.unget_unsave(c);
                return Ok(Token::Invalid);
            }
        }

        if !matches!(c, Some('.' | 'e' | 'E')) {
            self.unget_unsave(c);
            return self.integer_token();
        }

        if c == Some('.') {
            c = self.get()?;
            match c.filter(char::is_ascii_digit) {
                Some(d) => self.save(d),
                None => {
                    self.unget(c);
                    return Ok(Token::Invalid);
                }
            }
            c = self.get_save()?;
            while is_digit(c) {
                c = self.get_save()?;
            }
        }

        // Counted before the exponent so `1.5` and `1.5e3` count alike.
        let significant = (self.options.big_reals == BigRealMode::OnPrecisionLoss)
            .then(|| significant_digits(self.saved_text()));

        if matches!(c, Some('e' | 'E')) {
            c = self.get_save()?;
            if matches!(c, Some('+' | '-')) {
                c = self.get_save()?;
            }
            if !is_digit(c) {
                self.unget_unsave(c);
                return Ok(Token::Invalid);
            }
            c = self.get_save()?;
            while is_digit(c) {
                c = self.get_save()?;
            }
        }

        self.unget_unsave(c);
        self.real_token(significant)
    }

    fn integer_token(&self) -> Result<Token, DecodeError> {
        let mode = self.options.big_integers;
        if mode == BigIntegerMode::Always {
            return self.big_integer();
        }

        let parsed = self.saved_text().parse::<i64>();
        if parsed.is_err() && mode.enabled() {
            return self.big_integer();
        }
        if self.options.decode_int_as_real {
            return self.native_real();
        }

        match parsed {
            Ok(n) => Ok(Token::Integer(n)),
            // The grammar is already checked, so the only failure left is
            // range. The sign comes from the text itself.
            Err(_) if self.saved_text().starts_with('-') => {
                Err(self.error(ErrorKind::Policy, "too big negative integer"))
            }
            Err(_) => Err(self.error(ErrorKind::Policy, "too big integer")),
        }
    }

    fn real_token(&self, significant: Option<usize>) -> Result<Token, DecodeError> {
        let mode = self.options.big_reals;
        if mode == BigRealMode::Always {
            return self.big_real();
        }
        if significant.is_some_and(|n| n + 1 >= PRECISION_DIGITS) {
            return self.big_real_or_native();
        }

        match self.native_real() {
            Err(err) if mode.enabled() && err.kind() == ErrorKind::Policy => {
                self.big_real_or_native()
            }
            Ok(Token::Real(value)) if mode.enabled() && underflowed(value, self.saved_text()) => {
                self.big_real_or_native()
            }
            other => other,
        }
    }

    /// Convert the saved text straight to `f64`.
    fn native_real(&self) -> Result<Token, DecodeError> {
        let value: f64 = self
            .saved_text()
            .parse()
            .map_err(|_| self.error(ErrorKind::Lexical, "invalid number"))?;
        if value.is_infinite() {
            return Err(self.error(ErrorKind::Policy, "real number overflow"));
        }
        Ok(Token::Real(value))
    }

    fn big_integer(&self) -> Result<Token, DecodeError> {
        self.context
            .big_integer_from_decimal(self.saved_text())
            .map(Token::BigInteger)
            .ok_or_else(|| self.error(ErrorKind::Lexical, "invalid big integer"))
    }

    fn big_real(&self) -> Result<Token, DecodeError> {
        self.context
            .big_real_from_decimal(self.saved_text())
            .map(Token::BigReal)
            .ok_or_else(|| self.error(ErrorKind::Lexical, "invalid big real"))
    }

    /// A big real if the backend can hold the text, the native conversion
    /// otherwise. Precision-loss mode never fails a token the native path
    /// accepts.
    fn big_real_or_native(&self) -> Result<Token, DecodeError> {
        match self.context.big_real_from_decimal(self.saved_text()) {
            Some(n) => Ok(Token::BigReal(n)),
            None => self.native_real(),
        }
    }
}
