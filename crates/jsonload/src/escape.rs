//! Decoding of four-digit `\uXXXX` escapes and UTF-16 surrogate pairs.
//!
//! The [`UnicodeEscapeBuffer`] type accumulates exactly four ASCII
//! hexadecimal digits (`0-9`, `A-F`, `a-f`) and yields the UTF-16 code unit
//! they spell. Pairing code units into scalar values is left to
//! [`combine_surrogates`], because only the caller knows whether a second
//! escape follows.

/// Feeding the buffer something that is not a hexadecimal digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NotHex(pub u8);

/// Buffer for accumulating four hexadecimal digits into one UTF-16 code
/// unit.
#[derive(Debug, Default)]
pub(crate) struct UnicodeEscapeBuffer {
    value: u16,
    len: u8,
}

impl UnicodeEscapeBuffer {
    /// Creates a new, empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one digit.
    ///
    /// Returns `Ok(None)` while fewer than four digits have been seen and
    /// `Ok(Some(unit))` on the fourth, after which the buffer starts over.
    pub fn feed(&mut self, c: u8) -> Result<Option<u16>, NotHex> {
        let digit = match c {
            b'0'..=b'9' => c - b'0',
            b'a'..=b'f' => c - b'a' + 10,
            b'A'..=b'F' => c - b'A' + 10,
            _ => return Err(NotHex(c)),
        };
        self.value = (self.value << 4) | u16::from(digit);
        self.len += 1;
        if self.len == 4 {
            let unit = self.value;
            *self = Self::default();
            Ok(Some(unit))
        } else {
            Ok(None)
        }
    }

    /// Decodes the four digits at the start of `digits`.
    pub fn decode4(digits: &[u8]) -> Option<u16> {
        let mut buf = Self::new();
        let mut unit = None;
        for &c in digits.get(..4)? {
            unit = buf.feed(c).ok()?;
        }
        unit
    }
}

pub(crate) fn is_high_surrogate(unit: u16) -> bool {
    (0xD800..=0xDBFF).contains(&unit)
}

pub(crate) fn is_low_surrogate(unit: u16) -> bool {
    (0xDC00..=0xDFFF).contains(&unit)
}

/// Joins a high and a low surrogate into the supplementary-plane scalar they
/// encode.
pub(crate) fn combine_surrogates(high: u16, low: u16) -> u32 {
    ((u32::from(high) - 0xD800) << 10) + (u32::from(low) - 0xDC00) + 0x10000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_decoding() {
        let mut buf = UnicodeEscapeBuffer::new();
        assert_eq!(buf.feed(b'0'), Ok(None));
        assert_eq!(buf.feed(b'0'), Ok(None));
        assert_eq!(buf.feed(b'4'), Ok(None));
        assert_eq!(buf.feed(b'1'), Ok(Some(0x41)));
    }

    #[test]
    fn mixed_case_hex() {
        assert_eq!(UnicodeEscapeBuffer::decode4(b"AbCd"), Some(0xABCD));
        assert_eq!(UnicodeEscapeBuffer::decode4(b"d800rest"), Some(0xD800));
    }

    #[test]
    fn restarts_after_four_digits() {
        let mut buf = UnicodeEscapeBuffer::new();
        for c in *b"FFF" {
            assert_eq!(buf.feed(c), Ok(None));
        }
        assert_eq!(buf.feed(b'F'), Ok(Some(0xFFFF)));
        for c in *b"000" {
            assert_eq!(buf.feed(c), Ok(None));
        }
        assert_eq!(buf.feed(b'9'), Ok(Some(0x0009)));
    }

    #[test]
    fn invalid_hex_error() {
        let mut buf = UnicodeEscapeBuffer::new();
        assert_eq!(buf.feed(b'G'), Err(NotHex(b'G')));
        assert_eq!(UnicodeEscapeBuffer::decode4(b"12"), None);
        assert_eq!(UnicodeEscapeBuffer::decode4(b"12x4"), None);
    }

    #[test]
    fn surrogate_pairs() {
        assert!(is_high_surrogate(0xD800) && is_high_surrogate(0xDBFF));
        assert!(is_low_surrogate(0xDC00) && is_low_surrogate(0xDFFF));
        assert!(!is_high_surrogate(0xDC00) && !is_low_surrogate(0xDBFF));
        assert_eq!(combine_surrogates(0xD800, 0xDC00), 0x10000);
        assert_eq!(combine_surrogates(0xDBFF, 0xDFFF), 0x10FFFF);
        assert_eq!(combine_surrogates(0xD83D, 0xDE00), 0x1F600);
    }
}
