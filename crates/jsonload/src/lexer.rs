//! Tokenizer over a code point [`Stream`].
//!
//! The lexer keeps the verbatim text of the token being scanned. That text
//! is quoted back in error messages, and number tokens are re-parsed from it.
//! Number classification lives in `number.rs`.

use bstr::BString;

use crate::{
    backend::{BigInteger, BigReal},
    context::DecodeContext,
    error::{DecodeError, ErrorKind, Location, MAX_SNIPPET},
    escape::{UnicodeEscapeBuffer, combine_surrogates, is_high_surrogate, is_low_surrogate},
    options::DecodeOptions,
    stream::{ByteSource, Fetched, Stream, StreamState},
};

#[derive(Debug, PartialEq)]
pub(crate) enum Token {
    Invalid,
    Eof,
    /// One of `{ } [ ] : ,`
    Punctuator(u8),
    String(BString),
    Integer(i64),
    Real(f64),
    BigInteger(BigInteger),
    BigReal(BigReal),
    True,
    False,
    Null,
}

pub(crate) struct Lexer<'a, S> {
    stream: Stream<S>,
    saved: String,
    pub(crate) options: DecodeOptions,
    pub(crate) context: &'a DecodeContext,
    origin: &'a str,
}

impl<'a, S: ByteSource> Lexer<'a, S> {
    pub(crate) fn new(
        source: S,
        options: DecodeOptions,
        context: &'a DecodeContext,
        origin: &'a str,
    ) -> Self {
        Self {
            stream: Stream::new(source),
            saved: String::new(),
            options,
            context,
            origin,
        }
    }

    /// Verbatim text of the current token.
    pub(crate) fn saved_text(&self) -> &str {
        &self.saved
    }

    pub(crate) fn position(&self) -> usize {
        self.stream.position()
    }

    fn location(&self) -> Location {
        Location {
            line: self.stream.line(),
            column: self.stream.column(),
            position: self.stream.position(),
        }
    }

    /// An error at the current position, quoting the current token when it
    /// is short enough.
    pub(crate) fn error(&self, kind: ErrorKind, msg: impl Into<String>) -> DecodeError {
        let msg = msg.into();
        let text = if !self.saved.is_empty() {
            if self.saved.len() <= MAX_SNIPPET {
                format!("{msg} near '{}'", self.saved)
            } else {
                msg
            }
        } else if self.stream.state() == StreamState::Error {
            msg
        } else {
            format!("{msg} near end of file")
        };
        DecodeError::new(kind, text, self.origin, Some(self.location()))
    }

    /// An error at the current position without any context suffix.
    pub(crate) fn bare_error(&self, kind: ErrorKind, msg: impl Into<String>) -> DecodeError {
        DecodeError::new(kind, msg, self.origin, Some(self.location()))
    }

    pub(crate) fn get(&mut self) -> Result<Option<char>, DecodeError> {
        match self.stream.get() {
            Fetched::Char(c) => Ok(Some(c)),
            Fetched::Eof => Ok(None),
            // the partial sequence is not valid text, so no snippet
            Fetched::Error(byte) => Err(self.bare_error(
                ErrorKind::Decoding,
                format!("unable to decode byte 0x{byte:x}"),
            )),
        }
    }

    pub(crate) fn get_save(&mut self) -> Result<Option<char>, DecodeError> {
        let c = self.get()?;
        if let Some(c) = c {
            self.saved.push(c);
        }
        Ok(c)
    }

    pub(crate) fn save(&mut self, c: char) {
        self.saved.push(c);
    }

    pub(crate) fn unget(&mut self, c: Option<char>) {
        if let Some(c) = c {
            self.stream.unget(c);
        }
    }

    pub(crate) fn unget_unsave(&mut self, c: Option<char>) {
        if let Some(c) = c {
            self.stream.unget(c);
            let popped = self.saved.pop();
            debug_assert_eq!(popped, Some(c));
        }
    }

    /// Scan the next token.
    pub(crate) fn scan(&mut self) -> Result<Token, DecodeError> {
        self.saved.clear();

        let mut c = self.get()?;
        while let Some(' ' | '\t' | '\n' | '\r') = c {
            c = self.get()?;
        }
        let Some(c) = c else {
            return Ok(Token::Eof);
        };
        self.save(c);

        match c {
            '{' | '}' | '[' | ']' | ':' | ',' => Ok(Token::Punctuator(c as u8)),
            '"' => self.scan_string(),
            '0'..='9' | '-' => self.scan_number(c),
            c if c.is_ascii_alphabetic() => self.scan_identifier(),
            _ => Ok(Token::Invalid),
        }
    }

    /// Take the whole run of letters so the message quotes the complete
    /// identifier.
    fn scan_identifier(&mut self) -> Result<Token, DecodeError> {
        let mut c = self.get_save()?;
        while c.is_some_and(|c| c.is_ascii_alphabetic()) {
            c = self.get_save()?;
        }
        self.unget_unsave(c);

        Ok(match self.saved.as_str() {
            "true" => Token::True,
            "false" => Token::False,
            "null" => Token::Null,
            _ => Token::Invalid,
        })
    }

    /// First pass: validate the raw token up to the closing quote. The
    /// decoding pass then only has to deal with surrogates.
    fn scan_string(&mut self) -> Result<Token, DecodeError> {
        let mut c = self.get_save()?;
        loop {
            match c {
                None => return Err(self.error(ErrorKind::Lexical, "premature end of input")),
                Some('"') => break,
                Some(ch @ '\0'..='\u{1f}') => {
                    // leave the position on the offending character
                    self.unget_unsave(c);
                    let msg = if ch == '\n' {
                        "unexpected newline".to_string()
                    } else {
                        format!("control character 0x{:x}", ch as u32)
                    };
                    return Err(self.error(ErrorKind::Lexical, msg));
                }
                Some('\\') => {
                    c = self.get_save()?;
                    match c {
                        Some('u') => {
                            for _ in 0..4 {
                                c = self.get_save()?;
                                if !c.is_some_and(|c| c.is_ascii_hexdigit()) {
                                    return Err(self.error(ErrorKind::Lexical, "invalid escape"));
                                }
                            }
                            c = self.get_save()?;
                        }
                        Some('"' | '\\' | '/' | 'b' | 'f' | 'n' | 'r' | 't') => {
                            c = self.get_save()?;
                        }
                        _ => return Err(self.error(ErrorKind::Lexical, "invalid escape")),
                    }
                }
                Some(_) => c = self.get_save()?,
            }
        }

        self.decode_string().map(Token::String)
    }

    /// Second pass over the saved token, quotes included.
    fn decode_string(&self) -> Result<BString, DecodeError> {
        let raw = self.saved.as_bytes();
        // Every escape decodes to at most as many bytes as it spans.
        let mut out = Vec::with_capacity(raw.len() + 1);
        let mut i = 1;

        loop {
            match raw.get(i) {
                None | Some(b'"') => break,
                Some(b'\\') => {
                    i += 1;
                    match raw.get(i) {
                        Some(b'u') => {
                            let (ch, len) = self.decode_unicode_escape(&raw[i..])?;
                            let mut utf8 = [0; 4];
                            out.extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
                            i += len;
                        }
                        Some(&b) => {
                            out.push(match b {
                                b'b' => 0x08,
                                b'f' => 0x0C,
                                b'n' => b'\n',
                                b'r' => b'\r',
                                b't' => b'\t',
                                other => other,
                            });
                            i += 1;
                        }
                        None => break,
                    }
                }
                Some(&b) => {
                    out.push(b);
                    i += 1;
                }
            }
        }

        Ok(BString::from(out))
    }

    /// Decode `u` plus four digits, and a trailing low surrogate escape when
    /// the first unit is a high surrogate. Returns the scalar and the number
    /// of bytes consumed from `raw`.
    fn decode_unicode_escape(&self, raw: &[u8]) -> Result<(char, usize), DecodeError> {
        let unit = self.escape_unit(raw)?;
        let lone = || {
            self.error(
                ErrorKind::Lexical,
                format!("invalid Unicode '\\u{unit:04X}'"),
            )
        };

        if is_low_surrogate(unit) {
            return Err(lone());
        }
        if !is_high_surrogate(unit) {
            return char::from_u32(u32::from(unit))
                .map(|ch| (ch, 5))
                .ok_or_else(lone);
        }

        let follow = raw.get(5..).unwrap_or_default();
        if follow.first() != Some(&b'\\') || follow.get(1) != Some(&b'u') {
            return Err(lone());
        }
        let low = self.escape_unit(&follow[1..])?;
        if !is_low_surrogate(low) {
            return Err(self.error(
                ErrorKind::Lexical,
                format!("invalid Unicode '\\u{unit:04X}\\u{low:04X}'"),
            ));
        }
        char::from_u32(combine_surrogates(unit, low))
            .map(|ch| (ch, 11))
            .ok_or_else(lone)
    }

    /// The code unit of `u` plus four hex digits at the start of `raw`.
    fn escape_unit(&self, raw: &[u8]) -> Result<u16, DecodeError> {
        raw.get(1..)
            .and_then(UnicodeEscapeBuffer::decode4)
            .ok_or_else(|| self.error(ErrorKind::Lexical, "invalid escape"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::SliceSource;

    fn tokens(input: &str) -> Result<Vec<Token>, DecodeError> {
        let ctx = DecodeContext::new();
        let mut lexer = Lexer::new(
            SliceSource::new(input.as_bytes()),
            DecodeOptions::default(),
            &ctx,
            "<test>",
        );
        let mut out = Vec::new();
        loop {
            match lexer.scan()? {
                Token::Eof => return Ok(out),
                t => out.push(t),
            }
        }
    }

    fn string(s: &str) -> Token {
        Token::String(BString::from(s))
    }

    #[test]
    fn punctuation_literals_and_whitespace() {
        assert_eq!(
            tokens(" {\t\"a\" :[true,false ,\r\nnull]} ").unwrap(),
            vec![
                Token::Punctuator(b'{'),
                string("a"),
                Token::Punctuator(b':'),
                Token::Punctuator(b'['),
                Token::True,
                Token::Punctuator(b','),
                Token::False,
                Token::Punctuator(b','),
                Token::Null,
                Token::Punctuator(b']'),
                Token::Punctuator(b'}'),
            ]
        );
    }

    #[test]
    fn identifiers_are_taken_whole() {
        let ctx = DecodeContext::new();
        let mut lexer = Lexer::new(
            SliceSource::new(b"truex]"),
            DecodeOptions::default(),
            &ctx,
            "<test>",
        );
        assert_eq!(lexer.scan().unwrap(), Token::Invalid);
        assert_eq!(lexer.saved_text(), "truex");
        assert_eq!(lexer.scan().unwrap(), Token::Punctuator(b']'));
    }

    #[test]
    fn escapes() {
        assert_eq!(
            tokens(r#""\"\\\/\b\f\n\r\t""#).unwrap(),
            vec![string("\"\\/\u{8}\u{c}\n\r\t")]
        );
        assert_eq!(tokens(r#""é€""#).unwrap(), vec![string("é€")]);
        assert_eq!(tokens(r#""😀""#).unwrap(), vec![string("😀")]);
        assert_eq!(
            tokens(r#""a\u0000b""#).unwrap(),
            vec![Token::String(BString::from(&b"a\0b"[..]))]
        );
    }

    #[test]
    fn surrogate_errors_name_the_units() {
        let err = tokens(r#""\ud800""#).unwrap_err();
        assert_eq!(err.text(), r#"invalid Unicode '\uD800' near '"\ud800"'"#);

        let err = tokens(r#""\udc00""#).unwrap_err();
        assert_eq!(err.text(), r#"invalid Unicode '\uDC00' near '"\udc00"'"#);

        let err = tokens(r#""\ud800A""#).unwrap_err();
        assert_eq!(err.text(), r#"invalid Unicode '\uD800' near '"\ud800A"'"#);

        let err = tokens(r#""\ud800\u0041""#).unwrap_err();
        assert_eq!(
            err.text(),
            r#"invalid Unicode '\uD800\u0041' near '"\ud800\u0041"'"#
        );

        assert_eq!(tokens(r#""\ud800\udc00""#).unwrap(), vec![string("\u{10000}")]);
    }

    #[test]
    fn control_characters_point_at_themselves() {
        let err = tokens("\"ab\ncd\"").unwrap_err();
        assert_eq!(err.text(), "unexpected newline near '\"ab'");
        assert_eq!((err.line(), err.column(), err.position()), (1, 3, 3));

        let err = tokens("\"\u{1}\"").unwrap_err();
        assert_eq!(err.text(), "control character 0x1 near '\"'");
        assert_eq!(err.column(), 1);
    }

    #[test]
    fn bad_escapes() {
        assert_eq!(
            tokens(r#""\x""#).unwrap_err().text(),
            r#"invalid escape near '"\x'"#
        );
        assert_eq!(
            tokens(r#""\u12G4""#).unwrap_err().text(),
            r#"invalid escape near '"\u12G'"#
        );
        assert_eq!(
            tokens("\"abc").unwrap_err().text(),
            "premature end of input near '\"abc'"
        );
    }

    #[test]
    fn decoding_errors_have_no_snippet() {
        let ctx = DecodeContext::new();
        let mut lexer = Lexer::new(
            SliceSource::new(b"[\"ab\xff\"]"),
            DecodeOptions::default(),
            &ctx,
            "<test>",
        );
        assert_eq!(lexer.scan().unwrap(), Token::Punctuator(b'['));
        let err = lexer.scan().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decoding);
        assert_eq!(err.text(), "unable to decode byte 0xff");
        assert_eq!(err.position(), 4);
    }

    #[test]
    fn non_ascii_start_is_invalid() {
        assert_eq!(tokens("é").unwrap(), vec![Token::Invalid]);
        assert_eq!(tokens("'x'").unwrap()[0], Token::Invalid);
    }
}
