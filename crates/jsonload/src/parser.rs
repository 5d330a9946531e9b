//! Recursive-descent parser.
//!
//! Tokens are pulled from the [`Lexer`] one at a time. Every container is
//! built bottom-up from complete children, so when an error unwinds the
//! partial tree is simply dropped.

use bstr::ByteSlice;

use crate::{
    Decoded,
    error::{DecodeError, ErrorKind},
    lexer::{Lexer, Token},
    stream::ByteSource,
    value::{Array, Map, Value},
};

pub(crate) struct Parser<'a, S> {
    lexer: Lexer<'a, S>,
    depth: usize,
}

impl<'a, S: ByteSource> Parser<'a, S> {
    pub(crate) fn new(lexer: Lexer<'a, S>) -> Self {
        Self { lexer, depth: 0 }
    }

    /// Decode one document.
    pub(crate) fn parse(mut self) -> Result<Decoded, DecodeError> {
        let options = self.lexer.options;
        let context = self.lexer.context;

        // Checked before the first byte is read.
        if options.big_integers.enabled() && !context.has_big_integers() {
            return Err(self.lexer.bare_error(
                ErrorKind::Programming,
                "Programming error: Not prepared to decode big integers",
            ));
        }
        if options.big_reals.enabled() && !context.has_big_reals() {
            return Err(self.lexer.bare_error(
                ErrorKind::Programming,
                "Programming error: Not prepared to decode big reals",
            ));
        }

        let token = self.lexer.scan()?;
        if !options.decode_any && !matches!(token, Token::Punctuator(b'[' | b'{')) {
            return Err(self.lexer.error(ErrorKind::Grammar, "'[' or '{' expected"));
        }

        let value = self.parse_value(token)?;

        if !options.disable_eof_check && !matches!(self.lexer.scan()?, Token::Eof) {
            return Err(self.lexer.error(ErrorKind::Grammar, "end of file expected"));
        }

        Ok(Decoded {
            value,
            position: self.lexer.position(),
        })
    }

    fn parse_value(&mut self, token: Token) -> Result<Value, DecodeError> {
        match token {
            Token::String(s) => {
                if !self.lexer.options.allow_nul && s.find_byte(0).is_some() {
                    return Err(self.lexer.error(
                        ErrorKind::Policy,
                        "\\u0000 is not allowed without allow_nul",
                    ));
                }
                Ok(Value::String(s))
            }
            Token::Integer(n) => Ok(Value::Integer(n)),
            Token::Real(n) => Ok(Value::Real(n)),
            Token::BigInteger(n) => Ok(Value::BigInteger(n)),
            Token::BigReal(n) => Ok(Value::BigReal(n)),
            Token::True => Ok(Value::Boolean(true)),
            Token::False => Ok(Value::Boolean(false)),
            Token::Null => Ok(Value::Null),
            Token::Punctuator(b'{') => self.nested(Self::parse_object),
            Token::Punctuator(b'[') => self.nested(Self::parse_array),
            Token::Invalid => Err(self.lexer.error(ErrorKind::Lexical, "invalid token")),
            Token::Punctuator(_) | Token::Eof => {
                Err(self.lexer.error(ErrorKind::Grammar, "unexpected token"))
            }
        }
    }

    fn nested(
        &mut self,
        parse: fn(&mut Self) -> Result<Value, DecodeError>,
    ) -> Result<Value, DecodeError> {
        let max = self.lexer.options.max_depth;
        if max != 0 && self.depth >= max {
            return Err(self.lexer.error(ErrorKind::Policy, "maximum parsing depth reached"));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn parse_object(&mut self) -> Result<Value, DecodeError> {
        let mut map = Map::new();

        let mut token = self.lexer.scan()?;
        if matches!(token, Token::Punctuator(b'}')) {
            return Ok(Value::Object(map));
        }

        loop {
            let Token::String(raw) = token else {
                return Err(self.lexer.error(ErrorKind::Grammar, "string or '}' expected"));
            };
            if raw.find_byte(0).is_some() {
                return Err(self.lexer.error(
                    ErrorKind::Policy,
                    "NUL byte in object key not supported",
                ));
            }
            let key = String::from_utf8(raw.into())
                .map_err(|_| self.lexer.error(ErrorKind::Lexical, "invalid UTF-8 in object key"))?;
            if self.lexer.options.reject_duplicates && map.contains_key(&key) {
                return Err(self.lexer.error(ErrorKind::Policy, "duplicate object key"));
            }

            if !matches!(self.lexer.scan()?, Token::Punctuator(b':')) {
                return Err(self.lexer.error(ErrorKind::Grammar, "':' expected"));
            }

            let token_value = self.lexer.scan()?;
            let value = self.parse_value(token_value)?;
            // Replacing keeps the key's first position.
            map.insert(key, value);

            match self.lexer.scan()? {
                Token::Punctuator(b',') => token = self.lexer.scan()?,
                Token::Punctuator(b'}') => return Ok(Value::Object(map)),
                _ => return Err(self.lexer.error(ErrorKind::Grammar, "'}' expected")),
            }
        }
    }

    fn parse_array(&mut self) -> Result<Value, DecodeError> {
        let mut array = Array::new();

        let mut token = self.lexer.scan()?;
        match token {
            Token::Punctuator(b']') => return Ok(Value::Array(array)),
            Token::Eof => return Err(self.lexer.error(ErrorKind::Grammar, "']' expected")),
            _ => {}
        }

        loop {
            array.push(self.parse_value(token)?);

            match self.lexer.scan()? {
                Token::Punctuator(b',') => {
                    token = self.lexer.scan()?;
                    // trailing comma or truncated input
                    if matches!(token, Token::Punctuator(b']') | Token::Eof) {
                        return Err(self.lexer.error(ErrorKind::Grammar, "']' expected"));
                    }
                }
                Token::Punctuator(b']') => return Ok(Value::Array(array)),
                _ => return Err(self.lexer.error(ErrorKind::Grammar, "']' expected")),
            }
        }
    }
}
