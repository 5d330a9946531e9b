//! A strict JSON decoder with pluggable arbitrary-precision numbers.
//!
//! `jsonload` reads a complete JSON document from a string, a byte buffer,
//! a reader, a file or a chunk callback and builds an owned [`Value`] tree.
//! Input is validated as UTF-8 while it is read, and every failure carries
//! the line, column and byte offset where it was detected.
//!
//! Numbers decode to `i64` or `f64` by default. With [`BigIntegerMode`] and
//! [`BigRealMode`] they can instead be handed to a big-number backend, either
//! always or only when the native type would lose the value. Backends are
//! plain trait implementations ([`BigIntegerBackend`], [`BigRealBackend`])
//! registered on a [`DecodeContext`] or installed process-wide.
//!
//! # Examples
//!
//! ```
//! use jsonload::{BigIntegerMode, DecodeContext, DecodeOptions, Decoder, Value};
//! use jsonload::backends::decimal::DecimalInteger;
//!
//! let decoder = Decoder::with_context(
//!     DecodeOptions {
//!         big_integers: BigIntegerMode::OnOverflow,
//!         ..Default::default()
//!     },
//!     DecodeContext::new().with_big_integers(DecimalInteger),
//! );
//! let doc = decoder.decode_str("[1, 123456789012345678901234567890]").unwrap();
//! let items = doc.value.as_array().unwrap();
//! assert_eq!(items[0], Value::Integer(1));
//! assert_eq!(items[1].to_string(), "123456789012345678901234567890");
//! ```

use std::{fs::File, io::Read, path::Path};

mod backend;
pub mod backends;
mod context;
mod error;
mod escape;
mod lexer;
mod number;
mod options;
mod parser;
mod stream;
mod value;

#[cfg(test)]
mod tests;

pub use backend::{
    BigInteger, BigIntegerBackend, BigNumberBackend, BigReal, BigRealBackend, Memory,
    OverwriteFn, Scrubbed, write_truncated,
};
pub use context::{
    DecodeContext, install_biginteger_backend, install_bigreal_backend, install_overwrite_fn,
};
pub use error::{DecodeError, ErrorKind, Location};
pub use options::{BigIntegerMode, BigRealMode, DEFAULT_MAX_DEPTH, DecodeOptions};
pub use stream::{ByteSource, CALLBACK_CHUNK, CallbackSource, ReaderSource, SliceSource, StrSource};
pub use value::{Array, Map, Value};

use crate::{lexer::Lexer, parser::Parser};

/// A successfully decoded document.
#[derive(Debug, PartialEq)]
pub struct Decoded {
    /// The top-level value.
    pub value: Value,
    /// Byte offset just past the last token read. With the end-of-file check
    /// on this is the input length; without it, the end of the value.
    pub position: usize,
}

/// Decodes documents with fixed options and backends.
#[derive(Debug, Clone)]
pub struct Decoder {
    options: DecodeOptions,
    context: DecodeContext,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new(DecodeOptions::default())
    }
}

impl Decoder {
    /// A decoder using the process-wide backends as installed right now.
    #[must_use]
    pub fn new(options: DecodeOptions) -> Self {
        Self::with_context(options, DecodeContext::global())
    }

    /// A decoder using an explicit context.
    #[must_use]
    pub fn with_context(options: DecodeOptions, context: DecodeContext) -> Self {
        Self { options, context }
    }

    /// The options every decode uses.
    #[must_use]
    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// The backends and memory functions every decode uses.
    #[must_use]
    pub fn context(&self) -> &DecodeContext {
        &self.context
    }

    /// Decode a string. A NUL character ends the input.
    ///
    /// # Errors
    ///
    /// Any decode failure; see [`DecodeError`].
    pub fn decode_str(&self, text: &str) -> Result<Decoded, DecodeError> {
        self.decode_source(StrSource::new(text), "<string>")
    }

    /// Decode a byte buffer. NUL bytes are ordinary input.
    ///
    /// # Errors
    ///
    /// Any decode failure; see [`DecodeError`].
    pub fn decode_bytes(&self, bytes: &[u8]) -> Result<Decoded, DecodeError> {
        self.decode_source(SliceSource::new(bytes), "<buffer>")
    }

    /// Decode from a reader.
    ///
    /// # Errors
    ///
    /// A read error is reported as [`ErrorKind::Io`] in place of whatever the
    /// truncated input would have produced.
    pub fn decode_reader<R: Read>(&self, reader: R) -> Result<Decoded, DecodeError> {
        self.decode_read(reader, "<stream>")
    }

    /// Decode the file at `path`.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::Io`] if the file cannot be opened or read, otherwise any
    /// decode failure.
    pub fn decode_file<P: AsRef<Path>>(&self, path: P) -> Result<Decoded, DecodeError> {
        let path = path.as_ref();
        let origin = path.display().to_string();
        let file = File::open(path).map_err(|err| {
            DecodeError::io(format!("unable to open {origin}: {err}"), &origin)
        })?;
        self.decode_read(file, &origin)
    }

    /// Decode chunks produced by `callback`; see [`CallbackSource`].
    ///
    /// # Errors
    ///
    /// Any decode failure; see [`DecodeError`].
    pub fn decode_callback<F>(&self, callback: F) -> Result<Decoded, DecodeError>
    where
        F: FnMut(&mut [u8]) -> Option<usize>,
    {
        self.decode_source(CallbackSource::new(callback), "<callback>")
    }

    /// Decode from any byte source. `origin` labels errors.
    ///
    /// # Errors
    ///
    /// Any decode failure; see [`DecodeError`].
    pub fn decode_source<S: ByteSource>(
        &self,
        source: S,
        origin: &str,
    ) -> Result<Decoded, DecodeError> {
        let lexer = Lexer::new(source, self.options, &self.context, origin);
        Parser::new(lexer).parse()
    }

    fn decode_read<R: Read>(&self, reader: R, origin: &str) -> Result<Decoded, DecodeError> {
        let mut source = ReaderSource::new(reader);
        let result = self.decode_source(&mut source, origin);
        match source.take_error() {
            Some(err) => Err(DecodeError::io(format!("read error: {err}"), origin)),
            None => result,
        }
    }
}

/// Decode a string with the process-wide backends.
///
/// # Errors
///
/// Any decode failure; see [`DecodeError`].
pub fn loads(text: &str, options: DecodeOptions) -> Result<Value, DecodeError> {
    Decoder::new(options).decode_str(text).map(|doc| doc.value)
}

/// Decode a byte buffer with the process-wide backends.
///
/// # Errors
///
/// Any decode failure; see [`DecodeError`].
pub fn loadb(bytes: &[u8], options: DecodeOptions) -> Result<Value, DecodeError> {
    Decoder::new(options).decode_bytes(bytes).map(|doc| doc.value)
}

/// Decode from a reader with the process-wide backends.
///
/// # Errors
///
/// Any decode failure; see [`Decoder::decode_reader`].
pub fn load_reader<R: Read>(reader: R, options: DecodeOptions) -> Result<Value, DecodeError> {
    Decoder::new(options).decode_reader(reader).map(|doc| doc.value)
}

/// Decode a file with the process-wide backends.
///
/// # Errors
///
/// Any decode failure; see [`Decoder::decode_file`].
pub fn load_file<P: AsRef<Path>>(path: P, options: DecodeOptions) -> Result<Value, DecodeError> {
    Decoder::new(options).decode_file(path).map(|doc| doc.value)
}

/// Decode callback chunks with the process-wide backends.
///
/// # Errors
///
/// Any decode failure; see [`DecodeError`].
pub fn load_callback<F>(callback: F, options: DecodeOptions) -> Result<Value, DecodeError>
where
    F: FnMut(&mut [u8]) -> Option<usize>,
{
    Decoder::new(options).decode_callback(callback).map(|doc| doc.value)
}
