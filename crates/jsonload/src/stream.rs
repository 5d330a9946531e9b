//! Byte sources and the code point stream the lexer reads from.
//!
//! A [`ByteSource`] is a dumb pull interface: one byte at a time, `None` at
//! the end. [`Stream`] sits on top of it and hands out whole code points,
//! validating multi-byte UTF-8 sequences as they are pulled and keeping
//! line, column and byte-offset bookkeeping.
//!
//! Invariants
//! - Once the stream reports end of input or a decoding failure it keeps
//!   reporting the same thing and never touches the source again.
//! - At most one code point can be pushed back. The pending slot is an
//!   `Option`, so a second `unget` before the next `get` trips a debug
//!   assertion instead of silently losing input.
//! - Columns count code points, not bytes. Positions count bytes.

use std::io::{self, BufReader, Bytes, Read};

/// Size of the chunk buffer handed to load callbacks.
pub const CALLBACK_CHUNK: usize = 1024;

/// A blocking pull source of raw bytes.
pub trait ByteSource {
    /// Next byte, or `None` once the input is exhausted.
    fn next_byte(&mut self) -> Option<u8>;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    #[inline]
    fn next_byte(&mut self) -> Option<u8> {
        (**self).next_byte()
    }
}

/// Reads a string up to its end or its first NUL byte, whichever comes
/// first.
#[derive(Debug, Clone)]
pub struct StrSource<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> StrSource<'a> {
    /// Wrap a string.
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
            pos: 0,
        }
    }
}

impl ByteSource for StrSource<'_> {
    fn next_byte(&mut self) -> Option<u8> {
        match self.bytes.get(self.pos) {
            Some(0) | None => None,
            Some(&b) => {
                self.pos += 1;
                Some(b)
            }
        }
    }
}

/// Reads a length-bounded buffer; NUL bytes are ordinary data.
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    /// Wrap a buffer.
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }
}

impl ByteSource for SliceSource<'_> {
    fn next_byte(&mut self) -> Option<u8> {
        let b = *self.bytes.get(self.pos)?;
        self.pos += 1;
        Some(b)
    }
}

/// Reads from any [`Read`] implementation through a buffer.
///
/// The first I/O error ends the input; it is kept so the caller can report
/// it instead of whatever syntax error the truncated input produced.
pub struct ReaderSource<R> {
    bytes: Bytes<BufReader<R>>,
    error: Option<io::Error>,
}

impl<R: Read> ReaderSource<R> {
    /// Wrap a reader.
    pub fn new(reader: R) -> Self {
        Self {
            bytes: BufReader::new(reader).bytes(),
            error: None,
        }
    }

    /// The I/O error that ended the input, if any.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }
}

impl<R: Read> ByteSource for ReaderSource<R> {
    fn next_byte(&mut self) -> Option<u8> {
        if self.error.is_some() {
            return None;
        }
        match self.bytes.next()? {
            Ok(b) => Some(b),
            Err(err) => {
                self.error = Some(err);
                None
            }
        }
    }
}

/// Reads chunks produced by a callback.
///
/// The callback fills the buffer it is given and returns how many bytes it
/// wrote. `Some(0)` and `None` both end the input; `None` is the error
/// sentinel.
pub struct CallbackSource<F> {
    callback: F,
    chunk: [u8; CALLBACK_CHUNK],
    len: usize,
    pos: usize,
    done: bool,
}

impl<F: FnMut(&mut [u8]) -> Option<usize>> CallbackSource<F> {
    /// Wrap a chunk callback.
    pub fn new(callback: F) -> Self {
        Self {
            callback,
            chunk: [0; CALLBACK_CHUNK],
            len: 0,
            pos: 0,
            done: false,
        }
    }
}

impl<F: FnMut(&mut [u8]) -> Option<usize>> ByteSource for CallbackSource<F> {
    fn next_byte(&mut self) -> Option<u8> {
        if self.done {
            return None;
        }
        if self.pos >= self.len {
            self.pos = 0;
            match (self.callback)(&mut self.chunk) {
                Some(n) if n > 0 => self.len = n.min(CALLBACK_CHUNK),
                _ => {
                    self.len = 0;
                    self.done = true;
                    return None;
                }
            }
        }
        let b = self.chunk[self.pos];
        self.pos += 1;
        Some(b)
    }
}

/// Terminal and non-terminal states of a [`Stream`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StreamState {
    Ok,
    Eof,
    Error,
}

/// One read from the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Fetched {
    Char(char),
    Eof,
    /// The stream could not decode a UTF-8 sequence starting with this byte.
    Error(u8),
}

/// Code point reader with single-slot pushback and position tracking.
pub(crate) struct Stream<S> {
    source: S,
    pending: Option<char>,
    state: StreamState,
    bad_byte: u8,
    line: usize,
    column: usize,
    last_column: usize,
    position: usize,
}

impl<S: ByteSource> Stream<S> {
    pub(crate) fn new(source: S) -> Self {
        Self {
            source,
            pending: None,
            state: StreamState::Ok,
            bad_byte: 0,
            line: 1,
            column: 0,
            last_column: 0,
            position: 0,
        }
    }

    pub(crate) fn state(&self) -> StreamState {
        self.state
    }

    pub(crate) fn line(&self) -> usize {
        self.line
    }

    pub(crate) fn column(&self) -> usize {
        self.column
    }

    pub(crate) fn position(&self) -> usize {
        self.position
    }

    /// Read the next code point.
    pub(crate) fn get(&mut self) -> Fetched {
        match self.state {
            StreamState::Ok => {}
            StreamState::Eof => return Fetched::Eof,
            StreamState::Error => return Fetched::Error(self.bad_byte),
        }

        let ch = match self.pending.take() {
            Some(ch) => ch,
            None => match self.decode() {
                Ok(Some(ch)) => ch,
                Ok(None) => {
                    self.state = StreamState::Eof;
                    return Fetched::Eof;
                }
                Err(lead) => {
                    self.state = StreamState::Error;
                    self.bad_byte = lead;
                    return Fetched::Error(lead);
                }
            },
        };

        self.position += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.last_column = self.column;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Fetched::Char(ch)
    }

    /// Push back the code point returned by the latest [`Stream::get`].
    pub(crate) fn unget(&mut self, ch: char) {
        debug_assert!(self.pending.is_none(), "only one code point may be pushed back");
        self.position -= ch.len_utf8();
        if ch == '\n' {
            self.line -= 1;
            self.column = self.last_column;
        } else {
            self.column -= 1;
        }
        self.pending = Some(ch);
    }

    /// Pull one code point off the source. `Err` carries the lead byte of a
    /// sequence that failed validation.
    fn decode(&mut self) -> Result<Option<char>, u8> {
        let Some(lead) = self.source.next_byte() else {
            return Ok(None);
        };
        if lead < 0x80 {
            return Ok(Some(char::from(lead)));
        }

        let width = utf8_width(lead);
        if width == 0 {
            return Err(lead);
        }
        let mut seq = [lead, 0, 0, 0];
        for slot in &mut seq[1..width] {
            *slot = self.source.next_byte().ok_or(lead)?;
        }
        match bstr::decode_utf8(&seq[..width]) {
            (Some(ch), n) if n == width => Ok(Some(ch)),
            _ => Err(lead),
        }
    }
}

/// Length of the UTF-8 sequence announced by `lead`, or 0 if `lead` can
/// never start a well-formed sequence.
fn utf8_width(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 0,
    }
}
