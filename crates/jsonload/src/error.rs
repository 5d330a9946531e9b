use thiserror::Error;

/// Longest saved token text that is still quoted back in a message.
pub(crate) const MAX_SNIPPET: usize = 20;

/// Broad class of a decode failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The input could not be opened or read.
    Io,
    /// The byte stream is not well-formed UTF-8.
    Decoding,
    /// A token is malformed: bad escape, bad number, unknown identifier.
    Lexical,
    /// A well-formed token showed up where the grammar does not allow it.
    Grammar,
    /// The input is valid JSON but violates a decoding policy.
    Policy,
    /// The decoder was configured inconsistently by the caller.
    Programming,
}

/// Where in the input a failure was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    /// 1-based line.
    pub line: usize,
    /// Code point column within the line; 0 before the first character.
    pub column: usize,
    /// Absolute byte offset.
    pub position: usize,
}

/// A failed decode, with enough context to point at the offending input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}{text}", prefix(.origin, .location))]
pub struct DecodeError {
    pub(crate) kind: ErrorKind,
    pub(crate) text: String,
    pub(crate) origin: String,
    /// Position of the failure. `None` when no stream was ever opened.
    pub location: Option<Location>,
}

fn prefix(origin: &str, location: &Option<Location>) -> String {
    match location {
        Some(at) => format!("{origin}:{}:{}: ", at.line, at.column),
        None => format!("{origin}: "),
    }
}

impl DecodeError {
    pub(crate) fn new(
        kind: ErrorKind,
        text: impl Into<String>,
        origin: &str,
        location: Option<Location>,
    ) -> Self {
        Self {
            kind,
            text: text.into(),
            origin: origin.to_string(),
            location,
        }
    }

    pub(crate) fn io(text: impl Into<String>, origin: &str) -> Self {
        Self::new(ErrorKind::Io, text, origin, None)
    }

    /// The class of failure.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The message, including any `near '...'` context.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Label of the input: `<string>`, `<buffer>`, `<stream>`, `<callback>`
    /// or a file path.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// 1-based line, or 0 when unknown.
    #[must_use]
    pub fn line(&self) -> usize {
        self.location.map_or(0, |at| at.line)
    }

    /// Code point column, or 0 when unknown.
    #[must_use]
    pub fn column(&self) -> usize {
        self.location.map_or(0, |at| at.column)
    }

    /// Byte offset, or 0 when unknown.
    #[must_use]
    pub fn position(&self) -> usize {
        self.location.map_or(0, |at| at.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_with_location() {
        let err = DecodeError::new(
            ErrorKind::Grammar,
            "']' expected near ','",
            "<string>",
            Some(Location {
                line: 2,
                column: 7,
                position: 12,
            }),
        );
        assert_eq!(err.to_string(), "<string>:2:7: ']' expected near ','");
        assert_eq!((err.line(), err.column(), err.position()), (2, 7, 12));
    }

    #[test]
    fn display_without_location() {
        let err = DecodeError::io("unable to open x.json: not found", "x.json");
        assert_eq!(err.to_string(), "x.json: unable to open x.json: not found");
        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(err.line(), 0);
    }
}
