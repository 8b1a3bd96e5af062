use std::fmt;

use thiserror::Error;

/// The kind of problem a [`Parser`](crate::Parser) ran into.
///
/// `Io` and the grammar-level kinds are distinguished from `UnexpectedError`
/// on purpose: the former can always be triggered by untrusted input, the
/// latter must never be reachable by malformed input alone and signals a
/// bug in the parser itself.
#[derive(Error, Clone, Debug, PartialEq)]
pub enum ErrorKind {
    /// The byte source returned an I/O failure.
    #[error("I/O error: {0}")]
    Io(String),

    /// A structural or lexical byte was not where the grammar allows it.
    #[error("unexpected input")]
    UnexpectedInput,

    /// The byte source ran out of data in the middle of a value or
    /// container.
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// A string or number lexeme grew past `max_value_length`.
    #[error("value exceeds the configured maximum length")]
    ValueTooLong,

    /// A completed string's bytes were not valid UTF-8.
    #[error("invalid UTF-8 in string value")]
    InvalidUtf8,

    /// A control character (`0x00..=0x1F`) appeared unescaped in a string.
    #[error("unescaped control character in string")]
    UnescapedControlCharacter,

    /// A `\` escape was followed by something other than a recognized
    /// escape or a valid `\uXXXX` (surrogate pair) sequence.
    #[error("invalid escape sequence")]
    InvalidEscapeSequence,

    /// An internal invariant was violated. This must never be reachable by
    /// malformed input alone; seeing it is a bug.
    #[error("internal parser invariant violated")]
    UnexpectedError,
}

/// A structured error produced by [`Parser::read`](crate::Parser::read).
///
/// Carries the kind of failure, the 1-based line on which it occurred, and
/// an optional snippet of up to 20 bytes of the input following the error,
/// for diagnostics.
#[derive(Clone, Debug, PartialEq)]
pub struct ParserError {
    pub kind: ErrorKind,
    pub line: u64,
    pub message: Option<String>,
}

impl ParserError {
    pub(crate) fn new(kind: ErrorKind, line: u64, message: Option<String>) -> Self {
        ParserError {
            kind,
            line,
            message,
        }
    }
}

impl fmt::Display for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (line {})", self.kind, self.line)?;
        if let Some(snippet) = &self.message {
            write!(f, ": {snippet:?}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParserError {}

/// An error produced by [`Writer`](crate::Writer) operations.
#[derive(Error, Debug)]
pub enum WriterError {
    /// The underlying sink failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A `write_*` call was made in a context the writer's grammar
    /// forbids (e.g. a named write outside an object, or a non-finite
    /// float, which has no JSON representation).
    #[error("invalid writer context: {0}")]
    InvalidContext(&'static str),
}
