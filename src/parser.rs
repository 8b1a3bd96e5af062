use std::fs::File;
use std::io;
use std::io::Read;
use std::path::Path as FsPath;
use std::str::FromStr;

use bigdecimal::BigDecimal;

use crate::error::{ErrorKind, ParserError};
use crate::iter::Tokens;
use crate::key::Key;
use crate::number::Number;
use crate::options::{NumberParsing, ParserOptions};
use crate::path::Path;
use crate::reader::ByteBufferReader;
use crate::source::{open_file, ByteSource, ReaderSource, SliceSource};
use crate::token::Token;

/// `0x09 | 0x0A | 0x0D | 0x20`, per the input grammar (§6).
fn is_whitespace(b: u8) -> bool {
    matches!(b, 0x09 | 0x0A | 0x0D | 0x20)
}

/// A frame of the parse state stack. The bottom of the logical stack is
/// always `root`; we represent that implicitly as an empty `Vec` rather
/// than pushing an explicit frame for it, since root never needs an index
/// or a key of its own.
#[derive(Clone, Copy, Debug)]
enum Frame {
    Object { next_index: i64 },
    Array { next_index: i64 },
}

/// A streaming pull parser for JSON documents that can be larger than
/// available memory.
///
/// Drive it by calling [`Parser::read`] in a loop, or adapt it into an
/// iterator with [`Parser::tokens`]. Each call to `read` consumes at most
/// one structural byte and at most one value lexeme, and returns exactly
/// one [`Token`] (or `None` at a clean end of input).
///
/// A parser is single-use: once `read` returns `Ok(None)` or an `Err`, every
/// subsequent call returns `Ok(None)` without touching the byte source
/// again.
///
/// ```
/// use jstream::{Parser, Token};
///
/// let mut parser = Parser::from_slice(br#"{"name": "Elvis"}"#);
/// let mut tokens = Vec::new();
/// while let Some(token) = parser.read().unwrap() {
///     tokens.push(token);
/// }
/// assert!(matches!(tokens[0], Token::StartObject(None)));
/// ```
pub struct Parser<S> {
    reader: ByteBufferReader<S>,
    options: ParserOptions,
    stack: Vec<Frame>,
    path: Path,
    scratch: Vec<u8>,
    root_seen: bool,
    done: bool,
}

impl<S: ByteSource> Parser<S> {
    /// Create a parser with default [`ParserOptions`].
    pub fn new(source: S) -> Self {
        Self::with_options(source, ParserOptions::default())
    }

    /// Create a parser bound to `source` with explicit options.
    pub fn with_options(source: S, options: ParserOptions) -> Self {
        Parser {
            reader: ByteBufferReader::new(source, options.buffer_capacity(), options.close_on_drop()),
            options,
            stack: Vec::new(),
            path: Path::new(),
            scratch: Vec::new(),
            root_seen: false,
            done: false,
        }
    }

    /// Release the parser and return the underlying byte source, bypassing
    /// [`close_on_drop`](ParserOptions::close_on_drop) entirely.
    ///
    /// Dropping a parser built with `close_on_drop(false)` deliberately
    /// skips running the source's own `Drop` (so, say, a `File` a caller
    /// still wants open elsewhere stays open) — but without this escape
    /// hatch that also means the source's resources are never released,
    /// which leaks them permanently. Call `into_inner` first to reclaim the
    /// source and decide what to do with it instead.
    pub fn into_inner(self) -> S {
        self.reader.into_source()
    }

    /// The current 1-based line number.
    pub fn line(&self) -> u64 {
        self.reader.line()
    }

    /// A read-only view of the live structural path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The live path rendered as a dotted string, e.g. `a.b[3].c`.
    pub fn path_string(&self) -> String {
        self.path.to_path_string()
    }

    /// Returns `true` iff `keys` appears, in order, as a subsequence of the
    /// live path.
    pub fn path_match(&self, keys: &[Key]) -> bool {
        self.path.matches(keys)
    }

    /// Adapt this parser into a lazy [`Iterator`] of tokens. The sequence
    /// terminates on either end of input or the first error.
    pub fn tokens(&mut self) -> Tokens<'_, S> {
        Tokens::new(self)
    }

    /// Advance the parser by one step and return the next [`Token`], or
    /// `None` at a clean end of input.
    pub fn read(&mut self) -> Result<Option<Token>, ParserError> {
        if self.done {
            return Ok(None);
        }

        match self.peek_non_ws()? {
            None => {
                if self.stack.is_empty() && self.root_seen {
                    self.done = true;
                    Ok(None)
                } else {
                    self.fail(ErrorKind::UnexpectedEof)
                }
            }
            Some(b) => {
                if self.stack.is_empty() {
                    if self.root_seen {
                        return self.fail(ErrorKind::UnexpectedInput);
                    }
                    self.reader.push_back(b);
                    let token = self.read_value(None)?;
                    if self.stack.is_empty() {
                        self.root_seen = true;
                    }
                    Ok(Some(token))
                } else {
                    match self.stack.last().copied() {
                        Some(Frame::Object { .. }) => self.read_object_step(b).map(Some),
                        Some(Frame::Array { .. }) => self.read_array_step(b).map(Some),
                        None => self.fail(ErrorKind::UnexpectedError),
                    }
                }
            }
        }
    }

    fn read_object_step(&mut self, b: u8) -> Result<Token, ParserError> {
        let next_index = match self.stack.last() {
            Some(Frame::Object { next_index }) => *next_index,
            _ => return self.fail(ErrorKind::UnexpectedError),
        };

        if b == b'}' {
            self.stack.pop();
            if next_index >= 0 {
                self.path.pop();
            }
            let key = self.path.last().cloned();
            if self.stack.is_empty() {
                self.root_seen = true;
            }
            return Ok(Token::EndObject(key));
        }

        let new_index = next_index + 1;
        let quote = if b == b',' {
            if new_index <= 0 {
                return self.fail(ErrorKind::UnexpectedInput);
            }
            self.path.pop();
            match self.peek_non_ws()? {
                Some(x) => x,
                None => return self.fail(ErrorKind::UnexpectedEof),
            }
        } else {
            if new_index != 0 {
                return self.fail(ErrorKind::UnexpectedInput);
            }
            b
        };
        if quote != b'"' {
            return self.fail(ErrorKind::UnexpectedInput);
        }

        if let Some(Frame::Object { next_index }) = self.stack.last_mut() {
            *next_index = new_index;
        }

        let name = self.scan_string()?;
        self.skip_ws()?;
        self.expect_byte(b':')?;

        let key = Key::Name(name);
        self.path.push(key.clone());
        self.read_value(Some(key))
    }

    fn read_array_step(&mut self, b: u8) -> Result<Token, ParserError> {
        let next_index = match self.stack.last() {
            Some(Frame::Array { next_index }) => *next_index,
            _ => return self.fail(ErrorKind::UnexpectedError),
        };

        if b == b']' {
            self.stack.pop();
            if next_index >= 0 {
                self.path.pop();
            }
            let key = self.path.last().cloned();
            if self.stack.is_empty() {
                self.root_seen = true;
            }
            return Ok(Token::EndArray(key));
        }

        let new_index = next_index + 1;
        let value_byte = if b == b',' {
            if new_index <= 0 {
                return self.fail(ErrorKind::UnexpectedInput);
            }
            self.path.pop();
            match self.peek_non_ws()? {
                Some(x) => x,
                None => return self.fail(ErrorKind::UnexpectedEof),
            }
        } else {
            if new_index != 0 {
                return self.fail(ErrorKind::UnexpectedInput);
            }
            b
        };

        if let Some(Frame::Array { next_index }) = self.stack.last_mut() {
            *next_index = new_index;
        }

        let key = Key::Index(new_index as usize);
        self.path.push(key.clone());
        self.reader.push_back(value_byte);
        self.read_value(Some(key))
    }

    /// Dispatch on the first non-whitespace byte of a value.
    fn read_value(&mut self, key: Option<Key>) -> Result<Token, ParserError> {
        let b = match self.peek_non_ws()? {
            Some(b) => b,
            None => return self.fail(ErrorKind::UnexpectedEof),
        };
        match b {
            b'"' => {
                let s = self.scan_string()?;
                Ok(Token::String(key, s))
            }
            b'{' => {
                self.stack.push(Frame::Object { next_index: -1 });
                Ok(Token::StartObject(key))
            }
            b'[' => {
                self.stack.push(Frame::Array { next_index: -1 });
                Ok(Token::StartArray(key))
            }
            b't' => {
                self.scan_literal(b"rue")?;
                Ok(Token::Bool(key, true))
            }
            b'f' => {
                self.scan_literal(b"alse")?;
                Ok(Token::Bool(key, false))
            }
            b'n' => {
                self.scan_literal(b"ull")?;
                Ok(Token::Null(key))
            }
            b'-' | b'0'..=b'9' => {
                self.reader.push_back(b);
                let n = self.scan_number()?;
                Ok(Token::Number(key, n))
            }
            _ => self.fail(ErrorKind::UnexpectedInput),
        }
    }

    // -- lexeme scanners (§4.2) -------------------------------------------

    /// Scan a string. Called with the opening quote already consumed.
    fn scan_string(&mut self) -> Result<String, ParserError> {
        self.scratch.clear();
        loop {
            let b = self.next_byte_for_lexeme()?;
            match b {
                b'"' => break,
                0x00..=0x1F => return self.fail(ErrorKind::UnescapedControlCharacter),
                b'\\' => self.scan_escape()?,
                other => self.push_scratch(&[other])?,
            }
        }
        match std::str::from_utf8(&self.scratch) {
            Ok(s) => Ok(s.to_owned()),
            Err(_) => self.fail(ErrorKind::InvalidUtf8),
        }
    }

    fn scan_escape(&mut self) -> Result<(), ParserError> {
        let esc = self.next_byte_for_lexeme()?;
        match esc {
            b'"' => self.push_scratch(&[0x22]),
            b'\\' => self.push_scratch(&[0x5C]),
            b'/' => self.push_scratch(&[0x2F]),
            b'b' => self.push_scratch(&[0x08]),
            b'f' => self.push_scratch(&[0x0C]),
            b'n' => self.push_scratch(&[0x0A]),
            // A `\r` escape contributes nothing to the decoded string; it
            // is dropped rather than appended as 0x0D.
            b'r' => Ok(()),
            b't' => self.push_scratch(&[0x09]),
            b'u' => {
                let high = self.scan_hex4()?;
                let resolved = if (0xD800..=0xDBFF).contains(&high) {
                    self.expect_lexeme_byte(b'\\')?;
                    self.expect_lexeme_byte(b'u')?;
                    let low = self.scan_hex4()?;
                    if !(0xDC00..=0xDFFF).contains(&low) {
                        return self.fail(ErrorKind::InvalidEscapeSequence);
                    }
                    ((high - 0xD800) * 0x400) + (low - 0xDC00) + 0x10000
                } else {
                    high
                };
                let ch = match char::from_u32(resolved) {
                    Some(c) => c,
                    None => return self.fail(ErrorKind::InvalidEscapeSequence),
                };
                let mut buf = [0u8; 4];
                let encoded = ch.encode_utf8(&mut buf);
                self.push_scratch(encoded.as_bytes())
            }
            _ => self.fail(ErrorKind::InvalidEscapeSequence),
        }
    }

    fn scan_hex4(&mut self) -> Result<u32, ParserError> {
        let mut value: u32 = 0;
        for _ in 0..4 {
            let b = self.next_byte_for_lexeme()?;
            let digit = match b {
                b'0'..=b'9' => b - b'0',
                b'a'..=b'f' => b - b'a' + 10,
                b'A'..=b'F' => b - b'A' + 10,
                _ => return self.fail(ErrorKind::InvalidEscapeSequence),
            };
            value = (value << 4) | digit as u32;
        }
        Ok(value)
    }

    fn expect_lexeme_byte(&mut self, expected: u8) -> Result<(), ParserError> {
        let b = self.next_byte_for_lexeme()?;
        if b == expected {
            Ok(())
        } else {
            self.fail(ErrorKind::InvalidEscapeSequence)
        }
    }

    /// Consume exactly `rest` after the already-matched dispatch byte
    /// (`t`/`f`/`n`).
    fn scan_literal(&mut self, rest: &[u8]) -> Result<(), ParserError> {
        for &expected in rest {
            match self.next_byte()? {
                Some(b) if b == expected => {}
                Some(_) => return self.fail(ErrorKind::UnexpectedInput),
                None => return self.fail(ErrorKind::UnexpectedEof),
            }
        }
        Ok(())
    }

    /// `number := '-'? int frac? exp?`, validated and accumulated into
    /// `scratch` in the same pass, then materialized per the configured
    /// [`NumberParsing`] mode.
    fn scan_number(&mut self) -> Result<Number, ParserError> {
        self.scratch.clear();
        let mut int_digits: u32 = 0;
        let mut has_fraction = false;
        let mut has_exponent = false;

        let mut b = self.next_byte_for_lexeme()?;
        if b == b'-' {
            self.push_scratch(&[b])?;
            // A `-` with no following digit (including at EOF) is a
            // malformed lexeme, not a truncated one: §4.2.2 mandates
            // `unexpectedInput` for "a lone `-`".
            b = match self.next_byte()? {
                Some(b) => b,
                None => return self.fail(ErrorKind::UnexpectedInput),
            };
        }

        match b {
            b'0' => {
                self.push_scratch(&[b])?;
                int_digits = 1;
                if let Some(next) = self.next_byte()? {
                    if next.is_ascii_digit() {
                        return self.fail(ErrorKind::UnexpectedInput);
                    }
                    self.reader.push_back(next);
                }
            }
            b'1'..=b'9' => {
                self.push_scratch(&[b])?;
                int_digits = 1;
                loop {
                    match self.next_byte()? {
                        Some(d) if d.is_ascii_digit() => {
                            self.push_scratch(&[d])?;
                            int_digits += 1;
                        }
                        Some(other) => {
                            self.reader.push_back(other);
                            break;
                        }
                        None => break,
                    }
                }
            }
            _ => return self.fail(ErrorKind::UnexpectedInput),
        }

        if let Some(next) = self.next_byte()? {
            if next == b'.' {
                has_fraction = true;
                self.push_scratch(&[next])?;
                let mut frac_digits = 0u32;
                loop {
                    match self.next_byte()? {
                        Some(d) if d.is_ascii_digit() => {
                            self.push_scratch(&[d])?;
                            frac_digits += 1;
                        }
                        Some(other) => {
                            self.reader.push_back(other);
                            break;
                        }
                        None => break,
                    }
                }
                if frac_digits == 0 {
                    return self.fail(ErrorKind::UnexpectedInput);
                }
            } else {
                self.reader.push_back(next);
            }
        }

        if let Some(next) = self.next_byte()? {
            if next == b'e' || next == b'E' {
                has_exponent = true;
                self.push_scratch(&[next])?;
                match self.next_byte()? {
                    Some(s) if s == b'+' || s == b'-' => self.push_scratch(&[s])?,
                    Some(other) => self.reader.push_back(other),
                    None => {}
                }
                let mut exp_digits = 0u32;
                loop {
                    match self.next_byte()? {
                        Some(d) if d.is_ascii_digit() => {
                            self.push_scratch(&[d])?;
                            exp_digits += 1;
                        }
                        Some(other) => {
                            self.reader.push_back(other);
                            break;
                        }
                        None => break,
                    }
                }
                if exp_digits == 0 {
                    return self.fail(ErrorKind::UnexpectedInput);
                }
            } else {
                self.reader.push_back(next);
            }
        }

        self.materialize_number(has_fraction, has_exponent, int_digits)
    }

    fn materialize_number(
        &mut self,
        has_fraction: bool,
        has_exponent: bool,
        int_digits: u32,
    ) -> Result<Number, ParserError> {
        let lexeme =
            std::str::from_utf8(&self.scratch).expect("number lexeme only ever contains ASCII");
        match self.options.number_parsing() {
            NumberParsing::IntDouble => {
                if !has_fraction && !has_exponent && int_digits <= 18 {
                    if let Ok(i) = btoi::btoi::<i64>(self.scratch.as_slice()) {
                        return Ok(Number::Int(i));
                    }
                }
                match lexeme.parse::<f64>() {
                    Ok(d) => Ok(Number::Double(d)),
                    Err(_) => self.fail(ErrorKind::UnexpectedError),
                }
            }
            NumberParsing::AllDecimal => match BigDecimal::from_str(lexeme) {
                Ok(d) => Ok(Number::Decimal(d)),
                Err(_) => self.fail(ErrorKind::UnexpectedInput),
            },
        }
    }

    // -- byte-level helpers -------------------------------------------------

    fn next_byte(&mut self) -> Result<Option<u8>, ParserError> {
        self.reader
            .next_byte()
            .map_err(|e| self.io_error_value(e))
    }

    fn next_byte_for_lexeme(&mut self) -> Result<u8, ParserError> {
        match self.next_byte()? {
            Some(b) => Ok(b),
            None => self.fail(ErrorKind::UnexpectedEof),
        }
    }

    fn peek_non_ws(&mut self) -> Result<Option<u8>, ParserError> {
        loop {
            match self.next_byte()? {
                None => return Ok(None),
                Some(b) if is_whitespace(b) => continue,
                Some(b) => return Ok(Some(b)),
            }
        }
    }

    fn skip_ws(&mut self) -> Result<(), ParserError> {
        loop {
            match self.next_byte()? {
                None => return Ok(()),
                Some(b) if is_whitespace(b) => continue,
                Some(b) => {
                    self.reader.push_back(b);
                    return Ok(());
                }
            }
        }
    }

    fn expect_byte(&mut self, expected: u8) -> Result<(), ParserError> {
        match self.next_byte()? {
            Some(b) if b == expected => Ok(()),
            Some(_) => self.fail(ErrorKind::UnexpectedInput),
            None => self.fail(ErrorKind::UnexpectedEof),
        }
    }

    fn push_scratch(&mut self, bytes: &[u8]) -> Result<(), ParserError> {
        if self.scratch.len() + bytes.len() >= self.options.max_value_length() {
            return self.fail(ErrorKind::ValueTooLong);
        }
        self.scratch.extend_from_slice(bytes);
        Ok(())
    }

    fn io_error_value(&mut self, err: io::Error) -> ParserError {
        self.make_error(ErrorKind::Io(err.to_string()))
    }

    fn make_error(&mut self, kind: ErrorKind) -> ParserError {
        self.done = true;
        let line = self.reader.line();
        let snippet = self.reader.read_raw(20);
        let message = if snippet.is_empty() { None } else { Some(snippet) };
        ParserError::new(kind, line, message)
    }

    fn fail<T>(&mut self, kind: ErrorKind) -> Result<T, ParserError> {
        Err(self.make_error(kind))
    }
}

impl<'a> Parser<SliceSource<'a>> {
    /// Parse from an in-memory byte slice, with default options.
    pub fn from_slice(slice: &'a [u8]) -> Self {
        Self::new(SliceSource::new(slice))
    }

    /// Parse from an in-memory byte slice, with explicit options.
    pub fn from_slice_with_options(slice: &'a [u8], options: ParserOptions) -> Self {
        Self::with_options(SliceSource::new(slice), options)
    }
}

impl<R: Read> Parser<ReaderSource<R>> {
    /// Parse from anything implementing [`Read`], with default options.
    pub fn from_reader(reader: R) -> Self {
        Self::new(ReaderSource::new(reader))
    }

    /// Parse from anything implementing [`Read`], with explicit options.
    pub fn from_reader_with_options(reader: R, options: ParserOptions) -> Self {
        Self::with_options(ReaderSource::new(reader), options)
    }
}

impl Parser<ReaderSource<File>> {
    /// Open `path` and parse from it, with default options. The parser owns
    /// the resulting file handle.
    pub fn from_path(path: impl AsRef<FsPath>) -> io::Result<Self> {
        Ok(Self::new(open_file(path)?))
    }

    /// Open `path` and parse from it, with explicit options.
    pub fn from_path_with_options(path: impl AsRef<FsPath>, options: ParserOptions) -> io::Result<Self> {
        Ok(Self::with_options(open_file(path)?, options))
    }
}
