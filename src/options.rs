/// Which representation a parsed JSON number is materialized into.
///
/// This is an API contract, not an implementation detail: both paths are
/// always compiled in, and a caller picks one via [`ParserOptionsBuilder`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum NumberParsing {
    /// Integers that fit a signed 64-bit accumulator with at most 18
    /// significant digits and no fraction or exponent become
    /// [`Number::Int`](crate::Number::Int); everything else becomes
    /// [`Number::Double`](crate::Number::Double).
    #[default]
    IntDouble,

    /// Every number is validated byte-for-byte and converted to an
    /// arbitrary-precision [`BigDecimal`](bigdecimal::BigDecimal) that
    /// preserves the exact value of the lexeme, not a normalized form.
    AllDecimal,
}

/// Immutable options for a [`Parser`](crate::Parser). Use
/// [`ParserOptionsBuilder`] to create instances of this struct.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParserOptions {
    pub(crate) buffer_capacity: usize,
    pub(crate) max_value_length: usize,
    pub(crate) number_parsing: NumberParsing,
    pub(crate) close_on_drop: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            buffer_capacity: 1024 * 1024,
            max_value_length: 10 * 1024 * 1024,
            number_parsing: NumberParsing::IntDouble,
            close_on_drop: true,
        }
    }
}

impl ParserOptions {
    /// The fixed size of the pull buffer.
    pub fn buffer_capacity(&self) -> usize {
        self.buffer_capacity
    }

    /// The cap on the in-progress byte length of a single string or number
    /// lexeme.
    pub fn max_value_length(&self) -> usize {
        self.max_value_length
    }

    /// Which [`Number`](crate::Number) variant numbers are materialized as.
    pub fn number_parsing(&self) -> NumberParsing {
        self.number_parsing
    }

    /// Whether the byte source is released when the parser is dropped.
    pub fn close_on_drop(&self) -> bool {
        self.close_on_drop
    }
}

/// A builder for [`ParserOptions`].
///
/// ```
/// use jstream::options::ParserOptionsBuilder;
/// use jstream::{NumberParsing, Parser};
///
/// let options = ParserOptionsBuilder::default()
///     .with_buffer_capacity(64 * 1024)
///     .with_number_parsing(NumberParsing::AllDecimal)
///     .build();
/// let mut parser = Parser::from_slice_with_options(b"[1,2,3]", options);
/// assert!(parser.read().unwrap().is_some());
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct ParserOptionsBuilder {
    options: ParserOptions,
}

impl ParserOptionsBuilder {
    /// Set the fixed size of the pull buffer.
    pub fn with_buffer_capacity(mut self, buffer_capacity: usize) -> Self {
        self.options.buffer_capacity = buffer_capacity;
        self
    }

    /// Set the cap on the in-progress byte length of a single string or
    /// number lexeme. Exceeding it fails the parse with
    /// [`ErrorKind::ValueTooLong`](crate::ErrorKind::ValueTooLong).
    pub fn with_max_value_length(mut self, max_value_length: usize) -> Self {
        self.options.max_value_length = max_value_length;
        self
    }

    /// Set which [`Number`](crate::Number) variant numbers are materialized
    /// as.
    pub fn with_number_parsing(mut self, number_parsing: NumberParsing) -> Self {
        self.options.number_parsing = number_parsing;
        self
    }

    /// Set whether the byte source is released when the parser is dropped.
    pub fn with_close_on_drop(mut self, close_on_drop: bool) -> Self {
        self.options.close_on_drop = close_on_drop;
        self
    }

    /// Create a new [`ParserOptions`] object.
    pub fn build(self) -> ParserOptions {
        self.options
    }
}
