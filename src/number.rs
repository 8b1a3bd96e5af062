use bigdecimal::BigDecimal;
use num_traits::{FromPrimitive, ToPrimitive};

/// A parsed JSON number. Which variant is produced is governed by the
/// parser's [`NumberParsing`](crate::NumberParsing) mode.
#[derive(Clone, Debug, PartialEq)]
pub enum Number {
    /// An integer that fit in a signed 64-bit accumulator with no more
    /// than 18 significant digits and no fraction or exponent.
    Int(i64),

    /// Anything else in `IntDouble` mode: a float, or an integer too wide
    /// or too precise for the fast path.
    Double(f64),

    /// The exact value of the lexeme in `AllDecimal` mode.
    Decimal(BigDecimal),
}

impl Number {
    /// The value as `f64`, converting from whichever variant was produced.
    /// Returns `None` only if a `Decimal` value is out of `f64`'s range.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Number::Int(i) => Some(*i as f64),
            Number::Double(d) => Some(*d),
            Number::Decimal(d) => d.to_f64(),
        }
    }

    /// The value as `i64`. Only `Int` numbers carry one.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The value converted to any integer type `num_traits` knows how to
    /// build from an `i64`. Only `Int` numbers convert.
    pub fn as_int<I: FromPrimitive>(&self) -> Option<I> {
        match self {
            Number::Int(i) => I::from_i64(*i),
            _ => None,
        }
    }

    /// The value as [`BigDecimal`]. Only `Decimal` numbers carry one.
    pub fn as_decimal(&self) -> Option<BigDecimal> {
        match self {
            Number::Decimal(d) => Some(d.clone()),
            _ => None,
        }
    }
}
