//! Interop with [`serde_json::Value`], enabled by the `serde_json` feature.

use num_traits::ToPrimitive;
use serde_json::{Map, Number as JsonNumber, Value};

use crate::error::ParserError;
use crate::number::Number;
use crate::source::{ByteSource, ReaderSource, SliceSource};
use crate::token::Token;
use crate::Parser;
use std::io::Read;

fn number_to_json(n: &Number) -> Result<JsonNumber, ParserError> {
    match n {
        Number::Int(i) => Ok(JsonNumber::from(*i)),
        Number::Double(d) => JsonNumber::from_f64(*d).ok_or_else(|| {
            ParserError::new(
                crate::error::ErrorKind::UnexpectedError,
                0,
                Some("non-finite number has no serde_json representation".to_owned()),
            )
        }),
        Number::Decimal(d) => {
            let as_f64 = d.to_f64().ok_or_else(|| {
                ParserError::new(
                    crate::error::ErrorKind::UnexpectedError,
                    0,
                    Some("decimal value is out of range for f64".to_owned()),
                )
            })?;
            JsonNumber::from_f64(as_f64).ok_or_else(|| {
                ParserError::new(
                    crate::error::ErrorKind::UnexpectedError,
                    0,
                    Some("decimal value has no serde_json representation".to_owned()),
                )
            })
        }
    }
}

/// Drain every remaining token of `parser` into one [`Value`] tree. Used by
/// both [`from_slice`] and [`from_reader`], and usable directly against any
/// [`Parser`] that hasn't started yet.
pub fn parser_to_value<S: ByteSource>(parser: &mut Parser<S>) -> Result<Value, ParserError> {
    let mut stack: Vec<(Option<String>, Value)> = Vec::new();
    let mut result = None;

    while let Some(token) = parser.read()? {
        let key = token.key().and_then(|k| k.as_name()).map(str::to_owned);
        match token {
            Token::StartObject(_) => stack.push((key, Value::Object(Map::new()))),
            Token::StartArray(_) => stack.push((key, Value::Array(Vec::new()))),
            Token::EndObject(_) | Token::EndArray(_) => {
                let (_, finished) = stack.pop().expect("matching start for every end");
                attach(&mut stack, &mut result, key, finished);
            }
            Token::String(_, s) => attach(&mut stack, &mut result, key, Value::String(s)),
            Token::Number(_, n) => {
                let value = Value::Number(number_to_json(&n)?);
                attach(&mut stack, &mut result, key, value);
            }
            Token::Bool(_, b) => attach(&mut stack, &mut result, key, Value::Bool(b)),
            Token::Null(_) => attach(&mut stack, &mut result, key, Value::Null),
        }
    }

    Ok(result.unwrap_or(Value::Null))
}

fn attach(
    stack: &mut [(Option<String>, Value)],
    result: &mut Option<Value>,
    key: Option<String>,
    value: Value,
) {
    match stack.last_mut() {
        Some((_, Value::Object(map))) => {
            map.insert(key.expect("object entries are always named"), value);
        }
        Some((_, Value::Array(arr))) => arr.push(value),
        Some(_) => unreachable!("container frames are always Object or Array"),
        None => *result = Some(value),
    }
}

/// Parse a byte slice into a [`Value`], with default [`ParserOptions`](crate::ParserOptions).
///
/// ```
/// use jstream::serde_json::from_slice;
/// use serde_json::json;
///
/// let value = from_slice(br#"{"name": "Elvis"}"#).unwrap();
/// assert_eq!(value, json!({"name": "Elvis"}));
/// ```
pub fn from_slice(v: &[u8]) -> Result<Value, ParserError> {
    let mut parser = Parser::<SliceSource<'_>>::from_slice(v);
    parser_to_value(&mut parser)
}

/// Parse everything read from `reader` into a [`Value`], with default
/// [`ParserOptions`](crate::ParserOptions).
pub fn from_reader<R: Read>(reader: R) -> Result<Value, ParserError> {
    let mut parser = Parser::<ReaderSource<R>>::from_reader(reader);
    parser_to_value(&mut parser)
}
