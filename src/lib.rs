//! # jstream
//!
//! A streaming, pull-based JSON parser and generator for documents that are
//! too large to hold entirely in memory.
//!
//! Unlike a tree-builder like `serde_json::from_slice`, [`Parser`] never
//! materializes more of the document than the value currently in progress:
//! it reads a fixed-size buffer's worth of bytes at a time and emits one
//! [`Token`] per call to [`Parser::read`]. Deeply nested documents are
//! handled with an explicit state stack rather than recursion, so parsing
//! depth is bounded by memory, not by the call stack.
//!
//! ## Examples
//!
//! ### Pulling tokens in a loop
//!
//! ```
//! use jstream::{Parser, Token};
//!
//! let json = r#"{"name": "Elvis", "hits": [1, 2, 3]}"#.as_bytes();
//!
//! let mut parser = Parser::from_slice(json);
//! while let Some(token) = parser.read().unwrap() {
//!     match token {
//!         Token::String(Some(key), value) => {
//!             println!("{} = {value:?}", key);
//!         }
//!         _ => {}
//!     }
//! }
//! ```
//!
//! ### Iterating
//!
//! [`Parser::tokens`] adapts the parser into a plain [`Iterator`], so it
//! composes with the rest of the standard library:
//!
//! ```
//! use jstream::{Parser, Token};
//!
//! let mut parser = Parser::from_slice(br#"[1, 2, 3]"#);
//! let count = parser.tokens().filter(|t| matches!(t, Ok(Token::Number(..)))).count();
//! assert_eq!(count, 3);
//! ```
//!
//! ### Tracking the live path
//!
//! Every token carries the [`Key`] it was reached under, and the parser
//! tracks the full path from the root so a caller can filter on structural
//! location without buffering the document:
//!
//! ```
//! use jstream::{Key, Parser};
//!
//! let mut parser = Parser::from_slice(br#"{"users": [{"name": "Elvis"}]}"#);
//! let mut found = None;
//! while let Some(_) = parser.read().unwrap() {
//!     if parser.path_match(&[Key::name("users"), Key::name("name")]) {
//!         found = Some(parser.path_string());
//!     }
//! }
//! assert_eq!(found.as_deref(), Some("users[0].name"));
//! ```
//!
//! ### Generating
//!
//! [`Writer`] is the dual of [`Parser`]: it streams output to any
//! [`std::io::Write`] sink instead of building a tree first.
//!
//! ```
//! use jstream::Writer;
//!
//! let mut out = Vec::new();
//! Writer::new(&mut out)
//!     .write_object(None, |w| w.write_string(Some("name"), "Elvis"))
//!     .unwrap();
//! assert_eq!(out, br#"{"name":"Elvis"}"#);
//! ```
//!
//! [`Writer::new_line`] emits a raw `\n` and, at the root context, allows a
//! further top-level value to follow — the basis for
//! [JSON-lines](https://jsonlines.org) output:
//!
//! ```
//! use jstream::{Number, Writer};
//!
//! let mut out = Vec::new();
//! let mut w = Writer::new(&mut out);
//! w.write_number(None, &Number::Int(1)).unwrap();
//! w.new_line().unwrap();
//! w.write_number(None, &Number::Int(2)).unwrap();
//! assert_eq!(out, b"1\n2");
//! ```
//!
//! ### Parsing into a Serde JSON Value
//!
//! For testing and compatibility, `jstream` can drain a parser into a
//! [Serde JSON](https://github.com/serde-rs/json) `Value`. Heads up: you
//! need to enable the `serde_json` feature for this.
//!
//! ```
//! use jstream::serde_json::from_slice;
//!
//! let json = r#"{"name": "Elvis"}"#.as_bytes();
//! let value = from_slice(json).unwrap();
//!
//! assert!(value.is_object());
//! assert_eq!(value["name"], "Elvis");
//! ```
//!
//! If you find yourself doing this, you probably don't need the streaming
//! properties of `jstream` and your data fits comfortably into memory; in
//! that case you're likely better off using Serde JSON directly.
mod error;
mod iter;
mod key;
mod number;
pub mod options;
mod parser;
mod path;
mod reader;
pub mod source;
mod token;
mod writer;

#[cfg(feature = "serde_json")]
pub mod serde_json;

pub use error::{ErrorKind, ParserError, WriterError};
pub use iter::Tokens;
pub use key::Key;
pub use number::Number;
pub use options::{NumberParsing, ParserOptions, ParserOptionsBuilder};
pub use parser::Parser;
pub use path::Path;
pub use token::Token;
pub use writer::Writer;
