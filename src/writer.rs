use std::io::Write;

use crate::error::WriterError;
use crate::number::Number;

/// One level of the writer's context stack. `started` tracks whether any
/// child has been written yet, which governs whether the next child needs a
/// leading comma.
enum Context {
    Root { started: bool },
    Object { started: bool },
    Array { started: bool },
}

/// A streaming JSON generator that writes directly to a sink rather than
/// building a tree in memory.
///
/// Use the imperative `begin_*`/`end_*` primitives for full control, or the
/// closure-based `write_object`/`write_array` sugar to get matching
/// begin/end calls for free.
///
/// ```
/// use jstream::{Number, Writer};
///
/// let mut out = Vec::new();
/// let mut w = Writer::new(&mut out);
/// w.write_object(None, |w| {
///     w.write_string(Some("name"), "Elvis")?;
///     w.write_number(Some("age"), &Number::Int(42))
/// }).unwrap();
/// assert_eq!(out, br#"{"name":"Elvis","age":42}"#);
/// ```
pub struct Writer<W> {
    sink: W,
    stack: Vec<Context>,
}

impl<W: Write> Writer<W> {
    /// Create a writer over `sink`, starting at the root context.
    pub fn new(sink: W) -> Self {
        Writer {
            sink,
            stack: vec![Context::Root { started: false }],
        }
    }

    /// Release the writer and return the underlying sink.
    pub fn into_inner(self) -> W {
        self.sink
    }

    /// Open an object. `name` must be `Some` inside an object context and
    /// `None` everywhere else.
    pub fn begin_object(&mut self, name: Option<&str>) -> Result<(), WriterError> {
        self.prefix(name)?;
        self.sink.write_all(b"{")?;
        self.stack.push(Context::Object { started: false });
        Ok(())
    }

    /// Close the innermost object.
    pub fn end_object(&mut self) -> Result<(), WriterError> {
        match self.stack.pop() {
            Some(Context::Object { .. }) => {
                self.sink.write_all(b"}")?;
                Ok(())
            }
            other => {
                self.restore(other);
                Err(WriterError::InvalidContext("end_object outside an object"))
            }
        }
    }

    /// Open an array. `name` must be `Some` inside an object context and
    /// `None` everywhere else.
    pub fn begin_array(&mut self, name: Option<&str>) -> Result<(), WriterError> {
        self.prefix(name)?;
        self.sink.write_all(b"[")?;
        self.stack.push(Context::Array { started: false });
        Ok(())
    }

    /// Close the innermost array.
    pub fn end_array(&mut self) -> Result<(), WriterError> {
        match self.stack.pop() {
            Some(Context::Array { .. }) => {
                self.sink.write_all(b"]")?;
                Ok(())
            }
            other => {
                self.restore(other);
                Err(WriterError::InvalidContext("end_array outside an array"))
            }
        }
    }

    /// Write `f`'s contents wrapped in `begin_object`/`end_object`.
    pub fn write_object<F>(&mut self, name: Option<&str>, f: F) -> Result<(), WriterError>
    where
        F: FnOnce(&mut Self) -> Result<(), WriterError>,
    {
        self.begin_object(name)?;
        f(self)?;
        self.end_object()
    }

    /// Write `f`'s contents wrapped in `begin_array`/`end_array`.
    pub fn write_array<F>(&mut self, name: Option<&str>, f: F) -> Result<(), WriterError>
    where
        F: FnOnce(&mut Self) -> Result<(), WriterError>,
    {
        self.begin_array(name)?;
        f(self)?;
        self.end_array()
    }

    /// Write a string value.
    pub fn write_string(&mut self, name: Option<&str>, value: &str) -> Result<(), WriterError> {
        self.prefix(name)?;
        self.write_quoted(value)
    }

    /// Write a number value.
    pub fn write_number(&mut self, name: Option<&str>, value: &Number) -> Result<(), WriterError> {
        let rendered = match value {
            Number::Int(i) => i.to_string(),
            Number::Double(d) => {
                if !d.is_finite() {
                    return Err(WriterError::InvalidContext(
                        "non-finite number has no JSON representation",
                    ));
                }
                d.to_string()
            }
            Number::Decimal(d) => d.to_string(),
        };
        self.prefix(name)?;
        self.sink.write_all(rendered.as_bytes())?;
        Ok(())
    }

    /// Write a boolean value.
    pub fn write_bool(&mut self, name: Option<&str>, value: bool) -> Result<(), WriterError> {
        self.prefix(name)?;
        self.sink
            .write_all(if value { b"true" } else { b"false" })?;
        Ok(())
    }

    /// Write `null`.
    pub fn write_null(&mut self, name: Option<&str>) -> Result<(), WriterError> {
        self.prefix(name)?;
        self.sink.write_all(b"null")?;
        Ok(())
    }

    /// Flush the underlying sink.
    pub fn flush(&mut self) -> Result<(), WriterError> {
        self.sink.flush()?;
        Ok(())
    }

    /// Emit a raw `\n`, independent of the current context's separator
    /// rule. Used to produce JSON-lines output: write a root value, call
    /// `new_line`, write the next root value, and so on.
    ///
    /// If called at the root context, also clears the "root value already
    /// written" flag, so a fresh top-level value may follow the newline.
    pub fn new_line(&mut self) -> Result<(), WriterError> {
        self.sink.write_all(b"\n")?;
        if let Some(Context::Root { started }) = self.stack.last_mut() {
            *started = false;
        }
        Ok(())
    }

    /// Write the comma/key prefix appropriate for the current context, and
    /// mark that context as having started.
    fn prefix(&mut self, name: Option<&str>) -> Result<(), WriterError> {
        let top = self
            .stack
            .last_mut()
            .expect("writer context stack is never empty");
        match top {
            Context::Root { started } => {
                if *started {
                    return Err(WriterError::InvalidContext(
                        "a document may only have one root value",
                    ));
                }
                if name.is_some() {
                    return Err(WriterError::InvalidContext(
                        "a name was given outside an object",
                    ));
                }
                *started = true;
            }
            Context::Array { started } => {
                if name.is_some() {
                    return Err(WriterError::InvalidContext(
                        "a name was given inside an array",
                    ));
                }
                if *started {
                    self.sink.write_all(b",")?;
                }
                *started = true;
            }
            Context::Object { started } => {
                let name = name.ok_or(WriterError::InvalidContext(
                    "a value inside an object needs a name",
                ))?;
                if *started {
                    self.sink.write_all(b",")?;
                }
                *started = true;
                self.write_quoted(name)?;
                self.sink.write_all(b":")?;
            }
        }
        Ok(())
    }

    /// Put a popped context back after a mismatched `end_*` call, so the
    /// writer stays usable for diagnostics rather than left stackless.
    fn restore(&mut self, context: Option<Context>) {
        if let Some(context) = context {
            self.stack.push(context);
        }
    }

    fn write_quoted(&mut self, s: &str) -> Result<(), WriterError> {
        self.sink.write_all(b"\"")?;
        for b in s.bytes() {
            match b {
                b'"' => self.sink.write_all(b"\\\"")?,
                b'\\' => self.sink.write_all(b"\\\\")?,
                0x08 => self.sink.write_all(b"\\b")?,
                0x0C => self.sink.write_all(b"\\f")?,
                0x0A => self.sink.write_all(b"\\n")?,
                0x0D => self.sink.write_all(b"\\r")?,
                0x09 => self.sink.write_all(b"\\t")?,
                other => self.sink.write_all(&[other])?,
            }
        }
        self.sink.write_all(b"\"")?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn writes_flat_object() {
        let mut out = Vec::new();
        let mut w = Writer::new(&mut out);
        w.write_object(None, |w| {
            w.write_string(Some("name"), "Elvis")?;
            w.write_number(Some("age"), &Number::Int(42))?;
            w.write_bool(Some("alive"), false)?;
            w.write_null(Some("pet"))
        })
        .unwrap();
        assert_eq!(out, br#"{"name":"Elvis","age":42,"alive":false,"pet":null}"#);
    }

    #[test]
    fn writes_nested_array() {
        let mut out = Vec::new();
        let mut w = Writer::new(&mut out);
        w.write_array(None, |w| {
            w.write_number(None, &Number::Int(1))?;
            w.write_object(None, |w| w.write_string(Some("k"), "v"))?;
            w.write_number(None, &Number::Double(2.5))
        })
        .unwrap();
        assert_eq!(out, br#"[1,{"k":"v"},2.5]"#);
    }

    #[test]
    fn escapes_quotes_and_backslashes_but_not_raw_control_bytes() {
        let mut out = Vec::new();
        let mut w = Writer::new(&mut out);
        w.write_string(None, "a\"b\\c\nd\u{01}e").unwrap();
        assert_eq!(&out, b"\"a\\\"b\\\\c\\nd\x01e\"");
    }

    #[test]
    fn rejects_second_root_value() {
        let mut out = Vec::new();
        let mut w = Writer::new(&mut out);
        w.write_null(None).unwrap();
        assert!(w.write_null(None).is_err());
    }

    #[test]
    fn new_line_allows_json_lines_output() {
        let mut out = Vec::new();
        let mut w = Writer::new(&mut out);
        w.write_number(None, &Number::Int(1)).unwrap();
        w.new_line().unwrap();
        w.write_number(None, &Number::Int(2)).unwrap();
        w.new_line().unwrap();
        w.write_string(None, "three").unwrap();
        assert_eq!(out, b"1\n2\n\"three\"");
    }

    #[test]
    fn rejects_unnamed_value_in_object() {
        let mut out = Vec::new();
        let mut w = Writer::new(&mut out);
        w.begin_object(None).unwrap();
        assert!(w.write_null(None).is_err());
    }

    #[test]
    fn rejects_non_finite_float() {
        let mut out = Vec::new();
        let mut w = Writer::new(&mut out);
        assert!(w.write_number(None, &Number::Double(f64::NAN)).is_err());
    }
}
