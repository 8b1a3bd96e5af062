use std::fmt;

/// A single segment of a [`Path`](crate::Path): either an object property
/// name or a zero-based array index.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// A property name inside an object.
    Name(String),

    /// A zero-based index inside an array.
    Index(usize),
}

impl Key {
    /// Build a [`Key::Name`] from anything that converts to a `String`.
    pub fn name(s: impl Into<String>) -> Self {
        Key::Name(s.into())
    }

    /// Build a [`Key::Index`].
    pub fn index(i: usize) -> Self {
        Key::Index(i)
    }

    /// The property name, if this is a [`Key::Name`].
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Key::Name(s) => Some(s),
            Key::Index(_) => None,
        }
    }

    /// The array index, if this is a [`Key::Index`].
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Key::Index(i) => Some(*i),
            Key::Name(_) => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Name(s) => write!(f, "{s}"),
            Key::Index(i) => write!(f, "[{i}]"),
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Name(s.to_owned())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Name(s)
    }
}

impl From<usize> for Key {
    fn from(i: usize) -> Self {
        Key::Index(i)
    }
}
