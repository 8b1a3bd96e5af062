use crate::key::Key;

/// The live structural position of a [`Parser`](crate::Parser): the ordered
/// sequence of [`Key`]s from the root to the current token's parent slot.
///
/// The path is grown and shrunk in lockstep with the parse state stack; it
/// never retains more than one entry per currently open container plus at
/// most one entry for the container or scalar in progress, so its length is
/// bounded by nesting depth rather than by document size.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Path {
    keys: Vec<Key>,
}

impl Path {
    pub(crate) fn new() -> Self {
        Path { keys: Vec::new() }
    }

    pub(crate) fn push(&mut self, key: Key) {
        self.keys.push(key);
    }

    pub(crate) fn pop(&mut self) -> Option<Key> {
        self.keys.pop()
    }

    /// The path entries, root-to-leaf.
    pub fn as_slice(&self) -> &[Key] {
        &self.keys
    }

    /// The innermost entry, if any.
    pub fn last(&self) -> Option<&Key> {
        self.keys.last()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Render the path as a dotted string with `[i]` for array indices, e.g.
    /// `a.b[3].c`.
    pub fn to_path_string(&self) -> String {
        let mut s = String::new();
        for key in &self.keys {
            match key {
                Key::Name(name) => {
                    if !s.is_empty() {
                        s.push('.');
                    }
                    s.push_str(name);
                }
                Key::Index(i) => {
                    s.push('[');
                    s.push_str(&i.to_string());
                    s.push(']');
                }
            }
        }
        s
    }

    /// Returns `true` iff there is a strictly increasing subsequence of
    /// positions in the path whose keys equal `wanted` in order. Unmatched
    /// leading, trailing, and intervening keys are permitted.
    ///
    /// Runs in O(path length) using a single cursor, since each `wanted` key
    /// resumes the search where the previous one left off.
    pub fn matches<'a, I>(&self, wanted: I) -> bool
    where
        I: IntoIterator<Item = &'a Key>,
    {
        let mut cursor = 0;
        for want in wanted {
            let mut found = false;
            while cursor < self.keys.len() {
                let candidate = &self.keys[cursor];
                cursor += 1;
                if candidate == want {
                    found = true;
                    break;
                }
            }
            if !found {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_path_matches_empty_query() {
        let path = Path::new();
        assert!(path.matches(std::iter::empty::<&Key>()));
    }

    #[test]
    fn exact_and_subsequence_matches() {
        let mut path = Path::new();
        path.push(Key::name("a"));
        path.push(Key::index(2));
        path.push(Key::name("b"));

        assert!(path.matches(&[Key::name("a"), Key::index(2), Key::name("b")]));
        assert!(path.matches(&[Key::name("a"), Key::name("b")]));
        assert!(path.matches(&[Key::index(2)]));
        assert!(!path.matches(&[Key::name("b"), Key::name("a")]));
        assert!(!path.matches(&[Key::name("c")]));
    }

    #[test]
    fn path_string_renders_dots_and_brackets() {
        let mut path = Path::new();
        path.push(Key::name("a"));
        path.push(Key::index(3));
        path.push(Key::name("c"));
        assert_eq!(path.to_path_string(), "a[3].c");
    }
}
