use crate::error::ParserError;
use crate::source::ByteSource;
use crate::token::Token;
use crate::Parser;

/// An iterator over the [`Token`]s of a [`Parser`], created by
/// [`Parser::tokens`].
///
/// Stops yielding after the first `Err`, mirroring `read`'s contract that a
/// failed parser never touches its source again.
pub struct Tokens<'p, S> {
    parser: &'p mut Parser<S>,
    done: bool,
}

impl<'p, S> Tokens<'p, S> {
    pub(crate) fn new(parser: &'p mut Parser<S>) -> Self {
        Tokens { parser, done: false }
    }
}

impl<'p, S: ByteSource> Iterator for Tokens<'p, S> {
    type Item = Result<Token, ParserError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.parser.read() {
            Ok(Some(token)) => Some(Ok(token)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<'p, S: ByteSource> IntoIterator for &'p mut Parser<S> {
    type Item = Result<Token, ParserError>;
    type IntoIter = Tokens<'p, S>;

    fn into_iter(self) -> Self::IntoIter {
        Tokens::new(self)
    }
}
