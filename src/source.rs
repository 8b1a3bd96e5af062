use std::fs::File;
use std::io::{self, Read};

/// A narrow, synchronous pull contract for bytes feeding a
/// [`Parser`](crate::Parser).
///
/// Modeled after [`std::io::Read::read`] but named distinctly: a source is
/// never asked for vectored reads or `read_to_end`, and `Ok(0)` always means
/// EOF, not "try again". A non-blocking source that would otherwise block
/// should surface that as `Err` (see the parser's concurrency model); the
/// parser is left in a usable state and `read` can be retried once more
/// input is available.
pub trait ByteSource {
    /// Fill as much of `buf` as there is data for and return the number of
    /// bytes written, or `0` for EOF. Called at most once per buffer refill.
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

/// A [`ByteSource`] that reads from an in-memory byte slice.
pub struct SliceSource<'a> {
    slice: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    /// Wrap a byte slice as a [`ByteSource`].
    pub fn new(slice: &'a [u8]) -> Self {
        SliceSource { slice, pos: 0 }
    }
}

impl ByteSource for SliceSource<'_> {
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = &self.slice[self.pos..];
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.pos += n;
        Ok(n)
    }
}

/// A [`ByteSource`] that reads from anything implementing [`Read`], e.g. a
/// [`BufReader`](std::io::BufReader) wrapped around a file or socket.
pub struct ReaderSource<R> {
    reader: R,
}

impl<R: Read> ReaderSource<R> {
    /// Wrap a [`Read`] implementation as a [`ByteSource`].
    pub fn new(reader: R) -> Self {
        ReaderSource { reader }
    }

    /// Release the wrapper and return the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> ByteSource for ReaderSource<R> {
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

pub(crate) fn open_file(path: impl AsRef<std::path::Path>) -> io::Result<ReaderSource<File>> {
    Ok(ReaderSource::new(File::open(path)?))
}
