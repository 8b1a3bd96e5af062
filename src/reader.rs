use std::io;

use crate::source::ByteSource;

/// Owns a fixed-capacity buffer, two cursors, and the byte source. Performs
/// no structural interpretation of its own; it exposes byte-level
/// operations only, as required of the INPUT core's lowest layer.
pub(crate) struct ByteBufferReader<S> {
    source: Option<S>,
    close_on_drop: bool,
    buf: Vec<u8>,
    pos: usize,
    end: usize,
    line: u64,
}

impl<S: ByteSource> ByteBufferReader<S> {
    pub(crate) fn new(source: S, capacity: usize, close_on_drop: bool) -> Self {
        ByteBufferReader {
            source: Some(source),
            close_on_drop,
            buf: vec![0u8; capacity.max(1)],
            pos: 0,
            end: 0,
            line: 1,
        }
    }

    /// The current 1-based line number.
    pub(crate) fn line(&self) -> u64 {
        self.line
    }

    /// Returns the next byte, refilling from the source when the buffer is
    /// exhausted. `Ok(None)` means EOF.
    pub(crate) fn next_byte(&mut self) -> io::Result<Option<u8>> {
        if self.pos == self.end {
            self.refill()?;
            if self.pos == self.end {
                return Ok(None);
            }
        }
        let b = self.buf[self.pos];
        self.pos += 1;
        if b == b'\n' {
            self.line += 1;
        }
        Ok(Some(b))
    }

    fn refill(&mut self) -> io::Result<()> {
        let source = self
            .source
            .as_mut()
            .expect("byte buffer reader used after its source was released");
        let n = source.fill(&mut self.buf)?;
        self.pos = 0;
        self.end = n;
        Ok(())
    }

    /// Returns `b` to the stream so the next call to [`Self::next_byte`]
    /// yields it again. Only one byte of push-back depth is ever needed: it
    /// is valid only immediately after a successful `next_byte` that
    /// returned `b` from the same chunk.
    pub(crate) fn push_back(&mut self, b: u8) {
        debug_assert!(self.pos > 0, "push_back with no byte to return");
        self.pos -= 1;
        debug_assert_eq!(
            self.buf[self.pos], b,
            "push_back of a byte that wasn't just read"
        );
        if b == b'\n' {
            self.line -= 1;
        }
    }

    /// A best-effort diagnostic snippet of up to `n` bytes of upcoming
    /// input, decoded lossily. Never fails the parse: an I/O error or EOF
    /// just truncates the snippet.
    pub(crate) fn read_raw(&mut self, n: usize) -> String {
        let mut out = Vec::with_capacity(n);
        while out.len() < n {
            match self.next_byte() {
                Ok(Some(b)) => out.push(b),
                _ => break,
            }
        }
        String::from_utf8_lossy(&out).into_owned()
    }

    /// Take the source back out, bypassing `close_on_drop` entirely. The
    /// reader is consumed, so the source the caller gets back is never
    /// touched by `Drop`.
    pub(crate) fn into_source(mut self) -> S {
        self.source
            .take()
            .expect("byte buffer reader used after its source was released")
    }
}

impl<S> Drop for ByteBufferReader<S> {
    fn drop(&mut self) {
        if !self.close_on_drop {
            if let Some(source) = self.source.take() {
                std::mem::forget(source);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::ByteBufferReader;
    use crate::source::SliceSource;

    #[test]
    fn reads_bytes_and_tracks_line() {
        let mut r = ByteBufferReader::new(SliceSource::new(b"ab\ncd"), 2, true);
        assert_eq!(r.line(), 1);
        assert_eq!(r.next_byte().unwrap(), Some(b'a'));
        assert_eq!(r.next_byte().unwrap(), Some(b'b'));
        assert_eq!(r.next_byte().unwrap(), Some(b'\n'));
        assert_eq!(r.line(), 2);
        assert_eq!(r.next_byte().unwrap(), Some(b'c'));
        assert_eq!(r.next_byte().unwrap(), Some(b'd'));
        assert_eq!(r.next_byte().unwrap(), None);
        assert_eq!(r.next_byte().unwrap(), None);
    }

    #[test]
    fn push_back_replays_byte_and_line() {
        let mut r = ByteBufferReader::new(SliceSource::new(b"a\nb"), 16, true);
        assert_eq!(r.next_byte().unwrap(), Some(b'a'));
        assert_eq!(r.next_byte().unwrap(), Some(b'\n'));
        assert_eq!(r.line(), 2);
        r.push_back(b'\n');
        assert_eq!(r.line(), 1);
        assert_eq!(r.next_byte().unwrap(), Some(b'\n'));
        assert_eq!(r.line(), 2);
    }

    #[test]
    fn one_byte_buffer_still_works() {
        let mut r = ByteBufferReader::new(SliceSource::new(b"xyz"), 1, true);
        assert_eq!(r.next_byte().unwrap(), Some(b'x'));
        assert_eq!(r.next_byte().unwrap(), Some(b'y'));
        assert_eq!(r.next_byte().unwrap(), Some(b'z'));
        assert_eq!(r.next_byte().unwrap(), None);
    }
}
