//! In-memory backing storage for [`Stream`](crate::stream::Stream).
//!
//! A [`Buffer`] behaves like a temporary file held in memory: writes at the
//! cursor overwrite existing bytes and grow the buffer past its end, reads
//! consume up to the requested length from the cursor, and the cursor may be
//! positioned anywhere in `0..=len`.

use std::fmt;
use std::io;

use bytes::{Bytes, BytesMut};

/// Reference point for a seek, equivalent to `SEEK_SET`, `SEEK_CUR` and
/// `SEEK_END`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Whence {
    /// Offset is relative to the start of the buffer
    #[default]
    Start,
    /// Offset is relative to the current cursor
    Current,
    /// Offset is relative to the end of the buffer
    End,
}

impl fmt::Display for Whence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let str = match self {
            Whence::Start => "start",
            Whence::Current => "current",
            Whence::End => "end",
        };
        f.write_str(str)
    }
}

/// Growable byte storage with a cursor.
///
/// This is the storage handle a [`Stream`](crate::stream::Stream) owns and hands back
/// from [`detach`](crate::stream::Stream::detach). It implements the `std::io`
/// traits so detached storage can be fed to ordinary I/O code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Buffer {
    data: BytesMut,
    pos: usize,
}

impl Buffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a buffer holding a copy of `content`, cursor at the start.
    pub fn with_content(content: &[u8]) -> Self {
        Self { data: BytesMut::from(content), pos: 0 }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Current cursor position.
    #[inline]
    pub fn position(&self) -> u64 {
        self.pos as u64
    }

    /// Number of bytes between the cursor and the end.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Returns true if the cursor is at or past the end.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// The whole content, independent of the cursor.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Reads up to `length` bytes from the cursor and advances it.
    ///
    /// Returns fewer bytes when the end is reached first, and empty bytes when
    /// the cursor is already at the end.
    pub fn read_bytes(&mut self, length: usize) -> Bytes {
        let start = self.pos.min(self.data.len());
        let end = start.saturating_add(length).min(self.data.len());
        self.pos = end;
        Bytes::copy_from_slice(&self.data[start..end])
    }

    /// Writes `src` at the cursor, overwriting existing bytes and growing the
    /// buffer as needed. Returns the number of bytes written.
    pub fn write_bytes(&mut self, src: &[u8]) -> usize {
        let end = self.pos + src.len();
        if end > self.data.len() {
            self.data.resize(end, 0);
        }
        self.data[self.pos..end].copy_from_slice(src);
        self.pos = end;
        src.len()
    }

    /// Moves the cursor, returning the new position.
    ///
    /// Returns `None` and leaves the cursor untouched when the target lies
    /// before the start or past the end of the buffer.
    pub fn seek_to(&mut self, offset: i64, whence: Whence) -> Option<u64> {
        let base = match whence {
            Whence::Start => 0,
            Whence::Current => i64::try_from(self.pos).ok()?,
            Whence::End => i64::try_from(self.data.len()).ok()?,
        };

        let target = usize::try_from(base.checked_add(offset)?).ok()?;
        if target > self.data.len() {
            return None;
        }

        self.pos = target;
        Some(self.position())
    }

    /// Consumes the buffer, returning its whole content.
    pub fn into_bytes(self) -> Bytes {
        self.data.freeze()
    }
}

impl From<Bytes> for Buffer {
    fn from(bytes: Bytes) -> Self {
        Self::with_content(&bytes)
    }
}

impl io::Read for Buffer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let bytes = self.read_bytes(buf.len());
        buf[..bytes.len()].copy_from_slice(&bytes);
        Ok(bytes.len())
    }
}

impl io::Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.write_bytes(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl io::Seek for Buffer {
    fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
        let (offset, whence) = match pos {
            io::SeekFrom::Start(n) => (
                i64::try_from(n).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?,
                Whence::Start,
            ),
            io::SeekFrom::Current(n) => (n, Whence::Current),
            io::SeekFrom::End(n) => (n, Whence::End),
        };

        self.seek_to(offset, whence).ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, format!("seek to offset {offset} from {whence} out of range"))
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Seek, SeekFrom, Write};

    use super::*;

    #[test]
    fn read_advances_cursor() {
        let mut buffer = Buffer::with_content(b"hello world");

        assert_eq!(buffer.read_bytes(5), Bytes::from_static(b"hello"));
        assert_eq!(buffer.position(), 5);
        assert_eq!(buffer.remaining(), 6);

        assert_eq!(buffer.read_bytes(100), Bytes::from_static(b" world"));
        assert!(buffer.is_eof());
        assert!(buffer.read_bytes(10).is_empty());
    }

    #[test]
    fn write_overwrites_then_grows() {
        let mut buffer = Buffer::with_content(b"hello");

        assert_eq!(buffer.write_bytes(b"jel"), 3);
        assert_eq!(buffer.as_bytes(), b"jello");

        buffer.seek_to(0, Whence::End);
        buffer.write_bytes(b" world");
        assert_eq!(buffer.as_bytes(), b"jello world");
        assert_eq!(buffer.position(), 11);

        buffer.seek_to(-2, Whence::End);
        buffer.write_bytes(b"LDS!");
        assert_eq!(buffer.as_bytes(), b"jello worLDS!");
    }

    #[test]
    fn seek_stays_inside_buffer() {
        let mut buffer = Buffer::with_content(b"0123456789");

        assert_eq!(buffer.seek_to(4, Whence::Start), Some(4));
        assert_eq!(buffer.seek_to(2, Whence::Current), Some(6));
        assert_eq!(buffer.seek_to(-1, Whence::End), Some(9));
        assert_eq!(buffer.seek_to(0, Whence::End), Some(10));

        assert_eq!(buffer.seek_to(-1, Whence::Start), None);
        assert_eq!(buffer.seek_to(11, Whence::Start), None);
        assert_eq!(buffer.seek_to(1, Whence::End), None);
        assert_eq!(buffer.seek_to(i64::MAX, Whence::Current), None);

        // failed seeks leave the cursor alone
        assert_eq!(buffer.position(), 10);
    }

    #[test]
    fn io_traits() {
        let mut buffer = Buffer::new();
        buffer.write_all(b"temp storage").unwrap();
        buffer.seek(SeekFrom::Start(5)).unwrap();

        let mut out = String::new();
        buffer.read_to_string(&mut out).unwrap();
        assert_eq!(out, "storage");

        let err = buffer.seek(SeekFrom::Current(1)).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);

        assert_eq!(buffer.into_bytes(), Bytes::from_static(b"temp storage"));
    }
}
