//! Buffered, seekable byte stream used as a message body.
//!
//! A [`Stream`] owns an in-memory [`Buffer`] and guards every storage access
//! with two checks:
//!
//! - **Lifecycle**: a stream is attached until [`Stream::detach`] or
//!   [`Stream::close`] is called. After that every operation other than the
//!   capability queries fails with [`StreamError::Detached`].
//! - **Capabilities**: [`Capabilities`] are fixed at construction. A write on a
//!   read-only stream fails with [`StreamError::NotWritable`] even though the
//!   buffer underneath could take it.
//!
//! `Display` is the one operation that never fails: it renders the whole buffer
//! from position 0, or nothing when the stream is unreadable or detached.
//!
//! # Example
//!
//! ```
//! use micro_message::stream::{Stream, StreamError, Whence};
//!
//! let mut stream = Stream::new("hello");
//! stream.seek(0, Whence::End)?;
//! stream.write(b"!")?;
//! assert_eq!(stream.to_string(), "hello!");
//!
//! stream.rewind()?;
//! assert_eq!(&stream.read(5)?[..], b"hello");
//!
//! let buffer = stream.detach();
//! assert!(buffer.is_some());
//! assert_eq!(stream.tell(), Err(StreamError::Detached));
//! # Ok::<(), StreamError>(())
//! ```

mod buffer;
mod capabilities;
mod error;
mod metadata;

pub use buffer::Buffer;
pub use buffer::Whence;
pub use capabilities::Capabilities;
pub use error::StreamError;
pub use metadata::StreamMetadata;

use std::fmt;
use std::io;

use bytes::Bytes;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::ensure;

/// A byte stream over an owned in-memory buffer.
///
/// All storage-touching operations take `&mut self` and have no internal
/// locking; share a stream through [`Body`](crate::protocol::Body) when more than
/// one owner needs it.
#[derive(Debug)]
pub struct Stream {
    buffer: Option<Buffer>,
    capabilities: Capabilities,
}

impl Stream {
    /// Creates a readable, writable and seekable stream seeded with `initial`.
    pub fn new(initial: impl AsRef<[u8]>) -> Self {
        Self::with_capabilities(initial, Capabilities::all())
    }

    /// Creates an empty readable, writable and seekable stream.
    pub fn empty() -> Self {
        Self::new(b"")
    }

    /// Creates a stream seeded with `initial` and restricted to `capabilities`.
    ///
    /// The cursor starts at 0 regardless of whether the stream is seekable.
    pub fn with_capabilities(initial: impl AsRef<[u8]>, capabilities: Capabilities) -> Self {
        let buffer = Buffer::with_content(initial.as_ref());
        trace!(size = buffer.len(), ?capabilities, "stream created");
        Self { buffer: Some(buffer), capabilities }
    }

    /// The flags fixed at construction.
    #[inline]
    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Returns true if `read` and `contents` are permitted.
    #[inline]
    pub fn is_readable(&self) -> bool {
        self.capabilities.readable
    }

    /// Returns true if `write` is permitted.
    #[inline]
    pub fn is_writable(&self) -> bool {
        self.capabilities.writable
    }

    /// Returns true if `seek` and `rewind` are permitted.
    #[inline]
    pub fn is_seekable(&self) -> bool {
        self.capabilities.seekable
    }

    /// Returns false once the stream has been detached or closed.
    #[inline]
    pub fn is_attached(&self) -> bool {
        self.buffer.is_some()
    }

    fn attached(&self) -> Result<&Buffer, StreamError> {
        self.buffer.as_ref().ok_or_else(|| {
            warn!("operation on detached stream");
            StreamError::Detached
        })
    }

    fn attached_mut(&mut self) -> Result<&mut Buffer, StreamError> {
        self.buffer.as_mut().ok_or_else(|| {
            warn!("operation on detached stream");
            StreamError::Detached
        })
    }

    /// Reads up to `length` bytes from the cursor.
    ///
    /// # Errors
    ///
    /// Fails if the stream is detached or not readable, and with
    /// [`StreamError::NothingRead`] when no bytes come back. That includes a
    /// read at end-of-stream and a read of length 0; check [`Stream::eof`] first
    /// to tell the two apart from a real failure.
    pub fn read(&mut self, length: usize) -> Result<Bytes, StreamError> {
        let readable = self.capabilities.readable;
        let buffer = self.attached_mut()?;
        ensure!(readable, StreamError::NotReadable);

        let bytes = buffer.read_bytes(length);
        ensure!(!bytes.is_empty(), StreamError::NothingRead);

        trace!(requested = length, read = bytes.len(), position = buffer.position(), "read from stream");
        Ok(bytes)
    }

    /// Writes `data` at the cursor, returning the number of bytes written.
    ///
    /// # Errors
    ///
    /// Fails if the stream is detached or not writable, and with
    /// [`StreamError::NothingWritten`] when `data` is empty.
    pub fn write(&mut self, data: impl AsRef<[u8]>) -> Result<usize, StreamError> {
        let writable = self.capabilities.writable;
        let buffer = self.attached_mut()?;
        ensure!(writable, StreamError::NotWritable);

        let written = buffer.write_bytes(data.as_ref());
        ensure!(written > 0, StreamError::NothingWritten);

        trace!(written, position = buffer.position(), "write to stream");
        Ok(written)
    }

    /// Moves the cursor to `offset` relative to `whence`.
    ///
    /// # Errors
    ///
    /// Fails if the stream is detached or not seekable, and with
    /// [`StreamError::SeekFailed`] when the target is before the start or past
    /// the end of the stream.
    pub fn seek(&mut self, offset: i64, whence: Whence) -> Result<(), StreamError> {
        let seekable = self.capabilities.seekable;
        let buffer = self.attached_mut()?;
        ensure!(seekable, StreamError::NotSeekable);

        let position = buffer.seek_to(offset, whence).ok_or_else(|| StreamError::seek_failed(offset, whence))?;

        trace!(offset, %whence, position, "seek stream");
        Ok(())
    }

    /// Seeks to the beginning of the stream, same as `seek(0, Whence::Start)`.
    pub fn rewind(&mut self) -> Result<(), StreamError> {
        self.seek(0, Whence::Start)
    }

    /// Current cursor position.
    pub fn tell(&self) -> Result<u64, StreamError> {
        Ok(self.attached()?.position())
    }

    /// Returns true if the cursor is at or past the end of the stream.
    pub fn eof(&self) -> Result<bool, StreamError> {
        Ok(self.attached()?.is_eof())
    }

    /// Size of the stream in bytes, `None` if it cannot be determined.
    ///
    /// The in-memory buffer always knows its size.
    pub fn size(&self) -> Result<Option<u64>, StreamError> {
        Ok(Some(self.attached()?.len() as u64))
    }

    /// Reads everything between the cursor and the end.
    ///
    /// Unlike [`Stream::read`], an empty remainder yields empty bytes.
    pub fn contents(&mut self) -> Result<Bytes, StreamError> {
        let readable = self.capabilities.readable;
        let buffer = self.attached_mut()?;
        ensure!(readable, StreamError::NotReadable);

        let remaining = buffer.remaining();
        Ok(buffer.read_bytes(remaining))
    }

    /// Closes the stream and drops the underlying storage.
    ///
    /// # Errors
    ///
    /// Fails with [`StreamError::Detached`] if the stream was already detached
    /// or closed, so closing twice is an error.
    pub fn close(&mut self) -> Result<(), StreamError> {
        let buffer = self.buffer.take().ok_or_else(|| {
            warn!("close on detached stream");
            StreamError::Detached
        })?;
        debug!(size = buffer.len(), "stream closed");
        Ok(())
    }

    /// Separates the underlying storage from the stream and hands it back.
    ///
    /// The stream is unusable afterwards. Returns `None` if it was already
    /// detached or closed.
    pub fn detach(&mut self) -> Option<Buffer> {
        let buffer = self.buffer.take();
        if let Some(buffer) = &buffer {
            debug!(size = buffer.len(), position = buffer.position(), "stream detached");
        }
        buffer
    }

    /// Stream metadata, see [`StreamMetadata`].
    pub fn metadata(&self) -> Result<StreamMetadata, StreamError> {
        let buffer = self.attached()?;
        Ok(StreamMetadata {
            timed_out: false,
            blocked: true,
            eof: buffer.is_eof(),
            wrapper_type: "PHP",
            stream_type: "TEMP",
            mode: self.capabilities.mode(),
            unread_bytes: 0,
            seekable: self.capabilities.seekable,
            uri: "php://temp",
        })
    }

    /// A single metadata entry, `Ok(None)` if `key` is unknown.
    pub fn metadata_value(&self, key: &str) -> Result<Option<Value>, StreamError> {
        Ok(self.metadata()?.get(key))
    }
}

impl Default for Stream {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<&str> for Stream {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Stream {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<Bytes> for Stream {
    fn from(value: Bytes) -> Self {
        Self::new(value)
    }
}

/// Renders the whole stream from position 0 without moving the cursor.
///
/// Never fails: an unreadable or detached stream renders as an empty string.
/// Bytes that are not valid UTF-8 are replaced.
impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.buffer {
            Some(buffer) if self.capabilities.readable => f.write_str(&String::from_utf8_lossy(buffer.as_bytes())),
            _ => Ok(()),
        }
    }
}

/// `std::io` view of the stream. Capability and lifecycle failures map to
/// `io::Error`; reaching the end reads 0 bytes as `io::Read` expects.
impl io::Read for Stream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        match Stream::read(self, buf.len()) {
            Ok(bytes) => {
                buf[..bytes.len()].copy_from_slice(&bytes);
                Ok(bytes.len())
            }
            Err(StreamError::NothingRead) => Ok(0),
            Err(e) => Err(e.into()),
        }
    }
}

impl io::Write for Stream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        Ok(Stream::write(self, buf)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.attached()?;
        Ok(())
    }
}

impl io::Seek for Stream {
    fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
        let (offset, whence) = match pos {
            io::SeekFrom::Start(n) => (
                i64::try_from(n).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?,
                Whence::Start,
            ),
            io::SeekFrom::Current(n) => (n, Whence::Current),
            io::SeekFrom::End(n) => (n, Whence::End),
        };
        Stream::seek(self, offset, whence)?;
        Ok(self.tell()?)
    }
}
