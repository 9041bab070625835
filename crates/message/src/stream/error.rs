use std::io;

use thiserror::Error;

use crate::stream::Whence;

/// Errors raised by [`Stream`](crate::stream::Stream) operations.
///
/// Every variant is surfaced to the caller as is; an in-memory stream has
/// nothing worth retrying.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StreamError {
    #[error("stream is detached and unusable")]
    Detached,

    #[error("stream is not readable")]
    NotReadable,

    #[error("stream is not writable")]
    NotWritable,

    #[error("stream is not seekable")]
    NotSeekable,

    /// The read produced no bytes. This is reported for a read at
    /// end-of-stream and for a zero-length read as well.
    #[error("unable to read from stream, no bytes available")]
    NothingRead,

    #[error("stream cannot be written to, no bytes written")]
    NothingWritten,

    #[error("seek to offset {offset} from {whence} failed")]
    SeekFailed { offset: i64, whence: Whence },
}

impl StreamError {
    pub fn seek_failed(offset: i64, whence: Whence) -> Self {
        Self::SeekFailed { offset, whence }
    }

    /// Returns true if the stream was detached or closed before the operation.
    #[inline]
    pub fn is_detached(&self) -> bool {
        matches!(self, StreamError::Detached)
    }
}

impl From<StreamError> for io::Error {
    fn from(e: StreamError) -> Self {
        let kind = match e {
            StreamError::Detached => io::ErrorKind::NotConnected,
            StreamError::NotReadable | StreamError::NotWritable | StreamError::NotSeekable => {
                io::ErrorKind::Unsupported
            }
            StreamError::NothingRead => io::ErrorKind::UnexpectedEof,
            StreamError::NothingWritten => io::ErrorKind::WriteZero,
            StreamError::SeekFailed { .. } => io::ErrorKind::InvalidInput,
        };
        io::Error::new(kind, e)
    }
}
