//! Shared handle to the [`Stream`] a message carries as its body.

use std::fmt;

use parking_lot::{Mutex, MutexGuard};
use triomphe::Arc;

use crate::stream::Stream;

/// A shared reference to exactly one [`Stream`].
///
/// Cloning a `Body` clones the handle, never the bytes: every message derived
/// from another keeps pointing at the same stream until a new body is set.
/// The stream itself stays mutable through [`Body::lock`], so a write through
/// one message's body is visible through every message sharing it.
#[derive(Debug, Clone)]
pub struct Body {
    stream: Arc<Mutex<Stream>>,
}

impl Body {
    pub fn new(stream: Stream) -> Self {
        Self { stream: Arc::new(Mutex::new(stream)) }
    }

    /// A body over a fresh, empty, readable/writable/seekable stream.
    pub fn empty() -> Self {
        Self::new(Stream::empty())
    }

    /// Locks the stream for reading, writing, seeking or detaching.
    ///
    /// Formatting the body with `Display` also takes this lock, so do not
    /// format a body while holding its guard.
    pub fn lock(&self) -> MutexGuard<'_, Stream> {
        self.stream.lock()
    }

    /// Returns true if both handles point at the same stream.
    #[inline]
    pub fn ptr_eq(&self, other: &Body) -> bool {
        Arc::ptr_eq(&self.stream, &other.stream)
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Stream> for Body {
    fn from(stream: Stream) -> Self {
        Self::new(stream)
    }
}

impl From<&str> for Body {
    fn from(value: &str) -> Self {
        Self::new(Stream::new(value))
    }
}

impl From<String> for Body {
    fn from(value: String) -> Self {
        Self::new(Stream::new(value))
    }
}

/// Delegates to the stream's `Display`, which never fails.
impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.stream.lock(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::Whence;

    #[test]
    fn clones_share_stream() {
        let body = Body::from("shared");
        let other = body.clone();
        assert!(body.ptr_eq(&other));

        {
            let mut stream = other.lock();
            stream.seek(0, Whence::End).unwrap();
            stream.write(" bytes").unwrap();
        }

        assert_eq!(body.to_string(), "shared bytes");
    }

    #[test]
    fn distinct_bodies() {
        let a = Body::from("same");
        let b = Body::from("same");
        assert!(!a.ptr_eq(&b));
        assert_eq!(a.to_string(), b.to_string());
    }

    #[test]
    fn detached_body_renders_empty() {
        let body = Body::from("gone");
        let buffer = body.lock().detach();
        assert!(buffer.is_some());
        assert_eq!(body.to_string(), "");
    }

    #[test]
    fn body_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Body>();
    }
}
