use serde::Serialize;

/// The operations a [`Stream`](crate::stream::Stream) permits.
///
/// Flags are fixed when the stream is built and are not derived from the
/// backing storage, so a stream can expose a restricted view (for example
/// read-only) over storage that could do more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Capabilities {
    pub readable: bool,
    pub writable: bool,
    pub seekable: bool,
}

impl Capabilities {
    /// Readable, writable and seekable.
    pub const fn all() -> Self {
        Self { readable: true, writable: true, seekable: true }
    }

    /// Readable and seekable, never writable.
    pub const fn read_only() -> Self {
        Self { readable: true, writable: false, seekable: true }
    }

    /// Writable and seekable, never readable.
    pub const fn write_only() -> Self {
        Self { readable: false, writable: true, seekable: true }
    }

    /// Permits no operation.
    pub const fn none() -> Self {
        Self { readable: false, writable: false, seekable: false }
    }

    /// The `fopen` style mode string reported in stream metadata.
    pub(crate) fn mode(self) -> &'static str {
        match (self.readable, self.writable) {
            (true, true) => "w+b",
            (true, false) => "rb",
            (false, true) => "wb",
            (false, false) => "",
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets() {
        assert_eq!(Capabilities::default(), Capabilities::all());
        assert!(!Capabilities::read_only().writable);
        assert!(!Capabilities::write_only().readable);
        assert!(Capabilities::write_only().seekable);
    }

    #[test]
    fn mode_follows_flags() {
        assert_eq!(Capabilities::all().mode(), "w+b");
        assert_eq!(Capabilities::read_only().mode(), "rb");
        assert_eq!(Capabilities::write_only().mode(), "wb");
        assert_eq!(Capabilities::none().mode(), "");
    }
}
