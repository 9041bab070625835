//! Immutable HTTP message model.
//!
//! This module provides the value types exchanged between client, server and
//! middleware layers: a [`Message`] bundling a [`ProtocolVersion`], a
//! case-insensitive [`Headers`] map and a shared [`Body`] stream.
//!
//! # Architecture
//!
//! - **Versions** ([`version`]): the fixed set of known protocol versions
//!   - [`ProtocolVersion`]: `1.0` or `1.1`, convertible to `http::Version`
//!
//! - **Headers** ([`header`]): validated, lower-cased header storage
//!   - [`Headers`]: insertion-ordered multimap
//!   - [`HeaderValues`]: the ordered values of one header
//!
//! - **Body** ([`body`]): shared handle to a [`Stream`](crate::stream::Stream)
//!   - [`Body`]: cloned by reference, never by bytes
//!
//! - **Message** ([`message`]): the immutable value object
//!   - [`Message`]: every `with_*` returns a new message
//!
//! - **Error Handling** ([`error`]):
//!   - [`ValidationError`]: rejected construction or update input
//!   - [`MessageError`]: top-level error over validation and stream errors
//!
//! Untyped input (`serde_json::Value`) is accepted through `TryFrom` and goes
//! through the same validation.
//!
//! # Example
//!
//! ```
//! use micro_message::protocol::{Headers, Message, MessageError};
//! use micro_message::stream::Stream;
//!
//! let headers = Headers::try_from_iter([("Accept", "application/json")])?;
//! let msg = Message::new("1.1", headers, Some(Stream::new("body").into()))?;
//!
//! let tagged = msg.with_added_header("X-Request-Id", "42")?;
//! assert_eq!(tagged.header_line("accept"), "application/json");
//! assert!(!msg.has_header("x-request-id"));
//! assert_eq!(tagged.body().to_string(), "body");
//! # Ok::<(), MessageError>(())
//! ```

pub mod body;
pub mod error;
pub mod header;
pub mod message;
pub mod version;

mod json;

pub use body::Body;
pub use error::MessageError;
pub use error::ValidationError;
pub use header::HeaderValues;
pub use header::Headers;
pub use header::HEADER_LINE_SEPARATOR;
pub use message::Message;
pub use version::ProtocolVersion;
