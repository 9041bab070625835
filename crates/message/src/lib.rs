//! Immutable HTTP message values backed by a seekable byte stream
//!
//! This crate provides the message model that HTTP client, server and middleware
//! layers pass between each other: a protocol version, a case-insensitive header
//! map and a body stream, bundled in a value that never changes after it is
//! built. "Mutation" happens by deriving a new message.
//!
//! # Features
//!
//! - Immutable [`protocol::Message`] with copy-on-write `with_*` updates
//! - Case-insensitive, validated header names and values
//! - Known protocol version set (`1.0`, `1.1`), convertible to `http::Version`
//! - Buffered, seekable [`stream::Stream`] with capability flags and a
//!   detach/close lifecycle
//! - Untyped construction from `serde_json::Value` with the same validation
//! - Structured logging through `tracing`
//!
//! # Example
//!
//! ```
//! use micro_message::protocol::{Body, Headers, Message, MessageError};
//! use micro_message::stream::{Stream, Whence};
//!
//! let headers = Headers::try_from_iter([("Accept", "application/json")])?;
//! let request = Message::new("1.1", headers, Some(Body::from("hello")))?;
//!
//! // every update returns a new message
//! let derived = request.with_protocol_version("1.0")?.without_header("accept");
//! assert_eq!(request.protocol_version().as_str(), "1.1");
//! assert!(request.has_header("ACCEPT"));
//! assert!(derived.headers().is_empty());
//!
//! // the body stream is shared, and is the one thing that can change
//! {
//!     let mut body = derived.body().lock();
//!     body.seek(0, Whence::End)?;
//!     body.write("!")?;
//! }
//! assert_eq!(request.body().to_string(), "hello!");
//!
//! let replaced = request.with_body(Stream::new("fresh"));
//! assert_eq!(replaced.body().to_string(), "fresh");
//! # Ok::<(), MessageError>(())
//! ```
//!
//! # Architecture
//!
//! - [`stream`]: the byte stream and its in-memory backing buffer
//! - [`protocol`]: versions, headers, body handle and the message itself
//!
//! # Error Handling
//!
//! - [`protocol::ValidationError`]: bad versions, header names or values, or body input
//! - [`stream::StreamError`]: operations on a detached stream, on a stream lacking
//!   the capability, or storage operations that fail
//! - [`protocol::MessageError`]: top-level error wrapping both
//!
//! # Concurrency
//!
//! A [`stream::Stream`] has no internal locking. A [`protocol::Body`] wraps its
//! stream in a mutex, so messages are `Send + Sync` and can be read from several
//! threads; writes to a shared body are still seen by every message holding it.

pub mod protocol;
pub mod stream;

mod utils;
pub(crate) use utils::ensure;
