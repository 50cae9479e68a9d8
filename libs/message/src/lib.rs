//! # Message data model
//!
//! Immutable envelopes shared by every endpoint in the pipeline: splitters,
//! stores, sinks and wire converters.
//!
//! - [`Message`]: payload plus header set, identified by a unique [`MessageId`]
//! - [`MessageHeaders`]: ordered, immutable key/value metadata with reserved keys
//!   (`id`, `correlationId`, `sequenceNumber`, `sequenceSize`)
//! - [`MessageBuilder`]: copy-and-overlay construction
//! - [`Value`]: dynamically typed header value with checked extraction
//!
//! ```
//! use message::{MessageBuilder, MessageId};
//!
//! let trigger = MessageId::new();
//! let msg = MessageBuilder::with_payload("foo".to_string())
//!     .correlation_id(trigger)
//!     .sequence_number(1)
//!     .sequence_size(2)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(msg.headers().correlation_id(), Some(trigger));
//! assert_eq!(msg.headers().sequence_number(), Some(1));
//! ```

pub mod builder;
pub mod error;
pub mod headers;
pub mod id;
pub mod message;
pub mod value;

pub use builder::MessageBuilder;
pub use error::MessageError;
pub use headers::{keys, MessageHeaders};
pub use id::MessageId;
pub use message::Message;
pub use value::{FromValue, Value};
