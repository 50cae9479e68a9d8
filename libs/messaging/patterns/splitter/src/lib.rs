//! # Splitter
//!
//! Fans a single inbound message into an ordered group of outbound messages.
//! Every message of a group carries `correlationId` (the inbound id),
//! `sequenceNumber` (1-based position) and `sequenceSize` (group size), and
//! the group is dispatched to the output sink strictly in sequence order.
//!
//! ```
//! use message::Message;
//! use message_sink::test_utils::CollectorSink;
//! use splitter::{Producer, Splitter};
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let sink = Arc::new(CollectorSink::<String>::new());
//! let splitter = Splitter::new(
//!     Producer::from_payload(|p: &String| Ok(p.split('.').map(str::to_string).collect())),
//!     sink.clone(),
//! );
//!
//! splitter.handle(&Message::new("foo.bar".to_string())).await.unwrap();
//! assert_eq!(sink.payloads(), vec!["foo", "bar"]);
//! # }
//! ```

pub mod config;
pub mod error;
pub mod output;
pub mod producer;
pub mod splitter;

pub use config::{SequencePolicy, SplitterConfig};
pub use error::{ProductionError, SplitError};
pub use output::{SplitItem, SplitOutput};
pub use producer::{Eligibility, Producer, ProducerCandidates};
pub use splitter::Splitter;
