//! Concrete MessageSink implementations
//!
//! - **QueueSink**: bounded in-process queue with backpressure
//! - **DirectSink**: synchronous hand-off to a handler

pub mod direct;
pub mod queue;

pub use direct::DirectSink;
pub use queue::{QueueReceiver, QueueSink};
