//! End-to-End Test Framework
//!
//! Wires the pipeline together the way a deployment would: wire messages are
//! converted, split, queued, and reassembled from a bounded message store.

pub mod fixtures;
pub mod pipeline;
pub mod reassembly;

pub use pipeline::{Pipeline, DELIMITER_HEADER, QUEUE_SEND_TIMEOUT};
pub use reassembly::{GroupKey, GroupReassembler};
