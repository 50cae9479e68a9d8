//! # Message store
//!
//! A keyed, in-memory holder of messages with a fixed upper bound. When a new
//! key arrives at a full store the least recently used entry is evicted, where
//! both `put` and `get` count as a use.
//!
//! ```
//! use message::Message;
//! use message_store::BoundedMessageStore;
//!
//! let store = BoundedMessageStore::new(2).unwrap();
//! store.put("a", Message::new("m1"));
//! store.put("b", Message::new("m2"));
//! store.get("a");
//! store.put("c", Message::new("m3"));
//!
//! assert_eq!(store.size(), 2);
//! assert!(store.get("b").is_none());
//! ```

pub mod config;
pub mod error;
pub mod store;

use message::Message;

pub use config::{StoreConfig, DEFAULT_CAPACITY};
pub use error::StoreError;
pub use store::{BoundedMessageStore, StoreStats};

/// Keyed message storage shared across threads
pub trait MessageStore<K, T>: Send + Sync {
    /// Store `message` under `key`, returning the message it replaced
    fn put(&self, key: K, message: Message<T>) -> Option<Message<T>>;

    fn get(&self, key: &K) -> Option<Message<T>>;

    fn remove(&self, key: &K) -> Option<Message<T>>;

    /// Independent snapshot of the stored messages in unspecified order
    fn list(&self) -> Vec<Message<T>>;

    fn size(&self) -> usize;
}
