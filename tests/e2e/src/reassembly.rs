//! Aggregator-style consumer that rebuilds split groups

use anyhow::{anyhow, Result};
use message::{Message, MessageId};
use message_store::{BoundedMessageStore, StoreStats};
use parking_lot::Mutex;
use tracing::debug;

/// Store key of one group member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub correlation_id: MessageId,
    pub sequence_number: u32,
}

/// Buffers group members until every sequence number of a group has arrived.
///
/// Members live in a bounded store, so when too many groups are in flight the
/// least recently touched members are evicted and their groups never complete.
/// `accept` may be called from several threads; each group is handed out once.
#[derive(Debug)]
pub struct GroupReassembler<T> {
    store: BoundedMessageStore<GroupKey, T>,
    /// Held across the completeness check and the removal of a group
    completion: Mutex<()>,
}

impl<T> GroupReassembler<T> {
    pub fn new(store: BoundedMessageStore<GroupKey, T>) -> Self {
        Self {
            store,
            completion: Mutex::new(()),
        }
    }

    /// Buffer `message`; returns the whole group, in order, once complete
    pub fn accept(&self, message: Message<T>) -> Result<Option<Vec<Message<T>>>> {
        let headers = message.headers();
        let (correlation_id, sequence_number, size) = match (
            headers.correlation_id(),
            headers.sequence_number(),
            headers.sequence_size(),
        ) {
            (Some(c), Some(n), Some(s)) => (c, n, s),
            _ => {
                return Err(anyhow!(
                    "Message {} carries no complete sequence headers",
                    message.id()
                ))
            }
        };

        let key = |sequence_number| GroupKey {
            correlation_id,
            sequence_number,
        };
        let _completion = self.completion.lock();
        self.store.put(key(sequence_number), message);

        if !(1..=size).all(|n| self.store.contains_key(&key(n))) {
            return Ok(None);
        }

        let group: Vec<Message<T>> = (1..=size).filter_map(|n| self.store.remove(&key(n))).collect();
        debug!("Reassembled group {} of {} messages", correlation_id, group.len());
        Ok(Some(group))
    }

    /// Members waiting for the rest of their group
    pub fn pending(&self) -> usize {
        self.store.size()
    }

    pub fn stats(&self) -> StoreStats {
        self.store.stats()
    }
}
