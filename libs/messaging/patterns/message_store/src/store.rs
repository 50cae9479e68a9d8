//! Bounded message store
//!
//! Every operation runs under a single mutex, so the eviction decision and
//! the insert of a `put` are one step for other callers: nobody observes the
//! store above capacity or the key missing halfway through an insert.

use crate::{MessageStore, StoreConfig, StoreError};
use lru::LruCache;
use message::Message;
use parking_lot::Mutex;
use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters describing store traffic
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub puts: u64,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

#[derive(Debug, Default)]
struct Counters {
    puts: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

/// In-memory key → message map with a fixed capacity and LRU eviction
pub struct BoundedMessageStore<K, T> {
    entries: Mutex<LruCache<K, Message<T>>>,
    capacity: usize,
    counters: Counters,
}

impl<K: Hash + Eq, T> BoundedMessageStore<K, T> {
    pub fn new(capacity: usize) -> Result<Self, StoreError> {
        let bound = NonZeroUsize::new(capacity)
            .ok_or_else(|| StoreError::invalid_argument("'capacity' must be greater than 0"))?;
        Ok(Self {
            entries: Mutex::new(LruCache::new(bound)),
            capacity,
            counters: Counters::default(),
        })
    }

    pub fn from_config(config: &StoreConfig) -> Result<Self, StoreError> {
        config.validate()?;
        Self::new(config.capacity)
    }

    /// Store a message, returning the one previously held under `key`.
    /// A new key on a full store evicts the least recently used entry first.
    pub fn put(&self, key: K, message: Message<T>) -> Option<Message<T>> {
        self.counters.puts.fetch_add(1, Ordering::Relaxed);
        let mut entries = self.entries.lock();
        if entries.contains(&key) {
            // updating in place never evicts
            return entries.put(key, message);
        }
        if let Some((_, evicted)) = entries.push(key, message) {
            self.counters.evictions.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(
                "Store at capacity {}, evicted least recently used message {}",
                self.capacity,
                evicted.id()
            );
        }
        None
    }

    /// Fetch a message and mark it most recently used
    pub fn get<Q>(&self, key: &Q) -> Option<Message<T>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let found = self.entries.lock().get(key).cloned();
        let counter = if found.is_some() {
            &self.counters.hits
        } else {
            &self.counters.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    pub fn remove<Q>(&self, key: &Q) -> Option<Message<T>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.lock().pop(key)
    }

    /// Membership test that does not count as an access
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.lock().contains(key)
    }

    /// Snapshot of all stored messages, most recently used first.
    /// Callers should not rely on the order.
    pub fn list(&self) -> Vec<Message<T>> {
        self.entries
            .lock()
            .iter()
            .map(|(_, message)| message.clone())
            .collect()
    }

    pub fn size(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            puts: self.counters.puts.load(Ordering::Relaxed),
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            evictions: self.counters.evictions.load(Ordering::Relaxed),
        }
    }
}

impl<K, T> fmt::Debug for BoundedMessageStore<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedMessageStore")
            .field("capacity", &self.capacity)
            .field("counters", &self.counters)
            .finish()
    }
}

impl<K, T> MessageStore<K, T> for BoundedMessageStore<K, T>
where
    K: Hash + Eq + Send,
    T: Send + Sync,
{
    fn put(&self, key: K, message: Message<T>) -> Option<Message<T>> {
        BoundedMessageStore::put(self, key, message)
    }

    fn get(&self, key: &K) -> Option<Message<T>> {
        BoundedMessageStore::get(self, key)
    }

    fn remove(&self, key: &K) -> Option<Message<T>> {
        BoundedMessageStore::remove(self, key)
    }

    fn list(&self) -> Vec<Message<T>> {
        BoundedMessageStore::list(self)
    }

    fn size(&self) -> usize {
        BoundedMessageStore::size(self)
    }
}
