pub mod entry;

use entry::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::{Duration, Instant};

/// The in-memory keyspace.
///
/// The store owns every entry; command handlers touch it only through these
/// methods, each of which is one critical section under the shared lock.
/// Expired entries are reaped lazily by the read paths and in batches by
/// [`Store::active_expire`]. Each method reads the clock at most once, so a
/// single operation sees one consistent notion of "now".
#[derive(Debug, Default)]
pub struct Store {
    data: HashMap<String, Entry>,
}

impl Store {
    pub fn new() -> Self {
        Store {
            data: HashMap::new(),
        }
    }

    /// Set a key, unconditionally replacing any previous entry along with its
    /// expiry. A missing or zero `ttl` means the key never expires.
    pub fn set(&mut self, key: String, value: Vec<u8>, ttl: Option<Duration>) {
        let entry = match ttl {
            Some(d) if !d.is_zero() => Entry::with_expiry(value, Instant::now() + d),
            _ => Entry::new(value),
        };
        self.data.insert(key, entry);
    }

    /// Get a value, lazily removing the entry if it has expired.
    pub fn get(&mut self, key: &str) -> Option<Vec<u8>> {
        let now = Instant::now();
        match self.data.get(key) {
            Some(entry) if entry.is_expired(now) => {
                self.data.remove(key);
                None
            }
            Some(entry) => Some(entry.value.clone()),
            None => None,
        }
    }

    /// Delete a key. Returns true if a live entry was removed; removing an
    /// entry that had already expired counts as deleting nothing.
    pub fn del(&mut self, key: &str) -> bool {
        let now = Instant::now();
        match self.data.remove(key) {
            Some(entry) => !entry.is_expired(now),
            None => false,
        }
    }

    /// Check if a key holds a live entry, lazily removing it if expired.
    pub fn exists(&mut self, key: &str) -> bool {
        let now = Instant::now();
        match self.data.get(key) {
            Some(entry) if entry.is_expired(now) => {
                self.data.remove(key);
                false
            }
            Some(_) => true,
            None => false,
        }
    }

    /// Number of entries, including expired ones not yet reaped.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Remove up to `sample_size` expired entries, returning how many were
    /// removed. Lazy expiry on the read paths is what guarantees correctness;
    /// this sweep only bounds how long dead entries linger.
    pub fn active_expire(&mut self, sample_size: usize) -> usize {
        let now = Instant::now();
        let expired: Vec<String> = self
            .data
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .take(sample_size)
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired.len();
        for key in expired {
            self.data.remove(&key);
        }
        count
    }
}

pub type SharedStore = Arc<RwLock<Store>>;
