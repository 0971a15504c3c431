use tokio::time::Instant;

/// An entry in the keyspace: a value plus its optional absolute expiry.
///
/// `None` means the key never expires; the absence of a deadline is modeled
/// explicitly rather than through a sentinel timestamp.
#[derive(Debug, Clone)]
pub struct Entry {
    pub value: Vec<u8>,
    pub expires_at: Option<Instant>,
}

impl Entry {
    pub fn new(value: Vec<u8>) -> Self {
        Entry {
            value,
            expires_at: None,
        }
    }

    pub fn with_expiry(value: Vec<u8>, expires_at: Instant) -> Self {
        Entry {
            value,
            expires_at: Some(expires_at),
        }
    }

    /// Check if this entry has expired as of `now`.
    ///
    /// The comparison is strict: an entry is still live at its exact expiry
    /// instant and dead one instant after it.
    pub fn is_expired(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(at) => now > at,
            None => false,
        }
    }
}
