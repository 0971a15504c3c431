use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_CLIENT_ID: AtomicU64 = AtomicU64::new(1);

/// Per-client connection state. Commands themselves are stateless, so this
/// carries only the identity used in log lines.
#[derive(Debug)]
pub struct ClientState {
    pub id: u64,
}

impl ClientState {
    pub fn new() -> Self {
        ClientState {
            id: NEXT_CLIENT_ID.fetch_add(1, Ordering::Relaxed),
        }
    }
}

impl Default for ClientState {
    fn default() -> Self {
        Self::new()
    }
}
