use std::sync::atomic::{AtomicU64, Ordering};

/// Issues search sequence numbers and recognises the latest one.
///
/// Responses can arrive out of order because every search runs on its own
/// task; anything older than the most recently issued number is stale.
#[derive(Debug, Default)]
pub struct SearchSequencer {
    latest: AtomicU64,
}

impl SearchSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number for the next request; never 0
    pub fn next(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn latest(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, seq: u64) -> bool {
        seq != 0 && seq == self.latest()
    }
}
