use crate::domain::asset::Timestamp;
use crate::domain::ports::TimeSource;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// A clock that only moves when told to. Clones share the same time.
///
/// Requests to move backwards are ignored.
#[derive(Debug, Default, Clone)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start)),
        }
    }

    pub fn advance(&self, seconds: u64) -> Timestamp {
        let previous = self.now.fetch_add(seconds, Ordering::SeqCst);
        previous + seconds
    }

    pub fn advance_to(&self, timestamp: Timestamp) -> Timestamp {
        let previous = self.now.fetch_max(timestamp, Ordering::SeqCst);
        previous.max(timestamp)
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.load(Ordering::SeqCst)
    }
}
