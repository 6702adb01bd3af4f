use chrono::{DateTime, Duration, Utc};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

/// Source of "now" for seal dates and time-lock checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now = instant;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

const NO_BLOCK: i64 = i64::MIN;

/// Time as reported by the rollup's block metadata.
///
/// Every advance request carries the timestamp (seconds) of its block.
/// The clock keeps the latest one seen and never moves backwards. Until a
/// block has been observed it reads the wall clock.
#[derive(Debug)]
pub struct BlockClock {
    latest_secs: AtomicI64,
}

impl Default for BlockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockClock {
    pub fn new() -> Self {
        Self {
            latest_secs: AtomicI64::new(NO_BLOCK),
        }
    }

    pub fn observe(&self, block_timestamp_secs: i64) {
        self.latest_secs
            .fetch_max(block_timestamp_secs, Ordering::SeqCst);
    }

    pub fn latest_block_time(&self) -> Option<DateTime<Utc>> {
        match self.latest_secs.load(Ordering::SeqCst) {
            NO_BLOCK => None,
            secs => DateTime::from_timestamp(secs, 0),
        }
    }
}

impl Clock for BlockClock {
    fn now(&self) -> DateTime<Utc> {
        self.latest_block_time()
            .unwrap_or_else(|| SystemClock.now())
    }
}
