use super::fingerprint::fingerprint;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A document committed to the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedRecord {
    pub fingerprint: String,
    pub content: String,
    pub signer: String,
    pub sealed_at: DateTime<Utc>,
    pub release_at: DateTime<Utc>,
}

const NANOS_PER_MILLI: u32 = 1_000_000;

/// Drop sub-millisecond precision. Records hold timestamps at the
/// precision they are stored with.
pub fn truncate_to_millis(instant: DateTime<Utc>) -> DateTime<Utc> {
    let excess = instant.timestamp_subsec_nanos() % NANOS_PER_MILLI;
    instant - Duration::nanoseconds(i64::from(excess))
}

/// Round up to the next whole millisecond. `None` past the end of the
/// representable range.
pub fn ceil_to_millis(instant: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let truncated = truncate_to_millis(instant);
    if truncated == instant {
        Some(instant)
    } else {
        truncated.checked_add_signed(Duration::milliseconds(1))
    }
}

/// Time-lock state of a record, derived from the clock on every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SealStatus {
    Locked,
    Released,
}

impl SealedRecord {
    pub fn new(
        content: &str,
        signer: &str,
        sealed_at: DateTime<Utc>,
        release_at: DateTime<Utc>,
    ) -> Self {
        Self {
            fingerprint: fingerprint(content),
            content: content.to_string(),
            signer: signer.to_string(),
            sealed_at,
            release_at,
        }
    }

    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        now < self.release_at
    }

    pub fn status(&self, now: DateTime<Utc>) -> SealStatus {
        if self.is_locked(now) {
            SealStatus::Locked
        } else {
            SealStatus::Released
        }
    }

    /// Render the record for display, withholding the content until release.
    pub fn disclose(&self, now: DateTime<Utc>) -> DisclosedRecord {
        let status = self.status(now);
        let content = match status {
            SealStatus::Locked => None,
            SealStatus::Released => Some(self.content.clone()),
        };

        DisclosedRecord {
            fingerprint: self.fingerprint.clone(),
            signer: self.signer.clone(),
            sealed_at: self.sealed_at,
            release_at: self.release_at,
            status,
            content,
        }
    }
}

/// Public view of a record as of a given instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisclosedRecord {
    pub fingerprint: String,
    pub signer: String,
    pub sealed_at: DateTime<Utc>,
    pub release_at: DateTime<Utc>,
    pub status: SealStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}
