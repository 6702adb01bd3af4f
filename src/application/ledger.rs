use super::clock::Clock;
use crate::domain::{ceil_to_millis, truncate_to_millis, SealedRecord};
use crate::infrastructure::database::{Insertion, SealStore, StorageError};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// The precondition a caller violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Content cannot be empty")]
    EmptyContent,

    #[error("Signer cannot be empty")]
    EmptySigner,

    #[error("Release date {release_at} must be after {now}")]
    ReleaseNotInFuture {
        release_at: DateTime<Utc>,
        now: DateTime<Utc>,
    },

    #[error("Release date is out of range")]
    ReleaseOutOfRange,

    #[error("Fingerprint cannot be empty")]
    EmptyFingerprint,

    #[error("Invalid fingerprint format: must be 64 hexadecimal characters")]
    MalformedFingerprint,

    #[error("Candidate content cannot be empty")]
    EmptyCandidate,
}

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InputError),

    #[error("Document already sealed: {0}")]
    AlreadySealed(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl LedgerError {
    /// Stable machine-readable tag for callers that serialize errors.
    pub fn kind(&self) -> &'static str {
        match self {
            LedgerError::InvalidInput(_) => "invalid_input",
            LedgerError::AlreadySealed(_) => "already_sealed",
            LedgerError::Storage(_) => "storage",
        }
    }
}

/// Content-addressed record store with a time-lock gate.
///
/// Owns its store and clock; nothing here is global, so several ledgers can
/// live in one process. Every operation reads the clock once.
pub struct SealLedger {
    store: Box<dyn SealStore>,
    clock: Arc<dyn Clock>,
}

impl SealLedger {
    pub fn new(store: Box<dyn SealStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub(super) fn store(&self) -> &dyn SealStore {
        self.store.as_ref()
    }

    pub(super) fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Seal `content` and return its fingerprint.
    pub fn seal(
        &self,
        content: &str,
        signer: &str,
        release_at: DateTime<Utc>,
    ) -> Result<String, LedgerError> {
        self.seal_record(content, signer, release_at)
            .map(|record| record.fingerprint)
    }

    /// Seal `content` and return the stored record.
    ///
    /// The fingerprint covers `content` exactly as given; trimming is only
    /// used to reject blank documents. Re-sealing an existing fingerprint
    /// fails with `AlreadySealed` and leaves the original untouched.
    ///
    /// Timestamps are stored in milliseconds: the seal date is truncated
    /// and the release date rounded up before validation, so the returned
    /// record is exactly what later reads see and release never lands at
    /// or before the seal date.
    pub fn seal_record(
        &self,
        content: &str,
        signer: &str,
        release_at: DateTime<Utc>,
    ) -> Result<SealedRecord, LedgerError> {
        let now = truncate_to_millis(self.now());

        if content.trim().is_empty() {
            return Err(InputError::EmptyContent.into());
        }

        let signer = signer.trim();
        if signer.is_empty() {
            return Err(InputError::EmptySigner.into());
        }

        let release_at = ceil_to_millis(release_at).ok_or(InputError::ReleaseOutOfRange)?;
        if release_at <= now {
            return Err(InputError::ReleaseNotInFuture { release_at, now }.into());
        }

        let record = SealedRecord::new(content, signer, now, release_at);

        match self.store.insert(&record)? {
            Insertion::Inserted => {
                info!(
                    fingerprint = %record.fingerprint,
                    signer = %record.signer,
                    release_at = %record.release_at,
                    "document sealed"
                );
                Ok(record)
            }
            Insertion::Duplicate => {
                warn!(fingerprint = %record.fingerprint, "re-seal rejected");
                Err(LedgerError::AlreadySealed(record.fingerprint))
            }
        }
    }

    pub fn count(&self) -> Result<usize, LedgerError> {
        Ok(self.store.count()?)
    }
}
