use super::record::SealedRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Proof of sealing handed back to the sealing party. Carries no content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SealReceipt {
    pub fingerprint: String,
    pub signer: String,
    pub sealed_at: DateTime<Utc>,
    pub release_at: DateTime<Utc>,
    pub proof: String,
}

impl SealReceipt {
    pub fn new(record: &SealedRecord) -> Self {
        let proof = format!(
            "sha256:{}@{}",
            record.fingerprint,
            record.sealed_at.timestamp()
        );

        Self {
            fingerprint: record.fingerprint.clone(),
            signer: record.signer.clone(),
            sealed_at: record.sealed_at,
            release_at: record.release_at,
            proof,
        }
    }
}
