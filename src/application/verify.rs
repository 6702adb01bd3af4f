use super::ledger::{InputError, LedgerError, SealLedger};
use crate::domain::{fingerprint, normalize_fingerprint};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Outcome of checking a candidate document against a sealed fingerprint.
///
/// `Locked` is returned before any comparison is made, so it says nothing
/// about whether the candidate matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum VerificationResult {
    Verified {
        signer: String,
        sealed_at: DateTime<Utc>,
    },
    Mismatch,
    Locked {
        release_at: DateTime<Utc>,
    },
    NotFound,
}

impl VerificationResult {
    pub fn label(&self) -> &'static str {
        match self {
            VerificationResult::Verified { .. } => "verified",
            VerificationResult::Mismatch => "mismatch",
            VerificationResult::Locked { .. } => "locked",
            VerificationResult::NotFound => "not_found",
        }
    }
}

impl SealLedger {
    pub fn verify(
        &self,
        claimed_fingerprint: &str,
        candidate: &str,
    ) -> Result<VerificationResult, LedgerError> {
        let now = self.now();

        if claimed_fingerprint.trim().is_empty() {
            return Err(InputError::EmptyFingerprint.into());
        }
        if candidate.is_empty() {
            return Err(InputError::EmptyCandidate.into());
        }
        let claimed =
            normalize_fingerprint(claimed_fingerprint).ok_or(InputError::MalformedFingerprint)?;

        let record = match self.store().find_by_fingerprint(&claimed)? {
            Some(record) => record,
            None => {
                debug!(fingerprint = %claimed, "verify: unknown fingerprint");
                return Ok(VerificationResult::NotFound);
            }
        };

        if record.is_locked(now) {
            debug!(fingerprint = %claimed, release_at = %record.release_at, "verify: locked");
            return Ok(VerificationResult::Locked {
                release_at: record.release_at,
            });
        }

        let result = if fingerprint(candidate) == record.fingerprint {
            VerificationResult::Verified {
                signer: record.signer,
                sealed_at: record.sealed_at,
            }
        } else {
            VerificationResult::Mismatch
        };

        debug!(fingerprint = %claimed, outcome = result.label(), "verify: compared");
        Ok(result)
    }
}
