use super::ledger::LedgerError;
use super::verify::VerificationResult;
use crate::domain::{DisclosedRecord, SealReceipt};
use base64::Engine;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound on the size of a `recent` feed answer.
pub const MAX_RECENT_LIMIT: usize = 100;

#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("Invalid base64 content: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("Content is not valid UTF-8 text")]
    NotUtf8,

    #[error("Invalid release date {0:?}: expected RFC 3339 timestamp or YYYY-MM-DD")]
    InvalidReleaseDate(String),
}

/// Request to seal a document
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SealRequest {
    /// Base64 of the exact UTF-8 document text
    pub content: String,
    /// Display name; the sender address is used when absent
    #[serde(default)]
    pub signer: Option<String>,
    /// RFC 3339 timestamp, or a bare date meaning midnight UTC
    pub release_date: String,
}

impl SealRequest {
    pub fn decode_content(&self) -> Result<String, PayloadError> {
        decode_text(&self.content)
    }

    pub fn release_at(&self) -> Result<DateTime<Utc>, PayloadError> {
        parse_release_date(&self.release_date)
    }
}

/// Request to check a document against a fingerprint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VerifyRequest {
    /// SHA-256 fingerprint (64 hex characters)
    pub fingerprint: String,
    /// Base64 of the candidate document text
    pub content: String,
}

impl VerifyRequest {
    pub fn decode_content(&self) -> Result<String, PayloadError> {
        decode_text(&self.content)
    }
}

/// State-changing actions, sent as advance requests
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum InputAction {
    Seal { data: SealRequest },
    Verify { data: VerifyRequest },
}

/// Read-only queries, sent as inspect requests
#[derive(Debug, Deserialize)]
#[serde(tag = "query", rename_all = "lowercase")]
pub enum InspectQuery {
    Verify(VerifyRequest),
    Record {
        fingerprint: String,
    },
    Signer {
        signer: String,
    },
    Recent {
        #[serde(default)]
        limit: Option<usize>,
    },
}

fn decode_text(encoded: &str) -> Result<String, PayloadError> {
    let bytes = base64::engine::general_purpose::STANDARD.decode(encoded)?;
    String::from_utf8(bytes).map_err(|_| PayloadError::NotUtf8)
}

/// Parse a release date. Bare dates unlock at the start of that day, UTC.
pub fn parse_release_date(raw: &str) -> Result<DateTime<Utc>, PayloadError> {
    let raw = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| PayloadError::InvalidReleaseDate(raw.to_string()))
}

/// Sent as a notice (verifiable on-chain)
#[derive(Debug, Serialize)]
pub struct SealNotice {
    #[serde(rename = "type")]
    pub response_type: String,
    pub receipt: SealReceipt,
}

impl SealNotice {
    pub fn new(receipt: SealReceipt) -> Self {
        Self {
            response_type: "seal_receipt".to_string(),
            receipt,
        }
    }
}

/// Sent as a report (query answers and errors)
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReportResponse {
    Verification {
        fingerprint: String,
        result: VerificationResult,
    },
    Record {
        exists: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        record: Option<DisclosedRecord>,
    },
    Records {
        count: usize,
        records: Vec<DisclosedRecord>,
    },
    Error {
        kind: String,
        error: String,
    },
}

impl ReportResponse {
    pub fn record(record: Option<DisclosedRecord>) -> Self {
        Self::Record {
            exists: record.is_some(),
            record,
        }
    }

    pub fn records(records: Vec<DisclosedRecord>) -> Self {
        Self::Records {
            count: records.len(),
            records,
        }
    }

    pub fn error(kind: &str, message: impl ToString) -> Self {
        Self::Error {
            kind: kind.to_string(),
            error: message.to_string(),
        }
    }

    pub fn invalid_input(message: impl ToString) -> Self {
        Self::error("invalid_input", message)
    }

    pub fn ledger_error(err: &LedgerError) -> Self {
        Self::error(err.kind(), err)
    }
}
