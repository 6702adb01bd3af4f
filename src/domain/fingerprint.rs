use sha2::{Digest, Sha256};

/// SHA-256 renders as 64 hex characters.
pub const FINGERPRINT_LEN: usize = 64;

/// Compute the fingerprint of a document.
///
/// The digest covers the exact UTF-8 bytes of `text`: whitespace, line
/// endings and Unicode normalization all matter.
pub fn fingerprint(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub fn is_valid_fingerprint(candidate: &str) -> bool {
    candidate.len() == FINGERPRINT_LEN && candidate.chars().all(|c| c.is_ascii_hexdigit())
}

/// Trim and lowercase a pasted identifier. Returns `None` when the result
/// is not a well-formed fingerprint.
pub fn normalize_fingerprint(candidate: &str) -> Option<String> {
    let trimmed = candidate.trim();
    if is_valid_fingerprint(trimmed) {
        Some(trimmed.to_ascii_lowercase())
    } else {
        None
    }
}
