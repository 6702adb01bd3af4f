mod fingerprint;
mod receipt;
mod record;

pub use fingerprint::{fingerprint, is_valid_fingerprint, normalize_fingerprint, FINGERPRINT_LEN};
pub use receipt::SealReceipt;
pub use record::{ceil_to_millis, truncate_to_millis, DisclosedRecord, SealStatus, SealedRecord};
