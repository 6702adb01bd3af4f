pub mod application;
pub mod config;
pub mod domain;
pub mod handlers;
pub mod infrastructure;

// Re-export commonly used types
pub use application::{Clock, InputError, LedgerError, SealLedger, VerificationResult};
pub use domain::{fingerprint, DisclosedRecord, SealStatus, SealedRecord};
pub use infrastructure::database::{SealStore, SqliteStore, StorageError};
