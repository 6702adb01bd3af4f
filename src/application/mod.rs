mod clock;
mod ledger;
mod query;
mod types;
mod verify;

pub use clock::{BlockClock, Clock, ManualClock, SystemClock};
pub use ledger::{InputError, LedgerError, SealLedger};
pub use types::{
    parse_release_date, InputAction, InspectQuery, PayloadError, ReportResponse, SealNotice,
    SealRequest, VerifyRequest, MAX_RECENT_LIMIT,
};
pub use verify::VerificationResult;
