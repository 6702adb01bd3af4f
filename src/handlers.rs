//! Rollup request handlers: advance requests seal and verify, inspect
//! requests answer read-only queries. Both are driven by the loop in
//! `main.rs`.

use crate::application::{
    BlockClock, InputAction, InspectQuery, ReportResponse, SealLedger, SealNotice,
    VerifyRequest, MAX_RECENT_LIMIT,
};
use crate::config::{Config, DatabaseLocation};
use crate::domain::SealReceipt;
use crate::infrastructure::cartesi::{decode_payload, send_notice, send_report, RollupClient};
use crate::infrastructure::database::{SealStore, SqliteStore, StorageError};
use json::JsonValue;
use std::error::Error;
use std::sync::Arc;
use tracing::{info, warn};

const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

pub const ACCEPT: &str = "accept";
pub const REJECT: &str = "reject";

/// Everything a request handler needs: the ledger and the block clock it
/// reads time from.
pub struct Dapp {
    pub ledger: SealLedger,
    pub clock: Arc<BlockClock>,
    pub recent_limit: usize,
}

impl Dapp {
    pub fn new(store: Box<dyn SealStore>, recent_limit: usize) -> Self {
        let clock = Arc::new(BlockClock::new());
        let ledger = SealLedger::new(store, clock.clone());
        Self {
            ledger,
            clock,
            recent_limit,
        }
    }

    /// Open the configured database. A failure here is fatal: falling back
    /// to an empty in-memory ledger would silently drop every seal.
    pub fn open(config: &Config) -> Result<Self, StorageError> {
        let store = match &config.database {
            DatabaseLocation::File(path) => SqliteStore::open(path)?,
            DatabaseLocation::InMemory => SqliteStore::new_in_memory()?,
        };
        Ok(Self::new(Box::new(store), config.recent_limit))
    }
}

async fn report(
    client: &RollupClient,
    server_addr: &str,
    response: &ReportResponse,
) -> Result<(), Box<dyn Error>> {
    let payload = serde_json::to_string(response)?;
    send_report(client, server_addr, &payload).await
}

/// Answer a verify request with a report. Returns `true` when the report
/// carries a verification outcome, `false` when it carries an error.
async fn report_verification(
    client: &RollupClient,
    server_addr: &str,
    dapp: &Dapp,
    data: VerifyRequest,
) -> Result<bool, Box<dyn Error>> {
    let candidate = match data.decode_content() {
        Ok(candidate) => candidate,
        Err(e) => {
            warn!(error = %e, "verify: bad content");
            report(client, server_addr, &ReportResponse::invalid_input(e)).await?;
            return Ok(false);
        }
    };

    match dapp.ledger.verify(&data.fingerprint, &candidate) {
        Ok(result) => {
            info!(fingerprint = %data.fingerprint, outcome = result.label(), "verification");
            let response = ReportResponse::Verification {
                fingerprint: data.fingerprint,
                result,
            };
            report(client, server_addr, &response).await?;
            Ok(true)
        }
        Err(e) => {
            warn!(error = %e, kind = e.kind(), "verification failed");
            report(client, server_addr, &ReportResponse::ledger_error(&e)).await?;
            Ok(false)
        }
    }
}

pub async fn handle_advance(
    client: &RollupClient,
    server_addr: &str,
    dapp: &Dapp,
    request: JsonValue,
) -> Result<&'static str, Box<dyn Error>> {
    let metadata = &request["data"]["metadata"];
    if let Some(timestamp) = metadata["timestamp"].as_i64() {
        dapp.clock.observe(timestamp);
    }
    let sender = metadata["msg_sender"].as_str().unwrap_or(ZERO_ADDRESS);

    let payload = match request["data"]["payload"].as_str().map(decode_payload) {
        Some(Ok(payload)) => payload,
        Some(Err(e)) => {
            warn!(error = %e, "advance: undecodable payload");
            report(client, server_addr, &ReportResponse::invalid_input(e)).await?;
            return Ok(REJECT);
        }
        None => {
            report(client, server_addr, &ReportResponse::invalid_input("Missing payload")).await?;
            return Ok(REJECT);
        }
    };

    let input: InputAction = match serde_json::from_str(&payload) {
        Ok(action) => action,
        Err(e) => {
            warn!(error = %e, "advance: unparsable action");
            let message = format!("Invalid input format: {}", e);
            report(client, server_addr, &ReportResponse::invalid_input(message)).await?;
            return Ok(REJECT);
        }
    };

    match input {
        InputAction::Seal { data } => {
            let decoded = data.decode_content().and_then(|content| {
                data.release_at().map(|release_at| (content, release_at))
            });
            let (content, release_at) = match decoded {
                Ok(parts) => parts,
                Err(e) => {
                    warn!(error = %e, "seal: bad request");
                    report(client, server_addr, &ReportResponse::invalid_input(e)).await?;
                    return Ok(REJECT);
                }
            };
            let signer = data.signer.as_deref().unwrap_or(sender);

            match dapp.ledger.seal_record(&content, signer, release_at) {
                Ok(record) => {
                    let notice = SealNotice::new(SealReceipt::new(&record));
                    send_notice(client, server_addr, &serde_json::to_string(&notice)?).await?;
                    Ok(ACCEPT)
                }
                Err(e) => {
                    warn!(error = %e, kind = e.kind(), "seal failed");
                    report(client, server_addr, &ReportResponse::ledger_error(&e)).await?;
                    Ok(REJECT)
                }
            }
        }
        InputAction::Verify { data } => {
            if report_verification(client, server_addr, dapp, data).await? {
                Ok(ACCEPT)
            } else {
                Ok(REJECT)
            }
        }
    }
}

/// Inspect requests never change state and always accept; failures are
/// carried in the report.
pub async fn handle_inspect(
    client: &RollupClient,
    server_addr: &str,
    dapp: &Dapp,
    request: JsonValue,
) -> Result<&'static str, Box<dyn Error>> {
    let payload = match request["data"]["payload"].as_str().map(decode_payload) {
        Some(Ok(payload)) => payload,
        Some(Err(e)) => {
            report(client, server_addr, &ReportResponse::invalid_input(e)).await?;
            return Ok(ACCEPT);
        }
        None => {
            report(client, server_addr, &ReportResponse::invalid_input("Missing payload")).await?;
            return Ok(ACCEPT);
        }
    };

    let query: InspectQuery = match serde_json::from_str(&payload) {
        Ok(query) => query,
        Err(e) => {
            let message = format!("Invalid request format: {}", e);
            report(client, server_addr, &ReportResponse::invalid_input(message)).await?;
            return Ok(ACCEPT);
        }
    };

    let answer = match query {
        InspectQuery::Verify(data) => {
            report_verification(client, server_addr, dapp, data).await?;
            return Ok(ACCEPT);
        }
        InspectQuery::Record { fingerprint } => {
            dapp.ledger.view_record(&fingerprint).map(ReportResponse::record)
        }
        InspectQuery::Signer { signer } => {
            dapp.ledger.view_signer(&signer).map(ReportResponse::records)
        }
        InspectQuery::Recent { limit } => {
            let limit = limit.unwrap_or(dapp.recent_limit).min(MAX_RECENT_LIMIT);
            dapp.ledger.view_recent(limit).map(ReportResponse::records)
        }
    };

    let response = answer.unwrap_or_else(|e| {
        warn!(error = %e, "inspect query failed");
        ReportResponse::ledger_error(&e)
    });
    report(client, server_addr, &response).await?;
    Ok(ACCEPT)
}
