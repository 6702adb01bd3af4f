//! Outputs to the Cartesi rollup HTTP server.
//!
//! Notices are verifiable on the base layer and carry seal receipts.
//! Reports are unverifiable and carry query answers and errors.

use hyper::client::HttpConnector;
use hyper::{Body, Client, Method, Request};
use std::error::Error;
use tracing::debug;

pub type RollupClient = Client<HttpConnector>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Notice,
    Report,
}

impl OutputKind {
    fn endpoint(self) -> &'static str {
        match self {
            OutputKind::Notice => "notice",
            OutputKind::Report => "report",
        }
    }
}

/// Hex-encode `payload` and POST it to `/notice` or `/report`.
pub async fn send_output(
    client: &RollupClient,
    server_url: &str,
    kind: OutputKind,
    payload: &str,
) -> Result<(), Box<dyn Error>> {
    let body_json = json::object! {
        "payload" => format!("0x{}", hex::encode(payload))
    };

    let request = Request::builder()
        .method(Method::POST)
        .uri(format!("{}/{}", server_url, kind.endpoint()))
        .header("content-type", "application/json")
        .body(Body::from(body_json.dump()))?;

    let response = client.request(request).await?;

    if !response.status().is_success() {
        return Err(format!(
            "Failed to send {}: HTTP {}",
            kind.endpoint(),
            response.status()
        )
        .into());
    }

    debug!(kind = kind.endpoint(), bytes = payload.len(), "output sent");
    Ok(())
}

pub async fn send_notice(
    client: &RollupClient,
    server_url: &str,
    payload: &str,
) -> Result<(), Box<dyn Error>> {
    send_output(client, server_url, OutputKind::Notice, payload).await
}

pub async fn send_report(
    client: &RollupClient,
    server_url: &str,
    payload: &str,
) -> Result<(), Box<dyn Error>> {
    send_output(client, server_url, OutputKind::Report, payload).await
}

/// Decode a rollup payload (hex, with or without `0x`) into UTF-8 text.
pub fn decode_payload(payload_hex: &str) -> Result<String, Box<dyn Error>> {
    let digits = payload_hex.strip_prefix("0x").unwrap_or(payload_hex);
    let bytes = hex::decode(digits)?;
    Ok(String::from_utf8(bytes)?)
}
