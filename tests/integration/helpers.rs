use base64::Engine;
use json::JsonValue;
use notary::handlers::Dapp;
use notary::SqliteStore;

/// A dapp over a fresh in-memory ledger.
pub fn in_memory_dapp() -> Dapp {
    Dapp::new(Box::new(SqliteStore::new_in_memory().unwrap()), 6)
}

/// Create a test advance_state request
pub fn create_advance_request(payload_json: &str, msg_sender: &str, timestamp: i64) -> JsonValue {
    let payload_hex = format!("0x{}", hex::encode(payload_json));

    json::object! {
        "request_type" => "advance_state",
        "data" => json::object! {
            "payload" => payload_hex,
            "metadata" => json::object! {
                "msg_sender" => msg_sender,
                "block_number" => 100,
                "timestamp" => timestamp,
                "epoch_index" => 0,
                "input_index" => 0
            }
        }
    }
}

/// Create a test inspect_state request
pub fn create_inspect_request(payload_json: &str) -> JsonValue {
    let payload_hex = format!("0x{}", hex::encode(payload_json));

    json::object! {
        "request_type" => "inspect_state",
        "data" => json::object! {
            "payload" => payload_hex
        }
    }
}

fn encode(text: &str) -> String {
    base64::engine::general_purpose::STANDARD.encode(text)
}

pub fn seal_payload(content: &str, signer: Option<&str>, release_date: &str) -> String {
    let mut data = serde_json::json!({
        "content": encode(content),
        "release_date": release_date,
    });
    if let Some(signer) = signer {
        data["signer"] = signer.into();
    }
    serde_json::json!({ "action": "seal", "data": data }).to_string()
}

pub fn verify_action_payload(fingerprint: &str, content: &str) -> String {
    serde_json::json!({
        "action": "verify",
        "data": { "fingerprint": fingerprint, "content": encode(content) }
    })
    .to_string()
}

pub fn verify_query_payload(fingerprint: &str, content: &str) -> String {
    serde_json::json!({
        "query": "verify",
        "fingerprint": fingerprint,
        "content": encode(content)
    })
    .to_string()
}

#[test]
fn test_create_advance_request() {
    let payload = r#"{"test":"data"}"#;
    let req = create_advance_request(payload, "0x123", 1_700_000_000);

    assert_eq!(req["request_type"].as_str().unwrap(), "advance_state");
    assert_eq!(req["data"]["metadata"]["msg_sender"].as_str().unwrap(), "0x123");
    assert_eq!(req["data"]["metadata"]["timestamp"].as_i64().unwrap(), 1_700_000_000);

    let payload_hex = req["data"]["payload"].as_str().unwrap();
    assert_eq!(
        notary::infrastructure::cartesi::decode_payload(payload_hex).unwrap(),
        payload
    );
}

#[test]
fn test_seal_payload_omits_absent_signer() {
    let parsed: serde_json::Value =
        serde_json::from_str(&seal_payload("Hello", None, "2045-01-01")).unwrap();

    assert_eq!(parsed["action"], "seal");
    assert_eq!(parsed["data"]["content"], "SGVsbG8=");
    assert!(parsed["data"].get("signer").is_none());
}
