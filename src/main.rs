use notary::config::Config;
use notary::handlers::{handle_advance, handle_inspect, Dapp, ACCEPT, REJECT};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = Config::from_env()?;
    info!(database = ?config.database, "starting time-capsule notary");

    let dapp = Dapp::open(&config)?;
    info!(records = dapp.ledger.count()?, "ledger opened");

    let client = hyper::Client::new();
    let server_addr = config.rollup_server_url.as_str();
    info!(server = server_addr, "connected to rollup server");

    let mut status = ACCEPT;
    loop {
        let response = json::object! {"status" => status};
        let request = hyper::Request::builder()
            .method(hyper::Method::POST)
            .header(hyper::header::CONTENT_TYPE, "application/json")
            .uri(format!("{}/finish", server_addr))
            .body(hyper::Body::from(response.dump()))?;
        let response = client.request(request).await?;

        if response.status() == hyper::StatusCode::ACCEPTED {
            info!("no pending rollup request, trying again");
            continue;
        }

        let body = hyper::body::to_bytes(response).await?;
        let req = json::parse(std::str::from_utf8(&body)?)?;

        let request_type = req["request_type"]
            .as_str()
            .ok_or("request_type is not a string")?
            .to_string();
        info!(request_type = %request_type, "processing request");

        status = match request_type.as_str() {
            "advance_state" => handle_advance(&client, server_addr, &dapp, req).await?,
            "inspect_state" => handle_inspect(&client, server_addr, &dapp, req).await?,
            other => {
                warn!(request_type = other, "unknown request type");
                REJECT
            }
        };
    }
}
