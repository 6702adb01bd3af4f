use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Request, Response, Server, StatusCode};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

type Outputs = Arc<Mutex<Vec<String>>>;

/// Stand-in for the rollup HTTP server. Records the decoded payload of
/// every notice and report it receives.
#[derive(Clone)]
pub struct MockRollupServer {
    notices: Outputs,
    reports: Outputs,
}

impl MockRollupServer {
    pub fn new() -> Self {
        Self {
            notices: Arc::new(Mutex::new(Vec::new())),
            reports: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn start(&self) -> String {
        let notices = self.notices.clone();
        let reports = self.reports.clone();

        let make_svc = make_service_fn(move |_conn| {
            let notices = notices.clone();
            let reports = reports.clone();

            async move {
                Ok::<_, Infallible>(service_fn(move |req| {
                    handle_request(req, notices.clone(), reports.clone())
                }))
            }
        });

        // Bind to random port
        let addr = SocketAddr::from(([127, 0, 0, 1], 0));
        let server = Server::bind(&addr).serve(make_svc);
        let actual_addr = server.local_addr();

        tokio::spawn(async move {
            if let Err(e) = server.await {
                eprintln!("Mock server error: {}", e);
            }
        });

        format!("http://{}", actual_addr)
    }

    pub fn get_notices(&self) -> Vec<String> {
        self.notices.lock().unwrap().clone()
    }

    pub fn get_reports(&self) -> Vec<String> {
        self.reports.lock().unwrap().clone()
    }

    /// The most recent report, parsed.
    pub fn last_report(&self) -> serde_json::Value {
        let reports = self.get_reports();
        let last = reports.last().expect("no report received");
        serde_json::from_str(last).unwrap()
    }
}

fn decode_output(body: &[u8]) -> Option<String> {
    let body = std::str::from_utf8(body).ok()?;
    let json = json::parse(body).ok()?;
    let payload_hex = json["payload"].as_str()?;
    let bytes = hex::decode(payload_hex.trim_start_matches("0x")).ok()?;
    String::from_utf8(bytes).ok()
}

async fn handle_request(
    req: Request<Body>,
    notices: Outputs,
    reports: Outputs,
) -> Result<Response<Body>, Infallible> {
    let sink = match req.uri().path() {
        "/notice" => notices,
        "/report" => reports,
        _ => {
            let mut response = Response::new(Body::from("Not Found"));
            *response.status_mut() = StatusCode::NOT_FOUND;
            return Ok(response);
        }
    };

    let body_bytes = hyper::body::to_bytes(req.into_body())
        .await
        .unwrap_or_default();
    if let Some(payload) = decode_output(&body_bytes) {
        sink.lock().unwrap().push(payload);
    }

    Ok(Response::new(Body::from("{\"status\":\"ok\"}")))
}

#[tokio::test]
async fn test_mock_server_captures_prefixed_notices() {
    let server = MockRollupServer::new();
    let url = server.start().await;

    let client = hyper::Client::new();
    let payload_hex = hex::encode(r#"{"test":"notice"}"#);
    let req = hyper::Request::builder()
        .method("POST")
        .uri(format!("{}/notice", url))
        .header("content-type", "application/json")
        .body(Body::from(format!(r#"{{"payload":"0x{}"}}"#, payload_hex)))
        .unwrap();

    let response = client.request(req).await.unwrap();
    assert!(response.status().is_success());

    let notices = server.get_notices();
    assert_eq!(notices, vec![r#"{"test":"notice"}"#.to_string()]);
    assert!(server.get_reports().is_empty());
}
