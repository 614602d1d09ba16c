#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use load_generator_runner::prelude::{LoadGeneratorCli, RequestSpec, Scenario, Settings};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// A request as seen by the [StubServer].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Minimal HTTP/1.1 server for exercising the runner.
///
/// - `/slow` waits 10 seconds before answering 200
/// - `/fail` answers 500
/// - `/api/auth/login` answers 200 and sets a `session` cookie
/// - `/api/session/me` answers 200 with the cookie and 401 without it
/// - anything else answers 200
pub struct StubServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub server");
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = requests.clone();
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let recorded = recorded.clone();
                tokio::spawn(async move {
                    let _ = handle_connection(stream, recorded).await;
                });
            }
        });

        Self { addr, requests }
    }

    /// Start the server on a runtime that outlives the call, for tests that drive the runner from a
    /// plain thread.
    pub fn start_on(runtime: &tokio::runtime::Runtime) -> Self {
        runtime.block_on(Self::start())
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }
}

async fn handle_connection(
    mut stream: TcpStream,
    recorded: Arc<Mutex<Vec<RecordedRequest>>>,
) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or_default();
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let target = parts.next().unwrap_or_default().to_string();
    let path = target.split('?').next().unwrap_or_default().to_string();

    let headers = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(n, v)| (n.trim().to_string(), v.trim().to_string()))
        .collect::<Vec<_>>();

    let content_length = headers
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body_end = buf.len().min(header_end + content_length);
    let body = String::from_utf8_lossy(&buf[header_end..body_end]).to_string();

    let request = RecordedRequest {
        method,
        path: path.clone(),
        headers,
        body,
    };
    let has_session = request
        .header("cookie")
        .is_some_and(|c| c.contains("session=demo"));
    recorded.lock().unwrap().push(request);

    let (status, extra_headers) = match path.as_str() {
        "/slow" => {
            tokio::time::sleep(Duration::from_secs(10)).await;
            ("200 OK", "")
        }
        "/fail" => ("500 Internal Server Error", ""),
        "/api/auth/login" => ("200 OK", "Set-Cookie: session=demo; Path=/\r\n"),
        "/api/session/me" if has_session => ("200 OK", ""),
        "/api/session/me" => ("401 Unauthorized", ""),
        _ => ("200 OK", ""),
    };

    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: text/plain\r\nContent-Length: 2\r\n{extra_headers}Connection: close\r\n\r\nok"
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}

/// An address that refuses connections.
pub async fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub fn cli_for(base_url: &str) -> LoadGeneratorCli {
    LoadGeneratorCli {
        base_url: base_url.to_string(),
        interval_seconds: 1,
        concurrency: 5,
        request_timeout_seconds: 1,
        shutdown_grace_seconds: 2,
        no_summary: true,
        ..Default::default()
    }
}

pub fn settings_for(base_url: &str) -> Settings {
    Settings::try_from(cli_for(base_url)).expect("Test settings must be valid")
}

/// A small catalog that covers the interesting server behaviours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestScenario {
    Ok,
    Fail,
    Slow,
    SessionCheck,
    Logout,
    Score,
    Panics,
}

impl Scenario for TestScenario {
    fn name(&self) -> &'static str {
        match self {
            TestScenario::Ok => "ok",
            TestScenario::Fail => "fail",
            TestScenario::Slow => "slow",
            TestScenario::SessionCheck => "session_check",
            TestScenario::Logout => "logout",
            TestScenario::Score => "score",
            TestScenario::Panics => "panics",
        }
    }

    fn request(&self) -> RequestSpec {
        match self {
            TestScenario::Ok => RequestSpec::get("/ok"),
            TestScenario::Fail => RequestSpec::get("/fail"),
            TestScenario::Slow => RequestSpec::get("/slow"),
            TestScenario::SessionCheck => RequestSpec::get("/api/session/me").expect_status(200),
            TestScenario::Logout => RequestSpec::get("/api/auth/logout"),
            TestScenario::Score => RequestSpec::post("/api/score")
                .with_header("x-demo", "load")
                .with_json(serde_json::json!({ "score": 42 })),
            TestScenario::Panics => panic!("scenario failed to build its request"),
        }
    }

    fn ends_session(&self) -> bool {
        matches!(self, TestScenario::Logout)
    }
}

pub fn login() -> RequestSpec {
    RequestSpec::post("/api/auth/login")
        .with_json(serde_json::json!({ "id": "demo", "pw": "demo" }))
        .expect_status(200)
}
