use std::error::Error as _;

use anyhow::Context;
use load_generator_instruments::{OutcomeKind, OutcomeRecord, RequestOutcome};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;

use crate::scenario::RequestSpec;
use crate::settings::Settings;
use crate::trace::TraceContext;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Sends single requests against the target and turns each into a [RequestOutcome].
///
/// Cheap to clone, all clones share one connection pool and cookie store.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    client: Client,
    settings: Settings,
}

impl Dispatcher {
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .connect_timeout(settings.request_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, settings })
    }

    /// Send one request and wait for it to complete or time out. Never returns an error, every
    /// failure is folded into the outcome.
    pub async fn dispatch(
        &self,
        tick: u64,
        scenario: &'static str,
        spec: RequestSpec,
    ) -> RequestOutcome {
        let trace = TraceContext::new_root();
        let url = match self.settings.url_for(&spec.path) {
            Ok(url) => url,
            Err(e) => {
                return OutcomeRecord::new(tick, scenario, spec.method.as_str(), spec.path.clone())
                    .with_trace(trace.trace_id, trace.span_id)
                    .failed(OutcomeKind::Request, format!("Invalid request path: {e}"));
            }
        };

        let record = OutcomeRecord::new(tick, scenario, spec.method.as_str(), url.as_str())
            .with_trace(trace.trace_id, trace.span_id);

        let mut headers = HeaderMap::new();
        for (name, value) in &spec.headers {
            match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(value)) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => log::warn!("Dropping invalid header `{name}` for scenario {scenario}"),
            }
        }
        trace.inject(&mut headers);

        let mut request = self.client.request(spec.method.clone(), url).headers(headers);
        if let Some(body) = &spec.body {
            request = request.json(body);
        }

        let timeout = self.settings.request_timeout;
        let exchange = async {
            let response = request.send().await?;
            let status = response.status().as_u16();
            // Read the body so latency covers the full exchange and the connection can be reused.
            response.bytes().await?;
            Ok::<_, reqwest::Error>(status)
        };

        let outcome = match tokio::time::timeout(timeout, exchange).await {
            Ok(Ok(status)) => record.responded(status, spec.expected_status),
            Ok(Err(e)) => {
                let kind = classify(&e);
                record.failed(kind, describe(&e))
            }
            Err(_) => record.failed(
                OutcomeKind::Timeout,
                format!("Timeout after {}s", timeout.as_secs_f64()),
            ),
        };

        log_outcome(&outcome);
        outcome
    }
}

fn classify(e: &reqwest::Error) -> OutcomeKind {
    if e.is_timeout() {
        OutcomeKind::Timeout
    } else if e.is_connect() {
        OutcomeKind::Connection
    } else {
        OutcomeKind::Request
    }
}

/// The reqwest error plus its sources, which is where the useful detail lives for connection
/// errors.
fn describe(e: &reqwest::Error) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn log_outcome(outcome: &RequestOutcome) {
    match (outcome.kind, outcome.status_code) {
        (OutcomeKind::Success, Some(status)) => {
            log::debug!("{}: {} ({}ms)", outcome.scenario, status, outcome.latency_ms)
        }
        (OutcomeKind::UnexpectedStatus, Some(status)) => {
            log::debug!("{}: unexpected status {}", outcome.scenario, status)
        }
        _ => log::debug!(
            "{}: {:?} {}",
            outcome.scenario,
            outcome.kind,
            outcome.error.as_deref().unwrap_or_default()
        ),
    }
}
