use std::fmt::Display;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Classification of a single dispatched request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    /// The response carried the expected status.
    Success,
    /// A response arrived but with a status other than the expected one.
    UnexpectedStatus,
    /// No response before the request timeout.
    Timeout,
    /// The target could not be reached.
    Connection,
    /// Any other failure while building, sending or reading the request.
    Request,
}

impl OutcomeKind {
    pub fn is_success(&self) -> bool {
        matches!(self, OutcomeKind::Success)
    }
}

/// The recorded result of one request. One of these becomes one line in the outcome log.
#[derive(Debug, Clone, Serialize)]
pub struct RequestOutcome {
    pub tick: u64,
    pub scenario: &'static str,
    pub method: String,
    pub url: String,
    pub timestamp: DateTime<Utc>,
    pub success: bool,
    pub kind: OutcomeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    pub latency_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(rename = "dd.trace_id", skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    #[serde(rename = "dd.span_id", skip_serializing_if = "Option::is_none")]
    pub span_id: Option<String>,
}

/// A request that is in flight. Created just before the request is sent and turned into a
/// [RequestOutcome] once the request resolves.
#[derive(Debug, Clone)]
pub struct OutcomeRecord {
    tick: u64,
    scenario: &'static str,
    method: String,
    url: String,
    trace: Option<(u64, u64)>,
    timestamp: DateTime<Utc>,
    started: Instant,
}

impl OutcomeRecord {
    pub fn new(
        tick: u64,
        scenario: &'static str,
        method: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            tick,
            scenario,
            method: method.into(),
            url: url.into(),
            trace: None,
            timestamp: Utc::now(),
            started: Instant::now(),
        }
    }

    /// Attach the trace and span ids that were propagated with the request.
    pub fn with_trace(mut self, trace_id: u64, span_id: u64) -> Self {
        self.trace = Some((trace_id, span_id));
        self
    }

    /// Complete the record with the status of a received response.
    ///
    /// With no `expected` status any 2xx counts as a success.
    pub fn responded(self, status: u16, expected: Option<u16>) -> RequestOutcome {
        let ok = match expected {
            Some(expected) => status == expected,
            None => (200..300).contains(&status),
        };

        if ok {
            self.finish(OutcomeKind::Success, Some(status), None)
        } else {
            self.finish(
                OutcomeKind::UnexpectedStatus,
                Some(status),
                Some(format!("Unexpected status: {status}")),
            )
        }
    }

    /// Complete the record with a failure that produced no response.
    pub fn failed(self, kind: OutcomeKind, error: impl Display) -> RequestOutcome {
        self.finish(kind, None, Some(error.to_string()))
    }

    fn finish(
        self,
        kind: OutcomeKind,
        status_code: Option<u16>,
        error: Option<String>,
    ) -> RequestOutcome {
        let latency_ms = round2(self.started.elapsed().as_micros() as f64 / 1000.0);

        RequestOutcome {
            tick: self.tick,
            scenario: self.scenario,
            method: self.method,
            url: self.url,
            timestamp: self.timestamp,
            success: kind.is_success(),
            kind,
            status_code,
            latency_ms,
            error,
            trace_id: self.trace.map(|(trace_id, _)| trace_id.to_string()),
            span_id: self.trace.map(|(_, span_id)| span_id.to_string()),
        }
    }
}

fn round2(n: f64) -> f64 {
    (n * 100.0).round() / 100.0
}
