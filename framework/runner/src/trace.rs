use rand::Rng;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

/// Trace context propagated with each request so the target's traces link back to the outcome log.
///
/// Written both as W3C `traceparent` and as Datadog headers. The trace id is 64 bits, which is
/// what Datadog headers carry, and is left-padded with zeros in `traceparent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceContext {
    pub trace_id: u64,
    pub span_id: u64,
}

impl TraceContext {
    pub fn new_root() -> Self {
        let mut rng = rand::thread_rng();
        Self {
            // Zero is an invalid id in both formats.
            trace_id: rng.gen_range(1..=u64::MAX),
            span_id: rng.gen_range(1..=u64::MAX),
        }
    }

    pub fn traceparent(&self) -> String {
        format!("00-{:032x}-{:016x}-01", self.trace_id, self.span_id)
    }

    pub fn inject(&self, headers: &mut HeaderMap) {
        let values = [
            ("traceparent", self.traceparent()),
            ("x-datadog-trace-id", self.trace_id.to_string()),
            ("x-datadog-parent-id", self.span_id.to_string()),
            ("x-datadog-sampling-priority", "1".to_string()),
        ];

        for (name, value) in values {
            // All values are ASCII digits, hex and dashes.
            if let Ok(value) = HeaderValue::from_str(&value) {
                headers.insert(HeaderName::from_static(name), value);
            }
        }
    }
}
