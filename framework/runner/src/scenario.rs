use reqwest::Method;

/// A request to send, relative to the configured base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub method: Method,
    /// Path and optional query, for example `/rankings/top?limit=5`.
    pub path: String,
    pub headers: Vec<(&'static str, String)>,
    /// Sent as a JSON body when present.
    pub body: Option<serde_json::Value>,
    /// The exact status that counts as a success. When not set, any 2xx status does.
    pub expected_status: Option<u16>,
}

impl RequestSpec {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Vec::new(),
            body: None,
            expected_status: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    pub fn with_json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn expect_status(mut self, status: u16) -> Self {
        self.expected_status = Some(status);
        self
    }
}

/// One kind of simulated user action.
///
/// Implement this for a closed enum of actions and hand the catalog to
/// [crate::prelude::TrafficDefinitionBuilder::use_scenarios].
pub trait Scenario: std::fmt::Debug + Send + Sync + 'static {
    /// Stable name, used as the scenario identity in every outcome.
    fn name(&self) -> &'static str;

    /// Build the request for one invocation. Called once per dispatched request, so payloads may
    /// vary between calls.
    fn request(&self) -> RequestSpec;

    /// Whether a successful response means the login session is over.
    fn ends_session(&self) -> bool {
        false
    }
}
