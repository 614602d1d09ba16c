use load_generator_instruments::ReportConfig;

use crate::cli::LoadGeneratorCli;
use crate::scenario::{RequestSpec, Scenario};
use crate::settings::Settings;

/// Builds the login request sent before a tick when no session is active.
pub type LoginHook = fn() -> RequestSpec;

/// The builder for a traffic definition.
///
/// This must be used at the start of a load generator binary to define the traffic that you want
/// to send.
pub struct TrafficDefinitionBuilder<S: Scenario> {
    /// The name of the load generator, shown in logs.
    ///
    /// Recommended value is `env!("CARGO_PKG_NAME")`.
    name: String,
    /// Command line and environment configuration, validated into [Settings] on build.
    cli: LoadGeneratorCli,
    /// The catalog of scenarios that requests are chosen from.
    scenarios: Vec<S>,
    /// Optional login request. When set, the runner logs in before any tick that starts without
    /// an active session, and a successful [Scenario::ends_session] scenario ends the session.
    login: Option<LoginHook>,
    /// Where outcomes are reported. Defaults to JSON lines on stdout plus the summary table,
    /// unless the summary is disabled in the settings.
    report_config: Option<ReportConfig>,
}

pub struct TrafficDefinition<S: Scenario> {
    pub name: String,
    pub settings: Settings,
    pub scenarios: Vec<S>,
    pub login: Option<LoginHook>,
    pub report_config: ReportConfig,
}

impl<S: Scenario> TrafficDefinitionBuilder<S> {
    /// Initialise logging, read the configuration from the command line and environment and
    /// start a new definition.
    pub fn new_with_init(name: &str) -> Self {
        let cli = crate::init::init();
        Self::new(name, cli)
    }

    pub fn new(name: &str, cli: LoadGeneratorCli) -> Self {
        Self {
            name: name.to_string(),
            cli,
            scenarios: Vec::new(),
            login: None,
            report_config: None,
        }
    }

    /// Add scenarios to the catalog.
    pub fn use_scenarios(mut self, scenarios: impl IntoIterator<Item = S>) -> Self {
        self.scenarios.extend(scenarios);
        self
    }

    /// Set the login hook [TrafficDefinitionBuilder::login].
    pub fn use_login(mut self, login: LoginHook) -> Self {
        self.login = Some(login);
        self
    }

    /// Replace the default [TrafficDefinitionBuilder::report_config].
    pub fn with_report_config(mut self, report_config: ReportConfig) -> Self {
        self.report_config = Some(report_config);
        self
    }

    pub(crate) fn build(self) -> anyhow::Result<TrafficDefinition<S>> {
        let settings = Settings::try_from(self.cli)?;

        if self.scenarios.is_empty() {
            anyhow::bail!("No scenarios defined for [{}]", self.name);
        }

        let report_config = self.report_config.unwrap_or_else(|| {
            let config = ReportConfig::default().enable_json_lines();
            if settings.summary {
                config.enable_summary()
            } else {
                config
            }
        });

        Ok(TrafficDefinition {
            name: self.name,
            settings,
            scenarios: self.scenarios,
            login: self.login,
            report_config,
        })
    }
}
