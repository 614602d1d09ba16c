use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser, ValueEnum};

pub const DEFAULT_BASE_URL: &str = "http://frontend-svc";

/// What to do when a tick comes due while the previous one is still in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TickOverlap {
    /// Skip the new tick and wait for the next one
    Skip,
    /// Start the new tick alongside the running one
    Allow,
}

/// How scenarios are chosen for each request in a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScenarioSelection {
    /// Walk the scenario catalog in order, carrying the position across ticks
    RoundRobin,
    /// Pick uniformly at random, with replacement
    Random,
}

/// Every option can also be set from the environment variable named next to it. Command line
/// flags win over the environment.
#[derive(Debug, Clone, Parser)]
#[command(about, long_about = None)]
pub struct LoadGeneratorCli {
    /// Root URL of the service to send traffic to
    #[arg(long, env = "BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Seconds between ticks
    #[arg(long, env = "INTERVAL_SECONDS", default_value_t = 30)]
    pub interval_seconds: u64,

    /// Number of requests dispatched concurrently on every tick
    #[arg(long, env = "CONCURRENCY", default_value_t = 5)]
    pub concurrency: usize,

    /// Upper bound in seconds for a single request, including reading the response body
    #[arg(long, env = "REQUEST_TIMEOUT_SECONDS", default_value_t = 5)]
    pub request_timeout_seconds: u64,

    /// Seconds that in-flight requests are given to finish after a shutdown signal
    #[arg(long, env = "SHUTDOWN_GRACE_SECONDS", default_value_t = 10)]
    pub shutdown_grace_seconds: u64,

    /// Behaviour when a tick comes due while the previous one is still running
    #[arg(long, env = "TICK_OVERLAP", value_enum, default_value_t = TickOverlap::Skip)]
    pub tick_overlap: TickOverlap,

    /// Policy for choosing the scenario of each request
    #[arg(long, env = "SCENARIO_SELECTION", value_enum, default_value_t = ScenarioSelection::RoundRobin)]
    pub scenario_selection: ScenarioSelection,

    /// Stop after this many seconds. Runs until stopped when not set
    #[arg(long, env = "RUN_DURATION_SECONDS")]
    pub run_duration_seconds: Option<u64>,

    /// Do not print the per-scenario summary table on exit. The environment variable also accepts
    /// `1`, `yes` and `on`
    #[arg(long, env = "NO_SUMMARY", action = ArgAction::SetTrue, value_parser = BoolishValueParser::new())]
    pub no_summary: bool,
}

impl Default for LoadGeneratorCli {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            interval_seconds: 30,
            concurrency: 5,
            request_timeout_seconds: 5,
            shutdown_grace_seconds: 10,
            tick_overlap: TickOverlap::Skip,
            scenario_selection: ScenarioSelection::RoundRobin,
            run_duration_seconds: None,
            no_summary: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn flags_parse() {
        let cli = LoadGeneratorCli::try_parse_from([
            "load-generator",
            "--base-url",
            "http://localhost:8080",
            "--interval-seconds",
            "1",
            "--concurrency",
            "7",
            "--tick-overlap",
            "allow",
            "--scenario-selection",
            "random",
            "--run-duration-seconds",
            "3",
            "--no-summary",
        ])
        .unwrap();

        assert_eq!("http://localhost:8080", cli.base_url);
        assert_eq!(1, cli.interval_seconds);
        assert_eq!(7, cli.concurrency);
        assert_eq!(TickOverlap::Allow, cli.tick_overlap);
        assert_eq!(ScenarioSelection::Random, cli.scenario_selection);
        assert_eq!(Some(3), cli.run_duration_seconds);
        assert!(cli.no_summary);
    }

    #[test]
    fn no_summary_accepts_boolish_env_values() {
        for (value, expected) in [
            ("1", true),
            ("yes", true),
            ("on", true),
            ("0", false),
            ("off", false),
        ] {
            std::env::set_var("NO_SUMMARY", value);
            let cli = LoadGeneratorCli::try_parse_from(["load-generator"]);
            std::env::remove_var("NO_SUMMARY");

            assert_eq!(expected, cli.unwrap().no_summary, "NO_SUMMARY={value}");
        }
    }

    #[test]
    fn non_numeric_interval_is_rejected() {
        let result =
            LoadGeneratorCli::try_parse_from(["load-generator", "--interval-seconds", "soon"]);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_overlap_policy_is_rejected() {
        let result =
            LoadGeneratorCli::try_parse_from(["load-generator", "--tick-overlap", "sometimes"]);
        assert!(result.is_err());
    }
}
