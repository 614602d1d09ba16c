mod scenario_table;

use std::collections::BTreeMap;

use tabled::settings::Style;
use tabled::Table;

use crate::report::summary_report::scenario_table::ScenarioRow;
use crate::report::ReportCollector;
use crate::RequestOutcome;

#[derive(Debug, Default, Clone)]
struct ScenarioStats {
    total: u64,
    failed: u64,
    success_latency_total_ms: f64,
    min_ms: Option<f64>,
    max_ms: Option<f64>,
}

impl ScenarioStats {
    fn add(&mut self, outcome: &RequestOutcome) {
        self.total += 1;
        if !outcome.success {
            self.failed += 1;
            return;
        }

        let latency = outcome.latency_ms;
        self.success_latency_total_ms += latency;
        self.min_ms = Some(self.min_ms.map_or(latency, |m| m.min(latency)));
        self.max_ms = Some(self.max_ms.map_or(latency, |m| m.max(latency)));
    }

    fn avg_ms(&self) -> Option<f64> {
        let succeeded = self.total - self.failed;
        (succeeded > 0).then(|| self.success_latency_total_ms / succeeded as f64)
    }
}

/// Aggregates latency per scenario and prints a table to stderr when the run ends.
///
/// Latency figures only include successful requests.
#[derive(Default)]
pub struct SummaryReporter {
    by_scenario: BTreeMap<&'static str, ScenarioStats>,
}

impl SummaryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn rows(&self) -> Vec<ScenarioRow> {
        self.by_scenario
            .iter()
            .map(|(scenario, stats)| ScenarioRow {
                scenario: scenario.to_string(),
                total_requests: stats.total,
                failed: stats.failed,
                avg_time_ms: stats.avg_ms(),
                min_time_ms: stats.min_ms,
                max_time_ms: stats.max_ms,
            })
            .collect()
    }
}

impl ReportCollector for SummaryReporter {
    fn add_outcome(&mut self, outcome: &RequestOutcome) {
        self.by_scenario
            .entry(outcome.scenario)
            .or_default()
            .add(outcome);
    }

    fn finalize(&self) {
        if self.by_scenario.is_empty() {
            eprintln!("\nNo requests were dispatched");
            return;
        }

        let mut table = Table::new(self.rows());
        table.with(Style::modern());

        eprintln!("\nSummary of requests");
        eprintln!("{table}");
    }
}
