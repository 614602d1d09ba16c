mod in_memory_reporter;
mod json_lines_reporter;
mod summary_report;

use std::io::Write;

use parking_lot::Mutex;

use crate::{OutcomeCounters, RequestOutcome};

pub use in_memory_reporter::{InMemoryReporter, OutcomeLog};
pub use json_lines_reporter::JsonLinesReporter;
pub use summary_report::SummaryReporter;

pub trait ReportCollector: Send {
    fn add_outcome(&mut self, outcome: &RequestOutcome);

    /// Called once when the run ends.
    fn finalize(&self);
}

/// Choose which collectors receive outcomes for a run.
#[derive(Default)]
pub struct ReportConfig {
    json_lines: Option<Box<dyn Write + Send>>,
    in_memory: Option<OutcomeLog>,
    summary: bool,
}

impl ReportConfig {
    /// Write one JSON object per outcome to stdout.
    pub fn enable_json_lines(self) -> Self {
        self.enable_json_lines_to(std::io::stdout())
    }

    /// Write one JSON object per outcome to the given writer.
    pub fn enable_json_lines_to<W: Write + Send + 'static>(mut self, writer: W) -> Self {
        self.json_lines = Some(Box::new(writer));
        self
    }

    /// Keep every outcome in memory, readable through the given log.
    pub fn enable_in_memory(mut self, log: OutcomeLog) -> Self {
        self.in_memory = Some(log);
        self
    }

    /// Print a per-scenario summary table when the run ends.
    pub fn enable_summary(mut self) -> Self {
        self.summary = true;
        self
    }

    pub fn init(self, run_id: &str) -> Reporter {
        let mut collectors: Vec<Box<dyn ReportCollector>> = Vec::new();

        if let Some(writer) = self.json_lines {
            collectors.push(Box::new(JsonLinesReporter::new(run_id, writer)));
        }

        if let Some(log) = self.in_memory {
            collectors.push(Box::new(InMemoryReporter::new(log)));
        }

        if self.summary {
            collectors.push(Box::new(SummaryReporter::new()));
        }

        Reporter {
            inner: Mutex::new(ReporterInner {
                collectors,
                counters: OutcomeCounters::default(),
            }),
        }
    }
}

struct ReporterInner {
    collectors: Vec<Box<dyn ReportCollector>>,
    counters: OutcomeCounters,
}

/// Fans every outcome out to the configured collectors and keeps the run's counters.
pub struct Reporter {
    inner: Mutex<ReporterInner>,
}

impl std::fmt::Debug for Reporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reporter")
            .field("counters", &self.counters())
            .finish_non_exhaustive()
    }
}

impl Reporter {
    pub fn add_outcome(&self, outcome: &RequestOutcome) {
        let mut inner = self.inner.lock();
        inner.counters.record(outcome.kind);
        for collector in inner.collectors.iter_mut() {
            collector.add_outcome(outcome);
        }
    }

    /// A snapshot of the counters so far.
    pub fn counters(&self) -> OutcomeCounters {
        self.inner.lock().counters
    }

    pub fn finalize(&self) -> OutcomeCounters {
        let inner = self.inner.lock();
        for collector in &inner.collectors {
            collector.finalize();
        }
        inner.counters
    }
}
