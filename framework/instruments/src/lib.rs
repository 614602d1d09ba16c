mod counters;
mod outcome;
mod report;

pub use counters::OutcomeCounters;
pub use outcome::{OutcomeKind, OutcomeRecord, RequestOutcome};
pub use report::{
    InMemoryReporter, JsonLinesReporter, OutcomeLog, ReportCollector, ReportConfig, Reporter,
    SummaryReporter,
};
