use std::sync::Arc;

use parking_lot::Mutex;

use crate::report::ReportCollector;
use crate::RequestOutcome;

/// Shared view of the outcomes kept by an [InMemoryReporter].
#[derive(Debug, Clone, Default)]
pub struct OutcomeLog {
    outcomes: Arc<Mutex<Vec<RequestOutcome>>>,
}

impl OutcomeLog {
    pub fn snapshot(&self) -> Vec<RequestOutcome> {
        self.outcomes.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.outcomes.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.lock().is_empty()
    }
}

/// A very basic reporter that is useful while developing scenarios. It keeps all of the outcomes
/// in memory so they can be inspected after the run.
pub struct InMemoryReporter {
    log: OutcomeLog,
}

impl InMemoryReporter {
    pub fn new(log: OutcomeLog) -> Self {
        Self { log }
    }
}

impl ReportCollector for InMemoryReporter {
    fn add_outcome(&mut self, outcome: &RequestOutcome) {
        self.log.outcomes.lock().push(outcome.clone());
    }

    fn finalize(&self) {
        log::debug!("In-memory reporter holds {} outcomes", self.log.len());
    }
}
