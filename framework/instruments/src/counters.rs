use serde::Serialize;

use crate::OutcomeKind;

/// Running totals of outcomes by kind.
///
/// Owned by the [crate::Reporter] for the lifetime of a run and only ever reset by creating a new
/// reporter.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OutcomeCounters {
    pub total: u64,
    pub success: u64,
    pub unexpected_status: u64,
    pub timeout: u64,
    pub connection: u64,
    pub request: u64,
}

impl OutcomeCounters {
    pub fn record(&mut self, kind: OutcomeKind) {
        self.total += 1;
        match kind {
            OutcomeKind::Success => self.success += 1,
            OutcomeKind::UnexpectedStatus => self.unexpected_status += 1,
            OutcomeKind::Timeout => self.timeout += 1,
            OutcomeKind::Connection => self.connection += 1,
            OutcomeKind::Request => self.request += 1,
        }
    }

    pub fn failed(&self) -> u64 {
        self.total - self.success
    }

    pub fn count(&self, kind: OutcomeKind) -> u64 {
        match kind {
            OutcomeKind::Success => self.success,
            OutcomeKind::UnexpectedStatus => self.unexpected_status,
            OutcomeKind::Timeout => self.timeout,
            OutcomeKind::Connection => self.connection,
            OutcomeKind::Request => self.request,
        }
    }
}
