use std::io::Write;

use serde::Serialize;

use crate::report::ReportCollector;
use crate::RequestOutcome;

#[derive(Serialize)]
struct OutcomeLine<'a> {
    run_id: &'a str,
    #[serde(flatten)]
    outcome: &'a RequestOutcome,
}

/// Writes each outcome as a single JSON object followed by a newline, for pickup by a log
/// pipeline.
pub struct JsonLinesReporter {
    run_id: String,
    writer: Box<dyn Write + Send>,
}

impl JsonLinesReporter {
    pub fn new(run_id: &str, writer: Box<dyn Write + Send>) -> Self {
        Self {
            run_id: run_id.to_string(),
            writer,
        }
    }

    fn write_line(&mut self, outcome: &RequestOutcome) -> std::io::Result<()> {
        let line = OutcomeLine {
            run_id: &self.run_id,
            outcome,
        };
        let mut buf = serde_json::to_vec(&line)?;
        buf.push(b'\n');

        // One write per line so concurrent readers never see a partial object.
        self.writer.write_all(&buf)?;
        self.writer.flush()
    }
}

impl ReportCollector for JsonLinesReporter {
    fn add_outcome(&mut self, outcome: &RequestOutcome) {
        if let Err(e) = self.write_line(outcome) {
            log::warn!("Failed to write outcome for {}: {e}", outcome.scenario);
        }
    }

    fn finalize(&self) {
        // Lines are flushed as they are written.
    }
}
