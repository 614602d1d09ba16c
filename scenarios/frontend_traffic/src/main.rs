mod scenarios;

use load_generator_runner::prelude::*;

use crate::scenarios::{login, FrontendScenario};

fn main() -> LoadGeneratorResult<()> {
    let builder = TrafficDefinitionBuilder::new_with_init(env!("CARGO_PKG_NAME"))
        .use_scenarios(FrontendScenario::ALL)
        .use_login(login);

    let report = run(builder)?;

    log::info!(
        "Run {} finished: {} tick(s) started, {} skipped, {} failed request(s)",
        report.run_id,
        report.ticks.ticks_started,
        report.ticks.ticks_skipped,
        report.counters.failed()
    );

    Ok(())
}
