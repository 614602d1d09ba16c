use std::sync::Arc;

use anyhow::Context;
use load_generator_instruments::OutcomeCounters;

use crate::definition::TrafficDefinitionBuilder;
use crate::driver::{DriverReport, TrafficDriver};
use crate::scenario::Scenario;
use crate::shutdown::start_shutdown_listener;

/// The result of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub run_id: String,
    pub ticks: DriverReport,
    pub counters: OutcomeCounters,
}

/// Run the traffic definition until a shutdown signal is received or the configured run duration
/// elapses.
///
/// Only configuration errors are returned. Request failures are reported as outcomes and never
/// stop the run.
pub fn run<S: Scenario>(definition: TrafficDefinitionBuilder<S>) -> anyhow::Result<RunReport> {
    let definition = definition.build()?;
    let settings = definition.settings;
    let run_id = nanoid::nanoid!();

    log::info!(
        "Running {} [{}] against {}: {} request(s) every {}s, {:?} selection, {:?} on overlap",
        definition.name,
        run_id,
        settings.base_url,
        settings.concurrency,
        settings.interval.as_secs(),
        settings.scenario_selection,
        settings.tick_overlap,
    );

    let runtime = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;
    let shutdown_handle = start_shutdown_listener(&runtime)?;
    let reporter = Arc::new(definition.report_config.init(&run_id));

    let driver = TrafficDriver::new(
        settings.clone(),
        definition.scenarios,
        definition.login,
        reporter.clone(),
    )?;

    if let Some(duration) = settings.run_duration {
        // Set a timer to shut down after the duration has elapsed
        let shutdown_handle = shutdown_handle.clone();
        runtime.spawn(async move {
            tokio::time::sleep(duration).await;
            log::info!("Run duration of {}s reached", duration.as_secs());
            shutdown_handle.shutdown();
        });
    }

    let ticks = runtime.block_on(driver.run(shutdown_handle.new_listener()));
    let counters = reporter.finalize();

    log::info!(
        "Completed {} tick(s), {}/{} request(s) succeeded",
        ticks.ticks_completed,
        counters.success,
        counters.total
    );

    // Abandoned request tasks must not hold up the exit.
    runtime.shutdown_background();

    Ok(RunReport {
        run_id,
        ticks,
        counters,
    })
}
