use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use load_generator_core::prelude::DelegatedShutdownListener;
use load_generator_instruments::{OutcomeKind, OutcomeRecord, Reporter};
use tokio::task::{JoinError, JoinSet};
use tokio::time::{Instant, MissedTickBehavior};

use crate::cli::TickOverlap;
use crate::definition::LoginHook;
use crate::dispatch::Dispatcher;
use crate::scenario::Scenario;
use crate::selection::ScenarioSelector;
use crate::settings::Settings;
use crate::shutdown::ShutdownTimeout;

/// What happened in one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummary {
    pub tick: u64,
    pub dispatched: usize,
    pub succeeded: usize,
    pub elapsed: Duration,
}

/// Tick counts for a finished driver loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverReport {
    pub ticks_started: u64,
    pub ticks_completed: u64,
    pub ticks_skipped: u64,
    pub ticks_abandoned: u64,
}

/// State shared by every tick and request task.
#[derive(Debug)]
struct Shared<S: Scenario> {
    scenarios: Vec<S>,
    login: Option<LoginHook>,
    dispatcher: Dispatcher,
    reporter: Arc<Reporter>,
    session_active: AtomicBool,
}

/// Fires a burst of `concurrency` requests every `interval` until shutdown.
#[derive(Debug)]
pub struct TrafficDriver<S: Scenario> {
    shared: Arc<Shared<S>>,
    selector: ScenarioSelector,
    settings: Settings,
    next_tick: u64,
}

impl<S: Scenario> TrafficDriver<S> {
    pub fn new(
        settings: Settings,
        scenarios: Vec<S>,
        login: Option<LoginHook>,
        reporter: Arc<Reporter>,
    ) -> anyhow::Result<Self> {
        if scenarios.is_empty() {
            anyhow::bail!("At least one scenario is required to generate traffic");
        }

        Ok(Self {
            shared: Arc::new(Shared {
                scenarios,
                login,
                dispatcher: Dispatcher::new(settings.clone())?,
                reporter,
                session_active: AtomicBool::new(false),
            }),
            selector: ScenarioSelector::new(settings.scenario_selection),
            settings,
            next_tick: 1,
        })
    }

    /// Replace the selection policy, for example with a seeded random selector.
    pub fn with_selector(mut self, selector: ScenarioSelector) -> Self {
        self.selector = selector;
        self
    }

    pub fn session_active(&self) -> bool {
        self.shared.session_active.load(Ordering::SeqCst)
    }

    /// Run a single tick to completion.
    pub async fn run_tick(&mut self) -> TickSummary {
        let (tick, picks) = self.plan_tick();
        run_tick(self.shared.clone(), tick, picks).await
    }

    fn plan_tick(&mut self) -> (u64, Vec<usize>) {
        let tick = self.next_tick;
        self.next_tick += 1;
        let picks = self
            .selector
            .select(self.shared.scenarios.len(), self.settings.concurrency);
        (tick, picks)
    }

    /// Run ticks on the configured interval until the shutdown signal is observed, then give
    /// in-flight ticks the grace period to finish.
    pub async fn run(mut self, mut shutdown: DelegatedShutdownListener) -> DriverReport {
        let mut report = DriverReport::default();
        let mut in_flight: JoinSet<TickSummary> = JoinSet::new();

        let mut interval = tokio::time::interval(self.settings.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;

                _ = shutdown.wait_for_shutdown() => {
                    log::info!("Shutdown requested, no further ticks will be scheduled");
                    break;
                }
                Some(result) = in_flight.join_next(), if !in_flight.is_empty() => {
                    tick_finished(result, &mut report);
                }
                _ = interval.tick() => {
                    // The signal may have arrived while this branch was being polled.
                    if shutdown.should_shutdown() {
                        break;
                    }

                    if self.settings.tick_overlap == TickOverlap::Skip && !in_flight.is_empty() {
                        report.ticks_skipped += 1;
                        log::warn!(
                            "Skipping tick {}, the previous tick is still running",
                            self.next_tick
                        );
                        continue;
                    }

                    let (tick, picks) = self.plan_tick();
                    report.ticks_started += 1;
                    log::info!("Starting tick {tick} with {} requests", picks.len());
                    in_flight.spawn(run_tick(self.shared.clone(), tick, picks));
                }
            }
        }

        self.drain(in_flight, &mut report).await;
        report
    }

    async fn drain(&self, mut in_flight: JoinSet<TickSummary>, report: &mut DriverReport) {
        if in_flight.is_empty() {
            return;
        }

        let grace = self.settings.shutdown_grace;
        log::info!(
            "Waiting up to {}s for {} in-flight tick(s)",
            grace.as_secs_f64(),
            in_flight.len()
        );

        let finished = tokio::time::timeout(grace, async {
            while let Some(result) = in_flight.join_next().await {
                tick_finished(result, &mut *report);
            }
        })
        .await;

        if finished.is_err() {
            let err = ShutdownTimeout {
                abandoned: in_flight.len(),
                grace,
            };
            log::warn!("{err}");
            report.ticks_abandoned += in_flight.len() as u64;
            in_flight.abort_all();
        }
    }
}

fn tick_finished(result: Result<TickSummary, JoinError>, report: &mut DriverReport) {
    match result {
        Ok(summary) => {
            report.ticks_completed += 1;
            log::info!(
                "Tick {} complete: {}/{} succeeded in {:.2}s",
                summary.tick,
                summary.succeeded,
                summary.dispatched,
                summary.elapsed.as_secs_f64()
            );
        }
        Err(e) if e.is_cancelled() => log::debug!("Tick cancelled"),
        Err(e) => log::error!("Tick task failed: {e}"),
    }
}

async fn run_tick<S: Scenario>(
    shared: Arc<Shared<S>>,
    tick: u64,
    picks: Vec<usize>,
) -> TickSummary {
    let started = Instant::now();

    ensure_session(&shared, tick).await;

    let dispatched = picks.len();
    let mut requests = JoinSet::new();
    for index in picks {
        let shared = shared.clone();
        requests.spawn(async move {
            let scenario = &shared.scenarios[index];
            let name = scenario.name();

            let outcome = AssertUnwindSafe(async {
                let spec = scenario.request();
                shared.dispatcher.dispatch(tick, name, spec).await
            })
            .catch_unwind()
            .await
            .unwrap_or_else(|_| {
                OutcomeRecord::new(tick, name, "-", "-")
                    .failed(OutcomeKind::Request, "Request task panicked")
            });

            shared.reporter.add_outcome(&outcome);
            (index, outcome.kind)
        });
    }

    let mut succeeded = 0;
    while let Some(result) = requests.join_next().await {
        match result {
            Ok((index, kind)) if kind.is_success() => {
                succeeded += 1;
                if shared.scenarios[index].ends_session() {
                    shared.session_active.store(false, Ordering::SeqCst);
                }
            }
            Ok(_) => {}
            // Panics are caught inside the task, so only cancellation ends up here.
            Err(e) => log::debug!("Request task did not complete: {e}"),
        }
    }

    TickSummary {
        tick,
        dispatched,
        succeeded,
        elapsed: started.elapsed(),
    }
}

/// Log in before the burst if a login request is configured and no session is active.
///
/// The login result is logged, not reported as an outcome, so each tick reports exactly one
/// outcome per dispatched scenario.
async fn ensure_session<S: Scenario>(shared: &Shared<S>, tick: u64) {
    let Some(login) = shared.login else {
        return;
    };
    if shared.session_active.load(Ordering::SeqCst) {
        return;
    }

    let outcome = shared.dispatcher.dispatch(tick, "login", login()).await;
    if outcome.success {
        shared.session_active.store(true, Ordering::SeqCst);
        log::info!("Logged in ({}ms)", outcome.latency_ms);
    } else {
        log::warn!(
            "Login failed: {}",
            outcome.error.as_deref().unwrap_or("unknown error")
        );
    }
}
