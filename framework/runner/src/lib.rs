mod cli;
mod definition;
mod dispatch;
mod driver;
mod init;
mod run;
mod scenario;
mod selection;
mod settings;
mod shutdown;
mod trace;
mod types;

pub mod prelude {
    pub use crate::cli::{LoadGeneratorCli, ScenarioSelection, TickOverlap, DEFAULT_BASE_URL};
    pub use crate::definition::{LoginHook, TrafficDefinitionBuilder};
    pub use crate::dispatch::Dispatcher;
    pub use crate::driver::{DriverReport, TickSummary, TrafficDriver};
    pub use crate::init::init;
    pub use crate::run::{run, RunReport};
    pub use crate::scenario::{RequestSpec, Scenario};
    pub use crate::selection::ScenarioSelector;
    pub use crate::settings::{ConfigurationError, Settings};
    pub use crate::shutdown::ShutdownTimeout;
    pub use crate::trace::TraceContext;
    pub use crate::types::LoadGeneratorResult;

    pub use load_generator_core::prelude::{DelegatedShutdownListener, ShutdownHandle};
    pub use load_generator_instruments::{
        OutcomeCounters, OutcomeKind, OutcomeLog, ReportConfig, Reporter, RequestOutcome,
    };
    pub use reqwest::Method;
}
