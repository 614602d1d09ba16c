use crate::cli::LoadGeneratorCli;
use clap::Parser;

/// Initialise logging and read the CLI for the load generator.
///
/// Logs go to stderr and default to `info` when `RUST_LOG` is not set, leaving stdout for the
/// outcome stream.
pub fn init() -> LoadGeneratorCli {
    // Only fails if a logger is already installed, in which case that logger is kept.
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    LoadGeneratorCli::parse()
}
