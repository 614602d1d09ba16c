/// Recommended error type for your load generator `main` function. Configuration errors
/// propagated with `?` end the process with a non-zero exit code.
pub type LoadGeneratorResult<T> = anyhow::Result<T>;
