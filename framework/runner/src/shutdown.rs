#[cfg(unix)]
use std::future::Future;
use std::time::Duration;

use load_generator_core::prelude::ShutdownHandle;

/// In-flight ticks were still running when the shutdown grace period ran out.
#[derive(derive_more::Error, derive_more::Display, Debug)]
#[display(
    "{abandoned} tick(s) still in flight after the {}s shutdown grace period, abandoning them",
    grace.as_secs_f64()
)]
pub struct ShutdownTimeout {
    pub abandoned: usize,
    pub grace: Duration,
}

/// Trigger the shutdown handle on Ctrl-C or, on unix, SIGTERM.
pub(crate) fn start_shutdown_listener(
    runtime: &tokio::runtime::Runtime,
) -> anyhow::Result<ShutdownHandle> {
    let handle = ShutdownHandle::default();

    #[cfg(unix)]
    let mut sigterm = {
        // Registering needs a runtime context.
        let _guard = runtime.enter();
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?
    };

    let listener_handle = handle.clone();
    runtime.spawn(async move {
        #[cfg(unix)]
        let signal_name = first_signal(wait_for_ctrl_c(), sigterm.recv()).await;

        #[cfg(not(unix))]
        let signal_name = {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("Failed to listen for Ctrl-C: {e}");
                return;
            }
            "Ctrl-C"
        };

        log::info!("Received {signal_name}, shutting down...");
        listener_handle.shutdown();
    });

    Ok(handle)
}

#[cfg(unix)]
async fn wait_for_ctrl_c() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await.inspect_err(|e| {
        log::error!("Failed to listen for Ctrl-C, only SIGTERM will stop the run: {e}");
    })
}

/// Name of the first signal to arrive. A Ctrl-C listener that fails leaves SIGTERM in charge.
#[cfg(unix)]
async fn first_signal(
    ctrl_c: impl Future<Output = std::io::Result<()>>,
    sigterm: impl Future<Output = Option<()>>,
) -> &'static str {
    tokio::select! {
        Ok(()) = ctrl_c => "SIGINT",
        _ = sigterm => "SIGTERM",
    }
}
