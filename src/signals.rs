//! OS signal handling for graceful watcher shutdown.
//!
//! [`wait_for_shutdown_signal`] completes when the process receives a
//! termination signal; callers typically cancel the watcher's
//! [`CancellationToken`](tokio_util::sync::CancellationToken) in
//! response.
//!
//! On Unix the handled signals are SIGHUP, SIGINT, SIGTERM and SIGQUIT,
//! with [`tokio::signal::ctrl_c`] awaited as a fallback. Elsewhere only
//! ctrl-c is awaited.

#[cfg(unix)]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sighup = signal(SignalKind::hangup())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigquit = signal(SignalKind::quit())?;

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {},
        _ = sighup.recv() => {},
        _ = sigint.recv() => {},
        _ = sigterm.recv() => {},
        _ = sigquit.recv() => {},
    }
    Ok(())
}

#[cfg(not(unix))]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
