// Signal handling module
//
// Supported signals:
// - SIGINT:  stop serving (Ctrl+C)
// - SIGTERM: stop serving

/// Resolve when the process is asked to terminate (Unix)
///
/// | Signal  | Action       |
/// |---------|--------------|
/// | SIGINT  | Stop serving |
/// | SIGTERM | Stop serving |
#[cfg(unix)]
pub async fn wait_for_termination() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    tokio::select! {
        _ = sigterm.recv() => {}
        _ = sigint.recv() => {}
    }
    Ok(())
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub async fn wait_for_termination() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
