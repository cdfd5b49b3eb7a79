//! Application execution logic.
//!
//! This module contains the main async loop that prints the initial device
//! listing and then every device change until shutdown.

use std::future::Future;
use std::io::{self, Write};
use std::sync::Arc;

use thiserror::Error;
use tokio::signal;

use usbcdc_monitor::config::{OutputFormat, ValidatedConfig};
use usbcdc_monitor::device::platform::create_enumerator;
use usbcdc_monitor::device::{Device, DeviceEnumerator, DeviceEvent, EnumerateError};
use usbcdc_monitor::monitor::platform::has_event_stream;
use usbcdc_monitor::monitor::{ChangeSource, DeviceMonitor, MonitorError};

#[cfg(target_os = "linux")]
use usbcdc_monitor::monitor::platform::MonitorCommand;

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// Failed to create the device enumerator.
    #[error("Failed to create device enumerator: {0}")]
    Enumerator(#[source] EnumerateError),

    /// Failed to list the devices present at startup.
    #[error("Failed to list initial devices: {0}")]
    InitialFetch(#[source] MonitorError),

    /// The monitor failed while waiting for changes.
    #[error("Device monitor failed: {0}")]
    Monitor(#[source] MonitorError),

    /// Failed to write to stdout.
    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),

    /// Failed to encode a JSON line.
    #[error("Failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Executes the main application loop.
///
/// This function:
/// 1. Creates the configured device enumerator
/// 2. Launches `udevadm monitor` unless polling only, falling back to polling
///    if it cannot be started
/// 3. Prints the initial devices and every change until shutdown (Ctrl+C)
///
/// # Errors
///
/// Returns an error if:
/// - The enumerator is not available
/// - The initial listing fails
/// - The event stream ends or cannot be read
/// - Writing to stdout fails
///
/// # Coverage Note
///
/// This function is excluded from coverage because it requires:
/// - Platform device enumeration
/// - Real async runtime with signal handling
#[cfg(not(tarpaulin_include))]
pub async fn execute(config: ValidatedConfig) -> Result<(), RunError> {
    let enumerator: Arc<dyn DeviceEnumerator> = Arc::from(
        create_enumerator(config.enumerator, &config.udevadm).map_err(RunError::Enumerator)?,
    );
    let mut stdout = io::stdout();

    #[cfg(target_os = "linux")]
    if !config.poll_only {
        let command =
            MonitorCommand::new(&config.udevadm).with_line_buffering(config.line_buffered);
        match command.spawn() {
            Ok(source) => {
                tracing::info!("Streaming udev events from {}", command.udevadm().display());
                let monitor = DeviceMonitor::new(enumerator, source);
                return run_monitor(monitor, config.format, &mut stdout, shutdown_signal()).await;
            }
            Err(e) => {
                tracing::warn!("{e}, falling back to polling");
            }
        }
    }

    if !config.poll_only && !has_event_stream() {
        tracing::info!("No device event stream on this platform");
    }
    tracing::info!(
        "Polling devices every {}ms",
        config.poll_interval.as_millis()
    );

    let monitor = DeviceMonitor::polling(enumerator, config.poll_interval);
    run_monitor(monitor, config.format, &mut stdout, shutdown_signal()).await
}

/// Prints the initial devices, then every event until `shutdown` completes.
///
/// `shutdown` closes the monitor through its [`CloseHandle`], so the
/// resulting [`MonitorError::Aborted`] ends the loop cleanly. Enumeration
/// failures while polling are logged and retried on the next tick; any
/// other monitor error is terminal.
///
/// [`CloseHandle`]: usbcdc_monitor::monitor::CloseHandle
async fn run_monitor<E, S, W, F>(
    mut monitor: DeviceMonitor<E, S>,
    format: OutputFormat,
    out: &mut W,
    shutdown: F,
) -> Result<(), RunError>
where
    E: DeviceEnumerator,
    S: ChangeSource,
    W: Write,
    F: Future<Output = ()> + Send + 'static,
{
    let handle = monitor.close_handle();
    let watcher = tokio::spawn(async move {
        shutdown.await;
        tracing::info!("Shutdown signal received, stopping...");
        handle.close();
    });

    let result = print_changes(&mut monitor, format, out).await;

    watcher.abort();
    monitor.close();
    result
}

async fn print_changes<E, S, W>(
    monitor: &mut DeviceMonitor<E, S>,
    format: OutputFormat,
    out: &mut W,
) -> Result<(), RunError>
where
    E: DeviceEnumerator,
    S: ChangeSource,
    W: Write,
{
    let devices = match monitor.fetch_initial_devices() {
        Ok(devices) => devices,
        Err(e) if e.is_aborted() => return Ok(()),
        Err(e) => return Err(RunError::InitialFetch(e)),
    };
    for device in &devices {
        emit(out, &format_device(device, format)?)?;
    }

    loop {
        match monitor.receive_next_event().await {
            Ok(event) => emit(out, &format_event(&event, format)?)?,
            Err(e) if e.is_aborted() => return Ok(()),
            Err(MonitorError::Enumerate(e)) => {
                tracing::warn!("Device enumeration failed, retrying: {e}");
            }
            Err(e) => return Err(RunError::Monitor(e)),
        }
    }
}

/// Formats a device from the initial listing.
fn format_device(device: &Device, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Text => Ok(device.to_string()),
        OutputFormat::Json => serde_json::to_string(device),
    }
}

/// Formats a device event.
fn format_event(event: &DeviceEvent, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Text => Ok(event.to_string()),
        OutputFormat::Json => serde_json::to_string(event),
    }
}

/// Writes one line and flushes, so piped consumers see it immediately.
fn emit<W: Write>(out: &mut W, line: &str) -> io::Result<()> {
    writeln!(out, "{line}")?;
    out.flush()
}

/// Returns a future that completes when a shutdown signal is received.
///
/// Excluded from coverage - requires OS signal handling.
#[cfg(not(tarpaulin_include))]
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
