//! usbcdc-monitor: USB CDC-ACM Device Change Monitor
//!
//! Prints the attached USB CDC-ACM serial devices, then one line per
//! arrival or removal until interrupted.

use std::path::Path;
use std::process::ExitCode;

use usbcdc_monitor::config::{Cli, Command, ValidatedConfig, write_default_config};

mod app;
mod run;

use app::{exit_code, print_config_hint, setup_tracing};

/// Main entry point.
///
/// Excluded from coverage as it's the thin wrapper around testable components.
#[cfg(not(tarpaulin_include))]
fn main() -> ExitCode {
    let cli = Cli::parse_args();

    match &cli.command {
        Some(Command::Init { output }) => write_template(output),
        None => match ValidatedConfig::load(&cli) {
            Ok(config) => {
                setup_tracing(config.verbose);
                tracing::debug!("{config}");
                monitor_devices(config)
            }
            Err(e) => {
                eprintln!("Configuration error: {e}");
                print_config_hint(&e);
                exit_code::CONFIG_ERROR
            }
        },
    }
}

/// Writes the commented configuration template for `init`.
fn write_template(output: &Path) -> ExitCode {
    if let Err(e) = write_default_config(output) {
        eprintln!("Error: {e}");
        return exit_code::CONFIG_ERROR;
    }
    println!("Configuration template written to: {}", output.display());
    exit_code::SUCCESS
}

/// Builds the runtime and runs the monitor until shutdown or failure.
///
/// Excluded from coverage - requires async runtime.
#[cfg(not(tarpaulin_include))]
fn monitor_devices(config: ValidatedConfig) -> ExitCode {
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to start async runtime: {e}");
            return exit_code::runtime_error();
        }
    };

    if let Err(e) = runtime.block_on(run::execute(config)) {
        tracing::error!("{e}");
        return exit_code::runtime_error();
    }
    exit_code::SUCCESS
}
