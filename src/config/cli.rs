//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::device::platform::EnumeratorKind;

use super::defaults;

/// usbcdc-monitor: USB CDC-ACM device change monitor
///
/// Lists the USB CDC-ACM serial devices currently attached, then reports
/// every device that arrives or leaves until interrupted.
#[derive(Debug, Parser)]
#[command(name = "usbcdc-monitor")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Polling interval in milliseconds
    #[arg(long = "poll-interval", value_name = "MS")]
    pub poll_interval: Option<u64>,

    /// Never launch `udevadm monitor`, use polling only
    #[arg(long = "poll-only")]
    pub poll_only: bool,

    /// Device enumerator used for the initial listing and for polling
    #[arg(long, value_enum)]
    pub enumerator: Option<EnumeratorArg>,

    /// Path to the udevadm program
    #[arg(long, value_name = "PATH")]
    pub udevadm: Option<PathBuf>,

    /// Output format for devices and events
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Path to configuration file
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short)]
    pub verbose: bool,
}

/// Subcommands for usbcdc-monitor
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = defaults::CONFIG_FILE)]
        output: PathBuf,
    },
}

/// Enumerator argument for CLI parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EnumeratorArg {
    /// Walk the sysfs device tree (Linux)
    Sysfs,
    /// Parse `udevadm info --export-db` (Linux)
    Udevadm,
    /// Query the OS serial port registry (macOS, Windows)
    #[value(name = "serialport")]
    SerialPort,
}

impl From<EnumeratorArg> for EnumeratorKind {
    fn from(arg: EnumeratorArg) -> Self {
        match arg {
            EnumeratorArg::Sysfs => Self::Sysfs,
            EnumeratorArg::Udevadm => Self::Udevadm,
            EnumeratorArg::SerialPort => Self::SerialPort,
        }
    }
}

/// How devices and events are written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `ADD 'Product'@/dev/ttyACM0`
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl OutputFormat {
    /// Returns the configuration name of this format.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
        }
    }
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Some(Command::Init { .. }))
    }
}
