//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::ValueEnum;

use crate::device::platform::EnumeratorKind;

use super::cli::{Cli, OutputFormat};
use super::defaults;
use super::error::ConfigError;
use super::toml::TomlConfig;

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
/// The function validates all inputs and returns errors for invalid configurations.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Polling interval
    pub poll_interval: Duration,

    /// Whether to use polling only (no `udevadm monitor`)
    pub poll_only: bool,

    /// Enumerator for the initial listing and for polling
    pub enumerator: EnumeratorKind,

    /// The udevadm program
    pub udevadm: PathBuf,

    /// Whether `udevadm monitor` is wrapped in `stdbuf -oL`
    pub line_buffered: bool,

    /// Output format
    pub format: OutputFormat,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Config {{ enumerator: {}, poll_interval: {}ms, poll_only: {}, udevadm: {}, \
             line_buffered: {}, format: {} }}",
            self.enumerator,
            self.poll_interval.as_millis(),
            self.poll_only,
            self.udevadm.display(),
            self.line_buffered,
            self.format.name(),
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The poll interval is zero
    /// - The enumerator or format name is unknown
    /// - The enumerator is not available on this platform
    /// - The udevadm path is empty
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let poll_interval = Self::resolve_poll_interval(cli, toml)?;

        // Flags only enable
        let poll_only = cli.poll_only || toml.is_some_and(|t| t.monitor.poll_only);

        let enumerator = Self::resolve_enumerator(cli, toml)?;
        let udevadm = Self::resolve_udevadm(cli, toml)?;

        let line_buffered = toml
            .and_then(|t| t.monitor.line_buffered)
            .unwrap_or(defaults::LINE_BUFFERED);

        let format = Self::resolve_format(cli, toml)?;

        Ok(Self {
            poll_interval,
            poll_only,
            enumerator,
            udevadm,
            line_buffered,
            format,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_poll_interval(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<Duration, ConfigError> {
        // Priority: CLI explicit > TOML > default
        let millis = cli
            .poll_interval
            .or_else(|| toml.and_then(|t| t.monitor.poll_interval_ms))
            .unwrap_or(defaults::POLL_INTERVAL_MS);

        if millis == 0 {
            return Err(ConfigError::InvalidDuration {
                field: "poll_interval",
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(Duration::from_millis(millis))
    }

    fn resolve_enumerator(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<EnumeratorKind, ConfigError> {
        let kind = if let Some(arg) = cli.enumerator {
            arg.into()
        } else if let Some(name) = toml.and_then(|t| t.monitor.enumerator.as_deref()) {
            EnumeratorKind::parse(name).ok_or_else(|| ConfigError::InvalidEnumerator {
                value: name.to_string(),
            })?
        } else {
            EnumeratorKind::platform_default()
        };

        if kind.is_supported() {
            Ok(kind)
        } else {
            Err(ConfigError::UnsupportedEnumerator { kind: kind.name() })
        }
    }

    fn resolve_udevadm(cli: &Cli, toml: Option<&TomlConfig>) -> Result<PathBuf, ConfigError> {
        let path = cli
            .udevadm
            .clone()
            .or_else(|| toml.and_then(|t| t.monitor.udevadm.as_ref().map(PathBuf::from)))
            .unwrap_or_else(|| PathBuf::from(defaults::UDEVADM));

        if path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyPath { field: "udevadm" });
        }
        Ok(path)
    }

    fn resolve_format(cli: &Cli, toml: Option<&TomlConfig>) -> Result<OutputFormat, ConfigError> {
        if let Some(format) = cli.format {
            return Ok(format);
        }

        toml.and_then(|t| t.output.format.as_deref())
            .map_or(Ok(OutputFormat::default()), |value| {
                OutputFormat::from_str(value.trim(), true).map_err(|_| {
                    ConfigError::InvalidFormat {
                        value: value.to_string(),
                    }
                })
            })
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}
