//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Change detection configuration
    #[serde(default)]
    pub monitor: MonitorSection,

    /// Output configuration
    #[serde(default)]
    pub output: OutputSection,
}

/// Change detection configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MonitorSection {
    /// Polling interval in milliseconds
    pub poll_interval_ms: Option<u64>,

    /// Never launch `udevadm monitor`, use polling only
    #[serde(default)]
    pub poll_only: bool,

    /// Device enumerator: "sysfs", "udevadm" or "serialport"
    pub enumerator: Option<String>,

    /// Path to the udevadm program
    pub udevadm: Option<String>,

    /// Wrap `udevadm monitor` in `stdbuf -oL`
    pub line_buffered: Option<bool>,
}

/// Output configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    /// Output format: "text" or "json"
    pub format: Option<String>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# usbcdc-monitor configuration file

[monitor]
# Polling interval in milliseconds (default: 500)
# Only used when polling; the udev event stream reports changes immediately.
poll_interval_ms = 500

# Never launch `udevadm monitor`, use polling only
# poll_only = false

# Device enumerator for the initial listing and for polling
# Accepted values: "sysfs" (Linux default), "udevadm" (Linux),
# "serialport" (default elsewhere)
# enumerator = "sysfs"

# Path to the udevadm program (default: looked up on PATH)
# udevadm = "/usr/bin/udevadm"

# Wrap `udevadm monitor` in `stdbuf -oL` so events are not held back
# by pipe buffering (default: true)
# line_buffered = true

[output]
# Output format: "text" or "json" (one object per line)
# format = "text"
"#
    .to_string()
}
