//! Error types for configuration parsing and validation.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for configuration operations.
///
/// Covers errors from parsing, validation, and file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read config file '{}': {source}", path.display())]
    FileRead {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to write configuration file (for init command).
    #[error("Failed to write config file '{}': {source}", path.display())]
    FileWrite {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Invalid duration value (zero or too large).
    #[error("Invalid duration for {field}: {reason}")]
    InvalidDuration {
        /// Name of the field
        field: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// Unknown enumerator name.
    #[error("Invalid enumerator '{value}': expected sysfs, udevadm, or serialport")]
    InvalidEnumerator {
        /// The invalid value provided
        value: String,
    },

    /// The enumerator exists but is not built for this platform.
    #[error("Enumerator '{kind}' is not available on this platform")]
    UnsupportedEnumerator {
        /// Name of the requested enumerator
        kind: &'static str,
    },

    /// Unknown output format.
    #[error("Invalid output format '{value}': expected text or json")]
    InvalidFormat {
        /// The invalid value provided
        value: String,
    },

    /// A path option was set to an empty string.
    #[error("Empty path for {field}")]
    EmptyPath {
        /// Name of the field
        field: &'static str,
    },
}
