//! Tests for CLI vs TOML precedence rules.

use std::path::PathBuf;
use std::time::Duration;

use crate::config::OutputFormat;
use crate::device::platform::EnumeratorKind;

use super::*;

mod defaults {
    use super::*;

    #[test]
    fn empty_sources_use_defaults() {
        let config = ValidatedConfig::from_raw(&cli(&[]), None).unwrap();

        assert_eq!(config.poll_interval, Duration::from_millis(500));
        assert!(!config.poll_only);
        assert_eq!(config.enumerator, EnumeratorKind::platform_default());
        assert_eq!(config.udevadm, PathBuf::from("udevadm"));
        assert!(config.line_buffered);
        assert_eq!(config.format, OutputFormat::Text);
        assert!(!config.verbose);
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config = ValidatedConfig::from_raw(&cli(&[]), Some(&toml(""))).unwrap();

        assert_eq!(config.poll_interval, Duration::from_millis(500));
        assert!(config.line_buffered);
    }
}

mod cli_precedence {
    use super::*;

    #[test]
    fn cli_poll_interval_overrides_toml() {
        let toml = toml("[monitor]\npoll_interval_ms = 2000\n");

        let config =
            ValidatedConfig::from_raw(&cli(&["--poll-interval", "100"]), Some(&toml)).unwrap();

        assert_eq!(config.poll_interval, Duration::from_millis(100));
    }

    #[test]
    fn toml_poll_interval_used_without_cli() {
        let toml = toml("[monitor]\npoll_interval_ms = 2000\n");

        let config = ValidatedConfig::from_raw(&cli(&[]), Some(&toml)).unwrap();

        assert_eq!(config.poll_interval, Duration::from_secs(2));
    }

    #[test]
    fn cli_format_overrides_toml() {
        let toml = toml("[output]\nformat = \"json\"\n");

        let config = ValidatedConfig::from_raw(&cli(&["--format", "text"]), Some(&toml)).unwrap();

        assert_eq!(config.format, OutputFormat::Text);
    }

    #[test]
    fn toml_format_is_case_insensitive() {
        let toml = toml("[output]\nformat = \"JSON\"\n");

        let config = ValidatedConfig::from_raw(&cli(&[]), Some(&toml)).unwrap();

        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn cli_udevadm_overrides_toml() {
        let toml = toml("[monitor]\nudevadm = \"/toml/udevadm\"\n");

        let config =
            ValidatedConfig::from_raw(&cli(&["--udevadm", "/cli/udevadm"]), Some(&toml)).unwrap();

        assert_eq!(config.udevadm, PathBuf::from("/cli/udevadm"));
    }

    #[test]
    fn toml_line_buffered_can_disable() {
        let toml = toml("[monitor]\nline_buffered = false\n");

        let config = ValidatedConfig::from_raw(&cli(&[]), Some(&toml)).unwrap();

        assert!(!config.line_buffered);
    }
}

mod boolean_flags {
    use super::*;

    #[test]
    fn poll_only_from_cli() {
        let config = ValidatedConfig::from_raw(&cli(&["--poll-only"]), None).unwrap();
        assert!(config.poll_only);
    }

    #[test]
    fn poll_only_from_toml_cannot_be_disabled_by_cli() {
        let toml = toml("[monitor]\npoll_only = true\n");

        let config = ValidatedConfig::from_raw(&cli(&[]), Some(&toml)).unwrap();

        assert!(config.poll_only);
    }

    #[test]
    fn verbose_from_cli() {
        let config = ValidatedConfig::from_raw(&cli(&["-v"]), None).unwrap();
        assert!(config.verbose);
    }
}

mod enumerator {
    use super::*;

    #[cfg(target_os = "linux")]
    #[test]
    fn cli_enumerator_overrides_toml() {
        let toml = toml("[monitor]\nenumerator = \"sysfs\"\n");

        let config =
            ValidatedConfig::from_raw(&cli(&["--enumerator", "udevadm"]), Some(&toml)).unwrap();

        assert_eq!(config.enumerator, EnumeratorKind::Udevadm);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn toml_enumerator_accepts_alias() {
        let toml = toml("[monitor]\nenumerator = \"udev\"\n");

        let config = ValidatedConfig::from_raw(&cli(&[]), Some(&toml)).unwrap();

        assert_eq!(config.enumerator, EnumeratorKind::Udevadm);
    }

    #[test]
    fn unknown_toml_enumerator_rejected() {
        let toml = toml("[monitor]\nenumerator = \"registry\"\n");

        let result = ValidatedConfig::from_raw(&cli(&[]), Some(&toml));

        assert!(matches!(
            result,
            Err(ConfigError::InvalidEnumerator { ref value }) if value == "registry"
        ));
    }

    #[test]
    fn unsupported_enumerator_rejected() {
        let name = if cfg!(target_os = "linux") {
            "serialport"
        } else {
            "sysfs"
        };

        let result = ValidatedConfig::from_raw(&cli(&["--enumerator", name]), None);

        assert!(matches!(
            result,
            Err(ConfigError::UnsupportedEnumerator { kind }) if kind == name
        ));
    }
}

mod invalid_values {
    use super::*;

    #[test]
    fn zero_poll_interval_rejected() {
        let result = ValidatedConfig::from_raw(&cli(&["--poll-interval", "0"]), None);

        assert!(matches!(
            result,
            Err(ConfigError::InvalidDuration {
                field: "poll_interval",
                ..
            })
        ));
    }

    #[test]
    fn zero_toml_poll_interval_rejected() {
        let toml = toml("[monitor]\npoll_interval_ms = 0\n");

        let result = ValidatedConfig::from_raw(&cli(&[]), Some(&toml));

        assert!(matches!(result, Err(ConfigError::InvalidDuration { .. })));
    }

    #[test]
    fn unknown_format_rejected() {
        let toml = toml("[output]\nformat = \"yaml\"\n");

        let result = ValidatedConfig::from_raw(&cli(&[]), Some(&toml));

        assert!(matches!(result, Err(ConfigError::InvalidFormat { .. })));
    }

    #[test]
    fn empty_udevadm_rejected() {
        let toml = toml("[monitor]\nudevadm = \"\"\n");

        let result = ValidatedConfig::from_raw(&cli(&[]), Some(&toml));

        assert!(matches!(
            result,
            Err(ConfigError::EmptyPath { field: "udevadm" })
        ));
    }
}

mod display {
    use super::*;

    #[test]
    fn display_summarizes_settings() {
        let config = ValidatedConfig::from_raw(&cli(&["--poll-interval", "750"]), None).unwrap();

        let text = config.to_string();

        assert!(text.contains("poll_interval: 750ms"));
        assert!(text.contains("format: text"));
    }
}
