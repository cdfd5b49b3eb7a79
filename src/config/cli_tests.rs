//! Tests for CLI argument parsing.

use super::cli::{Cli, Command, EnumeratorArg, OutputFormat};
use crate::device::platform::EnumeratorKind;

mod parsing {
    use super::*;

    #[test]
    fn parse_monitor_options() {
        let cli = Cli::parse_from_iter([
            "usbcdc-monitor",
            "--poll-interval",
            "250",
            "--poll-only",
            "--enumerator",
            "udevadm",
            "--udevadm",
            "/usr/bin/udevadm",
        ]);

        assert_eq!(cli.poll_interval, Some(250));
        assert!(cli.poll_only);
        assert_eq!(cli.enumerator, Some(EnumeratorArg::Udevadm));
        assert_eq!(
            cli.udevadm.as_ref().unwrap().to_str(),
            Some("/usr/bin/udevadm")
        );
    }

    #[test]
    fn parse_all_enumerators() {
        let sysfs = Cli::parse_from_iter(["usbcdc-monitor", "--enumerator", "sysfs"]);
        assert_eq!(sysfs.enumerator, Some(EnumeratorArg::Sysfs));

        let serial = Cli::parse_from_iter(["usbcdc-monitor", "--enumerator", "serialport"]);
        assert_eq!(serial.enumerator, Some(EnumeratorArg::SerialPort));
    }

    #[test]
    fn parse_output_format() {
        let cli = Cli::parse_from_iter(["usbcdc-monitor", "--format", "json"]);
        assert_eq!(cli.format, Some(OutputFormat::Json));
    }

    #[test]
    fn parse_misc_options() {
        let cli = Cli::parse_from_iter([
            "usbcdc-monitor",
            "--config",
            "/path/to/config.toml",
            "--verbose",
        ]);

        assert_eq!(
            cli.config.as_ref().unwrap().to_str(),
            Some("/path/to/config.toml")
        );
        assert!(cli.verbose);
    }

    #[test]
    fn short_flags() {
        let cli = Cli::parse_from_iter(["usbcdc-monitor", "-c", "a.toml", "-v"]);

        assert!(cli.config.is_some());
        assert!(cli.verbose);
    }

    #[test]
    fn default_values() {
        let cli = Cli::parse_from_iter(["usbcdc-monitor"]);

        // Optional fields have no defaults in CLI - None when not specified
        assert!(cli.poll_interval.is_none());
        assert!(cli.enumerator.is_none());
        assert!(cli.udevadm.is_none());
        assert!(cli.format.is_none());
        assert!(cli.config.is_none());
        // Boolean flags default to false
        assert!(!cli.poll_only);
        assert!(!cli.verbose);
    }

    #[test]
    fn rejects_unknown_enumerator() {
        let result = <Cli as clap::Parser>::try_parse_from([
            "usbcdc-monitor",
            "--enumerator",
            "registry",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_non_numeric_interval() {
        let result =
            <Cli as clap::Parser>::try_parse_from(["usbcdc-monitor", "--poll-interval", "fast"]);
        assert!(result.is_err());
    }
}

mod init_command {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn parse_init_with_default_output() {
        let cli = Cli::parse_from_iter(["usbcdc-monitor", "init"]);

        assert!(cli.is_init());
        match cli.command {
            Some(Command::Init { output }) => {
                assert_eq!(output, PathBuf::from("usbcdc-monitor.toml"));
            }
            _ => panic!("Expected Init command"),
        }
    }

    #[test]
    fn parse_init_with_custom_output() {
        let cli = Cli::parse_from_iter(["usbcdc-monitor", "init", "-o", "/custom/config.toml"]);

        match cli.command {
            Some(Command::Init { output }) => {
                assert_eq!(output, PathBuf::from("/custom/config.toml"));
            }
            _ => panic!("Expected Init command"),
        }
    }

    #[test]
    fn is_init_false_for_run_mode() {
        let cli = Cli::parse_from_iter(["usbcdc-monitor", "--poll-only"]);

        assert!(!cli.is_init());
    }
}

mod conversions {
    use super::*;

    #[test]
    fn enumerator_arg_converts_to_kind() {
        assert_eq!(
            EnumeratorKind::from(EnumeratorArg::Sysfs),
            EnumeratorKind::Sysfs
        );
        assert_eq!(
            EnumeratorKind::from(EnumeratorArg::Udevadm),
            EnumeratorKind::Udevadm
        );
        assert_eq!(
            EnumeratorKind::from(EnumeratorArg::SerialPort),
            EnumeratorKind::SerialPort
        );
    }

    #[test]
    fn output_format_defaults_to_text() {
        assert_eq!(OutputFormat::default(), OutputFormat::Text);
        assert_eq!(OutputFormat::Json.name(), "json");
    }
}
