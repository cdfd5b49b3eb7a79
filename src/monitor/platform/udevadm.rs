//! Linux event stream backed by `udevadm monitor`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::{ChildStdout, Command};

use crate::monitor::{StreamSource, TransportError};

/// Wrapper that switches the monitor's stdout to line buffering.
const STDBUF_PROGRAM: &str = "stdbuf";

/// Arguments selecting udev (post-rule) events for the tty subsystem,
/// printed with all properties.
const MONITOR_ARGS: [&str; 4] = [
    "monitor",
    "--udev",
    "--property",
    "--subsystem-match=tty",
];

/// Launcher for the `udevadm monitor` process feeding a [`StreamSource`].
///
/// The process is started as
/// `[stdbuf -oL] udevadm monitor --udev --property --subsystem-match=tty`
/// with stdin and stderr closed. Without `stdbuf`, `udevadm` block-buffers
/// its output when writing to a pipe and events arrive late.
///
/// # Example
///
/// ```no_run
/// use usbcdc_monitor::monitor::platform::MonitorCommand;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let source = MonitorCommand::new("udevadm").spawn()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MonitorCommand {
    udevadm: PathBuf,
    line_buffered: bool,
}

impl MonitorCommand {
    /// Creates a launcher for `udevadm`, line buffered.
    #[must_use]
    pub fn new(udevadm: impl Into<PathBuf>) -> Self {
        Self {
            udevadm: udevadm.into(),
            line_buffered: true,
        }
    }

    /// Sets whether the process is wrapped in `stdbuf -oL`.
    #[must_use]
    pub const fn with_line_buffering(mut self, line_buffered: bool) -> Self {
        self.line_buffered = line_buffered;
        self
    }

    /// Returns the `udevadm` program.
    #[must_use]
    pub fn udevadm(&self) -> &Path {
        &self.udevadm
    }

    /// Returns the program that is executed.
    #[must_use]
    pub fn program(&self) -> &Path {
        if self.line_buffered {
            Path::new(STDBUF_PROGRAM)
        } else {
            &self.udevadm
        }
    }

    /// Returns the arguments passed to [`MonitorCommand::program`].
    #[must_use]
    pub fn args(&self) -> Vec<OsString> {
        let mut args = Vec::with_capacity(MONITOR_ARGS.len() + 2);
        if self.line_buffered {
            args.push(OsString::from("-oL"));
            args.push(self.udevadm.clone().into_os_string());
        }
        args.extend(MONITOR_ARGS.iter().map(OsString::from));
        args
    }

    /// Starts the monitor process.
    ///
    /// Must be called from within a tokio runtime. The returned source owns
    /// the process; it is killed when the source shuts down or is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Spawn`] if the process cannot be started.
    pub fn spawn(&self) -> Result<StreamSource<ChildStdout>, TransportError> {
        let program = self.program().display().to_string();
        let mut child = Command::new(self.program())
            .args(self.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| TransportError::Spawn {
                program: program.clone(),
                source,
            })?;

        let stdout = child.stdout.take().ok_or_else(|| TransportError::Spawn {
            program: program.clone(),
            source: std::io::Error::other("stdout was not captured"),
        })?;

        tracing::debug!(
            "Started '{program}' (pid {})",
            child.id().map_or_else(|| "?".to_string(), |id| id.to_string())
        );
        Ok(StreamSource::with_child(stdout, child))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::{ChangeSource, MonitorError};
    use std::collections::VecDeque;

    #[test]
    fn line_buffered_command_wraps_in_stdbuf() {
        let command = MonitorCommand::new("/usr/bin/udevadm");

        assert_eq!(command.program(), Path::new("stdbuf"));
        assert_eq!(
            command.args(),
            vec![
                "-oL",
                "/usr/bin/udevadm",
                "monitor",
                "--udev",
                "--property",
                "--subsystem-match=tty"
            ]
        );
    }

    #[test]
    fn unbuffered_command_runs_udevadm_directly() {
        let command = MonitorCommand::new("udevadm").with_line_buffering(false);

        assert_eq!(command.program(), Path::new("udevadm"));
        assert_eq!(command.udevadm(), Path::new("udevadm"));
        assert_eq!(command.args()[0], "monitor");
    }

    #[tokio::test]
    async fn missing_program_is_spawn_error() {
        let command =
            MonitorCommand::new("/nonexistent/usbcdc-monitor/udevadm").with_line_buffering(false);

        let result = command.spawn();

        match result {
            Err(TransportError::Spawn { program, .. }) => {
                assert!(program.ends_with("udevadm"));
            }
            other => panic!("expected Spawn error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn exiting_process_closes_stream() {
        // `echo` prints its arguments as one line and exits.
        let mut source = MonitorCommand::new("echo")
            .with_line_buffering(false)
            .spawn()
            .unwrap();
        assert!(source.owns_process());
        let mut pending = VecDeque::new();

        let result = source.next_changes(&mut pending).await;

        assert!(matches!(
            result,
            Err(MonitorError::Transport(TransportError::Closed))
        ));
        assert!(pending.is_empty());
    }

    #[tokio::test]
    async fn shutdown_releases_process() {
        let mut source = MonitorCommand::new("sleep")
            .with_line_buffering(false)
            .spawn()
            .unwrap();

        source.shutdown();

        assert!(!source.owns_process());
    }
}
