//! Stream-based change source.
//!
//! [`StreamSource`] reads blank-line-delimited paragraphs from the standard
//! output of a `udevadm monitor --property` process and turns each relevant
//! one into a [`DeviceEvent`].

use std::collections::VecDeque;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, ChildStdout};

use super::source::{ChangeSource, SourceMode};
use super::{MonitorError, TransportError};
use crate::device::DeviceEvent;
use crate::udev::{PARAGRAPH_DELIMITER, paragraph_end, parse_event};

/// Initial capacity of the paragraph buffer. Typical paragraphs are 1-2 KiB.
const INITIAL_BUFFER_CAPACITY: usize = 4096;

/// A [`ChangeSource`] fed by a byte stream of udev property paragraphs.
///
/// Each call to [`ChangeSource::next_changes`] consumes exactly one
/// paragraph, reading more bytes as needed. Paragraphs that fail to parse
/// or describe other drivers are discarded. End of stream is reported as
/// [`TransportError::Closed`].
///
/// When built by [`super::platform::MonitorCommand::spawn`] the source owns
/// the monitor process and kills it on shutdown or drop.
#[derive(Debug)]
pub struct StreamSource<R = ChildStdout> {
    reader: R,
    buf: Vec<u8>,
    /// Offset from which to look for the next delimiter. Bytes before it
    /// are known not to contain one.
    scan_from: usize,
    child: Option<Child>,
}

impl<R> StreamSource<R>
where
    R: AsyncRead + Unpin + Send,
{
    /// Creates a stream source over `reader`.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::with_capacity(INITIAL_BUFFER_CAPACITY),
            scan_from: 0,
            child: None,
        }
    }

    /// Creates a stream source that owns the process writing to `reader`.
    pub(crate) fn with_child(reader: R, child: Child) -> Self {
        Self {
            child: Some(child),
            ..Self::new(reader)
        }
    }

    /// Returns the number of buffered bytes not yet consumed.
    #[must_use]
    pub fn buffered_len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true while an owned monitor process has not been shut down.
    #[must_use]
    pub const fn owns_process(&self) -> bool {
        self.child.is_some()
    }

    /// Removes and returns the first complete paragraph, if one is buffered.
    fn take_paragraph(&mut self) -> Option<Vec<u8>> {
        let end = paragraph_end(&self.buf, self.scan_from)?;
        self.scan_from = 0;
        Some(self.buf.drain(..end).collect())
    }
}

impl<R> ChangeSource for StreamSource<R>
where
    R: AsyncRead + Unpin + Send,
{
    fn mode(&self) -> SourceMode {
        SourceMode::Streaming
    }

    async fn next_changes(
        &mut self,
        pending: &mut VecDeque<DeviceEvent>,
    ) -> Result<(), MonitorError> {
        loop {
            if let Some(paragraph) = self.take_paragraph() {
                match parse_event(&paragraph) {
                    Ok(event) => {
                        tracing::debug!("Received {event}");
                        pending.push_back(event);
                    }
                    Err(e) => {
                        tracing::debug!("Discarding paragraph ({} bytes): {e}", paragraph.len());
                    }
                }
                return Ok(());
            }

            // A delimiter may straddle the old and new bytes.
            self.scan_from = self
                .buf
                .len()
                .saturating_sub(PARAGRAPH_DELIMITER.len() - 1);

            let read = self
                .reader
                .read_buf(&mut self.buf)
                .await
                .map_err(TransportError::Read)?;
            if read == 0 {
                tracing::debug!(
                    "Event stream ended with {} unconsumed byte(s)",
                    self.buf.len()
                );
                return Err(TransportError::Closed.into());
            }
        }
    }

    fn shutdown(&mut self) {
        if let Some(mut child) = self.child.take() {
            match child.start_kill() {
                Ok(()) => tracing::debug!("Stopped monitor process"),
                Err(e) => tracing::debug!("Monitor process already gone: {e}"),
            }
        }
    }
}

#[cfg(test)]
#[path = "stream_tests.rs"]
mod tests;
