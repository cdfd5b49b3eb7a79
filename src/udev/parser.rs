//! Paragraph grammar and record classification for udev property dumps.
//!
//! # Grammar
//!
//! ```text
//! paragraph := (property | free_line)* blank_line
//! property  := key "=" value newline
//! free_line := (any chars except newline)+ newline
//! key       := one or more chars excluding '=' and newline
//! value     := one or more chars excluding newline
//! ```
//!
//! Free lines (such as the `UDEV  [1234.5] add /devices/... (tty)` headline
//! printed by `udevadm monitor`) are skipped.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;

use regex::bytes::{Captures, Regex};
use thiserror::Error;

use crate::device::{Device, DeviceEvent, DeviceEventKind, DeviceSet};

/// Byte sequence terminating a paragraph.
pub const PARAGRAPH_DELIMITER: &[u8] = b"\n\n";

const DRIVER_KEY: &str = "ID_USB_DRIVER";
const CDC_ACM_DRIVER: &str = "cdc_acm";
const ACTION_KEY: &str = "ACTION";
const DEVNAME_KEY: &str = "DEVNAME";
const MODEL_KEY: &str = "ID_MODEL_ENC";

/// Record prefix used for properties in `udevadm info --export-db` output.
const EXPORT_PROPERTY_PREFIX: &str = "E: ";

/// Matches udev's `\xHH` escapes. The two hex digits are captured.
static ESCAPE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\x([0-9A-Fa-f]{2})").expect("escape pattern is a valid regex")
});

/// Reasons a paragraph does not yield a record.
///
/// None of these are fatal; the caller discards the paragraph and moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// No blank line terminates the paragraph.
    #[error("Paragraph is not terminated by a blank line")]
    Unterminated,

    /// The paragraph contains no lines.
    #[error("Paragraph is empty")]
    Empty,

    /// `ID_USB_DRIVER` is absent or is not `cdc_acm`.
    #[error("Not a cdc_acm device")]
    NotCdcAcm,

    /// `ACTION` is absent or is neither `add` nor `remove`.
    #[error("Unrecognized ACTION '{0}'")]
    UnknownAction(String),

    /// A required property is absent or empty.
    #[error("Missing property {0}")]
    MissingField(&'static str),
}

/// Property mapping parsed from one paragraph.
///
/// Keys and values borrow from the input buffer unless they hold bytes
/// that are not UTF-8, which are replaced with U+FFFD. When a key repeats,
/// the first occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties<'a> {
    map: HashMap<Cow<'a, str>, Cow<'a, str>>,
}

impl<'a> Properties<'a> {
    /// Parses the first paragraph of `buf`.
    ///
    /// Bytes after the paragraph's terminating blank line are ignored;
    /// use [`paragraph_end`] to find where the next paragraph starts.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Unterminated`] if `buf` holds no blank line and
    /// [`ParseError::Empty`] for a paragraph without lines.
    pub fn parse(buf: &'a [u8]) -> Result<Self, ParseError> {
        let end = paragraph_end(buf, 0).ok_or(ParseError::Unterminated)?;
        let body = &buf[..end - PARAGRAPH_DELIMITER.len()];
        if body.is_empty() {
            return Err(ParseError::Empty);
        }

        let mut map = HashMap::new();
        for line in body.split(|&byte| byte == b'\n') {
            if let Some((key, value)) = split_property(line) {
                map.entry(key).or_insert(value);
            }
        }
        Ok(Self { map })
    }

    /// Returns the value of `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(AsRef::as_ref)
    }

    /// Returns the number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if the paragraph held only free lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    fn require(&self, key: &'static str) -> Result<&str, ParseError> {
        self.get(key)
            .filter(|value| !value.is_empty())
            .ok_or(ParseError::MissingField(key))
    }

    fn require_cdc_acm(&self) -> Result<(), ParseError> {
        if self.get(DRIVER_KEY) == Some(CDC_ACM_DRIVER) {
            Ok(())
        } else {
            Err(ParseError::NotCdcAcm)
        }
    }
}

/// Splits a `key=value` line. Lines that are not properties yield `None`.
fn split_property(line: &[u8]) -> Option<(Cow<'_, str>, Cow<'_, str>)> {
    let eq = line.iter().position(|&byte| byte == b'=')?;
    let (key, value) = (&line[..eq], &line[eq + 1..]);
    let key = key
        .strip_prefix(EXPORT_PROPERTY_PREFIX.as_bytes())
        .unwrap_or(key);
    (!key.is_empty() && !value.is_empty())
        .then(|| (String::from_utf8_lossy(key), String::from_utf8_lossy(value)))
}

/// Returns the offset just past the first paragraph delimiter at or after `from`.
#[must_use]
pub fn paragraph_end(buf: &[u8], from: usize) -> Option<usize> {
    buf.get(from..)?
        .windows(PARAGRAPH_DELIMITER.len())
        .position(|window| window == PARAGRAPH_DELIMITER)
        .map(|pos| from + pos + PARAGRAPH_DELIMITER.len())
}

/// Decodes udev `\xHH` escapes.
///
/// Every non-overlapping four-character `\xHH` match is replaced by the
/// single byte whose value is the two hex digits. Everything else,
/// including backslashes not followed by `x` and two hex digits, is kept
/// verbatim. Decoded bytes that do not form valid UTF-8 are replaced with
/// U+FFFD.
#[must_use]
pub fn decode_escapes(raw: &str) -> String {
    let decoded = ESCAPE_PATTERN.replace_all(raw.as_bytes(), |caps: &Captures<'_>| {
        let digits = &caps[1];
        match (hex_value(digits[0]), hex_value(digits[1])) {
            (Some(high), Some(low)) => vec![(high << 4) | low],
            _ => caps[0].to_vec(),
        }
    });
    String::from_utf8_lossy(&decoded).into_owned()
}

const fn hex_value(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        _ => None,
    }
}

/// Parses an event paragraph from `udevadm monitor --property`.
///
/// Classification order: the driver must be `cdc_acm`, `ACTION` must be
/// `add` or `remove`, `DEVNAME` becomes the path verbatim, and the decoded
/// `ID_MODEL_ENC` becomes the product string (empty if absent).
///
/// # Errors
///
/// Returns a [`ParseError`] if the paragraph is malformed or not relevant.
pub fn parse_event(paragraph: &[u8]) -> Result<DeviceEvent, ParseError> {
    let properties = Properties::parse(paragraph)?;
    properties.require_cdc_acm()?;

    let kind = match properties.get(ACTION_KEY) {
        Some("add") => DeviceEventKind::Add,
        Some("remove") => DeviceEventKind::Remove,
        other => {
            return Err(ParseError::UnknownAction(
                other.unwrap_or_default().to_string(),
            ));
        }
    };

    let path = properties.require(DEVNAME_KEY)?;
    let product = properties
        .get(MODEL_KEY)
        .map(decode_escapes)
        .unwrap_or_default();

    Ok(DeviceEvent::new(kind, Device::new(path, product)))
}

/// Parses a device paragraph from a one-shot property dump.
///
/// No `ACTION` is required, but both `DEVNAME` and a non-empty decoded
/// `ID_MODEL_ENC` are.
///
/// # Errors
///
/// Returns a [`ParseError`] if the paragraph is malformed, not relevant or
/// incomplete.
pub fn parse_device(paragraph: &[u8]) -> Result<Device, ParseError> {
    let properties = Properties::parse(paragraph)?;
    properties.require_cdc_acm()?;

    let path = properties.require(DEVNAME_KEY)?;
    let product = decode_escapes(properties.require(MODEL_KEY)?);

    let device = Device::new(path, product);
    if device.is_complete() {
        Ok(device)
    } else {
        Err(ParseError::MissingField(MODEL_KEY))
    }
}

/// Parses every device paragraph in a dump, omitting irrelevant ones.
///
/// A final paragraph missing its blank line is still considered.
#[must_use]
pub fn parse_device_listing(buf: &[u8]) -> DeviceSet {
    let terminated;
    let buf = if buf.is_empty() || buf.ends_with(PARAGRAPH_DELIMITER) {
        buf
    } else if buf.ends_with(b"\n") {
        terminated = [buf, b"\n".as_slice()].concat();
        &terminated
    } else {
        terminated = [buf, PARAGRAPH_DELIMITER].concat();
        &terminated
    };

    let mut devices = Vec::new();
    let mut start = 0;
    while let Some(end) = paragraph_end(buf, start) {
        match parse_device(&buf[start..end]) {
            Ok(device) => devices.push(device),
            Err(e) => tracing::trace!("Skipping listing paragraph: {e}"),
        }
        start = end;
    }
    devices.into_iter().collect()
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
