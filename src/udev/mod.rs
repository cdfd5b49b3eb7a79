//! Parsing of udev property dumps.
//!
//! `udevadm monitor --property` and `udevadm info --export-db` both print
//! one blank-line-terminated paragraph of `KEY=value` lines per device.
//! This module turns such paragraphs into typed records:
//! - Paragraph grammar ([`Properties`], [`paragraph_end`])
//! - Escape decoding of `ID_MODEL_ENC` ([`decode_escapes`])
//! - Record classification ([`parse_event`], [`parse_device`], [`parse_device_listing`])

mod parser;

pub use parser::{
    PARAGRAPH_DELIMITER, ParseError, Properties, decode_escapes, paragraph_end, parse_device,
    parse_device_listing, parse_event,
};
