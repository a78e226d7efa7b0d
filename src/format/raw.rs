use super::{Formatter, INVALID_MESSAGE};
use crate::record::{Record, Value, MESSAGE_KEY};

/// Minimal formatter used when a logger has none configured.
///
/// Writes the raw bytes of `message` when it is a string or a byte buffer,
/// [`INVALID_MESSAGE`] otherwise. No newline is appended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawFormatter;

impl Formatter for RawFormatter {
    fn render(&self, record: &Record) -> Vec<u8> {
        match record.get(MESSAGE_KEY) {
            Some(Value::String(s)) => s.as_bytes().to_vec(),
            Some(Value::Bytes(b)) => b.clone(),
            _ => INVALID_MESSAGE.as_bytes().to_vec(),
        }
    }
}
