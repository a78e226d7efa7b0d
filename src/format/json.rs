use super::Formatter;
use crate::record::Record;

/// One compact JSON object per line.
///
/// Key order inside the object follows map iteration and is unspecified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        JsonFormatter
    }
}

impl Formatter for JsonFormatter {
    fn render(&self, record: &Record) -> Vec<u8> {
        let mut line = serde_json::to_vec(record).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "failed to encode log record as json");
            b"{}".to_vec()
        });
        line.push(b'\n');
        line
    }
}
