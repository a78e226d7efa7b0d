use crate::record::Record;
use std::io::{self, Write};

pub mod console;
pub mod json;
pub mod raw;

pub use console::ConsoleFormatter;
pub use json::JsonFormatter;
pub use raw::RawFormatter;

/// Placeholder emitted when the `message` key is missing or not printable.
pub const INVALID_MESSAGE: &str = "(message not printable)";

/// Terminal stage of the pipeline: turns a [`Record`] into bytes.
///
/// Formatters hold no mutable state and may be shared across threads.
pub trait Formatter: Send + Sync {
    /// Render the complete output for one record.
    fn render(&self, record: &Record) -> Vec<u8>;

    /// Render `record` and hand the bytes to `sink` in one write.
    ///
    /// The only error is the one reported by the sink.
    fn format(&self, record: &Record, sink: &mut dyn Write) -> io::Result<()> {
        sink.write_all(&self.render(record))
    }
}
