use crate::chain::MultiFilter;
use crate::filter::{AddTimeFilter, Filter, TimeFormat};
use crate::format::{ConsoleFormatter, Formatter, JsonFormatter, RawFormatter};
use crate::record::{Record, Value, MESSAGE_KEY};
use std::fmt;
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Front door of the pipeline.
///
/// A logger owns its filter chain, an optional formatter and a sink. Every
/// submission runs the chain over the record, renders it and writes the
/// bytes to the sink in one call. Without a formatter the logger falls back
/// to [`RawFormatter`]; without an explicit sink it writes to standard output.
///
/// Submitting takes `&self`, so a logger can sit behind an `Arc` and be used
/// from several threads. Writes to the sink are serialized by an internal
/// mutex.
pub struct Logger {
    chain: MultiFilter,
    formatter: Option<Box<dyn Formatter>>,
    sink: Mutex<Box<dyn Write + Send>>,
}

impl Logger {
    /// Empty chain, no formatter, standard output.
    pub fn new() -> Self {
        Logger {
            chain: MultiFilter::new(),
            formatter: None,
            sink: Mutex::new(Box::new(io::stdout())),
        }
    }

    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::default()
    }

    /// Human readable logger on standard output.
    ///
    /// Adds the current time to each record and prints it in front of the
    /// message, followed by all other keys in sorted order.
    pub fn std() -> Self {
        Logger::builder()
            .filter(AddTimeFilter::new())
            .formatter(
                ConsoleFormatter::new()
                    .print_time(true)
                    .print_keys(true)
                    .sort_keys(true),
            )
            .build()
    }

    /// JSON lines on standard output with an RFC 3339 `time` key.
    pub fn json() -> Self {
        Logger::builder()
            .filter(AddTimeFilter::with_format(TimeFormat::Rfc3339))
            .formatter(JsonFormatter)
            .build()
    }

    /// Run `record` through the pipeline.
    ///
    /// The only error is a failed sink write, returned as the sink reported it.
    pub fn submit(&self, mut record: Record) -> io::Result<()> {
        self.chain.apply(&mut record);
        let formatter: &dyn Formatter = match &self.formatter {
            Some(formatter) => &**formatter,
            None => &RawFormatter,
        };
        let bytes = formatter.render(&record);
        self.lock_sink().write_all(&bytes)
    }

    /// Log a single value under the `message` key.
    pub fn print(&self, message: impl Into<Value>) -> io::Result<()> {
        let mut record = Record::with_capacity(2);
        record.insert(MESSAGE_KEY, message);
        self.submit(record)
    }

    /// Log a formatted message, as produced by `format_args!`.
    pub fn print_fmt(&self, args: fmt::Arguments<'_>) -> io::Result<()> {
        self.print(fmt::format(args))
    }

    /// Log a flat list of alternating keys and values.
    ///
    /// See [`Record::from_pairs`] for how malformed input is handled.
    pub fn print_kv<I>(&self, args: I) -> io::Result<()>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.submit(Record::from_pairs(args))
    }

    /// Write bytes straight to the sink, bypassing filters and formatter.
    pub fn write_raw(&self, bytes: &[u8]) -> io::Result<()> {
        self.lock_sink().write_all(bytes)
    }

    /// Flush the sink.
    pub fn flush(&self) -> io::Result<()> {
        self.lock_sink().flush()
    }

    pub fn chain(&self) -> &MultiFilter {
        &self.chain
    }

    pub fn chain_mut(&mut self) -> &mut MultiFilter {
        &mut self.chain
    }

    pub fn add_filter(&mut self, filter: impl Filter + 'static) {
        self.chain.add_filter(filter);
    }

    pub fn set_formatter(&mut self, formatter: impl Formatter + 'static) {
        self.formatter = Some(Box::new(formatter));
    }

    /// Go back to the raw fallback formatter.
    pub fn clear_formatter(&mut self) {
        self.formatter = None;
    }

    pub fn set_sink(&mut self, sink: impl Write + Send + 'static) {
        self.sink = Mutex::new(Box::new(sink));
    }

    fn lock_sink(&self) -> MutexGuard<'_, Box<dyn Write + Send>> {
        self.sink.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Logger {
    fn default() -> Self {
        Logger::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("chain", &self.chain)
            .field("formatter", &self.formatter.is_some())
            .finish_non_exhaustive()
    }
}

/// Step-by-step construction of a [`Logger`].
#[derive(Default)]
pub struct LoggerBuilder {
    chain: MultiFilter,
    formatter: Option<Box<dyn Formatter>>,
    sink: Option<Box<dyn Write + Send>>,
}

impl LoggerBuilder {
    /// Append a filter; filters run in the order they were added.
    pub fn filter(mut self, filter: impl Filter + 'static) -> Self {
        self.chain.add_filter(filter);
        self
    }

    pub fn formatter(mut self, formatter: impl Formatter + 'static) -> Self {
        self.formatter = Some(Box::new(formatter));
        self
    }

    pub fn sink(mut self, sink: impl Write + Send + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    pub fn build(self) -> Logger {
        Logger {
            chain: self.chain,
            formatter: self.formatter,
            sink: Mutex::new(self.sink.unwrap_or_else(|| Box::new(io::stdout()))),
        }
    }
}
