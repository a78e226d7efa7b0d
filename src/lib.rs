//! Structured key-value logging.
//!
//! A [`Record`] built by the caller passes through a [`MultiFilter`] chain
//! of [`Filter`]s and is rendered by a [`Formatter`] into a sink:
//!
//! ```
//! use kvlog::{record, ConsoleFormatter, Logger, MergeFilter, SharedBuffer};
//!
//! let out = SharedBuffer::new();
//! let logger = Logger::builder()
//!     .filter(MergeFilter::new([("service", "auth")]))
//!     .formatter(ConsoleFormatter::new().print_keys(true).sort_keys(true))
//!     .sink(out.clone())
//!     .build();
//!
//! logger.submit(record! { "message" => "login failed", "user" => 42 }).unwrap();
//! assert_eq!(out.contents_string(), "login failed | service: auth | user: 42\n");
//! ```

pub mod chain;
pub mod config;
pub mod error;
pub mod filter;
pub mod format;
pub mod keys;
pub mod logger;
pub mod record;
pub mod sink;

#[cfg(feature = "layer")]
pub mod init;
#[cfg(feature = "layer")]
pub mod layer;

pub use chain::MultiFilter;
pub use config::{LoggerConfig, OutputFormat};
pub use error::ConfigError;
pub use filter::{AddTimeFilter, Filter, MergeFilter, TimeFormat};
pub use format::{ConsoleFormatter, Formatter, JsonFormatter, RawFormatter};
pub use logger::{Logger, LoggerBuilder};
pub use record::{Record, Value, MESSAGE_KEY, TIME_KEY};
pub use sink::{SharedBuffer, SharedSink};

#[cfg(feature = "layer")]
pub use layer::RecordLayer;
