use crate::error::ConfigError;
use crate::filter::{AddTimeFilter, MergeFilter, TimeFormat};
use crate::format::{ConsoleFormatter, JsonFormatter};
use crate::logger::Logger;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::str::FromStr;

/// Output format: `console` or `json`.
pub const KVLOG_FORMAT_ENV: &str = "KVLOG_FORMAT";

/// Whether to stamp records with the current time.
pub const KVLOG_ADD_TIME_ENV: &str = "KVLOG_ADD_TIME";

/// `rfc3339` or a strftime pattern; empty disables formatting.
pub const KVLOG_TIME_FORMAT_ENV: &str = "KVLOG_TIME_FORMAT";

/// Console only: print the `time` key in front of the message.
pub const KVLOG_PRINT_TIME_ENV: &str = "KVLOG_PRINT_TIME";

/// Console only: append non-reserved keys.
pub const KVLOG_PRINT_KEYS_ENV: &str = "KVLOG_PRINT_KEYS";

/// Console only: append keys in sorted order.
pub const KVLOG_SORT_KEYS_ENV: &str = "KVLOG_SORT_KEYS";

/// Terminal formatter selected by a [`LoggerConfig`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Console,
    Json,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "console" => Ok(OutputFormat::Console),
            "json" => Ok(OutputFormat::Json),
            _ => Err(ConfigError::UnknownFormat(s.to_string())),
        }
    }
}

/// Declarative description of a logger pipeline.
///
/// **Fields**
/// - `format`: terminal formatter.
/// - `add_time`: append an [`AddTimeFilter`] to the chain.
/// - `time_format`: `rfc3339` or a strftime pattern handed to the filter.
/// - `print_time`, `print_keys`, `sort_keys`: [`ConsoleFormatter`] options,
///   ignored for JSON output.
/// - `defaults`: keys merged into every record that lacks them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub format: OutputFormat,
    pub add_time: bool,
    pub time_format: Option<String>,
    pub print_time: bool,
    pub print_keys: bool,
    pub sort_keys: bool,
    pub defaults: BTreeMap<String, String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self::console()
    }
}

impl LoggerConfig {
    /// Human readable preset, same pipeline as [`Logger::std`].
    pub fn console() -> Self {
        LoggerConfig {
            format: OutputFormat::Console,
            add_time: true,
            time_format: None,
            print_time: true,
            print_keys: true,
            sort_keys: true,
            defaults: BTreeMap::new(),
        }
    }

    /// JSON lines preset, same pipeline as [`Logger::json`].
    pub fn json() -> Self {
        LoggerConfig {
            format: OutputFormat::Json,
            time_format: Some("rfc3339".to_string()),
            ..Self::console()
        }
    }

    /// Read the configuration from `KVLOG_*` environment variables.
    ///
    /// `KVLOG_FORMAT` picks the preset; the remaining variables override it.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Same as [`LoggerConfig::from_env`] with a custom variable lookup.
    pub fn from_env_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(KVLOG_FORMAT_ENV) {
            Some(value) => match value.parse::<OutputFormat>()? {
                OutputFormat::Console => Self::console(),
                OutputFormat::Json => Self::json(),
            },
            None => Self::default(),
        };

        if let Some(value) = lookup(KVLOG_TIME_FORMAT_ENV) {
            tracing::debug!(key = KVLOG_TIME_FORMAT_ENV, value = %value, "time format from environment");
            config.time_format = if value.is_empty() {
                None
            } else {
                value.parse::<TimeFormat>()?;
                Some(value)
            };
        }

        let flags: [(&str, &mut bool); 4] = [
            (KVLOG_ADD_TIME_ENV, &mut config.add_time),
            (KVLOG_PRINT_TIME_ENV, &mut config.print_time),
            (KVLOG_PRINT_KEYS_ENV, &mut config.print_keys),
            (KVLOG_SORT_KEYS_ENV, &mut config.sort_keys),
        ];
        for (key, slot) in flags {
            if let Some(value) = lookup(key) {
                tracing::debug!(key, value = %value, "flag from environment");
                *slot = parse_flag(key, &value)?;
            }
        }

        Ok(config)
    }

    /// Parsed `time_format`, if any. An empty string counts as unset.
    pub fn parsed_time_format(&self) -> Result<Option<TimeFormat>, ConfigError> {
        self.time_format
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::parse::<TimeFormat>)
            .transpose()
    }

    /// Build a logger writing to standard output.
    pub fn build(&self) -> Result<Logger, ConfigError> {
        self.build_with_sink(io::stdout())
    }

    /// Build a logger writing to `sink`.
    ///
    /// Chain order: defaults are merged first, then the time is added.
    pub fn build_with_sink(
        &self,
        sink: impl Write + Send + 'static,
    ) -> Result<Logger, ConfigError> {
        let time_format = self.parsed_time_format()?;

        let mut builder = Logger::builder().sink(sink);
        if !self.defaults.is_empty() {
            builder = builder.filter(MergeFilter::new(self.defaults.clone()));
        }
        if self.add_time {
            builder = builder.filter(AddTimeFilter { time_format });
        }
        builder = match self.format {
            OutputFormat::Console => builder.formatter(ConsoleFormatter {
                print_time: self.print_time,
                print_keys: self.print_keys,
                sort_keys: self.sort_keys,
            }),
            OutputFormat::Json => builder.formatter(JsonFormatter),
        };
        Ok(builder.build())
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}
