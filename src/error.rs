/// Error type returned when building a logger from configuration.
///
/// The logging path itself never produces these; sink failures surface as
/// the `std::io::Error` reported by the sink.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown output format: {0}")]
    UnknownFormat(String),

    #[error("invalid time format: {0:?}")]
    InvalidTimeFormat(String),

    #[error("invalid value {value:?} for {key}")]
    InvalidFlag { key: String, value: String },
}
