use crate::error::ConfigError;
use crate::record::{now, Record, Value, TIME_KEY};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, SecondsFormat};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::str::FromStr;

/// One enrichment stage of the pipeline.
///
/// Implementations mutate the record in place and must cope with records
/// that lack the reserved keys. Filters never fail; malformed input degrades
/// to a defined fallback.
pub trait Filter: Send + Sync {
    fn apply(&self, record: &mut Record);
}

impl<F> Filter for F
where
    F: Fn(&mut Record) + Send + Sync,
{
    fn apply(&self, record: &mut Record) {
        self(record)
    }
}

/// Layout used to turn a timestamp into a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeFormat {
    /// RFC 3339 with second precision, `Z` for UTC.
    Rfc3339,
    /// chrono `strftime` pattern.
    Strftime(String),
}

impl TimeFormat {
    /// Validate a `strftime` pattern.
    pub fn strftime(pattern: impl Into<String>) -> Result<Self, ConfigError> {
        let pattern = pattern.into();
        if StrftimeItems::new(&pattern).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::InvalidTimeFormat(pattern));
        }
        Ok(TimeFormat::Strftime(pattern))
    }

    pub fn format(&self, time: &DateTime<FixedOffset>) -> String {
        match self {
            TimeFormat::Rfc3339 => time.to_rfc3339_opts(SecondsFormat::Secs, true),
            TimeFormat::Strftime(pattern) => {
                let mut out = String::new();
                // chrono reports bad specifiers at format time; keep going with RFC 3339.
                if write!(out, "{}", time.format(pattern)).is_err() {
                    return TimeFormat::Rfc3339.format(time);
                }
                out
            }
        }
    }
}

impl FromStr for TimeFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("rfc3339") {
            Ok(TimeFormat::Rfc3339)
        } else {
            TimeFormat::strftime(s)
        }
    }
}

/// Makes sure the `time` key is populated.
///
/// Precedence, checked in order:
/// 1. a string under `time` is kept as is;
/// 2. a timestamp is formatted when `time_format` is set, kept otherwise;
/// 3. anything else counts as absent and is replaced with the current time,
///    formatted when `time_format` is set.
#[derive(Debug, Clone, Default)]
pub struct AddTimeFilter {
    pub time_format: Option<TimeFormat>,
}

impl AddTimeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(time_format: TimeFormat) -> Self {
        AddTimeFilter {
            time_format: Some(time_format),
        }
    }
}

impl Filter for AddTimeFilter {
    fn apply(&self, record: &mut Record) {
        let replacement = match (record.get(TIME_KEY), &self.time_format) {
            (Some(Value::String(_)), _) => None,
            (Some(Value::Time(t)), Some(format)) => Some(Value::String(format.format(t))),
            (Some(Value::Time(_)), None) => None,
            (_, Some(format)) => Some(Value::String(format.format(&now()))),
            (_, None) => Some(Value::Time(now())),
        };
        if let Some(value) = replacement {
            record.insert(TIME_KEY, value);
        }
    }
}

/// Fills in default keys without overwriting anything the record already has.
#[derive(Debug, Clone, Default)]
pub struct MergeFilter {
    pub defaults: HashMap<String, Value>,
}

impl MergeFilter {
    pub fn new<I, K, V>(defaults: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        MergeFilter {
            defaults: defaults
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Filter for MergeFilter {
    fn apply(&self, record: &mut Record) {
        for (key, value) in &self.defaults {
            if !record.contains_key(key) {
                record.insert(key.clone(), value.clone());
            }
        }
    }
}
