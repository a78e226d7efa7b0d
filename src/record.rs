use chrono::{DateTime, FixedOffset, Local, SecondsFormat, TimeZone};
use serde::{Serialize, Serializer};
use std::collections::hash_map::{self, HashMap};
use std::fmt;

/// Key holding the human readable text of a log entry.
pub const MESSAGE_KEY: &str = "message";

/// Key holding the event timestamp, either as [`Value::Time`] or as an
/// already formatted [`Value::String`].
pub const TIME_KEY: &str = "time";

/// Dynamically typed value stored under a [`Record`] key.
///
/// Consumers match on the variant they expect and fall back to a defined
/// behavior for everything else; a value of the wrong type is never an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    /// Timestamp with the offset it was captured in.
    Time(DateTime<FixedOffset>),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    /// Raw bytes. The console prints them as lossy UTF-8; JSON encodes them
    /// as an array of numbers, not as a base64 string.
    Bytes(Vec<u8>),
    /// Nested structure, encoded recursively by the JSON formatter.
    Json(serde_json::Value),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            Value::Time(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }
}

/// Natural string representation, used by the console formatter for
/// non-reserved keys.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Time(t) => write!(f, "{}", t),
            Value::Int(i) => write!(f, "{}", i),
            Value::UInt(u) => write!(f, "{}", u),
            Value::Float(x) => write!(f, "{}", x),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Bytes(b) => f.write_str(&String::from_utf8_lossy(b)),
            Value::Json(v) => write!(f, "{}", v),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::String(s) => serializer.serialize_str(s),
            Value::Time(t) => {
                serializer.serialize_str(&t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::UInt(u) => serializer.serialize_u64(*u),
            Value::Float(x) => serializer.serialize_f64(*x),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Bytes(b) => serializer.serialize_bytes(b),
            Value::Json(v) => v.serialize(serializer),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::String(value.clone())
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Value {
    fn from(value: DateTime<Tz>) -> Self {
        Value::Time(value.fixed_offset())
    }
}

macro_rules! value_from {
    ($variant:ident as $target:ty: $($source:ty),+) => {
        $(
            impl From<$source> for Value {
                fn from(value: $source) -> Self {
                    Value::$variant(value as $target)
                }
            }
        )+
    };
}

value_from!(Int as i64: i8, i16, i32, i64, isize);
value_from!(UInt as u64: u8, u16, u32, u64, usize);
value_from!(Float as f64: f32, f64);

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Bytes(value.to_vec())
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        Value::Json(value)
    }
}

/// Current wall clock time in the local offset.
pub(crate) fn now() -> DateTime<FixedOffset> {
    Local::now().fixed_offset()
}

/// Key-value unit carried through the pipeline for one log event.
///
/// Iteration order is unspecified; use [`Record::sorted_keys`] when output
/// has to be deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record {
    entries: HashMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Record {
            entries: HashMap::with_capacity(capacity),
        }
    }

    /// Build a record from a flat sequence of alternating keys and values.
    ///
    /// Keys must be [`Value::String`]; a pair with any other key type is
    /// skipped, and a trailing key without a value is dropped.
    pub fn from_pairs<I>(args: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let mut args = args.into_iter().map(Into::into);
        let mut record = Record::new();
        while let (Some(key), Some(value)) = (args.next(), args.next()) {
            if let Value::String(key) = key {
                record.entries.insert(key, value);
            }
        }
        record
    }

    /// Insert a value, returning the one it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn entry(&mut self, key: impl Into<String>) -> hash_map::Entry<'_, String, Value> {
        self.entries.entry(key.into())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, Value> {
        self.entries.iter()
    }

    pub fn keys(&self) -> hash_map::Keys<'_, String, Value> {
        self.entries.keys()
    }

    /// Keys in ascending lexicographic order.
    pub fn sorted_keys(&self) -> Vec<&String> {
        crate::keys::ordered_keys(&self.entries)
    }

    /// The `message` value, if it is a string.
    pub fn message(&self) -> Option<&str> {
        self.get(MESSAGE_KEY).and_then(Value::as_str)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        record.extend(iter);
        record
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Record {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl IntoIterator for Record {
    type Item = (String, Value);
    type IntoIter = hash_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = (&'a String, &'a Value);
    type IntoIter = hash_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Build a [`Record`] from `key => value` pairs.
///
/// ```
/// let record = kvlog::record! { "message" => "boot ok", "code" => 42 };
/// assert_eq!(record.message(), Some("boot ok"));
/// ```
#[macro_export]
macro_rules! record {
    () => {
        $crate::Record::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut record = $crate::Record::new();
        $( record.insert($key, $value); )+
        record
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn from_pairs_empty() {
        assert!(Record::from_pairs(Vec::<Value>::new()).is_empty());
    }

    #[test]
    fn from_pairs_drops_orphan_key() {
        let record = Record::from_pairs(["message", "hi", "orphan"]);
        assert_eq!(record.len(), 1);
        assert_eq!(record.message(), Some("hi"));
        assert!(!record.contains_key("orphan"));

        assert!(Record::from_pairs(["message"]).is_empty());
    }

    #[test]
    fn from_pairs_skips_non_string_keys() {
        let record = Record::from_pairs(vec![Value::from(23), Value::from(777)]);
        assert!(record.is_empty());

        let record = Record::from_pairs(vec![
            Value::from(1),
            Value::from("lost"),
            Value::from("message"),
            Value::from("hello"),
            Value::from("theanswer"),
            Value::from(42),
        ]);
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("theanswer"), Some(&Value::Int(42)));
    }

    #[test]
    fn message_requires_string() {
        let record = record! { MESSAGE_KEY => 17 };
        assert_eq!(record.message(), None);
    }

    #[test]
    fn display_natural_forms() {
        assert_eq!(Value::from("abc").to_string(), "abc");
        assert_eq!(Value::from(-5).to_string(), "-5");
        assert_eq!(Value::from(7u8).to_string(), "7");
        assert_eq!(Value::from(1.5).to_string(), "1.5");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::from(b"raw".as_slice()).to_string(), "raw");
        assert_eq!(
            Value::from(serde_json::json!({"a": [1, 2]})).to_string(),
            r#"{"a":[1,2]}"#
        );
        let t = Utc.with_ymd_and_hms(2018, 1, 31, 8, 59, 2).unwrap();
        assert_eq!(Value::from(t).to_string(), "2018-01-31 08:59:02 +00:00");
    }

    #[test]
    fn time_keeps_offset() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let t = offset.with_ymd_and_hms(2020, 6, 1, 12, 0, 0).unwrap();
        let value = Value::from(t);
        assert_eq!(value.as_time().map(|t| t.offset().local_minus_utc()), Some(7200));
    }

    #[test]
    fn serializes_as_json_object() {
        let t = Utc.with_ymd_and_hms(2018, 1, 31, 8, 59, 2).unwrap();
        let record = record! { "time" => t, "n" => 3u32, "ok" => false };
        let json: serde_json::Value = serde_json::to_value(&record).unwrap();
        assert_eq!(json["time"], "2018-01-31T08:59:02Z");
        assert_eq!(json["n"], 3);
        assert_eq!(json["ok"], false);
    }

    #[test]
    fn accessors_match_variant() {
        let bytes = Value::from(b"hi".as_slice());
        assert_eq!(bytes.as_bytes(), Some(&b"hi"[..]));
        assert_eq!(bytes.as_str(), None);
        assert_eq!(Value::from("hi").as_bytes(), None);

        let mut record = record! { "count" => 1 };
        if let Some(Value::Int(n)) = record.get_mut("count") {
            *n += 1;
        }
        assert_eq!(record.get("count"), Some(&Value::Int(2)));
        assert!(record.get_mut("missing").is_none());
    }

    #[test]
    fn bytes_serialize_as_number_array() {
        let record = record! { "b" => b"hi".to_vec() };
        assert_eq!(serde_json::to_string(&record).unwrap(), r#"{"b":[104,105]}"#);
    }

    #[test]
    fn collects_from_tuples() {
        let record: Record = vec![("a", 1), ("b", 2)].into_iter().collect();
        assert_eq!(record.sorted_keys(), vec!["a", "b"]);
    }
}
