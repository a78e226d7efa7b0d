use super::{Formatter, INVALID_MESSAGE};
use crate::record::{Record, Value, MESSAGE_KEY, TIME_KEY};
use std::fmt::Write as _;

/// Layout for timestamps printed at the start of a console line.
pub const CONSOLE_TIME_FORMAT: &str = "[%Y-%m-%d %H:%M:%S]";

/// Human readable single-line output.
///
/// Line shape: `[<time> ]<message>[ | key: value]*\n`.
///
/// - `print_time`: prefix the `time` value. Strings are printed verbatim,
///   timestamps with [`CONSOLE_TIME_FORMAT`]; any other type prints nothing.
/// - `print_keys`: append every key except `message` and `time`.
/// - `sort_keys`: append keys in ascending order instead of map order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsoleFormatter {
    pub print_time: bool,
    pub print_keys: bool,
    pub sort_keys: bool,
}

impl ConsoleFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn print_time(mut self, enabled: bool) -> Self {
        self.print_time = enabled;
        self
    }

    pub fn print_keys(mut self, enabled: bool) -> Self {
        self.print_keys = enabled;
        self
    }

    pub fn sort_keys(mut self, enabled: bool) -> Self {
        self.sort_keys = enabled;
        self
    }
}

fn push_key(line: &mut String, key: &str, value: &Value) {
    if key == MESSAGE_KEY || key == TIME_KEY {
        return;
    }
    let _ = write!(line, " | {}: {}", key, value);
}

impl Formatter for ConsoleFormatter {
    fn render(&self, record: &Record) -> Vec<u8> {
        let mut line = String::new();

        if self.print_time {
            match record.get(TIME_KEY) {
                Some(Value::String(s)) => {
                    line.push_str(s);
                    line.push(' ');
                }
                Some(Value::Time(t)) => {
                    let _ = write!(line, "{} ", t.format(CONSOLE_TIME_FORMAT));
                }
                _ => {}
            }
        }

        line.push_str(record.message().unwrap_or(INVALID_MESSAGE));

        if self.print_keys {
            if self.sort_keys {
                for key in record.sorted_keys() {
                    if let Some(value) = record.get(key) {
                        push_key(&mut line, key, value);
                    }
                }
            } else {
                for (key, value) in record {
                    push_key(&mut line, key, value);
                }
            }
        }

        line.push('\n');
        line.into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record;
    use chrono::{FixedOffset, TimeZone, Utc};

    fn render(formatter: ConsoleFormatter, record: &Record) -> String {
        String::from_utf8(formatter.render(record)).unwrap()
    }

    #[test]
    fn message_only() {
        let record = record! { "message" => "test01 01test" };
        assert_eq!(render(ConsoleFormatter::new(), &record), "test01 01test\n");
    }

    #[test]
    fn time_enabled_but_absent_prints_nothing() {
        let formatter = ConsoleFormatter::new().print_time(true).print_keys(true);
        let record = record! { "message" => "test02 02test" };
        assert_eq!(render(formatter, &record), "test02 02test\n");
    }

    #[test]
    fn single_extra_key() {
        let formatter = ConsoleFormatter::new().print_time(true).print_keys(true);
        let record = record! { "message" => "test03", "testkey03" => "testvalue03" };
        assert_eq!(render(formatter, &record), "test03 | testkey03: testvalue03\n");
    }

    #[test]
    fn unsorted_keys_accept_any_order() {
        let formatter = ConsoleFormatter::new().print_keys(true);
        let record = record! { "message" => "test04", "testkey04" => "testvalue04", "testkey04_2" => 42 };
        let out = render(formatter, &record);
        let a = "test04 | testkey04: testvalue04 | testkey04_2: 42\n";
        let b = "test04 | testkey04_2: 42 | testkey04: testvalue04\n";
        assert!(out == a || out == b, "unexpected output: {out:?}");
    }

    #[test]
    fn sorted_keys() {
        let formatter = ConsoleFormatter::new().print_keys(true).sort_keys(true);
        let record = record! { "message" => "x", "zz" => 1, "code" => 42, "b" => "two" };
        assert_eq!(render(formatter, &record), "x | b: two | code: 42 | zz: 1\n");
    }

    #[test]
    fn keys_hidden_unless_enabled() {
        let formatter = ConsoleFormatter::new().print_time(true);
        let record = record! { "message" => "test05", "testkey05" => "testvalue05" };
        assert_eq!(render(formatter, &record), "test05\n");
    }

    #[test]
    fn timestamp_prefix() {
        let formatter = ConsoleFormatter::new().print_time(true);
        let t = Utc.with_ymd_and_hms(2018, 1, 31, 8, 59, 2).unwrap();
        let record = record! { "message" => "test06", "time" => t };
        assert_eq!(render(formatter, &record), "[2018-01-31 08:59:02] test06\n");
    }

    #[test]
    fn timestamp_uses_its_own_offset() {
        let formatter = ConsoleFormatter::new().print_time(true);
        let offset = FixedOffset::west_opt(5 * 3600).unwrap();
        let t = offset.with_ymd_and_hms(2018, 1, 31, 8, 59, 2).unwrap();
        let record = record! { "message" => "m", "time" => t };
        assert_eq!(render(formatter, &record), "[2018-01-31 08:59:02] m\n");
    }

    #[test]
    fn string_time_printed_verbatim() {
        let formatter = ConsoleFormatter::new().print_time(true).print_keys(true);
        let record = record! { "message" => "m", "time" => "2024-01-01T00:00:00Z" };
        assert_eq!(render(formatter, &record), "2024-01-01T00:00:00Z m\n");
    }

    #[test]
    fn mistyped_reserved_keys_degrade() {
        let formatter = ConsoleFormatter::new().print_time(true).print_keys(true);
        let record = record! { "message" => 5, "time" => true };
        assert_eq!(render(formatter, &record), "(message not printable)\n");
    }

    #[test]
    fn one_newline_and_one_message() {
        let formatter = ConsoleFormatter::new()
            .print_time(true)
            .print_keys(true)
            .sort_keys(true);
        let records = [
            Record::new(),
            record! { "message" => "only" },
            record! { "message" => "with keys", "a" => 1, "b" => 2.5 },
            record! { "other" => "no message" },
        ];
        for record in &records {
            let out = render(formatter, record);
            assert!(out.ends_with('\n') && !out.ends_with("\n\n"));
            assert_eq!(out.matches('\n').count(), 1);
            let message = record.message().unwrap_or(INVALID_MESSAGE);
            assert_eq!(out.matches(message).count(), 1);
        }
    }
}
