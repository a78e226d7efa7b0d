use crate::logger::Logger;
use crate::record::{Record, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

const SELF_TARGET: &str = env!("CARGO_CRATE_NAME");

/// `tracing_subscriber` layer that turns every event into a [`Record`] and
/// submits it to a [`Logger`].
///
/// Submission is synchronous: the record is filtered, formatted and written
/// on the thread that emitted the event. Events emitted by this crate itself
/// are skipped so that a failing sink cannot feed back into the logger.
pub struct RecordLayer {
    logger: Arc<Logger>,
    /// Total events seen by the layer.
    pub total_events: Arc<AtomicU64>,
    /// Events whose record was written to the sink.
    pub forwarded_events: Arc<AtomicU64>,
    /// Events whose sink write failed.
    pub failed_events: Arc<AtomicU64>,
}

impl RecordLayer {
    pub fn new(logger: Arc<Logger>) -> Self {
        RecordLayer {
            logger,
            total_events: Arc::new(AtomicU64::new(0)),
            forwarded_events: Arc::new(AtomicU64::new(0)),
            failed_events: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }
}

fn is_own_target(target: &str) -> bool {
    target
        .strip_prefix(SELF_TARGET)
        .map_or(false, |rest| rest.is_empty() || rest.starts_with("::"))
}

impl<S> Layer<S> for RecordLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        self.total_events.fetch_add(1, Ordering::Relaxed);
        let meta = event.metadata();
        if is_own_target(meta.target()) {
            return;
        }

        let mut record = Record::with_capacity(meta.fields().len() + 2);
        event.record(&mut FieldVisitor {
            record: &mut record,
        });
        record
            .entry("level")
            .or_insert_with(|| Value::from(meta.level().as_str()));
        record
            .entry("target")
            .or_insert_with(|| Value::from(meta.target()));

        match self.logger.submit(record) {
            Ok(()) => {
                self.forwarded_events.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                self.failed_events.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(error = %e, "dropping log record after sink failure");
            }
        }
    }
}

/// Copies event fields into a [`Record`], keeping their native types.
pub struct FieldVisitor<'a> {
    pub record: &'a mut Record,
}

impl<'a> Visit for FieldVisitor<'a> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.record.insert(field.name(), value);
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record.insert(field.name(), value);
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.record.insert(field.name(), value);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.record.insert(field.name(), value);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.record.insert(field.name(), value);
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        // `message` arrives here as `fmt::Arguments`, whose Debug output is the bare text.
        self.record.insert(field.name(), format!("{:?}", value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{ConsoleFormatter, JsonFormatter};
    use crate::sink::SharedBuffer;
    use std::io;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::Registry;

    struct Refuse;

    impl io::Write for Refuse {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "refused"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn sorted_console(buffer: &SharedBuffer) -> Arc<Logger> {
        Arc::new(
            Logger::builder()
                .formatter(ConsoleFormatter::new().print_keys(true).sort_keys(true))
                .sink(buffer.clone())
                .build(),
        )
    }

    #[test]
    fn event_becomes_record() {
        let buffer = SharedBuffer::new();
        let layer = RecordLayer::new(sorted_console(&buffer));
        let subscriber = Registry::default().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            tracing::error!(target: "auth", user_id = 42, reason = "invalid password", "authentication failed");
        });

        assert_eq!(
            buffer.contents_string(),
            "authentication failed | level: ERROR | reason: invalid password | target: auth | user_id: 42\n"
        );
    }

    #[test]
    fn formatted_message_and_typed_fields() {
        let buffer = SharedBuffer::new();
        let logger = Arc::new(
            Logger::builder()
                .formatter(JsonFormatter)
                .sink(buffer.clone())
                .build(),
        );
        let subscriber = Registry::default().with(RecordLayer::new(logger));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(target: "app", ratio = 0.5, ok = true, count = 3u64, "processed {} items", 3);
        });

        let parsed: serde_json::Value =
            serde_json::from_str(buffer.contents_string().trim_end()).unwrap();
        assert_eq!(parsed["message"], "processed 3 items");
        assert_eq!(parsed["ratio"], 0.5);
        assert_eq!(parsed["ok"], true);
        assert_eq!(parsed["count"], 3);
        assert_eq!(parsed["level"], "INFO");
        assert_eq!(parsed["target"], "app");
    }

    #[test]
    fn event_fields_win_over_metadata() {
        let buffer = SharedBuffer::new();
        let subscriber = Registry::default().with(RecordLayer::new(sorted_console(&buffer)));

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(target: "app", level = "custom", "m");
        });

        assert_eq!(buffer.contents_string(), "m | level: custom | target: app\n");
    }

    #[test]
    fn exposes_shared_logger() {
        let buffer = SharedBuffer::new();
        let logger = sorted_console(&buffer);
        let layer = RecordLayer::new(Arc::clone(&logger));
        assert!(Arc::ptr_eq(layer.logger(), &logger));

        layer.logger().print("direct").unwrap();
        assert_eq!(buffer.contents_string(), "direct\n");
    }

    #[test]
    fn counts_and_skips_own_events() {
        let buffer = SharedBuffer::new();
        let layer = RecordLayer::new(sorted_console(&buffer));
        let total = Arc::clone(&layer.total_events);
        let forwarded = Arc::clone(&layer.forwarded_events);
        let subscriber = Registry::default().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(target: "app", "kept");
            tracing::info!(target: "kvlog::logger", "skipped");
            tracing::info!(target: "kvlogger", "kept too");
        });

        assert_eq!(total.load(Ordering::Relaxed), 3);
        assert_eq!(forwarded.load(Ordering::Relaxed), 2);
        assert_eq!(buffer.contents_string().lines().count(), 2);
    }

    #[test]
    fn sink_failures_are_counted() {
        let logger = Arc::new(Logger::builder().formatter(JsonFormatter).sink(Refuse).build());
        let layer = RecordLayer::new(logger);
        let failed = Arc::clone(&layer.failed_events);
        let subscriber = Registry::default().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            tracing::error!(target: "app", "nowhere to go");
        });

        assert_eq!(failed.load(Ordering::Relaxed), 1);
    }
}
