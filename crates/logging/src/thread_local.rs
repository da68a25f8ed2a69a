//! crates/logging/src/thread_local.rs
//! Thread-local record capture for tests and embedders.

use std::cell::RefCell;

use crate::levels::Level;
use crate::sink::{Failure, Record, Sink};

thread_local! {
    #[allow(clippy::missing_const_for_thread_local)]
    static RECORDS: RefCell<Vec<CapturedRecord>> = RefCell::new(Vec::new());
}

/// Owned copy of a record collected by [`CaptureSink`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapturedRecord {
    /// Name of the emitting logger.
    pub logger: String,
    /// Severity of the line.
    pub level: Level,
    /// Rendered message text.
    pub message: String,
    /// Failure observed by an operation scope, if any.
    pub failure: Option<Failure>,
}

/// Sink that stores records in a buffer owned by the emitting thread.
///
/// Each thread sees only the records it emitted, so tests running in
/// parallel do not observe each other's output.
#[derive(Clone, Copy, Debug, Default)]
pub struct CaptureSink;

impl Sink for CaptureSink {
    fn emit(&self, record: &Record<'_>) {
        RECORDS.with(|records| {
            records.borrow_mut().push(CapturedRecord {
                logger: record.logger.to_owned(),
                level: record.level,
                message: record.message.to_owned(),
                failure: record.failure.cloned(),
            });
        });
    }
}

/// Drain all records captured on this thread, clearing the buffer.
pub fn drain_records() -> Vec<CapturedRecord> {
    RECORDS.with(|records| records.borrow_mut().drain(..).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record<'a>(message: &'a str, failure: Option<&'a Failure>) -> Record<'a> {
        Record {
            logger: "foo",
            level: Level::Info,
            message,
            failure,
        }
    }

    #[test]
    fn capture_and_drain() {
        drain_records();

        CaptureSink.emit(&record("first", None));
        let failure = Failure::new("boom", "Boom");
        CaptureSink.emit(&record("second", Some(&failure)));

        let records = drain_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].message, "first");
        assert_eq!(records[0].logger, "foo");
        assert_eq!(records[0].failure, None);
        assert_eq!(records[1].failure.as_ref().map(Failure::message), Some("boom"));

        assert!(drain_records().is_empty());
    }

    #[test]
    fn records_stay_on_their_thread() {
        drain_records();
        CaptureSink.emit(&record("main", None));

        let other = std::thread::spawn(|| {
            CaptureSink.emit(&record("worker", None));
            drain_records()
        })
        .join()
        .expect("worker thread");

        assert_eq!(other.len(), 1);
        assert_eq!(other[0].message, "worker");

        let mine = drain_records();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].message, "main");
    }
}
