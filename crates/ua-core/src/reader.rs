//! Line-oriented access to the event log.
//!
//! The engine makes two full scans of the same file, so the reader only
//! holds the path; every call to [`EventLogReader::scan`] opens a fresh
//! handle that is closed when the returned [`EventScan`] is dropped.
//!
//! Lines are read as raw bytes; a line that is not valid UTF-8 is reported
//! as a format issue like any other malformed line.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::{AnalysisError, FormatIssue};
use crate::event::{EventRecord, parse_line};

/// Opens scans over an immutable event log.
#[derive(Debug, Clone)]
pub struct EventLogReader {
    path: PathBuf,
}

/// Outcome of one line that did not produce an event.
#[derive(Debug)]
pub enum ScanError {
    /// The line is malformed; `line` is 1-based.
    Format { line: usize, issue: FormatIssue },
    /// The underlying read failed.
    Io(std::io::Error),
}

/// Line counters for a single scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanCounts {
    /// Lines read, blank ones included.
    pub lines_read: usize,
    /// Lines that parsed to a recognized event.
    pub recognized: u64,
    /// Well-formed lines with an event type outside the vocabulary.
    pub unrecognized: usize,
}

impl EventLogReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Starts a new scan from the beginning of the log.
    pub fn scan(&self) -> Result<EventScan, AnalysisError> {
        let file = File::open(&self.path).map_err(|source| self.resource_error(source))?;
        Ok(EventScan {
            reader: BufReader::new(file),
            buf: Vec::new(),
            counts: ScanCounts::default(),
        })
    }

    pub(crate) fn resource_error(&self, source: std::io::Error) -> AnalysisError {
        AnalysisError::Resource {
            path: self.path.clone(),
            source,
        }
    }
}

/// A single pass over the log, yielding recognized events in file order.
///
/// Unrecognized event types are consumed silently; blank lines are ignored.
pub struct EventScan {
    reader: BufReader<File>,
    buf: Vec<u8>,
    counts: ScanCounts,
}

impl EventScan {
    /// Counters for the lines consumed so far.
    pub const fn counts(&self) -> ScanCounts {
        self.counts
    }
}

impl Iterator for EventScan {
    type Item = Result<EventRecord, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(ScanError::Io(e))),
            }
            self.counts.lines_read += 1;

            let Ok(line) = std::str::from_utf8(&self.buf) else {
                return Some(Err(ScanError::Format {
                    line: self.counts.lines_read,
                    issue: FormatIssue::Encoding,
                }));
            };
            if line.trim().is_empty() {
                continue;
            }

            match parse_line(line) {
                Ok(Some(event)) => {
                    self.counts.recognized += 1;
                    return Some(Ok(event));
                }
                Ok(None) => self.counts.unrecognized += 1,
                Err(issue) => {
                    return Some(Err(ScanError::Format {
                        line: self.counts.lines_read,
                        issue,
                    }));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::event_type::EventType;

    fn write_log(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn yields_recognized_events_in_order() {
        let log = write_log(
            "2015-01-01T10:00:00Z r1 alice PushEvent\n\
             2015-01-01T11:00:00Z r1 bob GollumEvent\n\
             2015-01-01T12:00:00Z r2 bob ForkEvent\n",
        );
        let reader = EventLogReader::new(log.path());

        let mut scan = reader.scan().unwrap();
        let events: Vec<_> = scan.by_ref().map(Result::unwrap).collect();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type, EventType::Push);
        assert_eq!(events[1].user_id, "bob");
        assert_eq!(events[1].hour, 12);
        assert_eq!(
            scan.counts(),
            ScanCounts {
                lines_read: 3,
                recognized: 2,
                unrecognized: 1,
            }
        );
    }

    #[test]
    fn scans_are_restartable() {
        let log = write_log("2015-01-01T10:00:00Z r1 alice PushEvent\n");
        let reader = EventLogReader::new(log.path());

        let first: Vec<_> = reader.scan().unwrap().map(Result::unwrap).collect();
        let second: Vec<_> = reader.scan().unwrap().map(Result::unwrap).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn reports_malformed_lines_with_line_number() {
        let log = write_log(
            "2015-01-01T10:00:00Z r1 alice PushEvent\n\
             \n\
             2015-01-01T10:00:00Z r1\n\
             2015-01-01T10:00:00Z r1 alice PushEvent\n",
        );
        let reader = EventLogReader::new(log.path());

        let outcomes: Vec<_> = reader.scan().unwrap().collect();
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].is_ok());
        match &outcomes[1] {
            Err(ScanError::Format { line, issue }) => {
                assert_eq!(*line, 3);
                assert_eq!(*issue, FormatIssue::FieldCount(2));
            }
            other => panic!("expected format error, got {other:?}"),
        }
        assert!(outcomes[2].is_ok());
    }

    #[test]
    fn invalid_utf8_is_format_issue() {
        let mut log = tempfile::NamedTempFile::new().unwrap();
        log.write_all(b"2015-01-01T10:00:00Z r1 alice PushEvent\n").unwrap();
        log.write_all(b"2015-01-01T10:00:00Z r\xff\xfe alice PushEvent\n").unwrap();
        log.write_all(b"2015-01-01T11:00:00Z r1 bob PushEvent").unwrap();
        let reader = EventLogReader::new(log.path());

        let mut scan = reader.scan().unwrap();
        let outcomes: Vec<_> = scan.by_ref().collect();
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].is_ok());
        match &outcomes[1] {
            Err(ScanError::Format { line, issue }) => {
                assert_eq!(*line, 2);
                assert_eq!(*issue, FormatIssue::Encoding);
            }
            other => panic!("expected format error, got {other:?}"),
        }
        assert_eq!(outcomes[2].as_ref().unwrap().user_id, "bob");
        assert_eq!(scan.counts().lines_read, 3);
    }

    #[test]
    fn missing_file_is_resource_error() {
        let dir = tempfile::tempdir().unwrap();
        let reader = EventLogReader::new(dir.path().join("missing.log"));

        let err = reader.scan().err().unwrap();
        assert!(matches!(err, AnalysisError::Resource { .. }));
        assert!(err.to_string().contains("missing.log"));
    }
}
