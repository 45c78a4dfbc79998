//! Lazy reader over a partition's newline-delimited change events.

use std::io::{BufRead, BufReader, Read};

use flate2::read::MultiGzDecoder;

use crate::error::{Error, Result};
use crate::event::ChangeEvent;

/// Yields one [`ChangeEvent`] per non-blank line, in file order.
///
/// The stream holds a single line at a time and cannot be rewound. It stops
/// after the first error.
pub struct EventStream<R> {
    reader: R,
    source_path: String,
    line: usize,
    buf: Vec<u8>,
    failed: bool,
}

impl EventStream<BufReader<MultiGzDecoder<Box<dyn Read>>>> {
    /// Decompresses a gzip partition on the fly.
    pub fn gzip(compressed: Box<dyn Read>, source_path: impl Into<String>) -> Self {
        Self::new(BufReader::new(MultiGzDecoder::new(compressed)), source_path)
    }
}

impl<R: BufRead> EventStream<R> {
    pub fn new(reader: R, source_path: impl Into<String>) -> Self {
        Self {
            reader,
            source_path: source_path.into(),
            line: 0,
            buf: Vec::new(),
            failed: false,
        }
    }

    pub fn source_path(&self) -> &str {
        &self.source_path
    }

    /// Number of lines consumed so far, blank ones included.
    pub fn lines_read(&self) -> usize {
        self.line
    }

    fn read_event(&mut self) -> Result<Option<ChangeEvent>> {
        loop {
            self.buf.clear();
            let read = self.reader.read_until(b'\n', &mut self.buf).map_err(|err| {
                Error::io(
                    format!("read {} after line {}", self.source_path, self.line),
                    err,
                )
            })?;
            if read == 0 {
                return Ok(None);
            }
            self.line += 1;

            let text = std::str::from_utf8(&self.buf).map_err(|err| self.parse_error(err))?;
            let trimmed = text.trim();
            if trimmed.is_empty() {
                continue;
            }

            return ChangeEvent::from_json_line(trimmed)
                .map(Some)
                .map_err(|err| self.parse_error(err));
        }
    }

    fn parse_error(&self, err: impl std::fmt::Display) -> Error {
        Error::Parse {
            source_path: self.source_path.clone(),
            line: self.line,
            message: err.to_string(),
        }
    }
}

impl<R: BufRead> Iterator for EventStream<R> {
    type Item = Result<ChangeEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.read_event() {
            Ok(Some(event)) => Some(Ok(event)),
            Ok(None) => None,
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    use flate2::write::GzEncoder;
    use flate2::Compression;

    #[test]
    fn skips_blank_lines_and_counts_them() {
        let text = "\n   {\"changeTime\": \"2016-01-01T00:30\"}\n\n{\"changeTime\": \"2016-01-01T00:31\"}";
        let mut stream = EventStream::new(Cursor::new(text), "mem");
        assert_eq!(stream.next().expect("first").expect("ok").change_time.minute(), 30);
        assert_eq!(stream.lines_read(), 2);
        assert_eq!(stream.next().expect("second").expect("ok").change_time.minute(), 31);
        assert!(stream.next().is_none());
        assert_eq!(stream.lines_read(), 4);
    }

    #[test]
    fn reports_line_and_path_then_stops() {
        let text = "{\"changeTime\": \"2016-01-01T00:30\"}\n\n{oops\n{\"changeTime\": \"2016-01-01T00:31\"}\n";
        let mut stream = EventStream::new(Cursor::new(text), "/data/2016/01/01.jsonl.gz");
        assert!(stream.next().expect("first").is_ok());
        match stream.next() {
            Some(Err(Error::Parse {
                source_path, line, ..
            })) => {
                assert_eq!(source_path, "/data/2016/01/01.jsonl.gz");
                assert_eq!(line, 3);
            }
            other => panic!("expected parse error, got {other:?}"),
        }
        assert!(stream.next().is_none());
    }

    #[test]
    fn invalid_utf8_is_a_parse_error_on_its_line() {
        let mut text = b"{\"changeTime\": \"2016-01-01T00:30\"}\n".to_vec();
        text.extend_from_slice(b"{\"changeTime\": \"2016-01-01T00:31\", \"after\": {\"t\": \"\xff\xfe\"}}\n");
        let mut stream = EventStream::new(Cursor::new(text), "/data/2016/01/01.jsonl.gz");
        assert_eq!(stream.source_path(), "/data/2016/01/01.jsonl.gz");
        assert!(stream.next().expect("first").is_ok());
        match stream.next() {
            Some(Err(Error::Parse {
                source_path, line, ..
            })) => {
                assert_eq!(source_path, "/data/2016/01/01.jsonl.gz");
                assert_eq!(line, 2);
            }
            other => panic!("expected parse error, got {other:?}"),
        }
        assert!(stream.next().is_none());
    }

    #[test]
    fn decompresses_gzip() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(b"{\"changeTime\": \"2016-01-01T00:30\", \"after\": {\"a\": 1}}\n")
            .expect("write");
        let bytes = encoder.finish().expect("finish");

        let events: Vec<_> = EventStream::gzip(Box::new(Cursor::new(bytes)), "mem")
            .collect::<Result<_>>()
            .expect("events");
        assert_eq!(events.len(), 1);
        assert!(events[0].after.contains_key("a"));
    }

    #[test]
    fn corrupt_gzip_is_io() {
        let mut stream = EventStream::gzip(Box::new(Cursor::new(b"not gzip".to_vec())), "mem");
        assert!(matches!(stream.next(), Some(Err(Error::Io { .. }))));
        assert!(stream.next().is_none());
    }
}
