use std::io::{self, BufRead, Read};

use super::model::{LineError, LogFormat, ParseError};
use super::traits::LogParser;
use super::MAX_LINE_SIZE;
use crate::record::Record;

/// Bytes read for one line before giving up on it: the content cap plus a
/// `\r\n` terminator.
const READ_LIMIT: u64 = MAX_LINE_SIZE as u64 + 2;

/// Parse `reader` line by line with the parser for `format`.
pub fn parse<R: BufRead>(reader: R, format: LogFormat) -> ParseStream<R> {
    ParseStream::new(reader, format.parser())
}

enum LineRead {
    Eof,
    Buffered,
    /// Content length of a line over the cap; its bytes were discarded.
    Oversized(usize),
}

/// Lazy sequence of per-line outcomes.
///
/// Yields `Ok(record)` for every parsed line and `Err` for every line that
/// failed, in input order. Blank lines yield nothing. A read failure yields
/// one `ParseError::Io` and ends the sequence. At most [`MAX_LINE_SIZE`]
/// plus the terminator is buffered per line; the rest of a longer line is
/// skipped without being stored.
pub struct ParseStream<R> {
    reader: R,
    parser: Box<dyn LogParser>,
    buf: Vec<u8>,
    line_no: usize,
    done: bool,
}

impl<R: BufRead> ParseStream<R> {
    pub fn new(reader: R, parser: Box<dyn LogParser>) -> Self {
        Self {
            reader,
            parser,
            buf: Vec::new(),
            line_no: 0,
            done: false,
        }
    }

    pub fn format(&self) -> LogFormat {
        self.parser.format()
    }

    /// Number of lines consumed so far, blank lines included.
    pub fn lines_read(&self) -> usize {
        self.line_no
    }

    /// Drain the stream, splitting records from errors.
    pub fn collect_all(self) -> (Vec<Record>, Vec<ParseError>) {
        let mut records = Vec::new();
        let mut errors = Vec::new();
        for outcome in self {
            match outcome {
                Ok(record) => records.push(record),
                Err(e) => errors.push(e),
            }
        }
        (records, errors)
    }

    fn read_line(&mut self) -> io::Result<LineRead> {
        self.buf.clear();
        let n = (&mut self.reader)
            .take(READ_LIMIT)
            .read_until(b'\n', &mut self.buf)?;
        if n == 0 {
            return Ok(LineRead::Eof);
        }

        if n as u64 == READ_LIMIT && self.buf.last() != Some(&b'\n') {
            let rest = self.skip_rest_of_line()?;
            return Ok(LineRead::Oversized(n + rest));
        }

        let content = strip_terminator(&self.buf).len();
        if content > MAX_LINE_SIZE {
            return Ok(LineRead::Oversized(content));
        }
        Ok(LineRead::Buffered)
    }

    /// Consume up to and including the next `\n`; returns the bytes skipped
    /// before it.
    fn skip_rest_of_line(&mut self) -> io::Result<usize> {
        let mut skipped = 0;
        loop {
            let available = match self.reader.fill_buf() {
                Ok(available) => available,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if available.is_empty() {
                return Ok(skipped);
            }

            match available.iter().position(|&b| b == b'\n') {
                Some(idx) => {
                    self.reader.consume(idx + 1);
                    return Ok(skipped + idx);
                }
                None => {
                    let len = available.len();
                    self.reader.consume(len);
                    skipped += len;
                }
            }
        }
    }

    fn parse_buffered(&self) -> Option<Result<Record, LineError>> {
        let text = match std::str::from_utf8(&self.buf) {
            Ok(text) => text.trim(),
            Err(_) => return Some(Err(LineError::NonUtf8)),
        };

        if text.is_empty() {
            return None;
        }

        Some(self.parser.parse_line(text))
    }
}

fn strip_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

impl<R: BufRead> Iterator for ParseStream<R> {
    type Item = Result<Record, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let outcome = match self.read_line() {
                Ok(LineRead::Eof) => {
                    self.done = true;
                    continue;
                }
                Ok(LineRead::Buffered) => self.parse_buffered(),
                Ok(LineRead::Oversized(len)) => Some(Err(LineError::LineTooLarge(len, MAX_LINE_SIZE))),
                Err(e) => {
                    self.done = true;
                    return Some(Err(ParseError::Io(e)));
                }
            };

            self.line_no += 1;
            if let Some(outcome) = outcome {
                let line = self.line_no;
                return Some(outcome.map_err(|source| ParseError::Line { line, source }));
            }
        }
        None
    }
}
