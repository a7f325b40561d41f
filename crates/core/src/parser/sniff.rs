use std::io::{self, BufRead, Cursor, Read};

use super::model::{InputFormat, LogFormat};

/// A reader that replays the sniffed bytes before the rest of the source.
pub type Sniffed<R> = io::Chain<Cursor<Vec<u8>>, R>;

/// Choose a parser by peeking at the first non-blank line.
///
/// A line starting with `{` selects JSON, anything else logfmt. Empty or
/// all-blank input defaults to JSON. Every byte read while peeking, blank
/// lines included, is replayed by the returned reader.
pub fn sniff_format<R: BufRead>(mut reader: R) -> io::Result<(LogFormat, Sniffed<R>)> {
    let mut peeked = Vec::new();

    let format = loop {
        let start = peeked.len();
        if reader.read_until(b'\n', &mut peeked)? == 0 {
            break LogFormat::Json;
        }

        // Blank means what the line parser treats as blank: Unicode
        // whitespace only. Non-UTF-8 bytes count as content.
        let raw = &peeked[start..];
        let line = match std::str::from_utf8(raw) {
            Ok(text) => text.trim().as_bytes(),
            Err(_) => raw,
        };
        if !line.is_empty() {
            break if line.starts_with(b"{") {
                LogFormat::Json
            } else {
                LogFormat::Logfmt
            };
        }
    };

    tracing::debug!(format = %format, peeked_bytes = peeked.len(), "sniffed input format");
    Ok((format, Cursor::new(peeked).chain(reader)))
}

/// Resolve the requested input format, sniffing only for `Auto`.
pub fn resolve_format<R: BufRead>(reader: R, input: InputFormat) -> io::Result<(LogFormat, Sniffed<R>)> {
    match input.fixed() {
        Some(format) => Ok((format, Cursor::new(Vec::new()).chain(reader))),
        None => sniff_format(reader),
    }
}
