use crate::parser::traits::*;
use crate::record::{Record, Value};

pub struct LogfmtParser;

impl LogParser for LogfmtParser {
    fn parse_line(&self, line: &str) -> Result<Record, LineError> {
        parse_logfmt(line)
    }

    fn format(&self) -> LogFormat {
        LogFormat::Logfmt
    }
}

/// Parse one logfmt line into a record.
///
/// The line is scanned left to right:
/// - a token without `=` turns the whole rest of the line into a single
///   flag name mapped to `true`, and scanning stops;
/// - `key=value` with an unquoted value runs to the next whitespace;
/// - `key="..."` runs to the next `"` whose preceding byte is not `\`.
///   The bytes between the quotes are stored verbatim, escapes included.
///   Only that single preceding byte is inspected, so a value ending in an
///   escaped backslash (`"a\\"`) is misread as an escaped quote.
///
/// A quoted value with no closing quote fails the whole line.
pub fn parse_logfmt(line: &str) -> Result<Record, LineError> {
    let mut record = Record::new();
    let mut remaining = line;

    loop {
        remaining = remaining.trim();
        if remaining.is_empty() {
            break;
        }

        let token_end = remaining
            .find(char::is_whitespace)
            .unwrap_or(remaining.len());
        let Some(eq_idx) = remaining[..token_end].find('=') else {
            // Bare flag: everything that is left becomes its name.
            record.insert(remaining, Value::Bool(true));
            break;
        };

        let key = &remaining[..eq_idx];
        remaining = &remaining[eq_idx + 1..];

        let value = if remaining.starts_with('"') {
            let end = closing_quote(remaining.as_bytes()).ok_or(LineError::UnterminatedString)?;
            let value = &remaining[1..end];
            remaining = &remaining[end + 1..];
            value
        } else {
            match remaining.find(char::is_whitespace) {
                Some(ws) => {
                    let value = &remaining[..ws];
                    remaining = &remaining[ws..];
                    value
                }
                None => std::mem::take(&mut remaining),
            }
        };

        record.insert(key, value);
    }

    Ok(record)
}

/// Index of the closing quote in `s`, where `s[0]` is the opening quote.
fn closing_quote(s: &[u8]) -> Option<usize> {
    (1..s.len()).find(|&i| s[i] == b'"' && s[i - 1] != b'\\')
}
