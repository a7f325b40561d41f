use std::io::Write;

use super::{FormatError, Formatter};
use crate::record::Record;

/// `key=value` pairs sorted by key.
///
/// Values containing a space, tab or double quote are quoted, with inner
/// quotes backslash-escaped.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogfmtFormatter;

impl Formatter for LogfmtFormatter {
    fn format(&self, out: &mut dyn Write, record: &Record) -> Result<(), FormatError> {
        let mut line = record
            .iter()
            .map(|(key, value)| format!("{}={}", key, quote_value(&value.to_string())))
            .collect::<Vec<_>>()
            .join(" ");
        line.push('\n');
        out.write_all(line.as_bytes())?;
        Ok(())
    }
}

fn quote_value(value: &str) -> String {
    if value.contains([' ', '\t', '"']) {
        format!("\"{}\"", value.replace('"', "\\\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Value;

    fn render(record: &Record) -> String {
        let mut out = Vec::new();
        LogfmtFormatter.format(&mut out, record).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_keys_sorted() {
        let record: Record = [("zebra", "z"), ("apple", "a"), ("mango", "m")].into_iter().collect();
        assert_eq!(render(&record), "apple=a mango=m zebra=z\n");
    }

    #[test]
    fn test_quoting() {
        let record: Record = [("msg", "hello world")].into_iter().collect();
        assert_eq!(render(&record), "msg=\"hello world\"\n");

        let record: Record = [("msg", "a\tb")].into_iter().collect();
        assert_eq!(render(&record), "msg=\"a\tb\"\n");

        let record: Record = [("msg", r#"say "hi""#)].into_iter().collect();
        assert_eq!(render(&record), "msg=\"say \\\"hi\\\"\"\n");

        let record: Record = [("path", "/api/v1")].into_iter().collect();
        assert_eq!(render(&record), "path=/api/v1\n");
    }

    #[test]
    fn test_non_string_values() {
        let record: Record = [
            ("n", Value::Number(3.0)),
            ("ok", Value::Bool(true)),
            ("none", Value::Null),
        ]
        .into_iter()
        .collect();
        assert_eq!(render(&record), "n=3 none=null ok=true\n");
    }

    #[test]
    fn test_nested_object_is_quoted_json_when_needed() {
        let inner: Record = [("k", "v")].into_iter().collect();
        let record: Record = [("ctx", Value::Object(inner))].into_iter().collect();
        assert_eq!(render(&record), "ctx=\"{\\\"k\\\":\\\"v\\\"}\"\n");
    }

    #[test]
    fn test_empty_record_is_blank_line() {
        assert_eq!(render(&Record::new()), "\n");
    }
}
