use std::io::Write;

use super::{FormatError, Formatter, Palette};
use crate::record::{is_canonical_key, ParsedTimestamp, Record, LEVEL_KEYS, MESSAGE_KEYS, TIME_KEYS};

/// Width of the timestamp column; also the fallback prefix length for
/// timestamps that cannot be interpreted.
const TIMESTAMP_WIDTH: usize = 15;

/// Human-readable `<time> [LEVEL] message key=value ...` lines.
///
/// Without a palette the output is plain text. `fields` restricts the
/// trailing pairs to the named fields in the given order; when it is empty
/// every non-canonical field is shown, sorted by name.
#[derive(Debug, Clone, Default)]
pub struct TextFormatter {
    palette: Option<Palette>,
    fields: Vec<String>,
}

impl TextFormatter {
    pub fn new(palette: Option<Palette>, fields: Vec<String>) -> Self {
        Self { palette, fields }
    }

    fn render_timestamp(&self, raw: &str) -> String {
        if !raw.is_empty() {
            return display_timestamp(raw);
        }

        let blank = " ".repeat(TIMESTAMP_WIDTH);
        match &self.palette {
            Some(palette) => palette.paint(&[palette.gray], &blank),
            None => blank,
        }
    }

    fn render_level(&self, level: &str) -> String {
        let upper = level.to_uppercase();
        let Some(palette) = &self.palette else {
            return format!("[{:<5}]", upper);
        };

        match level.to_lowercase().as_str() {
            "error" | "err" | "fatal" | "crit" => palette.paint(&[palette.red, palette.bold], "[ERROR]"),
            "warn" | "warning" => palette.paint(&[palette.yellow, palette.bold], "[WARN ]"),
            "info" | "information" => palette.paint(&[palette.green, palette.bold], "[INFO ]"),
            _ => palette.paint(&[palette.gray], &format!("[{}]", upper)),
        }
    }

    fn extras(&self, record: &Record) -> Vec<String> {
        if self.fields.is_empty() {
            record
                .iter()
                .filter(|(key, _)| !is_canonical_key(key))
                .map(|(key, value)| format!("{}={}", key, value))
                .collect()
        } else {
            self.fields
                .iter()
                .filter_map(|key| record.get(key).map(|value| format!("{}={}", key, value)))
                .collect()
        }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, out: &mut dyn Write, record: &Record) -> Result<(), FormatError> {
        let slot = |keys: &[&str]| record.first_of(keys).map(|v| v.to_string()).unwrap_or_default();

        let timestamp = self.render_timestamp(&slot(TIME_KEYS));
        let level = self.render_level(&slot(LEVEL_KEYS));
        let message = slot(MESSAGE_KEYS);

        let extras = self.extras(record);
        let tail = if extras.is_empty() {
            String::new()
        } else {
            let joined = extras.join(" ");
            match &self.palette {
                Some(palette) => format!(" {}", palette.paint(&[palette.gray], &joined)),
                None => format!(" {}", joined),
            }
        };

        let line = format!("{} {} {}{}\n", timestamp, level, message, tail);
        out.write_all(line.as_bytes())?;
        Ok(())
    }
}

/// Normalise a raw timestamp for display: epoch seconds and RFC 3339 values
/// become `HH:MM:SS` (UTC), anything else is cut to its first 15 characters.
pub fn display_timestamp(raw: &str) -> String {
    ParsedTimestamp::parse(raw)
        .clock()
        .unwrap_or_else(|| raw.chars().take(TIMESTAMP_WIDTH).collect())
}
