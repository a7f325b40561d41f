use std::io::Write;

use super::{FormatError, Formatter};
use crate::record::Record;

/// One JSON object per record, compact or indented by two spaces.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, out: &mut dyn Write, record: &Record) -> Result<(), FormatError> {
        let mut data = if self.pretty {
            serde_json::to_vec_pretty(record)?
        } else {
            serde_json::to_vec(record)?
        };
        data.push(b'\n');
        out.write_all(&data)?;
        Ok(())
    }
}
