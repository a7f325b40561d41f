use std::io::BufRead;

use tracing::{debug, warn};

use crate::parser::{self, LogFormat};
use crate::record::{ParsedTimestamp, Record};

/// A record loaded for merging, with its origin and sort key.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRecord {
    pub record: Record,
    pub source: String,
    pub timestamp: ParsedTimestamp,
}

/// Drain `reader`, tagging every record with `label`.
///
/// Lines that fail to parse are logged and skipped.
pub fn load_and_tag<R: BufRead>(reader: R, format: LogFormat, label: &str) -> Vec<MergedRecord> {
    load_source(reader, format, label).0
}

fn load_source<R: BufRead>(reader: R, format: LogFormat, label: &str) -> (Vec<MergedRecord>, usize) {
    let mut records = Vec::new();
    let mut errors = 0;

    for outcome in parser::parse(reader, format) {
        match outcome {
            Ok(mut record) => {
                record.tag_source(label);
                let timestamp = record.timestamp();
                records.push(MergedRecord {
                    record,
                    source: label.to_string(),
                    timestamp,
                });
            }
            Err(e) => {
                warn!(source = %label, "parse error: {}", e);
                errors += 1;
            }
        }
    }

    debug!(source = %label, format = %format, records = records.len(), errors, "loaded merge source");
    (records, errors)
}

/// Records gathered from several sources, held in memory until sorted.
#[derive(Debug, Default)]
pub struct MergeSet {
    records: Vec<MergedRecord>,
    parse_errors: usize,
}

impl MergeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load one source; returns how many records it contributed.
    pub fn load<R: BufRead>(&mut self, reader: R, format: LogFormat, label: &str) -> usize {
        let (records, errors) = load_source(reader, format, label);
        let loaded = records.len();
        self.records.extend(records);
        self.parse_errors += errors;
        loaded
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn parse_errors(&self) -> usize {
        self.parse_errors
    }

    /// Stable ascending sort by timestamp. Records without one come first;
    /// ties keep load order (source, then line).
    pub fn into_sorted(self) -> Vec<MergedRecord> {
        let mut records = self.records;
        records.sort_by_key(|r| r.timestamp);
        records
    }
}
