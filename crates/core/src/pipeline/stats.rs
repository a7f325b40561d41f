use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::io::{self, Write};

use crate::filter::Filter;
use crate::record::Record;

/// Label counted for records that lack the field.
pub const NONE_LABEL: &str = "(none)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatEntry {
    pub value: String,
    pub count: u64,
}

impl StatEntry {
    pub fn new(value: impl Into<String>, count: u64) -> Self {
        Self {
            value: value.into(),
            count,
        }
    }
}

impl fmt::Display for StatEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.value, self.count)
    }
}

/// Running frequency tally of one field's canonical string form.
#[derive(Debug, Clone)]
pub struct StatsCollector {
    field: String,
    counts: HashMap<String, u64>,
}

impl StatsCollector {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            counts: HashMap::new(),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn observe(&mut self, record: &Record) {
        let value = record
            .get(&self.field)
            .map(|v| v.to_string())
            .unwrap_or_else(|| NONE_LABEL.to_string());
        *self.counts.entry(value).or_insert(0) += 1;
    }

    /// Entries by descending count, ties by ascending value.
    pub fn finish(self) -> Vec<StatEntry> {
        let mut entries: Vec<StatEntry> = self
            .counts
            .into_iter()
            .map(|(value, count)| StatEntry { value, count })
            .collect();
        entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
        entries
    }
}

/// Tally `field` over the records accepted by `filter`.
pub fn compute_stats<I>(records: I, filter: &dyn Filter, field: &str) -> Vec<StatEntry>
where
    I: IntoIterator,
    I::Item: Borrow<Record>,
{
    let mut collector = StatsCollector::new(field);
    for record in records {
        let record = record.borrow();
        if filter.matches(record) {
            collector.observe(record);
        }
    }
    collector.finish()
}

/// Print one `value: count` line per entry.
pub fn write_stats(out: &mut dyn Write, entries: &[StatEntry]) -> io::Result<()> {
    for entry in entries {
        writeln!(out, "{}", entry)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::CompositeFilter;
    use crate::record::Value;

    fn levels(values: &[&str]) -> Vec<Record> {
        values
            .iter()
            .map(|level| [("level", *level)].into_iter().collect())
            .collect()
    }

    #[test]
    fn test_frequency_order() {
        let records = levels(&["info", "error", "info", "info", "warn", "warn"]);
        let stats = compute_stats(&records, &CompositeFilter::default(), "level");
        assert_eq!(
            stats,
            vec![
                StatEntry::new("info", 3),
                StatEntry::new("warn", 2),
                StatEntry::new("error", 1),
            ]
        );
    }

    #[test]
    fn test_ties_sorted_by_value() {
        let records = levels(&["b", "c", "a", "c", "a", "b"]);
        let stats = compute_stats(records, &CompositeFilter::default(), "level");
        let values: Vec<&str> = stats.iter().map(|e| e.value.as_str()).collect();
        assert_eq!(values, ["a", "b", "c"]);
    }

    #[test]
    fn test_missing_field_counted_as_none() {
        let mut records = levels(&["info"]);
        records.push(Record::new());
        records.push([("other", "x")].into_iter().collect());
        let stats = compute_stats(&records, &CompositeFilter::default(), "level");
        assert_eq!(stats, vec![StatEntry::new(NONE_LABEL, 2), StatEntry::new("info", 1)]);
    }

    #[test]
    fn test_only_matching_records_counted() {
        let records: Vec<Record> = [("api", "error"), ("api", "info"), ("web", "error")]
            .iter()
            .map(|(svc, level)| [("service", *svc), ("level", *level)].into_iter().collect())
            .collect();
        let filter = CompositeFilter::compile(["service=api"]).unwrap();
        let stats = compute_stats(&records, &filter, "level");
        assert_eq!(stats, vec![StatEntry::new("error", 1), StatEntry::new("info", 1)]);
    }

    #[test]
    fn test_non_string_values_use_canonical_form() {
        let mut collector = StatsCollector::new("status");
        for status in [200.0, 500.0, 200.0] {
            let mut r = Record::new();
            r.insert("status", Value::Number(status));
            collector.observe(&r);
        }
        assert_eq!(collector.field(), "status");
        assert_eq!(
            collector.finish(),
            vec![StatEntry::new("200", 2), StatEntry::new("500", 1)]
        );
    }

    #[test]
    fn test_write_stats_lines() {
        let mut out = Vec::new();
        write_stats(&mut out, &[StatEntry::new("info", 3), StatEntry::new("(none)", 1)]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "info: 3\n(none): 1\n");
    }

    #[test]
    fn test_empty_input() {
        let stats = compute_stats(Vec::<Record>::new(), &CompositeFilter::default(), "level");
        assert!(stats.is_empty());
    }
}
