use std::io::{self, Write};

use tracing::{debug, error, warn};

use super::merge::MergeSet;
use super::stats::{write_stats, StatsCollector};
use crate::filter::{CompositeFilter, Filter};
use crate::format::Formatter;
use crate::parser::ParseError;
use crate::record::Record;

/// What happens to records that pass the filter.
pub enum Stage {
    Render(Box<dyn Formatter>),
    Stats { field: String },
}

/// Counters for one pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub records_read: u64,
    pub records_matched: u64,
    pub records_written: u64,
    pub parse_errors: u64,
    pub format_errors: u64,
}

impl RunSummary {
    /// A run fails when any record could not be rendered.
    pub fn failed(&self) -> bool {
        self.format_errors > 0
    }
}

/// Filter plus output stage, shared by single-source and merge runs.
pub struct Pipeline {
    filter: CompositeFilter,
    stage: Stage,
}

impl Pipeline {
    pub fn new(filter: CompositeFilter, stage: Stage) -> Self {
        Self { filter, stage }
    }

    /// Consume parse outcomes in order.
    ///
    /// Parse and format errors are logged and counted; neither stops the
    /// run. The returned error is reserved for failing to write the stats
    /// table.
    pub fn run<I>(&self, source: &str, outcomes: I, out: &mut dyn Write) -> io::Result<RunSummary>
    where
        I: IntoIterator<Item = Result<Record, ParseError>>,
    {
        let mut summary = RunSummary::default();
        let mut collector = match &self.stage {
            Stage::Stats { field } => Some(StatsCollector::new(field.as_str())),
            Stage::Render(_) => None,
        };

        for outcome in outcomes {
            let record = match outcome {
                Ok(record) => record,
                Err(e) => {
                    warn!(source = %source, "parse error: {}", e);
                    summary.parse_errors += 1;
                    continue;
                }
            };
            summary.records_read += 1;

            if !self.filter.matches(&record) {
                continue;
            }
            summary.records_matched += 1;

            match (&self.stage, collector.as_mut()) {
                (_, Some(collector)) => collector.observe(&record),
                (Stage::Render(formatter), None) => match formatter.format(out, &record) {
                    Ok(()) => summary.records_written += 1,
                    Err(e) => {
                        error!(source = %source, "format error: {}", e);
                        summary.format_errors += 1;
                    }
                },
                (Stage::Stats { .. }, None) => {}
            }
        }

        if let Some(collector) = collector {
            let entries = collector.finish();
            write_stats(out, &entries)?;
            summary.records_written = entries.len() as u64;
        }

        debug!(source = %source, ?summary, "pipeline run finished");
        Ok(summary)
    }

    /// Sort the merged records and run them through the stage. Parse errors
    /// seen while loading are carried into the summary.
    pub fn run_merged(&self, set: MergeSet, out: &mut dyn Write) -> io::Result<RunSummary> {
        let load_errors = set.parse_errors() as u64;
        let records = set.into_sorted().into_iter().map(|merged| Ok(merged.record));

        let mut summary = self.run("merge", records, out)?;
        summary.parse_errors += load_errors;
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{OutputFormat, RenderConfig};
    use crate::parser::{self, LogFormat};
    use std::io::Cursor;

    fn render_stage(format: OutputFormat) -> Stage {
        Stage::Render(RenderConfig { format, ..Default::default() }.build())
    }

    fn run_text(pipeline: &Pipeline, input: &str, format: LogFormat) -> (RunSummary, String) {
        let mut out = Vec::new();
        let outcomes = parser::parse(Cursor::new(input.as_bytes().to_vec()), format);
        let summary = pipeline.run("test", outcomes, &mut out).unwrap();
        (summary, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_filter_then_render() {
        let pipeline = Pipeline::new(
            CompositeFilter::compile(["level=error"]).unwrap(),
            render_stage(OutputFormat::Logfmt),
        );
        let input = "level=info msg=a\nlevel=error msg=b\nlevel=error msg=c\n";
        let (summary, out) = run_text(&pipeline, input, LogFormat::Logfmt);

        assert_eq!(out, "level=error msg=b\nlevel=error msg=c\n");
        assert_eq!(summary.records_read, 3);
        assert_eq!(summary.records_matched, 2);
        assert_eq!(summary.records_written, 2);
        assert!(!summary.failed());
    }

    #[test]
    fn test_bad_lines_do_not_block_later_lines() {
        let pipeline = Pipeline::new(CompositeFilter::default(), render_stage(OutputFormat::Json));
        let input = "{\"n\":1}\nbroken\n[1,2]\n{\"n\":2}\n";
        let (summary, out) = run_text(&pipeline, input, LogFormat::Json);

        assert_eq!(out, "{\"n\":1}\n{\"n\":2}\n");
        assert_eq!(summary.parse_errors, 2);
        assert_eq!(summary.records_read, 2);
        assert!(!summary.failed());
    }

    struct FlakyWriter {
        writes: usize,
        fail_on: usize,
        data: Vec<u8>,
    }

    impl Write for FlakyWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.writes += 1;
            if self.writes == self.fail_on {
                return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
            }
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_format_errors_counted_and_run_continues() {
        let pipeline = Pipeline::new(CompositeFilter::default(), render_stage(OutputFormat::Logfmt));
        let outcomes = ["a", "b", "c"]
            .into_iter()
            .map(|v| Ok([("k", v)].into_iter().collect::<Record>()));
        let mut out = FlakyWriter { writes: 0, fail_on: 2, data: Vec::new() };

        let summary = pipeline.run("test", outcomes, &mut out).unwrap();
        assert_eq!(summary.format_errors, 1);
        assert_eq!(summary.records_written, 2);
        assert!(summary.failed());
        assert_eq!(String::from_utf8(out.data).unwrap(), "k=a\nk=c\n");
    }

    #[test]
    fn test_stats_stage() {
        let pipeline = Pipeline::new(
            CompositeFilter::default(),
            Stage::Stats { field: "level".to_string() },
        );
        let input = "level=info\nlevel=error\nlevel=info\nlevel=info\nlevel=warn\nlevel=warn\nmsg=x\n";
        let (summary, out) = run_text(&pipeline, input, LogFormat::Logfmt);

        assert_eq!(out, "info: 3\nwarn: 2\n(none): 1\nerror: 1\n");
        assert_eq!(summary.records_matched, 7);
        assert!(!summary.failed());
    }

    #[test]
    fn test_run_merged() {
        let mut set = MergeSet::new();
        set.load(
            Cursor::new(b"time=2024-01-01T00:00:02Z msg=late\nbad=\"open\n".to_vec()),
            LogFormat::Logfmt,
            "a",
        );
        set.load(
            Cursor::new(b"{\"time\":\"2024-01-01T00:00:01Z\",\"msg\":\"early\"}\n".to_vec()),
            LogFormat::Json,
            "b",
        );

        let pipeline = Pipeline::new(
            CompositeFilter::compile(["_source~."]).unwrap(),
            render_stage(OutputFormat::Logfmt),
        );
        let mut out = Vec::new();
        let summary = pipeline.run_merged(set, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "_source=b msg=early time=2024-01-01T00:00:01Z\n\
             _source=a msg=late time=2024-01-01T00:00:02Z\n"
        );
        assert_eq!(summary.parse_errors, 1);
        assert_eq!(summary.records_written, 2);
    }
}
