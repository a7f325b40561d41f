use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use anyhow::{Context, Result};
use logpipe_core::parser::{self, resolve_format, sniff_format};
use logpipe_core::pipeline::{MergeSet, Pipeline, RunSummary, Stage};
use logpipe_core::CompositeFilter;
use tracing::{info, warn};

use crate::cli::Cli;
use crate::config::LogpipeConfig;

/// Wire sources, filters and the output stage together and run them.
///
/// `stdin` is read only when neither `--file` nor `--merge` is given. Merge
/// sources are always sniffed one by one, so JSON and logfmt files can be
/// mixed; the configured input format only applies to a single source.
pub fn run(cli: &Cli, config: &LogpipeConfig, stdin: &mut dyn BufRead, out: &mut dyn Write) -> Result<RunSummary> {
    let filter = CompositeFilter::compile(&cli.filters).context("Failed to compile filters")?;

    let stage = match &cli.stats {
        Some(field) => Stage::Stats { field: field.clone() },
        None => Stage::Render(config.output.build()),
    };
    let pipeline = Pipeline::new(filter, stage);

    let summary = if cli.merge.is_empty() {
        let (label, reader): (String, Box<dyn BufRead + '_>) = match &cli.file {
            Some(path) => (path.display().to_string(), Box::new(BufReader::new(open(path)?))),
            None => ("stdin".to_string(), Box::new(stdin)),
        };

        let (format, reader) = resolve_format(reader, config.input)
            .with_context(|| format!("Failed to read {}", label))?;
        info!(source = %label, format = %format, "reading input");

        pipeline.run(&label, parser::parse(reader, format), out)
    } else {
        if config.input.fixed().is_some() {
            warn!(input = %config.input, "input format ignored in merge mode; each source is sniffed");
        }

        let mut set = MergeSet::new();
        for path in &cli.merge {
            let reader = BufReader::new(open(path)?);
            let (format, reader) = sniff_format(reader)
                .with_context(|| format!("Failed to read {}", path.display()))?;

            let label = source_label(path);
            let loaded = set.load(reader, format, &label);
            info!(source = %label, format = %format, records = loaded, "loaded merge source");
        }
        info!(sources = cli.merge.len(), records = set.len(), "merging");

        pipeline.run_merged(set, out)
    }
    .context("Failed to write output")?;

    out.flush().context("Failed to flush output")?;
    info!(
        read = summary.records_read,
        matched = summary.records_matched,
        parse_errors = summary.parse_errors,
        format_errors = summary.format_errors,
        "done"
    );
    Ok(summary)
}

fn open(path: &Path) -> Result<File> {
    File::open(path).with_context(|| format!("Failed to open {}", path.display()))
}

/// A merge source is labelled by its file name.
fn source_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
