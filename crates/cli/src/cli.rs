use std::path::PathBuf;

use clap::Parser;
use logpipe_core::{InputFormat, OutputFormat};

use crate::config::LogpipeConfig;

#[derive(Debug, Parser)]
#[command(name = "logpipe", version)]
#[command(about = "Filter, merge and re-render structured logs", long_about = None)]
pub struct Cli {
    /// Read from this file instead of stdin
    #[arg(long, value_name = "PATH", conflicts_with = "merge")]
    pub file: Option<PathBuf>,

    /// Merge several files into one stream ordered by timestamp
    #[arg(long, value_name = "PATH", num_args = 1..)]
    pub merge: Vec<PathBuf>,

    /// Input format: auto, json or logfmt
    #[arg(long, value_name = "FORMAT")]
    pub input: Option<InputFormat>,

    /// Output format: text, json or logfmt
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Colorize text output
    #[arg(long)]
    pub color: bool,

    /// Indent JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Extra fields to show in text output, comma separated
    #[arg(long, value_name = "FIELDS", value_delimiter = ',')]
    pub fields: Vec<String>,

    /// Filter expression such as level=error or msg~timeout (repeatable, ANDed)
    #[arg(long = "filter", value_name = "EXPR")]
    pub filters: Vec<String>,

    /// Print value counts for this field instead of records
    #[arg(long, value_name = "FIELD")]
    pub stats: Option<String>,

    /// Configuration file
    #[arg(long, value_name = "PATH", env = "LOGPIPE_CONFIG")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Override configuration with the flags that were actually given.
    pub fn apply(&self, config: &mut LogpipeConfig) {
        if let Some(input) = self.input {
            config.input = input;
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if self.color {
            config.output.color = true;
        }
        if self.pretty {
            config.output.pretty = true;
        }
        if !self.fields.is_empty() {
            config.output.fields = self.fields.clone();
        }
    }
}
