//! Output renderers: human-readable text, JSON, and logfmt.

mod color;
mod json;
mod logfmt;
mod text;

pub use color::Palette;
pub use json::JsonFormatter;
pub use logfmt::LogfmtFormatter;
pub use text::{display_timestamp, TextFormatter};

use std::fmt;
use std::io::Write;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::record::Record;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to marshal JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub trait Formatter: Send + Sync {
    /// Write one record to `out`, including its line terminator.
    fn format(&self, out: &mut dyn Write, record: &Record) -> Result<(), FormatError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Logfmt,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::Logfmt => "logfmt",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "logfmt" => Ok(OutputFormat::Logfmt),
            other => Err(format!("unsupported output format: {}", other)),
        }
    }
}

/// Renderer selection and options.
///
/// `color` and `fields` only affect text output, `pretty` only JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub color: bool,
    pub pretty: bool,
    pub fields: Vec<String>,
}

impl RenderConfig {
    pub fn build(&self) -> Box<dyn Formatter> {
        match self.format {
            OutputFormat::Text => {
                let palette = self.color.then_some(Palette::ANSI);
                Box::new(TextFormatter::new(palette, self.fields.clone()))
            }
            OutputFormat::Json => Box::new(JsonFormatter::new(self.pretty)),
            OutputFormat::Logfmt => Box::new(LogfmtFormatter),
        }
    }
}
