use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use serde::{Deserialize, Serialize};

use super::formats::{JsonParser, LogfmtParser};
use super::traits::LogParser;

/// A concrete input format with a parser behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line
    Json,
    /// Logfmt key=value lines
    Logfmt,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Json => "json",
            LogFormat::Logfmt => "logfmt",
        }
    }

    pub fn parser(&self) -> Box<dyn LogParser> {
        match self {
            LogFormat::Json => Box::new(JsonParser),
            LogFormat::Logfmt => Box::new(LogfmtParser),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(LogFormat::Json),
            "logfmt" => Ok(LogFormat::Logfmt),
            other => Err(format!("unsupported log format: {}", other)),
        }
    }
}

/// Input format as requested by the user; `Auto` sniffs the stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    #[default]
    Auto,
    Json,
    Logfmt,
}

impl InputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputFormat::Auto => "auto",
            InputFormat::Json => "json",
            InputFormat::Logfmt => "logfmt",
        }
    }

    /// The fixed format, or `None` when the stream must be sniffed.
    pub fn fixed(&self) -> Option<LogFormat> {
        match self {
            InputFormat::Auto => None,
            InputFormat::Json => Some(LogFormat::Json),
            InputFormat::Logfmt => Some(LogFormat::Logfmt),
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(InputFormat::Auto),
            "json" => Ok(InputFormat::Json),
            "logfmt" => Ok(InputFormat::Logfmt),
            other => Err(format!("unsupported input format: {}", other)),
        }
    }
}

/// Why a single line could not be turned into a record.
#[derive(Debug, Error)]
pub enum LineError {
    #[error("{0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),

    #[error("unterminated string value")]
    UnterminatedString,

    #[error("line too large: {0} bytes (max: {1} bytes)")]
    LineTooLarge(usize, usize),

    #[error("non-UTF8 content")]
    NonUtf8,
}

#[derive(Debug, Error)]
pub enum ParseError {
    /// Recoverable: the line is skipped and parsing continues.
    #[error("line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: LineError,
    },

    /// The underlying reader failed; no further outcomes follow.
    #[error("read error: {0}")]
    Io(#[from] std::io::Error),
}

impl ParseError {
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::Line { line, .. } => Some(*line),
            ParseError::Io(_) => None,
        }
    }
}
