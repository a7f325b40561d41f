// Module structure for the logpipe core library.

// Data model
pub mod record;

// Stages
pub mod parser;
pub mod filter;
pub mod format;
pub mod pipeline;

pub use filter::{CompositeFilter, FieldFilter, Filter, FilterError, Operator};
pub use format::{FormatError, Formatter, OutputFormat, Palette, RenderConfig};
pub use parser::{InputFormat, LogFormat, ParseError};
pub use pipeline::{Pipeline, RunSummary, Stage};
pub use record::{ParsedTimestamp, Record, Value};
