/// Individual log format parsers

pub mod json;
pub mod logfmt;

pub use json::JsonParser;
pub use logfmt::{parse_logfmt, LogfmtParser};
