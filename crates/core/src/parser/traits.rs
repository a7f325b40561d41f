pub use super::model::{LineError, LogFormat};
use crate::record::Record;

pub trait LogParser: Send + Sync {
    /// parse one trimmed, non-blank line into a record
    fn parse_line(&self, line: &str) -> Result<Record, LineError>;
    fn format(&self) -> LogFormat;
}
