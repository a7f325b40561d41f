use crate::parser::traits::*;
use crate::record::{Record, Value};

/// Line-delimited JSON parser.
///
/// Every line must hold one JSON object. Numbers become f64, booleans and
/// null keep their own kinds, nested objects and arrays are kept as-is.
pub struct JsonParser;

impl LogParser for JsonParser {
    fn parse_line(&self, line: &str) -> Result<Record, LineError> {
        match serde_json::from_str::<serde_json::Value>(line)? {
            serde_json::Value::Object(map) => Ok(Record::from(map)),
            other => Err(LineError::NotAnObject(Value::from(other).kind())),
        }
    }

    fn format(&self) -> LogFormat {
        LogFormat::Json
    }
}
