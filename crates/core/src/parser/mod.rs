/// Log parsing and format sniffing
///
/// Turns a byte stream into records, one line at a time.
///
/// # Architecture
///
/// - `traits.rs`: the per-line parser trait
/// - `formats/`: line-delimited JSON and logfmt implementations
/// - `stream.rs`: lazy sequence of per-line outcomes over a reader
/// - `sniff.rs`: input format detection that never loses bytes
///
/// # Error isolation
///
/// Each line yields exactly one outcome, either a record or an error tagged
/// with its 1-based line number, in input order. A bad line never stalls or
/// aborts the lines after it, and there is no second channel to drain.

pub mod formats;
pub mod model;
pub mod sniff;
pub mod stream;
pub mod traits;

pub use formats::{JsonParser, LogfmtParser};
pub use model::{InputFormat, LineError, LogFormat, ParseError};
pub use sniff::{resolve_format, sniff_format, Sniffed};
pub use stream::{parse, ParseStream};
pub use traits::LogParser;

pub const MAX_LINE_SIZE: usize = 1_048_576; // 1MB
