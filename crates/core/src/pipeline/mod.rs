//! Orchestration: filter and render a stream of parse outcomes, merge
//! several sources by timestamp, or tally one field.

mod merge;
mod run;
mod stats;

pub use merge::{load_and_tag, MergeSet, MergedRecord};
pub use run::{Pipeline, RunSummary, Stage};
pub use stats::{compute_stats, write_stats, StatEntry, StatsCollector, NONE_LABEL};
