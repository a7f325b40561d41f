//! Field expressions (`field<op>value`) compiled into record
//! predicates, combined with AND.

mod composite;
mod engine;
mod expr;

pub use composite::CompositeFilter;
pub use engine::{FilterError, PatternMatcher};
pub use expr::{FieldFilter, Operator};

use crate::record::Record;

pub trait Filter: Send + Sync {
    /// true when the record satisfies this predicate
    fn matches(&self, record: &Record) -> bool;
}
