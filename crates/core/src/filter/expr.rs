use std::fmt;

use super::engine::{FilterError, PatternMatcher};
use super::Filter;
use crate::record::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Ne,
    Regex,
    Ge,
    Le,
    Eq,
    Gt,
    Lt,
}

impl Operator {
    /// Order in which operators are looked for in an expression. Two-byte
    /// operators come before the one-byte operators they contain.
    pub const PRIORITY: [Operator; 7] = [
        Operator::Ne,
        Operator::Regex,
        Operator::Ge,
        Operator::Le,
        Operator::Eq,
        Operator::Gt,
        Operator::Lt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Ne => "!=",
            Operator::Regex => "~",
            Operator::Ge => ">=",
            Operator::Le => "<=",
            Operator::Eq => "=",
            Operator::Gt => ">",
            Operator::Lt => "<",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A compiled `field<op>value` expression.
///
/// Values are compared as strings: the field's canonical string form against
/// the literal, lexicographically for the ordering operators. A record
/// without the field never matches, whatever the operator.
#[derive(Debug, Clone)]
pub struct FieldFilter {
    field: String,
    operator: Operator,
    value: String,
    pattern: Option<PatternMatcher>,
}

impl FieldFilter {
    /// Compile an expression such as `level=error`, `status>=500` or
    /// `msg~timeout`.
    ///
    /// The first operator of [`Operator::PRIORITY`] that occurs anywhere in
    /// the expression splits it, regardless of where the other operators
    /// sit: `a=b!=c` splits on `!=`.
    pub fn compile(expression: &str) -> Result<Self, FilterError> {
        let (operator, idx) = Operator::PRIORITY
            .iter()
            .find_map(|op| expression.find(op.as_str()).map(|idx| (*op, idx)))
            .ok_or_else(|| FilterError::InvalidExpression(expression.to_string()))?;

        let field = &expression[..idx];
        let value = &expression[idx + operator.as_str().len()..];

        let pattern = match operator {
            Operator::Regex => Some(PatternMatcher::new(value)?),
            _ => None,
        };

        Ok(Self {
            field: field.to_string(),
            operator,
            value: value.to_string(),
            pattern,
        })
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl Filter for FieldFilter {
    fn matches(&self, record: &Record) -> bool {
        let Some(value) = record.get(&self.field) else {
            return false;
        };
        let actual = value.to_string();
        let expected = self.value.as_str();

        match self.operator {
            Operator::Eq => actual == expected,
            Operator::Ne => actual != expected,
            Operator::Gt => actual.as_str() > expected,
            Operator::Lt => actual.as_str() < expected,
            Operator::Ge => actual.as_str() >= expected,
            Operator::Le => actual.as_str() <= expected,
            Operator::Regex => self
                .pattern
                .as_ref()
                .is_some_and(|pattern| pattern.is_match(&actual)),
        }
    }
}
