use super::engine::FilterError;
use super::expr::FieldFilter;
use super::Filter;
use crate::record::Record;

/// AND of child filters. With no children it matches every record.
#[derive(Default)]
pub struct CompositeFilter {
    filters: Vec<Box<dyn Filter>>,
}

impl CompositeFilter {
    pub fn new(filters: Vec<Box<dyn Filter>>) -> Self {
        Self { filters }
    }

    /// Compile every expression; the first bad one fails the whole set.
    pub fn compile<I, S>(expressions: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let filters = expressions
            .into_iter()
            .map(|expr| {
                FieldFilter::compile(expr.as_ref()).map(|f| Box::new(f) as Box<dyn Filter>)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(filters))
    }

    pub fn push(&mut self, filter: Box<dyn Filter>) {
        self.filters.push(filter);
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl Filter for CompositeFilter {
    fn matches(&self, record: &Record) -> bool {
        self.filters.iter().all(|f| f.matches(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Value;

    fn record(fields: &[(&str, &str)]) -> Record {
        fields.iter().copied().collect()
    }

    #[test]
    fn test_empty_matches_everything() {
        let cf = CompositeFilter::default();
        assert!(cf.is_empty());
        assert!(cf.matches(&Record::new()));
        assert!(cf.matches(&record(&[("level", "info"), ("msg", "anything")])));
    }

    #[test]
    fn test_and_semantics() {
        let cf = CompositeFilter::compile(["level=error", "service=api"]).unwrap();
        assert_eq!(cf.len(), 2);

        assert!(cf.matches(&record(&[("level", "error"), ("service", "api")])));
        assert!(!cf.matches(&record(&[("level", "info"), ("service", "api")])));
        assert!(!cf.matches(&record(&[("level", "error"), ("service", "web")])));
        assert!(!cf.matches(&record(&[("level", "info"), ("service", "web")])));
    }

    #[test]
    fn test_mixed_operators() {
        let cf = CompositeFilter::compile(["level=error", "msg~timeout"]).unwrap();
        assert!(cf.matches(&record(&[("level", "error"), ("msg", "db timeout")])));
        assert!(!cf.matches(&record(&[("level", "error"), ("msg", "normal error")])));
    }

    #[test]
    fn test_compile_fails_on_any_bad_expression() {
        let result = CompositeFilter::compile(vec!["level=error".to_string(), "garbage".to_string()]);
        assert!(matches!(result, Err(FilterError::InvalidExpression(e)) if e == "garbage"));
    }

    #[test]
    fn test_push() {
        let mut cf = CompositeFilter::default();
        cf.push(Box::new(FieldFilter::compile("ok=true").unwrap()));

        let mut yes = Record::new();
        yes.insert("ok", Value::Bool(true));
        let no = Record::new();

        assert_eq!(cf.len(), 1);
        assert!(cf.matches(&yes));
        assert!(!cf.matches(&no));
    }
}
