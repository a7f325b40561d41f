use std::fmt;
use grep_matcher::Matcher;
use grep_regex::{RegexMatcher, RegexMatcherBuilder};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("invalid filter expression: {0}")]
    InvalidExpression(String),

    #[error("invalid regex in filter: {0}")]
    InvalidRegex(String),
}

/// Compiled pattern for the `~` operator.
///
/// Case-sensitive and unanchored: it matches anywhere in the value unless
/// the pattern anchors itself.
#[derive(Clone)]
pub struct PatternMatcher {
    pattern: String,
    matcher: RegexMatcher,
}

impl PatternMatcher {
    pub fn new(pattern: &str) -> Result<Self, FilterError> {
        let matcher = RegexMatcherBuilder::new()
            .case_insensitive(false)
            .multi_line(false)
            .build(pattern)
            .map_err(|e| FilterError::InvalidRegex(e.to_string()))?;

        Ok(Self {
            pattern: pattern.to_string(),
            matcher,
        })
    }

    #[inline]
    pub fn is_match(&self, text: &str) -> bool {
        self.matcher.is_match(text.as_bytes()).unwrap_or(false)
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }
}

impl fmt::Debug for PatternMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PatternMatcher").field(&self.pattern).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unanchored_match() {
        let m = PatternMatcher::new("timeout").unwrap();
        assert!(m.is_match("connection timeout exceeded"));
        assert!(!m.is_match("connection refused"));
    }

    #[test]
    fn test_case_sensitive() {
        let m = PatternMatcher::new("^ERROR").unwrap();
        assert!(m.is_match("ERROR: disk full"));
        assert!(!m.is_match("error: lowercase"));
        assert!(!m.is_match("an ERROR later"));
    }

    #[test]
    fn test_inline_flags_still_apply() {
        let m = PatternMatcher::new("(?i)error").unwrap();
        assert!(m.is_match("Error: something"));
    }

    #[test]
    fn test_invalid_regex() {
        let result = PatternMatcher::new("[invalid");
        assert!(matches!(result, Err(FilterError::InvalidRegex(_))));
    }

    #[test]
    fn test_keeps_source_pattern() {
        let m = PatternMatcher::new(r"\d+ms").unwrap();
        assert_eq!(m.as_str(), r"\d+ms");
        assert!(m.is_match("took 15ms"));
    }
}
