//! Shell-quote tokenization and regex matchers
//!
//! Transcript lines are command lines as a POSIX shell would read them, so
//! splitting follows shell quoting rules rather than plain whitespace. The
//! matchers are the "any"/"all" regex predicates the mining rules are built from.

use regex::Regex;
use thiserror::Error;

/// A line that could not be split into shell tokens
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to tokenize line: '{line}'")]
pub struct TokenizeError {
    pub line: String,
}

/// Splits a line by shell quoting rules
///
/// Leading and trailing whitespace is ignored. Unbalanced quotes or a dangling
/// escape produce a [`TokenizeError`] carrying the offending line.
pub fn split_line(line: &str) -> Result<Vec<String>, TokenizeError> {
    shlex::split(line.trim()).ok_or_else(|| TokenizeError {
        line: line.to_string(),
    })
}

/// Splits a line by shell quoting rules, returning `None` instead of failing
pub fn try_split_line(line: &str) -> Option<Vec<String>> {
    shlex::split(line.trim())
}

/// A compiled list of regular expressions
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<Regex>,
}

impl PatternSet {
    pub fn new<I, S>(patterns: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|pattern| Regex::new(pattern.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Builds a set matching each string literally
    pub fn literal<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = items
            .into_iter()
            .map(|item| Regex::new(&regex::escape(item.as_ref())).expect("escaped literal"))
            .collect();
        Self { patterns }
    }

    /// True iff any pattern is found in `item`
    pub fn matches_any(&self, item: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.is_match(item))
    }

    /// True iff every pattern is found in `item` (vacuously true when empty)
    pub fn matches_all(&self, item: &str) -> bool {
        self.patterns.iter().all(|pattern| pattern.is_match(item))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Prefixed join used when rendering lists into debug logs
pub fn prefixed_join<S: AsRef<str>>(separator: &str, items: &[S]) -> String {
    let mut joined = String::new();
    for item in items {
        joined.push_str(separator);
        joined.push_str(item.as_ref());
    }
    joined
}
