//! `TextPredicate`: literal or regex matching over extracted crash text.

use crate::pattern::{compile_regex, ParsedPattern};
use crate::{Descriptor, FieldValue, MatcherError, PatternMode, ValueMatcher};
use std::fmt;
use std::str::FromStr;

/// Decides whether a string (an assertion message, an abort line, a frame)
/// satisfies a textual pattern.
///
/// Literal patterns match as case-sensitive substrings. Regex patterns are
/// compiled once at construction and then searched for anywhere in the
/// candidate (not anchored).
///
/// # Example
///
/// ```
/// use crashsig::{Descriptor, TextPredicate};
///
/// let p = TextPredicate::parse("/abc.*/").unwrap();
/// assert!(p.matches("xxabcyy"));
/// assert!(!p.matches("xyz"));
///
/// let d: Descriptor = serde_json::from_str(r#"{"value": "SEGV", "matchType": "contains"}"#).unwrap();
/// let p = TextPredicate::new(&d).unwrap();
/// assert!(p.matches("signal SEGV received"));
/// ```
#[derive(Debug, Clone)]
pub struct TextPredicate {
    pattern: Pattern,
}

#[derive(Debug, Clone)]
enum Pattern {
    Literal(String),
    Regex(regex::Regex),
}

impl TextPredicate {
    /// Build a predicate from a descriptor.
    ///
    /// # Errors
    ///
    /// - [`MatcherError::MissingField`] if a structured descriptor has no string `value`
    /// - [`MatcherError::UnknownOperator`] if `matchType` is neither `contains` nor `pcre`
    /// - [`MatcherError::InvalidPattern`] if the regex does not compile
    /// - [`MatcherError::InvalidDescriptorType`] for integer descriptors
    /// - [`MatcherError::PatternTooLong`] if the pattern exceeds the length limit
    pub fn new(descriptor: &Descriptor) -> Result<Self, MatcherError> {
        let parsed = ParsedPattern::from_descriptor(descriptor)?;
        match parsed.mode {
            PatternMode::Literal => Ok(Self::literal(parsed.text)),
            PatternMode::Regex => Self::regex(&parsed.text),
        }
    }

    /// Build a predicate from the string short form (`/regex/` or a literal).
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new) for a string descriptor.
    pub fn parse(s: &str) -> Result<Self, MatcherError> {
        Self::new(&Descriptor::from(s))
    }

    /// A literal substring predicate.
    #[must_use]
    pub fn literal(pattern: impl Into<String>) -> Self {
        Self {
            pattern: Pattern::Literal(pattern.into()),
        }
    }

    /// A regex search predicate.
    ///
    /// Uses the `regex` crate, so search time is linear in the candidate length.
    ///
    /// # Errors
    ///
    /// Returns [`MatcherError::InvalidPattern`] if the pattern does not compile.
    pub fn regex(pattern: &str) -> Result<Self, MatcherError> {
        Ok(Self {
            pattern: Pattern::Regex(compile_regex(pattern)?),
        })
    }

    /// Whether the candidate satisfies this predicate.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        match &self.pattern {
            Pattern::Literal(needle) => candidate.contains(needle.as_str()),
            Pattern::Regex(re) => re.is_match(candidate),
        }
    }

    /// The pattern text, without the `/…/` delimiters of the short form.
    #[must_use]
    pub fn pattern(&self) -> &str {
        match &self.pattern {
            Pattern::Literal(s) => s,
            Pattern::Regex(re) => re.as_str(),
        }
    }

    /// How the pattern is applied.
    #[must_use]
    pub fn mode(&self) -> PatternMode {
        match self.pattern {
            Pattern::Literal(_) => PatternMode::Literal,
            Pattern::Regex(_) => PatternMode::Regex,
        }
    }
}

impl ValueMatcher for TextPredicate {
    fn matches_value(&self, value: &FieldValue) -> bool {
        value.as_str().is_some_and(|s| self.matches(s))
    }

    fn supported_types(&self) -> &[&'static str] {
        &["text"]
    }
}

impl FromStr for TextPredicate {
    type Err = MatcherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Literals render as themselves, regexes inside `/…/`.
impl fmt::Display for TextPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.pattern {
            Pattern::Literal(s) => f.write_str(s),
            Pattern::Regex(re) => write!(f, "/{}/", re.as_str()),
        }
    }
}
