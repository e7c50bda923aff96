//! `BytePredicate`: binary-safe twin of [`TextPredicate`](crate::TextPredicate).

use crate::pattern::{compile_bytes_regex, ParsedPattern};
use crate::{Descriptor, FieldValue, MatcherError, PatternMode, ValueMatcher};
use memchr::memmem;
use std::fmt;

/// Matches raw bytes (stderr captured without decoding, testcase payloads).
///
/// Accepts the same descriptors as [`TextPredicate`](crate::TextPredicate).
/// Regexes run with Unicode mode on, so `.` still matches a whole UTF-8
/// sequence; prefix a pattern with `(?-u)` to match arbitrary bytes.
///
/// # Example
///
/// ```
/// use crashsig::BytePredicate;
///
/// let p = BytePredicate::parse("/MOZ_CRASH\\(.*\\)/").unwrap();
/// assert!(p.matches(b"\xff\xfeHit MOZ_CRASH(oom) at foo.cpp:1"));
/// ```
#[derive(Debug, Clone)]
pub struct BytePredicate {
    pattern: Pattern,
}

#[derive(Debug, Clone)]
enum Pattern {
    Literal(memmem::Finder<'static>),
    Regex(regex::bytes::Regex),
}

impl BytePredicate {
    /// Build a predicate from a descriptor.
    ///
    /// # Errors
    ///
    /// Same as [`TextPredicate::new`](crate::TextPredicate::new).
    pub fn new(descriptor: &Descriptor) -> Result<Self, MatcherError> {
        let parsed = ParsedPattern::from_descriptor(descriptor)?;
        match parsed.mode {
            PatternMode::Literal => Ok(Self::literal(parsed.text.into_bytes())),
            PatternMode::Regex => Self::regex(&parsed.text),
        }
    }

    /// Build a predicate from the string short form.
    ///
    /// # Errors
    ///
    /// Returns [`MatcherError::InvalidPattern`] for a malformed `/regex/`.
    pub fn parse(s: &str) -> Result<Self, MatcherError> {
        Self::new(&Descriptor::from(s))
    }

    /// A literal byte-substring predicate.
    ///
    /// The substring searcher is built here, once.
    #[must_use]
    pub fn literal(pattern: impl Into<Vec<u8>>) -> Self {
        let needle: Vec<u8> = pattern.into();
        Self {
            pattern: Pattern::Literal(memmem::Finder::new(&needle).into_owned()),
        }
    }

    /// A regex search predicate over bytes.
    ///
    /// # Errors
    ///
    /// Returns [`MatcherError::InvalidPattern`] if the pattern does not compile.
    pub fn regex(pattern: &str) -> Result<Self, MatcherError> {
        Ok(Self {
            pattern: Pattern::Regex(compile_bytes_regex(pattern)?),
        })
    }

    /// Whether the candidate satisfies this predicate.
    #[must_use]
    pub fn matches(&self, candidate: &[u8]) -> bool {
        match &self.pattern {
            Pattern::Literal(finder) => finder.find(candidate).is_some(),
            Pattern::Regex(re) => re.is_match(candidate),
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

impl ValueMatcher for BytePredicate {
    fn matches_value(&self, value: &FieldValue) -> bool {
        value.as_bytes().is_some_and(|b| self.matches(b))
    }

    fn supported_types(&self) -> &[&'static str] {
        &["bytes"]
    }
}

impl fmt::Display for BytePredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.pattern {
            Pattern::Literal(finder) => f.write_str(&String::from_utf8_lossy(finder.needle())),
            Pattern::Regex(re) => write!(f, "/{}/", re.as_str()),
        }
    }
}
