//! Descriptor parsing shared by the text and byte predicates.

use crate::{
    Descriptor, MatcherError, MAX_REGEX_PATTERN_LENGTH, REGEX_SIZE_LIMIT,
};
use serde_json::Value;
use std::fmt;

/// How a pattern is applied to a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternMode {
    /// Case-sensitive substring containment.
    Literal,
    /// Unanchored regular expression search.
    Regex,
}

impl fmt::Display for PatternMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal => f.write_str("contains"),
            Self::Regex => f.write_str("pcre"),
        }
    }
}

/// A pattern descriptor resolved to its text and mode, not yet compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParsedPattern {
    pub(crate) text: String,
    pub(crate) mode: PatternMode,
}

impl ParsedPattern {
    /// Resolve a descriptor into pattern text and mode.
    ///
    /// Enforces the regex length limit.
    pub(crate) fn from_descriptor(descriptor: &Descriptor) -> Result<Self, MatcherError> {
        let parsed = match descriptor {
            Descriptor::Text(s) => Self::from_short_form(s),
            Descriptor::Structured(_) => {
                let Some(Value::String(text)) = descriptor.field("value") else {
                    return Err(MatcherError::MissingField { field: "value" });
                };
                let mode = match descriptor.field("matchType") {
                    None => PatternMode::Literal,
                    Some(Value::String(token)) => match_type(token)?,
                    Some(other) => {
                        return Err(MatcherError::UnknownOperator {
                            token: other.to_string(),
                        })
                    }
                };
                Self {
                    text: text.clone(),
                    mode,
                }
            }
            Descriptor::Integer(_) => {
                return Err(MatcherError::InvalidDescriptorType {
                    found: descriptor.kind_name(),
                    expected: "string or object",
                })
            }
        };
        parsed.check_length()?;
        Ok(parsed)
    }

    /// `/…/` (at least two characters) is a regex; anything else is a literal.
    pub(crate) fn from_short_form(s: &str) -> Self {
        match s.strip_prefix('/').and_then(|rest| rest.strip_suffix('/')) {
            Some(inner) => Self {
                text: inner.to_owned(),
                mode: PatternMode::Regex,
            },
            None => Self {
                text: s.to_owned(),
                mode: PatternMode::Literal,
            },
        }
    }

    /// Only regexes are capped; literals of any length are valid.
    fn check_length(&self) -> Result<(), MatcherError> {
        if self.mode == PatternMode::Regex && self.text.len() > MAX_REGEX_PATTERN_LENGTH {
            return Err(MatcherError::PatternTooLong {
                len: self.text.len(),
                max: MAX_REGEX_PATTERN_LENGTH,
            });
        }
        Ok(())
    }
}

fn match_type(token: &str) -> Result<PatternMode, MatcherError> {
    match token.to_lowercase().as_str() {
        "contains" => Ok(PatternMode::Literal),
        "pcre" => Ok(PatternMode::Regex),
        _ => Err(MatcherError::UnknownOperator {
            token: token.to_owned(),
        }),
    }
}

pub(crate) fn compile_regex(pattern: &str) -> Result<regex::Regex, MatcherError> {
    tracing::debug!(pattern, "compiling text regex");
    regex::RegexBuilder::new(pattern)
        .size_limit(REGEX_SIZE_LIMIT)
        .build()
        .map_err(|e| invalid_pattern(pattern, &e))
}

pub(crate) fn compile_bytes_regex(pattern: &str) -> Result<regex::bytes::Regex, MatcherError> {
    tracing::debug!(pattern, "compiling byte regex");
    regex::bytes::RegexBuilder::new(pattern)
        .size_limit(REGEX_SIZE_LIMIT)
        .build()
        .map_err(|e| invalid_pattern(pattern, &e))
}

fn invalid_pattern(pattern: &str, err: &regex::Error) -> MatcherError {
    MatcherError::InvalidPattern {
        pattern: pattern.to_owned(),
        reason: err.to_string(),
    }
}
