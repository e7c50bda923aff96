//! `PredicateKind`: which predicate a descriptor compiles into.
//!
//! A descriptor alone does not say whether `"10"` is a substring or the
//! address `0x10`; the signature schema decides that by the field the
//! descriptor is attached to. Loaders carry that decision as a
//! `PredicateKind` and compile through [`compile()`](PredicateKind::compile).

use crate::{
    BytePredicate, Descriptor, MatcherError, NumericPredicate, TextPredicate, ValueMatcher,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The predicate type a descriptor is compiled into.
///
/// # Example
///
/// ```
/// use crashsig::{Descriptor, FieldValue, PredicateKind};
///
/// let matcher = PredicateKind::Numeric.compile(&Descriptor::from(">= 1000")).unwrap();
/// assert!(matcher.matches_value(&FieldValue::from(0x1000u64)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredicateKind {
    /// [`TextPredicate`]
    Text,
    /// [`NumericPredicate`]
    Numeric,
    /// [`BytePredicate`]
    Bytes,
}

impl PredicateKind {
    /// Compile a descriptor into a boxed [`ValueMatcher`].
    ///
    /// # Errors
    ///
    /// Whatever the chosen predicate's constructor reports.
    pub fn compile(self, descriptor: &Descriptor) -> Result<Box<dyn ValueMatcher>, MatcherError> {
        let matcher: Box<dyn ValueMatcher> = match self {
            Self::Text => Box::new(TextPredicate::new(descriptor)?),
            Self::Numeric => Box::new(NumericPredicate::new(descriptor)?),
            Self::Bytes => Box::new(BytePredicate::new(descriptor)?),
        };
        Ok(matcher)
    }

    /// Name used in descriptor files.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Numeric => "numeric",
            Self::Bytes => "bytes",
        }
    }
}

impl FromStr for PredicateKind {
    type Err = MatcherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "numeric" => Ok(Self::Numeric),
            "bytes" => Ok(Self::Bytes),
            _ => Err(MatcherError::UnknownKind { name: s.to_owned() }),
        }
    }
}

impl fmt::Display for PredicateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
