//! `NumericPredicate`: comparisons over crash addresses and other numbers.
//!
//! Descriptor grammar:
//!
//! ```text
//! ""                      reference absent: matches only an absent candidate
//! [<op>] <hex-digits>     op is one of ==, <, <=, >, >= (default ==)
//! <integer>               equality with a decimal integer literal
//! ```
//!
//! Numbers are unbounded ([`BigUint`]) so addresses are never truncated.

use crate::{Descriptor, FieldValue, MatcherError, ValueMatcher};
use num_bigint::BigUint;
use std::fmt;
use std::str::FromStr;

/// Comparison applied between a candidate and the reference value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NumericOperator {
    /// `==`
    #[default]
    Equal,
    /// `>=`
    GreaterEqual,
    /// `>`
    Greater,
    /// `<=`
    LessEqual,
    /// `<`
    Less,
}

impl NumericOperator {
    /// Map a descriptor token to an operator.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "==" => Some(Self::Equal),
            "<" => Some(Self::Less),
            "<=" => Some(Self::LessEqual),
            ">" => Some(Self::Greater),
            ">=" => Some(Self::GreaterEqual),
            _ => None,
        }
    }

    /// The descriptor token for this operator.
    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            Self::Equal => "==",
            Self::GreaterEqual => ">=",
            Self::Greater => ">",
            Self::LessEqual => "<=",
            Self::Less => "<",
        }
    }

    /// Apply `candidate <op> reference`.
    #[must_use]
    pub fn apply(self, candidate: &BigUint, reference: &BigUint) -> bool {
        match self {
            Self::Equal => candidate == reference,
            Self::GreaterEqual => candidate >= reference,
            Self::Greater => candidate > reference,
            Self::LessEqual => candidate <= reference,
            Self::Less => candidate < reference,
        }
    }
}

impl FromStr for NumericOperator {
    type Err = MatcherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_token(s).ok_or_else(|| MatcherError::UnknownOperator {
            token: s.to_owned(),
        })
    }
}

impl fmt::Display for NumericOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Decides whether an optional number satisfies a comparison.
///
/// Absence is a first-class value: a predicate built from `""` matches only
/// an absent candidate (e.g. "the faulting address could not be computed"),
/// and a predicate with a reference never matches an absent candidate.
///
/// # Example
///
/// ```
/// use crashsig::{NumericOperator, NumericPredicate};
///
/// let p = NumericPredicate::parse("< 7fff0000").unwrap();
/// assert_eq!(p.operator(), NumericOperator::Less);
/// assert!(p.matches_u64(Some(0x1000)));
/// assert!(!p.matches_u64(Some(0x8000_0000)));
///
/// let unknown = NumericPredicate::parse("").unwrap();
/// assert!(unknown.matches_u64(None));
/// assert!(!unknown.matches_u64(Some(0)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NumericPredicate {
    operator: NumericOperator,
    reference: Option<BigUint>,
}

impl NumericPredicate {
    /// Build a predicate from a descriptor.
    ///
    /// # Errors
    ///
    /// - [`MatcherError::UnknownOperator`] for an unrecognized comparison token
    /// - [`MatcherError::InvalidNumber`] if the value is not base-16
    /// - [`MatcherError::InvalidDescriptorType`] for structured descriptors
    pub fn new(descriptor: &Descriptor) -> Result<Self, MatcherError> {
        let predicate = match descriptor {
            Descriptor::Integer(n) => Self::equal(n.clone()),
            Descriptor::Text(s) => Self::parse_text(s)?,
            Descriptor::Structured(_) => {
                return Err(MatcherError::InvalidDescriptorType {
                    found: descriptor.kind_name(),
                    expected: "string or integer",
                })
            }
        };
        tracing::debug!(predicate = %predicate, "built numeric predicate");
        Ok(predicate)
    }

    /// Build a predicate from its string form.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new) for a string descriptor.
    pub fn parse(s: &str) -> Result<Self, MatcherError> {
        Self::new(&Descriptor::from(s))
    }

    /// Matches candidates equal to `reference`.
    #[must_use]
    pub fn equal(reference: impl Into<BigUint>) -> Self {
        Self::compare(NumericOperator::Equal, reference)
    }

    /// Matches candidates for which `candidate <operator> reference` holds.
    #[must_use]
    pub fn compare(operator: NumericOperator, reference: impl Into<BigUint>) -> Self {
        Self {
            operator,
            reference: Some(reference.into()),
        }
    }

    /// Matches only an absent candidate.
    #[must_use]
    pub fn absent() -> Self {
        Self {
            operator: NumericOperator::Equal,
            reference: None,
        }
    }

    /// Whether the candidate satisfies this predicate.
    #[must_use]
    pub fn matches(&self, candidate: Option<&BigUint>) -> bool {
        match (candidate, &self.reference) {
            (None, reference) => reference.is_none(),
            (Some(_), None) => false,
            (Some(candidate), Some(reference)) => self.operator.apply(candidate, reference),
        }
    }

    /// [`matches`](Self::matches) for machine-word candidates.
    #[must_use]
    pub fn matches_u64(&self, candidate: Option<u64>) -> bool {
        self.matches(candidate.map(BigUint::from).as_ref())
    }

    /// The comparison operator. Only meaningful when a reference is present.
    #[must_use]
    pub fn operator(&self) -> NumericOperator {
        self.operator
    }

    /// The reference value, or `None` for the absence predicate.
    #[must_use]
    pub fn reference(&self) -> Option<&BigUint> {
        self.reference.as_ref()
    }

    fn parse_text(text: &str) -> Result<Self, MatcherError> {
        if text.is_empty() {
            return Ok(Self::absent());
        }

        let trimmed = text.trim();
        let (operator, number) = match trimmed.split_once(char::is_whitespace) {
            Some((token, rest)) => (token.parse::<NumericOperator>()?, rest.trim_start()),
            None => (NumericOperator::Equal, trimmed),
        };

        Ok(Self::compare(operator, parse_hex(number)?))
    }
}

/// Parse an unbounded base-16 number, as written in numeric descriptors
/// and crash report fields.
///
/// A `0x`/`0X` prefix is tolerated; signs, separators and whitespace are not.
///
/// ```
/// use crashsig::{parse_hex, BigUint};
///
/// assert_eq!(parse_hex("0x7fff0000").unwrap(), BigUint::from(0x7fff_0000u32));
/// assert!(parse_hex("+ff").is_err());
/// ```
///
/// # Errors
///
/// [`MatcherError::InvalidNumber`] naming `text` if it is not valid hex.
pub fn parse_hex(text: &str) -> Result<BigUint, MatcherError> {
    let invalid = || MatcherError::InvalidNumber {
        text: text.to_owned(),
    };
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    BigUint::parse_bytes(digits.as_bytes(), 16).ok_or_else(invalid)
}

impl ValueMatcher for NumericPredicate {
    fn matches_value(&self, value: &FieldValue) -> bool {
        match value {
            FieldValue::Absent => self.matches(None),
            FieldValue::Number(n) => self.matches(Some(n)),
            _ => false,
        }
    }

    fn supported_types(&self) -> &[&'static str] {
        &["number", "absent"]
    }
}

impl FromStr for NumericPredicate {
    type Err = MatcherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Renders in descriptor form, so the output parses back to an equal predicate.
impl fmt::Display for NumericPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.reference, self.operator) {
            (None, _) => Ok(()),
            (Some(reference), NumericOperator::Equal) => write!(f, "{reference:x}"),
            (Some(reference), operator) => write!(f, "{operator} {reference:x}"),
        }
    }
}
