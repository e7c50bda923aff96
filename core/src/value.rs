//! `FieldValue`: a crash field value as handed over by the report parser.
//!
//! The parser extracts many kinds of facts from a crash (assertion text,
//! faulting address, raw stderr). `FieldValue` erases them into one type so
//! that every predicate can be held behind the same [`ValueMatcher`](crate::ValueMatcher)
//! seam.

use num_bigint::BigUint;

/// The erased crash field value.
///
/// - `Absent`: the parser could not determine the value. This is a real
///   answer, not an error: [`NumericPredicate::absent`](crate::NumericPredicate::absent)
///   matches it.
/// - `Text`: decoded text (assertion message, frame, abort line)
/// - `Number`: an unbounded non-negative integer (usually an address)
/// - `Bytes`: undecoded bytes
///
/// # Example
///
/// ```
/// use crashsig::FieldValue;
///
/// let v = FieldValue::from(Some(0x7fffu64));
/// assert_eq!(v.type_name(), "number");
///
/// let v = FieldValue::from(None::<u64>);
/// assert!(v.is_absent());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldValue {
    /// No value could be determined.
    #[default]
    Absent,
    /// Decoded text.
    Text(String),
    /// A non-negative integer of any magnitude.
    Number(BigUint),
    /// Raw bytes.
    Bytes(Vec<u8>),
}

impl FieldValue {
    /// Returns `true` if this is the `Absent` variant.
    #[inline]
    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Try to get the value as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Try to get the value as a number.
    #[inline]
    #[must_use]
    pub fn as_number(&self) -> Option<&BigUint> {
        match self {
            Self::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Try to get the value as a byte slice.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b.as_slice()),
            _ => None,
        }
    }

    /// Returns a string describing the type of this value.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Text(_) => "text",
            Self::Number(_) => "number",
            Self::Bytes(_) => "bytes",
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<u64> for FieldValue {
    fn from(n: u64) -> Self {
        Self::Number(BigUint::from(n))
    }
}

impl From<BigUint> for FieldValue {
    fn from(n: BigUint) -> Self {
        Self::Number(n)
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(b)
    }
}

impl<T> From<Option<T>> for FieldValue
where
    T: Into<FieldValue>,
{
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Absent, Into::into)
    }
}
