//! `Descriptor`: the declarative form a predicate is built from.
//!
//! Signature files describe each predicate with one of three shapes: a bare
//! string, an integer, or an object with named fields. The shape is resolved
//! once, when the descriptor is deserialized, and predicate constructors
//! match on the variant instead of inspecting types at runtime.

use crate::MatcherError;
use num_bigint::BigUint;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Number, Value};

/// A predicate descriptor as found in a signature file.
///
/// Deserializes from any JSON or YAML value. Strings, non-negative integers
/// and objects are accepted; every other shape is rejected with
/// [`MatcherError::InvalidDescriptorType`].
///
/// # Example
///
/// ```
/// use crashsig::Descriptor;
///
/// let d: Descriptor = serde_json::from_str(r#"{"value": "SEGV", "matchType": "contains"}"#).unwrap();
/// assert_eq!(d.kind_name(), "object");
///
/// let d: Descriptor = serde_json::from_str(r#""< 7fff0000""#).unwrap();
/// assert_eq!(d, Descriptor::from("< 7fff0000"));
///
/// assert!(serde_json::from_str::<Descriptor>("true").is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Descriptor {
    /// A bare string: literal pattern, `/regex/` short form, or numeric comparison.
    Text(String),
    /// A bare non-negative integer (numeric equality).
    Integer(BigUint),
    /// A structured object. Unknown fields are kept and ignored.
    Structured(Map<String, Value>),
}

impl Descriptor {
    /// Returns a short name of this descriptor's shape, for diagnostics.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "string",
            Self::Integer(_) => "integer",
            Self::Structured(_) => "object",
        }
    }

    /// Look up a field of a structured descriptor.
    ///
    /// Returns `None` for non-structured descriptors and for fields that are
    /// absent or explicitly `null`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Self::Structured(map) => map.get(name).filter(|v| !v.is_null()),
            _ => None,
        }
    }
}

impl TryFrom<Value> for Descriptor {
    type Error = MatcherError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(Self::Text(s)),
            Value::Object(map) => Ok(Self::Structured(map)),
            Value::Number(n) => integer_from_number(&n).map(Self::Integer),
            other => Err(MatcherError::InvalidDescriptorType {
                found: json_type_name(&other),
                expected: "string, integer or object",
            }),
        }
    }
}

impl<'de> Deserialize<'de> for Descriptor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::try_from(value).map_err(serde::de::Error::custom)
    }
}

impl From<&str> for Descriptor {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for Descriptor {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<u64> for Descriptor {
    fn from(n: u64) -> Self {
        Self::Integer(BigUint::from(n))
    }
}

impl From<BigUint> for Descriptor {
    fn from(n: BigUint) -> Self {
        Self::Integer(n)
    }
}

impl From<Map<String, Value>> for Descriptor {
    fn from(map: Map<String, Value>) -> Self {
        Self::Structured(map)
    }
}

/// Numbers keep their source digits, so integers past `u64::MAX` survive.
fn integer_from_number(n: &Number) -> Result<BigUint, MatcherError> {
    let text = n.to_string();
    if text.contains(['.', 'e', 'E']) {
        return Err(MatcherError::InvalidDescriptorType {
            found: "float",
            expected: "string, integer or object",
        });
    }
    if text.starts_with('-') {
        return Err(MatcherError::InvalidNumber { text });
    }
    BigUint::parse_bytes(text.as_bytes(), 10).ok_or(MatcherError::InvalidNumber { text })
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
