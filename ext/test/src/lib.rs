//! crashsig-test: conformance fixtures for the crashsig predicate engine
//!
//! Fixtures are YAML documents that name a predicate kind, give a descriptor
//! exactly as it would appear in a signature file, and list candidate values
//! with the expected outcome. Candidates are written as strings and turned
//! into a [`FieldValue`] according to the predicate kind.
//!
//! # Example
//!
//! ```
//! use crashsig_test::prelude::*;
//!
//! let value = field_value(PredicateKind::Numeric, Some("0x10")).unwrap();
//! assert_eq!(value, FieldValue::from(16u64));
//!
//! let value = field_value(PredicateKind::Numeric, None).unwrap();
//! assert!(value.is_absent());
//! ```

use crashsig::{parse_hex, FieldValue, MatcherError, PredicateKind};

pub mod fixture;

/// Convert a fixture candidate into the value a parser would produce.
///
/// `None` is the absent value. Numeric candidates are base-16 with an
/// optional `0x` prefix; byte candidates are the UTF-8 bytes of the string.
///
/// # Errors
///
/// Returns the offending text if a numeric candidate is not valid hex.
pub fn field_value(kind: PredicateKind, candidate: Option<&str>) -> Result<FieldValue, String> {
    let Some(text) = candidate else {
        return Ok(FieldValue::Absent);
    };
    match kind {
        PredicateKind::Text => Ok(FieldValue::from(text)),
        PredicateKind::Bytes => Ok(FieldValue::from(text.as_bytes().to_vec())),
        PredicateKind::Numeric => parse_hex(text)
            .map(FieldValue::from)
            .map_err(|_| text.to_owned()),
    }
}

/// Stable snake_case name of an error variant, as used in fixtures.
#[must_use]
pub fn error_kind(err: &MatcherError) -> &'static str {
    match err {
        MatcherError::MissingField { .. } => "missing_field",
        MatcherError::UnknownOperator { .. } => "unknown_operator",
        MatcherError::InvalidPattern { .. } => "invalid_pattern",
        MatcherError::InvalidNumber { .. } => "invalid_number",
        MatcherError::InvalidDescriptorType { .. } => "invalid_descriptor_type",
        MatcherError::PatternTooLong { .. } => "pattern_too_long",
        MatcherError::UnknownKind { .. } => "unknown_kind",
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::fixture::Fixture;
    pub use super::{error_kind, field_value};
    pub use crashsig::prelude::*;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_and_bytes_candidates() {
        assert_eq!(
            field_value(PredicateKind::Text, Some("abc")).unwrap(),
            FieldValue::from("abc")
        );
        assert_eq!(
            field_value(PredicateKind::Bytes, Some("abc")).unwrap(),
            FieldValue::from(b"abc".to_vec())
        );
    }

    #[test]
    fn numeric_candidates_are_hex() {
        assert_eq!(
            field_value(PredicateKind::Numeric, Some("ff")).unwrap(),
            FieldValue::from(255u64)
        );
        assert_eq!(
            field_value(PredicateKind::Numeric, Some("0XFF")).unwrap(),
            FieldValue::from(255u64)
        );
        assert_eq!(
            field_value(PredicateKind::Numeric, Some("zz")).unwrap_err(),
            "zz"
        );
    }

    #[test]
    fn numeric_candidates_reject_signs_and_separators() {
        for text in ["+ff", "f_f", "-1", "0x"] {
            assert_eq!(
                field_value(PredicateKind::Numeric, Some(text)).unwrap_err(),
                text
            );
        }
    }

    #[test]
    fn absent_candidate() {
        for kind in [PredicateKind::Text, PredicateKind::Numeric, PredicateKind::Bytes] {
            assert!(field_value(kind, None).unwrap().is_absent());
        }
    }

    #[test]
    fn error_kinds() {
        let err = MatcherError::InvalidNumber { text: "q".into() };
        assert_eq!(error_kind(&err), "invalid_number");
        let err = MatcherError::MissingField { field: "value" };
        assert_eq!(error_kind(&err), "missing_field");
    }
}
