//! crashsig - match-predicate engine for crash signature triage
//!
//! Crash signatures are built from two leaf predicates that are evaluated
//! against values an external parser pulled out of a crash report:
//!
//! - [`TextPredicate`]: literal substring or regex search over a string
//! - [`NumericPredicate`]: comparison of an optional address against a reference
//!
//! Both are built once from a [`Descriptor`] (the declarative form found in a
//! signature file) and then queried many times. Every malformed descriptor is
//! rejected at construction with a [`MatcherError`]; `matches` never fails.
//!
//! # Architecture
//!
//! - [`Descriptor`]: Tagged union of descriptor shapes (string, integer, object)
//! - [`FieldValue`]: Type-erased crash field value (text, number, bytes, absent)
//! - [`ValueMatcher`]: Non-generic matching seam shared by all predicates
//! - [`PredicateKind`]: Which predicate a descriptor should compile into
//!
//! # Example
//!
//! ```
//! use crashsig::prelude::*;
//!
//! let text = TextPredicate::parse("/SEGV on unknown address 0x0+/").unwrap();
//! assert!(text.matches("ERROR: AddressSanitizer: SEGV on unknown address 0x000000000000"));
//!
//! let address = NumericPredicate::parse("< 1000").unwrap();
//! assert!(address.matches_u64(Some(0x10)));
//! assert!(!address.matches_u64(None));
//! ```
//!
//! # Submission boundary
//!
//! The [`submission`] module carries the wire shape and retry policy of the
//! crash submission client. It performs no network I/O.

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod bytes;
mod descriptor;
mod kind;
mod numeric;
mod pattern;
mod text;
mod value;
mod value_matcher;

pub mod submission;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

pub use bytes::BytePredicate;
pub use descriptor::Descriptor;
pub use kind::PredicateKind;
pub use numeric::{parse_hex, NumericOperator, NumericPredicate};
pub use pattern::PatternMode;
pub use text::TextPredicate;
pub use value::FieldValue;
pub use value_matcher::ValueMatcher;

/// Re-exported so callers can build numeric candidates without a direct dependency.
pub use num_bigint::BigUint;

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use crashsig::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        BigUint, BytePredicate, Descriptor, FieldValue, MatcherError, NumericOperator,
        NumericPredicate, PatternMode, PredicateKind, TextPredicate, ValueMatcher,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════════

/// Maximum length for regex patterns.
///
/// Literal patterns are not limited; their search cost is linear in the
/// candidate whatever their length.
pub const MAX_REGEX_PATTERN_LENGTH: usize = 4096;

/// Upper bound, in bytes, on the compiled size of a single regex.
pub const REGEX_SIZE_LIMIT: usize = 1 << 20;

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Errors from predicate construction.
///
/// Every variant is produced while building a predicate from its descriptor,
/// never while matching. The signature loader decides whether to skip, warn
/// or abort on them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatcherError {
    /// A required descriptor field is absent or is not a string.
    #[error("descriptor is missing required string field \"{field}\"")]
    MissingField {
        /// Name of the missing field.
        field: &'static str,
    },

    /// A match type or comparison operator token is not recognized.
    #[error("unknown match operator specified: \"{token}\"")]
    UnknownOperator {
        /// The offending token, as written.
        token: String,
    },

    /// A regular expression failed to compile.
    #[error("invalid regular expression \"{pattern}\": {reason}")]
    InvalidPattern {
        /// The pattern that failed to compile.
        pattern: String,
        /// The compiler diagnostic.
        reason: String,
    },

    /// A numeric literal is not a valid base-16 number.
    #[error("invalid number specified: \"{text}\"")]
    InvalidNumber {
        /// The offending text.
        text: String,
    },

    /// The descriptor has a shape this predicate does not accept.
    #[error("descriptor of type {found} is not valid here, expected {expected}")]
    InvalidDescriptorType {
        /// Shape that was supplied (`"bool"`, `"array"`, `"object"`, ...).
        found: &'static str,
        /// Shapes that would have been accepted.
        expected: &'static str,
    },

    /// A pattern exceeds the maximum allowed length.
    #[error("pattern length is {len}, but maximum allowed is {max}")]
    PatternTooLong {
        /// Actual length of the pattern.
        len: usize,
        /// Maximum allowed length.
        max: usize,
    },

    /// A predicate kind name is not recognized.
    #[error("unknown predicate kind \"{name}\", expected text, numeric or bytes")]
    UnknownKind {
        /// The offending name, as written.
        name: String,
    },
}
