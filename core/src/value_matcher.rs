//! `ValueMatcher`: the seam a signature aggregator evaluates predicates through.
//!
//! The trait is intentionally **non-generic**: it matches against the erased
//! [`FieldValue`], so a loader can keep text, numeric and byte predicates in
//! one collection and hand each the field it was declared for.

use crate::FieldValue;
use std::fmt::Debug;

/// Matches against an erased [`FieldValue`].
///
/// A value of a type the matcher does not support never matches. Matching
/// is pure and never fails.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; predicates are built once and
/// shared by every worker that triages crashes.
///
/// # Example
///
/// ```
/// use crashsig::{FieldValue, TextPredicate, ValueMatcher};
///
/// let matcher: Box<dyn ValueMatcher> = Box::new(TextPredicate::literal("SEGV"));
/// assert!(matcher.matches_value(&FieldValue::from("SEGV on unknown address")));
/// assert!(!matcher.matches_value(&FieldValue::Absent));
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `ValueMatcher`",
    label = "this type cannot match against FieldValue",
    note = "use TextPredicate, NumericPredicate or BytePredicate, or implement `matches_value(&self, &FieldValue) -> bool`"
)]
pub trait ValueMatcher: Send + Sync + Debug {
    /// Check if the given value matches.
    fn matches_value(&self, value: &FieldValue) -> bool;

    /// Returns the value types this matcher can match.
    ///
    /// Used by loaders to check a predicate is bound to a compatible field.
    fn supported_types(&self) -> &[&'static str] {
        &["text"]
    }

    /// Whether values of `type_name` can ever match.
    fn accepts(&self, type_name: &str) -> bool {
        self.supported_types().contains(&type_name)
    }
}

impl ValueMatcher for Box<dyn ValueMatcher> {
    fn matches_value(&self, value: &FieldValue) -> bool {
        (**self).matches_value(value)
    }

    fn supported_types(&self) -> &[&'static str] {
        (**self).supported_types()
    }
}
