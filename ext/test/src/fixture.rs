//! Conformance test fixture runner
//!
//! Loads YAML fixtures and runs them against the crashsig predicates.
//!
//! ```yaml
//! name: regex_short_form
//! description: Slash-delimited strings are regex searches
//! kind: text
//! descriptor: "/abc.*/"
//! cases:
//!   - name: match_inside
//!     value: "xxabcyy"
//!     expect: true
//!   - name: absent_never_matches
//!     expect: false
//! ```
//!
//! A fixture whose descriptor must be rejected sets `expect_error` to the
//! snake_case variant name (see [`error_kind`](crate::error_kind)) and has no
//! cases.

use crate::{error_kind, field_value};
use crashsig::{Descriptor, PredicateKind};
use serde::Deserialize;

/// A complete test fixture
#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub name: String,
    pub description: String,
    pub kind: PredicateKind,
    pub descriptor: Descriptor,
    #[serde(default)]
    pub expect_error: Option<String>,
    #[serde(default)]
    pub cases: Vec<TestCase>,
}

/// Test case. A missing `value` is the absent value.
#[derive(Debug, Deserialize)]
pub struct TestCase {
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
    pub expect: bool,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Runner
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of running a single test case
#[derive(Debug)]
pub struct CaseResult {
    pub case_name: String,
    pub passed: bool,
    pub expected: String,
    pub actual: String,
}

impl Fixture {
    /// Parse a fixture from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Parse multiple fixtures from a YAML file with `---` separators
    pub fn from_yaml_multi(yaml: &str) -> Result<Vec<Self>, serde_yaml::Error> {
        let mut fixtures = Vec::new();
        for doc in serde_yaml::Deserializer::from_str(yaml) {
            fixtures.push(Self::deserialize(doc)?);
        }
        Ok(fixtures)
    }

    /// Run all test cases and return results.
    ///
    /// Construction is reported as a case named `<construct>`.
    pub fn run(&self) -> Vec<CaseResult> {
        let matcher = match (self.kind.compile(&self.descriptor), &self.expect_error) {
            (Ok(matcher), None) => matcher,
            (Err(err), Some(expected)) => {
                return vec![CaseResult {
                    case_name: "<construct>".into(),
                    passed: error_kind(&err) == expected,
                    expected: expected.clone(),
                    actual: format!("{} ({err})", error_kind(&err)),
                }];
            }
            (Ok(_), Some(expected)) => {
                return vec![CaseResult {
                    case_name: "<construct>".into(),
                    passed: false,
                    expected: expected.clone(),
                    actual: "predicate built".into(),
                }];
            }
            (Err(err), None) => {
                return vec![CaseResult {
                    case_name: "<construct>".into(),
                    passed: false,
                    expected: "predicate built".into(),
                    actual: err.to_string(),
                }];
            }
        };

        self.cases
            .iter()
            .map(|case| match field_value(self.kind, case.value.as_deref()) {
                Ok(value) => {
                    let actual = matcher.matches_value(&value);
                    CaseResult {
                        case_name: case.name.clone(),
                        passed: actual == case.expect,
                        expected: case.expect.to_string(),
                        actual: actual.to_string(),
                    }
                }
                Err(text) => CaseResult {
                    case_name: case.name.clone(),
                    passed: false,
                    expected: case.expect.to_string(),
                    actual: format!("unparseable candidate {text:?}"),
                },
            })
            .collect()
    }

    /// Run all test cases and panic on first failure
    pub fn run_and_assert(&self) {
        let results = self.run();
        for result in results {
            assert!(
                result.passed,
                "Fixture '{}' case '{}' failed: expected {}, got {}",
                self.name, result.case_name, result.expected, result.actual
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_runs() {
        let yaml = r#"
name: literal
description: plain substring
kind: text
descriptor: abc
cases:
  - name: hit
    value: xxabcyy
    expect: true
  - name: absent
    expect: false
"#;
        let fixture = Fixture::from_yaml(yaml).unwrap();
        assert_eq!(fixture.kind, PredicateKind::Text);
        assert_eq!(fixture.descriptor, Descriptor::from("abc"));
        fixture.run_and_assert();
    }

    #[test]
    fn wrong_expectation_is_reported() {
        let yaml = r#"
name: numeric
description: equality
kind: numeric
descriptor: "10"
cases:
  - name: wrong
    value: "11"
    expect: true
"#;
        let results = Fixture::from_yaml(yaml).unwrap().run();
        assert_eq!(results.len(), 1);
        assert!(!results[0].passed);
    }

    #[test]
    fn expected_error() {
        let yaml = r#"
name: bad
description: unknown operator
kind: numeric
descriptor: "~ 10"
expect_error: unknown_operator
"#;
        let results = Fixture::from_yaml(yaml).unwrap().run();
        assert_eq!(results.len(), 1);
        assert!(results[0].passed, "{results:?}");
    }

    #[test]
    fn multi_document() {
        let yaml = r#"
name: a
description: a
kind: bytes
descriptor: x
cases: []
---
name: b
description: b
kind: text
descriptor: { value: y, matchType: contains }
cases: []
"#;
        let fixtures = Fixture::from_yaml_multi(yaml).unwrap();
        assert_eq!(fixtures.len(), 2);
        assert_eq!(fixtures[1].name, "b");
    }
}
