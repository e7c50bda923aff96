//! Pathological-regex behaviour of `/regex/` text predicates.
//!
//! Pattern: `(a+)+$` against `"a" * N + "X"`
//!
//! - Backtracking engines: O(2^N), hangs at N=25+
//! - Rust `regex` crate: O(N), microseconds even at N=100
//!
//! Signature files come from many contributors, so a bad pattern must not
//! stall triage of every later crash.

use crashsig::prelude::*;

fn main() {
    divan::main();
}

/// Nested quantifier with anchor.
const REDOS_PATTERN: &str = "/(a+)+$/";

/// N 'a's followed by 'X', forcing a full backtrack attempt.
fn pathological_input(n: usize) -> String {
    "a".repeat(n) + "X"
}

// ═══════════════════════════════════════════════════════════════════════════════
// TextPredicate
// ═══════════════════════════════════════════════════════════════════════════════

#[divan::bench(args = [10, 20, 25, 30, 50, 100])]
fn redos_text_predicate(bencher: divan::Bencher, n: usize) {
    let predicate = TextPredicate::parse(REDOS_PATTERN).unwrap();
    let input = pathological_input(n);

    bencher.bench_local(|| predicate.matches(&input));
}

#[divan::bench(args = [10, 50, 100])]
fn redos_byte_predicate(bencher: divan::Bencher, n: usize) {
    let predicate = BytePredicate::parse(REDOS_PATTERN).unwrap();
    let input = pathological_input(n).into_bytes();

    bencher.bench_local(|| predicate.matches(&input));
}

// ═══════════════════════════════════════════════════════════════════════════════
// Through the ValueMatcher seam
// ═══════════════════════════════════════════════════════════════════════════════

#[divan::bench(args = [10, 50, 100])]
fn redos_value_matcher(bencher: divan::Bencher, n: usize) {
    let matcher = PredicateKind::Text
        .compile(&Descriptor::from(REDOS_PATTERN))
        .unwrap();
    let value = FieldValue::from(pathological_input(n));

    bencher.bench_local(|| matcher.matches_value(&value));
}

// ═══════════════════════════════════════════════════════════════════════════════
// Safe regex for comparison
// ═══════════════════════════════════════════════════════════════════════════════

#[divan::bench(args = [10, 50, 100])]
fn safe_regex_match(bencher: divan::Bencher, n: usize) {
    let predicate = TextPredicate::parse("/^a+X$/").unwrap();
    let input = pathological_input(n);

    // Matches, unlike the pathological pattern.
    bencher.bench_local(|| predicate.matches(&input));
}
