//! Conformance tests that run YAML fixtures against crashsig
//!
//! Run with: cargo test -p crashsig-test --test conformance

use crashsig_test::fixture::Fixture;
use std::fs;
use std::path::{Path, PathBuf};

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Load and run all fixtures in a directory
fn run_fixtures_in_dir(dir: &Path) {
    assert!(dir.exists(), "Fixtures directory does not exist: {}", dir.display());

    let mut ran = 0;
    for entry in fs::read_dir(dir).expect("read dir") {
        let path = entry.expect("dir entry").path();

        if path
            .extension()
            .is_some_and(|e| e == "yaml" || e == "yml")
        {
            println!("Running fixture: {}", path.display());

            let yaml = fs::read_to_string(&path).expect("read yaml");
            let fixtures = Fixture::from_yaml_multi(&yaml).unwrap_or_else(|e| {
                panic!("Failed to parse {}: {}", path.display(), e);
            });

            for fixture in fixtures {
                println!("  Running: {}", fixture.name);
                fixture.run_and_assert();
                ran += 1;
            }
        }
    }
    assert!(ran > 0, "no fixtures in {}", dir.display());
}

#[test]
fn test_text_predicates() {
    run_fixtures_in_dir(&fixtures_dir().join("01_text"));
}

#[test]
fn test_numeric_predicates() {
    run_fixtures_in_dir(&fixtures_dir().join("02_numeric"));
}

#[test]
fn test_byte_predicates() {
    run_fixtures_in_dir(&fixtures_dir().join("03_bytes"));
}

#[test]
fn test_construction_errors() {
    run_fixtures_in_dir(&fixtures_dir().join("04_errors"));
}

#[test]
fn test_unsupported_descriptor_shape_fails_to_load() {
    let yaml = r#"
name: boolean
description: booleans are not descriptors
kind: numeric
descriptor: true
cases: []
"#;
    let err = Fixture::from_yaml(yaml).unwrap_err();
    assert!(err.to_string().contains("bool"), "{err}");
}
