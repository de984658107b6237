//! Conformance tests that run YAML fixtures against the engine
//!
//! Run with: cargo test -p triage-test --test conformance

use std::fs;
use std::path::{Path, PathBuf};
use triage_test::Fixture;

/// The fixtures directory shipped with this crate.
fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Load and run all fixtures in a directory.
fn run_fixtures_in_dir(dir: &Path) {
    assert!(
        dir.exists(),
        "fixtures directory does not exist: {}",
        dir.display()
    );

    let mut ran = 0;
    for entry in fs::read_dir(dir).expect("read dir") {
        let path = entry.expect("dir entry").path();
        if !path
            .extension()
            .is_some_and(|e| e == "yaml" || e == "yml")
        {
            continue;
        }

        println!("Running fixture file: {}", path.display());
        let yaml = fs::read_to_string(&path).expect("read yaml");

        // A file may hold multiple fixtures separated by ---
        let fixtures = Fixture::from_yaml_multi(&yaml)
            .unwrap_or_else(|e| panic!("failed to parse {}: {e}", path.display()));

        for fixture in fixtures {
            println!("  Running: {}", fixture.name);
            fixture.run_and_assert();
            ran += 1;
        }
    }

    assert!(ran > 0, "no fixtures found in {}", dir.display());
}

#[test]
fn clauses() {
    run_fixtures_in_dir(&fixtures_dir().join("01_clauses"));
}

#[test]
fn structural() {
    run_fixtures_in_dir(&fixtures_dir().join("02_structural"));
}

#[test]
fn guards() {
    run_fixtures_in_dir(&fixtures_dir().join("03_guards"));
}

#[test]
fn semantics() {
    run_fixtures_in_dir(&fixtures_dir().join("04_semantics"));
}
