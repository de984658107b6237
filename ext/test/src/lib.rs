//! triage-test: Conformance fixtures for the triage engine
//!
//! Loads YAML fixtures describing a clause chain plus expectation cases and
//! replays them against the engine. Each clause in a fixture carries an
//! action label; its handler records the label, so a case's expectation is
//! simply the ordered list of labels that fired (fallback included).
//!
//! # Example
//!
//! ```
//! use triage_test::Fixture;
//!
//! let yaml = r#"
//! name: smoke
//! description: literal dispatch
//! fallback: fallback
//! clauses:
//!   - action: five
//!     kind: literal
//!     value: 5
//! cases:
//!   - name: hit
//!     subject: 5
//!     fired: [five]
//! "#;
//!
//! let fixture = Fixture::from_yaml(yaml).unwrap();
//! fixture.run_and_assert();
//! ```

pub mod fixture;

pub use fixture::{Fixture, FixtureClause, TestCase};
