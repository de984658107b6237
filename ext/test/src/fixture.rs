//! Conformance test fixture runner
//!
//! Loads YAML fixtures and replays them against the triage engine.

use serde::Deserialize;
use triage::{
    begin_match, ClauseConfig, ConfigGuard, MatchError, MatchSession, SessionConfig, Value,
};

fn default_exhaustive() -> bool {
    true
}

/// A complete conformance fixture: one clause chain, many subject cases.
#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub name: String,
    pub description: String,
    /// Whether the session enforces exhaustiveness (default: true).
    #[serde(default = "default_exhaustive")]
    pub exhaustive: bool,
    /// Clause registrations, in order, each with an action label.
    pub clauses: Vec<FixtureClause>,
    /// Action label recorded when the fallback handler runs.
    pub fallback: String,
    pub cases: Vec<TestCase>,
}

/// One clause registration: an action label plus the clause config.
#[derive(Debug, Deserialize)]
pub struct FixtureClause {
    pub action: String,
    #[serde(flatten)]
    pub clause: ClauseConfig,
}

/// One subject plus the expected handler firings.
#[derive(Debug, Deserialize)]
pub struct TestCase {
    pub name: String,
    /// The subject value, converted into the engine's value union.
    pub subject: serde_json::Value,
    /// Expected action labels, in firing order (fallback label included when
    /// the fallback runs).
    pub fired: Vec<String>,
    /// Whether resolution is expected to fail with `NonExhaustive`.
    #[serde(default)]
    pub non_exhaustive: bool,
}

impl Fixture {
    /// Parse a single YAML document.
    ///
    /// # Errors
    ///
    /// Returns the underlying YAML error.
    pub fn from_yaml(yaml: &str) -> Result<Fixture, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Parse potentially multiple YAML documents (separated by `---`).
    ///
    /// # Errors
    ///
    /// Returns the first YAML error across the documents.
    pub fn from_yaml_multi(yaml: &str) -> Result<Vec<Fixture>, serde_yaml::Error> {
        serde_yaml::Deserializer::from_str(yaml)
            .map(Fixture::deserialize)
            .collect()
    }

    /// The clause chain as a plain engine config (for validation).
    #[must_use]
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            exhaustive: self.exhaustive,
            clauses: self.clauses.iter().map(|fc| fc.clause.clone()).collect(),
        }
    }

    /// Run every case and panic with context on the first mismatch.
    pub fn run_and_assert(&self) {
        self.session_config()
            .validate()
            .unwrap_or_else(|e| panic!("fixture '{}': invalid config: {e}", self.name));

        for case in &self.cases {
            self.run_case(case);
        }
    }

    fn run_case(&self, case: &TestCase) {
        let mut fired: Vec<String> = Vec::new();

        let mut session = begin_match(Value::from(&case.subject));
        if !self.exhaustive {
            session = session.disable_exhaustiveness();
        }
        for fc in &self.clauses {
            session = apply_clause(session, &fc.clause, &fc.action, &mut fired);
        }
        let result = session.resolve(|_| fired.push(self.fallback.clone()));

        assert_eq!(
            fired, case.fired,
            "fixture '{}' case '{}': fired actions",
            self.name, case.name
        );
        assert_eq!(
            result.is_err(),
            case.non_exhaustive,
            "fixture '{}' case '{}': resolution result was {result:?}",
            self.name,
            case.name
        );
        if case.non_exhaustive {
            assert!(
                matches!(result, Err(MatchError::NonExhaustive { .. })),
                "fixture '{}' case '{}': expected NonExhaustive, got {result:?}",
                self.name,
                case.name
            );
        }
    }
}

/// Register one configured clause on the session, with a handler that
/// records the action label.
fn apply_clause(
    session: MatchSession,
    clause: &ClauseConfig,
    action: &str,
    fired: &mut Vec<String>,
) -> MatchSession {
    match clause {
        ClauseConfig::Literal { value } => {
            session.match_literal(Value::from(value), |_| fired.push(action.to_string()))
        }
        ClauseConfig::Shape { shape } => session.match_shape(
            shape.iter().map(|(key, sub)| (key.clone(), sub.build())),
            |_| fired.push(action.to_string()),
        ),
        ClauseConfig::Array { length, elements } => session.match_array(
            triage::build_array(*length, elements.as_deref()),
            |_| fired.push(action.to_string()),
        ),
        ClauseConfig::All { guards } => {
            let guards: Vec<ConfigGuard> = guards
                .iter()
                .map(|g| g.build().expect("guard config validated"))
                .collect();
            session.match_all(guards, |_| fired.push(action.to_string()))
        }
        ClauseConfig::Any { guards } => {
            let guards: Vec<ConfigGuard> = guards
                .iter()
                .map(|g| g.build().expect("guard config validated"))
                .collect();
            session.match_any(guards, |_| fired.push(action.to_string()))
        }
        ClauseConfig::Instance { tag } => {
            session.match_instance(*tag, |_| fired.push(action.to_string()))
        }
        ClauseConfig::Range { low, high } => {
            session.match_range(*low, *high, |_| fired.push(action.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_fixture_runs() {
        let yaml = r"
name: inline
description: shape dispatch with a fallback case
fallback: unknown
clauses:
  - action: user
    kind: shape
    shape:
      type: { literal: user }
cases:
  - name: hit
    subject: { type: user, name: Ann }
    fired: [user]
  - name: miss
    subject: { type: guest }
    fired: [unknown]
    non_exhaustive: true
";
        let fixture = Fixture::from_yaml(yaml).unwrap();
        fixture.run_and_assert();
    }

    #[test]
    fn multi_document_parsing() {
        let yaml = r"
name: first
description: one
fallback: fb
clauses:
  - action: a
    kind: literal
    value: 1
cases: []
---
name: second
description: two
exhaustive: false
fallback: fb
clauses:
  - action: b
    kind: range
    low: 0
    high: 1
cases: []
";
        let fixtures = Fixture::from_yaml_multi(yaml).unwrap();
        assert_eq!(fixtures.len(), 2);
        assert_eq!(fixtures[0].name, "first");
        assert!(!fixtures[1].exhaustive);
    }

    #[test]
    #[should_panic(expected = "fired actions")]
    fn mismatched_expectation_panics() {
        let yaml = r"
name: bad
description: expectation does not match engine behavior
exhaustive: false
fallback: fb
clauses:
  - action: a
    kind: literal
    value: 1
cases:
  - name: wrong
    subject: 1
    fired: [fb]
";
        Fixture::from_yaml(yaml).unwrap().run_and_assert();
    }
}
