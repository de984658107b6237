//! Config types for declarative session construction.
//!
//! These types mirror the runtime engine types but are serde-deserializable,
//! so clause chains can be described in JSON/YAML and replayed against
//! subjects (the conformance fixtures are built on this).
//!
//! # Relationship to runtime types
//!
//! | Config type | Runtime type |
//! |-------------|--------------|
//! | [`SessionConfig`] | a [`MatchSession`](crate::MatchSession) call sequence |
//! | [`ClauseConfig`] | one clause-registration call |
//! | [`PatternConfig`] | [`Pattern`] |
//! | [`GuardConfig`] | [`ConfigGuard`] (a built [`Guard`]) |
//!
//! Handlers cannot be described in config; whoever replays a
//! [`SessionConfig`] supplies them (fixtures attach an action label per
//! clause and record firings).
//!
//! Errors are caught at config load time via [`SessionConfig::validate`],
//! not at evaluation time.

use crate::{
    ArrayPattern, ClauseKind, Guard, MatchError, Pattern, TextGuard, TypeTag, Value,
};
use serde::Deserialize;
use std::collections::BTreeMap;

// ═══════════════════════════════════════════════════════════════════════════════
// Value conversion
// ═══════════════════════════════════════════════════════════════════════════════

// Literal payloads in config are arbitrary JSON; this is the bridge into the
// closed value union. All JSON numbers collapse into Number(f64).
impl From<&serde_json::Value> for Value {
    fn from(v: &serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(*b),
            serde_json::Value::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Self::String(s.clone()),
            serde_json::Value::Array(items) => Self::sequence(items.iter().map(Value::from)),
            serde_json::Value::Object(fields) => {
                Self::mapping(fields.iter().map(|(k, v)| (k.clone(), Value::from(v))))
            }
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Self::from(&v)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Session / clause configs
// ═══════════════════════════════════════════════════════════════════════════════

/// Configuration for a whole session's clause chain.
///
/// ```yaml
/// exhaustive: true
/// clauses:
///   - kind: literal
///     value: 5
///   - kind: range
///     low: 1
///     high: 10
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Whether the terminal call enforces exhaustiveness (default: true).
    #[serde(default = "default_exhaustive")]
    pub exhaustive: bool,

    /// Clause registrations, in order.
    pub clauses: Vec<ClauseConfig>,
}

fn default_exhaustive() -> bool {
    true
}

impl SessionConfig {
    /// Validate every clause against the engine's load-time checks.
    ///
    /// # Errors
    ///
    /// Returns the first pattern-limit or regex-compilation error found.
    pub fn validate(&self) -> Result<(), MatchError> {
        self.clauses.iter().try_for_each(ClauseConfig::validate)
    }
}

/// Configuration for one clause-registration call.
///
/// Uses `#[serde(tag = "kind")]` for discriminated union deserialization:
///
/// ```json
/// { "kind": "literal", "value": 5 }
/// { "kind": "shape", "shape": { "type": { "literal": "user" } } }
/// { "kind": "array", "length": 3 }
/// { "kind": "all", "guards": [ { "prefix": "/api/" } ] }
/// { "kind": "instance", "tag": "number" }
/// { "kind": "range", "low": 1, "high": 10 }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClauseConfig {
    /// `match_literal` with a JSON literal payload.
    Literal {
        /// The literal value to compare against.
        value: serde_json::Value,
    },

    /// `match_shape` with a field-subset template.
    Shape {
        /// Field name to sub-pattern.
        shape: BTreeMap<String, PatternConfig>,
    },

    /// `match_array` with length and/or element-prefix constraints.
    Array {
        /// Exact-length constraint.
        #[serde(default)]
        length: Option<usize>,
        /// Element-prefix constraint.
        #[serde(default)]
        elements: Option<Vec<PatternConfig>>,
    },

    /// `match_all` over the listed guards.
    All {
        /// Guards, all of which must pass.
        guards: Vec<GuardConfig>,
    },

    /// `match_any` over the listed guards.
    Any {
        /// Guards, at least one of which must pass.
        guards: Vec<GuardConfig>,
    },

    /// `match_instance` against a type tag.
    Instance {
        /// The nominal tag to test.
        tag: TypeTag,
    },

    /// `match_range` with inclusive numeric bounds.
    Range {
        /// Lower bound, inclusive.
        low: f64,
        /// Upper bound, inclusive.
        high: f64,
    },
}

impl ClauseConfig {
    /// The clause kind this config describes.
    #[must_use]
    pub fn kind(&self) -> ClauseKind {
        match self {
            Self::Literal { .. } => ClauseKind::Literal,
            Self::Shape { .. } => ClauseKind::Shape,
            Self::Array { .. } => ClauseKind::Array,
            Self::All { .. } => ClauseKind::All,
            Self::Any { .. } => ClauseKind::Any,
            Self::Instance { .. } => ClauseKind::Instance,
            Self::Range { .. } => ClauseKind::Range,
        }
    }

    /// Validate this clause's patterns and guards.
    ///
    /// # Errors
    ///
    /// Returns pattern-limit errors for shape/array clauses and
    /// [`MatchError::InvalidPattern`] for guard regexes that fail to compile.
    pub fn validate(&self) -> Result<(), MatchError> {
        match self {
            Self::Literal { .. } | Self::Instance { .. } | Self::Range { .. } => Ok(()),
            Self::Shape { shape } => build_shape(shape).validate(),
            Self::Array { length, elements } => {
                Pattern::Array(build_array(*length, elements.as_deref())).validate()
            }
            Self::All { guards } | Self::Any { guards } => guards
                .iter()
                .try_for_each(|guard| guard.build().map(drop)),
        }
    }
}

/// Build a shape clause's runtime pattern.
#[must_use]
pub fn build_shape(shape: &BTreeMap<String, PatternConfig>) -> Pattern {
    Pattern::Shape(
        shape
            .iter()
            .map(|(key, sub)| (key.clone(), sub.build()))
            .collect(),
    )
}

/// Build an array clause's runtime pattern.
#[must_use]
pub fn build_array(length: Option<usize>, elements: Option<&[PatternConfig]>) -> ArrayPattern {
    ArrayPattern {
        length,
        elements: elements.map(|elements| elements.iter().map(PatternConfig::build).collect()),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Pattern configs
// ═══════════════════════════════════════════════════════════════════════════════

/// Configuration for a [`Pattern`].
///
/// Uses untagged deserialization over keyed wrappers — order matters, the
/// composite wrappers carry distinct keys and the literal wrapper comes last:
///
/// ```json
/// { "shape": { "type": { "literal": "user" } } }
/// { "array": { "length": 2 } }
/// { "literal": 5 }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PatternConfig {
    /// A nested shape template.
    Shape(ShapePatternConfig),
    /// A nested array template.
    Array(ArrayPatternConfig),
    /// A literal anchor.
    Literal(LiteralPatternConfig),
}

/// Keyed wrapper for a nested shape template.
#[derive(Debug, Clone, Deserialize)]
pub struct ShapePatternConfig {
    /// Field name to sub-pattern.
    pub shape: BTreeMap<String, PatternConfig>,
}

/// Keyed wrapper for a nested array template.
#[derive(Debug, Clone, Deserialize)]
pub struct ArrayPatternConfig {
    /// The array constraints.
    pub array: ArrayConstraintsConfig,
}

/// Length/prefix constraints of an array pattern.
#[derive(Debug, Clone, Deserialize)]
pub struct ArrayConstraintsConfig {
    /// Exact-length constraint.
    #[serde(default)]
    pub length: Option<usize>,
    /// Element-prefix constraint.
    #[serde(default)]
    pub elements: Option<Vec<PatternConfig>>,
}

/// Keyed wrapper for a literal anchor.
#[derive(Debug, Clone, Deserialize)]
pub struct LiteralPatternConfig {
    /// The literal value.
    pub literal: serde_json::Value,
}

impl PatternConfig {
    /// Build the runtime pattern this config describes.
    #[must_use]
    pub fn build(&self) -> Pattern {
        match self {
            Self::Shape(s) => build_shape(&s.shape),
            Self::Array(a) => {
                Pattern::Array(build_array(a.array.length, a.array.elements.as_deref()))
            }
            Self::Literal(l) => Pattern::Literal(Value::from(&l.literal)),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Guard configs
// ═══════════════════════════════════════════════════════════════════════════════

/// Configuration for one guard in an `all`/`any` clause.
///
/// Untagged over keyed wrappers, text strategies first:
///
/// ```json
/// { "exact": "GET" }
/// { "prefix": "/api/", "ignore_case": true }
/// { "regex": "^user-\\d+$" }
/// { "tag": "number" }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum GuardConfig {
    /// Exact string equality.
    Exact {
        /// The expected string.
        exact: String,
        /// Case-insensitive comparison (default: false).
        #[serde(default)]
        ignore_case: bool,
    },
    /// String prefix match.
    Prefix {
        /// The expected prefix.
        prefix: String,
        /// Case-insensitive comparison (default: false).
        #[serde(default)]
        ignore_case: bool,
    },
    /// String suffix match.
    Suffix {
        /// The expected suffix.
        suffix: String,
        /// Case-insensitive comparison (default: false).
        #[serde(default)]
        ignore_case: bool,
    },
    /// Substring contains match.
    Contains {
        /// The expected substring.
        contains: String,
        /// Case-insensitive comparison (default: false).
        #[serde(default)]
        ignore_case: bool,
    },
    /// Regular expression match.
    Regex {
        /// The regex pattern (Rust `regex` crate syntax).
        regex: String,
        /// Case-insensitive matching via `(?i)` (default: false).
        #[serde(default)]
        ignore_case: bool,
    },
    /// Nominal type-tag membership.
    Tag {
        /// The tag to test.
        tag: TypeTag,
    },
}

/// A guard built from config: either a text strategy or a tag test.
#[derive(Debug, Clone)]
pub enum ConfigGuard {
    /// Text matching over string subjects.
    Text(TextGuard),
    /// Nominal tag membership.
    Tag(TypeTag),
}

impl Guard for ConfigGuard {
    fn test(&self, value: &Value) -> bool {
        match self {
            Self::Text(text) => text.test(value),
            Self::Tag(tag) => tag.test(value),
        }
    }
}

impl GuardConfig {
    /// Build the runtime guard this config describes.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::InvalidPattern`] if the regex is invalid.
    pub fn build(&self) -> Result<ConfigGuard, MatchError> {
        Ok(match self {
            Self::Exact { exact, ignore_case } => {
                ConfigGuard::Text(TextGuard::exact(exact.as_str(), *ignore_case))
            }
            Self::Prefix {
                prefix,
                ignore_case,
            } => ConfigGuard::Text(TextGuard::prefix(prefix.as_str(), *ignore_case)),
            Self::Suffix {
                suffix,
                ignore_case,
            } => ConfigGuard::Text(TextGuard::suffix(suffix.as_str(), *ignore_case)),
            Self::Contains {
                contains,
                ignore_case,
            } => ConfigGuard::Text(TextGuard::contains(contains.as_str(), *ignore_case)),
            Self::Regex { regex, ignore_case } => {
                let guard = if *ignore_case {
                    TextGuard::regex_ignore_case(regex)
                } else {
                    TextGuard::regex(regex)
                }
                .map_err(|e| MatchError::InvalidPattern {
                    pattern: regex.clone(),
                    source: e.to_string(),
                })?;
                ConfigGuard::Text(guard)
            }
            Self::Tag { tag } => ConfigGuard::Tag(*tag),
        })
    }
}
