//! triage - First-match-wins clause dispatch over dynamic values
//!
//! A runtime pattern-matching engine: wrap a dynamically typed subject in a
//! [`MatchSession`], chain clause calls against it, and the first matching
//! clause's handler runs exactly once.
//!
//! # Architecture
//!
//! - [`Value`] — Closed dynamic value union (scalars, `Sequence`, `Mapping`,
//!   extensible `Opaque` variant)
//! - [`Pattern`] — Partial structural templates (literal, shape, array)
//! - [`structural`] — The recursive matcher behind shape/array clauses
//! - [`Guard`] — Caller-supplied predicates for conjunction/disjunction
//!   clauses (closures, [`TextGuard`], [`TypeTag`])
//! - [`MatchSession`] — The clause state machine with first-match-wins
//!   dispatch and runtime exhaustiveness enforcement
//!
//! # Key Semantics
//!
//! 1. **Immediate evaluation**: each clause call evaluates at registration.
//!    There is no stored clause list; the chain is the dispatch.
//!
//! 2. **First-match-wins**: after a clause matches, later clauses skip their
//!    predicates entirely — except range clauses, which fire on bounds alone
//!    (see [`MatchSession::match_range`]).
//!
//! 3. **Runtime exhaustiveness**: the terminal [`MatchSession::resolve`] runs
//!    the fallback when nothing matched, then errors unless exhaustiveness
//!    was disabled. The fallback never counts as a match.
//!
//! # Example
//!
//! ```
//! use triage::prelude::*;
//!
//! # fn main() -> Result<(), MatchError> {
//! let mut route = None;
//! begin_match("/api/users")
//!     .match_literal("/health", |_| route = Some("health"))
//!     .match_all([TextGuard::prefix("/api/", false)], |_| route = Some("api"))
//!     .resolve(|_| route = Some("not_found"))?;
//!
//! assert_eq!(route, Some("api"));
//! # Ok(())
//! # }
//! ```
//!
//! # Config
//!
//! With the `config` feature, clause chains deserialize from JSON/YAML via
//! [`SessionConfig`] and friends; the conformance fixtures are built on this.

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod guard;
mod pattern;
mod session;
mod trace;
mod value;

pub mod structural;

#[cfg(feature = "config")]
mod config;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

// Core types
pub use guard::{Guard, TextGuard};
pub use pattern::{ArrayPattern, Pattern};
pub use session::{begin_match, MatchSession};
pub use value::{OpaqueValue, TypeTag, Value};

// Trace types
pub use trace::{ClauseKind, ClauseStep, SessionTrace};

// Config types (feature-gated)
#[cfg(feature = "config")]
pub use config::{
    build_array, build_shape, ArrayConstraintsConfig, ArrayPatternConfig, ClauseConfig,
    ConfigGuard, GuardConfig, LiteralPatternConfig, PatternConfig, SessionConfig,
    ShapePatternConfig,
};

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use triage::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        begin_match,
        // Core types
        ArrayPattern,
        // Trace types
        ClauseKind,
        ClauseStep,
        // Traits
        Guard,
        // Errors
        MatchError,
        MatchSession,
        OpaqueValue,
        Pattern,
        SessionTrace,
        TextGuard,
        TypeTag,
        Value,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════════

/// Maximum allowed nesting depth for patterns.
///
/// This limit protects the recursive structural matcher against stack
/// overflow from deeply nested shapes. Validate at construction time via
/// [`Pattern::validate`].
pub const MAX_PATTERN_DEPTH: usize = 32;

/// Maximum number of fields in a single shape pattern.
///
/// Prevents width-based resource exhaustion: a flat shape with millions of
/// fields bypasses [`MAX_PATTERN_DEPTH`] but still costs a full walk per
/// clause evaluation.
pub const MAX_SHAPE_FIELDS: usize = 256;

/// Maximum number of element sub-patterns in a single array pattern.
///
/// Same width bound as [`MAX_SHAPE_FIELDS`], applied to element prefixes.
pub const MAX_ARRAY_ELEMENTS: usize = 256;

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Errors from session resolution and pattern validation.
///
/// [`NonExhaustive`](MatchError::NonExhaustive) is the only evaluation-time
/// error; every other variant is caught at pattern-construction or
/// config-load time. Fix the pattern/config and rebuild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    /// No clause matched and exhaustiveness was still enabled when the
    /// terminal call ran. The fallback handler has already executed; it does
    /// not suppress this error.
    NonExhaustive {
        /// Type name of the unmatched subject.
        subject_type: &'static str,
    },
    /// Pattern nesting exceeds [`MAX_PATTERN_DEPTH`].
    DepthExceeded {
        /// Actual depth of the pattern.
        depth: usize,
        /// Maximum allowed depth.
        max: usize,
    },
    /// A shape pattern has too many fields.
    TooManyFields {
        /// Actual field count.
        count: usize,
        /// Maximum allowed.
        max: usize,
    },
    /// An array pattern has too many element sub-patterns.
    TooManyElements {
        /// Actual element count.
        count: usize,
        /// Maximum allowed.
        max: usize,
    },
    /// A guard regex failed to compile.
    InvalidPattern {
        /// The pattern that failed to compile.
        pattern: String,
        /// The underlying error message.
        source: String,
    },
}

impl std::fmt::Display for MatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonExhaustive { subject_type } => {
                write!(
                    f,
                    "no clause matched the {subject_type} subject — add a covering \
                     clause or call disable_exhaustiveness() before resolving"
                )
            }
            Self::DepthExceeded { depth, max } => {
                write!(
                    f,
                    "pattern nesting depth is {depth}, but maximum allowed is {max}"
                )
            }
            Self::TooManyFields { count, max } => {
                write!(
                    f,
                    "shape pattern has {count} fields, but maximum allowed is {max}"
                )
            }
            Self::TooManyElements { count, max } => {
                write!(
                    f,
                    "array pattern has {count} elements, but maximum allowed is {max}"
                )
            }
            Self::InvalidPattern { pattern, source } => {
                write!(f, "invalid pattern \"{pattern}\": {source}")
            }
        }
    }
}

impl std::error::Error for MatchError {}
