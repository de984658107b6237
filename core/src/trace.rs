//! Evaluation trace types for debugging session behavior.
//!
//! A [`MatchSession`](crate::MatchSession) records one [`ClauseStep`] per
//! clause call as it goes; [`resolve_with_trace`](crate::MatchSession::resolve_with_trace)
//! returns the trail together with the resolution result. Recording is
//! unconditional — steps carry no allocated payloads, only the clause kind
//! and what happened to it.

use crate::MatchError;

/// The seven clause kinds, as recorded in traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClauseKind {
    /// `match_literal` — identity equality.
    Literal,
    /// `match_shape` — structural shape template.
    Shape,
    /// `match_array` — structural array template.
    Array,
    /// `match_all` — guard conjunction.
    All,
    /// `match_any` — guard disjunction.
    Any,
    /// `match_instance` — nominal tag membership.
    Instance,
    /// `match_range` — inclusive numeric bounds.
    Range,
}

impl ClauseKind {
    /// Returns the clause kind's `snake_case` name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Literal => "literal",
            Self::Shape => "shape",
            Self::Array => "array",
            Self::All => "all",
            Self::Any => "any",
            Self::Instance => "instance",
            Self::Range => "range",
        }
    }
}

/// One clause call's evaluation in a trace.
#[derive(Debug, Clone, Copy)]
pub struct ClauseStep {
    /// Position in the registration order (0-based).
    pub index: usize,
    /// Which clause operation was called.
    pub kind: ClauseKind,
    /// Whether the predicate was evaluated at all. `false` records a clause
    /// skipped by the resolved-flag short-circuit.
    pub evaluated: bool,
    /// Whether the clause's handler ran.
    pub fired: bool,
}

/// Trace of a full session resolution.
///
/// Invariant: `result` always equals what
/// [`resolve`](crate::MatchSession::resolve) would have returned for the
/// same call sequence.
#[derive(Debug, Clone)]
pub struct SessionTrace {
    /// The resolution result (identical to what `resolve` returns).
    pub result: Result<(), MatchError>,
    /// One step per clause call, in registration order.
    pub steps: Vec<ClauseStep>,
    /// Whether the fallback handler ran.
    pub used_fallback: bool,
}

impl SessionTrace {
    /// Index of the first clause whose handler ran, if any.
    #[must_use]
    pub fn fired_index(&self) -> Option<usize> {
        self.steps.iter().find(|step| step.fired).map(|step| step.index)
    }

    /// Number of handlers that ran across the clause chain.
    ///
    /// At most one, except when range clauses fire past an earlier match.
    #[must_use]
    pub fn fired_count(&self) -> usize {
        self.steps.iter().filter(|step| step.fired).count()
    }
}
