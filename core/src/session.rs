//! `MatchSession` — Ordered clause dispatch with first-match-wins semantics
//!
//! A session wraps one subject value and threads it through a fluent chain of
//! clause calls. Each clause evaluates immediately at registration: there is
//! no stored clause list to dispatch later, the chain *is* the dispatch. The
//! first satisfied clause runs its handler and flips the session's `resolved`
//! flag; every later clause sees the flag and skips its predicate entirely.
//!
//! # Invariant: first-match-wins
//!
//! Clauses are evaluated in registration order and at most one handler runs
//! across the literal/shape/array/all/any/instance clauses. `resolved` is
//! monotonic: once set it is never reset.
//!
//! # Exception: range clauses
//!
//! [`match_range`](MatchSession::match_range) does not consult the resolved
//! flag before firing. A range clause whose bounds are satisfied fires even
//! after an earlier clause already matched, and overlapping range clauses all
//! fire. A firing range clause still sets `resolved`. This is long-standing
//! observable behavior; callers relying on strict at-most-one dispatch should
//! order range clauses first or express the bounds as a guard in
//! [`match_all`](MatchSession::match_all).
//!
//! # Exhaustiveness
//!
//! The terminal [`resolve`](MatchSession::resolve) runs the fallback handler
//! when nothing matched, then errors with [`MatchError::NonExhaustive`]
//! unless [`disable_exhaustiveness`](MatchSession::disable_exhaustiveness)
//! was called. The fallback is for side effects only — it does not count as a
//! match.

use crate::{
    structural, ArrayPattern, ClauseKind, ClauseStep, Guard, MatchError, Pattern,
    SessionTrace, TypeTag, Value,
};
use std::fmt::Debug;

/// Begin a match over the given subject.
///
/// The entry point: constructs a fresh session with `resolved = false` and
/// exhaustiveness enabled.
///
/// # Example
///
/// ```
/// use triage::{begin_match, Pattern, Value};
///
/// # fn main() -> Result<(), triage::MatchError> {
/// let subject = Value::mapping([
///     ("type", Value::from("user")),
///     ("name", Value::from("Ann")),
/// ]);
///
/// let mut role = None;
/// begin_match(subject)
///     .match_shape([("type", Pattern::from("admin"))], |_| role = Some("admin"))
///     .match_shape([("type", Pattern::from("user"))], |_| role = Some("user"))
///     .resolve(|_| role = Some("unknown"))?;
///
/// assert_eq!(role, Some("user"));
/// # Ok(())
/// # }
/// ```
pub fn begin_match(subject: impl Into<Value>) -> MatchSession {
    MatchSession::new(subject)
}

/// A single-subject clause dispatch session.
///
/// Owns the subject for its lifetime and never mutates it. Clause methods
/// consume and return the session, so a resolved-then-reused session is
/// unrepresentable: the terminal [`resolve`](Self::resolve) takes the session
/// by value.
///
/// Handlers are side-effecting `FnOnce(&Value)` callbacks. The engine does
/// not collect handler return values; callers capture results in outer
/// variables from within the handler body.
pub struct MatchSession {
    subject: Value,
    resolved: bool,
    exhaustive: bool,
    steps: Vec<ClauseStep>,
}

impl MatchSession {
    /// Create a fresh session wrapping `subject`.
    ///
    /// Equivalent to [`begin_match`].
    pub fn new(subject: impl Into<Value>) -> Self {
        Self {
            subject: subject.into(),
            resolved: false,
            exhaustive: true,
            steps: Vec::new(),
        }
    }

    /// The subject under match.
    #[must_use]
    pub fn subject(&self) -> &Value {
        &self.subject
    }

    /// Whether some clause has already matched.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// Whether the terminal call will enforce exhaustiveness.
    #[must_use]
    pub fn is_exhaustive(&self) -> bool {
        self.exhaustive
    }

    // One step per clause call, evaluated or skipped; `record` is the single
    // place the resolved flag is set.
    fn record<H>(mut self, kind: ClauseKind, matched: bool, handler: H) -> Self
    where
        H: FnOnce(&Value),
    {
        self.steps.push(ClauseStep {
            index: self.steps.len(),
            kind,
            evaluated: true,
            fired: matched,
        });
        if matched {
            self.resolved = true;
            handler(&self.subject);
        }
        self
    }

    fn skip(mut self, kind: ClauseKind) -> Self {
        self.steps.push(ClauseStep {
            index: self.steps.len(),
            kind,
            evaluated: false,
            fired: false,
        });
        self
    }

    /// Literal clause: fires iff the subject equals `pattern` under identity
    /// equality — primitives by value, composites and opaques by allocation
    /// identity, never structural. NaN never equals itself, so a NaN literal
    /// clause never fires.
    pub fn match_literal<H>(self, pattern: impl Into<Value>, handler: H) -> Self
    where
        H: FnOnce(&Value),
    {
        if self.resolved {
            return self.skip(ClauseKind::Literal);
        }
        let matched = self.subject == pattern.into();
        self.record(ClauseKind::Literal, matched, handler)
    }

    /// Shape clause: fires iff the subject deep-matches the field-subset
    /// template (see [`structural::deep_match`]). Fields the shape does not
    /// name are ignored. The handler receives the original subject.
    pub fn match_shape<K, I, H>(self, shape: I, handler: H) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Pattern)>,
        H: FnOnce(&Value),
    {
        if self.resolved {
            return self.skip(ClauseKind::Shape);
        }
        let pattern = Pattern::shape(shape);
        let matched = structural::deep_match(&self.subject, &pattern);
        self.record(ClauseKind::Shape, matched, handler)
    }

    /// Array clause: fires iff the subject is a sequence and satisfies the
    /// length/prefix constraints (see [`structural::array_match`]).
    pub fn match_array<H>(self, pattern: ArrayPattern, handler: H) -> Self
    where
        H: FnOnce(&Value),
    {
        if self.resolved {
            return self.skip(ClauseKind::Array);
        }
        let matched = self
            .subject
            .as_sequence()
            .is_some_and(|items| structural::array_match(items, &pattern));
        self.record(ClauseKind::Array, matched, handler)
    }

    /// Conjunction clause: fires iff every guard passes, in order, with
    /// short-circuit on the first failure. An empty guard sequence passes
    /// vacuously.
    ///
    /// A panicking guard propagates to the caller and aborts the rest of the
    /// chain; the engine catches nothing.
    pub fn match_all<I, H>(self, guards: I, handler: H) -> Self
    where
        I: IntoIterator,
        I::Item: Guard,
        H: FnOnce(&Value),
    {
        if self.resolved {
            return self.skip(ClauseKind::All);
        }
        let matched = guards.into_iter().all(|guard| guard.test(&self.subject));
        self.record(ClauseKind::All, matched, handler)
    }

    /// Disjunction clause: fires iff at least one guard passes, in order,
    /// with short-circuit on the first success. An empty guard sequence
    /// never passes.
    pub fn match_any<I, H>(self, guards: I, handler: H) -> Self
    where
        I: IntoIterator,
        I::Item: Guard,
        H: FnOnce(&Value),
    {
        if self.resolved {
            return self.skip(ClauseKind::Any);
        }
        let matched = guards.into_iter().any(|guard| guard.test(&self.subject));
        self.record(ClauseKind::Any, matched, handler)
    }

    /// Type clause: fires iff the subject's nominal tag equals `tag`.
    /// Membership is nominal, not structural — an empty mapping and a
    /// populated one are both [`TypeTag::Mapping`].
    pub fn match_instance<H>(self, tag: TypeTag, handler: H) -> Self
    where
        H: FnOnce(&Value),
    {
        if self.resolved {
            return self.skip(ClauseKind::Instance);
        }
        let matched = self.subject.tag() == tag;
        self.record(ClauseKind::Instance, matched, handler)
    }

    /// Range clause: fires iff the subject is a number `n` with
    /// `low <= n <= high`, inclusive both ends.
    ///
    /// Unlike every other clause, this does NOT consult the resolved flag
    /// first (see the module docs): its bounds alone decide firing, so it can
    /// fire after an earlier match, and overlapping range clauses all fire.
    /// Firing still sets the resolved flag.
    pub fn match_range<H>(self, low: f64, high: f64, handler: H) -> Self
    where
        H: FnOnce(&Value),
    {
        let matched = self
            .subject
            .as_number()
            .is_some_and(|n| low <= n && n <= high);
        self.record(ClauseKind::Range, matched, handler)
    }

    /// Disable the exhaustiveness check for this session.
    ///
    /// Must be called before [`resolve`](Self::resolve); it has no effect on
    /// clauses already evaluated.
    #[must_use]
    pub fn disable_exhaustiveness(mut self) -> Self {
        self.exhaustive = false;
        self
    }

    /// Terminal call: run the fallback if nothing matched, then enforce
    /// exhaustiveness.
    ///
    /// The fallback handler does not mark the session resolved — it exists
    /// for side effects, not to suppress the error. With exhaustiveness
    /// enabled, an unmatched session therefore runs the fallback AND returns
    /// the error.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::NonExhaustive`] if no clause matched and
    /// exhaustiveness is still enabled.
    pub fn resolve<H>(self, fallback: H) -> Result<(), MatchError>
    where
        H: FnOnce(&Value),
    {
        self.finish(fallback).result
    }

    /// Terminal call with full introspection.
    ///
    /// Same semantics as [`resolve`](Self::resolve); the returned trace's
    /// `result` field is identical to what `resolve` would have returned.
    pub fn resolve_with_trace<H>(self, fallback: H) -> SessionTrace
    where
        H: FnOnce(&Value),
    {
        self.finish(fallback)
    }

    fn finish<H>(self, fallback: H) -> SessionTrace
    where
        H: FnOnce(&Value),
    {
        let used_fallback = !self.resolved;
        if used_fallback {
            fallback(&self.subject);
        }

        let result = if self.exhaustive && !self.resolved {
            Err(MatchError::NonExhaustive {
                subject_type: self.subject.type_name(),
            })
        } else {
            Ok(())
        };

        SessionTrace {
            result,
            steps: self.steps,
            used_fallback,
        }
    }
}

impl Debug for MatchSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchSession")
            .field("subject", &self.subject)
            .field("resolved", &self.resolved)
            .field("exhaustive", &self.exhaustive)
            .field("clauses_seen", &self.steps.len())
            .finish()
    }
}
