//! `Pattern` — Partial structural templates over the value domain
//!
//! A pattern constrains a subset of a value's structure: shapes constrain a
//! subset of a mapping's fields, array patterns constrain a sequence's length
//! and/or a prefix of its elements, literals anchor the recursion at identity
//! equality. Evaluation lives in [`structural`](crate::structural); this
//! module owns construction and config-time validation.

use crate::{
    MatchError, Value, MAX_ARRAY_ELEMENTS, MAX_PATTERN_DEPTH, MAX_SHAPE_FIELDS,
};
use std::collections::BTreeMap;

/// A structural template, possibly nested.
///
/// Patterns are subset constraints: a shape says nothing about fields it does
/// not name, an array pattern says nothing about elements past its prefix.
/// Full structural equality is expressed by spelling out every field and an
/// exact length.
///
/// # Example
///
/// ```
/// use triage::{ArrayPattern, Pattern};
///
/// // { type: "point", coords: [_, _] } with coords exactly 2 long
/// let pattern = Pattern::shape([
///     ("type", Pattern::from("point")),
///     ("coords", Pattern::array(ArrayPattern::with_length(2))),
/// ]);
/// assert_eq!(pattern.depth(), 2);
/// ```
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Anchor: matches a non-composite value by identity equality.
    Literal(Value),

    /// Field-subset template over a mapping. Empty shape matches any
    /// composite value.
    Shape(BTreeMap<String, Pattern>),

    /// Length and/or element-prefix template over a sequence.
    Array(ArrayPattern),
}

impl Pattern {
    /// Anchor the recursion at a literal value.
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    /// Build a shape template from `(field, sub-pattern)` pairs.
    pub fn shape<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Pattern)>,
    {
        Self::Shape(fields.into_iter().map(|(k, p)| (k.into(), p)).collect())
    }

    /// Build an array template.
    #[must_use]
    pub fn array(pattern: ArrayPattern) -> Self {
        Self::Array(pattern)
    }

    /// Calculate the nesting depth of this pattern.
    ///
    /// Used for limit validation at construction time.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Literal(_) => 1,
            Self::Shape(fields) => {
                1 + fields.values().map(Pattern::depth).max().unwrap_or(0)
            }
            Self::Array(array) => {
                1 + array
                    .elements
                    .as_deref()
                    .and_then(|elements| elements.iter().map(Pattern::depth).max())
                    .unwrap_or(0)
            }
        }
    }

    /// Validate this pattern against the engine's safety limits.
    ///
    /// Checks:
    /// - Nesting depth does not exceed [`MAX_PATTERN_DEPTH`]
    /// - Shape width does not exceed [`MAX_SHAPE_FIELDS`]
    /// - Array element count does not exceed [`MAX_ARRAY_ELEMENTS`]
    ///
    /// Call this where patterns are constructed or loaded; evaluation does
    /// not re-check.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::DepthExceeded`], [`MatchError::TooManyFields`],
    /// or [`MatchError::TooManyElements`].
    pub fn validate(&self) -> Result<(), MatchError> {
        let depth = self.depth();
        if depth > MAX_PATTERN_DEPTH {
            return Err(MatchError::DepthExceeded {
                depth,
                max: MAX_PATTERN_DEPTH,
            });
        }
        self.validate_width()
    }

    fn validate_width(&self) -> Result<(), MatchError> {
        match self {
            Self::Literal(_) => Ok(()),
            Self::Shape(fields) => {
                if fields.len() > MAX_SHAPE_FIELDS {
                    return Err(MatchError::TooManyFields {
                        count: fields.len(),
                        max: MAX_SHAPE_FIELDS,
                    });
                }
                fields.values().try_for_each(Pattern::validate_width)
            }
            Self::Array(array) => {
                let Some(elements) = array.elements.as_deref() else {
                    return Ok(());
                };
                if elements.len() > MAX_ARRAY_ELEMENTS {
                    return Err(MatchError::TooManyElements {
                        count: elements.len(),
                        max: MAX_ARRAY_ELEMENTS,
                    });
                }
                elements.iter().try_for_each(Pattern::validate_width)
            }
        }
    }
}

impl From<Value> for Pattern {
    fn from(value: Value) -> Self {
        Self::Literal(value)
    }
}

impl From<bool> for Pattern {
    fn from(b: bool) -> Self {
        Self::Literal(Value::from(b))
    }
}

impl From<f64> for Pattern {
    fn from(n: f64) -> Self {
        Self::Literal(Value::from(n))
    }
}

impl From<i64> for Pattern {
    fn from(n: i64) -> Self {
        Self::Literal(Value::from(n))
    }
}

impl From<i32> for Pattern {
    fn from(n: i32) -> Self {
        Self::Literal(Value::from(n))
    }
}

impl From<&str> for Pattern {
    fn from(s: &str) -> Self {
        Self::Literal(Value::from(s))
    }
}

impl From<String> for Pattern {
    fn from(s: String) -> Self {
        Self::Literal(Value::from(s))
    }
}

impl From<ArrayPattern> for Pattern {
    fn from(array: ArrayPattern) -> Self {
        Self::Array(array)
    }
}

/// Template over an ordered sequence.
///
/// Both constraints are independent and optional:
///
/// - `length` — the sequence must have exactly this many items
/// - `elements` — each listed sub-pattern must match the item at its index;
///   items past the list are unconstrained (prefix semantics)
///
/// With neither set, any sequence matches (the degenerate "any array"
/// pattern).
///
/// # Example
///
/// ```
/// use triage::{ArrayPattern, Pattern};
///
/// // exactly 3 items, first two being 1 and 2
/// let pattern = ArrayPattern::with_length(3)
///     .elements([Pattern::from(1), Pattern::from(2)]);
/// assert_eq!(pattern.length, Some(3));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ArrayPattern {
    /// Exact-length constraint.
    pub length: Option<usize>,

    /// Element-prefix constraint.
    pub elements: Option<Vec<Pattern>>,
}

impl ArrayPattern {
    /// The unconstrained pattern: matches any sequence.
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// Start from an exact-length constraint.
    #[must_use]
    pub fn with_length(length: usize) -> Self {
        Self {
            length: Some(length),
            elements: None,
        }
    }

    /// Start from an element-prefix constraint.
    pub fn with_elements<I>(elements: I) -> Self
    where
        I: IntoIterator<Item = Pattern>,
    {
        Self {
            length: None,
            elements: Some(elements.into_iter().collect()),
        }
    }

    /// Add or replace the exact-length constraint.
    #[must_use]
    pub fn length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }

    /// Add or replace the element-prefix constraint.
    pub fn elements<I>(mut self, elements: I) -> Self
    where
        I: IntoIterator<Item = Pattern>,
    {
        self.elements = Some(elements.into_iter().collect());
        self
    }
}
