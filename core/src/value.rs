//! `Value` — The closed dynamic value domain the engine matches over
//!
//! Subjects and literal patterns share one tagged union instead of runtime
//! reflection: scalars, ordered sequences, string-keyed mappings, and an
//! `Opaque` variant for host-defined handles. Keeping the union closed makes
//! the recursive structural matcher total — every variant has a defined
//! matching rule.
//!
//! # Equality is identity, not structure
//!
//! `PartialEq` on `Value` implements the literal-clause semantics: primitives
//! compare by value (`Number` uses `f64` equality, so NaN never equals
//! itself), while `Sequence`, `Mapping`, and `Opaque` compare by allocation
//! identity (`Arc::ptr_eq`). Structural comparison lives in
//! [`structural`](crate::structural), not here.
//!
//! # Extensibility via `Opaque`
//!
//! For domain-specific types not covered by the primitives, implement
//! [`OpaqueValue`] and wrap in `Value::Opaque(Arc::new(your_type))`.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;

/// Extension trait for host-defined value payloads.
///
/// This keeps the value union closed while letting callers thread handles the
/// engine has no structural knowledge of (connections, AST nodes, sessions).
/// An opaque value participates in literal clauses (identity equality), type
/// clauses ([`TypeTag::Opaque`]), and guards (via downcasting); the structural
/// matcher treats it as a scalar.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so subjects can cross threads.
///
/// # Example
///
/// ```
/// use std::any::Any;
/// use std::sync::Arc;
/// use triage::{OpaqueValue, Value};
///
/// #[derive(Debug)]
/// struct Session {
///     id: u64,
/// }
///
/// impl OpaqueValue for Session {
///     fn type_name(&self) -> &'static str {
///         "session"
///     }
///
///     fn as_any(&self) -> &dyn Any {
///         self
///     }
/// }
///
/// let value = Value::opaque(Session { id: 7 });
/// assert!(value.is_opaque());
/// assert_eq!(value.type_name(), "session");
/// ```
pub trait OpaqueValue: Send + Sync + Debug {
    /// Returns a human-readable type identifier.
    ///
    /// Convention: `snake_case` names, e.g. `"session"`, `"file_handle"`.
    fn type_name(&self) -> &'static str;

    /// Returns a reference to `self` as `&dyn Any`.
    ///
    /// Enables downcasting inside guards:
    ///
    /// ```ignore
    /// if let Some(session) = opaque.as_any().downcast_ref::<Session>() {
    ///     // use session.id
    /// }
    /// ```
    fn as_any(&self) -> &dyn Any;
}

/// The nominal type domain for type-membership clauses.
///
/// [`Value::tag()`] projects a value onto its tag; the
/// [`match_instance`](crate::MatchSession::match_instance) clause compares
/// tags, never structure. `TypeTag` also implements
/// [`Guard`](crate::Guard), so tag tests compose inside `match_all` /
/// `match_any` chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TypeTag {
    /// The absence value.
    Null,
    /// Boolean scalar.
    Bool,
    /// Numeric scalar (`f64`).
    Number,
    /// String scalar.
    String,
    /// Ordered sequence of values.
    Sequence,
    /// String-keyed mapping of values.
    Mapping,
    /// Host-defined opaque handle.
    Opaque,
}

impl TypeTag {
    /// Returns the tag's `snake_case` name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Number => "number",
            Self::String => "string",
            Self::Sequence => "sequence",
            Self::Mapping => "mapping",
            Self::Opaque => "opaque",
        }
    }
}

/// A dynamically typed value: the subject domain of a match session.
///
/// # Variants
///
/// - `Null` — The absence value
/// - `Bool` / `Number` / `String` — Scalars
/// - `Sequence` — Ordered values, matched by array patterns
/// - `Mapping` — String-keyed fields, matched by shape patterns
/// - `Opaque` — Host-defined handles implementing [`OpaqueValue`]
///
/// # Hybrid layout
///
/// Scalars stay inline; composites and opaques are `Arc`-shared, so cloning a
/// `Value` is cheap and clones stay literal-equal to their source (identity
/// equality follows the allocation, not the structure).
///
/// # Example
///
/// ```
/// use triage::Value;
///
/// let subject = Value::mapping([
///     ("type", Value::from("user")),
///     ("age", Value::from(30)),
/// ]);
/// assert!(subject.is_composite());
/// assert_eq!(subject.type_name(), "mapping");
/// ```
#[derive(Debug, Clone)]
pub enum Value {
    /// The absence value.
    Null,

    /// Boolean scalar.
    Bool(bool),

    /// Numeric scalar. All numbers share one `f64` representation.
    Number(f64),

    /// String scalar. Compares by value, like the other scalars.
    String(String),

    /// Ordered sequence. Compares by allocation identity.
    Sequence(Arc<Vec<Value>>),

    /// String-keyed mapping. Compares by allocation identity.
    Mapping(Arc<BTreeMap<String, Value>>),

    /// Host-defined opaque handle. Compares by allocation identity.
    Opaque(Arc<dyn OpaqueValue>),
}

// Manual PartialEq: this is the literal-clause equality, so composites use
// Arc pointer identity (same allocation = equal) and NaN is never equal to
// itself via the f64 comparison.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Sequence(a), Self::Sequence(b)) => Arc::ptr_eq(a, b),
            (Self::Mapping(a), Self::Mapping(b)) => Arc::ptr_eq(a, b),
            (Self::Opaque(a), Self::Opaque(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Value {
    /// Build a `Sequence` from an iterator of values.
    pub fn sequence<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Self::Sequence(Arc::new(items.into_iter().collect()))
    }

    /// Build a `Mapping` from an iterator of `(key, value)` pairs.
    pub fn mapping<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Self::Mapping(Arc::new(
            fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    /// Wrap a host-defined payload as an `Opaque` value.
    pub fn opaque(payload: impl OpaqueValue + 'static) -> Self {
        Self::Opaque(Arc::new(payload))
    }

    /// Returns this value's nominal type tag.
    #[must_use]
    pub fn tag(&self) -> TypeTag {
        match self {
            Self::Null => TypeTag::Null,
            Self::Bool(_) => TypeTag::Bool,
            Self::Number(_) => TypeTag::Number,
            Self::String(_) => TypeTag::String,
            Self::Sequence(_) => TypeTag::Sequence,
            Self::Mapping(_) => TypeTag::Mapping,
            Self::Opaque(_) => TypeTag::Opaque,
        }
    }

    /// Returns a string describing this value's type.
    ///
    /// For `Opaque` variants this delegates to [`OpaqueValue::type_name`],
    /// so error messages and traces name the host type.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Opaque(o) => o.type_name(),
            other => other.tag().name(),
        }
    }

    /// Returns `true` if this is the `Null` variant.
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` if this is a composite value (`Sequence` or `Mapping`).
    ///
    /// The structural matcher's literal fallback applies exactly when this
    /// returns `false`.
    #[inline]
    #[must_use]
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Sequence(_) | Self::Mapping(_))
    }

    /// Returns `true` if this is the `Opaque` variant.
    #[inline]
    #[must_use]
    pub fn is_opaque(&self) -> bool {
        matches!(self, Self::Opaque(_))
    }

    /// Try to get the value as a boolean.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get the value as a number.
    #[inline]
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get the value as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Try to get the value as a slice of sequence items.
    #[inline]
    #[must_use]
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Self::Sequence(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Try to get the value as a field mapping.
    #[inline]
    #[must_use]
    pub fn as_mapping(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Mapping(fields) => Some(fields),
            _ => None,
        }
    }

    /// Try to get the value as an opaque payload reference.
    ///
    /// Use [`OpaqueValue::as_any`] to downcast to the concrete type.
    #[inline]
    #[must_use]
    pub fn as_opaque(&self) -> Option<&dyn OpaqueValue> {
        match self {
            Self::Opaque(o) => Some(o.as_ref()),
            _ => None,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::Null
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for Value {
    #[allow(clippy::cast_precision_loss)]
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::Sequence(Arc::new(items))
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(fields: BTreeMap<String, Value>) -> Self {
        Self::Mapping(Arc::new(fields))
    }
}

impl From<Arc<dyn OpaqueValue>> for Value {
    fn from(payload: Arc<dyn OpaqueValue>) -> Self {
        Self::Opaque(payload)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Self::Null,
        }
    }
}
