//! `Guard` — Caller-supplied boolean predicates
//!
//! The conjunction/disjunction clauses (`match_all` / `match_any`) evaluate
//! ordered sequences of guards against the subject. A guard is any
//! `Fn(&Value) -> bool` closure, or one of the built-ins:
//!
//! - [`TextGuard`] — exact / prefix / suffix / contains / regex over string
//!   subjects, with case-insensitive variants
//! - [`TypeTag`] — nominal tag membership
//!
//! Guard failures are not errors: a guard that cannot apply to the subject's
//! type returns `false`. A guard that panics propagates to the caller and
//! aborts the remaining clause chain.

use crate::{TypeTag, Value};

/// A boolean predicate over the subject value.
///
/// Intentionally object-safe: heterogeneous guards can be collected as
/// `Vec<Box<dyn Guard>>` and handed to one `match_all` / `match_any` call.
/// Closures implement it directly via the blanket impl.
///
/// # Example
///
/// ```
/// use triage::{Guard, Value};
///
/// let is_even = |v: &Value| v.as_number().is_some_and(|n| n % 2.0 == 0.0);
/// assert!(is_even.test(&Value::from(4)));
/// assert!(!is_even.test(&Value::from("four")));
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `Guard`",
    label = "this type cannot test a Value",
    note = "guards are plain predicates — use a `Fn(&Value) -> bool` closure, a built-in (TextGuard, TypeTag), or implement the `test(&self, &Value) -> bool` method"
)]
pub trait Guard {
    /// Check whether the given value passes this guard.
    ///
    /// Returns `false` when the value's type is incompatible with the guard.
    fn test(&self, value: &Value) -> bool;
}

impl<F> Guard for F
where
    F: Fn(&Value) -> bool,
{
    fn test(&self, value: &Value) -> bool {
        self(value)
    }
}

// Forwarding impl so Vec<Box<dyn Guard>> feeds match_all/match_any directly.
#[diagnostic::do_not_recommend]
impl Guard for Box<dyn Guard + '_> {
    fn test(&self, value: &Value) -> bool {
        (**self).test(value)
    }
}

/// Tag membership as a guard: passes iff the subject's tag equals this tag.
///
/// ```
/// use triage::{Guard, TypeTag, Value};
///
/// assert!(TypeTag::Number.test(&Value::from(1)));
/// assert!(!TypeTag::Number.test(&Value::from("1")));
/// ```
impl Guard for TypeTag {
    fn test(&self, value: &Value) -> bool {
        value.tag() == *self
    }
}

/// Text matching guard over string subjects.
///
/// Combines the five string matching strategies with optional
/// case-insensitivity. Non-string subjects never pass.
///
/// # Example
///
/// ```
/// use triage::{Guard, TextGuard, Value};
///
/// // Case-insensitive prefix match
/// let guard = TextGuard::prefix("/API/", true);
/// assert!(guard.test(&Value::from("/api/users")));
/// assert!(guard.test(&Value::from("/API/users")));
///
/// // Regex match
/// let guard = TextGuard::regex(r"^user-\d+$").unwrap();
/// assert!(guard.test(&Value::from("user-123")));
/// assert!(!guard.test(&Value::from("user-abc")));
/// ```
#[derive(Debug, Clone)]
pub enum TextGuard {
    /// Exact string equality.
    Exact { value: String, ignore_case: bool },
    /// String prefix match.
    Prefix { value: String, ignore_case: bool },
    /// String suffix match.
    Suffix { value: String, ignore_case: bool },
    /// Substring contains match.
    Contains { value: String, ignore_case: bool },
    /// Regular expression match (RE2 semantics, linear time).
    Regex(regex::Regex),
}

impl TextGuard {
    /// Create an exact match.
    #[must_use]
    pub fn exact(value: impl Into<String>, ignore_case: bool) -> Self {
        Self::Exact {
            value: value.into(),
            ignore_case,
        }
    }

    /// Create a prefix match.
    #[must_use]
    pub fn prefix(value: impl Into<String>, ignore_case: bool) -> Self {
        Self::Prefix {
            value: value.into(),
            ignore_case,
        }
    }

    /// Create a suffix match.
    #[must_use]
    pub fn suffix(value: impl Into<String>, ignore_case: bool) -> Self {
        Self::Suffix {
            value: value.into(),
            ignore_case,
        }
    }

    /// Create a contains match.
    ///
    /// When `ignore_case` is true, the pattern is pre-lowercased at
    /// construction to avoid redundant allocation per test call.
    #[must_use]
    pub fn contains(value: impl Into<String>, ignore_case: bool) -> Self {
        let value = value.into();
        Self::Contains {
            value: if ignore_case {
                value.to_ascii_lowercase()
            } else {
                value
            },
            ignore_case,
        }
    }

    /// Create a regex match.
    ///
    /// Uses the `regex` crate, which guarantees linear time matching.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the regex pattern is invalid.
    pub fn regex(pattern: &str) -> Result<Self, regex::Error> {
        regex::Regex::new(pattern).map(Self::Regex)
    }

    /// Create a case-insensitive regex match.
    ///
    /// Prepends `(?i)` to the pattern.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the regex pattern is invalid.
    pub fn regex_ignore_case(pattern: &str) -> Result<Self, regex::Error> {
        regex::Regex::new(&format!("(?i){pattern}")).map(Self::Regex)
    }
}

impl Guard for TextGuard {
    fn test(&self, value: &Value) -> bool {
        let Some(input) = value.as_str() else {
            return false;
        };

        match self {
            Self::Exact { value, ignore_case } => {
                if *ignore_case {
                    input.eq_ignore_ascii_case(value)
                } else {
                    input == value
                }
            }
            Self::Prefix { value, ignore_case } => {
                if *ignore_case {
                    input
                        .get(..value.len())
                        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(value))
                } else {
                    input.starts_with(value.as_str())
                }
            }
            Self::Suffix { value, ignore_case } => {
                if *ignore_case {
                    input
                        .len()
                        .checked_sub(value.len())
                        .and_then(|start| input.get(start..))
                        .is_some_and(|suffix| suffix.eq_ignore_ascii_case(value))
                } else {
                    input.ends_with(value.as_str())
                }
            }
            Self::Contains { value, ignore_case } => {
                if *ignore_case {
                    // value is pre-lowercased at construction time
                    input.to_ascii_lowercase().contains(value.as_str())
                } else {
                    input.contains(value.as_str())
                }
            }
            Self::Regex(re) => re.is_match(input),
        }
    }
}
