//! Structural matching — the recursive pattern walk
//!
//! Pure functions deciding whether a [`Value`] satisfies a [`Pattern`].
//! Shape and array clauses delegate here; literal clauses never do (literal
//! equality is [`Value`]'s `PartialEq`, identity semantics).
//!
//! Recursion depth is bounded at construction time via
//! [`Pattern::validate`](crate::Pattern::validate), not re-checked here.

use crate::{ArrayPattern, Pattern, Value};

/// Decide whether `value` structurally satisfies `pattern`.
///
/// The walk, in order:
///
/// 1. A non-composite value (scalars, `Null`, `Opaque`) matches only a
///    `Literal` pattern, by identity equality.
/// 2. A `Sequence` against an `Array` pattern delegates to [`array_match`].
/// 3. A `Shape` pattern matches iff every named field exists in the value's
///    mapping with a deep-matching value. Fields of the value the pattern
///    does not name are ignored: a shape is a subset constraint, not full
///    equality. The empty shape matches any composite value, sequences
///    included (no field requirement can fail).
/// 4. Anything else is no match. In particular a `Literal` pattern never
///    matches a composite value, and an `Array` pattern never matches a
///    mapping.
///
/// # Example
///
/// ```
/// use triage::{structural::deep_match, Pattern, Value};
///
/// let subject = Value::mapping([
///     ("type", Value::from("user")),
///     ("name", Value::from("Ann")),
/// ]);
///
/// assert!(deep_match(&subject, &Pattern::shape([("type", Pattern::from("user"))])));
/// assert!(!deep_match(&subject, &Pattern::shape([("type", Pattern::from("admin"))])));
/// ```
#[must_use]
pub fn deep_match(value: &Value, pattern: &Pattern) -> bool {
    if !value.is_composite() {
        return match pattern {
            Pattern::Literal(expected) => value == expected,
            Pattern::Shape(_) | Pattern::Array(_) => false,
        };
    }

    match pattern {
        Pattern::Array(array) => value
            .as_sequence()
            .is_some_and(|items| array_match(items, array)),
        Pattern::Shape(fields) => fields.iter().all(|(key, sub)| {
            value
                .as_mapping()
                .and_then(|mapping| mapping.get(key))
                .is_some_and(|field| deep_match(field, sub))
        }),
        Pattern::Literal(_) => false,
    }
}

/// Decide whether a sequence satisfies an [`ArrayPattern`].
///
/// - An exact-length constraint fails unless `items.len()` equals it.
/// - An element-prefix constraint fails if the sequence is shorter than the
///   prefix; otherwise each listed sub-pattern must deep-match the item at
///   its index. Items past the prefix are unconstrained.
/// - With neither constraint, any sequence matches.
#[must_use]
pub fn array_match(items: &[Value], pattern: &ArrayPattern) -> bool {
    if pattern.length.is_some_and(|length| items.len() != length) {
        return false;
    }

    match pattern.elements.as_deref() {
        Some(elements) => {
            items.len() >= elements.len()
                && elements
                    .iter()
                    .zip(items)
                    .all(|(sub, item)| deep_match(item, sub))
        }
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> Value {
        Value::mapping([
            ("type", Value::from("user")),
            ("name", Value::from("Ann")),
            ("age", Value::from(30)),
        ])
    }

    #[test]
    fn shape_partial_match_ignores_extra_fields() {
        let pattern = Pattern::shape([("type", Pattern::from("user"))]);
        assert!(deep_match(&user(), &pattern));

        let pattern = Pattern::shape([("type", Pattern::from("admin"))]);
        assert!(!deep_match(&user(), &pattern));
    }

    #[test]
    fn shape_requires_every_named_field() {
        let pattern = Pattern::shape([
            ("type", Pattern::from("user")),
            ("email", Pattern::from("ann@example.com")),
        ]);
        assert!(!deep_match(&user(), &pattern));
    }

    #[test]
    fn empty_shape_matches_any_composite() {
        let empty = Pattern::shape(std::iter::empty::<(&str, Pattern)>());
        assert!(deep_match(&user(), &empty));
        assert!(deep_match(&Value::sequence([Value::from(1)]), &empty));

        // ...but not scalars: the literal fallback rejects shape patterns.
        assert!(!deep_match(&Value::from(1), &empty));
        assert!(!deep_match(&Value::Null, &empty));
    }

    #[test]
    fn null_field_pattern_means_key_present_with_null() {
        let subject = Value::mapping([("deleted_at", Value::Null)]);
        let pattern = Pattern::shape([("deleted_at", Pattern::literal(Value::Null))]);
        assert!(deep_match(&subject, &pattern));

        // Absent key is not the same as a Null value.
        let other = Value::mapping([("name", Value::from("Ann"))]);
        assert!(!deep_match(&other, &pattern));
    }

    #[test]
    fn nested_shapes_recurse() {
        let subject = Value::mapping([(
            "owner",
            Value::mapping([("type", Value::from("user"))]),
        )]);
        let pattern = Pattern::shape([(
            "owner",
            Pattern::shape([("type", Pattern::from("user"))]),
        )]);
        assert!(deep_match(&subject, &pattern));

        let pattern = Pattern::shape([(
            "owner",
            Pattern::shape([("type", Pattern::from("group"))]),
        )]);
        assert!(!deep_match(&subject, &pattern));
    }

    #[test]
    fn nested_array_inside_shape_recurses() {
        let subject = Value::mapping([(
            "coords",
            Value::sequence([Value::from(3), Value::from(4)]),
        )]);
        let pattern = Pattern::shape([(
            "coords",
            Pattern::array(ArrayPattern::with_length(2).elements([Pattern::from(3)])),
        )]);
        assert!(deep_match(&subject, &pattern));
    }

    #[test]
    fn literal_pattern_never_matches_composite() {
        let seq = Value::sequence([Value::from(1)]);
        // Even an identity-equal literal falls to the no-match arm.
        let pattern = Pattern::literal(seq.clone());
        assert!(!deep_match(&seq, &pattern));
    }

    #[test]
    fn array_pattern_never_matches_mapping() {
        let pattern = Pattern::array(ArrayPattern::any());
        assert!(!deep_match(&user(), &pattern));
    }

    #[test]
    fn scalar_literal_fallback() {
        assert!(deep_match(&Value::from(5), &Pattern::from(5)));
        assert!(!deep_match(&Value::from(5), &Pattern::from(6)));
        assert!(deep_match(&Value::Null, &Pattern::literal(Value::Null)));
        assert!(!deep_match(&Value::from(f64::NAN), &Pattern::from(f64::NAN)));
    }

    #[test]
    fn array_exact_length() {
        let items = [Value::from(1), Value::from(2), Value::from(3)];
        assert!(array_match(&items, &ArrayPattern::with_length(3)));
        assert!(!array_match(&items, &ArrayPattern::with_length(2)));

        let longer = [
            Value::from(1),
            Value::from(2),
            Value::from(3),
            Value::from(4),
        ];
        assert!(!array_match(&longer, &ArrayPattern::with_length(3)));
    }

    #[test]
    fn array_prefix_semantics() {
        let items = [
            Value::from(1),
            Value::from(2),
            Value::from(3),
            Value::from(4),
        ];

        // Prefix-only: trailing items unconstrained.
        let prefix =
            ArrayPattern::with_elements([Pattern::from(1), Pattern::from(2)]);
        assert!(array_match(&items, &prefix));

        // Sequence shorter than the prefix: no match.
        let short = [Value::from(1)];
        assert!(!array_match(&short, &prefix));

        // Prefix mismatch.
        let wrong =
            ArrayPattern::with_elements([Pattern::from(2), Pattern::from(1)]);
        assert!(!array_match(&items, &wrong));
    }

    #[test]
    fn array_length_and_elements_combined() {
        let items = [Value::from(1), Value::from(2), Value::from(3)];
        let pattern = ArrayPattern::with_length(3)
            .elements([Pattern::from(1), Pattern::from(2), Pattern::from(3)]);
        assert!(array_match(&items, &pattern));

        let pattern = ArrayPattern::with_length(4)
            .elements([Pattern::from(1), Pattern::from(2), Pattern::from(3)]);
        assert!(!array_match(&items, &pattern));
    }

    #[test]
    fn degenerate_pattern_matches_any_sequence() {
        assert!(array_match(&[], &ArrayPattern::any()));
        assert!(array_match(&[Value::from(1)], &ArrayPattern::any()));
    }
}
