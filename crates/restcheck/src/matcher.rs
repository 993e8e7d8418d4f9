//! Structural assertions over JSON responses.
//!
//! Two comparison modes:
//!
//! - **Partial** ([`match_partial`]): every key the expectation declares
//!   must exist in the actual payload with an equal value; extra actual keys
//!   are ignored; nested objects recurse under the same rule.
//! - **Exact-except** ([`match_exact`]): partial rules plus: any actual key
//!   the expectation does not declare fails the match unless its name is in
//!   the ignore list (server-assigned fields such as `id`).
//!
//! The first divergence is reported as a dotted key-path, found depth-first
//! and left-to-right in the expectation's own key order, so failures are
//! deterministic and debuggable without re-running.
//!
//! Numbers compare exactly by default. A PUT that echoes `69.64` back as
//! `69.6` is a contract violation, not noise; callers that do want slack
//! opt in through [`MatchOptions::with_tolerance`].

use serde_json::{Number, Value};

use crate::error::AssertionError;

/// Fails with [`AssertionError::StatusMismatch`] when the status codes differ.
pub fn assert_status(actual: u16, expected: u16) -> Result<(), AssertionError> {
    if actual != expected {
        return Err(AssertionError::StatusMismatch { expected, actual });
    }
    Ok(())
}

/// Numeric comparison policy for structural matches.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchOptions {
    tolerance: Option<f64>,
}

impl MatchOptions {
    /// Exact numeric equality (the default).
    pub fn exact() -> Self {
        Self { tolerance: None }
    }

    /// Allows numbers to differ by up to `tolerance` (absolute).
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self {
            tolerance: Some(tolerance),
        }
    }

    fn numbers_eq(&self, actual: &Number, expected: &Number) -> bool {
        // Compare through f64 so 20 and 20.0 agree; the wire format does not
        // distinguish them.
        match (actual.as_f64(), expected.as_f64()) {
            (Some(a), Some(e)) => match self.tolerance {
                Some(t) => (a - e).abs() <= t,
                None => a == e,
            },
            _ => false,
        }
    }
}

/// Recursive subset comparison with exact numeric equality.
pub fn match_partial(actual: &Value, expected: &Value) -> Result<(), AssertionError> {
    match_partial_with(actual, expected, MatchOptions::default())
}

/// Recursive subset comparison with an explicit numeric policy.
pub fn match_partial_with(
    actual: &Value,
    expected: &Value,
    options: MatchOptions,
) -> Result<(), AssertionError> {
    match_value("", actual, expected, options, None)
}

/// Exact match except for the named server-assigned keys (matched by key
/// name at any depth).
pub fn match_exact(
    actual: &Value,
    expected: &Value,
    ignore: &[String],
) -> Result<(), AssertionError> {
    match_exact_with(actual, expected, ignore, MatchOptions::default())
}

/// Exact-except comparison with an explicit numeric policy.
pub fn match_exact_with(
    actual: &Value,
    expected: &Value,
    ignore: &[String],
    options: MatchOptions,
) -> Result<(), AssertionError> {
    match_value("", actual, expected, options, Some(ignore))
}

fn match_value(
    path: &str,
    actual: &Value,
    expected: &Value,
    options: MatchOptions,
    strict_ignore: Option<&[String]>,
) -> Result<(), AssertionError> {
    match (actual, expected) {
        (Value::Object(actual_map), Value::Object(expected_map)) => {
            for (key, expected_child) in expected_map {
                let child_path = join_path(path, key);
                match actual_map.get(key) {
                    None => {
                        return Err(AssertionError::StructuralMismatch {
                            path: child_path,
                            expected: expected_child.clone(),
                            actual: None,
                        });
                    }
                    Some(actual_child) => {
                        match_value(&child_path, actual_child, expected_child, options, strict_ignore)?
                    }
                }
            }

            if let Some(ignore) = strict_ignore {
                for key in actual_map.keys() {
                    if !expected_map.contains_key(key) && !ignore.iter().any(|i| i == key) {
                        return Err(AssertionError::UnexpectedKey {
                            path: join_path(path, key),
                        });
                    }
                }
            }

            Ok(())
        }
        (Value::Array(actual_items), Value::Array(expected_items)) => {
            if actual_items.len() != expected_items.len() {
                return Err(divergence(path, expected, actual));
            }
            for (index, (actual_item, expected_item)) in
                actual_items.iter().zip(expected_items).enumerate()
            {
                let child_path = format!("{}[{index}]", display_path(path));
                match_value(&child_path, actual_item, expected_item, options, strict_ignore)?;
            }
            Ok(())
        }
        (Value::Number(actual_number), Value::Number(expected_number)) => {
            if options.numbers_eq(actual_number, expected_number) {
                Ok(())
            } else {
                Err(divergence(path, expected, actual))
            }
        }
        _ => {
            if actual == expected {
                Ok(())
            } else {
                Err(divergence(path, expected, actual))
            }
        }
    }
}

fn divergence(path: &str, expected: &Value, actual: &Value) -> AssertionError {
    AssertionError::StructuralMismatch {
        path: display_path(path).to_string(),
        expected: expected.clone(),
        actual: Some(actual.clone()),
    }
}

fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() { "$" } else { path }
}
