//! Matchers

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::Duration;

use crate::assertion::verdict::Verdict;
use crate::Error;

/// Numeric comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CmpOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl CmpOp {
    fn apply(self, lhs: f64, rhs: f64) -> bool {
        match self {
            CmpOp::Lt => lhs < rhs,
            CmpOp::Le => lhs <= rhs,
            CmpOp::Gt => lhs > rhs,
            CmpOp::Ge => lhs >= rhs,
            CmpOp::Eq => lhs == rhs,
            CmpOp::Ne => lhs != rhs,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
        }
    }
}

/// Expected condition on an observed value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Matcher {
    Equals(Value),
    /// Substring of a string, or an element of an array
    Contains(String),
    /// Numeric comparison; numeric strings are parsed
    Compare(CmpOp, f64),
    /// Non-empty string, array or object
    NonEmpty,
}

impl Matcher {
    pub fn equals<V: Into<Value>>(value: V) -> Self {
        Matcher::Equals(value.into())
    }

    pub fn contains<S: Into<String>>(fragment: S) -> Self {
        Matcher::Contains(fragment.into())
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Equals(value) => write!(f, "equal to {}", value),
            Matcher::Contains(fragment) => write!(f, "containing '{}'", fragment),
            Matcher::Compare(op, rhs) => write!(f, "{} {}", op.symbol(), rhs),
            Matcher::NonEmpty => f.write_str("non-empty"),
        }
    }
}

/// Outcome of one check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssertionResult {
    Passed,
    Failed { expected: String, actual: String },
}

impl AssertionResult {
    pub fn is_passed(&self) -> bool {
        matches!(self, AssertionResult::Passed)
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{}'", s),
        other => other.to_string(),
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Judge `actual` against `matcher`
pub fn evaluate(actual: &Value, matcher: &Matcher) -> AssertionResult {
    let passed = match matcher {
        Matcher::Equals(expected) => match (actual, expected) {
            (Value::Number(_), Value::Number(_)) => as_number(actual) == as_number(expected),
            _ => actual == expected,
        },
        Matcher::Contains(fragment) => match actual {
            Value::String(s) => s.contains(fragment.as_str()),
            Value::Array(items) => items
                .iter()
                .any(|item| item.as_str() == Some(fragment.as_str())),
            _ => false,
        },
        Matcher::Compare(op, rhs) => as_number(actual).is_some_and(|lhs| op.apply(lhs, *rhs)),
        Matcher::NonEmpty => match actual {
            Value::String(s) => !s.trim().is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::Object(map) => !map.is_empty(),
            Value::Null => false,
            _ => true,
        },
    };

    if passed {
        AssertionResult::Passed
    } else {
        AssertionResult::Failed {
            expected: matcher.to_string(),
            actual: render(actual),
        }
    }
}

/// Judge `actual` and wrap the outcome as a verdict for `step`
pub fn expect<V: Into<Value>>(step: &str, actual: V, matcher: &Matcher) -> Verdict {
    match evaluate(&actual.into(), matcher) {
        AssertionResult::Passed => Verdict::passed(step, Duration::ZERO),
        AssertionResult::Failed { expected, actual } => Verdict::failed(
            step,
            Some(step.to_string()),
            &Error::assertion(step, expected, actual),
            Duration::ZERO,
        ),
    }
}
