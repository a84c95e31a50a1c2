//! Operand values used during filter evaluation.

use std::cmp::Ordering;
use std::fmt;

/// A filter operand, either side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A string value.
    String(String),
    /// A numeric value (integer or float).
    Number(f64),
}

impl Value {
    /// Coerce raw text into a value, preferring a number when it parses as one.
    pub fn from_raw(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.parse::<f64>() {
            Ok(n) if n.is_finite() => Value::Number(n),
            _ => Value::String(raw.to_string()),
        }
    }

    /// Returns the type name for log messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Number(_) => "number",
        }
    }

    /// Order two values of the same kind.
    ///
    /// Returns `None` when one side is a number and the other is not.
    pub fn partial_cmp_value(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Number(l), Value::Number(r)) => l.partial_cmp(r),
            (Value::String(l), Value::String(r)) => Some(l.cmp(r)),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::from_raw(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_number() {
        assert_eq!(Value::from_raw("3"), Value::Number(3.0));
        assert_eq!(Value::from_raw(" 0.25 "), Value::Number(0.25));
        assert_eq!(Value::from_raw("1e-3"), Value::Number(0.001));
    }

    #[test]
    fn test_from_raw_string() {
        assert_eq!(Value::from_raw("PASS"), Value::String("PASS".to_string()));
        assert_eq!(Value::from_raw("1,2"), Value::String("1,2".to_string()));
        // "nan" and "inf" parse as f64 but are kept as text
        assert_eq!(Value::from_raw("nan"), Value::String("nan".to_string()));
    }

    #[test]
    fn test_mixed_kinds_do_not_order() {
        let n = Value::Number(1.0);
        let s = Value::String("a".to_string());
        assert_eq!(n.partial_cmp_value(&s), None);
        assert_eq!(
            Value::from("b").partial_cmp_value(&s),
            Some(Ordering::Greater)
        );
    }
}
