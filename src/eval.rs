//! Comparison evaluation for filter operands.

use std::cmp::Ordering;

use crate::filter::CmpOp;
use crate::value::Value;

/// Compare an attribute value with a filter literal.
///
/// Two numbers compare numerically and two strings lexicographically. When
/// only one side is numeric the values are unequal and unordered, so `!=` is
/// the only operator that holds.
pub fn compare(left: &Value, op: CmpOp, right: &Value) -> bool {
    match left.partial_cmp_value(right) {
        Some(ordering) => match op {
            CmpOp::Eq => ordering == Ordering::Equal,
            CmpOp::NotEq => ordering != Ordering::Equal,
            CmpOp::Lt => ordering == Ordering::Less,
            CmpOp::Gt => ordering == Ordering::Greater,
            CmpOp::LtEq => ordering != Ordering::Greater,
            CmpOp::GtEq => ordering != Ordering::Less,
        },
        None => {
            tracing::trace!(
                left = left.type_name(),
                right = right.type_name(),
                "incomparable filter operands"
            );
            op == CmpOp::NotEq
        }
    }
}
