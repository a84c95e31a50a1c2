//! Filter expression parser using chumsky.
//!
//! A filter is a single comparison between an INFO attribute and a literal:
//! - `controls_nhomalt > 0`
//! - `AF<=0.001`
//! - `lcr != true`

use std::fmt;

use chumsky::prelude::*;

use crate::error::{LofFilterError, Result};
use crate::eval::compare;
use crate::value::Value;
use crate::variant::Variant;

/// Characters that may only appear inside the operator.
const OPERATOR_CHARS: [char; 4] = ['<', '>', '=', '!'];

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,    // ==
    NotEq, // !=
    Lt,    // <
    Gt,    // >
    LtEq,  // <=
    GtEq,  // >=
}

impl CmpOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            CmpOp::Eq => "==",
            CmpOp::NotEq => "!=",
            CmpOp::Lt => "<",
            CmpOp::Gt => ">",
            CmpOp::LtEq => "<=",
            CmpOp::GtEq => ">=",
        }
    }
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Create the `attribute op value` parser.
pub fn parser() -> impl Parser<char, (String, CmpOp, String), Error = Simple<char>> {
    let operand = filter(|c: &char| !OPERATOR_CHARS.contains(c))
        .repeated()
        .at_least(1)
        .collect::<String>()
        .map(|s| s.trim().to_string());

    // Longer operators first so `<=` is not read as `<` followed by `=`.
    let cmp_op = choice((
        just("==").to(CmpOp::Eq),
        just("!=").to(CmpOp::NotEq),
        just("<=").to(CmpOp::LtEq),
        just(">=").to(CmpOp::GtEq),
        just("<").to(CmpOp::Lt),
        just(">").to(CmpOp::Gt),
    ));

    operand
        .clone()
        .then(cmp_op)
        .then(operand)
        .then_ignore(end())
        .map(|((attribute, op), value)| (attribute, op, value))
}

/// A named comparison evaluated against a variant's INFO map.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub name: String,
    pub attribute: String,
    pub op: CmpOp,
    pub value: String,
}

impl Filter {
    /// Parse `expression` into a filter.
    ///
    /// The expression must contain exactly one operator with a non-empty
    /// operand on each side.
    pub fn new(name: &str, expression: &str) -> Result<Self> {
        let (attribute, op, value) = parser().parse(expression).map_err(|errs| {
            LofFilterError::FilterConfigurationError(format!(
                "{:?} ({}): {}",
                expression,
                name,
                errs.into_iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })?;

        if attribute.is_empty() || value.is_empty() {
            return Err(LofFilterError::FilterConfigurationError(format!(
                "{:?} ({}): expected `attribute op value`",
                expression, name
            )));
        }

        Ok(Self {
            name: name.to_string(),
            attribute,
            op,
            value,
        })
    }

    /// Evaluate the filter against a variant.
    ///
    /// # Returns
    ///
    /// `MissingAttribute` when the variant's INFO map lacks the attribute.
    pub fn apply(&self, variant: &Variant) -> Result<bool> {
        let raw = variant
            .info_value(&self.attribute)
            .ok_or_else(|| LofFilterError::MissingAttribute(self.attribute.clone()))?;
        Ok(compare(&Value::from_raw(raw), self.op, &Value::from_raw(&self.value)))
    }

    /// Like `apply`, with any evaluation error counted as not passing.
    pub fn passes(&self, variant: &Variant) -> bool {
        match self.apply(variant) {
            Ok(result) => result,
            Err(e) => {
                tracing::debug!(filter = %self.name, variant = %variant.id, "{}", e);
                false
            }
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.attribute, self.op, self.value)
    }
}

/// True when every filter passes (an empty chain always passes).
pub fn filters_pass(filters: &[Filter], variant: &Variant) -> bool {
    filters.iter().all(|f| f.passes(variant))
}
