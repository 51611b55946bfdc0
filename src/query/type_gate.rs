//! Operand type gate
//!
//! Every construction site (operators, aggregate and math factories, switch
//! cases and defaults, the query return expression) accepts an
//! `impl Into<Value>` and passes it through [`validate`] before a node is
//! built. Only expression nodes and finite numbers get through; text, booleans,
//! date labels and colors are rejected with
//! [`QueryError::InvalidOperandKind`].

use crate::query::coverage::Coverage;
use crate::query::error::{QueryError, QueryResult};
use crate::query::expr::{BinaryArithmetic, BinaryComparison, Expr};
use crate::query::functions::{Aggregate, MathFn};
use crate::query::literal::{DateLabel, Number, Rgb};

/// Any value a caller may offer as an operand
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// An expression node or number
    Expr(Expr),
    /// Free text
    Text(String),
    /// Boolean flag
    Bool(bool),
    /// Date label (only valid inside axis subsets)
    Date(DateLabel),
    /// Color (only valid as a switch result)
    Color(Rgb),
}

impl Value {
    /// Short name of the value kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Expr(expr) => expr.kind(),
            Self::Text(_) => "text",
            Self::Bool(_) => "boolean",
            Self::Date(_) => "date",
            Self::Color(_) => "color",
        }
    }

    /// The numeric literal held by this value, if any
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Self::Expr(Expr::Number(n)) => Some(*n),
            _ => None,
        }
    }
}

/// Check that a value may be used as an operand
pub fn validate(value: &Value) -> QueryResult<()> {
    match value {
        Value::Expr(Expr::Number(n)) if !n.is_finite() => Err(QueryError::InvalidOperandKind {
            found: "non-finite number",
        }),
        Value::Expr(Expr::Coverage(_))
        | Value::Expr(Expr::Arithmetic(_))
        | Value::Expr(Expr::Comparison(_))
        | Value::Expr(Expr::Number(_))
        | Value::Expr(Expr::Aggregate(_))
        | Value::Expr(Expr::Math(_)) => Ok(()),
        Value::Text(_) | Value::Bool(_) | Value::Date(_) | Value::Color(_) => {
            Err(QueryError::InvalidOperandKind {
                found: value.kind(),
            })
        }
    }
}

/// Validate a value and unwrap it into an expression node
pub fn operand(value: impl Into<Value>) -> QueryResult<Expr> {
    let value = value.into();
    validate(&value)?;
    match value {
        Value::Expr(expr) => Ok(expr),
        other => Err(QueryError::InvalidOperandKind {
            found: other.kind(),
        }),
    }
}

impl From<Expr> for Value {
    fn from(expr: Expr) -> Self {
        Self::Expr(expr)
    }
}

impl From<Coverage> for Value {
    fn from(coverage: Coverage) -> Self {
        Self::Expr(coverage.into())
    }
}

impl From<&Coverage> for Value {
    fn from(coverage: &Coverage) -> Self {
        Self::Expr(coverage.into())
    }
}

impl From<BinaryArithmetic> for Value {
    fn from(node: BinaryArithmetic) -> Self {
        Self::Expr(node.into())
    }
}

impl From<BinaryComparison> for Value {
    fn from(node: BinaryComparison) -> Self {
        Self::Expr(node.into())
    }
}

impl From<Aggregate> for Value {
    fn from(node: Aggregate) -> Self {
        Self::Expr(node.into())
    }
}

impl From<MathFn> for Value {
    fn from(node: MathFn) -> Self {
        Self::Expr(node.into())
    }
}

impl From<Number> for Value {
    fn from(number: Number) -> Self {
        Self::Expr(Expr::Number(number))
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Expr(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Expr(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Expr(value.into())
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Self::Bool(flag)
    }
}

impl From<DateLabel> for Value {
    fn from(date: DateLabel) -> Self {
        Self::Date(date)
    }
}

impl From<Rgb> for Value {
    fn from(color: Rgb) -> Self {
        Self::Color(color)
    }
}
