//! Aggregation and math functions
//!
//! Nodes produced only through named factories, each of which runs the type
//! gate on every argument before building the node:
//!
//! ```rust
//! use datacube::query::{Aggregate, MathFn, VariableAllocator};
//!
//! let vars = VariableAllocator::new();
//! let temp = vars.coverage("AvgLandTemp").unwrap();
//!
//! assert_eq!(Aggregate::max(&temp).unwrap().to_string(), "max($i1)");
//! assert_eq!(MathFn::pow(&temp, 2).unwrap().to_string(), "pow($i1, 2)");
//! ```

use crate::query::error::{QueryError, QueryResult};
use crate::query::expr::Expr;
use crate::query::type_gate::{self, Value};

/// Aggregation operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateOp {
    Min,
    Max,
    Avg,
    Sum,
    Count,
}

impl AggregateOp {
    /// Function name in query text
    pub fn name(&self) -> &'static str {
        match self {
            Self::Min => "min",
            Self::Max => "max",
            Self::Avg => "avg",
            Self::Sum => "sum",
            Self::Count => "count",
        }
    }

    /// Parse from string
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "min" => Some(Self::Min),
            "max" => Some(Self::Max),
            "avg" | "average" => Some(Self::Avg),
            "sum" => Some(Self::Sum),
            "count" => Some(Self::Count),
            _ => None,
        }
    }
}

/// `op(expr)` aggregation node
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    op: AggregateOp,
    expr: Box<Expr>,
}

impl Aggregate {
    /// Aggregate an expression with any operator
    pub fn new(op: AggregateOp, expr: impl Into<Value>) -> QueryResult<Self> {
        let expr = type_gate::operand(expr)?;
        Ok(Self {
            op,
            expr: Box::new(expr),
        })
    }

    pub fn min(expr: impl Into<Value>) -> QueryResult<Self> {
        Self::new(AggregateOp::Min, expr)
    }

    pub fn max(expr: impl Into<Value>) -> QueryResult<Self> {
        Self::new(AggregateOp::Max, expr)
    }

    pub fn avg(expr: impl Into<Value>) -> QueryResult<Self> {
        Self::new(AggregateOp::Avg, expr)
    }

    pub fn sum(expr: impl Into<Value>) -> QueryResult<Self> {
        Self::new(AggregateOp::Sum, expr)
    }

    pub fn count(expr: impl Into<Value>) -> QueryResult<Self> {
        Self::new(AggregateOp::Count, expr)
    }

    pub fn op(&self) -> AggregateOp {
        self.op
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }
}

/// Math functions understood by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathFunction {
    Round,
    Abs,
    Floor,
    Ceil,
    Exp,
    Ln,
    Sqrt,
    Mod,
    Log,
    Pow,
    Sin,
    Cos,
    Tan,
    Sinh,
    Cosh,
    Tanh,
    Arcsin,
    Arccos,
    Arctan,
    Atan2,
}

impl MathFunction {
    /// Function name in query text
    pub fn name(&self) -> &'static str {
        match self {
            Self::Round => "round",
            Self::Abs => "abs",
            Self::Floor => "floor",
            Self::Ceil => "ceil",
            Self::Exp => "exp",
            Self::Ln => "ln",
            Self::Sqrt => "sqrt",
            Self::Mod => "mod",
            Self::Log => "log",
            Self::Pow => "pow",
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Sinh => "sinh",
            Self::Cosh => "cosh",
            Self::Tanh => "tanh",
            Self::Arcsin => "arcsin",
            Self::Arccos => "arccos",
            Self::Arctan => "arctan",
            Self::Atan2 => "atan2",
        }
    }

    /// Number of arguments the function takes
    pub fn arity(&self) -> usize {
        match self {
            Self::Mod | Self::Log | Self::Pow | Self::Atan2 => 2,
            _ => 1,
        }
    }
}

/// Arguments of a math function node
#[derive(Debug, Clone, PartialEq)]
pub enum MathArgs {
    Unary(Box<Expr>),
    Binary(Box<Expr>, Box<Expr>),
}

/// `name(arg)` or `name(arg1, arg2)` math node
#[derive(Debug, Clone, PartialEq)]
pub struct MathFn {
    function: MathFunction,
    args: MathArgs,
}

impl MathFn {
    /// Apply a one-argument function
    pub fn unary(function: MathFunction, arg: impl Into<Value>) -> QueryResult<Self> {
        if function.arity() != 1 {
            return Err(QueryError::Arity {
                expected: function.arity(),
                found: 1,
            });
        }
        let arg = type_gate::operand(arg)?;
        Ok(Self {
            function,
            args: MathArgs::Unary(Box::new(arg)),
        })
    }

    /// Apply a two-argument function
    pub fn binary(
        function: MathFunction,
        first: impl Into<Value>,
        second: impl Into<Value>,
    ) -> QueryResult<Self> {
        if function.arity() != 2 {
            return Err(QueryError::Arity {
                expected: function.arity(),
                found: 2,
            });
        }
        let first = type_gate::operand(first)?;
        let second = type_gate::operand(second)?;
        Ok(Self {
            function,
            args: MathArgs::Binary(Box::new(first), Box::new(second)),
        })
    }

    pub fn round(expr: impl Into<Value>) -> QueryResult<Self> {
        Self::unary(MathFunction::Round, expr)
    }

    pub fn abs(expr: impl Into<Value>) -> QueryResult<Self> {
        Self::unary(MathFunction::Abs, expr)
    }

    pub fn floor(expr: impl Into<Value>) -> QueryResult<Self> {
        Self::unary(MathFunction::Floor, expr)
    }

    pub fn ceil(expr: impl Into<Value>) -> QueryResult<Self> {
        Self::unary(MathFunction::Ceil, expr)
    }

    pub fn exp(expr: impl Into<Value>) -> QueryResult<Self> {
        Self::unary(MathFunction::Exp, expr)
    }

    pub fn ln(expr: impl Into<Value>) -> QueryResult<Self> {
        Self::unary(MathFunction::Ln, expr)
    }

    pub fn sqrt(expr: impl Into<Value>) -> QueryResult<Self> {
        Self::unary(MathFunction::Sqrt, expr)
    }

    /// `mod(dividend, divisor)`
    pub fn modulo(dividend: impl Into<Value>, divisor: impl Into<Value>) -> QueryResult<Self> {
        Self::binary(MathFunction::Mod, dividend, divisor)
    }

    /// `log(antilogarithm, base)`
    pub fn log(antilogarithm: impl Into<Value>, base: impl Into<Value>) -> QueryResult<Self> {
        Self::binary(MathFunction::Log, antilogarithm, base)
    }

    /// `pow(base, exponent)`
    pub fn pow(base: impl Into<Value>, exponent: impl Into<Value>) -> QueryResult<Self> {
        Self::binary(MathFunction::Pow, base, exponent)
    }

    pub fn sin(expr: impl Into<Value>) -> QueryResult<Self> {
        Self::unary(MathFunction::Sin, expr)
    }

    pub fn cos(expr: impl Into<Value>) -> QueryResult<Self> {
        Self::unary(MathFunction::Cos, expr)
    }

    pub fn tan(expr: impl Into<Value>) -> QueryResult<Self> {
        Self::unary(MathFunction::Tan, expr)
    }

    pub fn sinh(expr: impl Into<Value>) -> QueryResult<Self> {
        Self::unary(MathFunction::Sinh, expr)
    }

    pub fn cosh(expr: impl Into<Value>) -> QueryResult<Self> {
        Self::unary(MathFunction::Cosh, expr)
    }

    pub fn tanh(expr: impl Into<Value>) -> QueryResult<Self> {
        Self::unary(MathFunction::Tanh, expr)
    }

    pub fn arcsin(expr: impl Into<Value>) -> QueryResult<Self> {
        Self::unary(MathFunction::Arcsin, expr)
    }

    pub fn arccos(expr: impl Into<Value>) -> QueryResult<Self> {
        Self::unary(MathFunction::Arccos, expr)
    }

    pub fn arctan(expr: impl Into<Value>) -> QueryResult<Self> {
        Self::unary(MathFunction::Arctan, expr)
    }

    /// `atan2(x, y)`
    pub fn atan2(x: impl Into<Value>, y: impl Into<Value>) -> QueryResult<Self> {
        Self::binary(MathFunction::Atan2, x, y)
    }

    pub fn function(&self) -> MathFunction {
        self.function
    }

    pub fn args(&self) -> &MathArgs {
        &self.args
    }
}
