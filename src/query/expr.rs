//! Expression tree
//!
//! The closed set of nodes a query expression is built from. Every node owns
//! its operands, so trees nest to any depth without sharing. Operands enter
//! a tree only through the type gate ([`super::type_gate`]), which runs at
//! every construction site.
//!
//! Nodes compose through two capability traits:
//!
//! - [`Arithmetic`]: `plus`, `minus`, `times`, `divided_by`
//! - [`Comparison`]: `less_than`, `less_or_equal`, `equals`, `not_equals`,
//!   `greater_than`, `greater_or_equal`
//!
//! Comparisons are named methods rather than `PartialEq`/`PartialOrd`
//! impls, so structural equality of trees keeps its usual meaning.
//!
//! ```rust
//! use datacube::query::{Arithmetic, Comparison, VariableAllocator};
//!
//! let vars = VariableAllocator::new();
//! let a = vars.coverage("A").unwrap();
//! let b = vars.coverage("B").unwrap();
//!
//! let expr = a.plus(b).unwrap().minus(3).unwrap();
//! assert_eq!(expr.to_string(), "(($i1 + $i2) - 3)");
//! ```

use crate::query::coverage::Coverage;
use crate::query::error::QueryResult;
use crate::query::functions::{Aggregate, MathFn};
use crate::query::literal::Number;
use crate::query::type_gate::{self, Value};

/// An expression node
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Coverage reference
    Coverage(Coverage),
    /// Binary arithmetic operation
    Arithmetic(BinaryArithmetic),
    /// Binary comparison or logical operation
    Comparison(BinaryComparison),
    /// Numeric literal
    Number(Number),
    /// Aggregation over an expression
    Aggregate(Aggregate),
    /// Math function application
    Math(MathFn),
}

impl Expr {
    /// Short name of the node kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Coverage(_) => "coverage",
            Self::Arithmetic(_) => "arithmetic expression",
            Self::Comparison(_) => "comparison expression",
            Self::Number(_) => "number",
            Self::Aggregate(_) => "aggregation",
            Self::Math(_) => "math function",
        }
    }
}

impl From<Coverage> for Expr {
    fn from(coverage: Coverage) -> Self {
        Self::Coverage(coverage)
    }
}

impl From<&Coverage> for Expr {
    fn from(coverage: &Coverage) -> Self {
        Self::Coverage(coverage.clone())
    }
}

impl From<BinaryArithmetic> for Expr {
    fn from(node: BinaryArithmetic) -> Self {
        Self::Arithmetic(node)
    }
}

impl From<BinaryComparison> for Expr {
    fn from(node: BinaryComparison) -> Self {
        Self::Comparison(node)
    }
}

impl From<Aggregate> for Expr {
    fn from(node: Aggregate) -> Self {
        Self::Aggregate(node)
    }
}

impl From<MathFn> for Expr {
    fn from(node: MathFn) -> Self {
        Self::Math(node)
    }
}

impl From<Number> for Expr {
    fn from(number: Number) -> Self {
        Self::Number(number)
    }
}

impl From<i32> for Expr {
    fn from(value: i32) -> Self {
        Self::Number(value.into())
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Self::Number(value.into())
    }
}

/// Arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithmeticOp {
    /// Operator as written in query text
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        }
    }

    /// Parse from its query text symbol
    pub fn from_symbol(s: &str) -> Option<Self> {
        match s {
            "+" => Some(Self::Add),
            "-" => Some(Self::Sub),
            "*" => Some(Self::Mul),
            "/" => Some(Self::Div),
            _ => None,
        }
    }
}

/// Comparison and logical operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    /// Less than
    Lt,
    /// Less than or equal to
    Le,
    /// Equal to
    Eq,
    /// Not equal to
    Ne,
    /// Greater than
    Gt,
    /// Greater than or equal to
    Ge,
    /// Logical and
    And,
    /// Logical or
    Or,
    /// Logical exclusive or
    Xor,
}

impl ComparisonOp {
    /// Operator as written in query text
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::And => "and",
            Self::Or => "or",
            Self::Xor => "xor",
        }
    }

    /// Parse from its query text symbol
    pub fn from_symbol(s: &str) -> Option<Self> {
        match s {
            "<" => Some(Self::Lt),
            "<=" => Some(Self::Le),
            "=" | "==" => Some(Self::Eq),
            "!=" => Some(Self::Ne),
            ">" => Some(Self::Gt),
            ">=" => Some(Self::Ge),
            "and" => Some(Self::And),
            "or" => Some(Self::Or),
            "xor" => Some(Self::Xor),
            _ => None,
        }
    }
}

/// `(left op right)` with an arithmetic operator
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryArithmetic {
    left: Box<Expr>,
    op: ArithmeticOp,
    right: Box<Expr>,
}

impl BinaryArithmetic {
    /// Build a node, gating the right operand
    pub fn new(left: impl Into<Expr>, op: ArithmeticOp, right: impl Into<Value>) -> QueryResult<Self> {
        let right = type_gate::operand(right)?;
        Ok(Self {
            left: Box::new(left.into()),
            op,
            right: Box::new(right),
        })
    }

    pub fn left(&self) -> &Expr {
        &self.left
    }

    pub fn op(&self) -> ArithmeticOp {
        self.op
    }

    pub fn right(&self) -> &Expr {
        &self.right
    }
}

/// `(left op right)` with a comparison or logical operator
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryComparison {
    left: Box<Expr>,
    op: ComparisonOp,
    right: Box<Expr>,
}

impl BinaryComparison {
    /// Build a node, gating the right operand
    pub fn new(left: impl Into<Expr>, op: ComparisonOp, right: impl Into<Value>) -> QueryResult<Self> {
        let right = type_gate::operand(right)?;
        Ok(Self {
            left: Box::new(left.into()),
            op,
            right: Box::new(right),
        })
    }

    pub fn left(&self) -> &Expr {
        &self.left
    }

    pub fn op(&self) -> ComparisonOp {
        self.op
    }

    pub fn right(&self) -> &Expr {
        &self.right
    }

    /// `(self and rhs)`
    pub fn and(self, rhs: impl Into<Value>) -> QueryResult<BinaryComparison> {
        BinaryComparison::new(self, ComparisonOp::And, rhs)
    }

    /// `(self or rhs)`
    pub fn or(self, rhs: impl Into<Value>) -> QueryResult<BinaryComparison> {
        BinaryComparison::new(self, ComparisonOp::Or, rhs)
    }

    /// `(self xor rhs)`
    pub fn xor(self, rhs: impl Into<Value>) -> QueryResult<BinaryComparison> {
        BinaryComparison::new(self, ComparisonOp::Xor, rhs)
    }
}

/// Nodes that can be the left side of an arithmetic operation
pub trait Arithmetic: Into<Expr> {
    /// Apply any arithmetic operator
    fn arithmetic(self, op: ArithmeticOp, rhs: impl Into<Value>) -> QueryResult<BinaryArithmetic> {
        BinaryArithmetic::new(self, op, rhs)
    }

    /// `(self + rhs)`
    fn plus(self, rhs: impl Into<Value>) -> QueryResult<BinaryArithmetic> {
        self.arithmetic(ArithmeticOp::Add, rhs)
    }

    /// `(self - rhs)`
    fn minus(self, rhs: impl Into<Value>) -> QueryResult<BinaryArithmetic> {
        self.arithmetic(ArithmeticOp::Sub, rhs)
    }

    /// `(self * rhs)`
    fn times(self, rhs: impl Into<Value>) -> QueryResult<BinaryArithmetic> {
        self.arithmetic(ArithmeticOp::Mul, rhs)
    }

    /// `(self / rhs)`
    fn divided_by(self, rhs: impl Into<Value>) -> QueryResult<BinaryArithmetic> {
        self.arithmetic(ArithmeticOp::Div, rhs)
    }
}

/// Nodes that can be the left side of a comparison
pub trait Comparison: Into<Expr> {
    /// Apply any comparison operator
    fn compare(self, op: ComparisonOp, rhs: impl Into<Value>) -> QueryResult<BinaryComparison> {
        BinaryComparison::new(self, op, rhs)
    }

    /// `(self < rhs)`
    fn less_than(self, rhs: impl Into<Value>) -> QueryResult<BinaryComparison> {
        self.compare(ComparisonOp::Lt, rhs)
    }

    /// `(self <= rhs)`
    fn less_or_equal(self, rhs: impl Into<Value>) -> QueryResult<BinaryComparison> {
        self.compare(ComparisonOp::Le, rhs)
    }

    /// `(self = rhs)`
    fn equals(self, rhs: impl Into<Value>) -> QueryResult<BinaryComparison> {
        self.compare(ComparisonOp::Eq, rhs)
    }

    /// `(self != rhs)`
    fn not_equals(self, rhs: impl Into<Value>) -> QueryResult<BinaryComparison> {
        self.compare(ComparisonOp::Ne, rhs)
    }

    /// `(self > rhs)`
    fn greater_than(self, rhs: impl Into<Value>) -> QueryResult<BinaryComparison> {
        self.compare(ComparisonOp::Gt, rhs)
    }

    /// `(self >= rhs)`
    fn greater_or_equal(self, rhs: impl Into<Value>) -> QueryResult<BinaryComparison> {
        self.compare(ComparisonOp::Ge, rhs)
    }
}

impl Arithmetic for Expr {}
impl Arithmetic for Coverage {}
impl Arithmetic for &Coverage {}
impl Arithmetic for BinaryArithmetic {}
impl Arithmetic for BinaryComparison {}
impl Arithmetic for Aggregate {}
impl Arithmetic for MathFn {}

impl Comparison for Expr {}
impl Comparison for Coverage {}
impl Comparison for &Coverage {}
impl Comparison for BinaryArithmetic {}
impl Comparison for BinaryComparison {}
impl Comparison for Aggregate {}
impl Comparison for MathFn {}
