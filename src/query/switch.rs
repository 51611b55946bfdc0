//! Switch construct
//!
//! An ordered list of `(condition, result)` cases with a mandatory default.
//! Cases are rendered, and matched by the service, in the order given:
//!
//! ```text
//! switch
//! case ($i1 = 99999) return {red: 255; green: 255; blue: 255}
//! default return {red: 0; green: 0; blue: 0}
//! ```

use crate::query::error::{QueryError, QueryResult};
use crate::query::expr::{BinaryComparison, Expr};
use crate::query::literal::Rgb;
use crate::query::type_gate::{self, Value};

/// Result of a case or of the default branch
#[derive(Debug, Clone, PartialEq)]
pub enum CaseValue {
    /// Color triple
    Color(Rgb),
    /// Any gate-accepted expression
    Expr(Expr),
}

impl CaseValue {
    fn from_value(value: impl Into<Value>) -> QueryResult<Self> {
        match value.into() {
            Value::Color(color) => Ok(Self::Color(color)),
            other => Ok(Self::Expr(type_gate::operand(other)?)),
        }
    }
}

/// One `case (<condition>) return <result>` branch
#[derive(Debug, Clone, PartialEq)]
pub struct Case {
    condition: BinaryComparison,
    result: CaseValue,
}

impl Case {
    /// Create a case; the condition must be a comparison
    pub fn new(condition: impl Into<Value>, result: impl Into<Value>) -> QueryResult<Self> {
        let condition = comparison(condition)?;
        let result = CaseValue::from_value(result)?;
        Ok(Self { condition, result })
    }

    pub fn condition(&self) -> &BinaryComparison {
        &self.condition
    }

    pub fn result(&self) -> &CaseValue {
        &self.result
    }

    /// Replace the condition
    pub fn set_condition(&mut self, condition: impl Into<Value>) -> QueryResult<()> {
        self.condition = comparison(condition)?;
        Ok(())
    }

    /// Replace the result
    pub fn set_result(&mut self, result: impl Into<Value>) -> QueryResult<()> {
        self.result = CaseValue::from_value(result)?;
        Ok(())
    }
}

fn comparison(value: impl Into<Value>) -> QueryResult<BinaryComparison> {
    match value.into() {
        Value::Expr(Expr::Comparison(node)) => Ok(node),
        other => Err(QueryError::InvalidCondition {
            found: other.kind(),
        }),
    }
}

/// Ordered cases plus a default result
#[derive(Debug, Clone, PartialEq)]
pub struct Switch {
    cases: Vec<Case>,
    default: CaseValue,
}

impl Switch {
    /// Create a switch; at least one case is required
    pub fn new(cases: Vec<Case>, default: impl Into<Value>) -> QueryResult<Self> {
        if cases.is_empty() {
            return Err(QueryError::EmptyCases);
        }
        let default = CaseValue::from_value(default)?;
        Ok(Self { cases, default })
    }

    pub fn cases(&self) -> &[Case] {
        &self.cases
    }

    pub fn default_value(&self) -> &CaseValue {
        &self.default
    }

    /// Replace all cases
    pub fn set_cases(&mut self, cases: Vec<Case>) -> QueryResult<()> {
        if cases.is_empty() {
            return Err(QueryError::EmptyCases);
        }
        self.cases = cases;
        Ok(())
    }

    /// Replace the default result
    pub fn set_default(&mut self, default: impl Into<Value>) -> QueryResult<()> {
        self.default = CaseValue::from_value(default)?;
        Ok(())
    }
}
