//! Axis subsets
//!
//! An axis subset restricts one named dimension of a coverage to a single
//! point or a closed interval, e.g. `Lat(53.08)` or `ansi("2014-01":"2014-12")`.

use crate::query::error::{QueryError, QueryResult};
use crate::query::literal::{DateLabel, Number};

/// One bound of an axis range
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    /// Numeric coordinate, rendered unquoted
    Number(Number),
    /// Date label, rendered quoted
    Date(DateLabel),
}

impl Bound {
    fn is_same_kind(&self, other: &Bound) -> bool {
        matches!(
            (self, other),
            (Bound::Number(_), Bound::Number(_)) | (Bound::Date(_), Bound::Date(_))
        )
    }
}

impl From<DateLabel> for Bound {
    fn from(date: DateLabel) -> Self {
        Self::Date(date)
    }
}

impl From<Number> for Bound {
    fn from(number: Number) -> Self {
        Self::Number(number)
    }
}

impl From<i32> for Bound {
    fn from(value: i32) -> Self {
        Self::Number(value.into())
    }
}

impl From<i64> for Bound {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<f64> for Bound {
    fn from(value: f64) -> Self {
        Self::Number(value.into())
    }
}

/// Range of an axis subset
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AxisRange {
    /// Slice at a single coordinate
    Point(Bound),
    /// Trim to a closed interval
    Interval(Bound, Bound),
}

/// A named axis restricted to a point or interval
#[derive(Debug, Clone, PartialEq)]
pub struct AxisSubset {
    name: String,
    range: AxisRange,
}

impl AxisSubset {
    /// Create an axis subset, validating the name and interval bound kinds
    pub fn new(name: impl Into<String>, range: AxisRange) -> QueryResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(QueryError::InvalidAxis("axis name must not be empty".into()));
        }
        let bounds = match &range {
            AxisRange::Point(at) => vec![at],
            AxisRange::Interval(lo, hi) => {
                if !lo.is_same_kind(hi) {
                    return Err(QueryError::MismatchedBounds);
                }
                vec![lo, hi]
            }
        };
        if bounds
            .iter()
            .any(|b| matches!(b, Bound::Number(n) if !n.is_finite()))
        {
            return Err(QueryError::InvalidAxis(format!(
                "non-finite bound on axis {}",
                name
            )));
        }
        Ok(Self { name, range })
    }

    /// Slice an axis at a single coordinate
    pub fn point(name: impl Into<String>, at: impl Into<Bound>) -> QueryResult<Self> {
        Self::new(name, AxisRange::Point(at.into()))
    }

    /// Trim an axis to the closed interval `lo:hi`
    pub fn interval(
        name: impl Into<String>,
        lo: impl Into<Bound>,
        hi: impl Into<Bound>,
    ) -> QueryResult<Self> {
        Self::new(name, AxisRange::Interval(lo.into(), hi.into()))
    }

    /// Axis name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Axis range
    pub fn range(&self) -> &AxisRange {
        &self.range
    }

    /// Rename the axis
    pub fn set_name(&mut self, name: impl Into<String>) -> QueryResult<()> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(QueryError::InvalidAxis("axis name must not be empty".into()));
        }
        self.name = name;
        Ok(())
    }
}
