//! Query Builder
//!
//! Builds coverage-processing queries as typed trees and renders them to
//! the text the service expects:
//!
//! - **Literals & axes**: numbers, date labels, colors and axis subsets
//! - **Expressions**: coverage references, arithmetic, comparisons,
//!   aggregations and math functions, checked by the type gate
//! - **Switch**: ordered conditional results with a default
//! - **Assembler**: the iteration clause plus a return payload
//! - **Parser**: textual axis subsets back into typed values
//!
//! # Query Language
//!
//! ```text
//! for $i1 in (AvgLandTemp) return encode(
//!     max($i1[Lat(53.08), Long(8.8), ansi("2014-01":"2014-12")]), "csv")
//! ```
//!
//! # Examples
//!
//! ```rust
//! use datacube::query::{Aggregate, AxisSubset, DateLabel, Query, VariableAllocator};
//!
//! let vars = VariableAllocator::new();
//! let temp = vars
//!     .coverage("AvgLandTemp")
//!     .unwrap()
//!     .with_subset(vec![
//!         AxisSubset::point("Lat", 53.08).unwrap(),
//!         AxisSubset::interval(
//!             "ansi",
//!             DateLabel::year_month(2014, 1).unwrap(),
//!             DateLabel::year_month(2014, 12).unwrap(),
//!         )
//!         .unwrap(),
//!     ])
//!     .unwrap();
//!
//! let mut query = Query::over(temp.clone());
//! query.return_expression(Aggregate::max(&temp).unwrap()).unwrap();
//!
//! assert_eq!(
//!     query.render_with_format(Some("csv")).unwrap(),
//!     r#"for $i1 in (AvgLandTemp) return encode(max($i1[Lat(53.08), ansi("2014-01":"2014-12")]), "csv")"#
//! );
//! ```

mod assembler;
mod axis;
mod coverage;
mod error;
mod expr;
mod functions;
mod literal;
mod parser;
mod render;
mod switch;
mod type_gate;

pub use assembler::{GridConstruct, PolygonClip, Query, ReturnPayload};
pub use axis::{AxisRange, AxisSubset, Bound};
pub use coverage::{Coverage, CoverageNames, VariableAllocator};
pub use error::{QueryError, QueryResult};
pub use expr::{
    Arithmetic, ArithmeticOp, BinaryArithmetic, BinaryComparison, Comparison, ComparisonOp, Expr,
};
pub use functions::{Aggregate, AggregateOp, MathArgs, MathFn, MathFunction};
pub use literal::{DateLabel, Number, Rgb};
pub use parser::{parse_axis_subset, parse_date_label};
pub use switch::{Case, CaseValue, Switch};
pub use type_gate::{operand, validate, Value};
