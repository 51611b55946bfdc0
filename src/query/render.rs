//! Query text rendering
//!
//! `Display` impls for every node, producing the one canonical text form the
//! service expects:
//!
//! | Node | Text |
//! |------|------|
//! | coverage | `$i1` or `$i1[Lat(53.08), ansi("2014-07")]` |
//! | axis subset | `Lat(53.08)`, `Lat(35:75)` |
//! | binary operation | `(<left> <op> <right>)`, always parenthesized |
//! | aggregation | `max(<expr>)` |
//! | math function | `sqrt(<expr>)`, `pow(<a>, <b>)` |
//! | color | `{red: R; green: G; blue: B}` |
//! | switch | `switch\ncase (<cond>) return <r>\n...default return <d>\n` |
//!
//! Rendering is a pure function of the tree: equal trees render equally and
//! rendering twice gives the same text.

use crate::query::assembler::{GridConstruct, PolygonClip, ReturnPayload};
use crate::query::axis::{AxisRange, AxisSubset, Bound};
use crate::query::coverage::Coverage;
use crate::query::expr::{ArithmeticOp, BinaryArithmetic, BinaryComparison, ComparisonOp, Expr};
use crate::query::functions::{Aggregate, AggregateOp, MathArgs, MathFn, MathFunction};
use crate::query::literal::{DateLabel, Number, Rgb};
use crate::query::switch::{Case, CaseValue, Switch};
use std::fmt;

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{}", i),
            // Debug keeps a float a float: `2.0`, `1e20`, `1e-5`
            Self::Float(x) => write!(f, "{:?}", x),
        }
    }
}

impl fmt::Display for DateLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // A day without a month renders as the year alone
        match (self.get_month(), self.get_day()) {
            (None, _) => write!(f, "\"{}\"", self.get_year()),
            (Some(m), None) => write!(f, "\"{}-{:02}\"", self.get_year(), m),
            (Some(m), Some(d)) => write!(f, "\"{}-{:02}-{:02}\"", self.get_year(), m, d),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{red: {}; green: {}; blue: {}}}",
            self.red(),
            self.green(),
            self.blue()
        )
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Date(d) => write!(f, "{}", d),
        }
    }
}

impl fmt::Display for AxisRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Point(at) => write!(f, "{}", at),
            Self::Interval(lo, hi) => write!(f, "{}:{}", lo, hi),
        }
    }
}

impl fmt::Display for AxisSubset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.range())
    }
}

impl fmt::Display for Coverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.variable())?;
        if let Some(axes) = self.subset() {
            write!(f, "[")?;
            for (i, axis) in axes.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", axis)?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}

impl fmt::Display for ArithmeticOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for AggregateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for MathFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for BinaryArithmetic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {} {})", self.left(), self.op(), self.right())
    }
}

impl fmt::Display for BinaryComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {} {})", self.left(), self.op(), self.right())
    }
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.op(), self.expr())
    }
}

impl fmt::Display for MathFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.args() {
            MathArgs::Unary(arg) => write!(f, "{}({})", self.function(), arg),
            MathArgs::Binary(a, b) => write!(f, "{}({}, {})", self.function(), a, b),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Coverage(node) => write!(f, "{}", node),
            Self::Arithmetic(node) => write!(f, "{}", node),
            Self::Comparison(node) => write!(f, "{}", node),
            Self::Number(node) => write!(f, "{}", node),
            Self::Aggregate(node) => write!(f, "{}", node),
            Self::Math(node) => write!(f, "{}", node),
        }
    }
}

impl fmt::Display for CaseValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Color(color) => write!(f, "{}", color),
            Self::Expr(expr) => write!(f, "{}", expr),
        }
    }
}

impl fmt::Display for Case {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "case {} return {}", self.condition(), self.result())
    }
}

impl fmt::Display for Switch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "switch")?;
        for case in self.cases() {
            writeln!(f, "{}", case)?;
        }
        writeln!(f, "default return {}", self.default_value())
    }
}

impl fmt::Display for GridConstruct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ((x0, x1), (y0, y1)) = (self.x_range(), self.y_range());
        write!(
            f,
            "coverage myCoverage\nover $p x(({}:{})), $q y(({}:{})) values $p {} $q",
            x0,
            x1,
            y0,
            y1,
            self.op()
        )
    }
}

impl fmt::Display for PolygonClip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "clip({}, POLYGON((", self.variable())?;
        for (i, (x, y)) in self.vertices().iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{} {}", x, y)?;
        }
        write!(f, ")))")
    }
}

impl fmt::Display for ReturnPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => write!(f, "1"),
            Self::Expr(expr) => write!(f, "{}", expr),
            Self::Switch(switch) => write!(f, "{}", switch),
            Self::Construct(construct) => write!(f, "{}", construct),
            Self::Clip(clip) => write!(f, "{}", clip),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::coverage::VariableAllocator;
    use crate::query::expr::{Arithmetic, Comparison};

    fn subset_coverage(vars: &VariableAllocator) -> Coverage {
        vars.coverage("AvgLandTemp")
            .unwrap()
            .with_subset(vec![
                AxisSubset::point("ansi", DateLabel::year_month(2014, 7).unwrap()).unwrap(),
                AxisSubset::point("Lat", 53.08).unwrap(),
                AxisSubset::point("Long", 8.80).unwrap(),
            ])
            .unwrap()
    }

    #[test]
    fn test_numbers() {
        assert_eq!(Number::Int(-20).to_string(), "-20");
        assert_eq!(Number::Float(8.80).to_string(), "8.8");
        assert_eq!(Number::Float(53.08).to_string(), "53.08");
    }

    #[test]
    fn test_integral_floats_stay_floats() {
        assert_eq!(Number::Float(2.0).to_string(), "2.0");
        assert_eq!(Number::Float(0.0).to_string(), "0.0");
        assert_eq!(Number::Float(-10.0).to_string(), "-10.0");
        assert_eq!(Number::Float(1e20).to_string(), "1e20");
        assert_eq!(Number::Float(1e-5).to_string(), "1e-5");
        assert_eq!(Number::Int(2).to_string(), "2");

        let vars = VariableAllocator::new();
        let cov = vars.coverage("A").unwrap();
        assert_eq!((&cov).times(2.0).unwrap().to_string(), "($i1 * 2.0)");
        assert_eq!((&cov).times(2).unwrap().to_string(), "($i1 * 2)");
    }

    #[test]
    fn test_date_labels() {
        assert_eq!(DateLabel::year(2020).unwrap().to_string(), "\"2020\"");
        assert_eq!(DateLabel::year_month(2014, 1).unwrap().to_string(), "\"2014-01\"");
        assert_eq!(DateLabel::ymd(2014, 7, 4).unwrap().to_string(), "\"2014-07-04\"");
        assert_eq!(DateLabel::new(2014, None, Some(4)).unwrap().to_string(), "\"2014\"");
    }

    #[test]
    fn test_axis_subsets() {
        assert_eq!(AxisSubset::point("Lat", 53.08).unwrap().to_string(), "Lat(53.08)");
        assert_eq!(AxisSubset::interval("Long", -20, 40).unwrap().to_string(), "Long(-20:40)");
        let time = AxisSubset::interval(
            "time",
            DateLabel::year(2020).unwrap(),
            DateLabel::year(2021).unwrap(),
        )
        .unwrap();
        assert_eq!(time.to_string(), "time(\"2020\":\"2021\")");
    }

    #[test]
    fn test_coverage_with_and_without_subset() {
        let vars = VariableAllocator::new();
        let plain = vars.coverage("A").unwrap();
        assert_eq!(plain.to_string(), "$i1");

        let subset = vars
            .coverage("CoverageName")
            .unwrap()
            .with_subset(vec![
                AxisSubset::interval(
                    "time",
                    DateLabel::year(2020).unwrap(),
                    DateLabel::year(2021).unwrap(),
                )
                .unwrap(),
                AxisSubset::interval("latitude", 0, 90).unwrap(),
            ])
            .unwrap();
        assert_eq!(subset.to_string(), "$i2[time(\"2020\":\"2021\"), latitude(0:90)]");
    }

    #[test]
    fn test_binary_nodes_fully_parenthesized() {
        let vars = VariableAllocator::new();
        let x = vars.coverage("X").unwrap();
        let y = vars.coverage("Y").unwrap();

        for op in [ArithmeticOp::Add, ArithmeticOp::Sub, ArithmeticOp::Mul, ArithmeticOp::Div] {
            let node = (&x).arithmetic(op, &y).unwrap();
            assert_eq!(node.to_string(), format!("($i1 {} $i2)", op.symbol()));

            let nested = (&x).plus(&y).unwrap().arithmetic(op, 3).unwrap();
            assert_eq!(nested.to_string(), format!("(($i1 + $i2) {} 3)", op.symbol()));
        }

        for op in [ComparisonOp::Lt, ComparisonOp::Le, ComparisonOp::Eq, ComparisonOp::Ne, ComparisonOp::Gt, ComparisonOp::Ge] {
            let node = (&x).compare(op, &y).unwrap();
            assert_eq!(node.to_string(), format!("($i1 {} $i2)", op.symbol()));
        }

        let logical = (&x)
            .greater_than(0)
            .unwrap()
            .and((&x).less_than(10).unwrap())
            .unwrap();
        assert_eq!(logical.to_string(), "(($i1 > 0) and ($i1 < 10))");
    }

    #[test]
    fn test_functions() {
        let vars = VariableAllocator::new();
        let cov = subset_coverage(&vars);

        assert_eq!(
            Aggregate::max(&cov).unwrap().to_string(),
            "max($i1[ansi(\"2014-07\"), Lat(53.08), Long(8.8)])"
        );
        assert_eq!(MathFn::round(2.5).unwrap().to_string(), "round(2.5)");
        assert_eq!(MathFn::modulo(7, 2).unwrap().to_string(), "mod(7, 2)");
        assert_eq!(MathFn::atan2(1, 2).unwrap().to_string(), "atan2(1, 2)");

        let nested = MathFn::log(Aggregate::avg(&cov).unwrap(), 10).unwrap();
        assert_eq!(
            nested.to_string(),
            "log(avg($i1[ansi(\"2014-07\"), Lat(53.08), Long(8.8)]), 10)"
        );
    }

    #[test]
    fn test_switch_text() {
        let vars = VariableAllocator::new();
        let x = vars.coverage("X").unwrap();
        let case = Case::new((&x).equals(99999).unwrap(), Rgb::new(255, 255, 255).unwrap()).unwrap();
        let switch = Switch::new(vec![case], Rgb::new(0, 0, 0).unwrap()).unwrap();

        assert_eq!(
            switch.to_string(),
            "switch\ncase ($i1 = 99999) return {red: 255; green: 255; blue: 255}\ndefault return {red: 0; green: 0; blue: 0}\n"
        );
    }

    #[test]
    fn test_switch_preserves_case_order() {
        let vars = VariableAllocator::new();
        let cov = vars
            .coverage("AvgLandTemp")
            .unwrap()
            .with_subset(vec![
                AxisSubset::interval("Lat", 35, 75).unwrap(),
                AxisSubset::interval("Long", -20, 40).unwrap(),
                AxisSubset::point("ansi", DateLabel::year_month(2014, 7).unwrap()).unwrap(),
            ])
            .unwrap();

        let switch = Switch::new(
            vec![
                Case::new((&cov).equals(99999).unwrap(), Rgb::new(255, 255, 255).unwrap()).unwrap(),
                Case::new((&cov).greater_than(30).unwrap(), Rgb::new(255, 0, 255).unwrap()).unwrap(),
            ],
            Rgb::new(255, 0, 0).unwrap(),
        )
        .unwrap();

        let expected = "switch
case ($i1[Lat(35:75), Long(-20:40), ansi(\"2014-07\")] = 99999) return {red: 255; green: 255; blue: 255}
case ($i1[Lat(35:75), Long(-20:40), ansi(\"2014-07\")] > 30) return {red: 255; green: 0; blue: 255}
default return {red: 255; green: 0; blue: 0}
";
        assert_eq!(switch.to_string(), expected);
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let vars = VariableAllocator::new();
        let x = vars.coverage("X").unwrap();

        let build = || {
            MathFn::sqrt((&x).times(2).unwrap())
                .unwrap()
                .greater_or_equal(Aggregate::count(&x).unwrap())
                .unwrap()
        };
        let a = build();
        let b = build();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), b.to_string());
        assert_eq!(a.to_string(), a.to_string());
        assert_eq!(a.to_string(), "(sqrt(($i1 * 2)) >= count($i1))");
    }
}
