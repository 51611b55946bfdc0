//! Query assembler
//!
//! [`Query`] binds one or more coverages into the iteration clause and holds
//! the current return payload. The payload is a small state machine
//! ([`ReturnPayload`]); every `set`-style call replaces it, so the last
//! write wins.
//!
//! ```text
//! for $i1 in (AvgLandTemp) return max($i1[Lat(53.08), Long(8.8)])
//! ```

use tracing::{debug, info};

use crate::query::coverage::Coverage;
use crate::query::error::{QueryError, QueryResult};
use crate::query::expr::{ComparisonOp, Expr};
use crate::query::literal::Number;
use crate::query::switch::{Case, Switch};
use crate::query::type_gate::{self, Value};
use crate::service::{formats, ServiceParams, ServiceResponse, Transport};

/// `coverage myCoverage over $p x(..), $q y(..) values $p <op> $q`
#[derive(Debug, Clone, PartialEq)]
pub struct GridConstruct {
    x: (Number, Number),
    y: (Number, Number),
    op: ComparisonOp,
}

impl GridConstruct {
    /// Build from exactly two numeric pairs
    pub fn new(ranges: &[Vec<Value>], op: ComparisonOp) -> QueryResult<Self> {
        if ranges.len() != 2 {
            return Err(QueryError::Arity {
                expected: 2,
                found: ranges.len(),
            });
        }
        let x = numeric_pair(&ranges[0], 0)?;
        let y = numeric_pair(&ranges[1], 1)?;
        Ok(Self { x, y, op })
    }

    pub fn x_range(&self) -> (Number, Number) {
        self.x
    }

    pub fn y_range(&self) -> (Number, Number) {
        self.y
    }

    pub fn op(&self) -> ComparisonOp {
        self.op
    }
}

/// `clip(<variable>, POLYGON((x y,...)))`
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonClip {
    variable: String,
    vertices: Vec<(Number, Number)>,
}

impl PolygonClip {
    /// Build a clip of `variable` from numeric vertex pairs
    pub fn new(variable: impl Into<String>, vertices: &[Vec<Value>]) -> QueryResult<Self> {
        let vertices = vertices
            .iter()
            .enumerate()
            .map(|(i, pair)| numeric_pair(pair, i))
            .collect::<QueryResult<Vec<_>>>()?;
        Ok(Self {
            variable: variable.into(),
            vertices,
        })
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    pub fn vertices(&self) -> &[(Number, Number)] {
        &self.vertices
    }
}

fn numeric_pair(pair: &[Value], index: usize) -> QueryResult<(Number, Number)> {
    if pair.len() != 2 {
        return Err(QueryError::ElementType(format!(
            "tuple {} must hold exactly 2 numbers, found {} elements",
            index,
            pair.len()
        )));
    }
    let number = |value: &Value| {
        let n = value.as_number().ok_or_else(|| {
            QueryError::ElementType(format!(
                "tuple {} holds a {}, expected a number",
                index,
                value.kind()
            ))
        })?;
        if !n.is_finite() {
            return Err(QueryError::ElementType(format!(
                "tuple {} holds a non-finite number",
                index
            )));
        }
        Ok(n)
    };
    Ok((number(&pair[0])?, number(&pair[1])?))
}

/// What a query returns
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ReturnPayload {
    /// Nothing set yet; renders as the literal `1`
    #[default]
    Unset,
    /// Expression tree or number
    Expr(Expr),
    /// Switch construct
    Switch(Switch),
    /// Grid construct template
    Construct(GridConstruct),
    /// Polygon clip template
    Clip(PolygonClip),
}

/// A query over one or more coverages
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    coverages: Vec<Coverage>,
    payload: ReturnPayload,
}

impl Query {
    /// Bind coverages; at least one is required
    pub fn new(coverages: Vec<Coverage>) -> QueryResult<Self> {
        if coverages.is_empty() {
            return Err(QueryError::NoCoverage);
        }
        Ok(Self {
            coverages,
            payload: ReturnPayload::Unset,
        })
    }

    /// Query over a single coverage
    pub fn over(coverage: Coverage) -> Self {
        Self {
            coverages: vec![coverage],
            payload: ReturnPayload::Unset,
        }
    }

    pub fn coverages(&self) -> &[Coverage] {
        &self.coverages
    }

    pub fn payload(&self) -> &ReturnPayload {
        &self.payload
    }

    /// Replace the return payload
    pub fn set_payload(&mut self, payload: ReturnPayload) {
        self.payload = payload;
    }

    /// Return an expression tree or number
    pub fn return_expression(&mut self, value: impl Into<Value>) -> QueryResult<&mut Self> {
        let expr = type_gate::operand(value)?;
        self.set_payload(ReturnPayload::Expr(expr));
        Ok(self)
    }

    /// Return a switch built from cases and a default
    pub fn switch(&mut self, cases: Vec<Case>, default: impl Into<Value>) -> QueryResult<&mut Self> {
        let switch = Switch::new(cases, default)?;
        Ok(self.return_switch(switch))
    }

    /// Return an already built switch
    pub fn return_switch(&mut self, switch: Switch) -> &mut Self {
        self.set_payload(ReturnPayload::Switch(switch));
        self
    }

    /// Return a synthetic grid built from two ranges
    pub fn construct(&mut self, ranges: &[Vec<Value>], op: ComparisonOp) -> QueryResult<&mut Self> {
        let construct = GridConstruct::new(ranges, op)?;
        self.set_payload(ReturnPayload::Construct(construct));
        Ok(self)
    }

    /// Return the first coverage clipped to a polygon
    pub fn clip(&mut self, vertices: &[Vec<Value>]) -> QueryResult<&mut Self> {
        let variable = self.coverages[0].variable().to_string();
        let clip = PolygonClip::new(variable, vertices)?;
        self.set_payload(ReturnPayload::Clip(clip));
        Ok(self)
    }

    /// `for $i1 in (A),\n$i2 in (B)`
    ///
    /// Follows the WCPS for-clause form
    /// `for <var1> in (<names1>), ... <varN> in (<namesN>)`: every source after
    /// the first is preceded by a comma, the last one included.
    pub fn iteration_clause(&self) -> String {
        let sources = self
            .coverages
            .iter()
            .map(|c| format!("{} in ({})", c.variable(), c.used_coverage()))
            .collect::<Vec<_>>()
            .join(",\n");
        format!("for {}", sources)
    }

    /// Final query text without encoding
    pub fn render(&self) -> String {
        format!("{} return {}", self.iteration_clause(), self.payload)
    }

    /// Final query text, wrapped in `encode(.., "<format>")` when a format is given
    pub fn render_with_format(&self, format: Option<&str>) -> QueryResult<String> {
        let text = match format {
            None => self.render(),
            Some(format) => {
                formats::ensure_known(format)?;
                format!(
                    "{} return encode({}, \"{}\")",
                    self.iteration_clause(),
                    self.payload,
                    format
                )
            }
        };
        debug!(length = text.len(), format = ?format, "Rendered query");
        Ok(text)
    }

    /// Render and post the query
    ///
    /// A malformed query or unknown format is an `Err` and nothing is sent.
    /// A rejection by the service or the network comes back as
    /// [`ServiceResponse::Failure`].
    pub async fn execute(
        &self,
        transport: &dyn Transport,
        params: &ServiceParams,
        format: Option<&str>,
    ) -> QueryResult<ServiceResponse> {
        let text = self.render_with_format(format)?;
        info!(
            coverages = self.coverages.len(),
            endpoint = %params.endpoint,
            "Executing query"
        );
        Ok(transport.post_query(params, &text).await.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::coverage::VariableAllocator;
    use crate::query::expr::Comparison;
    use crate::query::functions::Aggregate;
    use crate::query::literal::{DateLabel, Rgb};
    use crate::query::AxisSubset;
    use crate::service::{ServiceRequest, TransportFailure};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingTransport {
        calls: AtomicUsize,
        last_query: Mutex<Option<String>>,
        fail: bool,
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn post_query(
            &self,
            _params: &ServiceParams,
            query: &str,
        ) -> Result<Vec<u8>, TransportFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_query.lock().unwrap() = Some(query.to_string());
            if self.fail {
                Err(TransportFailure::Timeout { code: None })
            } else {
                Ok(b"42".to_vec())
            }
        }

        async fn send_request(
            &self,
            _params: &ServiceParams,
            _request: &ServiceRequest,
        ) -> Result<Vec<u8>, TransportFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }
    }

    fn pairs(values: &[(f64, f64)]) -> Vec<Vec<Value>> {
        values
            .iter()
            .map(|(x, y)| vec![Value::from(*x), Value::from(*y)])
            .collect()
    }

    #[test]
    fn test_requires_coverage() {
        assert_eq!(Query::new(vec![]), Err(QueryError::NoCoverage));
    }

    #[test]
    fn test_unset_payload_renders_one() {
        let vars = VariableAllocator::new();
        let query = Query::over(vars.coverage("AvgLandTemp").unwrap());
        assert_eq!(query.render(), "for $i1 in (AvgLandTemp) return 1");
    }

    #[test]
    fn test_aggregate_over_subset() {
        let vars = VariableAllocator::starting_at(0);
        let cov = vars
            .coverage("AvgLandTemp")
            .unwrap()
            .with_subset(vec![
                AxisSubset::point("Lat", 53.08).unwrap(),
                AxisSubset::point("Long", 8.8).unwrap(),
                AxisSubset::interval(
                    "ansi",
                    DateLabel::year_month(2014, 1).unwrap(),
                    DateLabel::year_month(2014, 12).unwrap(),
                )
                .unwrap(),
            ])
            .unwrap();

        let mut query = Query::over(cov.clone());
        query.return_expression(Aggregate::max(&cov).unwrap()).unwrap();

        assert_eq!(
            query.render(),
            "for $i0 in (AvgLandTemp) return max($i0[Lat(53.08), Long(8.8), ansi(\"2014-01\":\"2014-12\")])"
        );
    }

    #[test]
    fn test_two_sources() {
        let vars = VariableAllocator::new();
        let a = vars.coverage("A").unwrap();
        let b = vars.coverage("B").unwrap();

        let mut query = Query::new(vec![a.clone(), b.clone()]).unwrap();
        query.return_expression((&a).greater_than(&b).unwrap()).unwrap();

        assert_eq!(
            query.render(),
            "for $i1 in (A),\n$i2 in (B) return ($i1 > $i2)"
        );
    }

    #[test]
    fn test_return_expression_is_gated() {
        let vars = VariableAllocator::new();
        let mut query = Query::over(vars.coverage("A").unwrap());
        assert_eq!(
            query.return_expression("max").map(|_| ()),
            Err(QueryError::InvalidOperandKind { found: "text" })
        );
        assert_eq!(query.payload(), &ReturnPayload::Unset);
    }

    #[test]
    fn test_construct_template() {
        let vars = VariableAllocator::new();
        let mut query = Query::over(vars.coverage("A").unwrap());
        let ranges = vec![
            vec![Value::from(1), Value::from(2)],
            vec![Value::from(3), Value::from(4)],
        ];
        query.construct(&ranges, ComparisonOp::Gt).unwrap();

        assert_eq!(
            query.payload().to_string(),
            "coverage myCoverage\nover $p x((1:2)), $q y((3:4)) values $p > $q"
        );
    }

    #[test]
    fn test_construct_arity_and_types() {
        let vars = VariableAllocator::new();
        let mut query = Query::over(vars.coverage("A").unwrap());

        assert_eq!(
            query.construct(&pairs(&[(1.0, 2.0)]), ComparisonOp::Gt).map(|_| ()),
            Err(QueryError::Arity {
                expected: 2,
                found: 1
            })
        );

        let bad_element = vec![
            vec![Value::from(1), Value::from("2")],
            vec![Value::from(3), Value::from(4)],
        ];
        assert!(matches!(
            query.construct(&bad_element, ComparisonOp::Gt),
            Err(QueryError::ElementType(_))
        ));

        let bad_len = vec![
            vec![Value::from(1), Value::from(2), Value::from(3)],
            vec![Value::from(3), Value::from(4)],
        ];
        assert!(matches!(
            query.construct(&bad_len, ComparisonOp::Gt),
            Err(QueryError::ElementType(_))
        ));
    }

    #[test]
    fn test_non_finite_tuples_rejected() {
        let vars = VariableAllocator::new();
        let mut query = Query::over(vars.coverage("A").unwrap());

        assert!(matches!(
            query.construct(&pairs(&[(0.0, f64::NAN), (1.0, 2.0)]), ComparisonOp::Gt),
            Err(QueryError::ElementType(_))
        ));
        assert!(matches!(
            query.clip(&pairs(&[(1.0, 2.0), (f64::INFINITY, 4.0)])),
            Err(QueryError::ElementType(_))
        ));
        assert_eq!(query.payload(), &ReturnPayload::Unset);

        query
            .construct(&pairs(&[(0.0, 1.5), (2.0, 3.0)]), ComparisonOp::Lt)
            .unwrap();
        assert_eq!(
            query.payload().to_string(),
            "coverage myCoverage\nover $p x((0.0:1.5)), $q y((2.0:3.0)) values $p < $q"
        );
    }

    #[test]
    fn test_clip_uses_first_variable() {
        let vars = VariableAllocator::new();
        let a = vars.coverage("A").unwrap();
        let b = vars.coverage("B").unwrap();
        let mut query = Query::new(vec![a, b]).unwrap();
        query
            .clip(&[
                vec![Value::from(1), Value::from(2)],
                vec![Value::from(3), Value::from(4)],
            ])
            .unwrap();

        assert_eq!(query.payload().to_string(), "clip($i1, POLYGON((1 2,3 4)))");
        assert!(matches!(
            query.clip(&[vec![Value::from(true), Value::from(2)]]),
            Err(QueryError::ElementType(_))
        ));
    }

    #[test]
    fn test_last_write_wins() {
        let vars = VariableAllocator::new();
        let cov = vars.coverage("A").unwrap();
        let mut query = Query::over(cov.clone());

        let case = Case::new((&cov).equals(99999).unwrap(), Rgb::new(255, 255, 255).unwrap()).unwrap();
        query.switch(vec![case], Rgb::new(0, 0, 0).unwrap()).unwrap();
        assert!(matches!(query.payload(), ReturnPayload::Switch(_)));

        query.return_expression(&cov).unwrap();
        assert_eq!(query.render(), "for $i1 in (A) return $i1");
    }

    #[test]
    fn test_switch_query_text() {
        let vars = VariableAllocator::new();
        let cov = vars.coverage("A").unwrap();
        let mut query = Query::over(cov.clone());
        let case = Case::new((&cov).equals(99999).unwrap(), Rgb::new(255, 255, 255).unwrap()).unwrap();
        query.switch(vec![case], Rgb::new(0, 0, 0).unwrap()).unwrap();

        assert_eq!(
            query.render_with_format(Some("png")).unwrap(),
            "for $i1 in (A) return encode(switch\ncase ($i1 = 99999) return {red: 255; green: 255; blue: 255}\ndefault return {red: 0; green: 0; blue: 0}\n, \"png\")"
        );
    }

    #[test]
    fn test_unknown_format_rejected() {
        let vars = VariableAllocator::new();
        let query = Query::over(vars.coverage("A").unwrap());
        assert_eq!(
            query.render_with_format(Some("bmp")),
            Err(QueryError::UnknownFormat("bmp".to_string()))
        );
    }

    #[tokio::test]
    async fn test_execute_posts_encoded_query() {
        let vars = VariableAllocator::new();
        let cov = vars.coverage("A").unwrap();
        let mut query = Query::over(cov.clone());
        query.return_expression(Aggregate::avg(&cov).unwrap()).unwrap();

        let transport = RecordingTransport::default();
        let response = query
            .execute(&transport, &ServiceParams::default(), Some("csv"))
            .await
            .unwrap();

        assert_eq!(response, ServiceResponse::Success(b"42".to_vec()));
        assert_eq!(
            transport.last_query.lock().unwrap().as_deref(),
            Some("for $i1 in (A) return encode(avg($i1), \"csv\")")
        );

        // Executing again does not wrap the payload twice
        query
            .execute(&transport, &ServiceParams::default(), Some("csv"))
            .await
            .unwrap();
        assert_eq!(
            transport.last_query.lock().unwrap().as_deref(),
            Some("for $i1 in (A) return encode(avg($i1), \"csv\")")
        );
    }

    #[tokio::test]
    async fn test_execute_unknown_format_sends_nothing() {
        let vars = VariableAllocator::new();
        let query = Query::over(vars.coverage("A").unwrap());
        let transport = RecordingTransport::default();

        let result = query
            .execute(&transport, &ServiceParams::default(), Some("bmp"))
            .await;

        assert_eq!(result, Err(QueryError::UnknownFormat("bmp".to_string())));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_execute_failure_is_data() {
        let vars = VariableAllocator::new();
        let query = Query::over(vars.coverage("A").unwrap());
        let transport = RecordingTransport {
            fail: true,
            ..Default::default()
        };

        let response = query
            .execute(&transport, &ServiceParams::default(), None)
            .await
            .unwrap();

        assert_eq!(
            response,
            ServiceResponse::Failure(TransportFailure::Timeout { code: None })
        );
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }
}
