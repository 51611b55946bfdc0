//! Benchmarks for query construction and rendering
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use datacube::query::{
    Aggregate, Arithmetic, AxisSubset, Case, Comparison, DateLabel, Expr, Query, Rgb,
    VariableAllocator,
};

/// Left-deep chain `((($i1 + 1) + 2) + ...)`
fn build_chain(vars: &VariableAllocator, depth: usize) -> Expr {
    let cov = vars.coverage("AvgLandTemp").unwrap();
    let mut expr: Expr = cov.into();
    for i in 0..depth {
        expr = expr.plus(i as i64).unwrap().into();
    }
    expr
}

fn bench_expression_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("expression_chain");

    for depth in [10, 100, 1000] {
        group.bench_with_input(BenchmarkId::new("build", depth), &depth, |b, &depth| {
            let vars = VariableAllocator::new();
            b.iter(|| build_chain(&vars, black_box(depth)))
        });

        let expr = build_chain(&VariableAllocator::new(), depth);
        group.bench_with_input(BenchmarkId::new("render", depth), &expr, |b, expr| {
            b.iter(|| black_box(expr).to_string())
        });
    }

    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");

    let vars = VariableAllocator::new();
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

    let mut aggregate = Query::over(cov.clone());
    aggregate.return_expression(Aggregate::max(&cov).unwrap()).unwrap();
    group.bench_function("aggregate_encode", |b| {
        b.iter(|| aggregate.render_with_format(black_box(Some("csv"))).unwrap())
    });

    let cases = (0..50)
        .map(|i| {
            Case::new(
                (&cov).less_than(i * 10).unwrap(),
                Rgb::new(i * 5, 255 - i * 5, 0).unwrap(),
            )
            .unwrap()
        })
        .collect();
    let mut switch = Query::over(cov.clone());
    switch.switch(cases, Rgb::new(0, 0, 0).unwrap()).unwrap();
    group.bench_function("switch_50_cases", |b| {
        b.iter(|| switch.render_with_format(black_box(Some("png"))).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_expression_chain, bench_query);
criterion_main!(benches);
