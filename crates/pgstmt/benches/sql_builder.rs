use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pgstmt::{
    BindingsCollector, FilterPredicate, Statement, UpdatePayload, UpdateStatementBuilder,
};

/// Payload with `n` columns: col0 = 0, col1 = 1, ...
fn payload(n: usize) -> UpdatePayload {
    (0..n).map(|i| (format!("col{i}"), i as i64)).collect()
}

fn predicates(n: usize) -> Vec<FilterPredicate> {
    (0..n)
        .map(|i| FilterPredicate::eq(format!("key{i}"), i as i64))
        .collect()
}

fn bench_single_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/single_update");
    let builder = UpdateStatementBuilder::new();

    for n in [1, 5, 10, 50, 100] {
        let p = payload(n);
        let wheres = predicates(2);
        group.bench_with_input(BenchmarkId::from_parameter(n), &p, |b, p| {
            b.iter(|| {
                let mut bindings = BindingsCollector::new();
                let sql = builder.create_update_sql("t", p, &wheres, &mut bindings);
                black_box((sql, bindings));
            });
        });
    }

    group.finish();
}

fn bench_batch_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/batch_update");
    let builder = UpdateStatementBuilder::new();

    for n in [5, 20, 100, 500] {
        let batch: Vec<UpdatePayload> = (0..n).map(|_| payload(5)).collect();
        let wheres = predicates(1);
        group.bench_with_input(BenchmarkId::from_parameter(n), &batch, |b, batch| {
            b.iter(|| black_box(builder.build("t", batch.clone(), &wheres)));
        });
    }

    group.finish();
}

fn bench_where_clause(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/where_clause");
    let builder = UpdateStatementBuilder::new();

    for n in [1, 5, 10, 50] {
        let wheres = predicates(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &wheres, |b, wheres| {
            b.iter(|| {
                let mut bindings = BindingsCollector::new();
                black_box(builder.where_clause(wheres, &mut bindings))
            });
        });
    }

    group.finish();
}

fn bench_render_inline(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/render_inline");
    let builder = UpdateStatementBuilder::new();

    for n in [1, 10, 100] {
        let stmt: Statement = match builder.build("t", payload(n), &predicates(2)) {
            Ok(stmt) => stmt,
            Err(e) => panic!("bench setup failed: {e}"),
        };
        group.bench_with_input(BenchmarkId::from_parameter(n), &stmt, |b, stmt| {
            b.iter(|| black_box(stmt.render_inline()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_single_update,
    bench_batch_update,
    bench_where_clause,
    bench_render_inline
);
criterion_main!(benches);
