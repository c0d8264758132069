// Processing benchmarks
// Author: Gabriel Demetrios Lafis

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rust_table_stream_engine::{
    data::{DataSet, Row, Value},
    processing::{AggregateFunction, MeltOptions, RecastOptions, Reducers, TableExt},
};

const VARIABLES: [&str; 4] = ["age", "height", "weight", "score"];

fn make_dataset(rows: usize) -> DataSet {
    let mut rng = StdRng::seed_from_u64(42);
    let mut dataset = DataSet::new(["id", "group", "value"]);
    for _ in 0..rows {
        let value = if rng.gen_bool(0.1) {
            Value::Null
        } else {
            Value::Float(rng.gen_range(0.0..100.0))
        };
        dataset.add_row(Row::new(vec![
            Value::Integer(rng.gen_range(0..(rows as i64 / 4).max(1))),
            Value::from(format!("group-{}", rng.gen_range(0..16))),
            value,
        ]));
    }
    dataset
}

fn make_molten(rows: usize) -> DataSet {
    let mut rng = StdRng::seed_from_u64(7);
    let mut dataset = DataSet::new(["id", "variable", "value"]);
    for _ in 0..rows {
        let variable = VARIABLES[rng.gen_range(0..VARIABLES.len())];
        dataset.add_row(Row::new(vec![
            Value::Integer(rng.gen_range(0..(rows as i64 / 8).max(1))),
            Value::from(variable),
            Value::Integer(rng.gen_range(0..200)),
        ]));
    }
    dataset
}

fn bench_sort(c: &mut Criterion) {
    let view = make_dataset(10_000).sort_by(["group", "id"]);
    c.bench_function("sort_10k", |b| {
        b.iter(|| black_box(view.collect_rows().unwrap()))
    });
}

fn bench_merge(c: &mut Criterion) {
    let view = make_dataset(10_000).merge_rows("id");
    c.bench_function("merge_10k", |b| {
        b.iter(|| black_box(view.collect_rows().unwrap()))
    });
}

fn bench_complement(c: &mut Criterion) {
    let view = make_dataset(10_000).complement(make_dataset(5_000));
    c.bench_function("complement_10k_5k", |b| {
        b.iter(|| black_box(view.collect_rows().unwrap()))
    });
}

fn bench_recast(c: &mut Criterion) {
    let reducers = VARIABLES
        .iter()
        .fold(Reducers::new(), |reducers, variable| {
            reducers.with_aggregate(*variable, AggregateFunction::Mean)
        });
    let view = make_molten(10_000).recast(RecastOptions::new().with_reducers(reducers));
    c.bench_function("recast_10k", |b| {
        b.iter(|| black_box(view.collect_rows().unwrap()))
    });
}

fn bench_melt(c: &mut Criterion) {
    let view = make_dataset(10_000).melt(MeltOptions::new().with_key("id"));
    c.bench_function("melt_10k", |b| {
        b.iter(|| black_box(view.collect_rows().unwrap()))
    });
}

criterion_group!(
    benches,
    bench_sort,
    bench_merge,
    bench_complement,
    bench_recast,
    bench_melt
);
criterion_main!(benches);
