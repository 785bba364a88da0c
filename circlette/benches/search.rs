//! Benchmarks for the constraint engine and the rule search.

use circlette::constraint::{evaluate, valid_set};
use circlette::ring::{Bit, State};
use circlette::rule::{analyze, find_unique_rule, Gf2Matrix, Rule, RuleCandidateSet};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

fn bench_constraints(c: &mut Criterion) {
    let mut group = c.benchmark_group("constraints");
    group.throughput(Throughput::Elements(256));

    group.bench_function("evaluate_all", |b| {
        b.iter(|| {
            (0u8..=255)
                .filter(|&v| evaluate(black_box(State::new(v))).is_valid())
                .count()
        });
    });

    group.bench_function("valid_set", |b| {
        b.iter(|| black_box(valid_set()));
    });

    group.finish();
}

fn bench_gf2(c: &mut Criterion) {
    let mut group = c.benchmark_group("gf2");
    group.throughput(Throughput::Elements(1));

    let m = Gf2Matrix::coupling(4, 5);
    group.bench_function("apply", |b| {
        b.iter(|| black_box(m.apply(black_box(State::new(0xA5)))));
    });
    group.bench_function("rank", |b| {
        b.iter(|| black_box(black_box(m).rank()));
    });
    group.bench_function("order", |b| {
        b.iter(|| black_box(black_box(m).order(300)));
    });

    group.finish();
}

fn bench_rule_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("rule_search");
    let valid = valid_set();

    group.bench_function("analyze_winner", |b| {
        let rule = Rule::new(Bit::Lq, Bit::I3);
        b.iter(|| black_box(analyze(black_box(&rule), &valid)));
    });

    let canonical = RuleCandidateSet::canonical();
    group.throughput(Throughput::Elements(canonical.len() as u64));
    group.bench_function("canonical", |b| {
        b.iter(|| black_box(find_unique_rule(black_box(&canonical), &valid)));
    });

    let exhaustive = RuleCandidateSet::all_couplings();
    group.throughput(Throughput::Elements(exhaustive.len() as u64));
    group.bench_function("exhaustive", |b| {
        b.iter(|| black_box(find_unique_rule(black_box(&exhaustive), &valid)));
    });

    group.finish();
}

criterion_group!(benches, bench_constraints, bench_gf2, bench_rule_search);
criterion_main!(benches);
