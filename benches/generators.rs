use confidential_transfer_proofs::{BulletproofGens, PedersenGens};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

fn pc_gens(c: &mut Criterion) {
    c.bench_function("PedersenGens::new", |b| b.iter(|| PedersenGens::default()));
}

fn bp_gens(c: &mut Criterion) {
    let mut group = c.benchmark_group("BulletproofGens::new");

    for size in [2usize, 4, 8, 16, 32, 64] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &s| {
            b.iter(|| BulletproofGens::new(s))
        });
    }

    group.finish();
}

fn ensure_capacity(c: &mut Criterion) {
    c.bench_function("BulletproofGens::ensure_capacity 2->64", |b| {
        b.iter(|| {
            let mut gens = BulletproofGens::new(2);
            gens.ensure_capacity(64);
        })
    });
}

criterion_group! {
    bp,
    bp_gens,
    pc_gens,
    ensure_capacity,
}

criterion_main!(bp);
