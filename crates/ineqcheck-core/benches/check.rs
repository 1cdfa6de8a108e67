use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use ineqcheck_core::{Operator, ParseOptions, Relation, check, parse_str};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SIZES: [u32; 3] = [1_000, 10_000, 100_000];

fn chain(n: u32) -> Vec<Relation<u32>> {
    (0..n).map(|i| Relation::new(i, Operator::LessEq, i + 1)).collect()
}

/// `n` relations over `n / 4` terms, so cycles and contradictions are common.
fn random_relations(n: u32, seed: u64) -> Vec<Relation<u32>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let terms = (n / 4).max(2);
    (0..n)
        .map(|_| {
            let op = Operator::ALL[rng.gen_range(0..Operator::ALL.len())];
            Relation::new(rng.gen_range(0..terms), op, rng.gen_range(0..terms))
        })
        .collect()
}

fn chain_text(n: u32) -> String {
    let mut out = String::new();
    for i in 0..n {
        out.push_str(&format!("t{i} ≤ t{}\n", i + 1));
    }
    out
}

fn bench_check(c: &mut Criterion) {
    let mut group = c.benchmark_group("check");

    for n in SIZES {
        group.throughput(Throughput::Elements(u64::from(n)));

        let relations = chain(n);
        group.bench_with_input(BenchmarkId::new("chain", n), &relations, |b, rels| {
            b.iter(|| black_box(check::<u32, String>(rels)))
        });

        let relations = random_relations(n, 0x1E0C_u64 + u64::from(n));
        group.bench_with_input(BenchmarkId::new("random", n), &relations, |b, rels| {
            b.iter(|| black_box(check::<u32, String>(rels)))
        });
    }

    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    let options = ParseOptions::default();

    for n in SIZES {
        let text = chain_text(n);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("chain", n), &text, |b, text| {
            b.iter(|| black_box(parse_str(text, &options)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_check, bench_parse);
criterion_main!(benches);
