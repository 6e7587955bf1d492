use criterion::{criterion_group, criterion_main, Criterion};
use rebyte::Regex;
use std::hint::black_box;

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("compile", |b| {
        b.iter(|| Regex::new(black_box(r"0x[0-9a-f]+$")).unwrap())
    });

    c.bench_function("match", |b| {
        let re = Regex::new(r"[0-9]+").unwrap();
        b.iter(|| re.find(black_box(b"Price: $123")))
    });

    c.bench_function("prefixed match", |b| {
        let re = Regex::new(r"0x[0-9a-f]+").unwrap();
        b.iter(|| re.find(black_box(b"offsets 0xcafe and 0xf00d")))
    });

    c.bench_function("backtracking match", |b| {
        let re = Regex::new(r"(a|b)+c").unwrap();
        b.iter(|| re.find(black_box(b"zzabbaabbac tail")))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
