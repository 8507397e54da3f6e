extern crate criterion;

use criterion::{criterion_group, criterion_main, Criterion};

use docpolish_lib::style::consolidate::consolidate;

fn bench_many_selectors(c: &mut Criterion) {
    let mut css = String::with_capacity(1_000_000);
    for i in 0..10_000 {
        css.push_str(&format!(
            ".rule-{} {{ color: #333; margin: {}px; padding: 4px; }}\n",
            i,
            i % 32
        ));
    }

    c.bench_function("many_selectors", |b| {
        b.iter(|| consolidate(&css))
    });
}

fn bench_repeated_selector(c: &mut Criterion) {
    let mut css = String::new();
    for i in 0..10_000 {
        css.push_str(&format!(".hot {{ width: {}px; height: 10px; }}\n", i));
    }

    c.bench_function("repeated_selector", |b| {
        b.iter(|| consolidate(&css))
    });
}

criterion_group!(benches, bench_many_selectors, bench_repeated_selector);
criterion_main!(benches);
