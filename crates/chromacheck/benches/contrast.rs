use criterion::{black_box, criterion_group, criterion_main, Criterion};
use chromacheck::{simulate, Deficiency, Engine, Rgb};

pub fn run_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("contrast");

    group.bench_function("parse-hex", |b| {
        let engine = Engine::new();
        b.iter(|| engine.parse(black_box("#1e293b")))
    });

    group.bench_function("parse-oklch", |b| {
        let engine = Engine::new();
        b.iter(|| engine.parse(black_box("oklch(0.63 0.26 29.23)")))
    });

    group.bench_function("contrast-ratio-cold", |b| {
        b.iter(|| {
            let engine = Engine::new();
            engine.contrast_ratio_rgb(black_box(Rgb::new(30, 41, 59)), Rgb::new(255, 202, 0))
        })
    });

    group.bench_function("contrast-ratio-warm", |b| {
        let engine = Engine::new();
        b.iter(|| {
            engine.contrast_ratio_rgb(black_box(Rgb::new(30, 41, 59)), Rgb::new(255, 202, 0))
        })
    });

    group.bench_function("check", |b| {
        let engine = Engine::new();
        b.iter(|| engine.check(black_box("#767676"), black_box("white")))
    });

    group.bench_function("adjust", |b| {
        let engine = Engine::new();
        b.iter(|| engine.adjust(black_box(Rgb::new(10, 10, 10)), Rgb::new(0, 0, 0), 4.5, true))
    });

    group.bench_function("simulate-protanopia", |b| {
        b.iter(|| simulate(black_box(Rgb::new(255, 202, 0)), Deficiency::Protanopia))
    });

    group.finish();
}

criterion_group!(benches, run_benchmarks);
criterion_main!(benches);
